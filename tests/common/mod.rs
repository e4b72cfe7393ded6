use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request},
    middleware, Router,
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ConnectionTrait, DatabaseBackend as DbBackend, Statement,
};
use serde_json::Value;
use tower::ServiceExt;
use tradedesk_api::{
    auth::{auth_routes, hash_password, AuthConfig, AuthService},
    config::AppConfig,
    db,
    entities::user,
    AppState,
};
use uuid::Uuid;

const TEST_JWT_SECRET: &str = "test_secret_key_for_testing_purposes_only_32chars";
pub const ADMIN_EMAIL: &str = "ops@example.com";
pub const ADMIN_PASSWORD: &str = "correct horse battery staple";

/// Helper harness backed by a throwaway file-based SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    pub admin_id: Uuid,
    token: String,
    auth_service: Arc<AuthService>,
    db_file: String,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        let db_file = format!("tradedesk_test_{}.db", Uuid::new_v4().simple());
        let _ = std::fs::remove_file(&db_file);

        let mut cfg = AppConfig::new(
            format!("sqlite://{db_file}?mode=rwc"),
            TEST_JWT_SECRET.to_string(),
            3600,
            86_400,
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        cfg.auto_migrate = true;
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");

        // Start from a clean schema even if the file somehow exists.
        for sql in [
            "DROP TABLE IF EXISTS trading_steps;",
            "DROP TABLE IF EXISTS shipments;",
            "DROP TABLE IF EXISTS products;",
            "DROP TABLE IF EXISTS rfq_submissions;",
            "DROP TABLE IF EXISTS users;",
        ] {
            let _ = pool
                .execute(Statement::from_string(DbBackend::Sqlite, sql.to_string()))
                .await;
        }

        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let db_arc = Arc::new(pool);

        let auth_cfg = AuthConfig::from(&cfg);
        let auth_service = Arc::new(AuthService::new(auth_cfg, db_arc.clone()));

        // Seed the back-office admin account and mint a token for it.
        let admin_id = Uuid::new_v4();
        let admin = user::ActiveModel {
            id: Set(admin_id),
            name: Set("Ops Admin".to_string()),
            email: Set(ADMIN_EMAIL.to_string()),
            password_hash: Set(hash_password(ADMIN_PASSWORD)),
            ..Default::default()
        };
        let admin = admin
            .insert(db_arc.as_ref())
            .await
            .expect("failed to seed admin user");

        let token = auth_service
            .generate_token_pair(&admin)
            .expect("failed to mint test token")
            .access_token;

        let state = AppState::new(db_arc, Arc::new(cfg));

        let auth_for_layer = auth_service.clone();
        let api_router =
            tradedesk_api::api_v1_routes().layer(middleware::from_fn_with_state(
                auth_for_layer,
                |axum::extract::State(auth): axum::extract::State<Arc<AuthService>>,
                 mut req: Request<Body>,
                 next: axum::middleware::Next| async move {
                    req.extensions_mut().insert(auth);
                    next.run(req).await
                },
            ));

        let router = Router::new()
            .nest("/api/v1", api_router)
            .nest("/auth", auth_routes().with_state(auth_service.clone()))
            .with_state(state.clone());

        Self {
            router,
            state,
            admin_id,
            token,
            auth_service,
            db_file,
        }
    }

    #[allow(dead_code)]
    pub fn auth_service(&self) -> Arc<AuthService> {
        self.auth_service.clone()
    }

    /// Bearer token for the seeded admin user.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Send a request against the router with an optional bearer token.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(tok) = token {
            builder = builder.header("authorization", format!("Bearer {}", tok));
        }

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Convenience helper for authenticated JSON requests.
    pub async fn request_authenticated(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> axum::response::Response {
        self.request(method, uri, body, Some(self.token())).await
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_file);
    }
}

/// Reads a response body as JSON.
pub async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    serde_json::from_slice(&bytes).expect("response body was not valid json")
}
