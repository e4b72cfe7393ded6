//! JWT authentication for the back-office API.
//!
//! Provides password verification against the `users` table, access/refresh
//! token issuance, token validation middleware, and the `/auth` router.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::{distributions::Alphanumeric, Rng};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::db::DbPool;
use crate::entities::user;

const SALT_LEN: usize = 16;
const LOGIN_BODY_LIMIT: usize = 64 * 1024;

/// Authentication errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account is disabled")]
    AccountDisabled,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    TokenExpired,

    #[error("Missing authorization header")]
    MissingToken,

    #[error("Wrong token type for this operation")]
    WrongTokenKind,

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Token encoding error: {0}")]
    Encoding(#[from] jsonwebtoken::errors::Error),
}

impl AuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Database(_) | Self::Encoding(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::AccountDisabled => "ACCOUNT_DISABLED",
            Self::InvalidToken(_) => "INVALID_TOKEN",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::MissingToken => "MISSING_TOKEN",
            Self::WrongTokenKind => "WRONG_TOKEN_KIND",
            Self::Database(_) | Self::Encoding(_) => "INTERNAL_ERROR",
        }
    }

    fn response_message(&self) -> String {
        match self {
            Self::Database(_) | Self::Encoding(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            warn!("auth failure: {}", self);
        }
        let body = serde_json::json!({
            "error": {
                "code": self.code(),
                "message": self.response_message(),
            }
        });
        (status, Json(body)).into_response()
    }
}

/// Distinguishes access tokens from refresh tokens in the `kind` claim.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT claims
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: user id
    pub sub: String,
    /// Display name
    pub name: String,
    /// Login email
    pub email: String,
    /// Token id
    pub jti: String,
    /// Issued at (unix seconds)
    pub iat: usize,
    /// Expiry (unix seconds)
    pub exp: usize,
    /// Not before (unix seconds)
    pub nbf: usize,
    /// Issuer
    pub iss: String,
    /// Audience
    pub aud: String,
    /// Access or refresh
    pub kind: TokenKind,
}

/// The authenticated caller, extracted from a validated access token.
///
/// Inserted into request extensions by [`auth_middleware`]; handlers read it
/// with `Extension<AuthUser>`.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub token_id: String,
}

/// Access/refresh token pair returned by login and refresh.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Access token lifetime in seconds
    pub expires_in: usize,
    /// Refresh token lifetime in seconds
    pub refresh_expires_in: usize,
}

/// Authentication configuration
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub jwt_audience: String,
    /// Access token lifetime in seconds
    pub access_expiration_secs: usize,
    /// Refresh token lifetime in seconds
    pub refresh_expiration_secs: usize,
}

impl AuthConfig {
    pub fn new(
        jwt_secret: impl Into<String>,
        jwt_issuer: impl Into<String>,
        jwt_audience: impl Into<String>,
        access_expiration_secs: usize,
        refresh_expiration_secs: usize,
    ) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            jwt_issuer: jwt_issuer.into(),
            jwt_audience: jwt_audience.into(),
            access_expiration_secs,
            refresh_expiration_secs,
        }
    }
}

impl From<&crate::config::AppConfig> for AuthConfig {
    fn from(cfg: &crate::config::AppConfig) -> Self {
        Self::new(
            cfg.jwt_secret.clone(),
            cfg.auth_issuer.clone(),
            cfg.auth_audience.clone(),
            cfg.jwt_expiration,
            cfg.refresh_token_expiration,
        )
    }
}

/// Hashes a password with a fresh random salt. Output format is `salt$hex`.
pub fn hash_password(password: &str) -> String {
    let salt: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SALT_LEN)
        .map(char::from)
        .collect();
    let digest = salted_digest(&salt, password);
    format!("{}${}", salt, digest)
}

/// Verifies a password against a stored `salt$hex` hash.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt, digest)) = stored.split_once('$') else {
        return false;
    };
    salted_digest(salt, password) == digest
}

fn salted_digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Issues and validates tokens, and checks credentials against the database.
#[derive(Clone)]
pub struct AuthService {
    config: AuthConfig,
    db: Arc<DbPool>,
}

impl AuthService {
    pub fn new(config: AuthConfig, db: Arc<DbPool>) -> Self {
        Self { config, db }
    }

    /// Checks email/password credentials and returns the matching active user.
    #[instrument(skip(self, password))]
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<user::Model, AuthError> {
        let account = user::Entity::find()
            .filter(user::Column::Email.eq(email.trim().to_lowercase()))
            .one(self.db.as_ref())
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &account.password_hash) {
            debug!(email = %email, "password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        if !account.active {
            return Err(AuthError::AccountDisabled);
        }

        Ok(account)
    }

    /// Issues an access/refresh token pair for the given user.
    pub fn generate_token_pair(&self, account: &user::Model) -> Result<TokenPair, AuthError> {
        let access = self.encode_token(account, TokenKind::Access)?;
        let refresh = self.encode_token(account, TokenKind::Refresh)?;
        Ok(TokenPair {
            access_token: access,
            refresh_token: refresh,
            token_type: "Bearer".to_string(),
            expires_in: self.config.access_expiration_secs,
            refresh_expires_in: self.config.refresh_expiration_secs,
        })
    }

    fn encode_token(&self, account: &user::Model, kind: TokenKind) -> Result<String, AuthError> {
        let now = Utc::now().timestamp() as usize;
        let lifetime = match kind {
            TokenKind::Access => self.config.access_expiration_secs,
            TokenKind::Refresh => self.config.refresh_expiration_secs,
        };
        let claims = Claims {
            sub: account.id.to_string(),
            name: account.name.clone(),
            email: account.email.clone(),
            jti: Uuid::new_v4().to_string(),
            iat: now,
            exp: now + lifetime,
            nbf: now,
            iss: self.config.jwt_issuer.clone(),
            aud: self.config.jwt_audience.clone(),
            kind,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )?;
        Ok(token)
    }

    /// Validates a token's signature, expiry, issuer and audience.
    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.config.jwt_issuer]);
        validation.set_audience(&[&self.config.jwt_audience]);
        validation.validate_nbf = true;

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &validation,
        )
        .map_err(|err| match err.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken(err.to_string()),
        })?;

        Ok(data.claims)
    }

    /// Exchanges a valid refresh token for a fresh token pair.
    ///
    /// The user is reloaded from the database so that disabled accounts stop
    /// being able to refresh immediately.
    #[instrument(skip(self, refresh_token))]
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        let claims = self.validate_token(refresh_token)?;
        if claims.kind != TokenKind::Refresh {
            return Err(AuthError::WrongTokenKind);
        }

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AuthError::InvalidToken("subject is not a valid user id".into()))?;

        let account = user::Entity::find_by_id(user_id)
            .one(self.db.as_ref())
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !account.active {
            return Err(AuthError::AccountDisabled);
        }

        self.generate_token_pair(&account)
    }
}

/// Extracts and validates the bearer token, then stores [`AuthUser`] in the
/// request extensions. Expects an `Arc<AuthService>` extension, injected at
/// router construction.
pub async fn auth_middleware(mut request: Request, next: Next) -> Result<Response, AuthError> {
    let service = request
        .extensions()
        .get::<Arc<AuthService>>()
        .cloned()
        .ok_or_else(|| AuthError::InvalidToken("auth service not configured".into()))?;

    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(AuthError::MissingToken)?;

    let claims = service.validate_token(token)?;
    if claims.kind != TokenKind::Access {
        return Err(AuthError::WrongTokenKind);
    }

    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| AuthError::InvalidToken("subject is not a valid user id".into()))?;

    request.extensions_mut().insert(AuthUser {
        user_id,
        name: claims.name,
        email: claims.email,
        token_id: claims.jti,
    });

    Ok(next.run(request).await)
}

/// Adds `require_auth()` to any router, applying [`auth_middleware`] as a
/// route layer.
pub trait AuthRouterExt {
    fn require_auth(self) -> Self;
}

impl<S> AuthRouterExt for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn require_auth(self) -> Self {
        self.route_layer(axum::middleware::from_fn(auth_middleware))
    }
}

/// Login request body
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Email must be a valid email address"))]
    #[schema(example = "ops@example.com")]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Refresh request body
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RefreshRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// Authenticate with email and password
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token pair issued", body = TokenPair),
        (status = 401, description = "Invalid credentials"),
    )
)]
pub async fn login_handler(
    State(service): State<Arc<AuthService>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenPair>, AuthError> {
    payload
        .validate()
        .map_err(|_| AuthError::InvalidCredentials)?;
    let account = service.authenticate(&payload.email, &payload.password).await?;
    let pair = service.generate_token_pair(&account)?;
    Ok(Json(pair))
}

/// Exchange a refresh token for a new token pair
#[utoipa::path(
    post,
    path = "/auth/refresh",
    tag = "auth",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "Token pair issued", body = TokenPair),
        (status = 401, description = "Invalid or expired refresh token"),
    )
)]
pub async fn refresh_handler(
    State(service): State<Arc<AuthService>>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<TokenPair>, AuthError> {
    payload
        .validate()
        .map_err(|e| AuthError::InvalidToken(e.to_string()))?;
    let pair = service.refresh(&payload.refresh_token).await?;
    Ok(Json(pair))
}

/// Routes for token issuance. Mounted under `/auth`.
pub fn auth_routes() -> Router<Arc<AuthService>> {
    Router::new()
        .route("/login", post(login_handler))
        .route("/refresh", post(refresh_handler))
        .layer(axum::extract::DefaultBodyLimit::max(LOGIN_BODY_LIMIT))
}
