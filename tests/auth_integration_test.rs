mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, TestApp, ADMIN_EMAIL, ADMIN_PASSWORD};
use serde_json::json;

#[tokio::test]
async fn login_issues_a_token_pair() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/auth/login",
            Some(json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert!(body["access_token"].as_str().is_some());
    assert!(body["refresh_token"].as_str().is_some());
    assert_eq!(body["token_type"], "Bearer");
}

#[tokio::test]
async fn login_rejects_a_wrong_password() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/auth/login",
            Some(json!({ "email": ADMIN_EMAIL, "password": "wrong" })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn refresh_exchanges_a_refresh_token() {
    let app = TestApp::new().await;

    let login = app
        .request(
            Method::POST,
            "/auth/login",
            Some(json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD })),
            None,
        )
        .await;
    let pair = body_json(login).await;
    let refresh_token = pair["refresh_token"].as_str().unwrap().to_string();

    let response = app
        .request(
            Method::POST,
            "/auth/refresh",
            Some(json!({ "refresh_token": refresh_token })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let new_access = body["access_token"].as_str().unwrap();

    // The refreshed access token works against a protected endpoint
    let list = app
        .request(Method::GET, "/api/v1/shipments", None, Some(new_access))
        .await;
    assert_eq!(list.status(), StatusCode::OK);
}

#[tokio::test]
async fn access_tokens_cannot_be_used_to_refresh() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/auth/refresh",
            Some(json!({ "refresh_token": app.token() })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn protected_endpoints_require_a_bearer_token() {
    let app = TestApp::new().await;

    let no_token = app.request(Method::GET, "/api/v1/shipments", None, None).await;
    assert_eq!(no_token.status(), StatusCode::UNAUTHORIZED);

    let bad_token = app
        .request(Method::GET, "/api/v1/shipments", None, Some("garbage"))
        .await;
    assert_eq!(bad_token.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn public_endpoints_do_not_require_a_token() {
    let app = TestApp::new().await;

    for uri in [
        "/api/v1/status",
        "/api/v1/health",
        "/api/v1/products",
        "/api/v1/process/steps",
    ] {
        let response = app.request(Method::GET, uri, None, None).await;
        assert_eq!(response.status(), StatusCode::OK, "expected 200 for {uri}");
    }
}
