mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, TestApp};
use serde_json::json;

fn new_product(title: &str, category: &str) -> serde_json::Value {
    json!({
        "title": title,
        "description": "Refined product meeting EU specifications",
        "category": category,
        "image_url": "https://cdn.example.com/products/diesel.jpg",
        "specifications": ["Sulphur content max 10 ppm", "Cetane number min 51"],
        "certifications": ["SGS inspected"]
    })
}

#[tokio::test]
async fn catalog_is_publicly_readable() {
    let app = TestApp::new().await;

    let created = app
        .request_authenticated(
            Method::POST,
            "/api/v1/products",
            Some(new_product("EN 590 Diesel", "Petroleum")),
        )
        .await;
    assert_eq!(created.status(), StatusCode::OK);
    let id = body_json(created).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    // No token needed for reads
    let listed = app.request(Method::GET, "/api/v1/products", None, None).await;
    assert_eq!(listed.status(), StatusCode::OK);
    let body = body_json(listed).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let fetched = app
        .request(Method::GET, &format!("/api/v1/products/{id}"), None, None)
        .await;
    assert_eq!(fetched.status(), StatusCode::OK);
    let body = body_json(fetched).await;
    assert_eq!(body["data"]["title"], "EN 590 Diesel");
    assert_eq!(
        body["data"]["specifications"].as_array().unwrap().len(),
        2
    );
}

#[tokio::test]
async fn category_filter_is_case_insensitive() {
    let app = TestApp::new().await;

    for (title, category) in [
        ("EN 590 Diesel", "Petroleum"),
        ("Thermal Coal", "coal"),
        ("Jet A-1", "petroleum"),
    ] {
        let response = app
            .request_authenticated(
                Method::POST,
                "/api/v1/products",
                Some(new_product(title, category)),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let filtered = app
        .request(Method::GET, "/api/v1/products?category=PETROLEUM", None, None)
        .await;
    let body = body_json(filtered).await;
    let titles: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["EN 590 Diesel", "Jet A-1"]);
}

#[tokio::test]
async fn writes_require_authentication() {
    let app = TestApp::new().await;

    let anonymous_create = app
        .request(
            Method::POST,
            "/api/v1/products",
            Some(new_product("EN 590 Diesel", "petroleum")),
            None,
        )
        .await;
    assert_eq!(anonymous_create.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn invalid_products_are_rejected() {
    let app = TestApp::new().await;

    let mut product = new_product("", "petroleum");
    product["image_url"] = json!("not a url");

    let response = app
        .request_authenticated(Method::POST, "/api/v1/products", Some(product))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn owners_can_delete_their_products() {
    let app = TestApp::new().await;

    let created = app
        .request_authenticated(
            Method::POST,
            "/api/v1/products",
            Some(new_product("EN 590 Diesel", "petroleum")),
        )
        .await;
    let id = body_json(created).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let deleted = app
        .request_authenticated(Method::DELETE, &format!("/api/v1/products/{id}"), None)
        .await;
    assert_eq!(deleted.status(), StatusCode::OK);

    let gone = app
        .request(Method::GET, &format!("/api/v1/products/{id}"), None, None)
        .await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}
