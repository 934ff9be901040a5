//! Round trips against a running storefront.
//!
//! These tests require:
//! - The storefront server running (cargo run -p bazaar-storefront)
//! - A reachable document store behind it
//!
//! Run with: cargo test -p bazaar-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::Value;
use uuid::Uuid;

/// Base URL for the storefront (configurable via environment).
fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:8080".to_string())
}

fn client() -> Client {
    Client::builder()
        .build()
        .expect("Failed to create HTTP client")
}

/// Unique username so reruns do not collide.
fn fresh_username() -> String {
    format!("it-{}", Uuid::new_v4().simple())
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_live_health() {
    let resp = client()
        .get(format!("{}/health/ready", storefront_base_url()))
        .send()
        .await
        .expect("Failed to reach storefront");

    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_live_register_and_cart() {
    let client = client();
    let base_url = storefront_base_url();
    let username = fresh_username();

    let resp = client
        .post(format!("{base_url}/users/register"))
        .form(&[("username", username.as_str()), ("password", "pw")])
        .send()
        .await
        .expect("Failed to register");
    assert_eq!(resp.status(), StatusCode::OK);
    let issued: Value = resp.json().await.expect("Invalid JSON");
    let token = issued["tokenstr"].as_str().expect("tokenstr missing").to_string();

    let resp = client
        .get(format!("{base_url}/users/{username}/cart"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to fetch cart");
    assert_eq!(resp.status(), StatusCode::OK);
    let cart: Value = resp.json().await.expect("Invalid JSON");
    assert_eq!(cart["commodities"], Value::Array(Vec::new()));

    let form = reqwest::multipart::Form::new()
        .text("username", username.clone())
        .text(
            "commodities",
            r#"[{"name":"mug","introduction":"","picture":"","price":9.99}]"#,
        );
    let resp = client
        .post(format!("{base_url}/users/{username}/cart"))
        .bearer_auth(&token)
        .multipart(form)
        .send()
        .await
        .expect("Failed to write cart");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(format!("{base_url}/users/{username}/cart"))
        .send()
        .await
        .expect("Failed to fetch cart");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
