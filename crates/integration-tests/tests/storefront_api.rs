//! End-to-end tests for the storefront API.
//!
//! Each test drives the full router (middleware included) over a fresh
//! in-memory store. No server or database is required.
//!
//! Run with: cargo test -p bazaar-integration-tests

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use bazaar_integration_tests::{BOUNDARY, TestApp, multipart_file_body};
use bazaar_storefront::config::StorefrontConfig;
use bazaar_storefront::db::CommentMatch;
use bazaar_storefront::middleware::REQUEST_ID_HEADER;
use bazaar_storefront::routes::form::FormPolicy;
use bazaar_storefront::services::RandomSecret;
use serde_json::json;

const MUG: &str = r#"[{"name":"mug","introduction":"blue","picture":"mug.png","price":9.99}]"#;
const TEAPOT: &str = r#"[{"name":"teapot","introduction":"","picture":"","price":20}]"#;

// ============================================================================
// Index & Health
// ============================================================================

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();

    let resp = app.get("/health").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.text(), "ok");

    let resp = app.get("/health/ready").await;
    assert_eq!(resp.status, StatusCode::OK);
}

#[tokio::test]
async fn test_api_index() {
    let app = TestApp::new();

    let resp = app.get("/").await;
    assert_eq!(resp.status, StatusCode::OK);
    let index = resp.json();
    assert_eq!(index["all_commodities_url"], "http://127.0.0.1:8080/commodities");
    assert_eq!(index["user_register_url"], "http://127.0.0.1:8080/users/register");
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let app = TestApp::new();

    let resp = app.get("/nowhere").await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(
        resp.headers.get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
    assert!(resp.json()["error"].is_string());
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let app = TestApp::new();

    let resp = app
        .send(
            Request::builder()
                .uri("/health")
                .header(REQUEST_ID_HEADER, "req-42")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(resp.headers.get(REQUEST_ID_HEADER).unwrap(), "req-42");
}

// ============================================================================
// Commodities
// ============================================================================

#[tokio::test]
async fn test_commodity_price_round_trips_as_number() {
    let app = TestApp::new();

    let resp = app
        .multipart(
            Method::POST,
            "/commodities",
            &[
                ("name", "mug"),
                ("introduction", "blue"),
                ("picture", "mug.png"),
                ("price", "9.99"),
            ],
            None,
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK, "{}", resp.text());

    let resp = app.get("/commodities/mug").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(
        resp.json(),
        json!({ "name": "mug", "introduction": "blue", "picture": "mug.png", "price": 9.99 })
    );
}

#[tokio::test]
async fn test_commodity_upsert_replaces_by_name() {
    let app = TestApp::new();

    for price in ["1.50", "2.25", "2.25"] {
        let resp = app
            .multipart(
                Method::PUT,
                "/commodities",
                &[("name", "mug"), ("price", price)],
                None,
            )
            .await;
        assert_eq!(resp.status, StatusCode::OK);
    }

    let list = app.get("/commodities").await.json();
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["price"], json!(2.25));
    assert_eq!(app.store.count(&app.config.collections.commodities).await, 1);
}

#[tokio::test]
async fn test_commodity_with_encoded_name() {
    let app = TestApp::new();

    app.multipart(
        Method::POST,
        "/commodities",
        &[("name", "coffee mug"), ("price", "3")],
        None,
    )
    .await;

    let resp = app.get("/commodities/coffee%20mug").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json()["name"], "coffee mug");
}

#[tokio::test]
async fn test_unknown_commodity_is_404() {
    let app = TestApp::new();

    let resp = app.get("/commodities/ghost").await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(resp.json(), json!({ "error": "commodity not found" }));
}

#[tokio::test]
async fn test_bad_price_is_400_when_strict() {
    let app = TestApp::new();

    let resp = app
        .multipart(
            Method::POST,
            "/commodities",
            &[("name", "mug"), ("price", "cheap")],
            None,
        )
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);

    let resp = app
        .multipart(Method::POST, "/commodities", &[("name", "mug")], None)
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_bad_price_is_zero_when_lenient() {
    let app = TestApp::with_config(StorefrontConfig {
        form_policy: FormPolicy::Lenient,
        ..StorefrontConfig::default()
    });

    let resp = app
        .multipart(
            Method::POST,
            "/commodities",
            &[("name", "mug"), ("price", "cheap")],
            None,
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(app.get("/commodities/mug").await.json()["price"], json!(0.0));
}

#[tokio::test]
async fn test_commodity_item_rejects_writes() {
    let app = TestApp::new();

    let resp = app
        .multipart(Method::POST, "/commodities/mug", &[("price", "1")], None)
        .await;
    assert_eq!(resp.status, StatusCode::METHOD_NOT_ALLOWED);
    assert!(resp.json()["error"].is_string());
}

// ============================================================================
// Comments
// ============================================================================

#[tokio::test]
async fn test_comment_lifecycle() {
    let app = TestApp::new();
    let uri = "/commodities/mug/comments";

    let resp = app
        .multipart(
            Method::POST,
            uri,
            &[("username", "bob"), ("comment", "nice mug")],
            None,
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);

    let comments = app.get(uri).await.json();
    assert_eq!(
        comments,
        json!([{ "username": "bob", "commodity": "mug", "comment": "nice mug" }])
    );

    let resp = app
        .multipart(
            Method::PATCH,
            uri,
            &[("username", "bob"), ("comment", "great mug")],
            None,
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(app.get(uri).await.json()[0]["comment"], "great mug");

    let resp = app
        .multipart(Method::DELETE, uri, &[("username", "bob")], None)
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(app.get(uri).await.json(), json!([]));
}

#[tokio::test]
async fn test_delete_removes_every_comment_by_author() {
    let app = TestApp::new();
    let uri = "/commodities/mug/comments";

    for text in ["first", "second"] {
        app.multipart(
            Method::POST,
            uri,
            &[("username", "bob"), ("comment", text), ("commodity", "mug")],
            None,
        )
        .await;
    }
    app.multipart(
        Method::POST,
        uri,
        &[("username", "alice"), ("comment", "mine")],
        None,
    )
    .await;

    let resp = app
        .multipart(
            Method::DELETE,
            uri,
            &[("username", "bob"), ("comment", "first"), ("commodity", "mug")],
            None,
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);

    let remaining = app.get(uri).await.json();
    assert_eq!(remaining.as_array().unwrap().len(), 1);
    assert_eq!(remaining[0]["username"], "alice");
}

#[tokio::test]
async fn test_exact_delete_policy_keeps_other_texts() {
    let app = TestApp::with_config(StorefrontConfig {
        comment_match: CommentMatch::ExactComment,
        ..StorefrontConfig::default()
    });
    let uri = "/commodities/mug/comments";

    for text in ["first", "second"] {
        app.multipart(
            Method::POST,
            uri,
            &[("username", "bob"), ("comment", text)],
            None,
        )
        .await;
    }
    app.multipart(
        Method::DELETE,
        uri,
        &[("username", "bob"), ("comment", "first")],
        None,
    )
    .await;

    let remaining = app.get(uri).await.json();
    assert_eq!(remaining, json!([{ "username": "bob", "commodity": "mug", "comment": "second" }]));
}

#[tokio::test]
async fn test_comments_reject_put() {
    let app = TestApp::new();

    let resp = app
        .multipart(
            Method::PUT,
            "/commodities/mug/comments",
            &[("username", "bob"), ("comment", "x")],
            None,
        )
        .await;
    assert_eq!(resp.status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_comment_without_username_is_400() {
    let app = TestApp::new();

    let resp = app
        .multipart(
            Method::POST,
            "/commodities/mug/comments",
            &[("comment", "anonymous")],
            None,
        )
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
}

// ============================================================================
// Users & Registration
// ============================================================================

#[tokio::test]
async fn test_register_returns_token_and_hides_password() {
    let app = TestApp::new();

    let resp = app
        .form(
            Method::POST,
            "/users/register",
            &[("username", "bob"), ("password", "pw"), ("balance", "12.5")],
            None,
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    let body = resp.json();
    assert_eq!(body["username"], "bob");
    assert!(body["tokenstr"].as_str().unwrap().split('.').count() == 3);
    assert!(body.get("key").is_none());

    let users = app.get("/users/bob").await;
    assert_eq!(users.status, StatusCode::OK);
    assert_eq!(users.json(), json!([{ "username": "bob", "balance": 12.5 }]));
    assert!(!users.text().contains("pw"));

    let all = app.get("/users").await.json();
    assert_eq!(all.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_register_via_multipart() {
    let app = TestApp::new();

    let resp = app
        .multipart(
            Method::POST,
            "/users/register",
            &[("username", "carol"), ("password", "pw")],
            None,
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(app.get("/users/carol").await.json()[0]["balance"], json!(0.0));
}

#[tokio::test]
async fn test_register_writes_users_not_carts() {
    let app = TestApp::new();
    app.register("bob", "pw").await;

    let collections = &app.config.collections;
    assert_eq!(app.store.count(&collections.users).await, 1);
    assert_eq!(app.store.count(&collections.tokens).await, 1);
    assert_eq!(app.store.count(&collections.carts).await, 0);
}

#[tokio::test]
async fn test_register_rejects_bad_balance() {
    let app = TestApp::new();

    let resp = app
        .form(
            Method::POST,
            "/users/register",
            &[("username", "bob"), ("password", "pw"), ("balance", "lots")],
            None,
        )
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(app.get("/users/bob").await.json(), json!([]));
}

#[tokio::test]
async fn test_register_requires_password() {
    let app = TestApp::new();

    let resp = app
        .form(Method::POST, "/users/register", &[("username", "bob")], None)
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.json(), json!({ "error": "missing field 'password'" }));
}

#[tokio::test]
async fn test_register_refuses_route_name() {
    let app = TestApp::new();

    let resp = app
        .form(
            Method::POST,
            "/users/register",
            &[("username", "register"), ("password", "pw")],
            None,
        )
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.json(), json!({ "error": "username 'register' is reserved" }));
    assert_eq!(app.store.count(&app.config.collections.users).await, 0);
    assert_eq!(app.store.count(&app.config.collections.tokens).await, 0);
}

#[tokio::test]
async fn test_unknown_user_is_empty_array() {
    let app = TestApp::new();

    let resp = app.get("/users/nobody").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json(), json!([]));
}

// ============================================================================
// Cart
// ============================================================================

#[tokio::test]
async fn test_new_user_gets_empty_cart() {
    let app = TestApp::new();
    let token = app.register("bob", "pw").await;

    let resp = app.get_with_token("/users/bob/cart", &token).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json(), json!({ "username": "bob", "commodities": [] }));
}

#[tokio::test]
async fn test_cart_write_replaces_contents() {
    let app = TestApp::new();
    let token = app.register("bob", "pw").await;

    for commodities in [MUG, TEAPOT] {
        let resp = app
            .multipart(
                Method::POST,
                "/users/bob/cart",
                &[("username", "bob"), ("commodities", commodities)],
                Some(&token),
            )
            .await;
        assert_eq!(resp.status, StatusCode::OK, "{}", resp.text());
    }

    let cart = app.get_with_token("/users/bob/cart", &token).await.json();
    assert_eq!(cart["commodities"].as_array().unwrap().len(), 1);
    assert_eq!(cart["commodities"][0]["name"], "teapot");
    assert_eq!(app.store.count(&app.config.collections.carts).await, 1);
}

#[tokio::test]
async fn test_cart_requires_token() {
    let app = TestApp::new();
    app.register("bob", "pw").await;

    let resp = app.get("/users/bob/cart").await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp.json(), json!({ "error": "missing bearer token" }));

    let resp = app.get_with_token("/users/bob/cart", "garbage").await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_rejected_token_writes_nothing() {
    let app = TestApp::new();
    app.register("bob", "pw").await;

    let resp = app
        .multipart(
            Method::POST,
            "/users/bob/cart",
            &[("commodities", MUG)],
            Some("garbage"),
        )
        .await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.store.count(&app.config.collections.carts).await, 0);
}

#[tokio::test]
async fn test_token_only_opens_own_cart() {
    let app = TestApp::new();
    let bobs = app.register("bob", "pw").await;
    app.register("alice", "pw").await;

    let resp = app.get_with_token("/users/alice/cart", &bobs).await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unregistered_cart_is_401() {
    let app = TestApp::new();

    let resp = app.get_with_token("/users/ghost/cart", "a.b.c").await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_reregistration_revokes_old_token() {
    let app = TestApp::new();
    let old = app.register("bob", "old-pw").await;
    let new = app.register("bob", "new-pw").await;

    assert_eq!(
        app.get_with_token("/users/bob/cart", &old).await.status,
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        app.get_with_token("/users/bob/cart", &new).await.status,
        StatusCode::OK
    );
}

#[tokio::test]
async fn test_cart_username_mismatch_is_400() {
    let app = TestApp::new();
    let token = app.register("bob", "pw").await;

    let resp = app
        .multipart(
            Method::POST,
            "/users/bob/cart",
            &[("username", "mallory"), ("commodities", MUG)],
            Some(&token),
        )
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_cart_with_malformed_commodities_is_400() {
    let app = TestApp::new();
    let token = app.register("bob", "pw").await;

    let resp = app
        .multipart(
            Method::POST,
            "/users/bob/cart",
            &[("username", "bob"), ("commodities", "[{")],
            Some(&token),
        )
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(app.store.count(&app.config.collections.carts).await, 0);
}

#[tokio::test]
async fn test_cart_with_negative_price_is_400() {
    let app = TestApp::new();
    let token = app.register("bob", "pw").await;

    let resp = app
        .multipart(
            Method::POST,
            "/users/bob/cart",
            &[
                ("username", "bob"),
                (
                    "commodities",
                    r#"[{"name":"mug","introduction":"","picture":"","price":-5}]"#,
                ),
            ],
            Some(&token),
        )
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(app.store.count(&app.config.collections.carts).await, 0);
}

#[tokio::test]
async fn test_colliding_secret_does_not_open_other_cart() {
    let app = TestApp::new();
    // "bob" + "pw" and "bo" + "bpw" concatenate to the same secret.
    app.register("bob", "pw").await;
    let bos = app.register("bo", "bpw").await;

    let resp = app.get_with_token("/users/bob/cart", &bos).await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp.json(), json!({ "error": "token was issued to another user" }));

    let resp = app
        .multipart(
            Method::POST,
            "/users/bob/cart",
            &[("commodities", MUG)],
            Some(&bos),
        )
        .await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.store.count(&app.config.collections.carts).await, 0);

    assert_eq!(
        app.get_with_token("/users/bo/cart", &bos).await.status,
        StatusCode::OK
    );
}

#[tokio::test]
async fn test_random_secret_reregistration_revokes_with_same_password() {
    let app = TestApp::with_secret_deriver(Arc::new(RandomSecret));
    let old = app.register("bob", "pw").await;
    let new = app.register("bob", "pw").await;

    assert_eq!(
        app.get_with_token("/users/bob/cart", &old).await.status,
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        app.get_with_token("/users/bob/cart", &new).await.status,
        StatusCode::OK
    );
}

// ============================================================================
// Pictures
// ============================================================================

#[tokio::test]
async fn test_picture_upload_and_fetch() {
    let app = TestApp::new();

    let resp = app
        .send(
            Request::builder()
                .method(Method::POST)
                .uri("/picture/upload")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={BOUNDARY}"),
                )
                .body(Body::from(multipart_file_body(
                    "image",
                    "../mug.png",
                    b"not really a png",
                )))
                .unwrap(),
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK, "{}", resp.text());
    assert_eq!(resp.json(), json!({ "picture": "mug.png" }));
    assert!(app.config.picture_dir.join("mug.png").exists());

    let resp = app.get("/picture/mug.png").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(&resp.body[..], b"not really a png");
}

#[tokio::test]
async fn test_missing_picture_is_404() {
    let app = TestApp::new();

    let resp = app.get("/picture/nothing.png").await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_upload_without_image_field_is_400() {
    let app = TestApp::new();

    let resp = app
        .multipart(Method::POST, "/picture/upload", &[("other", "x")], None)
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
}
