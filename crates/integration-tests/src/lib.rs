//! Integration tests for the Bazaar storefront.
//!
//! # Running Tests
//!
//! ```bash
//! # In-process tests against the in-memory store
//! cargo test -p bazaar-integration-tests
//!
//! # Live-server tests (needs a running storefront)
//! STOREFRONT_BASE_URL=http://localhost:8080 cargo test -p bazaar-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `storefront_api` - Full router driven with `tower::ServiceExt::oneshot`
//! - `live_server` - HTTP round trips against a running server with `reqwest`
//!
//! [`TestApp`] builds the real router on a fresh [`MemoryStore`] so each test
//! starts from empty collections.

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use bazaar_storefront::config::StorefrontConfig;
use bazaar_storefront::db::{DocumentStore, MemoryStore};
use bazaar_storefront::services::SecretDeriver;
use bazaar_storefront::state::AppState;
use tower::ServiceExt;
use uuid::Uuid;

/// Boundary used for every multipart body built here.
pub const BOUNDARY: &str = "bazaar-test-boundary";

/// The storefront router over an in-memory store.
pub struct TestApp {
    router: Router,
    /// Backing store, for asserting on persisted documents.
    pub store: Arc<MemoryStore>,
    /// Configuration the router was built with.
    pub config: StorefrontConfig,
}

/// A buffered response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    /// Body parsed as JSON.
    ///
    /// # Panics
    ///
    /// Panics if the body is not valid JSON.
    #[must_use]
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("response body is not JSON")
    }

    /// Body as UTF-8 text.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

impl TestApp {
    /// Router with default configuration and a per-test picture directory.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(StorefrontConfig {
            picture_dir: scratch_dir(),
            ..StorefrontConfig::default()
        })
    }

    /// Router with the given configuration.
    #[must_use]
    pub fn with_config(config: StorefrontConfig) -> Self {
        let secrets = config.token.secret.deriver();
        Self::build(config, secrets)
    }

    /// Router with default configuration whose token secrets come from
    /// `secrets` instead of the configured mode.
    #[must_use]
    pub fn with_secret_deriver(secrets: Arc<dyn SecretDeriver>) -> Self {
        Self::build(
            StorefrontConfig {
                picture_dir: scratch_dir(),
                ..StorefrontConfig::default()
            },
            secrets,
        )
    }

    fn build(config: StorefrontConfig, secrets: Arc<dyn SecretDeriver>) -> Self {
        let store = Arc::new(MemoryStore::new());
        let shared: Arc<dyn DocumentStore> = store.clone();
        let state = AppState::with_secret_deriver(config.clone(), shared, secrets);
        Self {
            router: bazaar_storefront::app(state),
            store,
            config,
        }
    }

    /// Send a request through the router and buffer the response.
    ///
    /// # Panics
    ///
    /// Panics if the response body cannot be read.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = match self.router.clone().oneshot(request).await {
            Ok(response) => response,
            Err(never) => match never {},
        };
        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");
        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// GET without credentials.
    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(request(Method::GET, uri, None).body(Body::empty()).expect("request"))
            .await
    }

    /// GET with a bearer token.
    pub async fn get_with_token(&self, uri: &str, token: &str) -> TestResponse {
        self.send(
            request(Method::GET, uri, Some(token))
                .body(Body::empty())
                .expect("request"),
        )
        .await
    }

    /// Send an `application/x-www-form-urlencoded` body.
    pub async fn form(
        &self,
        method: Method,
        uri: &str,
        fields: &[(&str, &str)],
        token: Option<&str>,
    ) -> TestResponse {
        self.send(
            request(method, uri, token)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(urlencoded_body(fields)))
                .expect("request"),
        )
        .await
    }

    /// Send a `multipart/form-data` body of text fields.
    pub async fn multipart(
        &self,
        method: Method,
        uri: &str,
        fields: &[(&str, &str)],
        token: Option<&str>,
    ) -> TestResponse {
        self.send(
            request(method, uri, token)
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={BOUNDARY}"),
                )
                .body(Body::from(multipart_body(fields)))
                .expect("request"),
        )
        .await
    }

    /// Register a user and return the issued token.
    ///
    /// # Panics
    ///
    /// Panics if registration does not succeed.
    pub async fn register(&self, username: &str, password: &str) -> String {
        let response = self
            .form(
                Method::POST,
                "/users/register",
                &[("username", username), ("password", password)],
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.text());
        response.json()["tokenstr"]
            .as_str()
            .expect("tokenstr missing")
            .to_string()
    }
}

fn request(method: Method, uri: &str, token: Option<&str>) -> axum::http::request::Builder {
    let builder = Request::builder().method(method).uri(uri);
    match token {
        Some(token) => builder.header(header::AUTHORIZATION, format!("Bearer {token}")),
        None => builder,
    }
}

/// Percent-encode fields as a form body.
#[must_use]
pub fn urlencoded_body(fields: &[(&str, &str)]) -> String {
    fields
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Encode text fields as a multipart body delimited by [`BOUNDARY`].
#[must_use]
pub fn multipart_body(fields: &[(&str, &str)]) -> String {
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    body.push_str(&format!("--{BOUNDARY}--\r\n"));
    body
}

/// Encode one file field as a multipart body delimited by [`BOUNDARY`].
#[must_use]
pub fn multipart_file_body(field: &str, file_name: &str, contents: &[u8]) -> Vec<u8> {
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(contents);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// A fresh directory under the system temp dir.
#[must_use]
pub fn scratch_dir() -> PathBuf {
    std::env::temp_dir().join(format!("bazaar-test-{}", Uuid::new_v4()))
}
