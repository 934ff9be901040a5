//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                                  - API index
//!
//! # Commodities
//! GET  /commodities                       - List commodities
//! *    /commodities                       - Create or replace a commodity (form)
//! GET  /commodities/{name}                - Commodity detail
//! GET  /commodities/{name}/comments       - List comments
//! POST /commodities/{name}/comments       - Add a comment
//! DELETE /commodities/{name}/comments     - Delete matching comments
//! PATCH /commodities/{name}/comments      - Rewrite matching comments
//!
//! # Users
//! GET  /users                             - List users
//! POST /users/register                    - Register, returns a bearer token
//! GET  /users/{name}                      - User lookup (array of 0 or 1)
//! GET  /users/{name}/cart                 - Cart (bearer token)
//! *    /users/{name}/cart                 - Replace cart (bearer token, form)
//!
//! # Pictures
//! POST /picture/upload                    - Upload the `image` file
//! GET  /picture/{name}                    - Serve a picture
//! ```
//!
//! Item paths are matched with a wildcard and handed to [`classify`], which
//! decides between the item and its sub-resource.
//!
//! `/users/register` takes precedence over `/users/{name}`, so `register` is
//! refused as a username at registration.

pub mod cart;
pub mod classify;
pub mod comments;
pub mod commodities;
pub mod form;
pub mod index;
pub mod pictures;
pub mod register;
pub mod users;

use axum::{
    Router,
    routing::{any, get, post},
};

use crate::error::AppError;
use crate::state::AppState;

/// Create the commodity routes router.
pub fn commodity_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/commodities",
            get(commodities::index).fallback(commodities::upsert),
        )
        .route("/commodities/{*suffix}", any(commodities::item))
}

/// Create the user routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(users::index))
        .route("/users/register", post(register::register))
        .route("/users/{*suffix}", any(users::item))
}

/// Create the picture routes router.
pub fn picture_routes() -> Router<AppState> {
    Router::new()
        .route("/picture/upload", post(pictures::upload))
        .route("/picture/{name}", get(pictures::show))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index::show))
        .merge(commodity_routes())
        .merge(user_routes())
        .merge(picture_routes())
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
}

/// JSON 404 for unrouted paths.
async fn not_found() -> AppError {
    AppError::NotFound("no such route".to_string())
}

/// JSON 405 for routed paths hit with an unserved method.
async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
