//! User route handlers.

use axum::{
    Json,
    extract::{Request, State},
    http::Method,
    response::{IntoResponse, Response},
};
use bazaar_core::{User, Username};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::instrument;

use super::cart;
use super::classify::{UserTarget, classify_user};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Prefix stripped from item paths before classification.
const ITEM_PREFIX: &str = "/users/";

/// User as returned over HTTP; the password never leaves the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserView {
    pub username: Username,
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
            balance: user.balance,
        }
    }
}

/// List all users.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<UserView>>> {
    let users = state.users().list().await?;
    Ok(Json(users.into_iter().map(UserView::from).collect()))
}

/// Dispatch `/users/{suffix}` to the user or their cart.
#[instrument(skip(state, request), fields(path = %request.uri().path()))]
pub async fn item(State(state): State<AppState>, request: Request) -> Result<Response> {
    let suffix = request
        .uri()
        .path()
        .strip_prefix(ITEM_PREFIX)
        .unwrap_or_default()
        .to_string();

    match classify_user(&suffix) {
        UserTarget::Cart(username) => cart::dispatch(state, &username, request).await,
        UserTarget::Item(username) => {
            if request.method() != Method::GET {
                return Err(AppError::MethodNotAllowed);
            }
            // Array of zero or one: an unknown user is not an error here
            let users: Vec<UserView> = state
                .users()
                .find_by_username(&username)
                .await?
                .into_iter()
                .map(UserView::from)
                .collect();
            Ok(Json(users).into_response())
        }
    }
}
