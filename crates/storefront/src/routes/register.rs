//! Registration route handler.

use axum::{Json, extract::State};
use bazaar_core::{IssuedToken, User};
use tracing::instrument;

use super::form::FormFields;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Username taken by the registration route itself; `/users/register` can
/// never reach a user of that name.
pub const RESERVED_USERNAME: &str = "register";

/// Register (or re-register) a user and issue a bearer token.
///
/// The user record is written first, then the token secret; a second
/// registration replaces both and invalidates earlier tokens.
#[instrument(skip(state, form))]
pub async fn register(State(state): State<AppState>, form: FormFields) -> Result<Json<IssuedToken>> {
    let username = form.username("username")?;
    if username.as_str() == RESERVED_USERNAME {
        return Err(AppError::BadRequest(format!(
            "username '{RESERVED_USERNAME}' is reserved"
        )));
    }
    let password = form.require("password")?;
    let balance = form.balance(state.config().form_policy)?;

    state
        .users()
        .upsert(&User {
            username: username.clone(),
            password: password.to_string(),
            balance,
        })
        .await?;
    tracing::info!(username = %username, "Registered user");

    let issued = state.tokens().issue(&username, password).await?;
    Ok(Json(issued))
}
