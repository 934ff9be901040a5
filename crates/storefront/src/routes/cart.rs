//! Cart route handlers.
//!
//! Every cart request carries `Authorization: Bearer <token>`, verified
//! against the secret stored for the user named in the path before anything
//! else happens. Writes replace the whole cart.

use axum::{
    Json,
    extract::Request,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use bazaar_core::{Cart, Commodity, Username};

use super::form::FormFields;
use crate::db::RepositoryError;
use crate::error::{AppError, Result};
use crate::middleware::bearer_token;
use crate::state::AppState;

/// Verify the bearer token, then read or replace the cart.
pub async fn dispatch(state: AppState, username: &str, request: Request) -> Result<Response> {
    let username = Username::parse(username).map_err(|e| AppError::BadRequest(e.to_string()))?;

    let token = bearer_token(request.headers()).map(str::to_string);
    if let Err(err) = state.tokens().verify(&username, token.as_deref()).await {
        tracing::info!(username = %username, reason = %err, "Cart access rejected");
        return Err(err.into());
    }

    if request.method() == Method::GET {
        return show(&state, username).await;
    }

    replace(&state, username, FormFields::read(request).await?).await
}

async fn show(state: &AppState, username: Username) -> Result<Response> {
    let cart = match state.carts().get(&username).await {
        Ok(cart) => cart,
        Err(RepositoryError::NotFound { .. }) => Cart::empty(username),
        Err(e) => return Err(e.into()),
    };
    Ok(Json(cart).into_response())
}

async fn replace(state: &AppState, username: Username, form: FormFields) -> Result<Response> {
    let cart = cart_from_form(username, &form)?;
    state.carts().replace(&cart).await?;
    tracing::info!(
        username = %cart.username,
        items = cart.commodities.len(),
        "Replaced cart"
    );
    Ok(StatusCode::OK.into_response())
}

/// Build the cart to store from a submitted form.
///
/// The path username is the key. A form `username` that names someone else
/// is rejected rather than silently ignored.
fn cart_from_form(username: Username, form: &FormFields) -> Result<Cart> {
    let claimed = form.get("username").filter(|u| !u.is_empty());
    if claimed.is_some_and(|claimed| claimed != username.as_str()) {
        return Err(AppError::BadRequest(
            "form username does not match the cart owner".to_string(),
        ));
    }

    let commodities: Vec<Commodity> = form.json("commodities")?;
    Ok(Cart {
        username,
        commodities,
    })
}
