//! Comment route handlers.
//!
//! Reached through `/commodities/{name}/comments` after classification. Write
//! methods take `username`, `comment` and `commodity` form fields; the
//! commodity defaults to the one named in the path.

use axum::{
    Json,
    extract::Request,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use bazaar_core::Comment;

use super::form::FormFields;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Dispatch a comments sub-resource request by method.
pub async fn dispatch(state: AppState, commodity: String, request: Request) -> Result<Response> {
    match request.method().clone() {
        Method::GET => list(&state, &commodity).await,
        Method::POST => create(&state, &commodity, FormFields::read(request).await?).await,
        Method::DELETE => delete(&state, &commodity, FormFields::read(request).await?).await,
        Method::PATCH => update(&state, &commodity, FormFields::read(request).await?).await,
        _ => Err(AppError::MethodNotAllowed),
    }
}

async fn list(state: &AppState, commodity: &str) -> Result<Response> {
    let comments = state.comments().for_commodity(commodity).await?;
    tracing::debug!(commodity, count = comments.len(), "Listed comments");
    Ok(Json(comments).into_response())
}

async fn create(state: &AppState, commodity: &str, form: FormFields) -> Result<Response> {
    let comment = comment_from_form(&form, commodity, true)?;
    state.comments().insert(&comment).await?;
    tracing::info!(username = %comment.username, commodity = %comment.commodity, "Added comment");
    Ok(StatusCode::OK.into_response())
}

async fn delete(state: &AppState, commodity: &str, form: FormFields) -> Result<Response> {
    let comment = comment_from_form(&form, commodity, false)?;
    let policy = state.config().comment_match;
    let removed = state.comments().delete(&comment, policy).await?;
    tracing::info!(
        username = %comment.username,
        commodity = %comment.commodity,
        removed,
        ?policy,
        "Deleted comments"
    );
    Ok(StatusCode::OK.into_response())
}

async fn update(state: &AppState, commodity: &str, form: FormFields) -> Result<Response> {
    let comment = comment_from_form(&form, commodity, true)?;
    let updated = state.comments().update_text(&comment).await?;
    tracing::info!(
        username = %comment.username,
        commodity = %comment.commodity,
        updated,
        "Updated comments"
    );
    Ok(StatusCode::OK.into_response())
}

fn comment_from_form(form: &FormFields, path_commodity: &str, text_required: bool) -> Result<Comment> {
    let comment = if text_required {
        form.require("comment")?.to_string()
    } else {
        form.text("comment")
    };

    let commodity = form
        .get("commodity")
        .filter(|c| !c.is_empty())
        .unwrap_or(path_commodity)
        .to_string();

    Ok(Comment {
        username: form.username("username")?,
        commodity,
        comment,
    })
}
