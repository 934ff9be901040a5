//! Picture upload and serving.
//!
//! Uploaded files land flat in the configured picture directory under their
//! own file name; any directory part of the submitted name is dropped.

use std::path::Path;

use axum::{
    Json,
    extract::{Multipart, Path as UrlPath, Request, State},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tower::ServiceExt;
use tower_http::services::ServeFile;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Multipart field holding the uploaded file.
const IMAGE_FIELD: &str = "image";

/// Response to a successful upload.
#[derive(Debug, Serialize)]
pub struct Uploaded {
    /// Stored file name, usable as `/picture/{picture}`.
    pub picture: String,
}

/// Store the `image` file of a multipart upload.
#[instrument(skip(state, multipart))]
pub async fn upload(State(state): State<AppState>, mut multipart: Multipart) -> Result<Json<Uploaded>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let name = field
            .file_name()
            .and_then(safe_file_name)
            .ok_or_else(|| AppError::BadRequest("image has no usable file name".to_string()))?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        let dir = &state.config().picture_dir;
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| AppError::Internal(format!("create {}: {e}", dir.display())))?;
        tokio::fs::write(dir.join(&name), &bytes)
            .await
            .map_err(|e| AppError::Internal(format!("write {name}: {e}")))?;

        tracing::info!(picture = %name, size = bytes.len(), "Stored picture");
        return Ok(Json(Uploaded { picture: name }));
    }

    Err(AppError::BadRequest(format!(
        "missing file field '{IMAGE_FIELD}'"
    )))
}

/// Serve a stored picture.
pub async fn show(
    State(state): State<AppState>,
    UrlPath(name): UrlPath<String>,
    request: Request,
) -> Result<Response> {
    let name = safe_file_name(&name).ok_or_else(|| AppError::NotFound(name.clone()))?;
    let path = state.config().picture_dir.join(name);

    match ServeFile::new(path).oneshot(request).await {
        Ok(response) => Ok(response.into_response()),
        Err(never) => match never {},
    }
}

/// Final path component of `name`, if it is a plain file name.
fn safe_file_name(name: &str) -> Option<String> {
    let file_name = Path::new(name).file_name()?.to_str()?;
    if file_name.is_empty() || file_name.starts_with('.') {
        return None;
    }
    Some(file_name.to_string())
}
