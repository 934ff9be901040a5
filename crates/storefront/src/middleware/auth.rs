//! Bearer token extraction.
//!
//! Reads `Authorization: Bearer <token>` without judging it; verification
//! against the user's secret happens in the cart handler once the username is
//! known from the path.

use axum::http::{HeaderMap, header::AUTHORIZATION};

const BEARER_PREFIX: &str = "bearer ";

/// Token from an `Authorization: Bearer <token>` header.
///
/// The scheme is matched case-insensitively. A header with another scheme, no
/// token or non-ASCII bytes yields `None`.
#[must_use]
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let scheme = value.get(..BEARER_PREFIX.len())?;
    if !scheme.eq_ignore_ascii_case(BEARER_PREFIX) {
        return None;
    }
    value
        .get(BEARER_PREFIX.len()..)
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
