//! API index route handler.

use std::collections::BTreeMap;

use axum::{Json, extract::State};

use crate::state::AppState;

/// Endpoint names and their URL templates, relative to the base URL.
const ENDPOINTS: &[(&str, &str)] = &[
    ("all_commodities_url", "/commodities"),
    ("post_commodity_url", "/commodities"),
    ("get_commodity_info_url", "/commodities/{commodity}"),
    ("get_comment_url", "/commodities/{commodity}/comments"),
    ("post_comment_url", "/commodities/{commodity}/comments"),
    ("delete_comment_url", "/commodities/{commodity}/comments"),
    ("update_comment_url", "/commodities/{commodity}/comments"),
    ("get_all_users_url", "/users"),
    ("user_register_url", "/users/register"),
    ("get_a_user_url", "/users/{user}"),
    ("get_user_cart_url", "/users/{user}/cart"),
    ("update_user_cart_url", "/users/{user}/cart"),
    ("get_picture_url", "/picture/{picture}"),
    ("post_picture_url", "/picture/upload"),
];

/// Map of API endpoint names to absolute URL templates.
#[must_use]
pub fn api_index(base_url: &str) -> BTreeMap<&'static str, String> {
    let base = base_url.trim_end_matches('/');
    ENDPOINTS
        .iter()
        .map(|(name, path)| (*name, format!("{base}{path}")))
        .collect()
}

/// Show the API index.
pub async fn show(State(state): State<AppState>) -> Json<BTreeMap<&'static str, String>> {
    Json(api_index(&state.config().base_url))
}
