//! Commodity route handlers.

use axum::{
    Json,
    extract::{Request, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use bazaar_core::Commodity;
use tracing::instrument;

use super::classify::{CommodityTarget, classify_commodity};
use super::comments;
use super::form::FormFields;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Prefix stripped from item paths before classification.
const ITEM_PREFIX: &str = "/commodities/";

/// List all commodities.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Commodity>>> {
    let commodities = state.commodities().list().await?;
    tracing::debug!(count = commodities.len(), "Listed commodities");
    Ok(Json(commodities))
}

/// Create or replace a commodity from a submitted form.
///
/// Serves every non-GET method on `/commodities`.
#[instrument(skip(state, form))]
pub async fn upsert(State(state): State<AppState>, form: FormFields) -> Result<StatusCode> {
    let commodity = Commodity {
        name: form.require("name")?.to_string(),
        introduction: form.text("introduction"),
        picture: form.text("picture"),
        price: form.price(state.config().form_policy)?,
    };

    if commodity.name.trim().is_empty() {
        return Err(AppError::BadRequest("commodity name must not be empty".to_string()));
    }

    state.commodities().upsert(&commodity).await?;
    tracing::info!(name = %commodity.name, price = %commodity.price, "Upserted commodity");
    Ok(StatusCode::OK)
}

/// Dispatch `/commodities/{suffix}` to the commodity or its comments.
#[instrument(skip(state, request), fields(path = %request.uri().path()))]
pub async fn item(State(state): State<AppState>, request: Request) -> Result<Response> {
    let suffix = request
        .uri()
        .path()
        .strip_prefix(ITEM_PREFIX)
        .unwrap_or_default()
        .to_string();

    match classify_commodity(&suffix) {
        CommodityTarget::Comments(commodity) => comments::dispatch(state, commodity, request).await,
        CommodityTarget::Item(name) => {
            if request.method() != Method::GET {
                return Err(AppError::MethodNotAllowed);
            }
            let commodity = state.commodities().get(&name).await?;
            Ok(Json(commodity).into_response())
        }
    }
}
