//! Places search endpoint handler.

use axum::{extract::State, Json};
use domain::models::place::SearchRequest;
use domain::models::PlaceResult;
use domain::services::search_places;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::JsonBody;
use crate::middleware::metrics;

/// POST /api/search
///
/// Returns a bare JSON array of places in provider order.
pub async fn search(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<SearchRequest>,
) -> Result<Json<Vec<PlaceResult>>, ApiError> {
    request.validate()?;

    let results = search_places(
        state.places.as_ref(),
        request.location.trim(),
        request.business_type.trim(),
    )
    .await?;
    metrics::record_place_search(results.len());

    Ok(Json(results))
}
