use axum::{extract::State, http::HeaderMap, response::Json};

use crate::database::Stats;
use crate::error::ApiError;
use crate::AppState;

use super::request_identity;

/// GET /stats - count, average (one decimal), min and max over all
/// matching entries; avg/min/max are null when there are none.
pub async fn stats(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Stats>, ApiError> {
    let user_id = request_identity(&state, &headers).await?;

    let stats = state.store.stats(user_id.as_deref()).await?;
    Ok(Json(stats))
}
