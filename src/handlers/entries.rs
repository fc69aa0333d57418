use axum::{extract::State, http::HeaderMap};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::database::ListFilter;
use crate::extract::{Json, Path, Query};
use crate::entries::color::score_to_color;
use crate::entries::{local_today, validate_create, validate_date_param, validate_update, Entry};
use crate::error::ApiError;
use crate::AppState;

use super::request_identity;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    pub limit: Option<i64>,
}

/// POST /entries - create one entry
pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<Value>,
) -> Result<Json<Entry>, ApiError> {
    let user_id = request_identity(&state, &headers).await?;

    let mut new = validate_create(&payload)?;
    let date = new.date.clone().unwrap_or_else(local_today);
    if new.color.is_none() {
        new.color = Some(score_to_color(new.score).to_hex());
    }

    let entry = state.store.create(user_id.as_deref(), &date, &new).await?;
    Ok(Json(entry))
}

/// GET /entries - list entries, date desc then id desc
pub async fn list(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Entry>>, ApiError> {
    let user_id = request_identity(&state, &headers).await?;

    let filter = ListFilter {
        from: query
            .from
            .as_deref()
            .map(|v| validate_date_param("from", v))
            .transpose()?,
        to: query
            .to
            .as_deref()
            .map(|v| validate_date_param("to", v))
            .transpose()?,
        limit: query.limit,
    };

    let entries = state.store.list(user_id.as_deref(), &filter).await?;
    Ok(Json(entries))
}

/// PUT /entries/:id - partial update; only fields present in the body change
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(payload): Json<Value>,
) -> Result<Json<Entry>, ApiError> {
    let user_id = request_identity(&state, &headers).await?;

    let mut patch = validate_update(&payload)?;
    // a changed score re-derives the display color unless one was supplied
    if let (Some(score), None) = (patch.score, &patch.color) {
        patch.color = Some(score_to_color(score).to_hex());
    }

    match state.store.update(id, user_id.as_deref(), &patch).await? {
        Some(entry) => Ok(Json(entry)),
        None => Err(ApiError::not_found("entry not found")),
    }
}

/// DELETE /entries/:id - idempotent delete
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let user_id = request_identity(&state, &headers).await?;

    state.store.delete(id, user_id.as_deref()).await?;
    Ok(Json(json!({ "success": true })))
}
