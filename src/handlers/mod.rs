use axum::http::HeaderMap;
use serde_json::json;

use crate::auth::extract_bearer;
use crate::error::ApiError;
use crate::AppState;

pub mod entries;
pub mod stats;

/// Resolve the requesting identity for this request.
///
/// With a configured resolver every operation requires a bearer token and
/// fails closed on any resolution failure. Without one the server is a
/// single global tenant and identity is implicit.
pub async fn request_identity(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Option<String>, ApiError> {
    match &state.identity {
        Some(resolver) => {
            let token = extract_bearer(headers)?;
            let user_id = resolver.resolve(&token).await?;
            Ok(Some(user_id))
        }
        None => Ok(None),
    }
}

/// GET /health - liveness plus a database ping
pub async fn health(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match sqlx::query("SELECT 1").execute(state.store.pool()).await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "status": "degraded",
                "timestamp": now,
                "database_error": e.to_string()
            })),
        ),
    }
}
