use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod auth;
pub mod config;
pub mod database;
pub mod entries;
pub mod error;
pub mod extract;
pub mod handlers;

use auth::IdentityResolver;
use database::EntryStore;

/// Shared application state: the store handle is built once at startup and
/// owned here; the resolver is present only in multi-tenant deployments.
#[derive(Clone)]
pub struct AppState {
    pub store: EntryStore,
    pub identity: Option<Arc<dyn IdentityResolver>>,
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/entries",
            post(handlers::entries::create).get(handlers::entries::list),
        )
        .route(
            "/entries/:id",
            put(handlers::entries::update).delete(handlers::entries::delete),
        )
        .route("/stats", get(handlers::stats::stats))
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
