use std::sync::Arc;

use daylog_api::auth::{HttpIdentityResolver, IdentityResolver};
use daylog_api::config::AppConfig;
use daylog_api::database::{self, EntryStore};
use daylog_api::{app, AppState};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, IDENTITY_URL, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env();

    let pool = database::connect(&config.database)
        .await
        .unwrap_or_else(|e| panic!("failed to connect to {}: {}", config.database.url, e));
    database::init_schema(&pool).await.expect("schema init");

    let store = EntryStore::new(pool, config.list.clone());

    let identity: Option<Arc<dyn IdentityResolver>> = match &config.identity_url {
        Some(url) => {
            tracing::info!("multi-tenant mode: identity service at {}", url);
            Some(Arc::new(HttpIdentityResolver::new(url.clone())))
        }
        None => {
            tracing::info!("single-tenant mode: no identity service configured");
            None
        }
    };

    let state = AppState {
        store: store.clone(),
        identity,
    };

    let bind_addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("daylog API listening on http://{}", bind_addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server");

    // Release the pool on shutdown
    store.close().await;
    tracing::info!("database pool closed");
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
