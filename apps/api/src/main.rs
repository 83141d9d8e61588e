mod auth;
mod backend;
mod candidates;
mod config;
mod errors;
mod interviews;
mod models;
mod pipeline;
mod routes;
mod state;
mod store;
mod validation;

#[cfg(test)]
mod testing;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::backend::BackendClient;
use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::RestStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Fails fast when BACKEND_URL or BACKEND_ANON_KEY is missing
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CareerWeek API v{}", env!("CARGO_PKG_VERSION"));

    // One client for both tables and auth; the anon key rides on every request
    let backend = BackendClient::new(&config.backend_url, &config.backend_anon_key)?;

    let state = AppState {
        store: Arc::new(RestStore::new(backend.clone())),
        auth: Arc::new(backend),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins to SITE_URL once the frontend is deployed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
