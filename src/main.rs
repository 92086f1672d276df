//! hydra-hook-gateway server entry point.
//!
//! Starts the Axum HTTP server with REST and WebSocket endpoints.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use hydra_hook_gateway::api;
use hydra_hook_gateway::app_state::AppState;
use hydra_hook_gateway::config::GatewayConfig;
use hydra_hook_gateway::domain::EventBus;
use hydra_hook_gateway::orchestrator::{HttpPoolManager, InMemoryPoolManager, PoolManager};
use hydra_hook_gateway::persistence::{PostgresPersistence, spawn_event_log};
use hydra_hook_gateway::service::HookGateway;
use hydra_hook_gateway::ws::handler::ws_handler;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = GatewayConfig::from_env().context("loading configuration")?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if config.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
    tracing::info!(addr = %config.listen_addr, "starting hydra-hook-gateway");

    // Orchestrator boundary
    let pool_manager: Arc<dyn PoolManager> = match &config.orchestrator_url {
        Some(url) => {
            tracing::info!(%url, "forwarding fee updates to remote pool manager");
            Arc::new(HttpPoolManager::new(
                url,
                Duration::from_millis(config.orchestrator_timeout_ms),
            )?)
        }
        None => {
            tracing::warn!("ORCHESTRATOR_URL unset, fee updates stay in memory");
            Arc::new(InMemoryPoolManager::new())
        }
    };

    // Build gateway; refuses to start with a partial identity
    let event_bus = EventBus::new(config.event_bus_capacity);
    let gateway = Arc::new(
        HookGateway::new(config.gateway_settings(), pool_manager, event_bus.clone())
            .context("gateway identity check failed")?,
    );

    let mut app_state = AppState::new(gateway);

    // Optional event log
    if config.persistence_enabled {
        let persistence = PostgresPersistence::connect(&config).await?;
        persistence.migrate().await?;
        let _writer = spawn_event_log(persistence.clone(), &event_bus);
        app_state = app_state.with_persistence(persistence);
        tracing::info!("event log enabled");
    }

    // Build router
    let app = Router::new()
        .merge(api::build_router())
        .route("/ws", get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
