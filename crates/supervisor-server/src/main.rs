//! supervisor-server
//!
//! Axum server exposing `getNextResponseFromSupervisor` to front-line voice
//! agents, backed by the TransAsia Logistics desk tools.

mod handlers;
mod state;

use std::sync::Arc;

use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use logistics_desk::{Directory, SUPERVISOR_INSTRUCTIONS, SampleDirectory, register_tools};
use supervisor_core::{Supervisor, SupervisorConfig, ToolRegistry};
use supervisor_runtime::ResponsesClient;

use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    // Completion client
    let client = ResponsesClient::from_env()?;
    if client.config().api_key.is_none() {
        tracing::warn!("⚠ OPENAI_API_KEY not set - requests go out without authorization");
    }
    tracing::info!("Completion endpoint: {}", client.config().endpoint());

    // Desk tools
    let directory: Arc<dyn Directory> = Arc::new(SampleDirectory::new());
    let mut tools = ToolRegistry::new();
    register_tools(&mut tools, &directory);

    tracing::info!("Registered {} tools from {}:", tools.len(), directory.name());
    for name in tools.names() {
        tracing::info!("  • {}", name);
    }

    let config = SupervisorConfig::from_env()?;
    tracing::info!(
        model = %config.model,
        max_rounds = config.max_rounds,
        round_timeout = ?config.round_timeout,
        "Supervisor configured"
    );

    let supervisor = Supervisor::new(
        Arc::new(client),
        Arc::new(tools),
        SUPERVISOR_INSTRUCTIONS,
        config,
    );

    let state = AppState {
        supervisor: Arc::new(supervisor),
    };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = handlers::router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("🚀 supervisor-server running on http://{}", addr);
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health                        - Health check");
    tracing::info!("  GET  /api/tools                     - Declared supervisor tools");
    tracing::info!("  POST /api/supervisor/next-response  - Delegate a user turn");

    axum::serve(listener, app).await?;

    Ok(())
}
