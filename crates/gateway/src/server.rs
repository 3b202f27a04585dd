use std::net::SocketAddr;

use {
    axum::{
        Router,
        response::{IntoResponse, Json},
        routing::{get, post},
    },
    tower_http::cors::{Any, CorsLayer},
    tracing::{info, warn},
};

use wagate_config::WagateConfig;

use crate::{api, state::AppState, webhook};

/// Build the relay router (shared between production startup and tests).
pub fn build_app(state: AppState) -> Router {
    // Wide-open CORS so a separately hosted UI can consume the API.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/webhook",
            get(webhook::verify_handler).post(webhook::receive_handler),
        )
        .route("/api/conversations", get(api::conversations_handler))
        .route("/api/messages/{wa_id}", get(api::messages_handler))
        .route("/api/send", post(api::send_handler))
        .layer(cors)
        .with_state(state)
}

/// Start the relay HTTP server. Runs until the process is stopped.
pub async fn start_gateway(config: WagateConfig) -> anyhow::Result<()> {
    for diagnostic in wagate_config::validate(&config) {
        warn!(field = diagnostic.field, "{}", diagnostic.message);
    }

    let addr: SocketAddr = format!("{}:{}", config.server.bind, config.server.port).parse()?;
    let state = AppState::new(&config);
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        %addr,
        api_base = %config.whatsapp.api_base,
        "wagate gateway listening"
    );
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
