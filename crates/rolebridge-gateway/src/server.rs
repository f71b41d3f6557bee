// SPDX-FileCopyrightText: 2026 Rolebridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use rolebridge_config::ServerConfig;
use rolebridge_core::{CompletionProvider, RolebridgeError};
use rolebridge_translate::PromptTable;

use crate::handlers;

/// Shared state for axum request handlers.
///
/// Everything here is read-only after startup and shared by all requests.
#[derive(Clone)]
pub struct GatewayState {
    /// The upstream completion API client.
    pub provider: Arc<dyn CompletionProvider>,
    /// Direction to system-prompt table.
    pub prompts: Arc<PromptTable>,
    /// Directory holding `index.html` and the `/static` assets.
    pub static_dir: PathBuf,
}

impl GatewayState {
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        prompts: PromptTable,
        static_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            provider,
            prompts: Arc::new(prompts),
            static_dir: static_dir.into(),
        }
    }
}

/// Build the gateway router.
///
/// Routes:
/// - GET / (browser shell)
/// - GET /static/* (static assets)
/// - POST /api/translate (event stream)
/// - POST /api/detect
/// - GET /api/directions
/// - GET /health
pub fn router(state: GatewayState) -> Router {
    let assets = ServeDir::new(&state.static_dir);

    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/api/translate", post(handlers::translate))
        .route("/api/detect", post(handlers::detect))
        .route("/api/directions", get(handlers::directions))
        .nest_service("/static", assets)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind to the configured host:port and serve until the process is stopped.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
) -> Result<(), RolebridgeError> {
    let static_dir = state.static_dir.display().to_string();
    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| RolebridgeError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!(addr = %addr, static_dir = %static_dir, "gateway listening");

    axum::serve(listener, app)
        .await
        .map_err(|e| RolebridgeError::Internal(format!("gateway server error: {e}")))?;

    Ok(())
}
