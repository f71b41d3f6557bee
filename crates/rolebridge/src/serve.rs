// SPDX-FileCopyrightText: 2026 Rolebridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `rolebridge serve` implementation.
//!
//! Builds the upstream provider and the prompt table once, then hands them
//! to the gateway as shared read-only state.

use std::sync::Arc;

use rolebridge_config::RolebridgeConfig;
use rolebridge_core::{CompletionProvider, RolebridgeError};
use rolebridge_gateway::GatewayState;
use rolebridge_openai::OpenAiProvider;
use rolebridge_translate::PromptTable;

/// Runs the HTTP server until it fails or the process is stopped.
pub async fn run_serve(config: RolebridgeConfig) -> Result<(), RolebridgeError> {
    init_tracing(&config.server.log_level);

    let provider: Arc<dyn CompletionProvider> = Arc::new(OpenAiProvider::new(&config.upstream)?);
    let prompts = PromptTable::from_config(&config);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        provider = provider.name(),
        model = provider.model(),
        directions = ?prompts.directions(),
        "rolebridge starting"
    );

    let state = GatewayState::new(provider, prompts, &config.server.static_dir);
    rolebridge_gateway::start_server(&config.server, state).await
}

/// Initialize the tracing subscriber. `RUST_LOG` takes precedence over the
/// configured level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("rolebridge={log_level},tower_http={log_level},warn"))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
