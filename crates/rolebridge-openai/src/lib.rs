// SPDX-FileCopyrightText: 2026 Rolebridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI-compatible chat-completion provider for rolebridge.
//!
//! Implements [`CompletionProvider`] over any endpoint that speaks the
//! `/chat/completions` protocol (OpenAI, DashScope compatible mode, LiteLLM,
//! vLLM), in both streaming and non-streaming mode.

pub mod client;
pub mod sse;
pub mod types;

use async_trait::async_trait;
use rolebridge_config::UpstreamConfig;
use rolebridge_core::{
    ChunkStream, CompletionProvider, CompletionRequest, CompletionResponse, RolebridgeError,
};
use tracing::{debug, info, warn};

use crate::client::OpenAiClient;

/// [`CompletionProvider`] backed by an [`OpenAiClient`].
#[derive(Debug, Clone)]
pub struct OpenAiProvider {
    client: OpenAiClient,
}

impl OpenAiProvider {
    /// Creates the provider from the `[upstream]` configuration section.
    ///
    /// A missing API key is logged, not rejected: the first upstream call
    /// fails and surfaces through the normal error paths.
    pub fn new(config: &UpstreamConfig) -> Result<Self, RolebridgeError> {
        if config.api_key.is_none() {
            warn!("no upstream API key configured; requests will be sent unauthenticated");
        }

        let client = OpenAiClient::from_config(config)?;
        info!(
            model = %config.model,
            endpoint = %client.endpoint(),
            max_retries = config.max_retries,
            "upstream provider initialized"
        );

        Ok(Self { client })
    }

    /// Creates a provider around an existing client.
    pub fn with_client(client: OpenAiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai-compatible"
    }

    fn model(&self) -> &str {
        self.client.model()
    }

    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, RolebridgeError> {
        debug!(messages = request.messages.len(), "sending completion request");
        self.client.complete_chat(&request).await
    }

    async fn stream(&self, request: CompletionRequest) -> Result<ChunkStream, RolebridgeError> {
        debug!(messages = request.messages.len(), "opening streaming request");
        self.client.stream_chat(&request).await
    }
}
