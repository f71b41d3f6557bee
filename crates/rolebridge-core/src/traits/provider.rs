// SPDX-FileCopyrightText: 2026 Rolebridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider trait for upstream chat-completion APIs.

use std::pin::Pin;

use async_trait::async_trait;
use futures_core::Stream;

use crate::error::RolebridgeError;
use crate::types::{CompletionRequest, CompletionResponse, StreamChunk};

/// Incremental units read from a streaming upstream call, in arrival order.
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<StreamChunk, RolebridgeError>> + Send>>;

/// An upstream chat-completion API.
///
/// One instance is built at startup and shared by reference across all
/// concurrent requests. Implementations hold no per-request mutable state.
#[async_trait]
pub trait CompletionProvider: Send + Sync + 'static {
    /// Returns the human-readable name of this provider.
    fn name(&self) -> &str;

    /// Returns the model identifier every request is sent with.
    fn model(&self) -> &str;

    /// Sends a non-streaming completion request and returns the full response.
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, RolebridgeError>;

    /// Opens a streaming completion request.
    ///
    /// Dropping the returned stream releases the upstream connection.
    async fn stream(&self, request: CompletionRequest) -> Result<ChunkStream, RolebridgeError>;
}
