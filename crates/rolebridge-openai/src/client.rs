// SPDX-FileCopyrightText: 2026 Rolebridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for OpenAI-compatible chat-completion APIs.
//!
//! Provides [`OpenAiClient`] which handles request construction,
//! authentication, streaming SSE responses, and optional transient retry.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use rolebridge_config::UpstreamConfig;
use rolebridge_core::{ChunkStream, CompletionRequest, CompletionResponse, RolebridgeError};
use tracing::{debug, warn};

use crate::sse;
use crate::types::{ApiErrorResponse, ChatCompletionRequest, ChatCompletionResponse};

/// Pause between attempts when a transient status is retried.
const RETRY_DELAY: Duration = Duration::from_secs(1);

/// HTTP client for one upstream endpoint and model.
///
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    max_retries: u32,
}

impl OpenAiClient {
    /// Creates a client for `<base_url>/chat/completions`.
    ///
    /// Without an API key no `Authorization` header is sent. Without a
    /// timeout the reqwest default applies.
    pub fn new(
        api_key: Option<&str>,
        base_url: &str,
        model: impl Into<String>,
        timeout: Option<Duration>,
        max_retries: u32,
    ) -> Result<Self, RolebridgeError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(key) = api_key {
            let value = HeaderValue::from_str(&format!("Bearer {key}")).map_err(|e| {
                RolebridgeError::Config(format!("invalid API key header value: {e}"))
            })?;
            headers.insert(AUTHORIZATION, value);
        }

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| RolebridgeError::Upstream {
            message: format!("failed to build HTTP client: {e}"),
            source: Some(Box::new(e)),
        })?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            model: model.into(),
            max_retries,
        })
    }

    /// Creates a client from the `[upstream]` configuration section.
    pub fn from_config(config: &UpstreamConfig) -> Result<Self, RolebridgeError> {
        Self::new(
            config.api_key.as_deref(),
            &config.base_url,
            config.model.clone(),
            config.timeout_secs.map(Duration::from_secs),
            config.max_retries,
        )
    }

    /// Returns the model identifier sent with every request.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Returns the full chat-completions URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends a non-streaming request and returns the first choice.
    pub async fn complete_chat(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, RolebridgeError> {
        let response = self.send(&self.wire_request(request, false)).await?;

        let body = response.text().await.map_err(|e| RolebridgeError::Upstream {
            message: format!("failed to read response body: {e}"),
            source: Some(Box::new(e)),
        })?;
        let parsed: ChatCompletionResponse =
            serde_json::from_str(&body).map_err(|e| RolebridgeError::Upstream {
                message: format!("failed to parse API response: {e}"),
                source: Some(Box::new(e)),
            })?;

        let Some(choice) = parsed.choices.into_iter().next() else {
            return Err(RolebridgeError::upstream(
                "upstream response contained no choices",
            ));
        };

        Ok(CompletionResponse {
            id: parsed.id,
            model: parsed.model,
            content: choice.message.content,
            finish_reason: choice.finish_reason,
        })
    }

    /// Sends a streaming request and returns the parsed chunk stream.
    ///
    /// Errors before the first byte of the body (connection, non-2xx status)
    /// are returned here; later failures arrive as stream items.
    pub async fn stream_chat(
        &self,
        request: &CompletionRequest,
    ) -> Result<ChunkStream, RolebridgeError> {
        let response = self.send(&self.wire_request(request, true)).await?;
        Ok(sse::parse_chunk_stream(response))
    }

    fn wire_request(&self, request: &CompletionRequest, stream: bool) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: request.messages.clone(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            stream,
        }
    }

    /// Posts the body, retrying transient statuses up to `max_retries` times.
    async fn send(
        &self,
        body: &ChatCompletionRequest,
    ) -> Result<reqwest::Response, RolebridgeError> {
        let mut attempt = 0;
        loop {
            let response = self
                .client
                .post(&self.endpoint)
                .json(body)
                .send()
                .await
                .map_err(|e| RolebridgeError::Upstream {
                    message: format!("HTTP request failed: {e}"),
                    source: Some(Box::new(e)),
                })?;

            let status = response.status();
            debug!(status = %status, attempt, stream = body.stream, "upstream response received");

            if status.is_success() {
                return Ok(response);
            }

            let text = error_body_text(response.text().await);
            if is_transient_error(status) && attempt < self.max_retries {
                attempt += 1;
                warn!(
                    status = %status,
                    body = %text,
                    attempt,
                    "transient upstream error, will retry"
                );
                tokio::time::sleep(RETRY_DELAY).await;
                continue;
            }

            return Err(error_from_body(status, &text));
        }
    }
}

/// The body of a failed response, or a note on why it could not be read.
fn error_body_text(body: Result<String, reqwest::Error>) -> String {
    match body {
        Ok(text) => text,
        Err(e) => format!("<unreadable body: {e}>"),
    }
}

/// Builds an upstream error, preferring the API's own message when present.
fn error_from_body(status: reqwest::StatusCode, body: &str) -> RolebridgeError {
    let message = match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(api_err) => format!("API returned {status}: {}", api_err.error),
        Err(_) => format!("API returned {status}: {body}"),
    };
    RolebridgeError::upstream(message)
}

/// Returns true for HTTP status codes that indicate transient errors worth retrying.
fn is_transient_error(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 502 | 503)
}
