// SPDX-FileCopyrightText: 2026 Rolebridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SSE stream parser for OpenAI-compatible streaming chat completions.
//!
//! Upstream frames are `data: {json}` lines ending with a literal
//! `data: [DONE]`. The `eventsource-stream` crate handles SSE framing; this
//! module maps each frame to a [`StreamChunk`].

use eventsource_stream::{Event, EventStreamError, Eventsource};
use futures::future;
use futures::stream::StreamExt;
use rolebridge_core::{ChunkStream, RolebridgeError, StreamChunk};

use crate::types::{ApiError, ChatCompletionChunk};

/// Terminal marker of an OpenAI-style event stream.
pub const DONE_MARKER: &str = "[DONE]";

/// Parses a streaming response body into [`StreamChunk`]s.
///
/// The stream ends at `[DONE]` or when the body closes, whichever comes
/// first. Transport failures, malformed JSON, and in-band `{"error": ...}`
/// frames are yielded as [`RolebridgeError::Upstream`].
pub fn parse_chunk_stream(response: reqwest::Response) -> ChunkStream {
    let chunks = response
        .bytes_stream()
        .eventsource()
        .take_while(|result| {
            future::ready(!matches!(result, Ok(event) if event.data.trim() == DONE_MARKER))
        })
        .filter_map(|result| future::ready(parse_event(result)));

    Box::pin(chunks)
}

fn parse_event(
    result: Result<Event, EventStreamError<reqwest::Error>>,
) -> Option<Result<StreamChunk, RolebridgeError>> {
    match result {
        Ok(event) if event.data.trim().is_empty() => None,
        Ok(event) => Some(parse_data(&event.data)),
        Err(e) => Some(Err(RolebridgeError::upstream(format!(
            "failed to read upstream stream: {e}"
        )))),
    }
}

/// Converts the payload of one `data:` frame into a [`StreamChunk`].
///
/// Only the first choice is read. Frames without choices (usage reports)
/// produce a chunk with no text.
pub fn parse_data(data: &str) -> Result<StreamChunk, RolebridgeError> {
    let value: serde_json::Value =
        serde_json::from_str(data).map_err(|e| RolebridgeError::Upstream {
            message: format!("failed to parse upstream stream frame: {e}"),
            source: Some(Box::new(e)),
        })?;

    if let Some(error) = value.get("error") {
        let message = serde_json::from_value::<ApiError>(error.clone())
            .map(|api| api.to_string())
            .unwrap_or_else(|_| error.to_string());
        return Err(RolebridgeError::upstream(message));
    }

    let chunk: ChatCompletionChunk =
        serde_json::from_value(value).map_err(|e| RolebridgeError::Upstream {
            message: format!("unexpected upstream stream frame: {e}"),
            source: Some(Box::new(e)),
        })?;

    let choice = chunk.choices.into_iter().next();
    Ok(match choice {
        Some(choice) => StreamChunk {
            text: choice.delta.content,
            finish_reason: choice.finish_reason,
        },
        None => StreamChunk::default(),
    })
}
