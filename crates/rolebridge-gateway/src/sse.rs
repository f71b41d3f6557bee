// SPDX-FileCopyrightText: 2026 Rolebridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Server-Sent Events framing for POST /api/translate.
//!
//! Each relay event becomes one `data:` line:
//! ```text
//! data: {"content":"partial text"}
//!
//! data: {"error":"upstream error: ..."}
//!
//! data: [DONE]
//! ```
//! `[DONE]` is sent only after a clean end; an error frame is final on its own.
//! No keep-alive comments are interleaved.

use std::convert::Infallible;

use axum::response::sse::{Event, Sse};
use futures::stream::{Stream, StreamExt};

use rolebridge_core::CompletionEvent;

/// Literal payload of the final frame of a successful stream.
pub const DONE_FRAME: &str = "[DONE]";

/// Frame one relay event.
pub fn to_event(event: &CompletionEvent) -> Event {
    match event {
        CompletionEvent::Content { text } => {
            Event::default().data(serde_json::json!({ "content": text }).to_string())
        }
        CompletionEvent::Error { message } => {
            Event::default().data(serde_json::json!({ "error": message }).to_string())
        }
        CompletionEvent::Done => Event::default().data(DONE_FRAME),
    }
}

/// Wrap a relay stream as an SSE response body.
pub fn event_stream(
    events: impl Stream<Item = CompletionEvent> + Send + 'static,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    Sse::new(events.map(|event| Ok(to_event(&event))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    async fn render(events: Vec<CompletionEvent>) -> String {
        let response = event_stream(futures::stream::iter(events)).into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn content_frames_keep_non_ascii_unescaped() {
        let body = render(vec![CompletionEvent::Content {
            text: "修复空指针".into(),
        }])
        .await;
        assert!(body.contains(r#"{"content":"修复空指针"}"#), "{body}");
    }

    #[tokio::test]
    async fn frames_are_data_lines_in_order() {
        let body = render(vec![
            CompletionEvent::Content { text: "a".into() },
            CompletionEvent::Content { text: "b".into() },
            CompletionEvent::Done,
        ])
        .await;
        let a = body.find(r#"{"content":"a"}"#).unwrap();
        let b = body.find(r#"{"content":"b"}"#).unwrap();
        let done = body.find(DONE_FRAME).unwrap();
        assert!(a < b && b < done, "{body}");
        assert_eq!(body.matches("data:").count(), 3);
        assert!(body.ends_with("\n\n"));
    }

    #[tokio::test]
    async fn error_frame_is_json_without_done() {
        let body = render(vec![CompletionEvent::Error {
            message: "upstream error: boom".into(),
        }])
        .await;
        assert!(body.contains(r#"{"error":"upstream error: boom"}"#));
        assert!(!body.contains(DONE_FRAME));
    }

    #[tokio::test]
    async fn content_with_newlines_stays_on_one_data_line() {
        let body = render(vec![CompletionEvent::Content {
            text: "line1\nline2".into(),
        }])
        .await;
        assert!(body.contains(r#"{"content":"line1\nline2"}"#));
        assert_eq!(body.matches("data:").count(), 1);
    }
}
