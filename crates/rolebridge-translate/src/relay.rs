// SPDX-FileCopyrightText: 2026 Rolebridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Streaming completion relay.
//!
//! [`relay`] returns a lazy stream: the upstream call is opened on first
//! poll, each upstream text delta becomes one `Content` event in arrival
//! order, and the stream ends with exactly one `Done` or `Error`. Dropping
//! the stream drops the upstream response body and releases the connection.

use std::sync::Arc;

use futures::stream::{self, Stream, StreamExt};

use rolebridge_core::{
    ChatMessage, ChunkStream, CompletionEvent, CompletionProvider, CompletionRequest,
    RolebridgeError,
};

use crate::prompts::PromptTable;

/// Sampling temperature for translations.
pub const TRANSLATE_TEMPERATURE: f32 = 0.7;

/// Output limit for translations.
pub const TRANSLATE_MAX_TOKENS: u32 = 2000;

/// Trim surrounding whitespace and reject input that is then empty.
pub fn validate_content(content: &str) -> Result<String, RolebridgeError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(RolebridgeError::EmptyContent);
    }
    Ok(trimmed.to_string())
}

/// A validated translation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslateRequest {
    pub content: String,
    pub direction: String,
}

impl TranslateRequest {
    /// Validates `content`; the direction is checked by [`TranslateRequest::system_prompt`].
    pub fn new(content: &str, direction: &str) -> Result<Self, RolebridgeError> {
        Ok(Self {
            content: validate_content(content)?,
            direction: direction.to_string(),
        })
    }

    pub fn system_prompt<'a>(&self, prompts: &'a PromptTable) -> Result<&'a str, RolebridgeError> {
        prompts.resolve(&self.direction)
    }
}

/// Validate a translation and return its event stream.
///
/// Validation runs before anything is sent upstream: empty content is
/// checked first, then the direction.
pub fn start_translation(
    provider: Arc<dyn CompletionProvider>,
    prompts: &PromptTable,
    content: &str,
    direction: &str,
) -> Result<impl Stream<Item = CompletionEvent> + Send + use<>, RolebridgeError> {
    let request = TranslateRequest::new(content, direction)?;
    let system_prompt = request.system_prompt(prompts)?.to_string();
    tracing::info!(
        direction = %request.direction,
        chars = request.content.chars().count(),
        "starting translation"
    );
    Ok(relay(provider, system_prompt, request.content))
}

fn translation_request(system_prompt: String, content: String) -> CompletionRequest {
    CompletionRequest {
        messages: vec![ChatMessage::system(system_prompt), ChatMessage::user(content)],
        temperature: TRANSLATE_TEMPERATURE,
        max_tokens: TRANSLATE_MAX_TOKENS,
    }
}

enum RelayState {
    Connect {
        provider: Arc<dyn CompletionProvider>,
        request: CompletionRequest,
    },
    Streaming {
        upstream: ChunkStream,
        emitted: usize,
    },
    Finished,
}

fn error_event(err: RolebridgeError, emitted: usize) -> CompletionEvent {
    tracing::warn!(error = %err, fragments = emitted, "translation stream failed");
    CompletionEvent::Error {
        message: err.to_string(),
    }
}

/// Relay one streaming completion as [`CompletionEvent`]s.
///
/// `content` is sent as-is; callers validate it first. Upstream units with
/// no text (role headers, finish markers) are skipped. Failures while
/// opening or reading become a single `Error` event.
pub fn relay(
    provider: Arc<dyn CompletionProvider>,
    system_prompt: String,
    content: String,
) -> impl Stream<Item = CompletionEvent> + Send + 'static {
    let request = translation_request(system_prompt, content);
    stream::unfold(
        RelayState::Connect { provider, request },
        |mut state| async move {
            loop {
                state = match state {
                    RelayState::Connect { provider, request } => {
                        match provider.stream(request).await {
                            Ok(upstream) => RelayState::Streaming {
                                upstream,
                                emitted: 0,
                            },
                            Err(e) => return Some((error_event(e, 0), RelayState::Finished)),
                        }
                    }
                    RelayState::Streaming {
                        mut upstream,
                        emitted,
                    } => match upstream.next().await {
                        Some(Ok(chunk)) => match chunk.text {
                            Some(text) if !text.is_empty() => {
                                let next = RelayState::Streaming {
                                    upstream,
                                    emitted: emitted + 1,
                                };
                                return Some((CompletionEvent::Content { text }, next));
                            }
                            _ => RelayState::Streaming { upstream, emitted },
                        },
                        Some(Err(e)) => {
                            return Some((error_event(e, emitted), RelayState::Finished));
                        }
                        None => {
                            tracing::debug!(fragments = emitted, "translation stream complete");
                            return Some((CompletionEvent::Done, RelayState::Finished));
                        }
                    },
                    RelayState::Finished => return None,
                };
            }
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rolebridge_core::{ChatRole, StreamChunk};
    use rolebridge_test_utils::{MockProvider, StreamScript};

    fn content(text: &str) -> CompletionEvent {
        CompletionEvent::Content { text: text.into() }
    }

    #[test]
    fn validate_content_trims_and_rejects_blank() {
        assert_eq!(validate_content("  hello \n").unwrap(), "hello");
        assert!(matches!(
            validate_content(" \t\n"),
            Err(RolebridgeError::EmptyContent)
        ));
        assert!(matches!(validate_content(""), Err(RolebridgeError::EmptyContent)));
    }

    #[test]
    fn empty_content_checked_before_direction() {
        let err = TranslateRequest::new("   ", "nowhere").unwrap_err();
        assert!(matches!(err, RolebridgeError::EmptyContent));
    }

    #[tokio::test]
    async fn fragments_pass_through_in_order_then_done() {
        let mock = Arc::new(MockProvider::with_fragments(&["Fix ", "the ", "NPE"]));
        let events: Vec<_> = relay(mock.clone(), "sys".into(), "text".into())
            .collect()
            .await;
        assert_eq!(
            events,
            vec![content("Fix "), content("the "), content("NPE"), CompletionEvent::Done]
        );
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn sends_system_and_user_messages_with_fixed_sampling() {
        let mock = Arc::new(MockProvider::new());
        let _: Vec<_> = relay(mock.clone(), "be a dev".into(), "make it pop".into())
            .collect()
            .await;

        let requests = mock.requests().await;
        assert_eq!(requests.len(), 1);
        let req = &requests[0];
        assert_eq!(req.messages.len(), 2);
        assert_eq!(req.messages[0].role, ChatRole::System);
        assert_eq!(req.messages[0].content, "be a dev");
        assert_eq!(req.messages[1].role, ChatRole::User);
        assert_eq!(req.messages[1].content, "make it pop");
        assert_eq!(req.temperature, TRANSLATE_TEMPERATURE);
        assert_eq!(req.max_tokens, TRANSLATE_MAX_TOKENS);
    }

    #[tokio::test]
    async fn textless_and_empty_units_are_skipped() {
        let mock = Arc::new(MockProvider::new());
        mock.push_stream(StreamScript::Chunks(vec![
            StreamChunk::default(),
            StreamChunk::text("a"),
            StreamChunk::text(""),
            StreamChunk {
                text: None,
                finish_reason: Some("stop".into()),
            },
        ]))
        .await;
        let events: Vec<_> = relay(mock, "s".into(), "c".into()).collect().await;
        assert_eq!(events, vec![content("a"), CompletionEvent::Done]);
    }

    #[tokio::test]
    async fn empty_upstream_stream_is_just_done() {
        let mock = Arc::new(MockProvider::new());
        mock.push_stream(StreamScript::Chunks(vec![])).await;
        let events: Vec<_> = relay(mock, "s".into(), "c".into()).collect().await;
        assert_eq!(events, vec![CompletionEvent::Done]);
    }

    #[tokio::test]
    async fn open_failure_is_single_error_event() {
        let mock = Arc::new(MockProvider::new());
        mock.push_stream(StreamScript::FailToOpen("connection refused".into()))
            .await;
        let events: Vec<_> = relay(mock, "s".into(), "c".into()).collect().await;
        assert_eq!(events.len(), 1);
        match &events[0] {
            CompletionEvent::Error { message } => assert!(message.contains("connection refused")),
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn mid_stream_failure_ends_with_error_and_no_done() {
        let mock = Arc::new(MockProvider::new());
        mock.push_stream(StreamScript::ChunksThenError(
            vec![StreamChunk::text("one"), StreamChunk::text("two")],
            "reset by peer".into(),
        ))
        .await;
        let events: Vec<_> = relay(mock, "s".into(), "c".into()).collect().await;

        assert_eq!(events.len(), 3);
        assert_eq!(events[0], content("one"));
        assert_eq!(events[1], content("two"));
        assert!(matches!(events[2], CompletionEvent::Error { .. }));
        assert_eq!(events.iter().filter(|e| e.is_terminal()).count(), 1);
    }

    #[tokio::test]
    async fn nothing_sent_until_first_poll() {
        let mock = Arc::new(MockProvider::new());
        let stream = relay(mock.clone(), "s".into(), "c".into());
        assert_eq!(mock.calls(), 0);
        drop(stream);
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn dropping_relay_releases_upstream() {
        let mock = Arc::new(MockProvider::new());
        mock.push_stream(StreamScript::Hang(StreamChunk::text("first")))
            .await;
        let mut stream = Box::pin(relay(mock.clone(), "s".into(), "c".into()));
        assert_eq!(stream.next().await, Some(content("first")));
        assert!(!mock.stream_dropped());
        drop(stream);
        assert!(mock.stream_dropped());
    }

    #[tokio::test]
    async fn start_translation_rejects_before_calling_upstream() {
        let mock = Arc::new(MockProvider::new());
        let prompts = PromptTable::builtin();

        let empty = start_translation(mock.clone(), &prompts, "  ", "product_to_dev");
        assert!(matches!(empty, Err(RolebridgeError::EmptyContent)));

        let unknown = start_translation(mock.clone(), &prompts, "hello", "sideways");
        assert!(matches!(
            unknown,
            Err(RolebridgeError::UnsupportedDirection { .. })
        ));
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn start_translation_sends_trimmed_content_and_resolved_prompt() {
        let mock = Arc::new(MockProvider::with_fragments(&["ok"]));
        let prompts = PromptTable::builtin();
        let events: Vec<_> =
            start_translation(mock.clone(), &prompts, "  Fix NPE  ", "dev_to_product")
                .unwrap()
                .collect()
                .await;
        assert_eq!(events, vec![content("ok"), CompletionEvent::Done]);

        let req = &mock.requests().await[0];
        assert_eq!(req.messages[0].content, prompts.resolve("dev_to_product").unwrap());
        assert_eq!(req.messages[1].content, "Fix NPE");
    }
}
