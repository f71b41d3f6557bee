// SPDX-FileCopyrightText: 2026 Rolebridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock upstream provider for deterministic testing.
//!
//! `MockProvider` implements `CompletionProvider` with pre-configured
//! streams and completions, and records every request it receives.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use futures::{StreamExt, stream};
use tokio::sync::Mutex;

use rolebridge_core::{
    ChunkStream, CompletionProvider, CompletionRequest, CompletionResponse, RolebridgeError,
    StreamChunk,
};

/// Scripted behaviour for one `stream()` call.
#[derive(Debug, Clone)]
pub enum StreamScript {
    /// The call is refused before any chunk (connection or status failure).
    FailToOpen(String),
    /// These chunks are yielded in order, then the stream ends cleanly.
    Chunks(Vec<StreamChunk>),
    /// These chunks are yielded in order, then one error item.
    ChunksThenError(Vec<StreamChunk>, String),
    /// One chunk is yielded, then the stream stays open forever.
    Hang(StreamChunk),
}

/// A mock provider that replays scripted responses.
///
/// Streams and completions are popped from FIFO queues. An empty stream
/// queue yields a single "mock response" fragment; an empty completion
/// queue answers "mock response".
pub struct MockProvider {
    streams: Mutex<VecDeque<StreamScript>>,
    completions: Mutex<VecDeque<Result<Option<String>, String>>>,
    requests: Mutex<Vec<CompletionRequest>>,
    calls: AtomicUsize,
    stream_dropped: Arc<AtomicBool>,
}

impl MockProvider {
    /// Create a mock provider with empty queues.
    pub fn new() -> Self {
        Self::from_queues(VecDeque::new(), VecDeque::new())
    }

    /// Create a mock whose next stream yields these text fragments.
    pub fn with_fragments(fragments: &[&str]) -> Self {
        let script =
            StreamScript::Chunks(fragments.iter().map(|f| StreamChunk::text(*f)).collect());
        Self::from_queues(VecDeque::from([script]), VecDeque::new())
    }

    /// Create a mock whose next completion answers with `text`.
    pub fn with_completion(text: &str) -> Self {
        Self::from_queues(VecDeque::new(), VecDeque::from([Ok(Some(text.to_string()))]))
    }

    fn from_queues(
        streams: VecDeque<StreamScript>,
        completions: VecDeque<Result<Option<String>, String>>,
    ) -> Self {
        Self {
            streams: Mutex::new(streams),
            completions: Mutex::new(completions),
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            stream_dropped: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Queue the behaviour of the next `stream()` call.
    pub async fn push_stream(&self, script: StreamScript) {
        self.streams.lock().await.push_back(script);
    }

    /// Queue the next `complete()` answer.
    pub async fn push_completion(&self, text: &str) {
        self.completions
            .lock()
            .await
            .push_back(Ok(Some(text.to_string())));
    }

    /// Queue a `complete()` answer whose first choice has no content.
    pub async fn push_empty_completion(&self) {
        self.completions.lock().await.push_back(Ok(None));
    }

    /// Queue a `complete()` failure.
    pub async fn push_completion_error(&self, message: &str) {
        self.completions
            .lock()
            .await
            .push_back(Err(message.to_string()));
    }

    /// Number of upstream calls made so far (both modes).
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every request received, in call order.
    pub async fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().await.clone()
    }

    /// True once a stream handed out by this mock has been dropped.
    pub fn stream_dropped(&self) -> bool {
        self.stream_dropped.load(Ordering::SeqCst)
    }

    async fn record(&self, request: CompletionRequest) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().await.push(request);
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// Sets its flag when dropped; travels inside a scripted stream.
struct DropFlag(Arc<AtomicBool>);

impl DropFlag {
    fn hold(&self) {}
}

impl Drop for DropFlag {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl CompletionProvider for MockProvider {
    fn name(&self) -> &str {
        "mock-provider"
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, RolebridgeError> {
        self.record(request).await;
        let next = self
            .completions
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok(Some("mock response".to_string())));

        match next {
            Ok(content) => Ok(CompletionResponse {
                id: format!("mock-resp-{}", self.calls()),
                model: self.model().to_string(),
                content,
                finish_reason: Some("stop".to_string()),
            }),
            Err(message) => Err(RolebridgeError::upstream(message)),
        }
    }

    async fn stream(&self, request: CompletionRequest) -> Result<ChunkStream, RolebridgeError> {
        self.record(request).await;
        let script = self
            .streams
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| StreamScript::Chunks(vec![StreamChunk::text("mock response")]));

        let items: Vec<Result<StreamChunk, RolebridgeError>> = match script {
            StreamScript::FailToOpen(message) => return Err(RolebridgeError::upstream(message)),
            StreamScript::Chunks(chunks) => chunks.into_iter().map(Ok).collect(),
            StreamScript::ChunksThenError(chunks, message) => chunks
                .into_iter()
                .map(Ok)
                .chain(std::iter::once(Err(RolebridgeError::upstream(message))))
                .collect(),
            StreamScript::Hang(chunk) => {
                let flag = DropFlag(Arc::clone(&self.stream_dropped));
                let pending = stream::pending::<Result<StreamChunk, RolebridgeError>>().map(
                    move |item| {
                        flag.hold();
                        item
                    },
                );
                return Ok(Box::pin(stream::iter(vec![Ok(chunk)]).chain(pending)));
            }
        };

        let flag = DropFlag(Arc::clone(&self.stream_dropped));
        Ok(Box::pin(stream::iter(items).map(move |item| {
            flag.hold();
            item
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rolebridge_core::ChatMessage;

    fn request() -> CompletionRequest {
        CompletionRequest {
            messages: vec![ChatMessage::user("hi")],
            temperature: 0.7,
            max_tokens: 2000,
        }
    }

    #[tokio::test]
    async fn default_stream_when_queue_empty() {
        let provider = MockProvider::new();
        let chunks: Vec<_> = provider.stream(request()).await.unwrap().collect().await;
        assert_eq!(chunks.len(), 1);
        assert_eq!(
            chunks[0].as_ref().unwrap().text.as_deref(),
            Some("mock response")
        );
    }

    #[tokio::test]
    async fn fragments_replay_in_order_and_calls_are_counted() {
        let provider = MockProvider::with_fragments(&["a", "b", "c"]);
        let texts: Vec<String> = provider
            .stream(request())
            .await
            .unwrap()
            .map(|c| c.unwrap().text.unwrap())
            .collect()
            .await;
        assert_eq!(texts, vec!["a", "b", "c"]);
        assert_eq!(provider.calls(), 1);
        assert_eq!(provider.requests().await[0].max_tokens, 2000);
    }

    #[tokio::test]
    async fn fail_to_open_returns_error() {
        let provider = MockProvider::new();
        provider
            .push_stream(StreamScript::FailToOpen("refused".into()))
            .await;
        assert!(provider.stream(request()).await.is_err());
    }

    #[tokio::test]
    async fn completion_queue_and_errors() {
        let provider = MockProvider::with_completion("product");
        provider.push_completion_error("boom").await;

        let first = provider.complete(request()).await.unwrap();
        assert_eq!(first.content.as_deref(), Some("product"));
        assert!(provider.complete(request()).await.is_err());
        assert_eq!(
            provider.complete(request()).await.unwrap().content.as_deref(),
            Some("mock response")
        );
    }

    #[tokio::test]
    async fn dropping_stream_sets_flag() {
        let provider = MockProvider::new();
        provider
            .push_stream(StreamScript::Hang(StreamChunk::text("first")))
            .await;
        let mut stream = provider.stream(request()).await.unwrap();
        assert!(stream.next().await.is_some());
        assert!(!provider.stream_dropped());
        drop(stream);
        assert!(provider.stream_dropped());
    }
}
