// SPDX-FileCopyrightText: 2026 Rolebridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the provider trait, the translation core, and the gateway.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// A single message in a chat-completion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    /// A system message carrying instruction text.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    /// A user message carrying the text to act on.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// A request to an upstream chat-completion API.
///
/// The model is not part of the request: it is resolved once at startup and
/// owned by the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// A non-streaming response from the upstream API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionResponse {
    pub id: String,
    pub model: String,
    /// Message text of the first returned choice.
    pub content: Option<String>,
    pub finish_reason: Option<String>,
}

/// One incremental unit of a streaming upstream response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamChunk {
    /// Text delta of the first choice, if the unit carried any.
    pub text: Option<String>,
    pub finish_reason: Option<String>,
}

impl StreamChunk {
    /// A chunk carrying a text delta.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            finish_reason: None,
        }
    }
}

/// One unit of the streamed translation protocol.
///
/// A relay emits zero or more `Content` events followed by exactly one of
/// `Done` or `Error`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionEvent {
    /// A non-empty text fragment, passed through at upstream granularity.
    Content { text: String },
    /// No further fragments will arrive.
    Done,
    /// The stream ended abnormally.
    Error { message: String },
}

impl CompletionEvent {
    /// True for `Done` and `Error`.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, CompletionEvent::Content { .. })
    }
}

/// Phrasing detected by the role classifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Product,
    Dev,
    /// Nothing to classify, or the upstream call failed.
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn chat_message_serializes_with_lowercase_role() {
        let json = serde_json::to_string(&ChatMessage::system("be terse")).unwrap();
        assert_eq!(json, r#"{"role":"system","content":"be terse"}"#);
    }

    #[test]
    fn role_display_and_serde_agree() {
        for role in [Role::Product, Role::Dev, Role::Unknown] {
            let shown = role.to_string();
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json, format!("\"{shown}\""));
            assert_eq!(Role::from_str(&shown).unwrap(), role);
        }
    }

    #[test]
    fn only_content_events_are_non_terminal() {
        assert!(!CompletionEvent::Content { text: "a".into() }.is_terminal());
        assert!(CompletionEvent::Done.is_terminal());
        assert!(
            CompletionEvent::Error {
                message: "x".into()
            }
            .is_terminal()
        );
    }
}
