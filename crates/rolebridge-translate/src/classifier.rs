// SPDX-FileCopyrightText: 2026 Rolebridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Product/developer phrasing classification.
//!
//! One short non-streaming upstream call per request. Failures never
//! propagate: they map to [`Role::Unknown`] with the error text attached.

use std::sync::Arc;

use rolebridge_core::{ChatMessage, CompletionProvider, CompletionRequest, Role};

use crate::prompts::AUTO_DETECT_PROMPT;

/// Sampling temperature for classification.
pub const DETECT_TEMPERATURE: f32 = 0.1;

/// Output limit for classification; the answer is a single word.
pub const DETECT_MAX_TOKENS: u32 = 10;

/// Result of classifying a piece of text.
///
/// `Unknown` is returned both for blank input and for upstream failure;
/// only the latter carries an `error`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub role: Role,
    pub error: Option<String>,
}

impl Classification {
    fn of(role: Role) -> Self {
        Self { role, error: None }
    }

    fn failed(error: impl Into<String>) -> Self {
        Self {
            role: Role::Unknown,
            error: Some(error.into()),
        }
    }
}

/// Reduce the model's answer: `Product` if it mentions "product", else `Dev`.
pub fn role_from_answer(answer: &str) -> Role {
    if answer.trim().to_lowercase().contains("product") {
        Role::Product
    } else {
        Role::Dev
    }
}

/// Classify `content` with one call to `provider`.
pub async fn classify(provider: &dyn CompletionProvider, content: &str) -> Classification {
    let content = content.trim();
    if content.is_empty() {
        return Classification::of(Role::Unknown);
    }

    let request = CompletionRequest {
        messages: vec![
            ChatMessage::system(AUTO_DETECT_PROMPT),
            ChatMessage::user(content),
        ],
        temperature: DETECT_TEMPERATURE,
        max_tokens: DETECT_MAX_TOKENS,
    };

    match provider.complete(request).await {
        Ok(response) => match response.content {
            Some(answer) => {
                let role = role_from_answer(&answer);
                tracing::debug!(answer = %answer.trim(), role = %role, "classified content");
                Classification::of(role)
            }
            None => {
                tracing::warn!(response_id = %response.id, "classifier answer had no content");
                Classification::failed("upstream returned no content")
            }
        },
        Err(e) => {
            tracing::warn!(error = %e, "classification failed");
            Classification::failed(e.to_string())
        }
    }
}

/// Classifier bound to a shared provider.
#[derive(Clone)]
pub struct RoleClassifier {
    provider: Arc<dyn CompletionProvider>,
}

impl RoleClassifier {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self { provider }
    }

    pub async fn classify(&self, content: &str) -> Classification {
        classify(self.provider.as_ref(), content).await
    }
}
