// SPDX-FileCopyrightText: 2026 Rolebridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for rolebridge.

use thiserror::Error;

/// The error type shared by the provider trait, the translation core, and the gateway.
#[derive(Debug, Error)]
pub enum RolebridgeError {
    /// Configuration errors (bad header values, unusable URLs, invalid settings).
    #[error("configuration error: {0}")]
    Config(String),

    /// Upstream completion API errors (network failure, API error, malformed response).
    #[error("upstream error: {message}")]
    Upstream {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The request carried no content once surrounding whitespace was removed.
    #[error("please enter the content to translate")]
    EmptyContent,

    /// The requested direction has no system prompt.
    #[error("unsupported direction: {direction}")]
    UnsupportedDirection { direction: String },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl RolebridgeError {
    /// Shorthand for an upstream error without an underlying source.
    pub fn upstream(message: impl Into<String>) -> Self {
        RolebridgeError::Upstream {
            message: message.into(),
            source: None,
        }
    }

    /// True for errors caused by the caller's input rather than by a fault.
    ///
    /// Validation errors are detected before anything is sent upstream.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            RolebridgeError::EmptyContent | RolebridgeError::UnsupportedDirection { .. }
        )
    }
}
