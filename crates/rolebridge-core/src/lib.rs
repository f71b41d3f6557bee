// SPDX-FileCopyrightText: 2026 Rolebridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for rolebridge.
//!
//! Holds the error type, the domain types shared by every crate, and the
//! [`CompletionProvider`] trait that separates the translation core from the
//! upstream chat-completion API.

pub mod error;
pub mod traits;
pub mod types;

pub use error::RolebridgeError;
pub use traits::{ChunkStream, CompletionProvider};
pub use types::{
    ChatMessage, ChatRole, CompletionEvent, CompletionRequest, CompletionResponse, Role,
    StreamChunk,
};
