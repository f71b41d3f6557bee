// SPDX-FileCopyrightText: 2026 Rolebridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for rolebridge.
//!
//! Provides a scriptable fake upstream so the translation core and the
//! gateway can be tested without network access.
//!
//! - [`MockProvider`] - [`CompletionProvider`](rolebridge_core::CompletionProvider)
//!   with scripted streams, scripted completions, and call recording

pub mod mock_provider;

pub use mock_provider::{MockProvider, StreamScript};
