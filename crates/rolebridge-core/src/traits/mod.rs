// SPDX-FileCopyrightText: 2026 Rolebridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait definitions at the seam between rolebridge and the upstream model API.

pub mod provider;

pub use provider::{ChunkStream, CompletionProvider};
