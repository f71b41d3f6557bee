// SPDX-FileCopyrightText: 2026 Rolebridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Translation core for rolebridge.
//!
//! - [`prompts`] maps a direction to its system prompt.
//! - [`relay`] turns one upstream streaming completion into an ordered
//!   sequence of [`CompletionEvent`](rolebridge_core::CompletionEvent)s.
//! - [`classifier`] reduces a short upstream answer to a [`Role`](rolebridge_core::Role).
//!
//! Nothing here knows about HTTP; the gateway frames the results.

pub mod classifier;
pub mod prompts;
pub mod relay;

pub use classifier::{
    Classification, DETECT_MAX_TOKENS, DETECT_TEMPERATURE, RoleClassifier, classify,
    role_from_answer,
};
pub use prompts::{AUTO_DETECT_PROMPT, DEV_TO_PRODUCT, PRODUCT_TO_DEV, PromptTable};
pub use relay::{
    TRANSLATE_MAX_TOKENS, TRANSLATE_TEMPERATURE, TranslateRequest, relay, start_translation,
    validate_content,
};
