// SPDX-FileCopyrightText: 2026 Rolebridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Direction to system-prompt lookup.
//!
//! The table is built once at startup from the built-in directions plus any
//! `[directions]` entries in the configuration, and is read-only afterwards.

use std::collections::BTreeMap;

use rolebridge_config::RolebridgeConfig;
use rolebridge_core::RolebridgeError;

/// Direction key for product-manager phrasing rewritten for developers.
pub const PRODUCT_TO_DEV: &str = "product_to_dev";

/// Direction key for developer phrasing rewritten for product managers.
pub const DEV_TO_PRODUCT: &str = "dev_to_product";

const PRODUCT_TO_DEV_PROMPT: &str = "\
You are a senior engineer translating a product manager's request for a development team.
Rewrite the input as an engineering brief:
1. Restate the requirement precisely, naming the affected components, data, and interfaces.
2. List open technical questions and assumptions that must be confirmed.
3. Outline a plausible implementation approach and its main risks.
4. Give a rough effort estimate and the acceptance criteria a tester would check.
Keep the answer concise, use Markdown headings and bullet lists, and reply in the language of the input.";

const DEV_TO_PRODUCT_PROMPT: &str = "\
You are a product manager translating a developer's message for business stakeholders.
Rewrite the input in plain language:
1. Explain what changed or what is proposed, without jargon.
2. Describe the impact on users, customers, and the business.
3. Call out risks, trade-offs, and anything stakeholders must decide.
4. Mention timing or follow-up work when the input implies it.
Keep the answer concise, use Markdown headings and bullet lists, and reply in the language of the input.";

/// Instruction for the role classifier. The answer is reduced by substring
/// match, so the model is asked for a single word.
pub const AUTO_DETECT_PROMPT: &str = "\
Decide whether the following text was written from a product manager's perspective \
(business goals, user needs, features, priorities) or from a developer's perspective \
(code, systems, bugs, implementation details). \
Answer with exactly one word: product or dev.";

/// Immutable mapping from direction key to system prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTable {
    prompts: BTreeMap<String, String>,
}

impl PromptTable {
    /// The two built-in directions.
    pub fn builtin() -> Self {
        let prompts = [
            (PRODUCT_TO_DEV, PRODUCT_TO_DEV_PROMPT),
            (DEV_TO_PRODUCT, DEV_TO_PRODUCT_PROMPT),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        Self { prompts }
    }

    /// Add or replace directions. Entries with a blank prompt are ignored so
    /// a resolved prompt is never empty.
    pub fn with_overrides(mut self, overrides: &BTreeMap<String, String>) -> Self {
        for (direction, prompt) in overrides {
            if prompt.trim().is_empty() {
                tracing::warn!(direction = %direction, "ignoring direction with empty prompt");
                continue;
            }
            self.prompts.insert(direction.clone(), prompt.clone());
        }
        self
    }

    /// Built-in directions extended by the `[directions]` table.
    pub fn from_config(config: &RolebridgeConfig) -> Self {
        let table = Self::builtin().with_overrides(&config.directions);
        tracing::debug!(directions = table.len(), "prompt table built");
        table
    }

    /// Look up the system prompt for `direction` (exact match).
    pub fn resolve(&self, direction: &str) -> Result<&str, RolebridgeError> {
        self.prompts
            .get(direction)
            .map(String::as_str)
            .ok_or_else(|| RolebridgeError::UnsupportedDirection {
                direction: direction.to_string(),
            })
    }

    /// Supported direction keys in sorted order.
    pub fn directions(&self) -> Vec<&str> {
        self.prompts.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.prompts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prompts.is_empty()
    }
}

impl Default for PromptTable {
    fn default() -> Self {
        Self::builtin()
    }
}
