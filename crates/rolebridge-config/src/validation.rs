// SPDX-FileCopyrightText: 2026 Rolebridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as URL schemes, non-empty identifiers, and retry bounds.

use crate::diagnostic::ConfigError;
use crate::model::RolebridgeConfig;

/// Upper bound for `upstream.max_retries`.
pub const MAX_RETRIES_LIMIT: u32 = 5;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
///
/// A missing `upstream.api_key` is accepted: the first upstream call fails
/// instead and surfaces through the normal error paths.
pub fn validate_config(config: &RolebridgeConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.server.host.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "server.host must not be empty".to_string(),
        });
    }

    let base_url = config.upstream.base_url.trim();
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        errors.push(ConfigError::Validation {
            message: format!(
                "upstream.base_url `{base_url}` must start with http:// or https://"
            ),
        });
    }

    if config.upstream.model.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "upstream.model must not be empty".to_string(),
        });
    }

    if config.upstream.max_retries > MAX_RETRIES_LIMIT {
        errors.push(ConfigError::Validation {
            message: format!(
                "upstream.max_retries must be at most {MAX_RETRIES_LIMIT}, got {}",
                config.upstream.max_retries
            ),
        });
    }

    if config.upstream.timeout_secs == Some(0) {
        errors.push(ConfigError::Validation {
            message: "upstream.timeout_secs must be greater than 0 when set".to_string(),
        });
    }

    for (direction, prompt) in &config.directions {
        if direction.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: "directions keys must not be empty".to_string(),
            });
        }
        if prompt.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("directions.{direction} must have a non-empty prompt"),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
