// SPDX-FileCopyrightText: 2026 Rolebridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for rolebridge.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Top-level rolebridge configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RolebridgeConfig {
    /// HTTP listener and static asset settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Upstream chat-completion API settings.
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Extra or overriding direction -> system prompt entries.
    #[serde(default)]
    pub directions: BTreeMap<String, String>,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory holding `index.html` and the assets mounted under `/static`.
    #[serde(default = "default_static_dir")]
    pub static_dir: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
            log_level: default_log_level(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_static_dir() -> String {
    "static".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Upstream chat-completion API configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct UpstreamConfig {
    /// API key sent as a bearer token. `None` sends unauthenticated requests.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL of an OpenAI-compatible API (`/chat/completions` is appended).
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model identifier used for every request.
    #[serde(default = "default_model")]
    pub model: String,

    /// Request timeout in seconds. `None` keeps the HTTP client default.
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Retries on transient upstream statuses. `0` means a single attempt.
    #[serde(default)]
    pub max_retries: u32,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            timeout_secs: None,
            max_retries: 0,
        }
    }
}

impl std::fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

fn default_base_url() -> String {
    "https://dashscope.aliyuncs.com/compatible-mode/v1".to_string()
}

fn default_model() -> String {
    "qwen-plus".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_api_key() {
        let upstream = UpstreamConfig {
            api_key: Some("sk-secret".into()),
            ..UpstreamConfig::default()
        };
        let debug = format!("{upstream:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("[redacted]"));
    }

    #[test]
    fn directions_table_deserializes() {
        let toml_str = r#"
[directions]
qa_to_dev = "Rewrite QA findings for developers."
"#;
        let config: RolebridgeConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.directions.get("qa_to_dev").map(String::as_str),
            Some("Rewrite QA findings for developers.")
        );
    }

    #[test]
    fn unknown_server_key_is_rejected() {
        let toml_str = r#"
[server]
prot = 9000
"#;
        assert!(toml::from_str::<RolebridgeConfig>(toml_str).is_err());
    }
}
