// SPDX-FileCopyrightText: 2026 Rolebridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./rolebridge.toml` > `~/.config/rolebridge/rolebridge.toml`
//! > `/etc/rolebridge/rolebridge.toml`, with environment variable overrides.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::RolebridgeConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/rolebridge/rolebridge.toml` (system-wide)
/// 3. `~/.config/rolebridge/rolebridge.toml` (user XDG config)
/// 4. `./rolebridge.toml` (local directory)
/// 5. Bare `API_KEY`, `BASE_URL`, `MODEL` environment variables
/// 6. `ROLEBRIDGE_*` environment variables
pub fn load_config() -> Result<RolebridgeConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
pub fn load_config_from_str(toml_content: &str) -> Result<RolebridgeConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RolebridgeConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<RolebridgeConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RolebridgeConfig::default()))
        .merge(Toml::file(path))
        .merge(legacy_env_provider())
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for config loading.
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(RolebridgeConfig::default()))
        .merge(Toml::file("/etc/rolebridge/rolebridge.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("rolebridge/rolebridge.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("rolebridge.toml"))
        .merge(legacy_env_provider())
        .merge(env_provider())
}

/// `ROLEBRIDGE_*` variables mapped section-by-section.
///
/// Uses `Env::map()` rather than `Env::split("_")` so that
/// `ROLEBRIDGE_UPSTREAM_API_KEY` maps to `upstream.api_key`, not `upstream.api.key`.
fn env_provider() -> Env {
    Env::prefixed("ROLEBRIDGE_").map(|key| {
        key.as_str()
            .replacen("server_", "server.", 1)
            .replacen("upstream_", "upstream.", 1)
            .replacen("directions_", "directions.", 1)
            .into()
    })
}

/// The unprefixed variables a bare deployment sets: `API_KEY`, `BASE_URL`, `MODEL`.
fn legacy_env_provider() -> Env {
    Env::raw().filter_map(|key| match key.as_str().to_ascii_lowercase().as_str() {
        "api_key" => Some("upstream.api_key".into()),
        "base_url" => Some("upstream.base_url".into()),
        "model" => Some("upstream.model".into()),
        _ => None,
    })
}
