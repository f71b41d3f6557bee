// SPDX-FileCopyrightText: 2026 Rolebridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rolebridge - streams LLM rewrites between product and developer phrasing.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rolebridge_config::{ConfigError, RolebridgeConfig};

/// Rolebridge - streams LLM rewrites between product and developer phrasing.
#[derive(Parser, Debug)]
#[command(name = "rolebridge", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP server (default).
    Serve,
    /// Validate the configuration and print the effective values.
    CheckConfig,
}

fn load_config(path: Option<&PathBuf>) -> Result<RolebridgeConfig, Vec<ConfigError>> {
    match path {
        Some(path) => rolebridge_config::load_and_validate_path(path),
        None => rolebridge_config::load_and_validate(),
    }
}

/// The configuration as TOML with the API key masked.
fn redacted_toml(config: &RolebridgeConfig) -> Result<String, toml::ser::Error> {
    let mut shown = config.clone();
    if shown.upstream.api_key.is_some() {
        shown.upstream.api_key = Some("[redacted]".to_string());
    }
    toml::to_string_pretty(&shown)
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_ref()) {
        Ok(config) => config,
        Err(errors) => {
            rolebridge_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
        Commands::CheckConfig => match redacted_toml(&config) {
            Ok(rendered) => {
                eprintln!("rolebridge: configuration is valid");
                print!("{rendered}");
            }
            Err(e) => {
                eprintln!("error: failed to render configuration: {e}");
                std::process::exit(1);
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        // Only jemalloc supports advancing the stats epoch.
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["rolebridge"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn check_config_accepts_explicit_path() {
        let cli =
            Cli::try_parse_from(["rolebridge", "check-config", "--config", "/tmp/r.toml"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::CheckConfig)));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/r.toml")));
    }

    #[test]
    fn explicit_config_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rolebridge.toml");
        std::fs::write(&path, "[server]\nport = 9100\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.server.port, 9100);
    }

    #[test]
    fn invalid_config_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rolebridge.toml");
        std::fs::write(&path, "[upstream]\nbase_url = \"ftp://nope\"\n").unwrap();

        assert!(load_config(Some(&path)).is_err());
    }

    #[test]
    fn redacted_toml_masks_api_key() {
        let mut config = RolebridgeConfig::default();
        config.upstream.api_key = Some("sk-secret".to_string());

        let rendered = redacted_toml(&config).unwrap();
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("[redacted]"));
        assert!(rendered.contains("qwen-plus"));
    }
}
