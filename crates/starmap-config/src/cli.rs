//! Command-line argument parsing for the star map.

use std::path::PathBuf;

use clap::Parser;

use crate::{Config, SyncMode};

/// Star map command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "starmap", about = "Star map renderer")]
pub struct CliArgs {
    /// Galaxy seed for resource rolls and pulsar rotation.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Facet reconciliation strategy.
    #[arg(long, value_enum)]
    pub sync_mode: Option<SyncMode>,

    /// Root scale applied to every star.
    #[arg(long)]
    pub base_scale: Option<f32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(seed) = args.seed {
            self.galaxy.seed = Some(seed);
        }
        if let Some(mode) = args.sync_mode {
            self.star.sync_mode = mode;
        }
        if let Some(scale) = args.base_scale {
            self.star.base_scale = scale;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            seed: Some(99),
            sync_mode: Some(SyncMode::Reconcile),
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.galaxy.seed, Some(99));
        assert_eq!(config.star.sync_mode, SyncMode::Reconcile);
        // Non-overridden fields retain defaults
        assert_eq!(config.star.base_scale, 0.25);
        assert_eq!(config.debug.log_level, "info");
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_cli_parses_flags() {
        let args = CliArgs::try_parse_from([
            "starmap",
            "--sync-mode",
            "reconcile",
            "--base-scale",
            "0.5",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(args.sync_mode, Some(SyncMode::Reconcile));
        assert_eq!(args.base_scale, Some(0.5));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
    }
}
