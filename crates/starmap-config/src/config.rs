//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const APP_NAME: &str = "starmap";

/// Top-level star map configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Per-star visual settings.
    pub star: StarConfig,
    /// Galaxy-wide settings shared by every star.
    pub galaxy: GalaxyConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// How a star reconciles its facets with the scene on each sync.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SyncMode {
    /// Tear down and rebuild every facet on every sync.
    #[default]
    Rebuild,
    /// Rebuild only the facets whose visual descriptor changed.
    Reconcile,
}

/// Star visual configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StarConfig {
    /// Scale applied to the star's root container.
    pub base_scale: f32,
    /// Multiplier on `base_scale` for home stars.
    pub home_star_scale: f32,
    /// Radius of the circular hit region, in local units.
    pub hit_radius: f32,
    /// Facet reconciliation strategy.
    pub sync_mode: SyncMode,
}

/// Galaxy-wide configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GalaxyConfig {
    /// Seed for resource rolls and cosmetic randomness. `None` = entropy.
    pub seed: Option<u64>,
    /// Player colours, indexed by `player_id % 8`.
    pub palette: Vec<u32>,
    /// Player shape names, indexed by `player_id / 8`.
    pub shapes: Vec<String>,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for StarConfig {
    fn default() -> Self {
        Self {
            base_scale: 0.25,
            home_star_scale: 2.0,
            hit_radius: 32.0,
            sync_mode: SyncMode::Rebuild,
        }
    }
}

impl Default for GalaxyConfig {
    fn default() -> Self {
        Self {
            seed: None,
            palette: vec![
                0x0000ff, 0x009fdf, 0x40c000, 0xffc000, 0xdf5f00, 0xc00000, 0xc000c0, 0x6000c0,
            ],
            shapes: ["circle", "square", "diamond", "hexagon"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Platform configuration directory for the star map
/// (XDG on Linux, Known Folders on Windows, Library on macOS).
pub fn default_config_dir() -> Result<PathBuf, ConfigError> {
    let base = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    Ok(base.join(APP_NAME))
}

const CONFIG_FILE: &str = "config.ron";

fn read_config(path: &Path) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    ron::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn write_error(path: &Path) -> impl FnOnce(std::io::Error) -> ConfigError + use<> {
    let path = path.to_path_buf();
    move |source| ConfigError::Write { path, source }
}

impl Config {
    /// Loads `config.ron` from `config_dir`, writing the defaults first if the
    /// file does not exist yet.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if !config_path.exists() {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            return Ok(config);
        }

        let config = read_config(&config_path)?;
        log::info!("Loaded config from {}", config_path.display());
        Ok(config)
    }

    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(write_error(config_dir))?;

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .enumerate_arrays(false);
        let serialized = ron::ser::to_string_pretty(self, pretty)?;

        let config_path = config_dir.join(CONFIG_FILE);
        std::fs::write(&config_path, serialized).map_err(write_error(&config_path))
    }

    /// Re-reads the file; `Some` only when its contents differ from `self`.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let fresh = read_config(&config_dir.join(CONFIG_FILE))?;
        if fresh == *self {
            return Ok(None);
        }
        log::info!("Config reloaded with changes");
        Ok(Some(fresh))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(ron_str.contains("base_scale: 0.25"));
        assert!(ron_str.contains("sync_mode: rebuild"));
    }

    #[test]
    fn test_default_palette_covers_eight_players() {
        let galaxy = GalaxyConfig::default();
        assert_eq!(galaxy.palette.len(), 8);
        assert_eq!(galaxy.shapes[0], "circle");
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.galaxy.seed = Some(42);
        config.star.sync_mode = SyncMode::Reconcile;
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_section_uses_default() {
        let ron_str = "(star: (hit_radius: 40.0))";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.star.hit_radius, 40.0);
        assert_eq!(config.star.base_scale, 0.25);
        assert_eq!(config.galaxy, GalaxyConfig::default());
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(future_setting: true)");
        assert!(result.is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.star.base_scale = 0.5;
        config.galaxy.seed = Some(7);

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_or_create_writes_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join("config.ron").exists());
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let mut modified = config.clone();
        modified.star.sync_mode = SyncMode::Reconcile;
        modified.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert_eq!(result.unwrap().star.sync_mode, SyncMode::Reconcile);
    }

    #[test]
    fn test_reload_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        assert!(config.reload(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_corrupt_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.ron"), "{{not valid}}").unwrap();

        let err = Config::load_or_create(dir.path()).unwrap_err();
        let ConfigError::Parse { path, .. } = &err else {
            panic!("expected parse error, got {err:?}");
        };
        assert_eq!(path, &dir.path().join("config.ron"));
    }
}
