//! Configuration loading and typed config structures.
//!
//! The canonical configuration lives in `territorial-config.yaml` next
//! to the binary's working directory. This module defines strongly-typed
//! structs mirroring the YAML structure; every field has a default
//! matching the stock game, so an absent file runs the standard
//! 1200x800, 250-square world.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use territorial_types::{GAME_HEIGHT, GAME_WIDTH, NUM_SQUARES};

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// World dimensions and population.
    #[serde(default)]
    pub world: WorldConfig,

    /// Asset and cache locations.
    #[serde(default)]
    pub assets: AssetsConfig,

    /// Observer server settings.
    #[serde(default)]
    pub server: ServerSettings,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_yml::from_str(&contents)?)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yml::from_str(yaml)?)
    }
}

/// World-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// Grid width in cells.
    #[serde(default = "default_width")]
    pub width: usize,

    /// Grid height in cells.
    #[serde(default = "default_height")]
    pub height: usize,

    /// Random seed for world generation and the game RNG.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Number of squares to spawn at init.
    #[serde(default = "default_num_squares")]
    pub num_squares: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            seed: default_seed(),
            num_squares: default_num_squares(),
        }
    }
}

/// Asset and cache locations.
///
/// With no `data_dir`, base rasters are synthesized from the seed; with
/// one configured, a missing raster file aborts startup. With no
/// `cities_file`, squares get generated names.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct AssetsConfig {
    /// Directory holding the four base raster assets.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Directory for the derived world-map cache.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,

    /// Path to `world_cities.csv`.
    #[serde(default)]
    pub cities_file: Option<PathBuf>,
}

/// Observer server settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerSettings {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_width() -> usize {
    GAME_WIDTH
}

fn default_height() -> usize {
    GAME_HEIGHT
}

fn default_seed() -> u64 {
    42
}

fn default_num_squares() -> usize {
    NUM_SQUARES
}

fn default_host() -> String {
    String::from("0.0.0.0")
}

fn default_port() -> u16 {
    8080
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_stock_game() {
        let config = SimulationConfig::default();
        assert_eq!(config.world.width, 1200);
        assert_eq!(config.world.height, 800);
        assert_eq!(config.world.num_squares, 250);
        assert_eq!(config.server.port, 8080);
        assert!(config.assets.data_dir.is_none());
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let config = SimulationConfig::parse(
            "world:\n  width: 300\n  height: 200\nserver:\n  port: 9000\n",
        )
        .unwrap();
        assert_eq!(config.world.width, 300);
        assert_eq!(config.world.height, 200);
        assert_eq!(config.world.num_squares, 250);
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn asset_paths_parse() {
        let config = SimulationConfig::parse(
            "assets:\n  data_dir: data\n  cache_dir: cache\n  cities_file: data/world_cities.csv\n",
        )
        .unwrap();
        assert_eq!(config.assets.data_dir, Some(PathBuf::from("data")));
        assert_eq!(config.assets.cache_dir, Some(PathBuf::from("cache")));
        assert_eq!(
            config.assets.cities_file,
            Some(PathBuf::from("data/world_cities.csv"))
        );
    }

    #[test]
    fn bad_yaml_is_a_parse_error() {
        let result = SimulationConfig::parse("world: [not, a, map]");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = SimulationConfig::from_file(Path::new("/nonexistent/config.yaml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
