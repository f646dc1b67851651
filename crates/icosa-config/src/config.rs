//! Configuration sections with defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const FILE_NAME: &str = "config.ron";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Sphere geometry and registry limits.
    pub registry: RegistryConfig,
    /// Tile sampling.
    pub mesh: MeshConfig,
    /// Path search.
    pub path: PathConfig,
    /// Logging.
    pub debug: DebugConfig,
}

/// Tile registry settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RegistryConfig {
    /// Sphere radius in world units.
    pub base_radius: f64,
    /// Sphere centre in world space.
    pub center: [f64; 3],
    /// Largest tile count a single depth may hold.
    pub max_tiles: usize,
    /// Depth precomputed at startup.
    pub default_depth: u8,
}

/// Mesh sampling settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MeshConfig {
    /// Samples per tile edge (at least 2).
    pub resolution: u32,
}

/// Path search settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PathConfig {
    /// Longest path, in nodes, a query may return.
    pub buffer_capacity: usize,
}

/// Debug/development settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log filter directive (e.g. "debug", "info,icosa_geo=trace").
    pub log_level: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            base_radius: 1.0,
            center: [0.0; 3],
            max_tiles: 1 << 21,
            default_depth: 3,
        }
    }
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self { resolution: 8 }
    }
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: 1024,
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

impl Config {
    /// Platform config directory for the icosa tools, e.g.
    /// `~/.config/icosa` on Linux.
    pub fn default_dir() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|d| d.join("icosa"))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Load `config.ron` from `config_dir`, writing a default one if absent.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(FILE_NAME);

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save as `config.ron` in `config_dir`, creating the directory.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);
        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(config_dir.join(FILE_NAME), serialized).map_err(ConfigError::WriteError)
    }

    /// Re-read the file: `Some(new)` if it differs from `self`, else `None`.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let contents =
            std::fs::read_to_string(config_dir.join(FILE_NAME)).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if new_config != *self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}
