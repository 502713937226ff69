//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/treeboard/treeboard.toml`
//! 3. Explicit config file (`--config`)
//! 4. Environment variables: `TREEBOARD_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::{ApplicationError, ApplicationResult};
use crate::application::drag::DEFAULT_ACTIVATION_DISTANCE;

/// Simulated child loader settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoaderConfig {
    /// Artificial latency per load in milliseconds
    pub delay_ms: u64,
    /// Fewest children a load produces
    pub min_children: usize,
    /// Most children a load produces
    pub max_children: usize,
    /// Probability (0..=1) that a load fails
    pub failure_rate: f64,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            delay_ms: 1000,
            min_children: 1,
            max_children: 4,
            failure_rate: 0.0,
        }
    }
}

/// Pointer sensor settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DragConfig {
    /// Pointer travel in px before a press becomes a drag
    pub activation_distance: f32,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            activation_distance: DEFAULT_ACTIVATION_DISTANCE,
        }
    }
}

/// Raw loader config for intermediate parsing (Option to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawLoaderConfig {
    pub delay_ms: Option<u64>,
    pub min_children: Option<usize>,
    pub max_children: Option<usize>,
    pub failure_rate: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawDragConfig {
    pub activation_distance: Option<f32>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub loader: RawLoaderConfig,
    pub drag: RawDragConfig,
}

/// Unified configuration for treeboard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Settings {
    pub loader: LoaderConfig,
    pub drag: DragConfig,
}

/// Get the XDG config directory for treeboard.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "treeboard").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("treeboard.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> ApplicationResult<RawSettings> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

impl Settings {
    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        let loader = &overlay.loader;
        Self {
            loader: LoaderConfig {
                delay_ms: loader.delay_ms.unwrap_or(self.loader.delay_ms),
                min_children: loader.min_children.unwrap_or(self.loader.min_children),
                max_children: loader.max_children.unwrap_or(self.loader.max_children),
                failure_rate: loader.failure_rate.unwrap_or(self.loader.failure_rate),
            },
            drag: DragConfig {
                activation_distance: overlay
                    .drag
                    .activation_distance
                    .unwrap_or(self.drag.activation_distance),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `explicit` - Optional config file given on the command line; must exist
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/treeboard/treeboard.toml`
    /// 3. Explicit config file
    /// 4. Environment variables: `TREEBOARD_<SECTION>__<KEY>`, e.g. `TREEBOARD_LOADER__DELAY_MS`
    pub fn load(explicit: Option<&Path>) -> ApplicationResult<Self> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        if let Some(path) = explicit {
            let raw = load_raw_settings(path)?;
            current = current.merge_with(&raw);
        }

        current = Self::apply_env_overrides(current)?;
        current.validate()?;
        Ok(current)
    }

    /// Apply TREEBOARD_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> ApplicationResult<Self> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("TREEBOARD")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get::<u64>("loader.delay_ms") {
            settings.loader.delay_ms = val;
        }
        if let Ok(val) = config.get::<usize>("loader.min_children") {
            settings.loader.min_children = val;
        }
        if let Ok(val) = config.get::<usize>("loader.max_children") {
            settings.loader.max_children = val;
        }
        if let Ok(val) = config.get::<f64>("loader.failure_rate") {
            settings.loader.failure_rate = val;
        }
        if let Ok(val) = config.get::<f32>("drag.activation_distance") {
            settings.drag.activation_distance = val;
        }

        Ok(settings)
    }

    /// Reject settings the loader or the drag sensor cannot work with.
    pub fn validate(&self) -> ApplicationResult<()> {
        if self.loader.min_children > self.loader.max_children {
            return Err(ApplicationError::Config {
                message: format!(
                    "loader.min_children ({}) exceeds loader.max_children ({})",
                    self.loader.min_children, self.loader.max_children
                ),
            });
        }
        if !(0.0..=1.0).contains(&self.loader.failure_rate) {
            return Err(ApplicationError::Config {
                message: format!(
                    "loader.failure_rate must be within 0..=1, got {}",
                    self.loader.failure_rate
                ),
            });
        }
        if !(self.drag.activation_distance >= 0.0) {
            return Err(ApplicationError::Config {
                message: format!(
                    "drag.activation_distance must be non-negative, got {}",
                    self.drag.activation_distance
                ),
            });
        }
        Ok(())
    }

    /// Render as TOML (for `config show`).
    pub fn to_toml(&self) -> ApplicationResult<String> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize settings: {}", e),
        })
    }
}
