//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/bpcalc/bpcalc.toml`
//! 3. Environment variables: `BPCALC_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::{ApplicationError, Language};
use crate::domain::Budget;

/// Unified configuration for bpcalc.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Weight budget for new packs and legacy files (kg)
    pub default_max_weight_kg: u32,
    /// Volume budget for new packs and legacy files (liters)
    pub default_max_volume_l: f64,
    /// Gear catalog replacing the built-in one
    pub catalog: Option<PathBuf>,
    /// Fit catalog replacing the built-in trail kit
    pub fit_catalog: Option<PathBuf>,
    /// Report language
    pub language: Language,
}

impl Default for Settings {
    fn default() -> Self {
        let budget = Budget::default();
        Self {
            default_max_weight_kg: budget.max_weight_kg,
            default_max_volume_l: budget.max_volume,
            catalog: None,
            fit_catalog: None,
            language: Language::default(),
        }
    }
}

/// Raw settings for intermediate parsing (`None` = not specified, keep base).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub default_max_weight_kg: Option<u32>,
    pub default_max_volume_l: Option<f64>,
    pub catalog: Option<PathBuf>,
    pub fit_catalog: Option<PathBuf>,
    pub language: Option<Language>,
}

/// Get the XDG config directory for bpcalc.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "bpcalc").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("bpcalc.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// Expand `~`, `$VAR` and `${VAR}`; unresolvable input is kept as is.
fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    shellexpand::full(raw.as_ref())
        .map(|s| PathBuf::from(s.into_owned()))
        .unwrap_or_else(|_| path.to_path_buf())
}

impl Settings {
    /// Load settings with layered precedence, reading the global config file
    /// from its XDG location.
    pub fn load() -> Result<Self, ApplicationError> {
        Self::load_from(global_config_path().as_deref())
    }

    /// Load settings with layered precedence from an explicit global config file.
    ///
    /// A missing file is not an error; a malformed one is.
    pub fn load_from(global_path: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config overrides what it specifies
        if let Some(path) = global_path {
            if path.exists() {
                let raw = load_raw_settings(path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Environment variables (explicit override)
        current = Self::apply_env_overrides(current)?;

        current.expand_paths();
        current.validate()?;
        Ok(current)
    }

    /// Scalar overlay: overlay wins if Some, otherwise keep base.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            default_max_weight_kg: overlay
                .default_max_weight_kg
                .unwrap_or(self.default_max_weight_kg),
            default_max_volume_l: overlay
                .default_max_volume_l
                .unwrap_or(self.default_max_volume_l),
            catalog: overlay.catalog.clone().or_else(|| self.catalog.clone()),
            fit_catalog: overlay
                .fit_catalog
                .clone()
                .or_else(|| self.fit_catalog.clone()),
            language: overlay.language.unwrap_or(self.language),
        }
    }

    /// Apply BPCALC_* environment variables as explicit overrides.
    fn apply_env_overrides(settings: Self) -> Result<Self, ApplicationError> {
        Self::apply_env_source(settings, env_layer())
    }

    /// Overlay one env source; a present but malformed value is an error.
    fn apply_env_source(mut settings: Self, env: Environment) -> Result<Self, ApplicationError> {
        // Use config crate just for env var parsing
        let config = Config::builder()
            .add_source(env)
            .build()
            .map_err(config_err)?;

        if let Some(val) = env_value(config.get_int("default_max_weight_kg"))? {
            settings.default_max_weight_kg =
                u32::try_from(val).map_err(|_| ApplicationError::Config {
                    message: format!("BPCALC_DEFAULT_MAX_WEIGHT_KG out of range: {val}"),
                })?;
        }
        if let Some(val) = env_value(config.get_float("default_max_volume_l"))? {
            settings.default_max_volume_l = val;
        }
        if let Some(val) = env_value(config.get_string("catalog"))? {
            settings.catalog = Some(PathBuf::from(val));
        }
        if let Some(val) = env_value(config.get_string("fit_catalog"))? {
            settings.fit_catalog = Some(PathBuf::from(val));
        }
        if let Some(val) = env_value(config.get_string("language"))? {
            settings.language = val
                .parse()
                .map_err(|message| ApplicationError::Config { message })?;
        }

        Ok(settings)
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        self.catalog = self.catalog.as_deref().map(expand_path);
        self.fit_catalog = self.fit_catalog.as_deref().map(expand_path);
    }

    fn validate(&self) -> Result<(), ApplicationError> {
        self.default_budget().map(|_| ())
    }

    /// Budget for new packs and for legacy files without one.
    pub fn default_budget(&self) -> Result<Budget, ApplicationError> {
        Budget::new(self.default_max_weight_kg, self.default_max_volume_l).map_err(|e| {
            ApplicationError::Config {
                message: format!("default_max_volume_l: {e}"),
            }
        })
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# bpcalc configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/bpcalc/bpcalc.toml
#   Env:    BPCALC_* environment variables (explicit overrides)

# Budget for new packs and for old pack files that do not store one
# default_max_weight_kg = 12
# default_max_volume_l = 40.0

# Gear catalog replacing the built-in presets (same layout as data/catalog.toml)
# catalog = "~/.config/bpcalc/catalog.toml"

# Trail kit used by `bpcalc fit` (same layout as data/fit_catalog.toml)
# fit_catalog = "~/.config/bpcalc/fit_catalog.toml"

# Report language: "en" or "ru"
# language = "en"
"#
        .to_string()
    }
}

/// `BPCALC_DEFAULT_MAX_WEIGHT_KG` maps to `default_max_weight_kg`; `__` nests.
fn env_layer() -> Environment {
    Environment::with_prefix("BPCALC")
        .prefix_separator("_")
        .separator("__")
}

/// Missing key is `None`; any other lookup failure is a config error.
fn env_value<T>(result: Result<T, ConfigError>) -> Result<Option<T>, ApplicationError> {
    match result {
        Ok(val) => Ok(Some(val)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(config_err(e)),
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
