//! Configuration loading for Vessel.
//!
//! The only configurable behavior is the panic boundary that every safe
//! combinator runs its callbacks behind:
//!
//! ```toml
//! [boundary]
//! silence_caught_panics = false
//! log_caught_panics = true
//! ```
//!
//! The file is read from the path in `VESSEL_CONFIG`, falling back to
//! `<config dir>/vessel/config.toml`. A missing file is not an error.

use std::env;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde::Deserialize;
use thiserror::Error;

pub const CONFIG_ENV_VAR: &str = "VESSEL_CONFIG";
pub const SILENCE_ENV_VAR: &str = "VESSEL_SILENCE_CAUGHT_PANICS";

static ACTIVE: OnceLock<VesselConfig> = OnceLock::new();
static DEFAULT: VesselConfig = VesselConfig {
    boundary: BoundaryConfig::DEFAULT,
};

// Default value function for serde (bool::default() is false, so only true needs a fn)
const fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct VesselConfig {
    #[serde(default)]
    pub boundary: BoundaryConfig,
}

/// Panic boundary behavior.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct BoundaryConfig {
    /// Suppress panic-hook output for panics that a combinator catches.
    /// Only takes effect once the quiet hook is installed.
    #[serde(default)]
    pub silence_caught_panics: bool,
    /// Emit a `debug` tracing event for every swallowed callback panic.
    #[serde(default = "default_true")]
    pub log_caught_panics: bool,
}

impl BoundaryConfig {
    pub const DEFAULT: Self = Self {
        silence_caught_panics: false,
        log_caught_panics: true,
    };
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl ConfigError {
    pub fn path(&self) -> &PathBuf {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

impl VesselConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load from the configured path and apply environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let config = match config_path() {
            Some(path) if path.exists() => Self::load_from(&path)?,
            _ => Self::default(),
        };
        Ok(config.with_overrides(|name| env::var(name).ok()))
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!(path = %path.display(), "Failed to read config: {err}");
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        match Self::from_toml_str(&content) {
            Ok(config) => Ok(config),
            Err(err) => {
                tracing::warn!(path = %path.display(), "Failed to parse config: {err}");
                Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        }
    }

    /// Apply overrides read through `lookup` (normally the process environment).
    #[must_use]
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(raw) = lookup(SILENCE_ENV_VAR) {
            self.boundary.silence_caught_panics = is_truthy(&raw);
        }
        self
    }
}

#[must_use]
pub fn config_path() -> Option<PathBuf> {
    if let Some(explicit) = env::var_os(CONFIG_ENV_VAR).filter(|raw| !raw.is_empty()) {
        return Some(PathBuf::from(explicit));
    }
    dirs::config_dir().map(|dir| dir.join("vessel").join("config.toml"))
}

/// Install the process-wide config. Returns the rejected value if one is
/// already installed.
pub fn install(config: VesselConfig) -> Result<(), VesselConfig> {
    ACTIVE.set(config)
}

/// The installed config, or the defaults when none was installed.
#[must_use]
pub fn current() -> &'static VesselConfig {
    ACTIVE.get().unwrap_or(&DEFAULT)
}

fn is_truthy(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes"
    )
}
