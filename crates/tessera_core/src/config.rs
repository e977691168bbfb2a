//! # Configuration
//!
//! World settings loaded once at startup from TOML. Every field has a
//! default, so an empty file is a valid configuration.
//!
//! ```toml
//! initial_capacity = 4096
//!
//! [logging]
//! level = "debug"
//! colors = false
//! timestamps = true
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::{EcsError, EcsResult};
use crate::logging::LogConfig;

/// Settings for [`World::with_config`](crate::World::with_config).
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Entity rows reserved up front.
    pub initial_capacity: usize,
    /// Subscriber settings for [`logging::init`](crate::logging::init).
    pub logging: LogConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 1024,
            logging: LogConfig::default(),
        }
    }
}

impl WorldConfig {
    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::InvalidConfig`] on malformed TOML, wrongly typed
    /// fields, or an unknown log level.
    pub fn from_toml(source: &str) -> EcsResult<Self> {
        let config: Self = toml::from_str(source).map_err(|e| EcsError::InvalidConfig(e.to_string()))?;
        config.logging.level_filter()?;
        Ok(config)
    }

    /// Reads and parses a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::InvalidConfig`] if the file cannot be read or
    /// does not parse.
    pub fn load(path: impl AsRef<Path>) -> EcsResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| EcsError::InvalidConfig(format!("{}: {e}", path.display())))?;
        Self::from_toml(&source)
    }
}
