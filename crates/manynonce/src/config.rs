//! Configuration loading and validation.
//!
//! Values are read from `MANYNONCE_*` environment variables. Key material is
//! never part of the configuration; callers supply keys directly.

use anyhow::{Context, Result};
use serde::Deserialize;

/// Prefix for every environment variable read by [`Config::from_env`].
pub const ENV_PREFIX: &str = "MANYNONCE";

/// Validated transform configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Number of layers applied by [`LayeredCipher::from_config`](crate::LayeredCipher::from_config).
    #[serde(default = "default_layers")]
    pub layers: u32,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_layers() -> u32 {
    3
}
fn default_log_level() -> String {
    "info".into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            layers: default_layers(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load and validate configuration from `MANYNONCE_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed or fails validation.
    pub fn from_env() -> Result<Self> {
        Self::from_environment(config::Environment::with_prefix(ENV_PREFIX))
    }

    fn from_environment(env: config::Environment) -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(env.try_parsing(true))
            .build()
            .context("failed to build manynonce configuration")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise manynonce configuration")?;

        c.validate()?;
        Ok(c)
    }

    fn validate(&self) -> Result<()> {
        if self.layers == 0 {
            anyhow::bail!("MANYNONCE_LAYERS must be at least 1");
        }
        if self.log_level.trim().is_empty() {
            anyhow::bail!("MANYNONCE_LOG_LEVEL must not be empty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> config::Environment {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        config::Environment::with_prefix(ENV_PREFIX).source(Some(map))
    }

    #[test]
    fn defaults() {
        assert_eq!(default_layers(), 3);
        assert_eq!(default_log_level(), "info");
        let cfg = Config::default();
        assert_eq!(cfg.layers, 3);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let cfg = Config::from_environment(env(&[])).unwrap();
        assert_eq!(cfg.layers, 3);
        assert_eq!(cfg.log_level, "info");
    }

    #[test]
    fn reads_prefixed_variables() {
        let cfg = Config::from_environment(env(&[
            ("MANYNONCE_LAYERS", "7"),
            ("MANYNONCE_LOG_LEVEL", "debug"),
        ]))
        .unwrap();
        assert_eq!(cfg.layers, 7);
        assert_eq!(cfg.log_level, "debug");
    }

    #[test]
    fn rejects_zero_layers() {
        assert!(Config::from_environment(env(&[("MANYNONCE_LAYERS", "0")])).is_err());
    }

    #[test]
    fn rejects_unparseable_layers() {
        assert!(Config::from_environment(env(&[("MANYNONCE_LAYERS", "many")])).is_err());
        assert!(Config::from_environment(env(&[("MANYNONCE_LAYERS", "-2")])).is_err());
    }

    #[test]
    fn validate_rejects_empty_log_level() {
        let cfg = Config {
            layers: 1,
            log_level: "  ".into(),
        };
        assert!(cfg.validate().is_err());
    }
}
