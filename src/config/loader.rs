//! ConfigLoader: layers defaults, an optional file and the environment.

use super::MaiaConfig;
use crate::error::ConfigError;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use std::path::Path;

/// Configuration loader.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration.
    /// Precedence: defaults (lowest) -> `path` if given -> environment (highest).
    pub fn load(path: Option<&Path>) -> Result<MaiaConfig, ConfigError> {
        let mut builder = Self::builder_with_defaults()?;
        if let Some(path) = path {
            if !path.exists() {
                return Err(ConfigError::Invalid(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            builder = builder.add_source(File::from(path).required(true));
        }
        let builder = Self::add_environment(builder);

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Parse configuration from TOML text without consulting the environment.
    pub fn from_toml_str(text: &str) -> Result<MaiaConfig, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Ok(Config::builder()
            .set_default("container.duplicates", "append")?
            .set_default("container.ambiguity", "first_wins")?)
    }

    /// MAIA prefix, `__` separates nested keys: `MAIA__CONTAINER__AMBIGUITY=reject`.
    fn add_environment(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
        builder.add_source(
            Environment::with_prefix("MAIA")
                .separator("__")
                .try_parsing(true),
        )
    }
}
