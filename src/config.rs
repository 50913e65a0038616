//! Configuration
//!
//! Container policies and logging settings. Loaded through [`ConfigLoader`]:
//! defaults, then an optional TOML file, then `MAIA__*` environment variables.

pub mod loader;

use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};

pub use loader::ConfigLoader;

/// What `register` does when the same (type, qualifier) pair already exists
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Keep both; the earlier one wins ties
    #[default]
    Append,
    /// Fail with `ConflictError`
    Reject,
}

/// What resolution does when more than one binding qualifies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmbiguityPolicy {
    /// Return the earliest registered candidate
    #[default]
    FirstWins,
    /// Fail with `ResolveError::Ambiguous`
    Reject,
}

/// Container configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerConfig {
    #[serde(default)]
    pub duplicates: DuplicatePolicy,
    #[serde(default)]
    pub ambiguity: AmbiguityPolicy,
}

impl ContainerConfig {
    /// Reject duplicate registrations and ambiguous resolutions
    pub fn strict() -> Self {
        Self {
            duplicates: DuplicatePolicy::Reject,
            ambiguity: AmbiguityPolicy::Reject,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MaiaConfig {
    #[serde(default)]
    pub container: ContainerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}
