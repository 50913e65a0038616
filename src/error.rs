//! Error types for registration, resolution and role attachment.

use thiserror::Error;

/// Raised by `register` when an identical (type, qualifier) pair already exists
/// and the container rejects duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Binding conflict for {type_name}: qualifier {qualifier} is already registered")]
pub struct ConflictError {
    pub type_name: &'static str,
    /// Display form of the qualifier, `<none>` for unconditional bindings
    pub qualifier: String,
}

/// Resolution failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// No binding, conditional or unconditional, satisfies the request
    #[error("No binding of {type_name} satisfies criteria {criteria}")]
    NotFound {
        type_name: &'static str,
        criteria: String,
    },

    /// More than one binding qualifies and first-wins selection is disabled
    #[error("{candidates} bindings of {type_name} qualify for criteria {criteria}")]
    Ambiguous {
        type_name: &'static str,
        criteria: String,
        candidates: usize,
    },
}

impl ResolveError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ResolveError::NotFound { .. })
    }
}

/// Injection failures raised while building a role
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InjectError {
    #[error("Role {role} has an unsatisfied dependency: {source}")]
    Unsatisfied {
        role: &'static str,
        #[source]
        source: ResolveError,
    },

    /// Raised by a role's own validation of its injected values
    #[error("Role {role} rejected its dependencies: {reason}")]
    Invalid { role: &'static str, reason: String },
}

/// Agent-level failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AgentError {
    #[error("Agent {agent_id} is not deployed to a container")]
    NotDeployed { agent_id: String },

    #[error("Agent {agent_id} already has role {role}")]
    RoleAlreadyAttached { agent_id: String, role: &'static str },

    #[error("Agent {agent_id} could not attach role: {source}")]
    Inject {
        agent_id: String,
        #[source]
        source: InjectError,
    },
}

/// Configuration and logging setup failures
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Invalid(String),

    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
