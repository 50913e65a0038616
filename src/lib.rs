//! Maia: Matcher-Qualified Dependency Resolution
//!
//! Agents acquire behavior through roles whose dependencies are satisfied from
//! a shared container. A container may hold several bindings of one type; a
//! matcher attached to a binding decides, per request criteria, which one an
//! injection point receives.

pub mod agent;
pub mod config;
pub mod container;
pub mod error;
pub mod logging;
pub mod matcher;
pub mod resolve;
pub mod types;

pub use agent::{Agent, InjectionPoint, Injector, Role};
pub use config::{AmbiguityPolicy, ContainerConfig, DuplicatePolicy, MaiaConfig};
pub use container::{Binding, Bindings, Container};
pub use error::{AgentError, ConflictError, InjectError, ResolveError};
pub use matcher::{CriteriaKeyMatcher, CriteriaMatcher, EqualsMatcher, Matcher, Qualifier};
pub use resolve::{ResolutionEngine, ResolutionRequest, ResolvedAll};
pub use types::{Criteria, TypeKey};
