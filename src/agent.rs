//! Agents and role attachment
//!
//! An agent is deployed to a container and gains behavior through roles. A
//! role is attached only after every one of its dependencies resolved; a
//! failed attachment leaves the agent's role set exactly as it was.

pub mod role;

pub use role::{InjectionPoint, Injector, Role};

use crate::container::Container;
use crate::error::AgentError;
use crate::types::TypeKey;
use parking_lot::RwLock;
use std::any::Any;
use std::sync::Arc;
use tracing::{info, warn};

struct AttachedRole {
    type_key: TypeKey,
    name: &'static str,
    instance: Arc<dyn Any + Send + Sync>,
    points: Vec<InjectionPoint>,
}

/// Agent with a container and a set of attached roles
pub struct Agent {
    agent_id: String,
    container: RwLock<Option<Arc<Container>>>,
    roles: RwLock<Vec<AttachedRole>>,
}

impl Agent {
    pub fn new(agent_id: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
            container: RwLock::new(None),
            roles: RwLock::new(Vec::new()),
        }
    }

    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    /// Deploy the agent to `container`; later role attachments resolve there
    pub fn deploy_to(&self, container: Arc<Container>) {
        info!(agent_id = %self.agent_id, "Agent deployed");
        *self.container.write() = Some(container);
    }

    pub fn container(&self) -> Option<Arc<Container>> {
        self.container.read().clone()
    }

    /// Build role `R` from the container and attach it
    pub fn add_role<R: Role>(&self) -> Result<Arc<R>, AgentError> {
        let container = self.container().ok_or_else(|| AgentError::NotDeployed {
            agent_id: self.agent_id.clone(),
        })?;
        if self.has_role::<R>() {
            return Err(self.already_attached::<R>());
        }

        let mut injector = Injector::new(&container, R::NAME);
        let role = match R::inject(&mut injector) {
            Ok(role) => Arc::new(role),
            Err(source) => {
                warn!(
                    agent_id = %self.agent_id,
                    role = R::NAME,
                    error = %source,
                    "Role attachment failed"
                );
                return Err(AgentError::Inject {
                    agent_id: self.agent_id.clone(),
                    source,
                });
            }
        };
        let points = injector.into_points();

        let mut roles = self.roles.write();
        // another thread may have attached R while we were resolving
        if roles.iter().any(|r| r.type_key == TypeKey::of::<R>()) {
            return Err(self.already_attached::<R>());
        }
        info!(
            agent_id = %self.agent_id,
            role = R::NAME,
            dependencies = points.len(),
            "Role attached"
        );
        roles.push(AttachedRole {
            type_key: TypeKey::of::<R>(),
            name: R::NAME,
            instance: role.clone(),
            points,
        });
        Ok(role)
    }

    /// The attached instance of role `R`
    pub fn role<R: Role>(&self) -> Option<Arc<R>> {
        self.roles
            .read()
            .iter()
            .find(|r| r.type_key == TypeKey::of::<R>())
            .and_then(|r| r.instance.clone().downcast::<R>().ok())
    }

    pub fn has_role<R: Role>(&self) -> bool {
        self.roles
            .read()
            .iter()
            .any(|r| r.type_key == TypeKey::of::<R>())
    }

    /// Detach role `R`; returns whether it was attached
    pub fn remove_role<R: Role>(&self) -> bool {
        let mut roles = self.roles.write();
        let before = roles.len();
        roles.retain(|r| r.type_key != TypeKey::of::<R>());
        let removed = roles.len() != before;
        if removed {
            info!(agent_id = %self.agent_id, role = R::NAME, "Role removed");
        }
        removed
    }

    /// Names of attached roles in attachment order
    pub fn role_names(&self) -> Vec<&'static str> {
        self.roles.read().iter().map(|r| r.name).collect()
    }

    /// Dependencies that were resolved when `R` was attached
    pub fn injection_points<R: Role>(&self) -> Option<Vec<InjectionPoint>> {
        self.roles
            .read()
            .iter()
            .find(|r| r.type_key == TypeKey::of::<R>())
            .map(|r| r.points.clone())
    }

    fn already_attached<R: Role>(&self) -> AgentError {
        AgentError::RoleAlreadyAttached {
            agent_id: self.agent_id.clone(),
            role: R::NAME,
        }
    }
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("agent_id", &self.agent_id)
            .field("deployed", &self.container.read().is_some())
            .field("roles", &self.role_names())
            .finish()
    }
}
