//! Dependency Container
//!
//! Explicitly owned holder of bindings. Bootstrap code registers values with
//! [`Container::put`] / [`Container::put_qualified`]; role attachment resolves
//! them with [`Container::resolve`]. A container may have a parent that is
//! consulted when nothing local qualifies.

pub mod binding;
pub mod store;

use crate::config::ContainerConfig;
use crate::error::{ConflictError, ResolveError};
use crate::matcher::{Matcher, Qualifier};
use crate::resolve::{ResolutionEngine, ResolutionRequest, ResolvedAll};
use crate::types::{Criteria, TypeKey};
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

pub use binding::{Binding, Bindings};
pub use store::BindingStore;

/// Dependency container shared as `Arc<Container>`
pub struct Container {
    store: BindingStore,
    engine: ResolutionEngine,
    config: ContainerConfig,
    parent: Option<Arc<Container>>,
}

impl Container {
    /// Create a root container with permissive policies
    pub fn new() -> Self {
        Self::with_config(ContainerConfig::default())
    }

    pub fn with_config(config: ContainerConfig) -> Self {
        Self {
            store: BindingStore::new(config.duplicates),
            engine: ResolutionEngine::new(config.ambiguity),
            config,
            parent: None,
        }
    }

    /// Create a child container inheriting the parent's configuration
    pub fn with_parent(parent: Arc<Container>) -> Self {
        let mut child = Self::with_config(parent.config);
        child.parent = Some(parent);
        child
    }

    pub fn config(&self) -> ContainerConfig {
        self.config
    }

    pub fn parent(&self) -> Option<&Arc<Container>> {
        self.parent.as_ref()
    }

    pub fn store(&self) -> &BindingStore {
        &self.store
    }

    /// Register an unconditional binding
    pub fn put<T: Send + Sync + 'static>(&self, value: T) -> Result<(), ConflictError> {
        self.store.register(Arc::new(value), None)
    }

    /// Register an already shared value without a matcher
    pub fn put_arc<T: Send + Sync + 'static>(&self, value: Arc<T>) -> Result<(), ConflictError> {
        self.store.register(value, None)
    }

    /// Register a binding guarded by `matcher`
    pub fn put_qualified<T, M>(&self, value: T, matcher: M) -> Result<(), ConflictError>
    where
        T: Send + Sync + 'static,
        M: Matcher<T> + Eq + Hash,
    {
        self.store
            .register(Arc::new(value), Some(Qualifier::new(matcher)))
    }

    /// Register a binding with an optional, already erased qualifier
    pub fn register<T: Send + Sync + 'static>(
        &self,
        value: Arc<T>,
        qualifier: Option<Qualifier<T>>,
    ) -> Result<(), ConflictError> {
        self.store.register(value, qualifier)
    }

    /// Replace the local bindings of `(T, qualifier)` with `value`
    pub fn replace<T: Send + Sync + 'static>(
        &self,
        value: T,
        qualifier: Option<Qualifier<T>>,
    ) -> usize {
        self.store.replace(Arc::new(value), qualifier)
    }

    /// Remove the local bindings of `(T, qualifier)`
    pub fn remove<T: Send + Sync + 'static>(&self, qualifier: Option<&Qualifier<T>>) -> usize {
        self.store.remove(qualifier)
    }

    /// Local bindings of `T`, in registration order
    pub fn lookup<T: 'static>(&self) -> Bindings<T> {
        self.store.lookup::<T>()
    }

    /// Whether this container or an ancestor has any binding of `T`
    pub fn contains<T: 'static>(&self) -> bool {
        self.store.contains::<T>() || self.parent.as_ref().is_some_and(|p| p.contains::<T>())
    }

    /// Select the value satisfying `request`
    ///
    /// Local bindings are tried first. Only a local `NotFound` falls through
    /// to the parent; an ambiguity is reported as is.
    pub fn resolve<T: 'static>(&self, request: &ResolutionRequest<T>) -> Result<Arc<T>, ResolveError> {
        match self.engine.resolve(&self.store, request) {
            Err(err) if err.is_not_found() => match &self.parent {
                Some(parent) => parent.resolve(request),
                None => Err(err),
            },
            other => other,
        }
    }

    /// Resolve `T` with empty criteria
    pub fn get<T: 'static>(&self) -> Result<Arc<T>, ResolveError> {
        self.resolve(&ResolutionRequest::unqualified())
    }

    /// Resolve `T` with `criteria`
    pub fn get_with<T: 'static>(&self, criteria: Criteria) -> Result<Arc<T>, ResolveError> {
        self.resolve(&ResolutionRequest::new(criteria))
    }

    /// Every value bound to `T`: local bindings first, then ancestors'
    pub fn resolve_all<T: 'static>(&self) -> ResolvedAll<T> {
        let mut layers = vec![self.store.lookup::<T>()];
        let mut ancestor = self.parent.as_ref();
        while let Some(container) = ancestor {
            layers.push(container.store.lookup::<T>());
            ancestor = container.parent.as_ref();
        }
        ResolvedAll::new(layers)
    }

    /// Types registered locally
    pub fn type_keys(&self) -> Vec<TypeKey> {
        self.store.type_keys()
    }

    /// Number of local bindings
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Drop all local bindings
    pub fn clear(&self) {
        self.store.clear();
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("config", &self.config)
            .field("types", &self.store.type_keys())
            .field("bindings", &self.store.len())
            .field("has_parent", &self.parent.is_some())
            .finish()
    }
}
