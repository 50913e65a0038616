//! Binding Store
//!
//! Ordered multimap from declared type to bindings. Each type bucket is an
//! `Arc<Vec<Binding<T>>>` that is replaced copy-on-write under the write lock,
//! so readers holding a snapshot never observe a partially applied change.

use crate::config::DuplicatePolicy;
use crate::container::binding::{Binding, Bindings};
use crate::error::ConflictError;
use crate::matcher::Qualifier;
use crate::types::TypeKey;
use parking_lot::RwLock;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Type-erased bucket; `bindings` always holds an `Arc<Vec<Binding<T>>>`
/// for the `T` named by its map key.
struct Slot {
    len: usize,
    bindings: Box<dyn Any + Send + Sync>,
}

impl Slot {
    fn new<T: Send + Sync + 'static>(entries: Vec<Binding<T>>) -> Self {
        Slot {
            len: entries.len(),
            bindings: Box::new(Arc::new(entries)),
        }
    }

    fn entries<T: 'static>(&self) -> Option<&Arc<Vec<Binding<T>>>> {
        self.bindings.downcast_ref::<Arc<Vec<Binding<T>>>>()
    }
}

#[derive(Default)]
struct StoreState {
    slots: HashMap<TypeKey, Slot>,
    next_sequence: u64,
}

impl StoreState {
    fn snapshot<T: 'static>(&self) -> Option<Arc<Vec<Binding<T>>>> {
        self.slots
            .get(&TypeKey::of::<T>())
            .and_then(Slot::entries::<T>)
            .cloned()
    }

    fn store<T: Send + Sync + 'static>(&mut self, entries: Vec<Binding<T>>) {
        let key = TypeKey::of::<T>();
        if entries.is_empty() {
            self.slots.remove(&key);
        } else {
            self.slots.insert(key, Slot::new(entries));
        }
    }
}

/// Binding store shared by a container's readers and writers
pub struct BindingStore {
    state: RwLock<StoreState>,
    duplicates: DuplicatePolicy,
}

impl BindingStore {
    pub fn new(duplicates: DuplicatePolicy) -> Self {
        Self {
            state: RwLock::new(StoreState::default()),
            duplicates,
        }
    }

    pub fn duplicate_policy(&self) -> DuplicatePolicy {
        self.duplicates
    }

    /// Append a binding for `T`
    ///
    /// Under [`DuplicatePolicy::Reject`] an existing binding with the same
    /// qualifier (or the same absence of one) fails with [`ConflictError`].
    pub fn register<T: Send + Sync + 'static>(
        &self,
        value: Arc<T>,
        qualifier: Option<Qualifier<T>>,
    ) -> Result<(), ConflictError> {
        let mut state = self.state.write();
        let current = state.snapshot::<T>();

        if self.duplicates == DuplicatePolicy::Reject {
            if let Some(entries) = &current {
                if entries.iter().any(|b| b.has_qualifier(qualifier.as_ref())) {
                    return Err(conflict::<T>(qualifier.as_ref()));
                }
            }
        }

        let sequence = state.next_sequence;
        state.next_sequence += 1;

        let mut entries = current.map(|e| (*e).clone()).unwrap_or_default();
        debug!(
            type_name = TypeKey::of::<T>().name(),
            qualifier = %describe(qualifier.as_ref()),
            sequence,
            position = entries.len(),
            "Registered binding"
        );
        entries.push(Binding::new(value, qualifier, sequence));
        state.store(entries);
        Ok(())
    }

    /// Ordered snapshot of all bindings of `T`; empty when none
    pub fn lookup<T: 'static>(&self) -> Bindings<T> {
        self.state
            .read()
            .snapshot::<T>()
            .map(Bindings::new)
            .unwrap_or_else(Bindings::empty)
    }

    /// Remove every binding of `T` registered under exactly `qualifier`
    ///
    /// Returns the number of bindings removed.
    pub fn remove<T: Send + Sync + 'static>(&self, qualifier: Option<&Qualifier<T>>) -> usize {
        let mut state = self.state.write();
        let removed = Self::remove_locked(&mut state, qualifier);
        if removed > 0 {
            debug!(
                type_name = TypeKey::of::<T>().name(),
                qualifier = %describe(qualifier),
                removed,
                "Removed bindings"
            );
        }
        removed
    }

    /// Atomically drop the bindings of `(T, qualifier)` and append `value`
    ///
    /// Never conflicts. Returns the number of bindings replaced.
    pub fn replace<T: Send + Sync + 'static>(
        &self,
        value: Arc<T>,
        qualifier: Option<Qualifier<T>>,
    ) -> usize {
        let mut state = self.state.write();
        let removed = Self::remove_locked(&mut state, qualifier.as_ref());

        let sequence = state.next_sequence;
        state.next_sequence += 1;

        let mut entries = state
            .snapshot::<T>()
            .map(|e| (*e).clone())
            .unwrap_or_default();
        debug!(
            type_name = TypeKey::of::<T>().name(),
            qualifier = %describe(qualifier.as_ref()),
            sequence,
            replaced = removed,
            "Replaced binding"
        );
        entries.push(Binding::new(value, qualifier, sequence));
        state.store(entries);
        removed
    }

    fn remove_locked<T: Send + Sync + 'static>(
        state: &mut StoreState,
        qualifier: Option<&Qualifier<T>>,
    ) -> usize {
        let Some(current) = state.snapshot::<T>() else {
            return 0;
        };
        let kept: Vec<Binding<T>> = current
            .iter()
            .filter(|b| !b.has_qualifier(qualifier))
            .cloned()
            .collect();
        let removed = current.len() - kept.len();
        if removed > 0 {
            state.store(kept);
        }
        removed
    }

    pub fn contains<T: 'static>(&self) -> bool {
        self.state.read().slots.contains_key(&TypeKey::of::<T>())
    }

    /// Number of bindings registered for `T`
    pub fn count<T: 'static>(&self) -> usize {
        self.state
            .read()
            .slots
            .get(&TypeKey::of::<T>())
            .map(|s| s.len)
            .unwrap_or(0)
    }

    /// Total number of bindings across all types
    pub fn len(&self) -> usize {
        self.state.read().slots.values().map(|s| s.len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().slots.is_empty()
    }

    /// Registered types, sorted by name
    pub fn type_keys(&self) -> Vec<TypeKey> {
        let mut keys: Vec<TypeKey> = self.state.read().slots.keys().copied().collect();
        keys.sort_by_key(|k| k.name());
        keys
    }

    /// Drop every binding
    pub fn clear(&self) {
        let mut state = self.state.write();
        let dropped: usize = state.slots.values().map(|s| s.len).sum();
        state.slots.clear();
        debug!(dropped, "Cleared binding store");
    }
}

impl Default for BindingStore {
    fn default() -> Self {
        Self::new(DuplicatePolicy::default())
    }
}

fn describe<T: 'static>(qualifier: Option<&Qualifier<T>>) -> String {
    match qualifier {
        Some(q) => q.to_string(),
        None => "<none>".to_string(),
    }
}

fn conflict<T: 'static>(qualifier: Option<&Qualifier<T>>) -> ConflictError {
    ConflictError {
        type_name: TypeKey::of::<T>().name(),
        qualifier: describe(qualifier),
    }
}
