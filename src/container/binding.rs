//! Bindings and store snapshots.

use crate::matcher::Qualifier;
use crate::types::TypeKey;
use std::fmt;
use std::sync::Arc;

/// Binding: a registered (type, value, optional qualifier) triple
///
/// `sequence` is the store-wide insertion number; it is the tie-break of last
/// resort when several bindings qualify.
pub struct Binding<T: 'static> {
    value: Arc<T>,
    qualifier: Option<Qualifier<T>>,
    sequence: u64,
}

impl<T: 'static> Binding<T> {
    pub(crate) fn new(value: Arc<T>, qualifier: Option<Qualifier<T>>, sequence: u64) -> Self {
        Binding {
            value,
            qualifier,
            sequence,
        }
    }

    /// Declared type of the bound value
    pub fn type_key(&self) -> TypeKey {
        TypeKey::of::<T>()
    }

    /// The bound value
    pub fn value(&self) -> &Arc<T> {
        &self.value
    }

    /// Matcher the binding was registered under, if any
    pub fn qualifier(&self) -> Option<&Qualifier<T>> {
        self.qualifier.as_ref()
    }

    /// True when the binding carries a matcher
    pub fn is_conditional(&self) -> bool {
        self.qualifier.is_some()
    }

    /// Store-wide registration order; lower registered earlier
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Whether this binding was registered under exactly `qualifier`
    pub(crate) fn has_qualifier(&self, qualifier: Option<&Qualifier<T>>) -> bool {
        self.qualifier.as_ref() == qualifier
    }
}

impl<T: 'static> Clone for Binding<T> {
    fn clone(&self) -> Self {
        Binding {
            value: Arc::clone(&self.value),
            qualifier: self.qualifier.clone(),
            sequence: self.sequence,
        }
    }
}

impl<T: 'static> fmt::Debug for Binding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("type", &self.type_key())
            .field("qualifier", &self.qualifier)
            .field("sequence", &self.sequence)
            .finish()
    }
}

/// Immutable, ordered snapshot of the bindings of one type
///
/// Cheap to clone; later registrations do not affect an existing snapshot.
pub struct Bindings<T: 'static> {
    entries: Arc<Vec<Binding<T>>>,
}

impl<T: 'static> Bindings<T> {
    pub(crate) fn new(entries: Arc<Vec<Binding<T>>>) -> Self {
        Bindings { entries }
    }

    pub fn empty() -> Self {
        Bindings {
            entries: Arc::new(Vec::new()),
        }
    }

    /// Number of bindings in the snapshot
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bindings in registration order
    pub fn iter(&self) -> std::slice::Iter<'_, Binding<T>> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[Binding<T>] {
        &self.entries
    }
}

impl<T: 'static> Clone for Bindings<T> {
    fn clone(&self) -> Self {
        Bindings {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<T: 'static> fmt::Debug for Bindings<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.iter()).finish()
    }
}

impl<'a, T: 'static> IntoIterator for &'a Bindings<T> {
    type Item = &'a Binding<T>;
    type IntoIter = std::slice::Iter<'a, Binding<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
