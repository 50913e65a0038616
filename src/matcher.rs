//! Matchers
//!
//! A matcher is a predicate over `(candidate, criteria)` used to pick one binding
//! among several of the same declared type. Each concrete kind decides which
//! argument it inspects: [`EqualsMatcher`] looks only at the candidate value,
//! [`CriteriaMatcher`] and [`CriteriaKeyMatcher`] look only at the criteria.
//!
//! Bindings hold matchers through [`Qualifier`], a type-erased handle with
//! structural equality and hashing so identical qualifiers can be deduplicated.

use crate::types::{Criteria, TypeKey};
use serde_json::Value;
use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::Arc;

/// Qualifying predicate for bindings of type `T`
pub trait Matcher<T: 'static>: fmt::Debug + Send + Sync + 'static {
    /// Returns true iff `candidate` is acceptable under `criteria`
    fn matches(&self, candidate: &T, criteria: &Criteria) -> bool;

    /// The declared type this matcher applies to
    fn type_key(&self) -> TypeKey {
        TypeKey::of::<T>()
    }
}

/// Object-safe extension giving matchers value semantics behind a pointer
trait DynMatcher<T: 'static>: Matcher<T> {
    fn as_any(&self) -> &dyn Any;
    fn dyn_eq(&self, other: &dyn Any) -> bool;
    fn dyn_hash(&self, state: &mut dyn Hasher);
}

impl<T, M> DynMatcher<T> for M
where
    T: 'static,
    M: Matcher<T> + Eq + Hash,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn dyn_eq(&self, other: &dyn Any) -> bool {
        other.downcast_ref::<M>().is_some_and(|other| self == other)
    }

    fn dyn_hash(&self, mut state: &mut dyn Hasher) {
        self.hash(&mut state);
    }
}

/// Shared, comparable handle to a matcher attached to a binding
///
/// Two qualifiers are equal iff they wrap the same concrete matcher kind with
/// equal comparison values. The hash is the wrapped matcher's hash.
pub struct Qualifier<T: 'static> {
    inner: Arc<dyn DynMatcher<T>>,
}

impl<T: 'static> Qualifier<T> {
    pub fn new<M>(matcher: M) -> Self
    where
        M: Matcher<T> + Eq + Hash,
    {
        Qualifier {
            inner: Arc::new(matcher),
        }
    }

    pub fn matches(&self, candidate: &T, criteria: &Criteria) -> bool {
        self.inner.matches(candidate, criteria)
    }

    pub fn type_key(&self) -> TypeKey {
        self.inner.type_key()
    }

    /// Access the concrete matcher if it is of kind `M`
    pub fn downcast_ref<M: 'static>(&self) -> Option<&M> {
        self.inner.as_any().downcast_ref::<M>()
    }
}

impl<T> Qualifier<T>
where
    T: PartialEq + Eq + Hash + fmt::Debug + Send + Sync + 'static,
{
    /// Qualifier accepting exactly `value`
    pub fn equals(value: T) -> Self {
        Qualifier::new(EqualsMatcher::new(value))
    }
}

impl<T: 'static> Qualifier<T> {
    /// Qualifier accepting any candidate when `criteria[key] == expected`
    pub fn criteria(key: impl Into<String>, expected: impl Into<Value>) -> Self {
        Qualifier::new(CriteriaMatcher::<T>::new(key, expected))
    }

    /// Qualifier accepting any candidate when `key` is present in the criteria
    pub fn criteria_key(key: impl Into<String>) -> Self {
        Qualifier::new(CriteriaKeyMatcher::<T>::new(key))
    }
}

impl<T: 'static> Clone for Qualifier<T> {
    fn clone(&self) -> Self {
        Qualifier {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: 'static> PartialEq for Qualifier<T> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner) || self.inner.dyn_eq(other.inner.as_any())
    }
}

impl<T: 'static> Eq for Qualifier<T> {}

impl<T: 'static> Hash for Qualifier<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.dyn_hash(state);
    }
}

impl<T: 'static> fmt::Debug for Qualifier<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.inner, f)
    }
}

impl<T: 'static> fmt::Display for Qualifier<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.inner, f)
    }
}

/// Accepts a candidate iff it equals the stored value; ignores criteria
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct EqualsMatcher<T> {
    value: T,
}

impl<T> EqualsMatcher<T> {
    pub fn new(value: T) -> Self {
        EqualsMatcher { value }
    }

    pub fn value(&self) -> &T {
        &self.value
    }
}

impl<T> Matcher<T> for EqualsMatcher<T>
where
    T: PartialEq + fmt::Debug + Send + Sync + 'static,
{
    fn matches(&self, candidate: &T, _criteria: &Criteria) -> bool {
        *candidate == self.value
    }
}

impl<T: fmt::Debug> fmt::Debug for EqualsMatcher<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EqualsMatcher({:?})", self.value)
    }
}

/// Accepts any candidate iff the criteria carry `key` with exactly `expected`
pub struct CriteriaMatcher<T> {
    key: String,
    expected: Value,
    _marker: PhantomData<fn() -> T>,
}

impl<T> CriteriaMatcher<T> {
    pub fn new(key: impl Into<String>, expected: impl Into<Value>) -> Self {
        CriteriaMatcher {
            key: key.into(),
            expected: expected.into(),
            _marker: PhantomData,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn expected(&self) -> &Value {
        &self.expected
    }
}

impl<T: 'static> Matcher<T> for CriteriaMatcher<T> {
    fn matches(&self, _candidate: &T, criteria: &Criteria) -> bool {
        criteria.get(&self.key) == Some(&self.expected)
    }
}

impl<T> PartialEq for CriteriaMatcher<T> {
    // JSON text, as in `Hash`: `Value` alone equates `0.0` and `-0.0`
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.expected.to_string() == other.expected.to_string()
    }
}

impl<T> Eq for CriteriaMatcher<T> {}

impl<T> Hash for CriteriaMatcher<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // serde_json::Value has no Hash impl; its JSON text stands in
        self.key.hash(state);
        self.expected.to_string().hash(state);
    }
}

impl<T> Clone for CriteriaMatcher<T> {
    fn clone(&self) -> Self {
        CriteriaMatcher::new(self.key.clone(), self.expected.clone())
    }
}

impl<T> fmt::Debug for CriteriaMatcher<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CriteriaMatcher({}={})", self.key, self.expected)
    }
}

/// Accepts any candidate iff the criteria contain `key`, whatever its value
pub struct CriteriaKeyMatcher<T> {
    key: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> CriteriaKeyMatcher<T> {
    pub fn new(key: impl Into<String>) -> Self {
        CriteriaKeyMatcher {
            key: key.into(),
            _marker: PhantomData,
        }
    }
}

impl<T: 'static> Matcher<T> for CriteriaKeyMatcher<T> {
    fn matches(&self, _candidate: &T, criteria: &Criteria) -> bool {
        criteria.contains_key(&self.key)
    }
}

impl<T> PartialEq for CriteriaKeyMatcher<T> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<T> Eq for CriteriaKeyMatcher<T> {}

impl<T> Hash for CriteriaKeyMatcher<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl<T> Clone for CriteriaKeyMatcher<T> {
    fn clone(&self) -> Self {
        CriteriaKeyMatcher::new(self.key.clone())
    }
}

impl<T> fmt::Debug for CriteriaKeyMatcher<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CriteriaKeyMatcher({})", self.key)
    }
}
