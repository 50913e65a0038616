//! Resolution Engine
//!
//! Selects the binding that satisfies a typed request:
//!
//! 1. conditional bindings whose matcher accepts `(value, criteria)` win;
//! 2. otherwise unconditional bindings are considered;
//! 3. within either group one candidate is returned as is, several are
//!    resolved by [`AmbiguityPolicy`] (earliest registration, or an error);
//! 4. nothing qualifying is [`ResolveError::NotFound`].
//!
//! Resolution reads a snapshot and never mutates the store.

use crate::config::AmbiguityPolicy;
use crate::container::binding::{Binding, Bindings};
use crate::container::store::BindingStore;
use crate::error::ResolveError;
use crate::types::{Criteria, TypeKey};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{trace, warn};

/// ResolutionRequest: one injection point's declared type plus its criteria
pub struct ResolutionRequest<T> {
    criteria: Criteria,
    _marker: PhantomData<fn() -> T>,
}

impl<T: 'static> ResolutionRequest<T> {
    pub fn new(criteria: Criteria) -> Self {
        ResolutionRequest {
            criteria,
            _marker: PhantomData,
        }
    }

    /// Request with empty criteria
    pub fn unqualified() -> Self {
        Self::new(Criteria::new())
    }

    pub fn type_key(&self) -> TypeKey {
        TypeKey::of::<T>()
    }

    pub fn criteria(&self) -> &Criteria {
        &self.criteria
    }

    pub fn into_criteria(self) -> Criteria {
        self.criteria
    }
}

impl<T> Clone for ResolutionRequest<T> {
    fn clone(&self) -> Self {
        ResolutionRequest {
            criteria: self.criteria.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T: 'static> fmt::Debug for ResolutionRequest<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolutionRequest")
            .field("type", &self.type_key())
            .field("criteria", &self.criteria)
            .finish()
    }
}

/// Stateless selector parameterized by the ambiguity policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolutionEngine {
    ambiguity: AmbiguityPolicy,
}

impl ResolutionEngine {
    pub fn new(ambiguity: AmbiguityPolicy) -> Self {
        Self { ambiguity }
    }

    pub fn ambiguity_policy(&self) -> AmbiguityPolicy {
        self.ambiguity
    }

    /// Resolve `request` against the current contents of `store`
    pub fn resolve<T: 'static>(
        &self,
        store: &BindingStore,
        request: &ResolutionRequest<T>,
    ) -> Result<Arc<T>, ResolveError> {
        self.select(&store.lookup::<T>(), request)
    }

    /// Apply the selection policy to an already taken snapshot
    pub fn select<T: 'static>(
        &self,
        bindings: &Bindings<T>,
        request: &ResolutionRequest<T>,
    ) -> Result<Arc<T>, ResolveError> {
        let type_key = request.type_key();
        let criteria = request.criteria();

        let (conditional, unconditional): (Vec<&Binding<T>>, Vec<&Binding<T>>) =
            bindings.iter().partition(|b| b.is_conditional());

        let matched: Vec<&Binding<T>> = conditional
            .into_iter()
            .filter(|b| accepts(type_key, b, criteria))
            .collect();

        trace!(
            type_name = type_key.name(),
            %criteria,
            total = bindings.len(),
            matched = matched.len(),
            unconditional = unconditional.len(),
            "Resolving"
        );

        if let Some(binding) = self.pick(type_key, criteria, &matched)? {
            return Ok(Arc::clone(binding.value()));
        }
        if let Some(binding) = self.pick(type_key, criteria, &unconditional)? {
            return Ok(Arc::clone(binding.value()));
        }

        Err(ResolveError::NotFound {
            type_name: type_key.name(),
            criteria: criteria.to_string(),
        })
    }

    fn pick<'a, T: 'static>(
        &self,
        type_key: TypeKey,
        criteria: &Criteria,
        candidates: &[&'a Binding<T>],
    ) -> Result<Option<&'a Binding<T>>, ResolveError> {
        match candidates {
            [] => Ok(None),
            [only] => Ok(Some(*only)),
            [first, ..] => match self.ambiguity {
                AmbiguityPolicy::FirstWins => {
                    warn!(
                        type_name = type_key.name(),
                        %criteria,
                        candidates = candidates.len(),
                        chosen = first.sequence(),
                        "Several bindings qualify, using the earliest"
                    );
                    Ok(Some(*first))
                }
                AmbiguityPolicy::Reject => Err(ResolveError::Ambiguous {
                    type_name: type_key.name(),
                    criteria: criteria.to_string(),
                    candidates: candidates.len(),
                }),
            },
        }
    }
}

/// A matcher is only ever applied to bindings of its own declared type
fn accepts<T: 'static>(type_key: TypeKey, binding: &Binding<T>, criteria: &Criteria) -> bool {
    let Some(qualifier) = binding.qualifier() else {
        return false;
    };
    if qualifier.type_key() != type_key {
        warn!(
            type_name = type_key.name(),
            matcher_type = qualifier.type_key().name(),
            %qualifier,
            "Skipping matcher declared for another type"
        );
        return false;
    }
    qualifier.matches(binding.value(), criteria)
}

/// Every value bound to `T`, in store order, regardless of criteria
///
/// Holds snapshots, so iteration is lazy and can be restarted with [`iter`](Self::iter).
pub struct ResolvedAll<T: 'static> {
    layers: Vec<Bindings<T>>,
}

impl<T: 'static> ResolvedAll<T> {
    pub(crate) fn new(layers: Vec<Bindings<T>>) -> Self {
        ResolvedAll { layers }
    }

    pub fn iter(&self) -> impl Iterator<Item = Arc<T>> + '_ {
        self.layers
            .iter()
            .flat_map(|layer| layer.iter().map(|b| Arc::clone(b.value())))
    }

    pub fn len(&self) -> usize {
        self.layers.iter().map(Bindings::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.iter().all(Bindings::is_empty)
    }

    pub fn to_vec(&self) -> Vec<Arc<T>> {
        self.iter().collect()
    }
}

impl<T: 'static> Clone for ResolvedAll<T> {
    fn clone(&self) -> Self {
        ResolvedAll {
            layers: self.layers.clone(),
        }
    }
}

impl<T: 'static> fmt::Debug for ResolvedAll<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedAll")
            .field("type", &TypeKey::of::<T>())
            .field("len", &self.len())
            .finish()
    }
}
