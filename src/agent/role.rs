//! Roles and the injector that wires them.

use crate::container::Container;
use crate::error::{InjectError, ResolveError};
use crate::resolve::ResolutionRequest;
use crate::types::{Criteria, TypeKey};
use std::sync::Arc;

/// A bundle of declared dependencies attachable to an agent
///
/// `inject` asks the injector for each dependency and builds the role. An
/// error from any injection point aborts the whole attachment.
pub trait Role: Sized + Send + Sync + 'static {
    /// Name used in logs and errors
    const NAME: &'static str;

    fn inject(injector: &mut Injector<'_>) -> Result<Self, InjectError>;
}

/// One dependency served by an [`Injector`]
#[derive(Debug, Clone, PartialEq)]
pub struct InjectionPoint {
    pub type_key: TypeKey,
    pub criteria: Criteria,
}

/// Resolves a role's dependencies against a container, one request per point
pub struct Injector<'a> {
    container: &'a Container,
    role: &'static str,
    points: Vec<InjectionPoint>,
}

impl<'a> Injector<'a> {
    pub fn new(container: &'a Container, role: &'static str) -> Self {
        Self {
            container,
            role,
            points: Vec::new(),
        }
    }

    pub fn role(&self) -> &'static str {
        self.role
    }

    /// Resolve `T` with empty criteria
    pub fn require<T: 'static>(&mut self) -> Result<Arc<T>, InjectError> {
        self.require_with(Criteria::new())
    }

    /// Resolve `T` with the injection point's criteria
    pub fn require_with<T: 'static>(&mut self, criteria: Criteria) -> Result<Arc<T>, InjectError> {
        self.request(criteria).map_err(|source| InjectError::Unsatisfied {
            role: self.role,
            source,
        })
    }

    /// Resolve `T` if anything qualifies; ambiguity is still an error
    pub fn optional<T: 'static>(&mut self) -> Result<Option<Arc<T>>, InjectError> {
        self.optional_with(Criteria::new())
    }

    pub fn optional_with<T: 'static>(
        &mut self,
        criteria: Criteria,
    ) -> Result<Option<Arc<T>>, InjectError> {
        match self.request(criteria) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.is_not_found() => Ok(None),
            Err(source) => Err(InjectError::Unsatisfied {
                role: self.role,
                source,
            }),
        }
    }

    /// Every value bound to `T`, for collection-typed dependencies
    pub fn require_all<T: 'static>(&mut self) -> Vec<Arc<T>> {
        self.points.push(InjectionPoint {
            type_key: TypeKey::of::<T>(),
            criteria: Criteria::new(),
        });
        self.container.resolve_all::<T>().to_vec()
    }

    /// Reject the injected values with a reason
    pub fn invalid(&self, reason: impl Into<String>) -> InjectError {
        InjectError::Invalid {
            role: self.role,
            reason: reason.into(),
        }
    }

    /// Injection points served so far, in request order
    pub fn points(&self) -> &[InjectionPoint] {
        &self.points
    }

    pub(crate) fn into_points(self) -> Vec<InjectionPoint> {
        self.points
    }

    fn request<T: 'static>(&mut self, criteria: Criteria) -> Result<Arc<T>, ResolveError> {
        let request = ResolutionRequest::<T>::new(criteria);
        self.points.push(InjectionPoint {
            type_key: request.type_key(),
            criteria: request.criteria().clone(),
        });
        self.container.resolve(&request)
    }
}
