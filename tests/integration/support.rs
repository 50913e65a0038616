use maia::{Injector, InjectError, Role};
use std::sync::Arc;

/// Stand-in for a shared work-stealing pool handed to roles
#[derive(Debug, PartialEq, Eq)]
pub struct WorkerPool {
    pub threads: usize,
}

/// Role depending on a worker pool and a label
#[derive(Debug)]
pub struct ExampleRole {
    pub pool: Arc<WorkerPool>,
    pub label: Arc<String>,
}

impl Role for ExampleRole {
    const NAME: &'static str = "ExampleRole";

    fn inject(injector: &mut Injector<'_>) -> Result<Self, InjectError> {
        let label = injector.require::<String>()?;
        let pool = injector.require::<WorkerPool>()?;
        Ok(Self { pool, label })
    }
}
