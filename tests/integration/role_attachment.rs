use super::support::{ExampleRole, WorkerPool};
use maia::{
    Agent, AgentError, Container, ContainerConfig, Criteria, InjectError, Injector, ResolveError,
    Role, TypeKey,
};
use std::sync::Arc;

#[test]
fn example_role_attaches_with_all_dependencies() {
    let container = Arc::new(Container::new());
    container.put(WorkerPool { threads: 4 }).unwrap();
    container.put("TEST".to_string()).unwrap();

    let agent = Agent::new("agent-1");
    agent.deploy_to(Arc::clone(&container));
    let role = agent.add_role::<ExampleRole>().unwrap();

    assert_eq!(role.pool.threads, 4);
    assert_eq!(*role.label, "TEST");
    let points = agent.injection_points::<ExampleRole>().unwrap();
    let types: Vec<TypeKey> = points.iter().map(|p| p.type_key).collect();
    assert_eq!(
        types,
        vec![TypeKey::of::<String>(), TypeKey::of::<WorkerPool>()]
    );
}

#[test]
fn missing_pool_fails_without_partial_role() {
    let container = Arc::new(Container::new());
    container.put("TEST".to_string()).unwrap();

    let agent = Agent::new("agent-1");
    agent.deploy_to(container);
    let err = agent.add_role::<ExampleRole>().unwrap_err();

    match err {
        AgentError::Inject {
            agent_id,
            source: InjectError::Unsatisfied { role, source },
        } => {
            assert_eq!(agent_id, "agent-1");
            assert_eq!(role, "ExampleRole");
            assert!(matches!(source, ResolveError::NotFound { .. }));
            assert!(source.to_string().contains("WorkerPool"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!agent.has_role::<ExampleRole>());
    assert!(agent.role_names().is_empty());
    assert!(agent.injection_points::<ExampleRole>().is_none());
}

#[test]
fn role_attaches_once_dependency_is_registered() {
    let container = Arc::new(Container::new());
    container.put("TEST".to_string()).unwrap();
    let agent = Agent::new("agent-1");
    agent.deploy_to(Arc::clone(&container));
    assert!(agent.add_role::<ExampleRole>().is_err());

    container.put(WorkerPool { threads: 2 }).unwrap();
    let role = agent.add_role::<ExampleRole>().unwrap();
    assert_eq!(role.pool.threads, 2);
}

#[derive(Debug)]
struct PinnedPool {
    pool: Arc<WorkerPool>,
    backups: Vec<Arc<WorkerPool>>,
    label: Option<Arc<String>>,
}

impl Role for PinnedPool {
    const NAME: &'static str = "PinnedPool";

    fn inject(injector: &mut Injector<'_>) -> Result<Self, InjectError> {
        let pool = injector.require_with::<WorkerPool>(Criteria::new().with("pool", "io"))?;
        let backups = injector.require_all::<WorkerPool>();
        let label = injector.optional::<String>()?;
        if pool.threads == 0 {
            return Err(injector.invalid("io pool has no threads"));
        }
        Ok(Self {
            pool,
            backups,
            label,
        })
    }
}

#[test]
fn qualified_injection_point_uses_criteria() {
    let container = Arc::new(Container::new());
    container.put(WorkerPool { threads: 8 }).unwrap();
    container
        .put_qualified(
            WorkerPool { threads: 2 },
            maia::CriteriaMatcher::new("pool", "io"),
        )
        .unwrap();

    let agent = Agent::new("agent-2");
    agent.deploy_to(container);
    let role = agent.add_role::<PinnedPool>().unwrap();
    assert_eq!(role.pool.threads, 2);
    assert_eq!(role.backups.len(), 2);
    assert!(role.label.is_none());

    let points = agent.injection_points::<PinnedPool>().unwrap();
    assert_eq!(points[0].criteria, Criteria::new().with("pool", "io"));
}

#[test]
fn role_validation_failure_is_propagated() {
    let container = Arc::new(Container::new());
    container
        .put_qualified(
            WorkerPool { threads: 0 },
            maia::CriteriaMatcher::new("pool", "io"),
        )
        .unwrap();
    let agent = Agent::new("agent-3");
    agent.deploy_to(container);
    let err = agent.add_role::<PinnedPool>().unwrap_err();
    assert!(matches!(
        err,
        AgentError::Inject {
            source: InjectError::Invalid { role: "PinnedPool", .. },
            ..
        }
    ));
    assert!(!agent.has_role::<PinnedPool>());
}

#[test]
fn ambiguous_dependency_fails_attachment_in_strict_mode() {
    let container = Arc::new(Container::with_config(ContainerConfig::strict()));
    container.put("TEST".to_string()).unwrap();
    container.put(WorkerPool { threads: 1 }).unwrap();
    container
        .put_qualified(WorkerPool { threads: 3 }, maia::CriteriaKeyMatcher::new("pool"))
        .unwrap();
    container
        .put_qualified(
            WorkerPool { threads: 4 },
            maia::CriteriaMatcher::new("pool", "io"),
        )
        .unwrap();

    let agent = Agent::new("agent-4");
    agent.deploy_to(container);
    // ExampleRole asks with empty criteria: only the unconditional pool qualifies
    assert_eq!(agent.add_role::<ExampleRole>().unwrap().pool.threads, 1);

    let err = agent.add_role::<PinnedPool>().unwrap_err();
    assert!(matches!(
        err,
        AgentError::Inject {
            source: InjectError::Unsatisfied {
                source: ResolveError::Ambiguous { candidates: 2, .. },
                ..
            },
            ..
        }
    ));
    assert_eq!(agent.role_names(), vec!["ExampleRole"]);
}

#[test]
fn child_container_resolves_from_parent() {
    let root = Arc::new(Container::new());
    root.put(WorkerPool { threads: 16 }).unwrap();
    let child = Arc::new(Container::with_parent(Arc::clone(&root)));
    child.put("child".to_string()).unwrap();

    let agent = Agent::new("agent-5");
    agent.deploy_to(child);
    let role = agent.add_role::<ExampleRole>().unwrap();
    assert_eq!(role.pool.threads, 16);
    assert_eq!(*role.label, "child");
}
