use super::support::{ExampleRole, WorkerPool};
use maia::{Agent, Container, Criteria, Qualifier};
use std::sync::Arc;
use std::thread;

#[test]
fn concurrent_registrations_are_not_lost() {
    let container = Arc::new(Container::new());
    let mut handles = vec![];
    for t in 0..8u64 {
        let container = Arc::clone(&container);
        handles.push(thread::spawn(move || {
            for i in 0..50u64 {
                container.put(t * 1000 + i).unwrap();
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(container.resolve_all::<u64>().len(), 400);

    // per-thread order survives interleaving
    let values = container.resolve_all::<u64>().to_vec();
    for t in 0..8u64 {
        let mine: Vec<u64> = values
            .iter()
            .map(|v| **v)
            .filter(|v| v / 1000 == t)
            .collect();
        assert_eq!(mine, (0..50).map(|i| t * 1000 + i).collect::<Vec<_>>());
    }
}

#[test]
fn readers_never_observe_partial_state() {
    let container = Arc::new(Container::new());
    container.put("base".to_string()).unwrap();

    let writer = {
        let container = Arc::clone(&container);
        thread::spawn(move || {
            for i in 0..200 {
                container
                    .register(Arc::new(format!("v{i}")), Some(Qualifier::criteria("id", i)))
                    .unwrap();
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let container = Arc::clone(&container);
            thread::spawn(move || {
                for _ in 0..200 {
                    let snapshot = container.lookup::<String>();
                    let all = container.resolve_all::<String>();
                    assert!(!snapshot.is_empty());
                    assert_eq!(all.iter().count(), all.len());
                    assert_eq!(**snapshot.as_slice()[0].value(), "base");
                    // the unqualified request always falls back to the base binding
                    assert_eq!(*container.get_with::<String>(Criteria::new()).unwrap(), "base");
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }
    assert_eq!(container.lookup::<String>().len(), 201);
    assert_eq!(
        *container
            .get_with::<String>(Criteria::new().with("id", 150))
            .unwrap(),
        "v150"
    );
}

#[test]
fn agents_attach_roles_while_container_grows() {
    let container = Arc::new(Container::new());
    container.put(WorkerPool { threads: 4 }).unwrap();
    container.put("TEST".to_string()).unwrap();

    let writer = {
        let container = Arc::clone(&container);
        thread::spawn(move || {
            for i in 0..100u32 {
                container.put(i).unwrap();
            }
        })
    };

    let attachers: Vec<_> = (0..4)
        .map(|n| {
            let container = Arc::clone(&container);
            thread::spawn(move || {
                let agent = Agent::new(format!("agent-{n}"));
                agent.deploy_to(container);
                agent.add_role::<ExampleRole>().unwrap().pool.threads
            })
        })
        .collect();

    writer.join().unwrap();
    for attacher in attachers {
        assert_eq!(attacher.join().unwrap(), 4);
    }
}

#[test]
fn same_agent_concurrent_add_role_attaches_once() {
    let container = Arc::new(Container::new());
    container.put(WorkerPool { threads: 1 }).unwrap();
    container.put("TEST".to_string()).unwrap();
    let agent = Arc::new(Agent::new("shared"));
    agent.deploy_to(container);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let agent = Arc::clone(&agent);
            thread::spawn(move || agent.add_role::<ExampleRole>().is_ok())
        })
        .collect();
    let successes = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|ok| *ok)
        .count();
    assert_eq!(successes, 1);
    assert_eq!(agent.role_names(), vec!["ExampleRole"]);
}
