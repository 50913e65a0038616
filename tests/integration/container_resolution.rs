use maia::{
    AmbiguityPolicy, Container, ContainerConfig, Criteria, DuplicatePolicy, EqualsMatcher,
    Qualifier, ResolutionRequest, ResolveError,
};
use std::sync::Arc;

#[test]
fn unconditional_then_equality_guarded_binding() {
    let container = Container::new();
    container.put("TEST".to_string()).unwrap();
    assert_eq!(*container.get::<String>().unwrap(), "TEST");

    container
        .put_qualified("OTHER".to_string(), EqualsMatcher::new("OTHER".to_string()))
        .unwrap();

    // The equality matcher inspects the candidate, so it accepts its own value
    // and conditional matches take precedence over unconditional bindings.
    for _ in 0..3 {
        assert_eq!(*container.get::<String>().unwrap(), "OTHER");
    }
    assert_eq!(
        *container
            .get_with::<String>(Criteria::new().with("name", "TEST"))
            .unwrap(),
        "OTHER"
    );
}

#[test]
fn criteria_selects_among_same_type() {
    let container = Container::new();
    container.put("shared".to_string()).unwrap();
    container
        .put_qualified("io".to_string(), maia::CriteriaMatcher::new("pool", "io"))
        .unwrap();
    container
        .put_qualified("cpu".to_string(), maia::CriteriaMatcher::new("pool", "cpu"))
        .unwrap();

    let resolve = |criteria: Criteria| (*container.get_with::<String>(criteria).unwrap()).clone();
    assert_eq!(resolve(Criteria::new().with("pool", "io")), "io");
    assert_eq!(resolve(Criteria::new().with("pool", "cpu")), "cpu");
    assert_eq!(resolve(Criteria::new().with("pool", "gpu")), "shared");
    assert_eq!(resolve(Criteria::new()), "shared");
}

#[test]
fn empty_container_reports_not_found() {
    let container = Container::new();
    let err = container
        .resolve(&ResolutionRequest::<Vec<u8>>::new(Criteria::new().with("k", 1)))
        .unwrap_err();
    assert!(matches!(err, ResolveError::NotFound { .. }));
    assert!(err.to_string().contains("k=1"));
}

#[test]
fn strict_duplicates_conflict_permissive_coexist() {
    let strict = Container::with_config(ContainerConfig {
        duplicates: DuplicatePolicy::Reject,
        ambiguity: AmbiguityPolicy::FirstWins,
    });
    strict
        .put_qualified("a".to_string(), EqualsMatcher::new("a".to_string()))
        .unwrap();
    let conflict = strict
        .put_qualified("a".to_string(), EqualsMatcher::new("a".to_string()))
        .unwrap_err();
    assert_eq!(conflict.qualifier, r#"EqualsMatcher("a")"#);
    assert_eq!(strict.lookup::<String>().len(), 1);

    // the caller may recover by replacing
    assert_eq!(
        strict.replace("a".to_string(), Some(Qualifier::equals("a".to_string()))),
        1
    );
    assert_eq!(strict.lookup::<String>().len(), 1);

    let permissive = Container::new();
    let first = Arc::new(1u32);
    permissive.put_arc(Arc::clone(&first)).unwrap();
    permissive.put_arc(Arc::new(1u32)).unwrap();
    let resolved = permissive.get::<u32>().unwrap();
    assert!(Arc::ptr_eq(&first, &resolved));
    assert_eq!(permissive.resolve_all::<u32>().len(), 2);
}

#[test]
fn strict_ambiguity_rejects_first_wins() {
    let container = Container::with_config(ContainerConfig::strict());
    container
        .put_qualified(1u16, maia::CriteriaKeyMatcher::new("tier"))
        .unwrap();
    container
        .put_qualified(2u16, maia::CriteriaMatcher::new("tier", "gold"))
        .unwrap();

    let err = container
        .get_with::<u16>(Criteria::new().with("tier", "gold"))
        .unwrap_err();
    assert_eq!(
        err,
        ResolveError::Ambiguous {
            type_name: "u16",
            criteria: r#"{tier="gold"}"#.to_string(),
            candidates: 2,
        }
    );
    assert_eq!(
        *container
            .get_with::<u16>(Criteria::new().with("tier", "silver"))
            .unwrap(),
        1
    );
}

#[test]
fn resolve_all_follows_registration_order() {
    let container = Container::new();
    container.put(3i64).unwrap();
    container
        .put_qualified(1i64, EqualsMatcher::new(1i64))
        .unwrap();
    container.put(2i64).unwrap();

    let all = container.resolve_all::<i64>();
    let values: Vec<i64> = all.iter().map(|v| *v).collect();
    assert_eq!(values, vec![3, 1, 2]);
    assert_eq!(all.len(), 3);

    // restartable, and a snapshot: later registrations are not visible
    container.put(4i64).unwrap();
    assert_eq!(all.iter().count(), 3);
    assert_eq!(container.resolve_all::<i64>().len(), 4);
}

#[test]
fn remove_unqualified_binding() {
    let container = Container::new();
    container.put("base".to_string()).unwrap();
    container
        .put_qualified("x".to_string(), EqualsMatcher::new("x".to_string()))
        .unwrap();
    assert_eq!(container.remove::<String>(None), 1);
    assert_eq!(*container.get::<String>().unwrap(), "x");
    assert_eq!(
        container.remove(Some(&Qualifier::equals("x".to_string()))),
        1
    );
    assert!(container.get::<String>().is_err());
}
