use workload_planner::{DependencyEdge, DependencyError, DependencyGraph, RelationType};

fn chain() -> DependencyGraph {
    DependencyGraph::from_edges([DependencyEdge::precedes(1, 2), DependencyEdge::precedes(2, 3)])
}

#[test]
fn closing_a_chain_is_rejected_as_cycle() {
    let mut graph = chain();

    let err = graph
        .add_edge(3, 1, RelationType::Precedes, 0)
        .unwrap_err();
    assert_eq!(err, DependencyError::Cycle { from: 3, to: 1 });
    assert_eq!(graph.edge_count(), 2);

    graph
        .add_edge(1, 3, RelationType::Precedes, 0)
        .expect("forward shortcut is acyclic");
    assert_eq!(graph.edge_count(), 3);
}

#[test]
fn inserted_edge_makes_reverse_a_cycle() {
    let pairs = [(1, 2), (2, 5), (5, 9), (4, 2), (9, 11)];
    let mut graph = DependencyGraph::new();
    for (from, to) in pairs {
        graph.add_edge(from, to, RelationType::Precedes, 0).unwrap();
        assert!(graph.would_create_cycle(to, from));
    }
    assert!(graph.would_create_cycle(11, 1));
    assert!(graph.would_create_cycle(9, 4));
    assert!(!graph.would_create_cycle(4, 1));
}

#[test]
fn self_edge_is_rejected() {
    let mut graph = DependencyGraph::new();
    let err = graph.add_edge(7, 7, RelationType::Blocks, 0).unwrap_err();
    assert_eq!(err, DependencyError::SelfEdge(7));
    assert!(graph.is_empty());
    assert!(graph.would_create_cycle(7, 7));
}

#[test]
fn unknown_tasks_never_form_cycles() {
    let graph = chain();
    assert!(!graph.would_create_cycle(40, 41));
    assert!(!graph.would_create_cycle(3, 41));
    assert!(!graph.would_create_cycle(41, 1));
}

#[test]
fn cycle_check_follows_every_relation_type() {
    let mut graph = DependencyGraph::new();
    graph.add_edge(1, 2, RelationType::Relates, 0).unwrap();
    graph.add_edge(2, 3, RelationType::Blocks, 0).unwrap();

    let err = graph
        .insert(DependencyEdge::new(3, 1, RelationType::Duplicates))
        .unwrap_err();
    assert!(matches!(err, DependencyError::Cycle { .. }));
}

#[test]
fn diamond_is_acyclic_and_terminates() {
    let graph = DependencyGraph::from_edges([
        DependencyEdge::precedes(1, 2),
        DependencyEdge::precedes(1, 3),
        DependencyEdge::precedes(2, 4),
        DependencyEdge::precedes(3, 4),
    ]);
    assert!(!graph.would_create_cycle(1, 4));
    assert!(graph.would_create_cycle(4, 1));
}

#[test]
fn already_cyclic_store_is_loaded_and_search_terminates() {
    let graph = DependencyGraph::from_edges([
        DependencyEdge::precedes(1, 2),
        DependencyEdge::precedes(2, 1),
        DependencyEdge::precedes(5, 5),
    ]);
    assert_eq!(graph.edge_count(), 2);
    assert!(graph.would_create_cycle(2, 1));
    assert!(!graph.would_create_cycle(3, 1));
}

#[test]
fn remove_edge_is_idempotent() {
    let mut graph = chain();

    let removed = graph.remove_edge(2, 3).expect("edge present");
    assert_eq!(removed, DependencyEdge::precedes(2, 3));
    assert!(graph.remove_edge(2, 3).is_none());
    assert!(graph.remove_edge(8, 9).is_none());
    assert_eq!(graph.edge_count(), 1);

    graph
        .add_edge(3, 1, RelationType::Precedes, 0)
        .expect("chain is broken");
}

#[test]
fn remove_edge_takes_oldest_parallel_edge() {
    let mut graph = DependencyGraph::from_edges([
        DependencyEdge::new(1, 2, RelationType::Blocks),
        DependencyEdge::precedes(1, 2).with_delay(3),
    ]);
    let removed = graph.remove_edge(1, 2).unwrap();
    assert_eq!(removed.relation, RelationType::Blocks);

    let remaining: Vec<&DependencyEdge> = graph.edges().into_iter().map(|(_, edge)| edge).collect();
    assert_eq!(remaining, vec![&DependencyEdge::precedes(1, 2).with_delay(3)]);
}

#[test]
fn dependents_only_lists_precedes_targets_in_order() {
    let mut graph = DependencyGraph::new();
    graph.add_edge(1, 4, RelationType::Precedes, 0).unwrap();
    graph.add_edge(1, 2, RelationType::Blocks, 0).unwrap();
    graph.add_edge(1, 3, RelationType::Precedes, 2).unwrap();

    assert_eq!(graph.dependents_of(1), vec![4, 3]);
    assert!(graph.dependents_of(3).is_empty());
    assert!(graph.dependents_of(99).is_empty());
}

#[test]
fn edge_ids_resolve_to_inserted_edges() {
    let mut graph = DependencyGraph::new();
    let first = graph.add_edge(1, 2, RelationType::Precedes, 0).unwrap();
    let second = graph.add_edge(2, 3, RelationType::Relates, 1).unwrap();

    assert!(first.value() < second.value());
    assert_eq!(graph.edge(second), Some(&DependencyEdge::new(2, 3, RelationType::Relates).with_delay(1)));
    assert!(graph.contains_edge(1, 2));
    assert!(!graph.contains_edge(2, 1));
}

#[test]
fn edges_round_trip_through_json() {
    let json = r#"[{"from": 1, "to": 2}, {"from": 2, "to": 3, "relation": "blocks", "delay_days": 2}]"#;
    let edges: Vec<DependencyEdge> = serde_json::from_str(json).unwrap();
    assert_eq!(edges[0].relation, RelationType::Precedes);
    assert_eq!(edges[0].delay_days, 0);
    assert_eq!(edges[1], DependencyEdge::new(2, 3, RelationType::Blocks).with_delay(2));
}
