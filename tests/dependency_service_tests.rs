use std::convert::Infallible;
use std::sync::Barrier;
use std::thread;
use std::time::Duration;
use workload_planner::graph::{DependencyProposal, ServiceError};
use workload_planner::{
    DependencyEdge, DependencyError, DependencyService, EdgeStore, Endpoint, InMemoryEdgeStore,
    RelationType,
};

/// Widens the gap between reading the edge set and writing to it.
struct SlowStore {
    inner: InMemoryEdgeStore,
    delay: Duration,
}

impl EdgeStore for SlowStore {
    type Error = Infallible;

    fn load_edges(&self, scope: i32) -> Result<Vec<DependencyEdge>, Self::Error> {
        let edges = self.inner.load_edges(scope);
        thread::sleep(self.delay);
        edges
    }

    fn insert_edge(&self, scope: i32, edge: &DependencyEdge) -> Result<u64, Self::Error> {
        self.inner.insert_edge(scope, edge)
    }

    fn remove_edge(&self, scope: i32, from: i32, to: i32) -> Result<bool, Self::Error> {
        self.inner.remove_edge(scope, from, to)
    }
}

fn precedes(from: i32, to: i32) -> DependencyProposal {
    DependencyProposal::new(from, Endpoint::End, to, Endpoint::Start)
}

#[test]
fn creates_edge_with_resolved_relation() {
    let service = DependencyService::new(InMemoryEdgeStore::new());
    let created = service
        .create_dependency(1, &DependencyProposal::new(10, Endpoint::Start, 11, Endpoint::End))
        .unwrap();

    assert_eq!(created.edge.relation, RelationType::Duplicates);
    assert_eq!(service.store().edge_count(1), 1);
    assert!(service.load_graph(1).unwrap().contains_edge(10, 11));
}

#[test]
fn rejects_cycle_against_stored_edges() {
    let store = InMemoryEdgeStore::with_edges(
        1,
        [DependencyEdge::precedes(1, 2), DependencyEdge::precedes(2, 3)],
    );
    let service = DependencyService::new(store);

    let err = service.create_dependency(1, &precedes(3, 1)).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Dependency(DependencyError::Cycle { from: 3, to: 1 })
    ));
    assert!(service.create_dependency(1, &precedes(1, 3)).is_ok());
    assert_eq!(service.store().edge_count(1), 3);
}

#[test]
fn rejects_duplicate_and_self_edges() {
    let service = DependencyService::new(InMemoryEdgeStore::new());
    service.create_dependency(1, &precedes(1, 2)).unwrap();

    let duplicate = service.create_dependency(1, &precedes(1, 2)).unwrap_err();
    assert!(matches!(
        duplicate,
        ServiceError::Dependency(DependencyError::AlreadyExists { from: 1, to: 2 })
    ));

    let self_edge = service.create_dependency(1, &precedes(4, 4)).unwrap_err();
    assert!(matches!(
        self_edge,
        ServiceError::Dependency(DependencyError::SelfEdge(4))
    ));
    assert_eq!(service.store().edge_count(1), 1);
}

#[test]
fn scopes_are_independent() {
    let service = DependencyService::new(InMemoryEdgeStore::new());
    service.create_dependency(1, &precedes(1, 2)).unwrap();
    service
        .create_dependency(2, &precedes(2, 1))
        .expect("other scope has no edges");

    assert_eq!(service.store().edge_count(1), 1);
    assert_eq!(service.store().edge_count(2), 1);
}

#[test]
fn removing_a_dependency_frees_the_reverse_direction() {
    let service = DependencyService::new(InMemoryEdgeStore::new());
    service.create_dependency(1, &precedes(1, 2)).unwrap();

    assert!(service.remove_dependency(1, 1, 2).unwrap());
    assert!(!service.remove_dependency(1, 1, 2).unwrap());
    service.create_dependency(1, &precedes(2, 1)).unwrap();
}

#[test]
fn concurrent_opposite_proposals_admit_exactly_one() {
    for _ in 0..5 {
        let service = DependencyService::new(SlowStore {
            inner: InMemoryEdgeStore::new(),
            delay: Duration::from_millis(20),
        });
        let barrier = Barrier::new(2);

        let results: Vec<bool> = thread::scope(|scope| {
            let forward = scope.spawn(|| {
                barrier.wait();
                service.create_dependency(7, &precedes(1, 2)).is_ok()
            });
            let backward = scope.spawn(|| {
                barrier.wait();
                service.create_dependency(7, &precedes(2, 1)).is_ok()
            });
            vec![forward.join().unwrap(), backward.join().unwrap()]
        });

        assert_eq!(results.iter().filter(|ok| **ok).count(), 1);
        assert_eq!(service.active_scopes(), 0);
        let graph = service.load_graph(7).unwrap();
        assert_eq!(graph.edge_count(), 1);
    }
}

#[test]
fn scope_locks_are_released_after_each_change() {
    let service = DependencyService::new(InMemoryEdgeStore::new());
    for scope in 0..50 {
        service.create_dependency(scope, &precedes(1, 2)).unwrap();
        assert!(service.create_dependency(scope, &precedes(2, 1)).is_err());
        service.remove_dependency(scope, 1, 2).unwrap();
    }
    assert_eq!(service.active_scopes(), 0);
}
