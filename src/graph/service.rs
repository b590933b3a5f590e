use crate::graph::dependency_graph::{DependencyEdge, DependencyError, DependencyGraph};
use crate::graph::relation::{Endpoint, RelationType, resolve};
use crate::task::TaskId;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use tracing::info;

/// Key of an independent dependency set, e.g. a project id.
pub type ScopeId = i32;

/// Backing storage for dependency edges, owned by the caller.
pub trait EdgeStore {
    type Error;

    fn load_edges(&self, scope: ScopeId) -> Result<Vec<DependencyEdge>, Self::Error>;
    /// Persists a new edge and returns the store's identifier for it.
    fn insert_edge(&self, scope: ScopeId, edge: &DependencyEdge) -> Result<u64, Self::Error>;
    fn remove_edge(&self, scope: ScopeId, from: TaskId, to: TaskId) -> Result<bool, Self::Error>;
}

#[derive(Debug, Error)]
pub enum ServiceError<E> {
    #[error(transparent)]
    Dependency(#[from] DependencyError),
    #[error("edge store error: {0}")]
    Store(#[source] E),
}

/// A dependency drawn between two task endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyProposal {
    pub from: TaskId,
    pub to: TaskId,
    pub source_endpoint: Endpoint,
    pub target_endpoint: Endpoint,
    #[serde(default)]
    pub delay_days: i32,
}

impl DependencyProposal {
    pub fn new(from: TaskId, source_endpoint: Endpoint, to: TaskId, target_endpoint: Endpoint) -> Self {
        Self {
            from,
            to,
            source_endpoint,
            target_endpoint,
            delay_days: 0,
        }
    }

    pub fn relation(&self) -> RelationType {
        resolve(self.source_endpoint, self.target_endpoint)
    }

    pub fn edge(&self) -> DependencyEdge {
        DependencyEdge::new(self.from, self.to, self.relation()).with_delay(self.delay_days)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedDependency {
    pub record_id: u64,
    pub edge: DependencyEdge,
}

/// Validates a proposal against the current edge set without changing anything.
///
/// Duplicate ordered pairs are rejected here even though the graph itself
/// tolerates parallel edges.
pub fn check_proposal(
    graph: &DependencyGraph,
    proposal: &DependencyProposal,
) -> Result<DependencyEdge, DependencyError> {
    let edge = proposal.edge();
    if edge.from == edge.to {
        return Err(DependencyError::SelfEdge(edge.from));
    }
    if graph.contains_edge(edge.from, edge.to) {
        return Err(DependencyError::AlreadyExists {
            from: edge.from,
            to: edge.to,
        });
    }
    if graph.would_create_cycle(edge.from, edge.to) {
        return Err(DependencyError::Cycle {
            from: edge.from,
            to: edge.to,
        });
    }
    Ok(edge)
}

/// Serializes dependency changes per scope so the cycle check and the insert
/// run against the same snapshot.
pub struct DependencyService<S> {
    store: S,
    scope_locks: RwLock<HashMap<ScopeId, Arc<Mutex<()>>>>,
}

impl<S: EdgeStore> DependencyService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            scope_locks: RwLock::new(HashMap::new()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn create_dependency(
        &self,
        scope: ScopeId,
        proposal: &DependencyProposal,
    ) -> Result<CreatedDependency, ServiceError<S::Error>> {
        let lock = self.scope_lock(scope);
        let result = {
            let _guard = lock.lock();
            self.check_and_insert(scope, proposal)
        };
        self.release_scope(scope, lock);
        result
    }

    fn check_and_insert(
        &self,
        scope: ScopeId,
        proposal: &DependencyProposal,
    ) -> Result<CreatedDependency, ServiceError<S::Error>> {
        let graph = self.load_graph(scope)?;
        let edge = check_proposal(&graph, proposal)?;
        let record_id = self
            .store
            .insert_edge(scope, &edge)
            .map_err(ServiceError::Store)?;
        info!(
            scope,
            from = edge.from,
            to = edge.to,
            relation = %edge.relation,
            record_id,
            "dependency created"
        );
        Ok(CreatedDependency { record_id, edge })
    }

    pub fn remove_dependency(
        &self,
        scope: ScopeId,
        from: TaskId,
        to: TaskId,
    ) -> Result<bool, ServiceError<S::Error>> {
        let lock = self.scope_lock(scope);
        let result = {
            let _guard = lock.lock();
            self.store
                .remove_edge(scope, from, to)
                .map_err(ServiceError::Store)
        };
        self.release_scope(scope, lock);
        result
    }

    /// Current graph for a scope, read without taking the scope lock.
    pub fn load_graph(&self, scope: ScopeId) -> Result<DependencyGraph, ServiceError<S::Error>> {
        let edges = self.store.load_edges(scope).map_err(ServiceError::Store)?;
        Ok(DependencyGraph::from_edges(edges))
    }

    fn scope_lock(&self, scope: ScopeId) -> Arc<Mutex<()>> {
        if let Some(lock) = self.scope_locks.read().get(&scope) {
            return lock.clone();
        }
        self.scope_locks
            .write()
            .entry(scope)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Drops the scope's lock entry once no other caller holds or waits on it.
    fn release_scope(&self, scope: ScopeId, lock: Arc<Mutex<()>>) {
        let mut locks = self.scope_locks.write();
        let idle = locks
            .get(&scope)
            .is_some_and(|held| Arc::ptr_eq(held, &lock) && Arc::strong_count(&lock) == 2);
        if idle {
            locks.remove(&scope);
        }
    }

    /// Scopes with a change currently in flight.
    pub fn active_scopes(&self) -> usize {
        self.scope_locks.read().len()
    }
}

/// Edge store kept in memory, for tests and one-shot tools.
#[derive(Debug, Default)]
pub struct InMemoryEdgeStore {
    scopes: RwLock<HashMap<ScopeId, Vec<(u64, DependencyEdge)>>>,
    next_id: AtomicU64,
}

impl InMemoryEdgeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_edges<I>(scope: ScopeId, edges: I) -> Self
    where
        I: IntoIterator<Item = DependencyEdge>,
    {
        let store = Self::new();
        for edge in edges {
            let _ = store.insert_edge(scope, &edge);
        }
        store
    }

    pub fn edge_count(&self, scope: ScopeId) -> usize {
        self.scopes.read().get(&scope).map_or(0, Vec::len)
    }
}

impl EdgeStore for InMemoryEdgeStore {
    type Error = Infallible;

    fn load_edges(&self, scope: ScopeId) -> Result<Vec<DependencyEdge>, Self::Error> {
        Ok(self
            .scopes
            .read()
            .get(&scope)
            .map(|edges| edges.iter().map(|(_, edge)| edge.clone()).collect())
            .unwrap_or_default())
    }

    fn insert_edge(&self, scope: ScopeId, edge: &DependencyEdge) -> Result<u64, Self::Error> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.scopes
            .write()
            .entry(scope)
            .or_default()
            .push((id, edge.clone()));
        Ok(id)
    }

    fn remove_edge(&self, scope: ScopeId, from: TaskId, to: TaskId) -> Result<bool, Self::Error> {
        let mut scopes = self.scopes.write();
        let Some(edges) = scopes.get_mut(&scope) else {
            return Ok(false);
        };
        match edges
            .iter()
            .position(|(_, edge)| edge.from == from && edge.to == to)
        {
            Some(position) => {
                edges.remove(position);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
