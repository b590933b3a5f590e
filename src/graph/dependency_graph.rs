use crate::graph::relation::RelationType;
use crate::task::TaskId;
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{Bfs, EdgeRef};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;
use tracing::warn;

/// A directed constraint `from -> to` between two tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyEdge {
    pub from: TaskId,
    pub to: TaskId,
    #[serde(default)]
    pub relation: RelationType,
    #[serde(default)]
    pub delay_days: i32,
}

impl DependencyEdge {
    pub fn new(from: TaskId, to: TaskId, relation: RelationType) -> Self {
        Self {
            from,
            to,
            relation,
            delay_days: 0,
        }
    }

    pub fn precedes(from: TaskId, to: TaskId) -> Self {
        Self::new(from, to, RelationType::Precedes)
    }

    pub fn with_delay(mut self, delay_days: i32) -> Self {
        self.delay_days = delay_days;
        self
    }
}

/// Identifier of an edge within one graph. Ids increase with insertion order
/// and are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeId(u64);

impl EdgeId {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DependencyError {
    #[error("task {0} cannot depend on itself")]
    SelfEdge(TaskId),
    #[error("dependency {from} -> {to} would create a dependency cycle")]
    Cycle { from: TaskId, to: TaskId },
    #[error("dependency {from} -> {to} already exists")]
    AlreadyExists { from: TaskId, to: TaskId },
}

#[derive(Debug, Clone)]
struct StoredEdge {
    id: EdgeId,
    edge: DependencyEdge,
}

/// Dependency edges for one scope (e.g. one project), with cycle checks.
///
/// Build one from the current edge set, validate or apply a change, then drop it.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    graph: DiGraph<TaskId, StoredEdge>,
    id_to_index: HashMap<TaskId, NodeIndex>,
    next_edge: u64,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads existing edges as-is. The stored set may already contain cycles;
    /// only self-edges are dropped.
    pub fn from_edges<I>(edges: I) -> Self
    where
        I: IntoIterator<Item = DependencyEdge>,
    {
        let mut graph = Self::new();
        for edge in edges {
            if edge.from == edge.to {
                warn!(task = edge.from, "skipping stored self-dependency");
                continue;
            }
            graph.insert_unchecked(edge);
        }
        graph
    }

    /// True when adding `from -> to` would let some task reach itself.
    ///
    /// Breadth-first search from `to` along outgoing edges of every relation
    /// type; each task is expanded at most once.
    pub fn would_create_cycle(&self, from: TaskId, to: TaskId) -> bool {
        if from == to {
            return true;
        }
        let (Some(&start), Some(&target)) = (self.id_to_index.get(&to), self.id_to_index.get(&from))
        else {
            return false;
        };
        let mut bfs = Bfs::new(&self.graph, start);
        while let Some(node) = bfs.next(&self.graph) {
            if node == target {
                return true;
            }
        }
        false
    }

    pub fn add_edge(
        &mut self,
        from: TaskId,
        to: TaskId,
        relation: RelationType,
        delay_days: i32,
    ) -> Result<EdgeId, DependencyError> {
        self.insert(DependencyEdge {
            from,
            to,
            relation,
            delay_days,
        })
    }

    pub fn insert(&mut self, edge: DependencyEdge) -> Result<EdgeId, DependencyError> {
        if edge.from == edge.to {
            return Err(DependencyError::SelfEdge(edge.from));
        }
        if self.would_create_cycle(edge.from, edge.to) {
            return Err(DependencyError::Cycle {
                from: edge.from,
                to: edge.to,
            });
        }
        Ok(self.insert_unchecked(edge))
    }

    /// Removes the oldest edge `from -> to`. Absent edges are not an error.
    pub fn remove_edge(&mut self, from: TaskId, to: TaskId) -> Option<DependencyEdge> {
        let (&from_ix, &to_ix) = (self.id_to_index.get(&from)?, self.id_to_index.get(&to)?);
        let index = self
            .graph
            .edges_directed(from_ix, Direction::Outgoing)
            .filter(|edge| edge.target() == to_ix)
            .min_by_key(|edge| edge.weight().id)
            .map(|edge| edge.id())?;
        self.graph.remove_edge(index).map(|stored| stored.edge)
    }

    /// Tasks that `task` precedes, in insertion order. Drives arrow rendering.
    pub fn dependents_of(&self, task: TaskId) -> Vec<TaskId> {
        let Some(&node) = self.id_to_index.get(&task) else {
            return Vec::new();
        };
        let mut dependents: Vec<(EdgeId, TaskId)> = self
            .graph
            .edges_directed(node, Direction::Outgoing)
            .filter(|edge| edge.weight().edge.relation == RelationType::Precedes)
            .map(|edge| (edge.weight().id, edge.weight().edge.to))
            .collect();
        dependents.sort_unstable();
        dependents.into_iter().map(|(_, to)| to).collect()
    }

    pub fn contains_edge(&self, from: TaskId, to: TaskId) -> bool {
        match (self.id_to_index.get(&from), self.id_to_index.get(&to)) {
            (Some(&a), Some(&b)) => self.graph.find_edge(a, b).is_some(),
            _ => false,
        }
    }

    pub fn edge(&self, id: EdgeId) -> Option<&DependencyEdge> {
        self.graph
            .raw_edges()
            .iter()
            .find(|raw| raw.weight.id == id)
            .map(|raw| &raw.weight.edge)
    }

    /// All edges in insertion order.
    pub fn edges(&self) -> Vec<(EdgeId, &DependencyEdge)> {
        let mut edges: Vec<(EdgeId, &DependencyEdge)> = self
            .graph
            .raw_edges()
            .iter()
            .map(|raw| (raw.weight.id, &raw.weight.edge))
            .collect();
        edges.sort_by_key(|(id, _)| *id);
        edges
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.edge_count() == 0
    }

    fn node(&mut self, task: TaskId) -> NodeIndex {
        *self
            .id_to_index
            .entry(task)
            .or_insert_with(|| self.graph.add_node(task))
    }

    fn insert_unchecked(&mut self, edge: DependencyEdge) -> EdgeId {
        let from = self.node(edge.from);
        let to = self.node(edge.to);
        let id = EdgeId(self.next_edge);
        self.next_edge += 1;
        self.graph.add_edge(from, to, StoredEdge { id, edge });
        id
    }
}
