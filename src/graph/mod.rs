pub mod dependency_graph;
pub mod relation;
pub mod service;

pub use dependency_graph::{DependencyEdge, DependencyError, DependencyGraph, EdgeId};
pub use relation::{Endpoint, EndpointParseError, RelationParseError, RelationType, resolve};
pub use service::{
    CreatedDependency, DependencyProposal, DependencyService, EdgeStore, InMemoryEdgeStore,
    ScopeId, ServiceError, check_proposal,
};
