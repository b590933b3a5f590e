pub mod calculations;
pub mod calendar;
pub mod capacity;
pub mod config;
pub mod graph;
pub mod input;
pub mod planner;
pub mod task;
pub mod task_validation;
pub mod timeline;
pub mod unassigned;

pub use calculations::effort::{allocated_hours, allocated_hours_between};
pub use calculations::load::{LoadClass, LoadThresholds};
pub use calculations::resource_rows::{
    AllocationCell, ResourceRow, ResourceRowAggregator, TaskAllocation, TaskPlacement,
};
pub use calculations::week_grid::{Week, WeekGrid, WeekGridBuilder};
pub use capacity::{CapacityBook, CapacityError, CapacityRecord};
pub use config::{ConfigError, PlannerConfig};
pub use graph::{
    DependencyEdge, DependencyError, DependencyGraph, DependencyProposal, DependencyService,
    EdgeStore, Endpoint, InMemoryEdgeStore, RelationType,
};
pub use input::{InputError, PlanningInput, load_planning_input_from_json, load_tasks_from_csv};
pub use planner::{Planner, PlannerError, PlanningReport};
pub use task::{Resource, StatusBand, Task, TaskId, TaskStatus};
pub use task_validation::TaskValidationError;
pub use timeline::{Timeline, TimelineEntry, TimelineRange};
pub use unassigned::UnassignedGroup;
