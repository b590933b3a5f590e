use crate::calculations::load::LoadThresholds;
use crate::calculations::resource_rows::{ResourceRow, ResourceRowAggregator};
use crate::calculations::week_grid::{WeekGrid, WeekGridBuilder};
use crate::capacity::{CapacityBook, CapacityError};
use crate::config::{ConfigError, PlannerConfig};
use crate::graph::{DependencyEdge, DependencyError, DependencyGraph, DependencyProposal, check_proposal};
use crate::input::PlanningInput;
use crate::task::Task;
use crate::timeline::{Timeline, build_timeline};
use crate::unassigned::{UnassignedGroup, by_schedule, group_unassigned};
use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Capacity(#[from] CapacityError),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanningReport {
    pub weeks: WeekGrid,
    pub resource_rows: Vec<ResourceRow>,
    /// Open tasks without an assignee, keyed by category.
    pub unassigned: Vec<UnassignedGroup<String>>,
}

#[derive(Debug, Clone, Default)]
pub struct Planner {
    config: PlannerConfig,
}

impl Planner {
    pub fn new(config: PlannerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn week_grid(&self, input: &PlanningInput, today: NaiveDate) -> WeekGrid {
        let open = open_tasks(&input.tasks);
        WeekGridBuilder::from_config(&self.config).build(&open, today)
    }

    pub fn plan(&self, input: &PlanningInput, today: NaiveDate) -> Result<PlanningReport, PlannerError> {
        let open = open_tasks(&input.tasks);
        let weeks = WeekGridBuilder::from_config(&self.config).build(&open, today);
        let capacities = CapacityBook::from_records(
            input.capacities.iter().cloned(),
            self.config.default_capacity_hours,
        )?;
        let resource_rows = ResourceRowAggregator::new(&weeks, &capacities)
            .with_thresholds(LoadThresholds::from(&self.config))
            .aggregate(&input.resources, &open);
        let unassigned = group_unassigned(&open, |task| task.category.clone(), by_schedule);

        debug!(
            weeks = weeks.len(),
            resources = resource_rows.len(),
            open_tasks = open.len(),
            "planned workload"
        );
        Ok(PlanningReport {
            weeks,
            resource_rows,
            unassigned,
        })
    }

    pub fn timeline(&self, input: &PlanningInput, today: NaiveDate) -> Timeline {
        let graph = DependencyGraph::from_edges(input.edges.iter().cloned());
        build_timeline(&input.tasks, &graph, today, self.config.timeline_padding_days)
    }

    /// Checks a proposed dependency against the input's current edges.
    pub fn check_dependency(
        &self,
        input: &PlanningInput,
        proposal: &DependencyProposal,
    ) -> Result<DependencyEdge, DependencyError> {
        let graph = DependencyGraph::from_edges(input.edges.iter().cloned());
        check_proposal(&graph, proposal)
    }
}

fn open_tasks(tasks: &[Task]) -> Vec<Task> {
    tasks.iter().filter(|task| task.is_open()).cloned().collect()
}
