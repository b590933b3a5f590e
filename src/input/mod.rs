use crate::capacity::{CapacityError, CapacityRecord};
use crate::graph::DependencyEdge;
use crate::task::{Resource, Task};
use crate::task_validation::{self, TaskValidationError};
use serde::{Deserialize, Serialize};
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Task(#[from] TaskValidationError),
    #[error(transparent)]
    Capacity(#[from] CapacityError),
    #[error("invalid data: {0}")]
    InvalidData(String),
}

pub type InputResult<T> = Result<T, InputError>;

/// Everything the planner reads from the external task store for one scope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanningInput {
    #[serde(default)]
    pub resources: Vec<Resource>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub capacities: Vec<CapacityRecord>,
    #[serde(default)]
    pub edges: Vec<DependencyEdge>,
}

pub fn validate_tasks(tasks: &[Task]) -> InputResult<()> {
    task_validation::validate_task_collection(tasks)?;
    Ok(())
}

pub fn validate_input(input: &PlanningInput) -> InputResult<()> {
    validate_tasks(&input.tasks)?;
    for record in &input.capacities {
        record.validate()?;
    }
    if let Some(edge) = input.edges.iter().find(|edge| edge.from == edge.to) {
        return Err(InputError::InvalidData(format!(
            "task {} cannot depend on itself",
            edge.from
        )));
    }
    Ok(())
}

pub mod file;

pub use file::{load_planning_input_from_json, load_tasks_from_csv};
