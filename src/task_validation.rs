use crate::task::{Task, TaskId};
use chrono::NaiveDate;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TaskValidationError {
    #[error("task {id} starts on {start} which is after its due date {due}")]
    InvalidDateRange {
        id: TaskId,
        start: NaiveDate,
        due: NaiveDate,
    },
    #[error("task {id} has invalid estimated hours {hours}")]
    InvalidEstimate { id: TaskId, hours: f64 },
    #[error("task {id} has done ratio {ratio} (must be between 0 and 100)")]
    InvalidDoneRatio { id: TaskId, ratio: u8 },
    #[error("duplicate task id {0}")]
    DuplicateId(TaskId),
}

/// Checks a task before it enters the planner.
///
/// Calculations stay total over malformed records, so this is the place to
/// reject them at the boundary.
pub fn validate_task(task: &Task) -> Result<(), TaskValidationError> {
    if let Some((start, due)) = task.span() {
        if start > due {
            return Err(TaskValidationError::InvalidDateRange {
                id: task.id,
                start,
                due,
            });
        }
    }

    if let Some(hours) = task.estimated_hours {
        if !hours.is_finite() || hours < 0.0 {
            return Err(TaskValidationError::InvalidEstimate { id: task.id, hours });
        }
    }

    if task.done_ratio > 100 {
        return Err(TaskValidationError::InvalidDoneRatio {
            id: task.id,
            ratio: task.done_ratio,
        });
    }

    Ok(())
}

pub fn validate_task_collection(tasks: &[Task]) -> Result<(), TaskValidationError> {
    let mut seen_ids = HashSet::with_capacity(tasks.len());
    for task in tasks {
        if !seen_ids.insert(task.id) {
            return Err(TaskValidationError::DuplicateId(task.id));
        }
        validate_task(task)?;
    }
    Ok(())
}
