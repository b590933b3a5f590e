use crate::calculations::week_grid::Week;
use crate::calendar::{inclusive_days, overlap_days};
use crate::task::Task;
use chrono::NaiveDate;

/// Hours of `task` that fall inside `week`.
///
/// Effort is spread evenly over every calendar day of the task span,
/// weekends included.
pub fn allocated_hours(task: &Task, week: &Week) -> f64 {
    allocated_hours_between(task, week.start, week.end)
}

/// Same as [`allocated_hours`] for an arbitrary inclusive window.
///
/// Returns zero when the task lacks dates or an estimate, when the spans do
/// not overlap, or when the task span is inverted. Invalid estimates
/// (negative or non-finite) also contribute nothing.
pub fn allocated_hours_between(task: &Task, window_start: NaiveDate, window_end: NaiveDate) -> f64 {
    let (Some((task_start, task_end)), Some(estimate)) = (task.span(), task.estimated_hours) else {
        return 0.0;
    };
    if !estimate.is_finite() || estimate < 0.0 {
        return 0.0;
    }

    let total_days = inclusive_days(task_start, task_end);
    if total_days <= 0 {
        return 0.0;
    }

    let overlap = overlap_days(task_start, task_end, window_start, window_end);
    if overlap == 0 {
        return 0.0;
    }

    estimate * overlap as f64 / total_days as f64
}
