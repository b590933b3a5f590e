use crate::calendar::{add_months, inclusive_days};
use crate::config::MAX_TIMELINE_PADDING_DAYS;
use crate::graph::DependencyGraph;
use crate::task::{StatusBand, Task, TaskId};
use chrono::{Duration, NaiveDate};
use serde::Serialize;

const UNASSIGNED_LABEL: &str = "Unassigned";

/// Visible date window of the Gantt view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimelineRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl TimelineRange {
    /// Spans every task that has both dates, widened by `padding_days` on each
    /// side. Without any dated task the window runs from one month before
    /// `today` to two months after it. Padding is clamped to
    /// `0..=MAX_TIMELINE_PADDING_DAYS`.
    pub fn for_tasks<'a, I>(tasks: I, today: NaiveDate, padding_days: i64) -> Self
    where
        I: IntoIterator<Item = &'a Task>,
    {
        let mut bounds: Option<(NaiveDate, NaiveDate)> = None;
        for (start, end) in tasks.into_iter().filter_map(Task::span) {
            bounds = Some(match bounds {
                Some((min, max)) => (min.min(start), max.max(end)),
                None => (start, end),
            });
        }
        let (start, end) = bounds.unwrap_or_else(|| (add_months(today, -1), add_months(today, 2)));
        let padding = Duration::days(padding_days.clamp(0, MAX_TIMELINE_PADDING_DAYS));
        Self {
            start: start - padding,
            end: end + padding,
        }
    }

    pub fn total_days(&self) -> i64 {
        inclusive_days(self.start, self.end)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineEntry {
    pub id: TaskId,
    pub name: String,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub progress: u8,
    pub status: String,
    pub band: StatusBand,
    pub assignee: String,
    pub priority: Option<String>,
    /// Tasks this one precedes.
    pub dependencies: Vec<TaskId>,
    /// Days from the range start; only for tasks with both dates.
    pub offset_days: Option<i64>,
    pub duration_days: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Timeline {
    pub range: TimelineRange,
    pub entries: Vec<TimelineEntry>,
}

pub fn build_timeline(
    tasks: &[Task],
    graph: &DependencyGraph,
    today: NaiveDate,
    padding_days: i64,
) -> Timeline {
    let range = TimelineRange::for_tasks(tasks, today, padding_days);
    let entries = tasks
        .iter()
        .map(|task| {
            let placement = task
                .span()
                .map(|(start, end)| ((start - range.start).num_days(), inclusive_days(start, end)));
            TimelineEntry {
                id: task.id,
                name: task.name.clone(),
                start: task.start_date,
                end: task.due_date,
                progress: task.done_ratio,
                status: task.status.name.clone(),
                band: task.status.band(),
                assignee: task
                    .assignee_name
                    .clone()
                    .unwrap_or_else(|| UNASSIGNED_LABEL.to_string()),
                priority: task.priority.clone(),
                dependencies: graph.dependents_of(task.id),
                offset_days: placement.map(|(offset, _)| offset),
                duration_days: placement.map(|(_, duration)| duration),
            }
        })
        .collect();
    Timeline { range, entries }
}
