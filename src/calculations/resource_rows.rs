use crate::calculations::effort::allocated_hours;
use crate::calculations::load::{
    LoadClass, LoadThresholds, round_to, utilisation, utilisation_percent,
};
use crate::calculations::week_grid::WeekGrid;
use crate::capacity::CapacityBook;
use crate::task::{Resource, ResourceId, Task, TaskId};
use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Serialize, Serializer};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// One task's share of a week cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskAllocation {
    pub task_id: TaskId,
    pub name: String,
    #[serde(serialize_with = "serialize_hours")]
    pub hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationCell {
    pub week_index: usize,
    #[serde(serialize_with = "serialize_hours")]
    pub total_hours: f64,
    pub task_count: usize,
    #[serde(serialize_with = "serialize_hours")]
    pub capacity_hours: f64,
    /// Absent exactly when the resource has no capacity.
    pub utilisation: Option<f64>,
    pub utilisation_percent: Option<f64>,
    pub load: LoadClass,
    pub entries: Vec<TaskAllocation>,
}

/// A task's hours per week plus where its Gantt bar sits in the visible range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskPlacement {
    pub task_id: TaskId,
    pub name: String,
    pub start_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub estimated_hours: Option<f64>,
    #[serde(serialize_with = "serialize_hours_list")]
    pub weekly_hours: Vec<f64>,
    #[serde(serialize_with = "serialize_hours")]
    pub total_hours: f64,
    #[serde(serialize_with = "serialize_percent")]
    pub bar_start_percent: f64,
    #[serde(serialize_with = "serialize_percent")]
    pub bar_width_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceRow {
    pub resource: Resource,
    #[serde(serialize_with = "serialize_hours")]
    pub capacity_hours: f64,
    pub cells: Vec<AllocationCell>,
    pub tasks: Vec<TaskPlacement>,
}

impl ResourceRow {
    pub fn total_hours(&self) -> f64 {
        self.cells.iter().map(|cell| cell.total_hours).sum()
    }
}

/// Bar offset and width, both as percentages of the grid's day span.
///
/// Missing dates default to the grid's first/last day. Both offsets are
/// clamped to `0..=D-1` (D = grid days), not `0..=D`, so a bar never starts
/// on or past the grid's right edge and always keeps at least one day of width.
pub fn bar_placement(task: &Task, grid: &WeekGrid) -> (f64, f64) {
    let range_start = grid.start();
    let total_days = grid.total_days();
    let start = task.start_date.unwrap_or(range_start);
    let end = task.due_date.unwrap_or_else(|| grid.end());

    let start_offset = (start - range_start).num_days().clamp(0, total_days - 1);
    let end_offset = (end - range_start).num_days().clamp(0, total_days - 1);

    let start_percent = 100.0 * start_offset as f64 / total_days as f64;
    let width_days = (end_offset - start_offset + 1).max(1);
    let width_percent = 100.0 * width_days as f64 / total_days as f64;
    (start_percent, width_percent)
}

pub struct ResourceRowAggregator<'a> {
    grid: &'a WeekGrid,
    capacities: &'a CapacityBook,
    thresholds: LoadThresholds,
}

impl<'a> ResourceRowAggregator<'a> {
    pub fn new(grid: &'a WeekGrid, capacities: &'a CapacityBook) -> Self {
        Self {
            grid,
            capacities,
            thresholds: LoadThresholds::default(),
        }
    }

    pub fn with_thresholds(mut self, thresholds: LoadThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// One row per resource, in the order given. Rows are computed in parallel.
    pub fn aggregate(&self, resources: &[Resource], tasks: &[Task]) -> Vec<ResourceRow> {
        let by_assignee = Self::group_by_assignee(tasks);
        let rows: Vec<ResourceRow> = resources
            .par_iter()
            .map(|resource| {
                let assigned = by_assignee
                    .get(&resource.id)
                    .map(Vec::as_slice)
                    .unwrap_or(&[]);
                self.row_for(resource, assigned)
            })
            .collect();
        debug!(
            resources = rows.len(),
            weeks = self.grid.len(),
            "aggregated resource rows"
        );
        rows
    }

    /// Builds the row for one resource from the tasks assigned to it.
    pub fn row_for(&self, resource: &Resource, tasks: &[&Task]) -> ResourceRow {
        let capacity_hours = self.capacities.hours_for(resource.id);
        let week_count = self.grid.len();

        let mut weekly: HashMap<TaskId, Vec<f64>> = HashMap::with_capacity(tasks.len());
        let mut cells = Vec::with_capacity(week_count);

        for week in self.grid {
            let mut total_hours = 0.0;
            let mut entries = Vec::new();

            for task in tasks {
                let hours = allocated_hours(task, week);
                if hours == 0.0 {
                    continue;
                }
                total_hours += hours;
                weekly
                    .entry(task.id)
                    .or_insert_with(|| vec![0.0; week_count])[week.index] += hours;
                entries.push(TaskAllocation {
                    task_id: task.id,
                    name: task.name.clone(),
                    hours,
                });
            }

            let ratio = utilisation(total_hours, capacity_hours);
            cells.push(AllocationCell {
                week_index: week.index,
                total_hours,
                task_count: entries.len(),
                capacity_hours,
                utilisation: ratio,
                utilisation_percent: utilisation_percent(ratio),
                load: self.thresholds.classify(total_hours, capacity_hours),
                entries,
            });
        }

        let mut seen = HashSet::with_capacity(tasks.len());
        let mut placements: Vec<TaskPlacement> = tasks
            .iter()
            .filter(|task| seen.insert(task.id))
            .map(|task| {
                let weekly_hours = weekly
                    .remove(&task.id)
                    .unwrap_or_else(|| vec![0.0; week_count]);
                let (bar_start_percent, bar_width_percent) = bar_placement(task, self.grid);
                TaskPlacement {
                    task_id: task.id,
                    name: task.name.clone(),
                    start_date: task.start_date,
                    due_date: task.due_date,
                    estimated_hours: task.estimated_hours,
                    total_hours: weekly_hours.iter().sum(),
                    weekly_hours,
                    bar_start_percent,
                    bar_width_percent,
                }
            })
            .collect();
        placements.sort_by(|a, b| match (a.start_date, b.start_date) {
            (Some(x), Some(y)) => x.cmp(&y).then(a.task_id.cmp(&b.task_id)),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.task_id.cmp(&b.task_id),
        });

        ResourceRow {
            resource: resource.clone(),
            capacity_hours,
            cells,
            tasks: placements,
        }
    }

    fn group_by_assignee(tasks: &[Task]) -> HashMap<ResourceId, Vec<&Task>> {
        let mut grouped: HashMap<ResourceId, Vec<&Task>> = HashMap::new();
        for task in tasks {
            if let Some(assignee) = task.assignee {
                grouped.entry(assignee).or_default().push(task);
            }
        }
        grouped
    }
}

fn serialize_hours<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(round_to(*value, 1))
}

fn serialize_percent<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(round_to(*value, 2))
}

fn serialize_hours_list<S: Serializer>(values: &[f64], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(values.iter().map(|value| round_to(*value, 1)))
}
