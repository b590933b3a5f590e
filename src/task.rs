use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub type TaskId = i32;
pub type ResourceId = i32;

/// Coarse status grouping used to colour timeline bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusBand {
    New,
    InProgress,
    Resolved,
    Closed,
}

impl StatusBand {
    pub fn from_status_id(status_id: i32) -> Self {
        match status_id {
            2 => StatusBand::InProgress,
            3 => StatusBand::Resolved,
            5 => StatusBand::Closed,
            _ => StatusBand::New,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusBand::New => "new",
            StatusBand::InProgress => "in_progress",
            StatusBand::Resolved => "resolved",
            StatusBand::Closed => "closed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStatus {
    pub id: i32,
    pub name: String,
    #[serde(default)]
    pub is_closed: bool,
}

impl TaskStatus {
    pub fn new(id: i32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            is_closed: false,
        }
    }

    pub fn closed(id: i32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            is_closed: true,
        }
    }

    pub fn band(&self) -> StatusBand {
        StatusBand::from_status_id(self.id)
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        Self::new(1, "New")
    }
}

/// A resource (assignee) whose weekly capacity is tracked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub id: ResourceId,
    pub name: String,
}

impl Resource {
    pub fn new(id: ResourceId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A unit of schedulable work read from the external task store.
///
/// Dates are inclusive calendar days. A task without `estimated_hours`
/// still appears on timelines but allocates nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<f64>,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<ResourceId>,
    /// Display name of the assignee, used only by timeline output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_name: Option<String>,
    /// Grouping key for unassigned work (a tracker or category name).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub done_ratio: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
}

impl Task {
    pub fn new(id: TaskId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            start_date: None,
            due_date: None,
            estimated_hours: None,
            status: TaskStatus::default(),
            assignee: None,
            assignee_name: None,
            category: None,
            done_ratio: 0,
            priority: None,
        }
    }

    pub fn with_dates(mut self, start: NaiveDate, due: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.due_date = Some(due);
        self
    }

    pub fn with_estimate(mut self, hours: f64) -> Self {
        self.estimated_hours = Some(hours);
        self
    }

    pub fn assigned_to(mut self, resource: ResourceId) -> Self {
        self.assignee = Some(resource);
        self
    }

    pub fn is_open(&self) -> bool {
        !self.status.is_closed
    }

    /// Both ends of the date span, if the task has them.
    pub fn span(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.start_date, self.due_date) {
            (Some(start), Some(due)) => Some((start, due)),
            _ => None,
        }
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        self.start_date.into_iter().chain(self.due_date)
    }
}
