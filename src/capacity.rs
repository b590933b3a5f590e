use crate::task::ResourceId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

pub const DEFAULT_CAPACITY_HOURS: f64 = 40.0;
pub const MAX_CAPACITY_HOURS: f64 = 10_000.0;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CapacityError {
    #[error("resource {resource_id} has invalid capacity {hours} (must be >= 0 and < {max})", max = MAX_CAPACITY_HOURS)]
    OutOfRange { resource_id: ResourceId, hours: f64 },
}

/// Weekly hours a resource can take on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacityRecord {
    pub resource_id: ResourceId,
    /// Absent means "use the planner default".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours_per_week: Option<f64>,
}

impl CapacityRecord {
    pub fn new(resource_id: ResourceId, hours_per_week: f64) -> Self {
        Self {
            resource_id,
            hours_per_week: Some(hours_per_week),
        }
    }

    pub fn unset(resource_id: ResourceId) -> Self {
        Self {
            resource_id,
            hours_per_week: None,
        }
    }

    pub fn validate(&self) -> Result<(), CapacityError> {
        if let Some(hours) = self.hours_per_week {
            if !hours.is_finite() || hours < 0.0 || hours >= MAX_CAPACITY_HOURS {
                return Err(CapacityError::OutOfRange {
                    resource_id: self.resource_id,
                    hours,
                });
            }
        }
        Ok(())
    }
}

/// Sparse capacity lookup keyed by resource. One record per resource.
#[derive(Debug, Clone, PartialEq)]
pub struct CapacityBook {
    records: HashMap<ResourceId, CapacityRecord>,
    default_hours: f64,
}

impl Default for CapacityBook {
    fn default() -> Self {
        Self::with_default(DEFAULT_CAPACITY_HOURS)
    }
}

impl CapacityBook {
    pub fn with_default(default_hours: f64) -> Self {
        Self {
            records: HashMap::new(),
            default_hours,
        }
    }

    /// Builds a book from raw records; a later record for the same resource
    /// replaces an earlier one.
    pub fn from_records<I>(records: I, default_hours: f64) -> Result<Self, CapacityError>
    where
        I: IntoIterator<Item = CapacityRecord>,
    {
        let mut book = Self::with_default(default_hours);
        for record in records {
            book.upsert(record)?;
        }
        Ok(book)
    }

    pub fn upsert(&mut self, record: CapacityRecord) -> Result<(), CapacityError> {
        record.validate()?;
        self.records.insert(record.resource_id, record);
        Ok(())
    }

    pub fn get(&self, resource_id: ResourceId) -> Option<&CapacityRecord> {
        self.records.get(&resource_id)
    }

    /// Capacity for a resource; missing records and unset hours fall back to the default.
    pub fn hours_for(&self, resource_id: ResourceId) -> f64 {
        self.records
            .get(&resource_id)
            .and_then(|record| record.hours_per_week)
            .unwrap_or(self.default_hours)
    }

    pub fn default_hours(&self) -> f64 {
        self.default_hours
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
