use super::{InputError, InputResult, PlanningInput};
use crate::task::{Task, TaskStatus};
use chrono::NaiveDate;
use serde::Deserialize;
use std::fs::File;
use std::path::Path;

pub fn load_planning_input_from_json<P: AsRef<Path>>(path: P) -> InputResult<PlanningInput> {
    let file = File::open(path)?;
    let input: PlanningInput = serde_json::from_reader(file)?;
    super::validate_input(&input)?;
    Ok(input)
}

#[derive(Default, Deserialize)]
struct TaskCsvRecord {
    id: i32,
    name: String,
    #[serde(default)]
    start_date: String,
    #[serde(default)]
    due_date: String,
    #[serde(default)]
    estimated_hours: String,
    #[serde(default)]
    status_id: String,
    #[serde(default)]
    status_name: String,
    #[serde(default)]
    is_closed: String,
    #[serde(default)]
    assignee_id: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    done_ratio: String,
    #[serde(default)]
    priority: String,
}

impl TaskCsvRecord {
    fn into_task(self) -> InputResult<Task> {
        let mut task = Task::new(self.id, self.name);
        task.start_date = parse_date(&self.start_date)?;
        task.due_date = parse_date(&self.due_date)?;
        task.estimated_hours = parse_f64(&self.estimated_hours)?;
        task.assignee = parse_i32(&self.assignee_id)?;
        task.category = parse_string_option(self.category);
        task.priority = parse_string_option(self.priority);
        task.done_ratio = parse_u8(&self.done_ratio)?.unwrap_or(0);

        let status_id = parse_i32(&self.status_id)?.unwrap_or(1);
        let status_name =
            parse_string_option(self.status_name).unwrap_or_else(|| TaskStatus::default().name);
        task.status = TaskStatus {
            id: status_id,
            name: status_name,
            is_closed: parse_bool(&self.is_closed)?.unwrap_or(false),
        };
        Ok(task)
    }
}

/// Reads a flat task table. Empty cells mean the field is absent.
pub fn load_tasks_from_csv<P: AsRef<Path>>(path: P) -> InputResult<Vec<Task>> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);
    let mut tasks = Vec::new();
    for record in reader.deserialize::<TaskCsvRecord>() {
        tasks.push(record?.into_task()?);
    }
    super::validate_tasks(&tasks)?;
    Ok(tasks)
}

fn parse_date(input: &str) -> InputResult<Option<NaiveDate>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map(Some)
        .map_err(|e| InputError::InvalidData(format!("invalid date '{input}': {e}")))
}

fn parse_f64(input: &str) -> InputResult<Option<f64>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    input
        .trim()
        .parse::<f64>()
        .map(Some)
        .map_err(|e| InputError::InvalidData(format!("invalid float '{input}': {e}")))
}

fn parse_i32(input: &str) -> InputResult<Option<i32>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    input
        .trim()
        .parse::<i32>()
        .map(Some)
        .map_err(|e| InputError::InvalidData(format!("invalid integer '{input}': {e}")))
}

fn parse_u8(input: &str) -> InputResult<Option<u8>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    input
        .trim()
        .parse::<u8>()
        .map(Some)
        .map_err(|e| InputError::InvalidData(format!("invalid ratio '{input}': {e}")))
}

fn parse_bool(input: &str) -> InputResult<Option<bool>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    match input.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(Some(true)),
        "false" => Ok(Some(false)),
        other => Err(InputError::InvalidData(format!(
            "invalid boolean '{other}'"
        ))),
    }
}

fn parse_string_option(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
