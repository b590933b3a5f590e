use crate::task::Task;
use chrono::NaiveDate;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnassignedGroup<K> {
    /// `None` collects tasks without a grouping key.
    pub key: Option<K>,
    pub tasks: Vec<Task>,
}

/// Groups tasks that have no assignee by `group_key` and sorts each group
/// with `order`.
///
/// Groups come out in ascending key order with the keyless group last.
pub fn group_unassigned<'a, K, I, F, C>(tasks: I, group_key: F, order: C) -> Vec<UnassignedGroup<K>>
where
    K: Ord,
    I: IntoIterator<Item = &'a Task>,
    F: Fn(&Task) -> Option<K>,
    C: Fn(&Task, &Task) -> Ordering,
{
    let mut keyed: BTreeMap<K, Vec<Task>> = BTreeMap::new();
    let mut keyless: Vec<Task> = Vec::new();
    for task in tasks.into_iter().filter(|task| task.assignee.is_none()) {
        match group_key(task) {
            Some(key) => keyed.entry(key).or_default().push(task.clone()),
            None => keyless.push(task.clone()),
        }
    }

    let mut groups: Vec<UnassignedGroup<K>> = keyed
        .into_iter()
        .map(|(key, tasks)| UnassignedGroup {
            key: Some(key),
            tasks,
        })
        .collect();
    if !keyless.is_empty() {
        groups.push(UnassignedGroup {
            key: None,
            tasks: keyless,
        });
    }
    for group in &mut groups {
        group.tasks.sort_by(|a, b| order(a, b));
    }
    groups
}

/// Due date, then start date, then id. Missing dates sort after present ones.
pub fn by_schedule(a: &Task, b: &Task) -> Ordering {
    compare_dates(a.due_date, b.due_date)
        .then_with(|| compare_dates(a.start_date, b.start_date))
        .then_with(|| a.id.cmp(&b.id))
}

fn compare_dates(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
