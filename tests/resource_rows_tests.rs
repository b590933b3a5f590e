use chrono::NaiveDate;
use workload_planner::{
    CapacityBook, CapacityRecord, LoadClass, Resource, ResourceRowAggregator, Task, WeekGrid,
    WeekGridBuilder,
};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn grid_for(tasks: &[Task]) -> WeekGrid {
    WeekGridBuilder::new(8, 12).build(tasks, d(2026, 3, 18))
}

#[test]
fn cells_sum_task_hours_and_report_utilisation() {
    let tasks = vec![
        Task::new(1, "API")
            .with_dates(d(2026, 3, 16), d(2026, 3, 20))
            .with_estimate(10.0)
            .assigned_to(7),
        Task::new(2, "Docs")
            .with_dates(d(2026, 3, 16), d(2026, 3, 22))
            .with_estimate(4.0)
            .assigned_to(7),
    ];
    let grid = grid_for(&tasks);
    let capacities = CapacityBook::from_records([CapacityRecord::new(7, 20.0)], 40.0).unwrap();
    let rows = ResourceRowAggregator::new(&grid, &capacities)
        .aggregate(&[Resource::new(7, "Alice")], &tasks);

    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.capacity_hours, 20.0);
    assert_eq!(row.cells.len(), grid.len());

    let first = &row.cells[0];
    assert!((first.total_hours - 14.0).abs() < 1e-9);
    assert_eq!(first.task_count, 2);
    assert_eq!(first.utilisation_percent, Some(70.0));
    assert_eq!(first.load, LoadClass::Light);

    let empty = &row.cells[1];
    assert_eq!(empty.total_hours, 0.0);
    assert_eq!(empty.task_count, 0);
    assert_eq!(empty.utilisation, Some(0.0));
    assert_eq!(empty.load, LoadClass::Empty);
    assert!((row.total_hours() - 14.0).abs() < 1e-9);
}

#[test]
fn missing_capacity_falls_back_to_default() {
    let tasks = vec![
        Task::new(1, "Build")
            .with_dates(d(2026, 3, 16), d(2026, 3, 22))
            .with_estimate(50.0)
            .assigned_to(3),
    ];
    let grid = grid_for(&tasks);
    let capacities = CapacityBook::default();
    let rows = ResourceRowAggregator::new(&grid, &capacities)
        .aggregate(&[Resource::new(3, "Bob")], &tasks);

    assert_eq!(rows[0].capacity_hours, 40.0);
    assert_eq!(rows[0].cells[0].utilisation, Some(1.25));
    assert_eq!(rows[0].cells[0].load, LoadClass::Heavy);
}

#[test]
fn zero_capacity_leaves_utilisation_absent() {
    let tasks = vec![
        Task::new(1, "Support")
            .with_dates(d(2026, 3, 16), d(2026, 3, 22))
            .with_estimate(7.0)
            .assigned_to(4),
    ];
    let grid = grid_for(&tasks);
    let capacities = CapacityBook::from_records([CapacityRecord::new(4, 0.0)], 40.0).unwrap();
    let row = ResourceRowAggregator::new(&grid, &capacities)
        .row_for(&Resource::new(4, "Carol"), &[&tasks[0]]);

    assert_eq!(row.cells[0].utilisation, None);
    assert_eq!(row.cells[0].utilisation_percent, None);
    assert_eq!(row.cells[0].load, LoadClass::NoCapacity);
    assert_eq!(row.cells[1].utilisation, None);
    assert_eq!(row.cells[1].load, LoadClass::Empty);
}

#[test]
fn rows_follow_resource_order_and_ignore_foreign_tasks() {
    let tasks = vec![
        Task::new(1, "Mine")
            .with_dates(d(2026, 3, 16), d(2026, 3, 20))
            .with_estimate(5.0)
            .assigned_to(2),
        Task::new(2, "Someone else's")
            .with_dates(d(2026, 3, 16), d(2026, 3, 20))
            .with_estimate(9.0)
            .assigned_to(99),
        Task::new(3, "Nobody's")
            .with_dates(d(2026, 3, 16), d(2026, 3, 20))
            .with_estimate(9.0),
    ];
    let grid = grid_for(&tasks);
    let capacities = CapacityBook::default();
    let resources = vec![Resource::new(5, "Eve"), Resource::new(2, "Dan")];
    let rows = ResourceRowAggregator::new(&grid, &capacities).aggregate(&resources, &tasks);

    assert_eq!(rows[0].resource.id, 5);
    assert!(rows[0].tasks.is_empty());
    assert_eq!(rows[0].total_hours(), 0.0);
    assert_eq!(rows[1].resource.id, 2);
    assert_eq!(rows[1].tasks.len(), 1);
    assert!((rows[1].total_hours() - 5.0).abs() < 1e-9);
}

#[test]
fn placements_sorted_by_start_with_undated_last() {
    let tasks = vec![
        Task::new(1, "Someday").with_estimate(3.0).assigned_to(1),
        Task::new(2, "Later")
            .with_dates(d(2026, 3, 25), d(2026, 3, 27))
            .with_estimate(3.0)
            .assigned_to(1),
        Task::new(3, "Sooner")
            .with_dates(d(2026, 3, 17), d(2026, 3, 19))
            .with_estimate(3.0)
            .assigned_to(1),
    ];
    let grid = grid_for(&tasks);
    let capacities = CapacityBook::default();
    let row = ResourceRowAggregator::new(&grid, &capacities)
        .aggregate(&[Resource::new(1, "Frank")], &tasks)
        .remove(0);

    let order: Vec<i32> = row.tasks.iter().map(|placement| placement.task_id).collect();
    assert_eq!(order, vec![3, 2, 1]);
    assert_eq!(row.tasks[2].total_hours, 0.0);
    assert_eq!(row.tasks[2].weekly_hours, vec![0.0; grid.len()]);
}

#[test]
fn bar_placement_is_relative_to_grid_span() {
    let tasks = vec![
        Task::new(1, "First week")
            .with_dates(d(2026, 3, 16), d(2026, 3, 22))
            .with_estimate(7.0)
            .assigned_to(1),
        Task::new(2, "Third week")
            .with_dates(d(2026, 3, 30), d(2026, 4, 5))
            .with_estimate(7.0)
            .assigned_to(1),
    ];
    let grid = grid_for(&tasks);
    assert_eq!(grid.total_days(), 56);
    let capacities = CapacityBook::default();
    let row = ResourceRowAggregator::new(&grid, &capacities)
        .aggregate(&[Resource::new(1, "Grace")], &tasks)
        .remove(0);

    assert_eq!(row.tasks[0].bar_start_percent, 0.0);
    assert_eq!(row.tasks[0].bar_width_percent, 12.5);
    assert_eq!(row.tasks[1].bar_start_percent, 25.0);
    assert_eq!(row.tasks[1].bar_width_percent, 12.5);
}

#[test]
fn serialized_cells_round_hours() {
    let tasks = vec![
        Task::new(1, "Thirds")
            .with_dates(d(2026, 3, 20), d(2026, 3, 26))
            .with_estimate(10.0)
            .assigned_to(1),
    ];
    let grid = grid_for(&tasks);
    let capacities = CapacityBook::default();
    let rows = ResourceRowAggregator::new(&grid, &capacities)
        .aggregate(&[Resource::new(1, "Heidi")], &tasks);
    let json = serde_json::to_value(&rows).unwrap();

    assert_eq!(json[0]["cells"][0]["total_hours"], serde_json::json!(4.3));
    assert_eq!(json[0]["cells"][0]["load"], "light");
    assert_eq!(json[0]["tasks"][0]["weekly_hours"][1], serde_json::json!(5.7));
}
