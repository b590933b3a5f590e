//! planner - workload and dependency planning from a task export.
//!
//! # Examples
//!
//! ```bash
//! planner weeks input.json --today 2026-03-18
//! planner plan input.json --json
//! planner link input.json --from 3 --from-endpoint end --to 1 --to-endpoint start
//! ```
//!
//! Logging goes to stderr and is controlled by `PLANNER_LOG` (default `warn`).

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use workload_planner::graph::DependencyProposal;
use workload_planner::{
    Endpoint, PlannerConfig, Planner, PlanningInput, PlanningReport, WeekGrid,
    load_planning_input_from_json,
};

#[derive(Parser)]
#[command(name = "planner")]
#[command(about = "Weekly workload grids, resource load and task dependencies")]
#[command(version)]
struct Cli {
    /// Reference date for the current week (defaults to the local date)
    #[arg(long, global = true)]
    today: Option<NaiveDate>,

    /// JSON file with planner settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the week grid covering the input's open tasks
    Weeks { input: PathBuf },
    /// Print per-resource weekly load and unassigned tasks
    Plan {
        input: PathBuf,
        /// Emit the whole report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the Gantt timeline as JSON
    Timeline { input: PathBuf },
    /// Check a dependency drawn between two task endpoints
    Link {
        input: PathBuf,
        #[arg(long)]
        from: i32,
        #[arg(long)]
        from_endpoint: Endpoint,
        #[arg(long)]
        to: i32,
        #[arg(long)]
        to_endpoint: Endpoint,
        #[arg(long, default_value_t = 0)]
        delay: i32,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("PLANNER_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => PlannerConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => PlannerConfig::default(),
    };
    let planner = Planner::new(config).context("Invalid planner configuration")?;
    let today = cli
        .today
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    match cli.command {
        Commands::Weeks { input } => {
            let input = load_input(&input)?;
            print!("{}", render_weeks(&planner.week_grid(&input, today)));
        }
        Commands::Plan { input, json } => {
            let input = load_input(&input)?;
            let report = planner.plan(&input, today)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", render_report(&report));
            }
        }
        Commands::Timeline { input } => {
            let input = load_input(&input)?;
            let timeline = planner.timeline(&input, today);
            println!("{}", serde_json::to_string_pretty(&timeline)?);
        }
        Commands::Link {
            input,
            from,
            from_endpoint,
            to,
            to_endpoint,
            delay,
        } => {
            let input = load_input(&input)?;
            let mut proposal = DependencyProposal::new(from, from_endpoint, to, to_endpoint);
            proposal.delay_days = delay;
            let edge = planner.check_dependency(&input, &proposal)?;
            println!("accepted {} -> {} ({})", edge.from, edge.to, edge.relation);
        }
    }
    Ok(())
}

fn load_input(path: &Path) -> Result<PlanningInput> {
    load_planning_input_from_json(path)
        .with_context(|| format!("Failed to load planning input from {}", path.display()))
}

fn render_weeks(grid: &WeekGrid) -> String {
    let mut out = String::new();
    for week in grid {
        let marker = if week.is_current { " *" } else { "" };
        let _ = writeln!(out, "{:<8} {} .. {}{}", week.label, week.start, week.end, marker);
    }
    out
}

fn render_report(report: &PlanningReport) -> String {
    let mut out = String::new();
    for row in &report.resource_rows {
        let _ = writeln!(
            out,
            "{} (#{}) capacity {:.1}h",
            row.resource.name, row.resource.id, row.capacity_hours
        );
        for (week, cell) in report.weeks.iter().zip(&row.cells) {
            let percent = cell
                .utilisation_percent
                .map(|value| format!("{value:.1}%"))
                .unwrap_or_else(|| "-".to_string());
            let _ = writeln!(
                out,
                "  {:<8} {}  {:>6.1}h  {:>7}  {}",
                week.label,
                week.start,
                cell.total_hours,
                percent,
                cell.load.as_str()
            );
        }
    }
    if !report.unassigned.is_empty() {
        out.push_str("Unassigned\n");
        for group in &report.unassigned {
            let key = group.key.as_deref().unwrap_or("Uncategorised");
            for task in &group.tasks {
                let due = task
                    .due_date
                    .map(|date| date.to_string())
                    .unwrap_or_else(|| "-".to_string());
                let _ = writeln!(out, "  [{key}] #{} {} (due {due})", task.id, task.name);
            }
        }
    }
    out
}
