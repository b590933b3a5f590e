use crate::calendar::{inclusive_days, week_start_of};
use crate::config::{MAX_WEEK_COUNT, PlannerConfig};
use crate::task::Task;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Week {
    pub index: usize,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// ISO week number of the start day.
    pub number: u32,
    pub label: String,
    pub is_current: bool,
}

impl Week {
    fn starting(index: usize, start: NaiveDate, today: NaiveDate) -> Self {
        let end = start + Duration::days(6);
        let number = start.iso_week().week();
        Self {
            index,
            start,
            end,
            number,
            label: format!("Week {number}"),
            is_current: start <= today && today <= end,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// A contiguous, gap-free run of weeks. Only [`WeekGridBuilder`] creates one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct WeekGrid {
    weeks: Vec<Week>,
}

impl WeekGrid {
    pub fn weeks(&self) -> &[Week] {
        &self.weeks
    }

    pub fn len(&self) -> usize {
        self.weeks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weeks.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Week> {
        self.weeks.iter()
    }

    /// First day of the grid.
    pub fn start(&self) -> NaiveDate {
        self.weeks[0].start
    }

    /// Last day of the grid.
    pub fn end(&self) -> NaiveDate {
        self.weeks[self.weeks.len() - 1].end
    }

    pub fn total_days(&self) -> i64 {
        inclusive_days(self.start(), self.end()).max(1)
    }
}

impl<'a> IntoIterator for &'a WeekGrid {
    type Item = &'a Week;
    type IntoIter = std::slice::Iter<'a, Week>;

    fn into_iter(self) -> Self::IntoIter {
        self.weeks.iter()
    }
}

pub struct WeekGridBuilder {
    default_week_count: usize,
    max_week_count: usize,
    week_start: Weekday,
}

impl WeekGridBuilder {
    /// Counts are clamped to `1..=MAX_WEEK_COUNT` so the grid is never empty
    /// and never runs past the calendar.
    pub fn new(default_week_count: usize, max_week_count: usize) -> Self {
        Self {
            default_week_count: default_week_count.clamp(1, MAX_WEEK_COUNT),
            max_week_count: max_week_count.clamp(1, MAX_WEEK_COUNT),
            week_start: Weekday::Mon,
        }
    }

    pub fn from_config(config: &PlannerConfig) -> Self {
        Self::new(config.default_week_count, config.max_week_count).week_start(config.week_start)
    }

    pub fn week_start(mut self, week_start: Weekday) -> Self {
        self.week_start = week_start;
        self
    }

    pub fn build<'a, I>(&self, tasks: I, today: NaiveDate) -> WeekGrid
    where
        I: IntoIterator<Item = &'a Task>,
    {
        let dates = tasks.into_iter().flat_map(|task| task.dates());
        self.build_from_dates(dates, today)
    }

    pub fn build_from_dates<I>(&self, dates: I, today: NaiveDate) -> WeekGrid
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        let mut earliest: Option<NaiveDate> = None;
        let mut latest: Option<NaiveDate> = None;
        for date in dates {
            earliest = Some(earliest.map_or(date, |current| current.min(date)));
            latest = Some(latest.map_or(date, |current| current.max(date)));
        }

        let base_start = week_start_of(today, self.week_start);
        let first_week = match earliest {
            Some(date) => week_start_of(date, self.week_start).min(base_start),
            None => base_start,
        };

        let minimum_last = first_week + Self::weeks(self.default_week_count - 1);
        let latest_from_data = latest
            .map(|date| week_start_of(date, self.week_start))
            .unwrap_or(first_week);
        let maximum_last = first_week + Self::weeks(self.max_week_count - 1);
        let last_week = minimum_last.max(latest_from_data).min(maximum_last);

        let mut weeks = Vec::new();
        let mut current = first_week;
        while current <= last_week {
            weeks.push(Week::starting(weeks.len(), current, today));
            current = current + Duration::days(7);
        }

        debug!(
            first = %first_week,
            last = %last_week,
            count = weeks.len(),
            "built week grid"
        );
        WeekGrid { weeks }
    }

    fn weeks(count: usize) -> Duration {
        Duration::weeks(i64::try_from(count.min(MAX_WEEK_COUNT)).unwrap_or(0))
    }
}

impl Default for WeekGridBuilder {
    fn default() -> Self {
        Self::from_config(&PlannerConfig::default())
    }
}
