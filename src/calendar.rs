use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// First day of the week containing `date`, for weeks beginning on `week_start`.
pub fn week_start_of(date: NaiveDate, week_start: Weekday) -> NaiveDate {
    let back = (7 + date.weekday().num_days_from_monday() - week_start.num_days_from_monday()) % 7;
    date - Duration::days(i64::from(back))
}

/// Number of calendar days in `start..=end`; zero or negative when `start > end`.
pub fn inclusive_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

/// Days shared by two inclusive spans, or zero when they are disjoint.
pub fn overlap_days(
    a_start: NaiveDate,
    a_end: NaiveDate,
    b_start: NaiveDate,
    b_end: NaiveDate,
) -> i64 {
    let start = a_start.max(b_start);
    let end = a_end.min(b_end);
    if start > end {
        return 0;
    }
    inclusive_days(start, end)
}

/// Shift a date by whole months, clamping the day to the end of shorter months.
pub fn add_months(date: NaiveDate, months: i32) -> NaiveDate {
    let total = date.year() * 12 + date.month0() as i32 + months;
    let year = total.div_euclid(12);
    let month = total.rem_euclid(12) as u32 + 1;
    let mut day = date.day();
    loop {
        if let Some(shifted) = NaiveDate::from_ymd_opt(year, month, day) {
            return shifted;
        }
        day -= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn week_start_for_monday_weeks() {
        // 2025-01-08 is a Wednesday
        assert_eq!(week_start_of(d(2025, 1, 8), Weekday::Mon), d(2025, 1, 6));
        assert_eq!(week_start_of(d(2025, 1, 6), Weekday::Mon), d(2025, 1, 6));
        assert_eq!(week_start_of(d(2025, 1, 12), Weekday::Mon), d(2025, 1, 6));
    }

    #[test]
    fn week_start_for_sunday_weeks() {
        assert_eq!(week_start_of(d(2025, 1, 8), Weekday::Sun), d(2025, 1, 5));
        assert_eq!(week_start_of(d(2025, 1, 5), Weekday::Sun), d(2025, 1, 5));
    }

    #[test]
    fn overlap_of_disjoint_spans_is_zero() {
        assert_eq!(
            overlap_days(d(2025, 1, 1), d(2025, 1, 3), d(2025, 1, 4), d(2025, 1, 9)),
            0
        );
        assert_eq!(
            overlap_days(d(2025, 1, 1), d(2025, 1, 4), d(2025, 1, 4), d(2025, 1, 9)),
            1
        );
    }

    #[test]
    fn add_months_clamps_day() {
        assert_eq!(add_months(d(2025, 3, 31), -1), d(2025, 2, 28));
        assert_eq!(add_months(d(2025, 11, 15), 2), d(2026, 1, 15));
        assert_eq!(add_months(d(2025, 1, 15), -1), d(2024, 12, 15));
    }
}
