//! crates/journal_core/src/calendar.rs
//!
//! Pure month-grid construction for the calendar view. No state, no clock
//! access except the fallback for malformed input.

use chrono::{Datelike, Months, NaiveDate, Utc, Weekday};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// A rectangular month view: seven columns, five or six rows. Each cell is a
/// day number or `None` padding before the 1st and after the last day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    pub month_name: &'static str,
    /// Row-major cells; `cells.len()` is always a multiple of 7.
    pub cells: Vec<Option<u32>>,
    /// (year, month) one month back, rolling over year boundaries.
    pub prev: (i32, u32),
    /// (year, month) one month forward, rolling over year boundaries.
    pub next: (i32, u32),
}

/// Resolves possibly-absent or malformed query input to a concrete month,
/// falling back to the current UTC month. A calendar view should render
/// something sensible rather than fail on a bad query string.
pub fn resolve_month(year: Option<i32>, month: Option<u32>) -> (i32, u32) {
    match (year, month) {
        (Some(y), Some(m)) if NaiveDate::from_ymd_opt(y, m, 1).is_some() => (y, m),
        _ => {
            let today = Utc::now().date_naive();
            (today.year(), today.month())
        }
    }
}

/// Builds the grid for one month. Malformed (year, month) input falls back to
/// the current month, mirroring [`resolve_month`].
pub fn build(year: i32, month: u32, week_start: Weekday) -> MonthGrid {
    let first = match NaiveDate::from_ymd_opt(year, month, 1) {
        Some(first) => first,
        None => {
            let today = Utc::now().date_naive();
            today.with_day(1).unwrap_or(today)
        }
    };
    let (year, month) = (first.year(), first.month());

    let next_first = first + Months::new(1);
    let days_in_month = next_first.signed_duration_since(first).num_days() as u32;

    let leading = (first.weekday().num_days_from_sunday() + 7
        - week_start.num_days_from_sunday())
        % 7;

    let mut cells: Vec<Option<u32>> = Vec::with_capacity(42);
    cells.resize(leading as usize, None);
    cells.extend((1..=days_in_month).map(Some));
    while cells.len() % 7 != 0 {
        cells.push(None);
    }

    MonthGrid {
        year,
        month,
        month_name: MONTH_NAMES[(month - 1) as usize],
        cells,
        prev: if month == 1 {
            (year - 1, 12)
        } else {
            (year, month - 1)
        },
        next: if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn february_2025_starts_on_a_saturday() {
        let grid = build(2025, 2, Weekday::Sun);

        // Six leading blanks put the 1st in the Saturday column.
        assert_eq!(grid.cells.iter().position(|c| c.is_some()), Some(6));
        assert_eq!(grid.cells[6], Some(1));
        assert_eq!(grid.cells.iter().filter_map(|c| *c).last(), Some(28));
        assert_eq!(grid.cells.len() % 7, 0);
        assert_eq!(grid.month_name, "February");
        assert_eq!(grid.prev, (2025, 1));
        assert_eq!(grid.next, (2025, 3));
    }

    #[test]
    fn thirty_one_day_month_starting_sunday() {
        // March 2020 began on a Sunday.
        let grid = build(2020, 3, Weekday::Sun);

        assert_eq!(grid.cells[0], Some(1));
        assert_eq!(grid.cells.iter().filter(|c| c.is_some()).count(), 31);
        assert_eq!(grid.cells.len(), 35);
        assert!(grid.cells[31..].iter().all(|c| c.is_none()));
    }

    #[test]
    fn year_rollover_in_both_directions() {
        let january = build(2024, 1, Weekday::Sun);
        assert_eq!(january.prev, (2023, 12));

        let december = build(2024, 12, Weekday::Sun);
        assert_eq!(december.next, (2025, 1));
    }

    #[test]
    fn monday_week_start_shifts_the_columns() {
        // February 1st 2025 is a Saturday: five leading blanks from Monday.
        let grid = build(2025, 2, Weekday::Mon);
        assert_eq!(grid.cells.iter().position(|c| c.is_some()), Some(5));
    }

    #[test]
    fn malformed_month_falls_back_to_the_current_month() {
        let today = Utc::now().date_naive();

        let grid = build(2024, 13, Weekday::Sun);
        assert_eq!((grid.year, grid.month), (today.year(), today.month()));

        assert_eq!(
            resolve_month(Some(2024), Some(0)),
            (today.year(), today.month())
        );
        assert_eq!(resolve_month(None, Some(4)), (today.year(), today.month()));
        assert_eq!(resolve_month(Some(2024), Some(4)), (2024, 4));
    }

    #[test]
    fn leap_february_has_twenty_nine_cells() {
        let grid = build(2024, 2, Weekday::Sun);
        assert_eq!(grid.cells.iter().filter_map(|c| *c).last(), Some(29));
    }
}
