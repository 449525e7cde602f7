//! crates/journal_core/src/dates.rs
//!
//! Day-level bucketing of entry timestamps. Both the calendar aggregation and
//! the history-by-date filter go through these helpers, so the two views can
//! never disagree about which entries belong to which day.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

/// Truncates an entry timestamp to its UTC calendar day.
pub fn entry_day(ts: DateTime<Utc>) -> NaiveDate {
    ts.date_naive()
}

/// The half-open UTC range `[start, end)` covering one calendar day.
pub fn day_bounds(day: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = day.and_time(NaiveTime::MIN).and_utc();
    (start, start + Duration::days(1))
}

/// The half-open UTC range covering one calendar month, or `None` when the
/// year/month pair does not name a real month.
pub fn month_bounds(year: i32, month: u32) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let next_first = NaiveDate::from_ymd_opt(next_year, next_month, 1)?;
    Some((
        first.and_time(NaiveTime::MIN).and_utc(),
        next_first.and_time(NaiveTime::MIN).and_utc(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn truncation_and_bounds_agree() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let (start, end) = day_bounds(day);

        let just_inside = end - Duration::seconds(1);
        assert_eq!(entry_day(start), day);
        assert_eq!(entry_day(just_inside), day);
        assert_ne!(entry_day(end), day);
    }

    #[test]
    fn month_bounds_cover_the_whole_month() {
        let (start, end) = month_bounds(2024, 2).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap());
        // 2024 is a leap year.
        assert_eq!(end, Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn december_rolls_into_the_next_year() {
        let (_, end) = month_bounds(2024, 12).unwrap();
        assert_eq!(end, Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn bad_month_yields_none() {
        assert!(month_bounds(2024, 0).is_none());
        assert!(month_bounds(2024, 13).is_none());
    }
}
