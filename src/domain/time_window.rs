//! Reporting period as an inclusive range of UNIX seconds.

use crate::domain::DomainError;
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Inclusive `[start_ts, end_ts]` window. Built from two calendar dates; the end date
/// covers its whole day (up to 23:59:59).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start_ts: i64,
    end_ts: i64,
}

impl TimeWindow {
    /// Window for `start..=end` in the local timezone.
    pub fn from_dates(start: &str, end: &str) -> Result<Self, DomainError> {
        Self::from_dates_in(start, end, &Local)
    }

    /// Window for `start..=end` in the given timezone.
    ///
    /// A start after the end is accepted and yields a window that contains nothing.
    pub fn from_dates_in<Tz: TimeZone>(
        start: &str,
        end: &str,
        tz: &Tz,
    ) -> Result<Self, DomainError> {
        let start_date = parse_date(start)?;
        let end_date = parse_date(end)?;
        let start_ts = local_ts(tz, start_date.and_time(NaiveTime::MIN), true);
        let end_of_day = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
        let end_ts = local_ts(tz, end_date.and_time(end_of_day), false);
        Ok(Self { start_ts, end_ts })
    }

    pub fn start_ts(&self) -> i64 {
        self.start_ts
    }

    pub fn end_ts(&self) -> i64 {
        self.end_ts
    }

    pub fn contains(&self, ts: i64) -> bool {
        self.start_ts <= ts && ts <= self.end_ts
    }

    /// `None` (undated) is never inside the window.
    pub fn contains_opt(&self, ts: Option<i64>) -> bool {
        ts.is_some_and(|t| self.contains(t))
    }
}

/// Accepts exactly `YYYY-MM-DD` (surrounding whitespace ignored).
pub fn parse_date(s: &str) -> Result<NaiveDate, DomainError> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|_| DomainError::InvalidDateFormat(s.to_string()))
}

/// Resolve a wall-clock time. Ambiguous times (DST fold) take the earliest instant for a
/// start bound and the latest for an end bound; nonexistent times (DST gap) fall back to
/// reading the wall clock as UTC.
fn local_ts<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime, start_bound: bool) -> i64 {
    let resolved = tz.from_local_datetime(&naive);
    let dt = if start_bound {
        resolved.earliest()
    } else {
        resolved.latest()
    };
    dt.map(|d| d.timestamp())
        .unwrap_or_else(|| naive.and_utc().timestamp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn test_utc_bounds() {
        let w = TimeWindow::from_dates_in("2024-01-01", "2024-01-31", &Utc).unwrap();
        assert_eq!(w.start_ts(), 1704067200);
        assert_eq!(w.end_ts(), 1704067200 + 31 * 86400 - 1);
    }

    #[test]
    fn test_midnight_inside_and_next_day_outside() {
        let w = TimeWindow::from_dates_in("2024-03-10", "2024-03-12", &Utc).unwrap();
        assert!(w.contains(w.start_ts()));
        assert!(!w.contains(w.start_ts() - 1));
        assert!(w.contains(w.end_ts()));
        assert!(!w.contains(w.end_ts() + 1));
    }

    #[test]
    fn test_single_day_window() {
        let w = TimeWindow::from_dates_in("2024-05-05", "2024-05-05", &Utc).unwrap();
        assert_eq!(w.end_ts() - w.start_ts(), 86399);
    }

    #[test]
    fn test_fixed_offset_shifts_bounds() {
        let msk = FixedOffset::east_opt(3 * 3600).unwrap();
        let w = TimeWindow::from_dates_in("2024-01-01", "2024-01-01", &msk).unwrap();
        assert_eq!(w.start_ts(), 1704067200 - 3 * 3600);
    }

    #[test]
    fn test_inverted_range_is_empty() {
        let w = TimeWindow::from_dates_in("2024-02-01", "2024-01-01", &Utc).unwrap();
        assert!(!w.contains(w.start_ts()));
        assert!(!w.contains(w.end_ts()));
        assert!(!w.contains(1705000000));
    }

    #[test]
    fn test_invalid_dates() {
        for bad in ["", "2024-13-01", "01.02.2024", "2024-02-30", "yesterday"] {
            let err = TimeWindow::from_dates_in(bad, "2024-01-01", &Utc).unwrap_err();
            assert!(matches!(err, DomainError::InvalidDateFormat(_)), "{bad}");
        }
        assert!(matches!(
            TimeWindow::from_dates("2024-01-01", "soon"),
            Err(DomainError::InvalidDateFormat(s)) if s == "soon"
        ));
    }

    #[test]
    fn test_undated_is_outside() {
        let w = TimeWindow::from_dates_in("2024-01-01", "2024-01-02", &Utc).unwrap();
        assert!(!w.contains_opt(None));
        assert!(w.contains_opt(Some(w.start_ts())));
    }
}
