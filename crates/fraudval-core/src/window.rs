//! Query window types
//!
//! All windowed operations use whole-day semantics: a window over
//! `[start, end]` covers `start 00:00:00` through `end 23:59:59` inclusive.

use crate::error::{CoreError, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Closed calendar-date window with whole-day semantics.
///
/// Construction validates `start <= end`; an inverted window is a caller error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl QueryWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(CoreError::InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end
    }

    /// First instant covered by the window (`start 00:00:00`).
    pub fn starts_at(&self) -> NaiveDateTime {
        self.start.and_time(NaiveTime::MIN)
    }

    /// Last instant covered by the window (`end 23:59:59`).
    pub fn ends_at(&self) -> NaiveDateTime {
        self.end.and_time(NaiveTime::MIN) + Duration::seconds(86_399)
    }

    pub fn contains(&self, t: NaiveDateTime) -> bool {
        t >= self.starts_at() && t <= self.ends_at()
    }

    /// Number of calendar days covered, inclusive on both ends.
    pub fn day_count(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// Optionally bounded window used by per-subscriber history queries.
///
/// A missing bound means no lower/upper limit on that side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenWindow {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl OpenWindow {
    /// Window with no bounds on either side.
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Self> {
        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return Err(CoreError::InvalidWindow { start: s, end: e });
            }
        }
        Ok(Self { start, end })
    }

    pub fn starts_at(&self) -> Option<NaiveDateTime> {
        self.start.map(|d| d.and_time(NaiveTime::MIN))
    }

    pub fn ends_at(&self) -> Option<NaiveDateTime> {
        self.end
            .map(|d| d.and_time(NaiveTime::MIN) + Duration::seconds(86_399))
    }

    pub fn contains(&self, t: NaiveDateTime) -> bool {
        if let Some(lo) = self.starts_at() {
            if t < lo {
                return false;
            }
        }
        if let Some(hi) = self.ends_at() {
            if t > hi {
                return false;
            }
        }
        true
    }
}

impl From<QueryWindow> for OpenWindow {
    fn from(w: QueryWindow) -> Self {
        Self {
            start: Some(w.start_date()),
            end: Some(w.end_date()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn whole_day_bounds() {
        let w = QueryWindow::new(date(2024, 1, 1), date(2024, 1, 5)).unwrap();
        assert_eq!(w.starts_at().to_string(), "2024-01-01 00:00:00");
        assert_eq!(w.ends_at().to_string(), "2024-01-05 23:59:59");
        assert_eq!(w.day_count(), 5);
    }

    #[test]
    fn single_day_window() {
        let w = QueryWindow::new(date(2024, 3, 10), date(2024, 3, 10)).unwrap();
        assert_eq!(w.day_count(), 1);
        assert!(w.contains(date(2024, 3, 10).and_hms_opt(23, 59, 59).unwrap()));
        assert!(!w.contains(date(2024, 3, 11).and_hms_opt(0, 0, 0).unwrap()));
    }

    #[test]
    fn inverted_window_rejected() {
        let err = QueryWindow::new(date(2024, 2, 2), date(2024, 2, 1)).unwrap_err();
        assert!(err.to_string().contains("Invalid window"));
    }

    #[test]
    fn open_window_unbounded_contains_everything() {
        let w = OpenWindow::unbounded();
        assert!(w.contains(date(1999, 1, 1).and_hms_opt(0, 0, 0).unwrap()));
        assert!(w.contains(date(2077, 12, 31).and_hms_opt(12, 0, 0).unwrap()));
    }

    #[test]
    fn open_window_half_bounded() {
        let w = OpenWindow::new(Some(date(2024, 1, 2)), None).unwrap();
        assert!(!w.contains(date(2024, 1, 1).and_hms_opt(23, 59, 59).unwrap()));
        assert!(w.contains(date(2024, 1, 2).and_hms_opt(0, 0, 0).unwrap()));
    }

    #[test]
    fn open_window_inverted_rejected() {
        assert!(OpenWindow::new(Some(date(2024, 2, 2)), Some(date(2024, 2, 1))).is_err());
    }
}
