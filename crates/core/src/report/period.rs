//! Report period windows.

use chrono::{DateTime, Duration, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// A report window keyed against transaction creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// Since the current UTC midnight.
    Today,
    /// The last 7 days.
    Week,
    /// The last 30 days.
    Month,
    /// No lower bound.
    All,
}

impl Period {
    /// Parses the wire name of a period.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "today" => Some(Self::Today),
            "week" => Some(Self::Week),
            "month" => Some(Self::Month),
            "all" => Some(Self::All),
            _ => None,
        }
    }

    /// The wire name of the period.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Week => "week",
            Self::Month => "month",
            Self::All => "all",
        }
    }

    /// The inclusive lower bound of the window, or `None` for `all`.
    #[must_use]
    pub fn start(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Self::Today => Some(now.date_naive().and_time(NaiveTime::MIN).and_utc()),
            Self::Week => Some(now - Duration::days(7)),
            Self::Month => Some(now - Duration::days(30)),
            Self::All => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn test_parse() {
        assert_eq!(Period::parse("today"), Some(Period::Today));
        assert_eq!(Period::parse("week"), Some(Period::Week));
        assert_eq!(Period::parse("month"), Some(Period::Month));
        assert_eq!(Period::parse("all"), Some(Period::All));
        assert_eq!(Period::parse("year"), None);
        assert_eq!(Period::parse(""), None);
    }

    #[test]
    fn test_today_starts_at_utc_midnight() {
        let now = at(2026, 8, 6, 15, 42);
        assert_eq!(Period::Today.start(now), Some(at(2026, 8, 6, 0, 0)));
    }

    #[test]
    fn test_week_and_month_are_rolling_windows() {
        let now = at(2026, 8, 6, 15, 42);
        assert_eq!(Period::Week.start(now), Some(at(2026, 7, 30, 15, 42)));
        assert_eq!(Period::Month.start(now), Some(at(2026, 7, 7, 15, 42)));
    }

    #[test]
    fn test_all_has_no_lower_bound() {
        let now = at(2026, 8, 6, 15, 42);
        assert_eq!(Period::All.start(now), None);
    }
}
