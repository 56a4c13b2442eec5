use std::fmt;
use std::str::FromStr;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Clock format used by the class-catalog fixtures, e.g. `"9:10 AM"`.
pub const MEETING_TIME_FORMAT: &str = "%I:%M %p";
/// Clock format used by queries, e.g. `"14:30"`.
pub const QUERY_TIME_FORMAT: &str = "%H:%M";

/// Day of the week a class meeting can apply to.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum DayKey {
    #[default]
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl DayKey {
    pub const ALL: [DayKey; 7] = [
        DayKey::Mon,
        DayKey::Tue,
        DayKey::Wed,
        DayKey::Thu,
        DayKey::Fri,
        DayKey::Sat,
        DayKey::Sun,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DayKey::Mon => "mon",
            DayKey::Tue => "tue",
            DayKey::Wed => "wed",
            DayKey::Thu => "thu",
            DayKey::Fri => "fri",
            DayKey::Sat => "sat",
            DayKey::Sun => "sun",
        }
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DayKey {
    type Err = EngineError;

    /// Accepts three-letter keys and full day names, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let prefix = lower.get(..3).unwrap_or(lower.as_str());
        let day = match prefix {
            "mon" => DayKey::Mon,
            "tue" => DayKey::Tue,
            "wed" => DayKey::Wed,
            "thu" => DayKey::Thu,
            "fri" => DayKey::Fri,
            "sat" => DayKey::Sat,
            "sun" => DayKey::Sun,
            _ => return Err(EngineError::InvalidInput(format!("unknown day {s:?}"))),
        };
        if lower.len() > 3 && lower != full_name(day) {
            return Err(EngineError::InvalidInput(format!("unknown day {s:?}")));
        }
        Ok(day)
    }
}

fn full_name(day: DayKey) -> &'static str {
    match day {
        DayKey::Mon => "monday",
        DayKey::Tue => "tuesday",
        DayKey::Wed => "wednesday",
        DayKey::Thu => "thursday",
        DayKey::Fri => "friday",
        DayKey::Sat => "saturday",
        DayKey::Sun => "sunday",
    }
}

/// How a class meeting is tested against a requested window.
///
/// The two rules differ at the boundaries and are kept apart on purpose:
/// `HalfOpenInstant` treats a meeting as `[start, end)`, `OpenRange` uses the
/// strict interval overlap `start < query_end && end > query_start`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    HalfOpenInstant,
    OpenRange,
}

/// Requested time of day, either a single instant or a range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum TimeWindow {
    Instant { when: NaiveTime },
    Range { start: NaiveTime, end: NaiveTime },
}

impl TimeWindow {
    pub fn instant(when: NaiveTime) -> Self {
        TimeWindow::Instant { when }
    }

    pub fn range(start: NaiveTime, end: NaiveTime) -> Result<Self, EngineError> {
        if start > end {
            return Err(EngineError::InvalidInput(format!(
                "window start {start} is after end {end}"
            )));
        }
        Ok(TimeWindow::Range { start, end })
    }

    /// Builds a window from optional query strings. A lone `when` is an
    /// instant; `start` and `end` together form a range.
    pub fn from_query(
        when: Option<&str>,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<Self, EngineError> {
        match (when, start, end) {
            (_, Some(start), Some(end)) => {
                TimeWindow::range(parse_query_time(start)?, parse_query_time(end)?)
            }
            (Some(when), None, None) => Ok(TimeWindow::instant(parse_query_time(when)?)),
            _ => Err(EngineError::InvalidInput(
                "expected either `when` or both `start` and `end`".into(),
            )),
        }
    }

    pub fn policy(&self) -> OverlapPolicy {
        match self {
            TimeWindow::Instant { .. } => OverlapPolicy::HalfOpenInstant,
            TimeWindow::Range { .. } => OverlapPolicy::OpenRange,
        }
    }

    /// Whether a meeting spanning `[meeting_start, meeting_end)` occupies
    /// this window.
    pub fn is_occupied_by(&self, meeting_start: NaiveTime, meeting_end: NaiveTime) -> bool {
        match *self {
            TimeWindow::Instant { when } => meeting_start <= when && when < meeting_end,
            TimeWindow::Range { start, end } => meeting_start < end && meeting_end > start,
        }
    }
}

/// Parses a fixture time such as `"9:10 AM"`.
pub fn parse_meeting_time(value: &str) -> Result<NaiveTime, EngineError> {
    NaiveTime::parse_from_str(value.trim(), MEETING_TIME_FORMAT).map_err(|_| {
        EngineError::UnparseableTime {
            value: value.to_string(),
        }
    })
}

/// Parses a query time. 24-hour `"HH:MM"` is expected; the 12-hour fixture
/// format is accepted as well.
pub fn parse_query_time(value: &str) -> Result<NaiveTime, EngineError> {
    let trimmed = value.trim();
    NaiveTime::parse_from_str(trimmed, QUERY_TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(trimmed, MEETING_TIME_FORMAT))
        .map_err(|_| EngineError::UnparseableTime {
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn parses_days() {
        assert_eq!("mon".parse::<DayKey>().unwrap(), DayKey::Mon);
        assert_eq!("THU".parse::<DayKey>().unwrap(), DayKey::Thu);
        assert_eq!("Wednesday".parse::<DayKey>().unwrap(), DayKey::Wed);
        assert!("funday".parse::<DayKey>().is_err());
        assert!("monkey".parse::<DayKey>().is_err());
        assert!("".parse::<DayKey>().is_err());
    }

    #[test]
    fn parses_meeting_times() {
        assert_eq!(parse_meeting_time("9:10 AM").unwrap(), t(9, 10));
        assert_eq!(parse_meeting_time("12:45 PM").unwrap(), t(12, 45));
        assert_eq!(parse_meeting_time("03:00 PM").unwrap(), t(15, 0));
        assert!(matches!(
            parse_meeting_time("TBA"),
            Err(EngineError::UnparseableTime { .. })
        ));
    }

    #[test]
    fn parses_query_times() {
        assert_eq!(parse_query_time("14:30").unwrap(), t(14, 30));
        assert_eq!(parse_query_time("2:30 PM").unwrap(), t(14, 30));
        assert!(parse_query_time("25:00").is_err());
    }

    #[test]
    fn range_rejects_reversed_bounds() {
        assert!(matches!(
            TimeWindow::range(t(11, 0), t(10, 0)),
            Err(EngineError::InvalidInput(_))
        ));
        assert!(TimeWindow::range(t(10, 0), t(10, 0)).is_ok());
    }

    #[test]
    fn window_from_query() {
        assert_eq!(
            TimeWindow::from_query(Some("09:00"), None, None).unwrap(),
            TimeWindow::instant(t(9, 0))
        );
        assert_eq!(
            TimeWindow::from_query(None, Some("09:00"), Some("10:00")).unwrap(),
            TimeWindow::Range { start: t(9, 0), end: t(10, 0) }
        );
        assert!(TimeWindow::from_query(None, Some("09:00"), None).is_err());
    }

    #[test]
    fn instant_boundaries_are_half_open() {
        let at_start = TimeWindow::instant(t(9, 0));
        let at_end = TimeWindow::instant(t(10, 0));
        assert!(at_start.is_occupied_by(t(9, 0), t(10, 0)));
        assert!(!at_end.is_occupied_by(t(9, 0), t(10, 0)));
        assert_eq!(at_start.policy(), OverlapPolicy::HalfOpenInstant);
    }

    #[test]
    fn range_boundaries_do_not_touch() {
        let after = TimeWindow::range(t(10, 0), t(11, 0)).unwrap();
        let before = TimeWindow::range(t(8, 0), t(9, 0)).unwrap();
        let overlapping = TimeWindow::range(t(9, 30), t(10, 30)).unwrap();
        assert!(!after.is_occupied_by(t(9, 0), t(10, 0)));
        assert!(!before.is_occupied_by(t(9, 0), t(10, 0)));
        assert!(overlapping.is_occupied_by(t(9, 0), t(10, 0)));
        assert_eq!(after.policy(), OverlapPolicy::OpenRange);
    }
}
