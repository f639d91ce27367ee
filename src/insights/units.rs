//! Type tags and period units, with their stored integer codes

use chrono::{DateTime, Datelike, Duration, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::InsightsError;

/// What a recorded insight measures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeUnit {
    Success,
    Failure,
    /// Execution runtime in milliseconds
    RuntimeMs,
    /// Time saved by the workflow, in minutes
    TimeSavedMin,
}

impl TypeUnit {
    pub const ALL: [TypeUnit; 4] = [
        TypeUnit::Success,
        TypeUnit::Failure,
        TypeUnit::RuntimeMs,
        TypeUnit::TimeSavedMin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TypeUnit::Success => "success",
            TypeUnit::Failure => "failure",
            TypeUnit::RuntimeMs => "runtime_ms",
            TypeUnit::TimeSavedMin => "time_saved_min",
        }
    }

    /// Integer code stored in the `type` column
    pub fn code(&self) -> i64 {
        match self {
            TypeUnit::TimeSavedMin => 0,
            TypeUnit::RuntimeMs => 1,
            TypeUnit::Success => 2,
            TypeUnit::Failure => 3,
        }
    }

    pub fn from_code(code: i64) -> Result<Self, InsightsError> {
        match code {
            0 => Ok(TypeUnit::TimeSavedMin),
            1 => Ok(TypeUnit::RuntimeMs),
            2 => Ok(TypeUnit::Success),
            3 => Ok(TypeUnit::Failure),
            other => Err(InsightsError::UnknownTypeCode(other)),
        }
    }
}

impl FromStr for TypeUnit {
    type Err = InsightsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TypeUnit::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| InsightsError::UnknownType(s.to_string()))
    }
}

impl fmt::Display for TypeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Bucket width of a compacted event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodUnit {
    Hour,
    Day,
    Week,
}

impl PeriodUnit {
    pub const ALL: [PeriodUnit; 3] = [PeriodUnit::Hour, PeriodUnit::Day, PeriodUnit::Week];

    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodUnit::Hour => "hour",
            PeriodUnit::Day => "day",
            PeriodUnit::Week => "week",
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            PeriodUnit::Hour => 0,
            PeriodUnit::Day => 1,
            PeriodUnit::Week => 2,
        }
    }

    pub fn from_code(code: i64) -> Result<Self, InsightsError> {
        match code {
            0 => Ok(PeriodUnit::Hour),
            1 => Ok(PeriodUnit::Day),
            2 => Ok(PeriodUnit::Week),
            other => Err(InsightsError::UnknownPeriodCode(other)),
        }
    }

    /// Start of the bucket containing `ts`, in UTC.
    /// Weeks start on Monday (ISO).
    pub fn start_of(&self, ts: DateTime<Utc>) -> DateTime<Utc> {
        let midnight = Utc
            .with_ymd_and_hms(ts.year(), ts.month(), ts.day(), 0, 0, 0)
            .single()
            .unwrap_or(ts);

        match self {
            PeriodUnit::Hour => midnight + Duration::hours(i64::from(ts.hour())),
            PeriodUnit::Day => midnight,
            PeriodUnit::Week => {
                midnight - Duration::days(i64::from(ts.weekday().num_days_from_monday()))
            }
        }
    }
}

impl FromStr for PeriodUnit {
    type Err = InsightsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PeriodUnit::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| InsightsError::UnknownPeriod(s.to_string()))
    }
}

impl fmt::Display for PeriodUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_type_tags_round_trip() {
        for unit in TypeUnit::ALL {
            assert_eq!(unit.as_str().parse::<TypeUnit>().unwrap(), unit);
            assert_eq!(TypeUnit::from_code(unit.code()).unwrap(), unit);
        }
    }

    #[test]
    fn test_unknown_tags_are_rejected() {
        assert!(matches!(
            "crashed".parse::<TypeUnit>(),
            Err(InsightsError::UnknownType(_))
        ));
        assert!(matches!(
            TypeUnit::from_code(9),
            Err(InsightsError::UnknownTypeCode(9))
        ));
        assert!(matches!(
            "month".parse::<PeriodUnit>(),
            Err(InsightsError::UnknownPeriod(_))
        ));
    }

    #[test]
    fn test_start_of_hour_and_day() {
        let ts = at("2025-03-12T14:37:21.250Z");
        assert_eq!(PeriodUnit::Hour.start_of(ts), at("2025-03-12T14:00:00Z"));
        assert_eq!(PeriodUnit::Day.start_of(ts), at("2025-03-12T00:00:00Z"));
    }

    #[test]
    fn test_start_of_week_is_monday() {
        // 2025-03-12 is a Wednesday
        let ts = at("2025-03-12T14:37:21Z");
        assert_eq!(PeriodUnit::Week.start_of(ts), at("2025-03-10T00:00:00Z"));

        // Sunday belongs to the week that started six days earlier
        let sunday = at("2025-03-16T23:59:59Z");
        assert_eq!(PeriodUnit::Week.start_of(sunday), at("2025-03-10T00:00:00Z"));

        let monday = at("2025-03-10T00:00:00Z");
        assert_eq!(PeriodUnit::Week.start_of(monday), monday);
    }

    #[test]
    fn test_serde_uses_snake_case_tags() {
        let json = serde_json::to_string(&TypeUnit::TimeSavedMin).unwrap();
        assert_eq!(json, "\"time_saved_min\"");
        let unit: PeriodUnit = serde_json::from_str("\"week\"").unwrap();
        assert_eq!(unit, PeriodUnit::Week);
    }
}
