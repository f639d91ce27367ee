//! Timestamp normalization
//!
//! Every timestamp column holds UTC epoch seconds as an INTEGER. Values are
//! truncated to whole seconds before they are stored, so reading a field back
//! yields the written value with its sub-second part zeroed.

use chrono::{DateTime, Timelike, Utc};

use crate::insights::InsightsError;

/// Drop the sub-second component
pub fn truncate_to_second(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.with_nanosecond(0).unwrap_or(ts)
}

/// Current time, truncated to the second
pub fn now_seconds() -> DateTime<Utc> {
    truncate_to_second(Utc::now())
}

pub fn to_epoch_seconds(ts: DateTime<Utc>) -> i64 {
    ts.timestamp()
}

pub fn from_epoch_seconds(secs: i64) -> Result<DateTime<Utc>, InsightsError> {
    DateTime::from_timestamp(secs, 0).ok_or(InsightsError::TimestampOutOfRange(secs))
}

/// Parse an RFC 3339 string (any offset) into a UTC timestamp
pub fn parse_rfc3339(s: &str) -> Result<DateTime<Utc>, InsightsError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| InsightsError::InvalidTimestamp(format!("{}: {}", s, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_zeroes_millis() {
        let ts = parse_rfc3339("2025-01-20T08:15:42.987654Z").unwrap();
        let truncated = truncate_to_second(ts);
        assert_eq!(truncated, parse_rfc3339("2025-01-20T08:15:42Z").unwrap());
        assert_eq!(truncated.nanosecond(), 0);
    }

    #[test]
    fn test_epoch_seconds_round_trip() {
        let ts = parse_rfc3339("2024-12-31T23:59:59Z").unwrap();
        let secs = to_epoch_seconds(ts);
        assert_eq!(secs, 1_735_689_599);
        assert_eq!(from_epoch_seconds(secs).unwrap(), ts);
    }

    #[test]
    fn test_offsets_are_normalized_to_utc() {
        let ts = parse_rfc3339("2025-01-20T10:00:00+02:00").unwrap();
        assert_eq!(ts, parse_rfc3339("2025-01-20T08:00:00Z").unwrap());
    }

    #[test]
    fn test_now_seconds_has_no_fraction() {
        assert_eq!(now_seconds().nanosecond(), 0);
    }

    #[test]
    fn test_invalid_input() {
        assert!(matches!(
            parse_rfc3339("yesterday"),
            Err(InsightsError::InvalidTimestamp(_))
        ));
        assert!(matches!(
            from_epoch_seconds(i64::MAX),
            Err(InsightsError::TimestampOutOfRange(_))
        ));
    }
}
