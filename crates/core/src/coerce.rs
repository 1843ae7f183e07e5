//! Coercion of duck-typed document values.
//!
//! Documents exported from the legacy store carry timestamps in several
//! shapes: RFC 3339 strings, epoch milliseconds, or `{seconds, nanoseconds}`
//! objects. All read paths convert through [`to_timestamp`], which falls
//! back to the current time for anything unrecognized.

use chrono::{TimeZone, Utc};
use serde_json::Value;

use crate::types::Timestamp;

/// Convert a raw document value to a UTC timestamp, falling back to now.
pub fn to_timestamp(raw: &Value) -> Timestamp {
    match raw {
        Value::String(text) => chrono::DateTime::parse_from_rfc3339(text)
            .map(|parsed| parsed.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
        Value::Number(number) => number
            .as_i64()
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single())
            .unwrap_or_else(Utc::now),
        Value::Object(map) => {
            let seconds = map
                .get("seconds")
                .or_else(|| map.get("_seconds"))
                .and_then(Value::as_i64);
            let nanos = map
                .get("nanoseconds")
                .or_else(|| map.get("_nanoseconds"))
                .and_then(Value::as_u64)
                .unwrap_or(0) as u32;
            seconds
                .and_then(|secs| Utc.timestamp_opt(secs, nanos).single())
                .unwrap_or_else(Utc::now)
        }
        _ => Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_rfc3339_strings() {
        let ts = to_timestamp(&json!("2024-03-01T12:00:00Z"));
        assert_eq!(ts.to_rfc3339(), "2024-03-01T12:00:00+00:00");
    }

    #[test]
    fn parses_epoch_milliseconds() {
        let ts = to_timestamp(&json!(1_709_294_400_000_i64));
        assert_eq!(ts.timestamp(), 1_709_294_400);
    }

    #[test]
    fn parses_seconds_nanos_objects() {
        let ts = to_timestamp(&json!({"seconds": 1_709_294_400, "nanoseconds": 0}));
        assert_eq!(ts.timestamp(), 1_709_294_400);

        let underscored = to_timestamp(&json!({"_seconds": 1_709_294_400}));
        assert_eq!(underscored.timestamp(), 1_709_294_400);
    }

    #[test]
    fn unrecognized_values_fall_back_to_now() {
        let before = Utc::now();
        for raw in [json!(null), json!(true), json!("not a date"), json!([1, 2])] {
            let ts = to_timestamp(&raw);
            assert!(ts >= before);
        }
    }
}
