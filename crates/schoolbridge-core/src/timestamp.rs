// Timestamp normalization at the adapter boundary.
//
// The store persists every timestamp as epoch milliseconds; the external auth
// library sends whatever it has: epoch seconds, epoch milliseconds, ISO-8601
// strings, or serialized date values. Normalization happens here and nowhere
// else.

use chrono::{DateTime, TimeZone, Utc};

/// Numeric values at or above this are epoch milliseconds; below it they are
/// treated as epoch seconds and scaled. 1e12 ms is 2001-09-09, far past any
/// plausible seconds-denominated auth timestamp.
pub const SECONDS_CUTOFF_MS: i64 = 1_000_000_000_000;

/// Normalize a timestamp-like JSON value to epoch milliseconds.
///
/// Accepted inputs:
/// - integer or float: epoch seconds when below [`SECONDS_CUTOFF_MS`],
///   epoch milliseconds otherwise (fractions truncated);
/// - string: ISO-8601 / RFC 3339, which is how date values arrive once
///   serialized to JSON.
///
/// Returns `None` for nulls and shapes that cannot represent an instant, so
/// the caller can decide between "field absent" and "use now".
pub fn normalize_epoch_millis(value: &serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::Number(n) => {
            let raw = n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64))?;
            if raw < SECONDS_CUTOFF_MS {
                Some(raw.saturating_mul(1000))
            } else {
                Some(raw)
            }
        }
        serde_json::Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.timestamp_millis()),
        _ => None,
    }
}

/// Like [`normalize_epoch_millis`], defaulting to the current instant when
/// the value is absent or unusable. Used on create, where timestamps are
/// required fields.
pub fn normalize_or_now(value: Option<&serde_json::Value>) -> i64 {
    value
        .and_then(normalize_epoch_millis)
        .unwrap_or_else(|| Utc::now().timestamp_millis())
}

/// Restore an epoch-millisecond value to a date object for the wire record.
pub fn to_datetime(epoch_millis: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(epoch_millis)
        .single()
        .unwrap_or_else(Utc::now)
}
