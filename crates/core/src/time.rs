use chrono::{DateTime, Duration, NaiveDateTime, Utc};

use crate::error::{Result, SirenError};

// The chat room reads wall-clock PST; source timestamps are UTC. Fixed
// offset, no DST awareness.
const PST_OFFSET_HOURS: i64 = 7;

pub fn to_pst_micros(ts: &DateTime<Utc>) -> String {
    (ts.naive_utc() - Duration::hours(PST_OFFSET_HOURS))
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}

/// Execution time from the fixed-width prefix of a batch log's first line,
/// e.g. `[2023-01-01 10:00:00,123] ...`.
pub fn parse_exec_ts(first_line: &str) -> Result<String> {
    let raw = first_line.get(1..20).ok_or_else(|| {
        SirenError::Parse(format!("log line too short for a timestamp prefix: {first_line}"))
    })?;
    let ts = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .map_err(|e| SirenError::Parse(format!("bad execution timestamp {raw}: {e}")))?;
    Ok((ts - Duration::hours(PST_OFFSET_HOURS))
        .format("%Y-%m-%dT%H:%M:%S")
        .to_string())
}
