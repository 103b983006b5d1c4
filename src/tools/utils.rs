use crate::error::ToolError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

pub const MAX_UUIDS: usize = 50;

// Epoch values above this are taken to be milliseconds
const MILLIS_THRESHOLD: u64 = 100_000_000_000;

#[derive(Debug, Serialize)]
pub struct TimestampInfo {
    pub unix: i64,
    pub unix_millis: i64,
    pub rfc3339: String,
    pub human: String,
}

/// Current UTC timestamp
pub fn timestamp() -> String {
    Utc::now().to_rfc3339()
}

fn describe(at: DateTime<Utc>) -> TimestampInfo {
    TimestampInfo {
        unix: at.timestamp(),
        unix_millis: at.timestamp_millis(),
        rfc3339: at.to_rfc3339(),
        human: at.format("%A, %B %-d, %Y %H:%M:%S UTC").to_string(),
    }
}

/// Interpret a Unix time (seconds or milliseconds) or an RFC 3339 string.
/// `None` describes the current time.
pub fn timestamp_info(input: Option<&str>) -> Result<TimestampInfo, ToolError> {
    let input = match input.map(str::trim).filter(|s| !s.is_empty()) {
        Some(input) => input,
        None => return Ok(describe(Utc::now())),
    };

    if let Ok(number) = input.parse::<i64>() {
        let parsed = if number.unsigned_abs() >= MILLIS_THRESHOLD {
            DateTime::from_timestamp_millis(number)
        } else {
            DateTime::from_timestamp(number, 0)
        };
        return parsed
            .map(describe)
            .ok_or_else(|| ToolError::invalid("time", format!("{} is out of range", number)));
    }

    DateTime::parse_from_rfc3339(input)
        .map(|at| describe(at.with_timezone(&Utc)))
        .map_err(|e| {
            ToolError::invalid(
                "time",
                format!("expected Unix seconds, milliseconds or RFC 3339: {}", e),
            )
        })
}

pub fn generate_uuids(count: usize) -> Result<Vec<String>, ToolError> {
    if !(1..=MAX_UUIDS).contains(&count) {
        return Err(ToolError::OutOfRange {
            value: i64::try_from(count).unwrap_or(i64::MAX),
            min: 1,
            max: MAX_UUIDS as i64,
        });
    }
    Ok((0..count).map(|_| Uuid::new_v4().to_string()).collect())
}
