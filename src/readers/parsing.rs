use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::error::{ProcessingError, Result};

/// Parse a provider date string: `YYYYMMDD`, `YYYY-MM-DD`, or an ISO timestamp
pub fn parse_date_str(date_str: &str) -> Result<NaiveDate> {
    let trimmed = date_str.trim();

    if trimmed.len() == 8 && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Ok(NaiveDate::parse_from_str(trimmed, "%Y%m%d")?);
    }

    if trimmed.len() == 10 {
        return Ok(NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")?);
    }

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(timestamp.date_naive());
    }

    Ok(NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")?.date())
}

/// Parse a JSON date: a string as above, or an integer that is either
/// `YYYYMMDD` or epoch milliseconds
pub fn parse_date_value(value: &Value) -> Result<NaiveDate> {
    match value {
        Value::String(s) => parse_date_str(s),
        Value::Number(n) => {
            let raw = n.as_i64().ok_or_else(|| {
                ProcessingError::InvalidFormat(format!("Non-integer date: {}", n))
            })?;

            if (10000101..=99991231).contains(&raw) {
                return parse_date_str(&raw.to_string());
            }

            DateTime::from_timestamp_millis(raw)
                .map(|dt| dt.date_naive())
                .ok_or_else(|| {
                    ProcessingError::InvalidFormat(format!("Timestamp out of range: {}", raw))
                })
        }
        other => Err(ProcessingError::InvalidFormat(format!(
            "Unsupported date value: {}",
            other
        ))),
    }
}

/// Parse a value in tenths of a degree; integral floats ("50.0") are accepted
pub fn parse_tenths_str(value_str: &str) -> Result<i32> {
    let trimmed = value_str.trim();

    if let Ok(value) = trimmed.parse::<i32>() {
        return Ok(value);
    }

    trimmed
        .parse::<f64>()
        .ok()
        .and_then(integral_to_i32)
        .ok_or_else(|| ProcessingError::InvalidFormat(format!("Invalid value: '{}'", value_str)))
}

pub fn parse_tenths_value(value: &Value) -> Result<i32> {
    match value {
        Value::String(s) => parse_tenths_str(s),
        Value::Number(n) => n
            .as_i64()
            .and_then(|v| i32::try_from(v).ok())
            .or_else(|| n.as_f64().and_then(integral_to_i32))
            .ok_or_else(|| ProcessingError::InvalidFormat(format!("Invalid value: {}", n))),
        other => Err(ProcessingError::InvalidFormat(format!(
            "Unsupported value: {}",
            other
        ))),
    }
}

fn integral_to_i32(value: f64) -> Option<i32> {
    let in_range = value >= i32::MIN as f64 && value <= i32::MAX as f64;
    (value.is_finite() && value.fract() == 0.0 && in_range).then_some(value as i32)
}
