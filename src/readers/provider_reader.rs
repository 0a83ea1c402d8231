use serde::Deserialize;
use serde_json::Value;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use super::parsing::{parse_date_value, parse_tenths_value};
use super::{ParsedReadings, ReadingCollector};
use crate::error::{ProcessingError, Result};
use crate::models::{Element, RawReading};
use crate::utils::constants::DEFAULT_BUFFER_SIZE;

/// Top-level shape of the weather-data response
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ProviderResponse {
    Records(Vec<Value>),
    Error { error: String },
}

#[derive(Debug, Deserialize)]
struct ProviderRecord {
    #[serde(rename = "DATE")]
    date: Value,

    #[serde(rename = "ELEMENT")]
    element: String,

    #[serde(rename = "VALUE")]
    value: Value,
}

/// Parses the weather-data provider's JSON response into readings.
///
/// An `{"error": ...}` body is surfaced as [`ProcessingError::Provider`];
/// individual records that fail to parse are skipped and counted.
pub struct ProviderReader;

impl ProviderReader {
    pub fn new() -> Self {
        Self
    }

    pub fn read_file(&self, path: &Path) -> Result<ParsedReadings> {
        let file = File::open(path)?;
        let mut reader = BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file);
        let mut body = String::new();
        reader.read_to_string(&mut body)?;

        self.parse_with_source(&body, &path.display().to_string())
    }

    pub fn parse_str(&self, body: &str) -> Result<ParsedReadings> {
        self.parse_with_source(body, "provider response")
    }

    fn parse_with_source(&self, body: &str, source: &str) -> Result<ParsedReadings> {
        let records = match serde_json::from_str::<ProviderResponse>(body)? {
            ProviderResponse::Records(records) => records,
            ProviderResponse::Error { error } => return Err(ProcessingError::Provider(error)),
        };

        let mut collector = ReadingCollector::new(source);
        for (index, record) in records.into_iter().enumerate() {
            match Self::parse_record(record) {
                Ok(reading) => collector.push(reading),
                Err(e) => collector.malformed(format!("record {}", index), &e),
            }
        }

        Ok(collector.finish())
    }

    fn parse_record(record: Value) -> Result<RawReading> {
        let record: ProviderRecord = serde_json::from_value(record)?;
        let date = parse_date_value(&record.date)?;
        let value = parse_tenths_value(&record.value)?;

        Ok(RawReading::new(date, Element::parse(&record.element), value))
    }
}

impl Default for ProviderReader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_reference_payload() {
        let body = r#"[
            {"DATE": "20000115", "ELEMENT": "TMIN", "VALUE": "50"},
            {"DATE": "20000115", "ELEMENT": "TMAX", "VALUE": "150"},
            {"DATE": "20010115", "ELEMENT": "TMIN", "VALUE": "60"}
        ]"#;

        let parsed = ProviderReader::new().parse_str(body).unwrap();
        assert_eq!(parsed.readings.len(), 3);
        assert_eq!(parsed.report.accepted, 3);
        assert_eq!(
            parsed.readings[1],
            RawReading::tmax(NaiveDate::from_ymd_opt(2000, 1, 15).unwrap(), 150)
        );
    }

    #[test]
    fn test_error_body_is_surfaced() {
        let body = r#"{"error": "No data found for station XYZ"}"#;
        match ProviderReader::new().parse_str(body) {
            Err(ProcessingError::Provider(message)) => {
                assert_eq!(message, "No data found for station XYZ")
            }
            other => panic!("expected provider error, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_records_are_skipped() {
        let body = r#"[
            {"DATE": 947894400000, "ELEMENT": "TMIN", "VALUE": 50.0},
            {"DATE": "not a date", "ELEMENT": "TMIN", "VALUE": "10"},
            {"DATE": "20000116", "ELEMENT": "TMIN", "VALUE": "cold"},
            {"DATE": "20000117", "VALUE": "10"},
            {"DATE": "20000118", "ELEMENT": "TMAX", "VALUE": "-9999"},
            {"DATE": "20000119", "ELEMENT": "PRCP", "VALUE": "3"}
        ]"#;

        let parsed = ProviderReader::new().parse_str(body).unwrap();
        assert_eq!(parsed.report.total, 6);
        assert_eq!(parsed.report.malformed, 3);
        assert_eq!(parsed.report.missing, 1);
        assert_eq!(parsed.readings.len(), 2);
        assert_eq!(parsed.readings[0].value, 50);
        assert_eq!(parsed.readings[1].element, Element::Other("PRCP".to_string()));
    }

    #[test]
    fn test_non_json_body_is_an_error() {
        assert!(matches!(
            ProviderReader::new().parse_str("<html>502</html>"),
            Err(ProcessingError::Json(_))
        ));
    }

    #[test]
    fn test_read_file() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(temp_file, r#"[{{"DATE": "2000-07-01", "ELEMENT": "TMAX", "VALUE": "250"}}]"#)?;

        let parsed = ProviderReader::new().read_file(temp_file.path())?;
        assert_eq!(parsed.readings.len(), 1);
        assert_eq!(parsed.readings[0].celsius(), 25.0);
        Ok(())
    }
}
