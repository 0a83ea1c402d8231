pub mod csv_reader;
pub mod dly_reader;
pub mod parsing;
pub mod provider_reader;

pub use csv_reader::CsvReader;
pub use dly_reader::DlyReader;
pub use provider_reader::ProviderReader;

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::{info, warn};

use crate::error::{ProcessingError, Result};
use crate::models::RawReading;
use crate::utils::constants::MISSING_VALUE;

/// Counts gathered while turning a provider payload into readings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseReport {
    pub total: usize,
    pub accepted: usize,
    pub malformed: usize,
    pub missing: usize,
    pub quality_flagged: usize,
}

impl ParseReport {
    pub fn merge(&mut self, other: &ParseReport) {
        self.total += other.total;
        self.accepted += other.accepted;
        self.malformed += other.malformed;
        self.missing += other.missing;
        self.quality_flagged += other.quality_flagged;
    }

    pub fn summary(&self) -> String {
        format!(
            "Parse Summary:\n\
            - Records seen: {}\n\
            - Accepted: {}\n\
            - Malformed (skipped): {}\n\
            - Missing values (-9999): {}\n\
            - Quality-flagged (dropped): {}",
            self.total, self.accepted, self.malformed, self.missing, self.quality_flagged
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParsedReadings {
    pub station_id: Option<String>,
    pub readings: Vec<RawReading>,
    pub report: ParseReport,
}

/// Accumulates readings and applies the shared skip rules:
/// the missing sentinel is dropped, malformed records are logged and counted
#[derive(Debug, Default)]
pub(crate) struct ReadingCollector {
    source: String,
    parsed: ParsedReadings,
}

impl ReadingCollector {
    pub(crate) fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            parsed: ParsedReadings::default(),
        }
    }

    pub(crate) fn set_station(&mut self, station_id: &str) {
        let station_id = station_id.trim();
        if self.parsed.station_id.is_none() && !station_id.is_empty() {
            self.parsed.station_id = Some(station_id.to_string());
        }
    }

    pub(crate) fn push(&mut self, reading: RawReading) {
        if reading.value == MISSING_VALUE {
            self.missing();
            return;
        }
        self.parsed.report.total += 1;
        self.parsed.report.accepted += 1;
        self.parsed.readings.push(reading);
    }

    pub(crate) fn missing(&mut self) {
        self.parsed.report.total += 1;
        self.parsed.report.missing += 1;
    }

    pub(crate) fn malformed(&mut self, location: impl fmt::Display, error: &ProcessingError) {
        self.parsed.report.total += 1;
        self.parsed.report.malformed += 1;
        warn!("Skipping malformed record in {} at {}: {}", self.source, location, error);
    }

    pub(crate) fn quality_flagged(&mut self) {
        self.parsed.report.total += 1;
        self.parsed.report.quality_flagged += 1;
    }

    pub(crate) fn finish(self) -> ParsedReadings {
        let report = &self.parsed.report;
        info!(
            "Parsed {}: {} readings accepted, {} malformed, {} missing, {} quality-flagged",
            self.source, report.accepted, report.malformed, report.missing, report.quality_flagged
        );
        self.parsed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// Weather-data provider response (`[{DATE, ELEMENT, VALUE}, ...]`)
    Json,
    /// GHCN-Daily `by_station` CSV
    Csv,
    /// GHCN-Daily `.dly` fixed-width file
    Dly,
}

impl InputFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| {
                ProcessingError::InvalidFormat(format!(
                    "Cannot detect input format of {}",
                    path.display()
                ))
            })?;
        extension.parse()
    }

    pub fn is_supported(path: &Path) -> bool {
        Self::from_path(path).is_ok()
    }
}

impl FromStr for InputFormat {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(InputFormat::Json),
            "csv" => Ok(InputFormat::Csv),
            "dly" => Ok(InputFormat::Dly),
            other => Err(ProcessingError::InvalidFormat(format!(
                "Unsupported input format: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReaderOptions {
    pub quality_filter: bool,
    pub use_mmap: bool,
}

/// Read any supported station file into readings
pub fn read_readings(
    path: &Path,
    format: InputFormat,
    options: ReaderOptions,
) -> Result<ParsedReadings> {
    match format {
        InputFormat::Json => ProviderReader::new().read_file(path),
        InputFormat::Csv => CsvReader::new()
            .with_quality_filter(options.quality_filter)
            .read_file(path),
        InputFormat::Dly => DlyReader::new()
            .with_quality_filter(options.quality_filter)
            .with_mmap(options.use_mmap)
            .read_file(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_input_format_detection() {
        assert_eq!(InputFormat::from_path(Path::new("a/USW00094728.dly")).unwrap(), InputFormat::Dly);
        assert_eq!(InputFormat::from_path(Path::new("b.CSV")).unwrap(), InputFormat::Csv);
        assert_eq!(InputFormat::from_path(Path::new("c.json")).unwrap(), InputFormat::Json);
        assert!(InputFormat::from_path(Path::new("notes.txt")).is_err());
        assert!(!InputFormat::is_supported(Path::new("README")));
    }

    #[test]
    fn test_collector_drops_missing_sentinel() {
        let date = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let mut collector = ReadingCollector::new("test");
        collector.push(RawReading::tmin(date, -9999));
        collector.push(RawReading::tmin(date, 12));
        collector.malformed("line 3", &ProcessingError::InvalidFormat("bad".to_string()));

        let parsed = collector.finish();
        assert_eq!(parsed.readings.len(), 1);
        assert_eq!(
            parsed.report,
            ParseReport {
                total: 3,
                accepted: 1,
                malformed: 1,
                missing: 1,
                quality_flagged: 0,
            }
        );
    }

    #[test]
    fn test_report_merge() {
        let mut total = ParseReport::default();
        total.merge(&ParseReport {
            total: 4,
            accepted: 3,
            malformed: 1,
            ..Default::default()
        });
        total.merge(&ParseReport {
            total: 2,
            missing: 2,
            ..Default::default()
        });
        assert_eq!(total.total, 6);
        assert_eq!(total.accepted, 3);
        assert_eq!(total.missing, 2);
        assert!(total.summary().contains("Records seen: 6"));
    }
}
