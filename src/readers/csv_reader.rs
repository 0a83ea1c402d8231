use csv::{ReaderBuilder, StringRecord, Trim};
use std::io::Read;
use std::path::Path;

use super::parsing::{parse_date_str, parse_tenths_str};
use super::{ParsedReadings, ReadingCollector};
use crate::error::{ProcessingError, Result};
use crate::models::{Element, RawReading};

/// GHCN-Daily `by_station` CSV columns (the files carry no header)
const COL_ID: usize = 0;
const COL_DATE: usize = 1;
const COL_ELEMENT: usize = 2;
const COL_VALUE: usize = 3;
const COL_QFLAG: usize = 5;

pub struct CsvReader {
    quality_filter: bool,
}

impl CsvReader {
    pub fn new() -> Self {
        Self {
            quality_filter: false,
        }
    }

    /// Drop readings whose QFLAG column is set (failed a GHCN quality check)
    pub fn with_quality_filter(mut self, quality_filter: bool) -> Self {
        self.quality_filter = quality_filter;
        self
    }

    pub fn read_file(&self, path: &Path) -> Result<ParsedReadings> {
        let reader = Self::builder().from_path(path)?;
        self.read_records(reader, &path.display().to_string())
    }

    pub fn read_from<R: Read>(&self, input: R) -> Result<ParsedReadings> {
        let reader = Self::builder().from_reader(input);
        self.read_records(reader, "CSV input")
    }

    fn builder() -> ReaderBuilder {
        let mut builder = ReaderBuilder::new();
        builder.has_headers(false).flexible(true).trim(Trim::All);
        builder
    }

    fn read_records<R: Read>(&self, mut reader: csv::Reader<R>, source: &str) -> Result<ParsedReadings> {
        let mut collector = ReadingCollector::new(source);

        for (index, result) in reader.records().enumerate() {
            let line = index + 1;
            let record = match result {
                Ok(record) => record,
                Err(e) if e.is_io_error() => return Err(e.into()),
                Err(e) => {
                    collector.malformed(format!("line {}", line), &e.into());
                    continue;
                }
            };

            // Tolerate an exported header row
            if line == 1 && record.get(COL_DATE) == Some("DATE") {
                continue;
            }

            if self.quality_filter && Self::is_quality_flagged(&record) {
                collector.quality_flagged();
                continue;
            }

            match Self::parse_record(&record) {
                Ok(reading) => {
                    collector.set_station(record.get(COL_ID).unwrap_or_default());
                    collector.push(reading);
                }
                Err(e) => collector.malformed(format!("line {}", line), &e),
            }
        }

        Ok(collector.finish())
    }

    fn parse_record(record: &StringRecord) -> Result<RawReading> {
        let field = |index: usize, name: &str| {
            record
                .get(index)
                .filter(|s| !s.is_empty())
                .ok_or_else(|| ProcessingError::InvalidFormat(format!("Missing {} column", name)))
        };

        let date = parse_date_str(field(COL_DATE, "DATE")?)?;
        let element = Element::parse(field(COL_ELEMENT, "ELEMENT")?);
        let value = parse_tenths_str(field(COL_VALUE, "VALUE")?)?;

        Ok(RawReading::new(date, element, value))
    }

    fn is_quality_flagged(record: &StringRecord) -> bool {
        record.get(COL_QFLAG).is_some_and(|flag| !flag.is_empty())
    }
}

impl Default for CsvReader {
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

    const SAMPLE: &str = "\
USW00094728,20230101,TMAX,117,,,W,2400
USW00094728,20230101,TMIN,39,,,W,2400
USW00094728,20230101,PRCP,0,T,,W,2400
USW00094728,20230102,TMAX,-9999,,,W,
USW00094728,2023013X,TMAX,100,,,W,
USW00094728,20230103,TMIN,250,,I,W,
";

    #[test]
    fn test_read_by_station_csv() {
        let parsed = CsvReader::new().read_from(SAMPLE.as_bytes()).unwrap();

        assert_eq!(parsed.station_id.as_deref(), Some("USW00094728"));
        assert_eq!(parsed.report.total, 6);
        assert_eq!(parsed.report.accepted, 4);
        assert_eq!(parsed.report.missing, 1);
        assert_eq!(parsed.report.malformed, 1);
        assert_eq!(
            parsed.readings[0],
            RawReading::tmax(NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(), 117)
        );
    }

    #[test]
    fn test_quality_filter_drops_flagged_rows() {
        let parsed = CsvReader::new()
            .with_quality_filter(true)
            .read_from(SAMPLE.as_bytes())
            .unwrap();

        assert_eq!(parsed.report.quality_flagged, 1);
        assert_eq!(parsed.report.accepted, 3);
        assert!(parsed.readings.iter().all(|r| r.value != 250));
    }

    #[test]
    fn test_header_row_and_short_rows() {
        let input = "ID,DATE,ELEMENT,VALUE\nUSW00094728,20230101\nUSW00094728,20230101,TMIN,5\n";
        let parsed = CsvReader::new().read_from(input.as_bytes()).unwrap();

        assert_eq!(parsed.readings.len(), 1);
        assert_eq!(parsed.report.malformed, 1);
    }

    #[test]
    fn test_read_file() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        write!(temp_file, "{}", SAMPLE)?;

        let parsed = CsvReader::new().read_file(temp_file.path())?;
        assert_eq!(parsed.readings.len(), 4);
        Ok(())
    }
}
