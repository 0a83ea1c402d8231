use chrono::NaiveDate;
use memmap2::Mmap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::parsing::parse_tenths_str;
use super::{ParsedReadings, ReadingCollector};
use crate::error::{ProcessingError, Result};
use crate::models::{Element, RawReading};
use crate::utils::constants::{
    DEFAULT_BUFFER_SIZE, DLY_DAY_WIDTH, DLY_FIRST_VALUE_OFFSET, DLY_MIN_LINE_LENGTH,
    DLY_QFLAG_OFFSET, DLY_VALUE_WIDTH, MISSING_VALUE,
};

/// Reader for GHCN-Daily `.dly` files: one line per station, element and
/// month, followed by 31 fixed-width day slots.
pub struct DlyReader {
    quality_filter: bool,
    use_mmap: bool,
}

impl DlyReader {
    pub fn new() -> Self {
        Self {
            quality_filter: false,
            use_mmap: false,
        }
    }

    pub fn with_quality_filter(mut self, quality_filter: bool) -> Self {
        self.quality_filter = quality_filter;
        self
    }

    pub fn with_mmap(mut self, use_mmap: bool) -> Self {
        self.use_mmap = use_mmap;
        self
    }

    pub fn read_file(&self, path: &Path) -> Result<ParsedReadings> {
        if self.use_mmap {
            self.read_file_mmap(path)
        } else {
            self.read_file_buffered(path)
        }
    }

    fn read_file_buffered(&self, path: &Path) -> Result<ParsedReadings> {
        let file = File::open(path)?;
        let reader = BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file);
        let mut collector = ReadingCollector::new(path.display().to_string());

        for (index, line) in reader.lines().enumerate() {
            self.parse_line(&line?, index + 1, &mut collector);
        }

        Ok(collector.finish())
    }

    fn read_file_mmap(&self, path: &Path) -> Result<ParsedReadings> {
        let file = File::open(path)?;
        let mmap = unsafe { Mmap::map(&file)? };
        let content = std::str::from_utf8(&mmap)
            .map_err(|e| ProcessingError::InvalidFormat(format!("Invalid UTF-8: {}", e)))?;

        Ok(self.parse_str_with_source(content, &path.display().to_string()))
    }

    pub fn parse_str(&self, content: &str) -> ParsedReadings {
        self.parse_str_with_source(content, ".dly input")
    }

    fn parse_str_with_source(&self, content: &str, source: &str) -> ParsedReadings {
        let mut collector = ReadingCollector::new(source);
        for (index, line) in content.lines().enumerate() {
            self.parse_line(line, index + 1, &mut collector);
        }
        collector.finish()
    }

    fn parse_line(&self, line: &str, line_number: usize, collector: &mut ReadingCollector) {
        if line.trim().is_empty() {
            return;
        }

        let (station_id, year, month, element) = match Self::parse_header(line) {
            Ok(header) => header,
            Err(e) => {
                collector.malformed(format!("line {}", line_number), &e);
                return;
            }
        };
        collector.set_station(station_id);

        for day in 1..=31u32 {
            let start = DLY_FIRST_VALUE_OFFSET + (day as usize - 1) * DLY_DAY_WIDTH;
            let location = format!("line {} day {}", line_number, day);

            let value = match line
                .get(start..start + DLY_VALUE_WIDTH)
                .ok_or_else(|| ProcessingError::InvalidFormat("Truncated day slot".to_string()))
                .and_then(parse_tenths_str)
            {
                Ok(value) => value,
                Err(e) => {
                    collector.malformed(&location, &e);
                    continue;
                }
            };

            // Unused slots (e.g. February 30) always carry the sentinel
            if value == MISSING_VALUE {
                collector.missing();
                continue;
            }

            let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
                collector.malformed(
                    &location,
                    &ProcessingError::InvalidFormat(format!(
                        "Value {} on non-existent date {}-{:02}-{:02}",
                        value, year, month, day
                    )),
                );
                continue;
            };

            let qflag = start + DLY_QFLAG_OFFSET;
            if self.quality_filter && line.get(qflag..qflag + 1).is_some_and(|f| f != " ") {
                collector.quality_flagged();
                continue;
            }

            collector.push(RawReading::new(date, element.clone(), value));
        }
    }

    fn parse_header(line: &str) -> Result<(&str, i32, u32, Element)> {
        if line.len() < DLY_MIN_LINE_LENGTH {
            return Err(ProcessingError::InvalidFormat(format!(
                "Line too short: {} < {} characters",
                line.len(),
                DLY_MIN_LINE_LENGTH
            )));
        }

        let field = |range: std::ops::Range<usize>, name: &str| {
            line.get(range).ok_or_else(|| {
                ProcessingError::InvalidFormat(format!("Unreadable {} field", name))
            })
        };

        let station_id = field(0..11, "ID")?;
        let year = field(11..15, "YEAR")?
            .parse::<i32>()
            .map_err(|_| ProcessingError::InvalidFormat("Invalid year".to_string()))?;
        let month = field(15..17, "MONTH")?
            .parse::<u32>()
            .ok()
            .filter(|m| (1..=12).contains(m))
            .ok_or_else(|| ProcessingError::InvalidFormat("Invalid month".to_string()))?;
        let element = Element::parse(field(17..21, "ELEMENT")?);

        Ok((station_id, year, month, element))
    }
}

impl Default for DlyReader {
    fn default() -> Self {
        Self::new()
    }
}
