use crate::error::{ProcessingError, Result};
use crate::models::{AggregatedDataset, Hemisphere, YearRange};
use crate::processors::{filter_years, IntegrityChecker, IntegrityReport, TemporalAggregator};
use crate::readers::{read_readings, InputFormat, ParseReport, ReaderOptions};
use crate::utils::progress::ProgressReporter;
use crate::utils::station_from_path;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Everything produced for one station file
#[derive(Debug, Clone)]
pub struct StationResult {
    pub station_id: String,
    pub input: PathBuf,
    pub parse_report: ParseReport,
    pub integrity_report: IntegrityReport,
    pub dataset: AggregatedDataset,
}

/// Read, filter, check and aggregate a single station file
pub struct StationProcessor {
    aggregator: TemporalAggregator,
    checker: IntegrityChecker,
    year_range: Option<YearRange>,
    reader_options: ReaderOptions,
}

impl StationProcessor {
    pub fn new(hemisphere: Hemisphere) -> Self {
        Self {
            aggregator: TemporalAggregator::new(hemisphere),
            checker: IntegrityChecker::new(),
            year_range: None,
            reader_options: ReaderOptions::default(),
        }
    }

    pub fn with_year_range(mut self, year_range: Option<YearRange>) -> Self {
        self.year_range = year_range;
        self
    }

    pub fn with_reader_options(mut self, reader_options: ReaderOptions) -> Self {
        self.reader_options = reader_options;
        self
    }

    pub fn checker(&self) -> &IntegrityChecker {
        &self.checker
    }

    /// `format` of `None` detects the format from the file extension
    pub fn process_file(&self, path: &Path, format: Option<InputFormat>) -> Result<StationResult> {
        let format = match format {
            Some(format) => format,
            None => InputFormat::from_path(path)?,
        };

        let parsed = read_readings(path, format, self.reader_options)?;
        let readings = match &self.year_range {
            Some(range) => filter_years(parsed.readings, range),
            None => parsed.readings,
        };

        let integrity_report = self.checker.check(&readings);
        let dataset = self.aggregator.aggregate(&readings);

        Ok(StationResult {
            station_id: parsed
                .station_id
                .unwrap_or_else(|| station_from_path(path)),
            input: path.to_path_buf(),
            parse_report: parsed.report,
            integrity_report,
            dataset,
        })
    }
}

/// Runs a [`StationProcessor`] over every supported file in a directory
pub struct BatchProcessor {
    max_workers: usize,
}

impl BatchProcessor {
    pub fn new(max_workers: usize) -> Self {
        Self {
            max_workers: max_workers.max(1),
        }
    }

    /// Supported station files in `dir`, sorted by path
    pub fn discover_files(dir: &Path) -> Result<Vec<PathBuf>> {
        if !dir.is_dir() {
            return Err(ProcessingError::MissingData(format!(
                "Not a directory: {}",
                dir.display()
            )));
        }

        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && InputFormat::is_supported(&path) {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    /// Process all files in parallel. A failing file is logged and returned
    /// as an error entry; it never stops the others.
    pub fn process_files(
        &self,
        processor: &StationProcessor,
        files: &[PathBuf],
        progress: Option<&ProgressReporter>,
    ) -> Result<Vec<(PathBuf, Result<StationResult>)>> {
        info!(
            "Processing {} station files with {} workers",
            files.len(),
            self.max_workers
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.max_workers)
            .build()?;

        let results = pool.install(|| {
            files
                .par_iter()
                .map(|path| {
                    let result = processor.process_file(path, None);
                    if let Err(e) = &result {
                        error!("Failed to process {}: {}", path.display(), e);
                    }
                    if let Some(p) = progress {
                        p.increment(1);
                    }
                    (path.clone(), result)
                })
                .collect()
        });

        Ok(results)
    }
}
