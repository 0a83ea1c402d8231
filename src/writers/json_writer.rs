use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::analyzers::ChartSeries;
use crate::error::Result;
use crate::models::AggregatedDataset;

/// Pretty-printed JSON output for the aggregated dataset or chart lines
pub struct JsonWriter;

impl JsonWriter {
    pub fn new() -> Self {
        Self
    }

    pub fn write_dataset(&self, dataset: &AggregatedDataset, path: &Path) -> Result<()> {
        self.write_value(dataset, path)
    }

    pub fn write_series(&self, series: &[ChartSeries], path: &Path) -> Result<()> {
        self.write_value(series, path)
    }

    fn write_value<T: Serialize + ?Sized>(&self, value: &T, path: &Path) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, value)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }
}

impl Default for JsonWriter {
    fn default() -> Self {
        Self::new()
    }
}
