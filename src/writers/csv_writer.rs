use std::path::{Path, PathBuf};

use crate::analyzers::series_builder::format_cell;
use crate::analyzers::{DataTable, SeriesBuilder, SeriesSelection};
use crate::error::Result;
use crate::models::AggregatedDataset;
use crate::utils::with_stem_suffix;

/// Year-keyed CSV tables; missing cells are left empty
pub struct CsvWriter;

impl CsvWriter {
    pub fn new() -> Self {
        Self
    }

    pub fn write_table(&self, table: &DataTable, path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;

        let mut header = vec!["Year".to_string()];
        header.extend(table.columns.iter().cloned());
        writer.write_record(&header)?;

        for row in &table.rows {
            let mut record = vec![row.year.to_string()];
            record.extend(row.cells.iter().map(|cell| format_cell(*cell)));
            writer.write_record(&record)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Write `<stem>-annual.csv` and `<stem>-seasonal.csv` for the visible
    /// series; returns the paths actually written
    pub fn write_dataset(
        &self,
        dataset: &AggregatedDataset,
        selection: &SeriesSelection,
        path: &Path,
    ) -> Result<Vec<PathBuf>> {
        let tables = [
            ("annual", SeriesBuilder::annual_table(dataset, selection)),
            ("seasonal", SeriesBuilder::seasonal_table(dataset, selection)),
        ];

        let mut written = Vec::new();
        for (suffix, table) in tables {
            if let Some(table) = table {
                let target = with_stem_suffix(path, suffix);
                self.write_table(&table, &target)?;
                written.push(target);
            }
        }

        Ok(written)
    }
}

impl Default for CsvWriter {
    fn default() -> Self {
        Self::new()
    }
}
