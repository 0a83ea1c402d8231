use crate::error::{ProcessingError, Result};
use crate::models::{AggregatedDataset, Element, Season};
use crate::utils::constants::{
    COMPRESSION_GZIP, COMPRESSION_LZ4, COMPRESSION_NONE, COMPRESSION_SNAPPY, COMPRESSION_ZSTD,
    DEFAULT_ROW_GROUP_SIZE,
};
use arrow::array::*;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, GzipLevel, ZstdLevel};
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

pub const PERIOD_ANNUAL: &str = "annual";
pub const PERIOD_SEASONAL: &str = "seasonal";

/// One aggregated point in long format: a row per element, period and year
#[derive(Debug, Clone, PartialEq)]
pub struct PointRecord {
    pub element: Element,
    pub period: String,
    pub year: i32,
    pub season: Option<Season>,
    pub value: Option<f64>,
}

impl PointRecord {
    /// Flatten a dataset into rows: annual TMIN, annual TMAX, seasonal TMIN, seasonal TMAX
    pub fn from_dataset(dataset: &AggregatedDataset) -> Vec<PointRecord> {
        let mut records = Vec::with_capacity(dataset.total_points());

        for element in [Element::Tmin, Element::Tmax] {
            records.extend(dataset.annual(&element).iter().map(|p| PointRecord {
                element: element.clone(),
                period: PERIOD_ANNUAL.to_string(),
                year: p.year,
                season: None,
                value: p.value,
            }));
        }

        for element in [Element::Tmin, Element::Tmax] {
            records.extend(dataset.seasonal(&element).iter().map(|p| PointRecord {
                element: element.clone(),
                period: PERIOD_SEASONAL.to_string(),
                year: p.year,
                season: Some(p.season),
                value: Some(p.value),
            }));
        }

        records
    }
}

pub struct ParquetWriter {
    compression: Compression,
    row_group_size: usize,
}

impl ParquetWriter {
    pub fn new() -> Self {
        Self {
            compression: Compression::SNAPPY,
            row_group_size: DEFAULT_ROW_GROUP_SIZE,
        }
    }

    pub fn with_compression(mut self, compression: &str) -> Result<Self> {
        self.compression = match compression.to_lowercase().as_str() {
            COMPRESSION_SNAPPY => Compression::SNAPPY,
            COMPRESSION_GZIP => Compression::GZIP(GzipLevel::default()),
            COMPRESSION_LZ4 => Compression::LZ4,
            COMPRESSION_ZSTD => Compression::ZSTD(ZstdLevel::default()),
            COMPRESSION_NONE => Compression::UNCOMPRESSED,
            _ => {
                return Err(ProcessingError::Config(format!(
                    "Unsupported compression: {}",
                    compression
                )))
            }
        };
        Ok(self)
    }

    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Write an aggregated dataset in long format; returns the number of rows
    pub fn write_dataset(&self, dataset: &AggregatedDataset, path: &Path) -> Result<usize> {
        let records = PointRecord::from_dataset(dataset);
        self.write_records(&records, path)?;
        Ok(records.len())
    }

    pub fn write_records(&self, records: &[PointRecord], path: &Path) -> Result<()> {
        let schema = self.create_schema();
        let batch = self.records_to_batch(records, schema.clone())?;

        let file = File::create(path)?;
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build();

        let mut writer = ArrowWriter::try_new(file, schema, Some(props))?;
        if batch.num_rows() > 0 {
            writer.write(&batch)?;
        }
        writer.close()?;

        Ok(())
    }

    fn create_schema(&self) -> Arc<Schema> {
        let fields = vec![
            Field::new("element", DataType::Utf8, false),
            Field::new("period", DataType::Utf8, false),
            Field::new("year", DataType::Int32, false),
            Field::new("season", DataType::Utf8, true),
            Field::new("value", DataType::Float64, true),
        ];

        Arc::new(Schema::new(fields))
    }

    fn records_to_batch(&self, records: &[PointRecord], schema: Arc<Schema>) -> Result<RecordBatch> {
        let elements: Vec<&str> = records.iter().map(|r| r.element.code()).collect();
        let periods: Vec<&str> = records.iter().map(|r| r.period.as_str()).collect();
        let years: Vec<i32> = records.iter().map(|r| r.year).collect();
        let seasons: Vec<Option<&str>> = records
            .iter()
            .map(|r| r.season.as_ref().map(Season::as_str))
            .collect();
        let values: Vec<Option<f64>> = records.iter().map(|r| r.value).collect();

        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(StringArray::from(elements)) as ArrayRef,
                Arc::new(StringArray::from(periods)),
                Arc::new(Int32Array::from(years)),
                Arc::new(StringArray::from(seasons)),
                Arc::new(Float64Array::from(values)),
            ],
        )?;

        Ok(batch)
    }

    /// Read back up to `limit` points (0 = all)
    pub fn read_points(&self, path: &Path, limit: usize) -> Result<Vec<PointRecord>> {
        use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

        let file = File::open(path)?;
        let parquet_reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;
        let limit = if limit == 0 { usize::MAX } else { limit };

        let mut records = Vec::new();

        for batch_result in parquet_reader {
            let batch = batch_result?;

            let elements = string_column(&batch, "element")?;
            let periods = string_column(&batch, "period")?;
            let seasons = string_column(&batch, "season")?;
            let years = batch
                .column_by_name("year")
                .and_then(|c| c.as_any().downcast_ref::<Int32Array>())
                .ok_or_else(|| ProcessingError::Config("Invalid year column type".to_string()))?;
            let values = batch
                .column_by_name("value")
                .and_then(|c| c.as_any().downcast_ref::<Float64Array>())
                .ok_or_else(|| ProcessingError::Config("Invalid value column type".to_string()))?;

            for i in 0..batch.num_rows() {
                if records.len() >= limit {
                    return Ok(records);
                }

                let season = if seasons.is_null(i) {
                    None
                } else {
                    Some(seasons.value(i).parse::<Season>()?)
                };

                records.push(PointRecord {
                    element: Element::parse(elements.value(i)),
                    period: periods.value(i).to_string(),
                    year: years.value(i),
                    season,
                    value: (!values.is_null(i)).then(|| values.value(i)),
                });
            }
        }

        Ok(records)
    }

    /// Get file statistics
    pub fn get_file_info(&self, path: &Path) -> Result<ParquetFileInfo> {
        use parquet::file::reader::{FileReader, SerializedFileReader};

        let file = File::open(path)?;
        let reader = SerializedFileReader::new(file)?;
        let metadata = reader.metadata();

        let file_metadata = metadata.file_metadata();
        let row_groups = metadata.num_row_groups();
        let total_rows = file_metadata.num_rows();
        let file_size = std::fs::metadata(path)?.len();

        let row_group_sizes = (0..row_groups)
            .map(|i| metadata.row_group(i).num_rows())
            .collect();

        Ok(ParquetFileInfo {
            total_rows,
            row_groups: row_groups as i32,
            row_group_sizes,
            file_size,
            compression: self.compression,
        })
    }
}

fn string_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a StringArray> {
    batch
        .column_by_name(name)
        .and_then(|c| c.as_any().downcast_ref::<StringArray>())
        .ok_or_else(|| ProcessingError::Config(format!("Invalid {} column type", name)))
}

impl Default for ParquetWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct ParquetFileInfo {
    pub total_rows: i64,
    pub row_groups: i32,
    pub row_group_sizes: Vec<i64>,
    pub file_size: u64,
    pub compression: Compression,
}

impl ParquetFileInfo {
    pub fn summary(&self) -> String {
        let avg_rows = if self.row_groups > 0 {
            self.total_rows as f64 / self.row_groups as f64
        } else {
            0.0
        };

        format!(
            "Parquet File Summary:\n\
            - Total rows: {}\n\
            - Row groups: {}\n\
            - File size: {:.2} KB\n\
            - Compression: {:?}\n\
            - Avg rows per group: {:.0}",
            self.total_rows,
            self.row_groups,
            self.file_size as f64 / 1024.0,
            self.compression,
            avg_rows
        )
    }
}
