pub mod analyzers;
pub mod cli;
pub mod error;
pub mod models;
pub mod processors;
pub mod readers;
pub mod settings;
pub mod utils;
pub mod writers;

pub use error::{ProcessingError, Result};
pub use models::{AggregatedDataset, AnnualPoint, Hemisphere, RawReading, Season, SeasonalPoint};
pub use processors::{aggregate, fill_missing_years};
