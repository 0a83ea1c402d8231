pub mod aggregator;
pub mod gap_filler;
pub mod integrity_checker;
pub mod station_processor;
pub mod year_filter;

pub use aggregator::{aggregate, count_by_year, season_of, season_year, TemporalAggregator};
pub use gap_filler::{fill_dataset, fill_missing_years, year_span};
pub use integrity_checker::{IntegrityChecker, IntegrityReport};
pub use station_processor::{BatchProcessor, StationProcessor, StationResult};
pub use year_filter::filter_years;
