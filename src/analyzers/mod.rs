pub mod series_builder;

pub use series_builder::{
    ChartSeries, DataTable, Measure, SeriesBuilder, SeriesName, SeriesSelection, TableRow,
};
