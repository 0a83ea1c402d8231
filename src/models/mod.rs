pub mod dataset;
pub mod location;
pub mod reading;
pub mod season;

pub use dataset::{AggregatedDataset, AnnualPoint, SeasonalPoint};
pub use location::{Location, YearRange};
pub use reading::{Element, RawReading};
pub use season::{Hemisphere, Quarter, Season};
