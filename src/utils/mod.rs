pub mod constants;
pub mod coordinates;
pub mod filename;
pub mod progress;

pub use constants::*;
pub use coordinates::{dms_to_decimal, parse_coordinate};
pub use filename::{station_from_path, with_stem_suffix, OutputNamer};
pub use progress::ProgressReporter;
