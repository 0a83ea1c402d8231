/// GHCN element codes
pub const ELEMENT_TMIN: &str = "TMIN";
pub const ELEMENT_TMAX: &str = "TMAX";

/// GHCN missing-value sentinel (tenths of a degree)
pub const MISSING_VALUE: i32 = -9999;

/// Plausible temperature range in degrees Celsius
pub const MIN_PLAUSIBLE_TEMP: f64 = -90.0;
pub const MAX_PLAUSIBLE_TEMP: f64 = 60.0;

/// `.dly` fixed-width layout
pub const DLY_MIN_LINE_LENGTH: usize = 269;
pub const DLY_FIRST_VALUE_OFFSET: usize = 21;
pub const DLY_DAY_WIDTH: usize = 8;
pub const DLY_VALUE_WIDTH: usize = 5;
pub const DLY_QFLAG_OFFSET: usize = 6;

/// Series names shown to the chart and table consumers
pub const ANNUAL_PREFIX: &str = "Annual";

/// Processing defaults
pub const DEFAULT_ROW_GROUP_SIZE: usize = 10000;
pub const DEFAULT_BUFFER_SIZE: usize = 8192 * 16; // 128KB
pub const DEFAULT_OUTPUT_DIR: &str = "output";
pub const DEFAULT_MAX_LISTED_VIOLATIONS: usize = 10;
pub const DEFAULT_CONFIG_FILE: &str = "ghcnd-explorer.toml";
pub const ENV_PREFIX: &str = "GHCND";

/// Parquet compression options
pub const COMPRESSION_SNAPPY: &str = "snappy";
pub const COMPRESSION_GZIP: &str = "gzip";
pub const COMPRESSION_LZ4: &str = "lz4";
pub const COMPRESSION_ZSTD: &str = "zstd";
pub const COMPRESSION_NONE: &str = "none";
