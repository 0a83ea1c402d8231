use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{ProcessingError, Result};
use crate::models::{Hemisphere, Location, YearRange};
use crate::utils::constants::{
    COMPRESSION_GZIP, COMPRESSION_LZ4, COMPRESSION_NONE, COMPRESSION_SNAPPY, COMPRESSION_ZSTD,
    DEFAULT_CONFIG_FILE, DEFAULT_OUTPUT_DIR, ENV_PREFIX,
};

const COMPRESSIONS: [&str; 5] = [
    COMPRESSION_SNAPPY,
    COMPRESSION_GZIP,
    COMPRESSION_LZ4,
    COMPRESSION_ZSTD,
    COMPRESSION_NONE,
];

/// Runtime settings, layered as defaults < config file < `GHCND_*` environment.
/// Command-line flags override these in the command layer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Station latitude, decimal or `D:M:S` with optional N/S suffix
    pub latitude: Option<String>,
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
    pub output_dir: PathBuf,
    pub compression: String,
    pub dense: bool,
    pub quality_filter: bool,
    pub use_mmap: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            latitude: None,
            start_year: None,
            end_year: None,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            compression: COMPRESSION_SNAPPY.to_string(),
            dense: false,
            quality_filter: false,
            use_mmap: false,
        }
    }
}

impl Settings {
    /// Load settings; an explicit `path` must exist, the default file is optional
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_prefix(path, ENV_PREFIX)
    }

    pub fn load_with_prefix(path: Option<&Path>, env_prefix: &str) -> Result<Self> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::from(Path::new(DEFAULT_CONFIG_FILE)).required(false),
        };

        let settings: Settings = Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix(env_prefix).try_parsing(true))
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        debug!("Loaded settings: {:?}", settings);
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if !COMPRESSIONS.contains(&self.compression.to_lowercase().as_str()) {
            return Err(ProcessingError::Config(format!(
                "Unsupported compression: {}",
                self.compression
            )));
        }
        if let Some(latitude) = &self.latitude {
            Location::from_latitude_str(latitude)?;
        }
        self.year_range()?;
        Ok(())
    }

    /// Hemisphere of the configured latitude, if any
    pub fn hemisphere(&self) -> Result<Option<Hemisphere>> {
        self.latitude
            .as_deref()
            .map(|lat| Location::from_latitude_str(lat).map(|location| location.hemisphere()))
            .transpose()
    }

    pub fn year_range(&self) -> Result<Option<YearRange>> {
        YearRange::from_bounds(self.start_year, self.end_year)
    }
}
