use serde::{Deserialize, Serialize};
use validator::Validate;

use super::Hemisphere;
use crate::error::{ProcessingError, Result};
use crate::utils::parse_coordinate;

/// Coordinate selected by the user; decides the season naming
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Validate)]
pub struct Location {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        let location = Self {
            latitude,
            longitude,
        };
        location.validate()?;
        Ok(location)
    }

    /// Location from a latitude string (decimal or `D:M:S`, optional `N`/`S`);
    /// the longitude does not affect season naming and is left at 0
    pub fn from_latitude_str(latitude: &str) -> Result<Self> {
        Self::new(parse_coordinate(latitude)?, 0.0)
    }

    pub fn hemisphere(&self) -> Hemisphere {
        Hemisphere::from_latitude(self.latitude)
    }
}

/// Inclusive range of calendar years
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct YearRange {
    #[validate(range(min = 1700, max = 2200))]
    pub start: i32,

    #[validate(range(min = 1700, max = 2200))]
    pub end: i32,
}

impl YearRange {
    pub fn new(start: i32, end: i32) -> Result<Self> {
        if start > end {
            return Err(ProcessingError::InvalidYearRange { start, end });
        }

        let range = Self { start, end };
        range.validate()?;
        Ok(range)
    }

    /// Build a range from optional bounds, open ends taking the given defaults
    pub fn from_bounds(start: Option<i32>, end: Option<i32>) -> Result<Option<Self>> {
        match (start, end) {
            (None, None) => Ok(None),
            (start, end) => Self::new(start.unwrap_or(1700), end.unwrap_or(2200)).map(Some),
        }
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.start..=self.end).contains(&year)
    }
}
