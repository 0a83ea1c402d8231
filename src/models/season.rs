use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ProcessingError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    /// Display order used for chart lines and table columns
    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Autumn, Season::Winter];

    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Autumn => "Autumn",
            Season::Winter => "Winter",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Season {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Spring" => Ok(Season::Spring),
            "Summer" => Ok(Season::Summer),
            "Autumn" => Ok(Season::Autumn),
            "Winter" => Ok(Season::Winter),
            other => Err(ProcessingError::InvalidFormat(format!(
                "Unknown season: '{}'",
                other
            ))),
        }
    }
}

/// Meteorological quarter of the year, independent of hemisphere.
///
/// Variants are declared in chronological order within a season-year:
/// the December quarter opens the season-year it is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Quarter {
    DecFeb,
    MarMay,
    JunAug,
    SepNov,
}

impl Quarter {
    pub fn from_month(month: u32) -> Self {
        match month {
            3..=5 => Quarter::MarMay,
            6..=8 => Quarter::JunAug,
            9..=11 => Quarter::SepNov,
            _ => Quarter::DecFeb,
        }
    }

    pub fn of(date: NaiveDate) -> Self {
        Self::from_month(date.month())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hemisphere {
    Northern,
    Southern,
}

impl Hemisphere {
    /// Latitude 0 (the equator) counts as northern
    pub fn from_latitude(latitude: f64) -> Self {
        if latitude >= 0.0 {
            Hemisphere::Northern
        } else {
            Hemisphere::Southern
        }
    }

    pub fn season(&self, quarter: Quarter) -> Season {
        match (self, quarter) {
            (Hemisphere::Northern, Quarter::DecFeb) => Season::Winter,
            (Hemisphere::Northern, Quarter::MarMay) => Season::Spring,
            (Hemisphere::Northern, Quarter::JunAug) => Season::Summer,
            (Hemisphere::Northern, Quarter::SepNov) => Season::Autumn,
            (Hemisphere::Southern, Quarter::DecFeb) => Season::Summer,
            (Hemisphere::Southern, Quarter::MarMay) => Season::Autumn,
            (Hemisphere::Southern, Quarter::JunAug) => Season::Winter,
            (Hemisphere::Southern, Quarter::SepNov) => Season::Spring,
        }
    }
}

impl fmt::Display for Hemisphere {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Hemisphere::Northern => f.write_str("northern"),
            Hemisphere::Southern => f.write_str("southern"),
        }
    }
}
