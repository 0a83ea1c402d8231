use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::constants::{ELEMENT_TMAX, ELEMENT_TMIN, MAX_PLAUSIBLE_TEMP, MIN_PLAUSIBLE_TEMP};

/// Measured element of a daily reading
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Element {
    Tmin,
    Tmax,
    /// Any other GHCN element (PRCP, SNOW, TAVG, ...). Never aggregated.
    Other(String),
}

impl Element {
    pub fn parse(code: &str) -> Self {
        match code.trim() {
            ELEMENT_TMIN => Element::Tmin,
            ELEMENT_TMAX => Element::Tmax,
            other => Element::Other(other.to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Element::Tmin => ELEMENT_TMIN,
            Element::Tmax => ELEMENT_TMAX,
            Element::Other(code) => code,
        }
    }

    pub fn is_temperature(&self) -> bool {
        matches!(self, Element::Tmin | Element::Tmax)
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A single daily reading as delivered by the weather-data provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawReading {
    pub date: NaiveDate,
    pub element: Element,
    /// Tenths of a degree Celsius
    pub value: i32,
}

impl RawReading {
    pub fn new(date: NaiveDate, element: Element, value: i32) -> Self {
        Self {
            date,
            element,
            value,
        }
    }

    pub fn tmin(date: NaiveDate, value: i32) -> Self {
        Self::new(date, Element::Tmin, value)
    }

    pub fn tmax(date: NaiveDate, value: i32) -> Self {
        Self::new(date, Element::Tmax, value)
    }

    /// Value converted from tenths to whole degrees Celsius
    pub fn celsius(&self) -> f64 {
        self.value as f64 / 10.0
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    pub fn is_plausible(&self) -> bool {
        (MIN_PLAUSIBLE_TEMP..=MAX_PLAUSIBLE_TEMP).contains(&self.celsius())
    }
}
