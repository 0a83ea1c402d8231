use serde::{Deserialize, Serialize};

use super::{Element, Season};

/// Mean value of one element across one calendar year.
///
/// `value` is `None` only for gap-filled years; the aggregator never emits it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnualPoint {
    pub year: i32,
    pub value: Option<f64>,
}

impl AnnualPoint {
    pub fn new(year: i32, value: f64) -> Self {
        Self {
            year,
            value: Some(value),
        }
    }

    pub fn missing(year: i32) -> Self {
        Self { year, value: None }
    }
}

/// Mean value of one element across one season of a season-year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeasonalPoint {
    pub year: i32,
    pub season: Season,
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedDataset {
    pub annual_tmin: Vec<AnnualPoint>,
    pub annual_tmax: Vec<AnnualPoint>,
    pub seasonal_tmin: Vec<SeasonalPoint>,
    pub seasonal_tmax: Vec<SeasonalPoint>,
}

impl AggregatedDataset {
    pub fn is_empty(&self) -> bool {
        self.annual_tmin.is_empty()
            && self.annual_tmax.is_empty()
            && self.seasonal_tmin.is_empty()
            && self.seasonal_tmax.is_empty()
    }

    /// Annual series for a temperature element; empty for any other element
    pub fn annual(&self, element: &Element) -> &[AnnualPoint] {
        match element {
            Element::Tmin => &self.annual_tmin,
            Element::Tmax => &self.annual_tmax,
            Element::Other(_) => &[],
        }
    }

    pub fn seasonal(&self, element: &Element) -> &[SeasonalPoint] {
        match element {
            Element::Tmin => &self.seasonal_tmin,
            Element::Tmax => &self.seasonal_tmax,
            Element::Other(_) => &[],
        }
    }

    /// Smallest and largest year across all four series
    pub fn year_span(&self) -> Option<(i32, i32)> {
        let seasonal_years = self.seasonal_tmin.iter().chain(&self.seasonal_tmax).map(|p| p.year);
        span_of(self.annual_years().chain(seasonal_years))
    }

    /// Smallest and largest calendar year of the annual series. December
    /// season-years can run one past this.
    pub fn annual_year_span(&self) -> Option<(i32, i32)> {
        span_of(self.annual_years())
    }

    fn annual_years(&self) -> impl Iterator<Item = i32> + '_ {
        self.annual_tmin.iter().chain(&self.annual_tmax).map(|p| p.year)
    }

    pub fn total_points(&self) -> usize {
        self.annual_tmin.len()
            + self.annual_tmax.len()
            + self.seasonal_tmin.len()
            + self.seasonal_tmax.len()
    }
}

fn span_of(years: impl Iterator<Item = i32>) -> Option<(i32, i32)> {
    years.fold(None, |span, year| match span {
        None => Some((year, year)),
        Some((lo, hi)) => Some((lo.min(year), hi.max(year))),
    })
}
