use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use crate::error::ProcessingError;
use crate::models::{AggregatedDataset, AnnualPoint, Season, SeasonalPoint};
use crate::processors::fill_missing_years;
use crate::utils::constants::{ANNUAL_PREFIX, ELEMENT_TMAX, ELEMENT_TMIN};

/// Temperature element a series is drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Measure {
    Tmin,
    Tmax,
}

impl Measure {
    pub const ALL: [Measure; 2] = [Measure::Tmin, Measure::Tmax];

    pub fn code(&self) -> &'static str {
        match self {
            Measure::Tmin => ELEMENT_TMIN,
            Measure::Tmax => ELEMENT_TMAX,
        }
    }

    fn annual<'a>(&self, dataset: &'a AggregatedDataset) -> &'a [AnnualPoint] {
        match self {
            Measure::Tmin => &dataset.annual_tmin,
            Measure::Tmax => &dataset.annual_tmax,
        }
    }

    fn seasonal<'a>(&self, dataset: &'a AggregatedDataset) -> &'a [SeasonalPoint] {
        match self {
            Measure::Tmin => &dataset.seasonal_tmin,
            Measure::Tmax => &dataset.seasonal_tmax,
        }
    }
}

impl FromStr for Measure {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ELEMENT_TMIN => Ok(Measure::Tmin),
            ELEMENT_TMAX => Ok(Measure::Tmax),
            other => Err(ProcessingError::UnknownSeries(other.to_string())),
        }
    }
}

/// Visible series name as shown in the chart legend and table headers,
/// e.g. `Annual TMIN` or `TMAX Winter`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SeriesName {
    Annual(Measure),
    Seasonal(Measure, Season),
}

impl SeriesName {
    pub fn all() -> Vec<SeriesName> {
        let annual = Measure::ALL.into_iter().map(SeriesName::Annual);
        let seasonal = Measure::ALL.into_iter().flat_map(|measure| {
            Season::ALL
                .into_iter()
                .map(move |season| SeriesName::Seasonal(measure, season))
        });
        annual.chain(seasonal).collect()
    }

    pub fn is_annual(&self) -> bool {
        matches!(self, SeriesName::Annual(_))
    }

    /// Points of this series, with seasonal years being season-years
    pub fn points(&self, dataset: &AggregatedDataset) -> Vec<AnnualPoint> {
        match *self {
            SeriesName::Annual(measure) => measure.annual(dataset).to_vec(),
            SeriesName::Seasonal(measure, season) => measure
                .seasonal(dataset)
                .iter()
                .filter(|p| p.season == season)
                .map(|p| AnnualPoint::new(p.year, p.value))
                .collect(),
        }
    }
}

impl fmt::Display for SeriesName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeriesName::Annual(measure) => write!(f, "{} {}", ANNUAL_PREFIX, measure.code()),
            SeriesName::Seasonal(measure, season) => write!(f, "{} {}", measure.code(), season),
        }
    }
}

impl FromStr for SeriesName {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || ProcessingError::UnknownSeries(s.trim().to_string());
        let mut parts = s.split_whitespace();

        let (Some(first), Some(second), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(unknown());
        };

        if first == ANNUAL_PREFIX {
            return second.parse().map(SeriesName::Annual).map_err(|_| unknown());
        }

        let measure: Measure = first.parse().map_err(|_| unknown())?;
        let season: Season = second.parse().map_err(|_| unknown())?;
        Ok(SeriesName::Seasonal(measure, season))
    }
}

/// Set of visible series; iteration follows the legend order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesSelection {
    visible: BTreeSet<SeriesName>,
}

impl SeriesSelection {
    pub fn all() -> Self {
        Self {
            visible: SeriesName::all().into_iter().collect(),
        }
    }

    pub fn none() -> Self {
        Self {
            visible: BTreeSet::new(),
        }
    }

    /// Parse a comma-separated list such as `Annual TMIN, TMAX Summer`
    pub fn parse_list(list: &str) -> Result<Self, ProcessingError> {
        let visible = list
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::parse)
            .collect::<Result<BTreeSet<SeriesName>, _>>()?;
        Ok(Self { visible })
    }

    pub fn show(&mut self, name: SeriesName) {
        self.visible.insert(name);
    }

    pub fn hide(&mut self, name: SeriesName) {
        self.visible.remove(&name);
    }

    pub fn is_visible(&self, name: &SeriesName) -> bool {
        self.visible.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SeriesName> {
        self.visible.iter()
    }

    fn annual(&self) -> Vec<SeriesName> {
        self.visible.iter().copied().filter(SeriesName::is_annual).collect()
    }

    fn seasonal(&self) -> Vec<SeriesName> {
        self.visible.iter().copied().filter(|s| !s.is_annual()).collect()
    }
}

impl Default for SeriesSelection {
    fn default() -> Self {
        Self::all()
    }
}

/// One chart line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub name: String,
    pub points: Vec<AnnualPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub year: i32,
    pub cells: Vec<Option<f64>>,
}

/// Year-keyed table with one column per visible series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataTable {
    pub columns: Vec<String>,
    pub rows: Vec<TableRow>,
}

impl DataTable {
    /// Plain-text rendering with two decimals; missing cells stay blank
    pub fn render(&self) -> String {
        let headers: Vec<&str> = std::iter::once("Year")
            .chain(self.columns.iter().map(String::as_str))
            .collect();

        let body: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| {
                std::iter::once(row.year.to_string())
                    .chain(row.cells.iter().map(|cell| format_cell(*cell)))
                    .collect()
            })
            .collect();

        let widths: Vec<usize> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| {
                body.iter()
                    .map(|row| row[i].len())
                    .chain(std::iter::once(h.len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut out = String::new();
        let header_line: Vec<String> = headers
            .iter()
            .zip(&widths)
            .map(|(h, w)| format!("{:>w$}", h, w = *w))
            .collect();
        out.push_str(header_line.join("  ").trim_end());
        out.push('\n');

        for row in &body {
            let line: Vec<String> = row
                .iter()
                .zip(&widths)
                .map(|(cell, w)| format!("{:>w$}", cell, w = *w))
                .collect();
            out.push_str(line.join("  ").trim_end());
            out.push('\n');
        }

        out
    }
}

pub fn format_cell(cell: Option<f64>) -> String {
    cell.map(|v| format!("{:.2}", v)).unwrap_or_default()
}

/// Shapes an aggregated dataset into chart lines and year-keyed tables
pub struct SeriesBuilder;

impl SeriesBuilder {
    /// Chart lines in legend order. With `dense`, every line covers the
    /// dataset's full year span with `None` marking absent years.
    pub fn chart_series(
        dataset: &AggregatedDataset,
        selection: &SeriesSelection,
        dense: bool,
    ) -> Vec<ChartSeries> {
        let span = dataset.year_span();

        selection
            .iter()
            .map(|name| {
                let points = name.points(dataset);
                let points = match (dense, span) {
                    (true, Some((lo, hi))) => fill_missing_years(&points, lo, hi),
                    _ => points,
                };
                ChartSeries {
                    name: name.to_string(),
                    points,
                }
            })
            .filter(|series| !series.points.is_empty())
            .collect()
    }

    pub fn annual_table(dataset: &AggregatedDataset, selection: &SeriesSelection) -> Option<DataTable> {
        Self::table(dataset, &selection.annual())
    }

    /// Seasonal table keyed by season-year
    pub fn seasonal_table(dataset: &AggregatedDataset, selection: &SeriesSelection) -> Option<DataTable> {
        Self::table(dataset, &selection.seasonal())
    }

    fn table(dataset: &AggregatedDataset, series: &[SeriesName]) -> Option<DataTable> {
        if series.is_empty() {
            return None;
        }

        let mut rows: BTreeMap<i32, Vec<Option<f64>>> = BTreeMap::new();
        for (column, name) in series.iter().enumerate() {
            for point in name.points(dataset) {
                rows.entry(point.year).or_insert_with(|| vec![None; series.len()])[column] = point.value;
            }
        }

        Some(DataTable {
            columns: series.iter().map(ToString::to_string).collect(),
            rows: rows
                .into_iter()
                .map(|(year, cells)| TableRow { year, cells })
                .collect(),
        })
    }
}
