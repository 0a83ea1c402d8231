use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;
use tracing::debug;

use crate::models::{
    AggregatedDataset, AnnualPoint, Element, Hemisphere, Quarter, RawReading, Season,
    SeasonalPoint,
};

/// Season name of a date for the given hemisphere
pub fn season_of(date: NaiveDate, hemisphere: Hemisphere) -> Season {
    hemisphere.season(Quarter::of(date))
}

/// December rolls forward so a Dec-Feb season stays within one season-year
pub fn season_year(date: NaiveDate) -> i32 {
    if date.month() == 12 {
        date.year() + 1
    } else {
        date.year()
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct MeanAccumulator {
    sum: f64,
    count: usize,
}

impl MeanAccumulator {
    fn add(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn mean(&self) -> f64 {
        self.sum / self.count as f64
    }
}

/// Per-element buckets; BTreeMap keeps the output order deterministic
#[derive(Debug, Default)]
struct ElementBuckets {
    annual: BTreeMap<i32, MeanAccumulator>,
    seasonal: BTreeMap<(i32, Quarter), MeanAccumulator>,
}

impl ElementBuckets {
    fn add(&mut self, reading: &RawReading) {
        let value = reading.celsius();

        self.annual.entry(reading.year()).or_default().add(value);
        self.seasonal
            .entry((season_year(reading.date), Quarter::of(reading.date)))
            .or_default()
            .add(value);
    }

    fn annual_points(&self) -> Vec<AnnualPoint> {
        self.annual
            .iter()
            .map(|(&year, acc)| AnnualPoint::new(year, acc.mean()))
            .collect()
    }

    fn seasonal_points(&self, hemisphere: Hemisphere) -> Vec<SeasonalPoint> {
        self.seasonal
            .iter()
            .map(|(&(year, quarter), acc)| SeasonalPoint {
                year,
                season: hemisphere.season(quarter),
                value: acc.mean(),
            })
            .collect()
    }
}

/// Converts daily TMIN/TMAX readings into annual and seasonal mean series
#[derive(Debug, Clone, Copy)]
pub struct TemporalAggregator {
    hemisphere: Hemisphere,
}

impl TemporalAggregator {
    pub fn new(hemisphere: Hemisphere) -> Self {
        Self { hemisphere }
    }

    pub fn aggregate(&self, readings: &[RawReading]) -> AggregatedDataset {
        let mut tmin = ElementBuckets::default();
        let mut tmax = ElementBuckets::default();
        let mut ignored = 0usize;

        for reading in readings {
            match reading.element {
                Element::Tmin => tmin.add(reading),
                Element::Tmax => tmax.add(reading),
                Element::Other(_) => ignored += 1,
            }
        }

        let dataset = AggregatedDataset {
            annual_tmin: tmin.annual_points(),
            annual_tmax: tmax.annual_points(),
            seasonal_tmin: tmin.seasonal_points(self.hemisphere),
            seasonal_tmax: tmax.seasonal_points(self.hemisphere),
        };

        debug!(
            readings = readings.len(),
            ignored,
            hemisphere = %self.hemisphere,
            points = dataset.total_points(),
            "aggregated readings"
        );

        dataset
    }
}

/// Aggregate readings into annual and seasonal TMIN/TMAX means
pub fn aggregate(readings: &[RawReading], hemisphere: Hemisphere) -> AggregatedDataset {
    TemporalAggregator::new(hemisphere).aggregate(readings)
}

/// Number of readings per calendar year for one element
pub fn count_by_year(readings: &[RawReading], element: &Element) -> BTreeMap<i32, usize> {
    let mut counts = BTreeMap::new();
    for reading in readings.iter().filter(|r| &r.element == element) {
        *counts.entry(reading.year()).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_empty_input_yields_empty_series() {
        let dataset = aggregate(&[], Hemisphere::Northern);
        assert_eq!(dataset, AggregatedDataset::default());
        assert!(dataset.is_empty());
    }

    #[test]
    fn test_annual_means() {
        let readings = vec![
            RawReading::tmin(date(2000, 1, 15), 50),
            RawReading::tmax(date(2000, 1, 15), 150),
            RawReading::tmin(date(2001, 1, 15), 60),
        ];

        let dataset = aggregate(&readings, Hemisphere::Northern);
        assert_eq!(
            dataset.annual_tmin,
            vec![AnnualPoint::new(2000, 5.0), AnnualPoint::new(2001, 6.0)]
        );
        assert_eq!(dataset.annual_tmax, vec![AnnualPoint::new(2000, 15.0)]);
    }

    #[test]
    fn test_mean_is_taken_over_converted_values() {
        let readings = vec![
            RawReading::tmax(date(2010, 3, 1), 101),
            RawReading::tmax(date(2010, 6, 1), 203),
            RawReading::tmax(date(2010, 9, 1), -4),
        ];

        let dataset = aggregate(&readings, Hemisphere::Northern);
        let expected = (10.1 + 20.3 + -0.4) / 3.0;
        assert_eq!(dataset.annual_tmax[0].value, Some(expected));
    }

    #[test]
    fn test_other_elements_are_ignored() {
        let readings = vec![
            RawReading::new(date(2000, 5, 1), Element::Other("PRCP".to_string()), 120),
            RawReading::tmin(date(2000, 5, 1), 80),
        ];

        let dataset = aggregate(&readings, Hemisphere::Northern);
        assert_eq!(dataset.annual_tmin, vec![AnnualPoint::new(2000, 8.0)]);
        assert!(dataset.annual_tmax.is_empty());
        assert!(dataset.seasonal_tmax.is_empty());
    }

    #[test]
    fn test_december_rolls_into_next_season_year() {
        assert_eq!(season_year(date(2000, 12, 31)), 2001);
        assert_eq!(season_year(date(2001, 1, 1)), 2001);
        assert_eq!(season_year(date(2001, 11, 30)), 2001);

        assert_eq!(season_of(date(2000, 12, 10), Hemisphere::Northern), Season::Winter);
        assert_eq!(season_of(date(2000, 12, 10), Hemisphere::Southern), Season::Summer);
    }

    #[test]
    fn test_winter_spans_one_season_year() {
        let readings = vec![
            RawReading::tmin(date(2000, 12, 15), -20),
            RawReading::tmin(date(2001, 1, 15), -40),
            RawReading::tmin(date(2001, 2, 15), -30),
        ];

        let north = aggregate(&readings, Hemisphere::Northern);
        assert_eq!(
            north.seasonal_tmin,
            vec![SeasonalPoint {
                year: 2001,
                season: Season::Winter,
                value: (-2.0 + -4.0 + -3.0) / 3.0,
            }]
        );

        let south = aggregate(&readings, Hemisphere::Southern);
        assert_eq!(south.seasonal_tmin.len(), 1);
        assert_eq!(south.seasonal_tmin[0].year, 2001);
        assert_eq!(south.seasonal_tmin[0].season, Season::Summer);

        // Annual grouping still uses the calendar year
        assert_eq!(north.annual_tmin.len(), 2);
        assert_eq!(north.annual_tmin[0].year, 2000);
    }

    #[test]
    fn test_seasonal_order_is_chronological() {
        let readings = vec![
            RawReading::tmax(date(2001, 10, 1), 100),
            RawReading::tmax(date(2001, 7, 1), 250),
            RawReading::tmax(date(2001, 4, 1), 120),
            RawReading::tmax(date(2001, 1, 1), 20),
            RawReading::tmax(date(2000, 7, 1), 240),
        ];

        let seasons: Vec<(i32, Season)> = aggregate(&readings, Hemisphere::Southern)
            .seasonal_tmax
            .iter()
            .map(|p| (p.year, p.season))
            .collect();

        assert_eq!(
            seasons,
            vec![
                (2000, Season::Winter),
                (2001, Season::Summer),
                (2001, Season::Autumn),
                (2001, Season::Winter),
                (2001, Season::Spring),
            ]
        );
    }

    #[test]
    fn test_annual_counts_cover_every_reading() {
        let mut readings = Vec::new();
        for year in 1990..1995 {
            for month in [1, 4, 7, 12] {
                readings.push(RawReading::tmin(date(year, month, 3), year - 1990));
            }
        }
        readings.push(RawReading::tmax(date(1991, 8, 8), 300));

        let counts = count_by_year(&readings, &Element::Tmin);
        let dataset = aggregate(&readings, Hemisphere::Northern);

        assert_eq!(counts.values().sum::<usize>(), 20);
        assert_eq!(
            counts.keys().copied().collect::<Vec<_>>(),
            dataset.annual_tmin.iter().map(|p| p.year).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_aggregate_is_idempotent() {
        let readings: Vec<RawReading> = (0..365)
            .map(|day| {
                let d = date(2003, 1, 1) + chrono::Duration::days(day);
                RawReading::tmin(d, (day % 37) as i32 - 11)
            })
            .collect();

        let first = aggregate(&readings, Hemisphere::Northern);
        let second = aggregate(&readings, Hemisphere::Northern);

        let first_bits: Vec<u64> = first.seasonal_tmin.iter().map(|p| p.value.to_bits()).collect();
        let second_bits: Vec<u64> = second.seasonal_tmin.iter().map(|p| p.value.to_bits()).collect();
        assert_eq!(first, second);
        assert_eq!(first_bits, second_bits);
    }
}
