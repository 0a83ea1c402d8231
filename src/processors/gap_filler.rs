use std::collections::HashMap;

use crate::models::{AggregatedDataset, AnnualPoint};

/// Expand an annual series to one point per year in `[min_year, max_year]`.
///
/// Years absent from `series` get `value: None` so a chart shows a break
/// instead of interpolating across the gap. Points outside the range are
/// dropped; an inverted range yields an empty series.
pub fn fill_missing_years(series: &[AnnualPoint], min_year: i32, max_year: i32) -> Vec<AnnualPoint> {
    if min_year > max_year {
        return Vec::new();
    }

    let by_year: HashMap<i32, Option<f64>> = series.iter().map(|p| (p.year, p.value)).collect();

    (min_year..=max_year)
        .map(|year| AnnualPoint {
            year,
            value: by_year.get(&year).copied().flatten(),
        })
        .collect()
}

/// Year range spanned by a dataset, for callers wanting a dense series
pub fn year_span(dataset: &AggregatedDataset) -> Option<(i32, i32)> {
    dataset.year_span()
}

/// Copy of `dataset` whose annual series cover the calendar years of its
/// annual data; seasonal series are left as they are
pub fn fill_dataset(dataset: &AggregatedDataset) -> AggregatedDataset {
    let Some((lo, hi)) = dataset.annual_year_span() else {
        return dataset.clone();
    };

    AggregatedDataset {
        annual_tmin: fill_missing_years(&dataset.annual_tmin, lo, hi),
        annual_tmax: fill_missing_years(&dataset.annual_tmax, lo, hi),
        ..dataset.clone()
    }
}
