use tracing::info;

use crate::models::{RawReading, YearRange};

/// Keep readings whose calendar year lies in the inclusive range
pub fn filter_years(readings: Vec<RawReading>, range: &YearRange) -> Vec<RawReading> {
    let before = readings.len();
    let filtered: Vec<RawReading> = readings
        .into_iter()
        .filter(|r| range.contains(r.year()))
        .collect();

    info!(
        "Filtered readings between {} and {}: {} of {} kept",
        range.start,
        range.end,
        filtered.len(),
        before
    );

    filtered
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_filter_years_is_inclusive() {
        let readings: Vec<RawReading> = (1998..=2004)
            .map(|y| RawReading::tmin(NaiveDate::from_ymd_opt(y, 6, 1).unwrap(), 100))
            .collect();

        let range = YearRange::new(2000, 2002).unwrap();
        let years: Vec<i32> = filter_years(readings, &range).iter().map(|r| r.year()).collect();
        assert_eq!(years, vec![2000, 2001, 2002]);
    }
}
