use chrono::NaiveDate;
use std::collections::HashMap;

use crate::models::{Element, RawReading};
use crate::utils::constants::{
    DEFAULT_MAX_LISTED_VIOLATIONS, MAX_PLAUSIBLE_TEMP, MIN_PLAUSIBLE_TEMP,
};

#[derive(Debug, Clone, Default)]
pub struct IntegrityReport {
    pub total_readings: usize,
    pub tmin_readings: usize,
    pub tmax_readings: usize,
    pub other_readings: usize,
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub violations: Vec<TemperatureViolation>,
}

impl IntegrityReport {
    pub fn temperature_readings(&self) -> usize {
        self.tmin_readings + self.tmax_readings
    }

    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct TemperatureViolation {
    pub date: NaiveDate,
    pub violation_type: ViolationType,
    pub details: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationType {
    OutOfRange,
    MinGreaterThanMax,
}

/// Reports implausible readings without removing them; the aggregator
/// still averages whatever the provider delivered
pub struct IntegrityChecker {
    max_listed: usize,
}

impl IntegrityChecker {
    pub fn new() -> Self {
        Self {
            max_listed: DEFAULT_MAX_LISTED_VIOLATIONS,
        }
    }

    pub fn with_max_listed(mut self, max_listed: usize) -> Self {
        self.max_listed = max_listed;
        self
    }

    pub fn check(&self, readings: &[RawReading]) -> IntegrityReport {
        let mut report = IntegrityReport {
            total_readings: readings.len(),
            ..Default::default()
        };

        // Same-day TMIN/TMAX pairs for the inversion check
        let mut daily: HashMap<NaiveDate, (Option<f64>, Option<f64>)> = HashMap::new();

        for reading in readings {
            match reading.element {
                Element::Tmin => {
                    report.tmin_readings += 1;
                    daily.entry(reading.date).or_default().0 = Some(reading.celsius());
                }
                Element::Tmax => {
                    report.tmax_readings += 1;
                    daily.entry(reading.date).or_default().1 = Some(reading.celsius());
                }
                Element::Other(_) => {
                    report.other_readings += 1;
                    continue;
                }
            }

            report.date_range = Some(match report.date_range {
                None => (reading.date, reading.date),
                Some((lo, hi)) => (lo.min(reading.date), hi.max(reading.date)),
            });

            if !reading.is_plausible() {
                report.violations.push(TemperatureViolation {
                    date: reading.date,
                    violation_type: ViolationType::OutOfRange,
                    details: format!(
                        "{} value {:.1}°C is outside plausible range [{}, {}]",
                        reading.element,
                        reading.celsius(),
                        MIN_PLAUSIBLE_TEMP,
                        MAX_PLAUSIBLE_TEMP
                    ),
                });
            }
        }

        let mut inversions: Vec<TemperatureViolation> = daily
            .into_iter()
            .filter_map(|(date, pair)| match pair {
                (Some(min), Some(max)) if min > max => Some(TemperatureViolation {
                    date,
                    violation_type: ViolationType::MinGreaterThanMax,
                    details: format!("TMIN {:.1}°C > TMAX {:.1}°C", min, max),
                }),
                _ => None,
            })
            .collect();
        inversions.sort_by_key(|v| v.date);
        report.violations.extend(inversions);

        report
    }

    /// Generate a summary report
    pub fn generate_summary(&self, report: &IntegrityReport) -> String {
        let mut summary = String::new();

        summary.push_str("=== Integrity Check Report ===\n");
        summary.push_str(&format!("Total Readings: {}\n", report.total_readings));
        summary.push_str(&format!("TMIN Readings: {}\n", report.tmin_readings));
        summary.push_str(&format!("TMAX Readings: {}\n", report.tmax_readings));
        summary.push_str(&format!(
            "Other Elements (ignored): {}\n",
            report.other_readings
        ));

        match report.date_range {
            Some((start, end)) => summary.push_str(&format!("Date Range: {} to {}\n", start, end)),
            None => summary.push_str("Date Range: no temperature readings\n"),
        }

        summary.push_str(&format!(
            "\nTemperature Violations: {}\n",
            report.violations.len()
        ));

        if !report.violations.is_empty() {
            let listed = report.violations.len().min(self.max_listed);
            summary.push_str(&format!("\nFirst {} Violations:\n", listed));
            for (i, violation) in report.violations.iter().take(self.max_listed).enumerate() {
                summary.push_str(&format!(
                    "  {}. {}: {}\n",
                    i + 1,
                    violation.date,
                    violation.details
                ));
            }
        }

        summary
    }
}

impl Default for IntegrityChecker {
    fn default() -> Self {
        Self::new()
    }
}
