use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ghcnd_explorer::analyzers::{SeriesBuilder, SeriesSelection};
use ghcnd_explorer::models::{Hemisphere, RawReading};
use ghcnd_explorer::processors::{aggregate, fill_missing_years, IntegrityChecker};
use ghcnd_explorer::readers::ProviderReader;
use ghcnd_explorer::utils::coordinates::dms_to_decimal;

// One TMIN and one TMAX reading per day
fn create_test_readings(years: i32) -> Vec<RawReading> {
    let start = NaiveDate::from_ymd_opt(1950, 1, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(1950 + years, 1, 1).unwrap();

    let mut readings = Vec::new();
    for (day, date) in start.iter_days().take_while(|d| *d < end).enumerate() {
        let base = 100 + ((day % 365) as i32 - 182).abs() / 2;
        readings.push(RawReading::tmin(date, base - 60));
        readings.push(RawReading::tmax(date, base + 60));
    }
    readings
}

fn create_provider_payload(years: i32) -> String {
    let records: Vec<String> = create_test_readings(years)
        .iter()
        .map(|r| {
            format!(
                r#"{{"DATE":"{}","ELEMENT":"{}","VALUE":"{}"}}"#,
                r.date.format("%Y%m%d"),
                r.element,
                r.value
            )
        })
        .collect();
    format!("[{}]", records.join(","))
}

fn benchmark_aggregate(c: &mut Criterion) {
    let readings = create_test_readings(30);

    c.bench_function("aggregate_30_years", |b| {
        b.iter(|| {
            let dataset = aggregate(black_box(&readings), Hemisphere::Northern);
            black_box(dataset.total_points())
        })
    });
}

fn benchmark_provider_parsing(c: &mut Criterion) {
    let payload = create_provider_payload(10);

    c.bench_function("provider_parse_10_years", |b| {
        b.iter(|| {
            let parsed = ProviderReader::new().parse_str(black_box(&payload));
            black_box(parsed.map(|p| p.readings.len()).unwrap_or(0))
        })
    });
}

fn benchmark_integrity_checker(c: &mut Criterion) {
    let readings = create_test_readings(10);

    c.bench_function("integrity_checker", |b| {
        b.iter(|| {
            let report = IntegrityChecker::new().check(black_box(&readings));
            black_box(report.total_readings)
        })
    });
}

fn benchmark_series_shaping(c: &mut Criterion) {
    let dataset = aggregate(&create_test_readings(50), Hemisphere::Southern);
    let selection = SeriesSelection::all();

    c.bench_function("chart_series_dense", |b| {
        b.iter(|| {
            let series = SeriesBuilder::chart_series(black_box(&dataset), &selection, true);
            black_box(series.len())
        })
    });

    c.bench_function("fill_missing_years", |b| {
        b.iter(|| black_box(fill_missing_years(&dataset.annual_tmin, 1800, 2100).len()))
    });
}

fn benchmark_coordinate_conversion(c: &mut Criterion) {
    let dms_coordinates = vec!["51:30:15", "-33:52:04", "40:46:45", "64:08:00", "-1:17:00"];

    c.bench_function("coordinate_conversion", |b| {
        b.iter(|| {
            let mut results = Vec::new();
            for dms in &dms_coordinates {
                if let Ok(decimal) = dms_to_decimal(dms) {
                    results.push(decimal);
                }
            }
            black_box(results.len())
        })
    });
}

fn benchmark_varying_data_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate_by_years");

    for &years in &[1, 10, 50, 100] {
        group.bench_with_input(BenchmarkId::new("years", years), &years, |b, &years| {
            let readings = create_test_readings(years);
            b.iter(|| black_box(aggregate(&readings, Hemisphere::Northern).total_points()))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    benchmark_aggregate,
    benchmark_provider_parsing,
    benchmark_integrity_checker,
    benchmark_series_shaping,
    benchmark_coordinate_conversion,
    benchmark_varying_data_sizes
);
criterion_main!(benches);
