use chrono::NaiveDate;
use ghcnd_explorer::analyzers::{SeriesBuilder, SeriesSelection};
use ghcnd_explorer::models::{AnnualPoint, Element, Hemisphere, Location, RawReading, Season, YearRange};
use ghcnd_explorer::processors::{aggregate, count_by_year, fill_missing_years, StationProcessor};
use ghcnd_explorer::readers::{InputFormat, ProviderReader, ReaderOptions};
use ghcnd_explorer::writers::{JsonWriter, ParquetWriter};
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;
use validator::Validate;

const REFERENCE_PAYLOAD: &str = r#"[
    {"DATE": "20000115", "ELEMENT": "TMIN", "VALUE": "50"},
    {"DATE": "20000115", "ELEMENT": "TMAX", "VALUE": "150"},
    {"DATE": "20010115", "ELEMENT": "TMIN", "VALUE": "60"}
]"#;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_reference_payload_end_to_end() {
    let parsed = ProviderReader::new().parse_str(REFERENCE_PAYLOAD).unwrap();
    let dataset = aggregate(&parsed.readings, Hemisphere::Northern);

    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let output_path = temp_dir.path().join("aggregate.json");
    JsonWriter::new().write_dataset(&dataset, &output_path).unwrap();

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output_path).unwrap()).unwrap();

    assert_eq!(
        written["annualTmin"],
        json!([{"year": 2000, "value": 5.0}, {"year": 2001, "value": 6.0}])
    );
    assert_eq!(written["annualTmax"], json!([{"year": 2000, "value": 15.0}]));
    assert_eq!(
        written["seasonalTmin"],
        json!([
            {"year": 2000, "season": "Winter", "value": 5.0},
            {"year": 2001, "season": "Winter", "value": 6.0}
        ])
    );
}

#[test]
fn test_fill_scenario() {
    let series = vec![AnnualPoint::new(2000, 10.0), AnnualPoint::new(2002, 20.0)];
    let filled = fill_missing_years(&series, 2000, 2003);

    assert_eq!(
        serde_json::to_value(&filled).unwrap(),
        json!([
            {"year": 2000, "value": 10.0},
            {"year": 2001, "value": null},
            {"year": 2002, "value": 20.0},
            {"year": 2003, "value": null}
        ])
    );
}

#[test]
fn test_december_rolls_into_next_season_year() {
    let readings = vec![RawReading::tmax(date(1999, 12, 31), 250)];

    let north = aggregate(&readings, Hemisphere::Northern);
    assert_eq!(north.seasonal_tmax[0].year, 2000);
    assert_eq!(north.seasonal_tmax[0].season, Season::Winter);
    assert_eq!(north.annual_tmax, vec![AnnualPoint::new(1999, 25.0)]);

    let south = aggregate(&readings, Hemisphere::Southern);
    assert_eq!(south.seasonal_tmax[0].year, 2000);
    assert_eq!(south.seasonal_tmax[0].season, Season::Summer);
}

#[test]
fn test_annual_counts_cover_every_reading() {
    let readings: Vec<RawReading> = (1..=28)
        .flat_map(|day| {
            vec![
                RawReading::tmin(date(2010 + (day % 3) as i32, 2, day), day as i32),
                RawReading::tmax(date(2010, 6, day), 300),
            ]
        })
        .collect();

    let tmin_counts = count_by_year(&readings, &Element::Tmin);
    assert_eq!(tmin_counts.values().sum::<usize>(), 28);

    let dataset = aggregate(&readings, Hemisphere::Northern);
    let years: Vec<i32> = dataset.annual_tmin.iter().map(|p| p.year).collect();
    assert_eq!(years, tmin_counts.keys().copied().collect::<Vec<_>>());
    assert_eq!(aggregate(&readings, Hemisphere::Northern), dataset);
}

#[test]
fn test_dly_station_to_parquet() {
    let mut tmin = format!("{:<11}{:04}{:02}{:<4}", "ASN00066062", 2020, 7, "TMIN");
    let mut tmax = format!("{:<11}{:04}{:02}{:<4}", "ASN00066062", 2020, 7, "TMAX");
    for day in 1..=31 {
        tmin.push_str(&format!("{:>5}  a", if day <= 2 { 80 } else { -9999 }));
        tmax.push_str(&format!("{:>5}  a", if day <= 2 { 180 } else { -9999 }));
    }

    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("ASN00066062.dly");
    std::fs::write(&input, format!("{}\n{}\n", tmin, tmax)).unwrap();

    let location = Location::new(-33.8607, 151.205).unwrap();
    assert!(location.validate().is_ok());

    let processor = StationProcessor::new(location.hemisphere())
        .with_year_range(Some(YearRange::new(2000, 2030).unwrap()))
        .with_reader_options(ReaderOptions {
            quality_filter: true,
            use_mmap: true,
        });
    let result = processor.process_file(&input, Some(InputFormat::Dly)).unwrap();

    assert_eq!(result.station_id, "ASN00066062");
    assert_eq!(result.parse_report.accepted, 4);
    assert_eq!(result.dataset.seasonal_tmin[0].season, Season::Winter);
    assert_eq!(result.dataset.annual_tmax, vec![AnnualPoint::new(2020, 18.0)]);

    let output_path = temp_dir.path().join("ASN00066062.parquet");
    let writer = ParquetWriter::new().with_compression("zstd").unwrap();
    let rows = writer.write_dataset(&result.dataset, &output_path).unwrap();
    assert_eq!(rows, 4);

    let file_info = writer.get_file_info(&output_path).unwrap();
    assert_eq!(file_info.total_rows, 4);
}

#[test]
fn test_tables_for_selected_series() {
    let parsed = ProviderReader::new().parse_str(REFERENCE_PAYLOAD).unwrap();
    let dataset = aggregate(&parsed.readings, Hemisphere::Northern);
    let selection = SeriesSelection::parse_list("Annual TMAX, Annual TMIN").unwrap();

    let table = SeriesBuilder::annual_table(&dataset, &selection).unwrap();
    assert_eq!(table.columns, vec!["Annual TMIN", "Annual TMAX"]);
    assert_eq!(table.rows[1].cells, vec![Some(6.0), None]);
    assert!(SeriesBuilder::seasonal_table(&dataset, &selection).is_none());
}
