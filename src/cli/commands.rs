use crate::analyzers::{SeriesBuilder, SeriesSelection};
use crate::cli::args::{AggregateOptions, Cli, Commands, FormatArg, OutputFormat};
use crate::error::{ProcessingError, Result};
use crate::models::{Location, YearRange};
use crate::processors::{
    fill_dataset, BatchProcessor, IntegrityChecker, StationProcessor, StationResult,
};
use crate::readers::{read_readings, InputFormat, ReaderOptions};
use crate::settings::Settings;
use crate::utils::filename::{generate_output_filename_in, OutputNamer};
use crate::utils::progress::ProgressReporter;
use crate::writers::{CsvWriter, JsonWriter, ParquetWriter};
use std::path::{Path, PathBuf};
use tracing::{error, info};

pub fn run(cli: Cli, settings: Settings) -> Result<()> {
    match cli.command {
        Commands::Aggregate {
            input,
            format,
            options,
            output,
            output_format,
            compression,
        } => {
            println!("Aggregating station data...");
            println!("Input file: {}", input.display());

            let processor = build_processor(&options, &settings)?;
            let result = processor.process_file(&input, resolve_format(format))?;

            println!("\n{}", result.parse_report.summary());
            println!("\n{}", processor.checker().generate_summary(&result.integrity_report));

            if result.dataset.is_empty() {
                println!("No TMIN/TMAX readings to aggregate");
                return Ok(());
            }

            let output = output.unwrap_or_else(|| {
                generate_output_filename_in(
                    &settings.output_dir,
                    &result.station_id,
                    output_format.extension(),
                )
            });
            let compression = compression.unwrap_or_else(|| settings.compression.clone());
            let dense = options.dense || settings.dense;

            let written = write_result(&result, output_format, &output, &compression, dense)?;
            for path in &written {
                println!("Wrote {}", path.display());
            }

            if output_format == OutputFormat::Parquet {
                let file_info = ParquetWriter::new().get_file_info(&output)?;
                println!("\n{}", file_info.summary());
            }

            println!("Aggregation complete!");
        }

        Commands::AggregateDirectory {
            input_dir,
            options,
            output_dir,
            output_format,
            compression,
            max_workers,
        } => {
            println!("Aggregating station directory...");
            println!("Input directory: {}", input_dir.display());

            let files = BatchProcessor::discover_files(&input_dir)?;
            if files.is_empty() {
                println!("No station files found");
                return Ok(());
            }
            println!("Found {} station files, workers: {}", files.len(), max_workers);

            let processor = build_processor(&options, &settings)?;
            let output_dir = output_dir.unwrap_or_else(|| settings.output_dir.clone());
            let compression = compression.unwrap_or_else(|| settings.compression.clone());
            let dense = options.dense || settings.dense;

            let progress = ProgressReporter::new(files.len() as u64, "Aggregating stations...", false);
            let results = BatchProcessor::new(max_workers).process_files(&processor, &files, Some(&progress))?;
            progress.finish_with_message(&format!("Processed {} station files", results.len()));

            let (written, failed) =
                write_station_outputs(results, &output_dir, output_format, &compression, dense);

            println!("\nWrote {} station outputs to {}", written, output_dir.display());
            if failed > 0 {
                println!("⚠️  {} files failed", failed);
            }
        }

        Commands::Table {
            input,
            format,
            options,
            series,
        } => {
            let selection = match series {
                Some(list) => SeriesSelection::parse_list(&list)?,
                None => SeriesSelection::all(),
            };

            let processor = build_processor(&options, &settings)?;
            let result = processor.process_file(&input, resolve_format(format))?;
            let dataset = if options.dense || settings.dense {
                fill_dataset(&result.dataset)
            } else {
                result.dataset
            };

            let tables = [
                ("Annual means (°C)", SeriesBuilder::annual_table(&dataset, &selection)),
                ("Seasonal means (°C, by season-year)", SeriesBuilder::seasonal_table(&dataset, &selection)),
            ];

            for (title, table) in tables {
                if let Some(table) = table {
                    println!("{}:\n{}", title, table.render());
                }
            }
        }

        Commands::Validate {
            input,
            format,
            quality_filter,
        } => {
            println!("Validating station data...");
            println!("Input file: {}", input.display());

            let format = match resolve_format(format) {
                Some(format) => format,
                None => InputFormat::from_path(&input)?,
            };
            let reader_options = ReaderOptions {
                quality_filter: quality_filter || settings.quality_filter,
                use_mmap: settings.use_mmap,
            };

            let parsed = read_readings(&input, format, reader_options)?;
            let checker = IntegrityChecker::new();
            let report = checker.check(&parsed.readings);

            println!("\n{}", parsed.report.summary());
            println!("\n{}", checker.generate_summary(&report));

            if parsed.report.malformed == 0 && report.is_clean() {
                println!("✅ All data passed validation checks");
            } else {
                println!(
                    "⚠️  Found {} malformed records and {} integrity issues",
                    parsed.report.malformed,
                    report.violations.len()
                );
            }
        }

        Commands::Info { file, sample } => {
            println!("Analyzing Parquet file: {}", file.display());

            let writer = ParquetWriter::new();
            let file_info = writer.get_file_info(&file)?;

            println!("\nFile Details:");
            println!("{}", file_info.summary());

            if sample > 0 {
                println!("\nSample Records (showing up to {} records):", sample);
                match writer.read_points(&file, sample) {
                    Ok(points) => {
                        for (i, point) in points.iter().enumerate() {
                            let season = point
                                .season
                                .map(|s| format!(" {}", s))
                                .unwrap_or_default();
                            let value = point
                                .value
                                .map(|v| format!("{:.2}°C", v))
                                .unwrap_or_else(|| "null".to_string());
                            println!(
                                "{}. {} {} {}{}: {}",
                                i + 1,
                                point.element,
                                point.period,
                                point.year,
                                season,
                                value
                            );
                        }
                    }
                    Err(e) => println!("Error reading sample data: {}", e),
                }
            }
        }
    }

    Ok(())
}

fn resolve_format(format: FormatArg) -> Option<InputFormat> {
    match format {
        FormatArg::Auto => None,
        FormatArg::Json => Some(InputFormat::Json),
        FormatArg::Csv => Some(InputFormat::Csv),
        FormatArg::Dly => Some(InputFormat::Dly),
    }
}

/// Command-line flags win over settings
fn build_processor(options: &AggregateOptions, settings: &Settings) -> Result<StationProcessor> {
    let latitude = options
        .latitude
        .as_deref()
        .or(settings.latitude.as_deref())
        .ok_or_else(|| {
            ProcessingError::Config(
                "A station latitude is required (--latitude or the latitude setting)".to_string(),
            )
        })?;
    let hemisphere = Location::from_latitude_str(latitude)?.hemisphere();

    let year_range = YearRange::from_bounds(
        options.start_year.or(settings.start_year),
        options.end_year.or(settings.end_year),
    )?;

    info!("Aggregating for the {} hemisphere", hemisphere);

    Ok(StationProcessor::new(hemisphere)
        .with_year_range(year_range)
        .with_reader_options(ReaderOptions {
            quality_filter: options.quality_filter || settings.quality_filter,
            use_mmap: settings.use_mmap,
        }))
}

/// Write one output per successfully aggregated file; returns the number
/// written and the number that failed to read or write
fn write_station_outputs(
    results: Vec<(PathBuf, Result<StationResult>)>,
    output_dir: &Path,
    format: OutputFormat,
    compression: &str,
    dense: bool,
) -> (usize, usize) {
    let mut namer = OutputNamer::new(output_dir, format.extension());
    let mut written = 0;
    let mut failed = 0;

    for (path, result) in results {
        let result = match result {
            Ok(result) => result,
            Err(e) => {
                println!("❌ {}: {}", path.display(), e);
                failed += 1;
                continue;
            }
        };

        if result.dataset.is_empty() {
            println!("⚠️  {}: no TMIN/TMAX readings", result.station_id);
            continue;
        }

        let output = namer.output_for(&result.station_id, &path);
        match write_result(&result, format, &output, compression, dense) {
            Ok(_) => written += 1,
            Err(e) => {
                error!("Failed to write {}: {}", output.display(), e);
                println!("❌ {}: {}", path.display(), e);
                failed += 1;
            }
        }
    }

    (written, failed)
}

fn write_result(
    result: &StationResult,
    format: OutputFormat,
    output: &Path,
    compression: &str,
    dense: bool,
) -> Result<Vec<PathBuf>> {
    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let dataset = if dense {
        fill_dataset(&result.dataset)
    } else {
        result.dataset.clone()
    };

    match format {
        OutputFormat::Json => {
            JsonWriter::new().write_dataset(&dataset, output)?;
            Ok(vec![output.to_path_buf()])
        }
        OutputFormat::Csv => CsvWriter::new().write_dataset(&dataset, &SeriesSelection::all(), output),
        OutputFormat::Parquet => {
            let rows = ParquetWriter::new()
                .with_compression(compression)?
                .write_dataset(&dataset, output)?;
            info!("Wrote {} rows for {}", rows, result.station_id);
            Ok(vec![output.to_path_buf()])
        }
    }
}
