use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ghcnd-explorer")]
#[command(about = "Annual and seasonal temperature aggregates from GHCN-Daily station data")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        help = "Settings file [default: ghcnd-explorer.toml if present]"
    )]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Auto,
    Json,
    Csv,
    Dly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Csv,
    Parquet,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Parquet => "parquet",
        }
    }
}

/// Flags shared by the commands that aggregate station data
#[derive(clap::Args, Debug, Clone)]
pub struct AggregateOptions {
    #[arg(
        long,
        allow_hyphen_values = true,
        help = "Station latitude, decimal or D:M:S (e.g. 51:28:40N); falls back to settings"
    )]
    pub latitude: Option<String>,

    #[arg(long)]
    pub start_year: Option<i32>,

    #[arg(long)]
    pub end_year: Option<i32>,

    #[arg(long, help = "Drop readings that carry a GHCN quality flag")]
    pub quality_filter: bool,

    #[arg(long, help = "Fill absent years with nulls across the dataset span")]
    pub dense: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Aggregate one station file into annual and seasonal means
    Aggregate {
        #[arg(short, long, help = "Station file (.json, .csv or .dly)")]
        input: PathBuf,

        #[arg(long, value_enum, default_value = "auto")]
        format: FormatArg,

        #[command(flatten)]
        options: AggregateOptions,

        #[arg(
            short,
            long,
            help = "Output file path [default: output/{station}-aggregate-{YYMMDD}.{ext}]"
        )]
        output: Option<PathBuf>,

        #[arg(long, value_enum, default_value = "json")]
        output_format: OutputFormat,

        #[arg(short, long, help = "Parquet compression [default: snappy]")]
        compression: Option<String>,
    },

    /// Aggregate every station file in a directory, one output per station
    AggregateDirectory {
        #[arg(short, long, help = "Directory containing station files")]
        input_dir: PathBuf,

        #[command(flatten)]
        options: AggregateOptions,

        #[arg(short, long, help = "Output directory [default: output]")]
        output_dir: Option<PathBuf>,

        #[arg(long, value_enum, default_value = "json")]
        output_format: OutputFormat,

        #[arg(short, long)]
        compression: Option<String>,

        #[arg(long, default_value_t = num_cpus::get())]
        max_workers: usize,
    },

    /// Print the annual and seasonal tables for selected series
    Table {
        #[arg(short, long, help = "Station file (.json, .csv or .dly)")]
        input: PathBuf,

        #[arg(long, value_enum, default_value = "auto")]
        format: FormatArg,

        #[command(flatten)]
        options: AggregateOptions,

        #[arg(
            long,
            help = "Comma-separated series, e.g. 'Annual TMIN,TMAX Winter' [default: all]"
        )]
        series: Option<String>,
    },

    /// Parse a station file and report data quality without aggregating
    Validate {
        #[arg(short, long, help = "Station file (.json, .csv or .dly)")]
        input: PathBuf,

        #[arg(long, value_enum, default_value = "auto")]
        format: FormatArg,

        #[arg(long, help = "Drop readings that carry a GHCN quality flag")]
        quality_filter: bool,
    },

    /// Display information about a Parquet file
    Info {
        #[arg(short, long)]
        file: PathBuf,

        #[arg(short, long, default_value = "10")]
        sample: usize,
    },
}
