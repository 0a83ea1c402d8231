use chrono::{Datelike, Local};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Output filename with format: {dir}/{station}-aggregate-{YYMMDD}.{ext}
pub fn generate_output_filename_in(dir: &Path, station: &str, extension: &str) -> PathBuf {
    let now = Local::now();
    let year = now.year() % 100; // Get last 2 digits of year

    let filename = format!(
        "{}-aggregate-{:02}{:02}{:02}.{}",
        station,
        year,
        now.month(),
        now.day(),
        extension
    );
    dir.join(filename)
}

/// Station identifier taken from an input file name (`USW00094728.dly` -> `USW00094728`)
pub fn station_from_path(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("station")
        .to_string()
}

/// Sibling path with a suffix appended to the stem (`out.csv` + `annual` -> `out-annual.csv`)
pub fn with_stem_suffix(path: &Path, suffix: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    let filename = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}-{}.{}", stem, suffix, ext),
        None => format!("{}-{}", stem, suffix),
    };
    path.with_file_name(filename)
}

/// Hands out one output path per input file within a directory run.
///
/// The first input of a station gets the plain station name. Later inputs
/// of the same station are told apart by their source file name, then by
/// a counter.
pub struct OutputNamer {
    dir: PathBuf,
    extension: String,
    used: HashSet<PathBuf>,
}

impl OutputNamer {
    pub fn new(dir: &Path, extension: &str) -> Self {
        Self {
            dir: dir.to_path_buf(),
            extension: extension.to_string(),
            used: HashSet::new(),
        }
    }

    pub fn output_for(&mut self, station: &str, input: &Path) -> PathBuf {
        let mut output = generate_output_filename_in(&self.dir, station, &self.extension);

        if self.used.contains(&output) {
            let source = input
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("input")
                .replace('.', "-");
            let label = if source.starts_with(station) {
                source
            } else {
                format!("{}-{}", station, source)
            };

            output = generate_output_filename_in(&self.dir, &label, &self.extension);
            let mut n = 2;
            while self.used.contains(&output) {
                output =
                    generate_output_filename_in(&self.dir, &format!("{}-{}", label, n), &self.extension);
                n += 1;
            }
        }

        self.used.insert(output.clone());
        output
    }
}
