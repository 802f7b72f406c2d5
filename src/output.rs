use crate::activity::record::{ActivityRecord, CSV_COLUMNS};
use crate::error::Result;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub json: PathBuf,
    pub csv: PathBuf,
}

impl OutputPaths {
    pub fn from_stem(stem: &str) -> Self {
        Self {
            json: PathBuf::from(format!("{stem}.json")),
            csv: PathBuf::from(format!("{stem}.csv")),
        }
    }
}

/// Write both files, or neither: a failure on either removes whatever of
/// the pair was already written.
pub fn write_all(paths: &OutputPaths, records: &[ActivityRecord]) -> Result<()> {
    let written = write_json(&paths.json, records).and_then(|()| write_csv(&paths.csv, records));
    if written.is_err() {
        for path in [&paths.json, &paths.csv] {
            if path.is_file() {
                if let Err(e) = std::fs::remove_file(path) {
                    tracing::warn!(path = %path.display(), error = %e, "could not remove partial output");
                }
            }
        }
    }
    written
}

/// Pretty-printed array; non-ASCII text is written as-is.
pub fn write_json(path: &Path, records: &[ActivityRecord]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.flush()?;
    Ok(())
}

/// Header row first, so an empty export is still a valid CSV.
pub fn write_csv(path: &Path, records: &[ActivityRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(CSV_COLUMNS)?;
    for record in records {
        writer.write_record(record.csv_row())?;
    }
    writer.flush()?;
    Ok(())
}
