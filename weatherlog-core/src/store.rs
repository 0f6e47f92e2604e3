use std::{
    fs::{self, OpenOptions},
    io,
    path::Path,
};

use thiserror::Error;
use tracing::{debug, info};

use crate::model::WeatherReading;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to open {path}: {source}")]
    Io { path: String, source: io::Error },

    #[error("failed to write CSV rows to {path}: {source}")]
    Csv { path: String, source: csv::Error },
}

/// What [`append_to_csv`] did with the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    /// Nothing to write; the filesystem was not touched.
    NoData,
    /// The file was new (or empty) and received a header plus `rows` rows.
    Created { rows: usize },
    /// `rows` rows were appended below an existing header.
    Appended { rows: usize },
}

/// Append `records` to the CSV file at `path`, writing the header only when the file is new.
///
/// The existing file is assumed to carry the same columns; it is not re-read.
pub fn append_to_csv(records: &[WeatherReading], path: &Path) -> Result<AppendOutcome, StoreError> {
    if records.is_empty() {
        info!("no data to save");
        return Ok(AppendOutcome::NoData);
    }

    let shown = path.display().to_string();

    // A zero-length file left behind by an earlier failed run still needs its header.
    let is_new = match fs::metadata(path) {
        Ok(meta) => meta.len() == 0,
        Err(e) if e.kind() == io::ErrorKind::NotFound => true,
        Err(source) => return Err(StoreError::Io { path: shown, source }),
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| StoreError::Io { path: shown.clone(), source })?;

    let mut writer = csv::WriterBuilder::new().has_headers(is_new).from_writer(file);

    for record in records {
        writer
            .serialize(record)
            .map_err(|source| StoreError::Csv { path: shown.clone(), source })?;
    }

    writer
        .flush()
        .map_err(|source| StoreError::Io { path: shown.clone(), source })?;

    let rows = records.len();
    debug!(path = %shown, rows, header = is_new, "wrote weather rows");

    Ok(if is_new { AppendOutcome::Created { rows } } else { AppendOutcome::Appended { rows } })
}
