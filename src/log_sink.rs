use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use csv::WriterBuilder;
use occupancy_table::{LOG_HEADERS, ObservationRecord};
use tracing::info;

use crate::error::AppError;

/// Append-only store for observation batches.
pub trait LogSink {
    /// Appends the whole batch in one operation and returns how many records
    /// were written.
    fn append_batch(&mut self, records: &[ObservationRecord]) -> Result<usize, AppError>;
}

#[derive(Debug, Clone)]
pub struct CsvLogSink {
    path: PathBuf,
}

impl CsvLogSink {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn encode_batch(records: &[ObservationRecord], with_header: bool) -> Result<Vec<u8>, AppError> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::<u8>::new());
    if with_header {
        writer.write_record(LOG_HEADERS)?;
    }
    for record in records {
        writer.write_record(record.log_fields())?;
    }
    writer.flush()?;
    writer
        .into_inner()
        .map_err(|error| AppError::Log(error.into_error().to_string()))
}

fn ends_with_newline(file: &mut File) -> Result<bool, AppError> {
    let len = file.metadata()?.len();
    if len == 0 {
        return Ok(true);
    }
    file.seek(SeekFrom::Start(len - 1))?;
    let mut last = [0_u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

impl LogSink for CsvLogSink {
    fn append_batch(&mut self, records: &[ObservationRecord]) -> Result<usize, AppError> {
        if records.is_empty() {
            return Err(AppError::Log(
                "refusing to append an empty observation batch".to_string(),
            ));
        }

        if let Some(parent) = self
            .path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
        {
            fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)?;
        let is_new = file.metadata()?.len() == 0;

        let mut payload = Vec::new();
        if !is_new && !ends_with_newline(&mut file)? {
            payload.push(b'\n');
        }
        payload.extend(encode_batch(records, is_new)?);

        file.write_all(&payload)?;
        file.flush()?;

        info!(
            log = %self.path.display(),
            records = records.len(),
            created = is_new,
            "appended observation batch"
        );
        Ok(records.len())
    }
}
