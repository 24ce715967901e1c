use std::io::Write;
use std::path::Path;

use csv::{Writer, WriterBuilder};

use crate::error::ExtractError;
use crate::model::{LOG_HEADERS, ObservationRecord};

fn write_all<W: Write>(
    writer: &mut Writer<W>,
    records: &[ObservationRecord],
) -> Result<(), ExtractError> {
    writer.write_record(LOG_HEADERS)?;
    for record in records {
        writer.write_record(record.log_fields())?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_records_csv(path: &Path, records: &[ObservationRecord]) -> Result<(), ExtractError> {
    let mut writer = WriterBuilder::new().from_path(path)?;
    write_all(&mut writer, records)
}

pub fn write_records_csv_to_string(records: &[ObservationRecord]) -> Result<String, ExtractError> {
    let mut writer = WriterBuilder::new().from_writer(Vec::<u8>::new());
    write_all(&mut writer, records)?;

    let bytes = writer
        .into_inner()
        .map_err(|error| ExtractError::Io(error.into_error()))?;
    String::from_utf8(bytes).map_err(|error| {
        ExtractError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("invalid utf-8 csv output: {error}"),
        ))
    })
}
