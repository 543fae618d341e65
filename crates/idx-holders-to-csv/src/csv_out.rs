use std::io::Write;
use std::path::Path;

use csv::WriterBuilder;

use crate::error::ExtractError;
use crate::model::Dataset;

fn write_records<W: Write>(
    writer: &mut csv::Writer<W>,
    dataset: &Dataset,
) -> Result<(), ExtractError> {
    writer.write_record(dataset.columns().names())?;
    for record in dataset.records() {
        writer.write_record(record.values().iter().map(crate::model::Value::to_field))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_csv(path: &Path, dataset: &Dataset, delimiter: u8) -> Result<(), ExtractError> {
    let mut writer = WriterBuilder::new().delimiter(delimiter).from_path(path)?;
    write_records(&mut writer, dataset)
}

pub fn write_csv_to_string(dataset: &Dataset, delimiter: u8) -> Result<String, ExtractError> {
    let mut writer = WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::<u8>::new());
    write_records(&mut writer, dataset)?;

    let bytes = writer
        .into_inner()
        .map_err(|error| ExtractError::Io(error.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|error| ExtractError::InvalidOption(format!("invalid utf-8 csv output: {error}")))
}
