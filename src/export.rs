use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::dataset::Dataset;
use crate::error::ExportError;
use crate::outcome::derive_result;

pub const EXPORT_FILE_NAME: &str = "filtered_student_data.csv";
pub const EXPORT_MEDIA_TYPE: &str = "text/csv";
pub const RESULT_COLUMN: &str = "result";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportOptions {
    /// Append the derived pass/fail column.
    pub include_result: bool,
}

/// Encodes `dataset` as CSV: one header row, then one line per record.
pub fn to_csv(dataset: &Dataset, options: ExportOptions) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(Vec::new());

    let mut header = dataset.columns();
    if options.include_result {
        header.push(RESULT_COLUMN);
    }
    wtr.write_record(&header)?;

    for record in dataset.iter() {
        let mut fields = record.fields().to_vec();
        if options.include_result {
            fields.push(derive_result(record).to_string());
        }
        wtr.write_record(&fields)?;
    }

    let bytes = wtr.into_inner()?;
    Ok(String::from_utf8(bytes)?)
}

/// Writes the export file into `dir` and returns its path.
pub fn write_export(dataset: &Dataset, dir: &Path, options: ExportOptions) -> Result<PathBuf, ExportError> {
    let text = to_csv(dataset, options)?;
    let path = dir.join(EXPORT_FILE_NAME);
    fs::write(&path, text).map_err(|source| ExportError::Write {
        path: path.clone(),
        source,
    })?;
    info!(rows = dataset.len(), path = %path.display(), media_type = EXPORT_MEDIA_TYPE, "exported filtered data");
    Ok(path)
}
