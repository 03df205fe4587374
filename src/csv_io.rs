//! CSV input and output for record batches.

use csv::{ReaderBuilder, Trim, WriterBuilder};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, TemplatizerError};
use crate::record::Record;

/// A fully materialized input table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordBatch {
    /// Header row as read, used for batch-level validation
    pub headers: Vec<String>,
    pub records: Vec<Record>,
}

/// Read a CSV file with a header row into records.
///
/// Every cell is trimmed. Short rows are padded with empty values and cells
/// beyond the header are dropped.
pub fn read_records(path: &Path) -> Result<RecordBatch> {
    if !path.exists() {
        return Err(TemplatizerError::RecordsNotFound(path.to_path_buf()));
    }

    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true) // Allow rows with different lengths
        .from_path(path)
        .map_err(|e| TemplatizerError::csv(path, e))?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| TemplatizerError::csv(path, e))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result.map_err(|e| TemplatizerError::csv(path, e))?;
        let record: Record = headers
            .iter()
            .enumerate()
            .map(|(i, header)| (header.clone(), row.get(i).unwrap_or_default().to_string()))
            .collect();
        records.push(record);
    }

    tracing::debug!(
        path = %path.display(),
        columns = headers.len(),
        rows = records.len(),
        "Loaded record batch"
    );

    Ok(RecordBatch { headers, records })
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

/// Write records under `columns`, rendering missing fields as empty cells.
///
/// Writes to a temp file first, then renames it over `path`, creating the
/// parent directory when needed.
pub fn write_records(path: &Path, columns: &[String], records: &[Record]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| TemplatizerError::io(parent, e))?;
    }

    let temp = temp_path(path);
    {
        let mut writer = WriterBuilder::new()
            .from_path(&temp)
            .map_err(|e| TemplatizerError::csv(&temp, e))?;

        writer
            .write_record(columns)
            .map_err(|e| TemplatizerError::csv(&temp, e))?;

        for record in records {
            let row = columns
                .iter()
                .map(|column| record.get(column).map(String::as_str).unwrap_or_default());
            writer
                .write_record(row)
                .map_err(|e| TemplatizerError::csv(&temp, e))?;
        }

        writer.flush().map_err(|e| TemplatizerError::io(&temp, e))?;
    }

    // Atomic rename
    fs::rename(&temp, path).map_err(|e| TemplatizerError::io(path, e))?;

    Ok(())
}
