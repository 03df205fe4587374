//! Batch orchestration
//!
//! Loads the template and the record batch, validates both, merges every
//! record strictly in input order against one run-scoped identifier
//! registry, and writes the main output table once at the end.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::columns::plan_columns;
use crate::csv_io::{read_records, write_records};
use crate::error::Result;
use crate::expand::DirectoryExpander;
use crate::identifier::IdentifierRegistry;
use crate::merge::{Mediatype, RecordMerger};
use crate::record::{non_empty, normalize_field_names, Record};
use crate::template::{normalize_field_name, Template};
use crate::validation::{self, validate_batch, validate_template};

/// Resolved configuration for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub template_path: PathBuf,
    pub records_path: PathBuf,
    pub output_path: PathBuf,
    pub expand_directories: bool,
}

/// Records produced by merging a batch
#[derive(Debug, Clone, Default)]
pub struct MergedBatch {
    /// Records for the main output, in input order
    pub records: Vec<Record>,

    /// Side tables written for expanded directories
    pub side_outputs: Vec<PathBuf>,

    /// Side tables replaced by a later directory with the same base name
    pub overwritten: Vec<PathBuf>,
}

/// Outcome of a completed run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub records_written: usize,
    pub directories_expanded: usize,
    pub side_outputs: Vec<PathBuf>,
    pub warnings: usize,
}

/// Directory named by the record's `file`, if expansion applies to it
fn directory_of(record: &Record) -> Option<PathBuf> {
    non_empty(record, "file")
        .map(PathBuf::from)
        .filter(|path| path.is_dir())
}

/// Merge every record in order.
///
/// With `expand_directories`, a directory row becomes a side table of its
/// members; a directory without qualifying members, or whose side table
/// cannot be written, is merged as a single `data` record instead.
pub fn merge_batch(
    template: &Template,
    records: Vec<Record>,
    output_path: &Path,
    expand_directories: bool,
    registry: &mut IdentifierRegistry,
) -> MergedBatch {
    let merger = RecordMerger::new(template);
    let expander = DirectoryExpander::new(merger, output_path);
    let mut merged = MergedBatch::default();

    for mut record in records {
        let directory = if expand_directories {
            directory_of(&record)
        } else {
            None
        };

        if let Some(directory) = directory {
            match expander.expand(&record, &directory, registry) {
                Ok(Some(side_output)) => {
                    if merged.side_outputs.contains(&side_output) {
                        tracing::warn!(
                            directory = %directory.display(),
                            "Side output {} was already written in this run and has been replaced",
                            side_output.display()
                        );
                        merged.overwritten.push(side_output.clone());
                    }
                    merged.side_outputs.push(side_output);
                    continue;
                }
                Ok(None) => {
                    tracing::debug!(
                        directory = %directory.display(),
                        "No qualifying files, keeping directory as a single data item"
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        directory = %directory.display(),
                        "Directory expansion failed, keeping it as a single data item: {}",
                        e
                    );
                }
            }
            record.insert("mediatype".to_string(), Mediatype::Data.as_str().to_string());
        }

        merged.records.push(merger.merge(record, registry));
    }

    merged
}

/// Execute a full run: load, validate, merge, write.
///
/// Fatal errors (missing template or batch, invalid template) surface before
/// anything is written.
pub fn run_batch(options: &RunOptions) -> Result<RunSummary> {
    let template = Template::load(&options.template_path)?;
    let batch = read_records(&options.records_path)?;

    let mut warnings = validate_template(&template);
    let headers: Vec<String> = batch
        .headers
        .iter()
        .map(|h| normalize_field_name(h))
        .collect();
    let records: Vec<Record> = batch.records.into_iter().map(normalize_field_names).collect();
    warnings.extend(validate_batch(&headers, &records));
    let warning_count = validation::emit(&warnings);

    let mut registry = IdentifierRegistry::new();
    let merged = merge_batch(
        &template,
        records,
        &options.output_path,
        options.expand_directories,
        &mut registry,
    );

    let columns = plan_columns(&merged.records);
    write_records(&options.output_path, &columns, &merged.records)?;
    println!("Output written to '{}'", options.output_path.display());

    let summary = RunSummary {
        records_written: merged.records.len(),
        directories_expanded: merged.side_outputs.len(),
        side_outputs: merged.side_outputs,
        warnings: warning_count,
    };

    tracing::info!(
        records = summary.records_written,
        directories = summary.directories_expanded,
        warnings = summary.warnings,
        identifiers = registry.len(),
        "Templating run complete"
    );
    if let Ok(json) = serde_json::to_string(&summary) {
        tracing::debug!(summary = %json, "Run summary");
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use tempfile::TempDir;

    fn record(pairs: &[(&str, &str)]) -> Record {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_directory_without_members_becomes_data_record() {
        let dir = TempDir::new().unwrap();
        let empty = dir.path().join("empty");
        fs::create_dir(&empty).unwrap();
        File::create(empty.join(".DS_Store")).unwrap();
        File::create(empty.join("Thumbs.db")).unwrap();
        let empty_str = empty.to_string_lossy().to_string();

        let template =
            Template::from_json_str(r#"{"subject": [], "mediatype": "image", "title": "T"}"#).unwrap();
        let output = dir.path().join("out.csv");
        let mut registry = IdentifierRegistry::new();

        let merged = merge_batch(
            &template,
            vec![record(&[("file", empty_str.as_str())])],
            &output,
            true,
            &mut registry,
        );

        assert!(merged.side_outputs.is_empty());
        assert_eq!(merged.records.len(), 1);
        assert_eq!(merged.records[0]["mediatype"], "data");
        assert_eq!(merged.records[0]["title"], "T");
        assert_eq!(merged.records[0]["identifier"], "empty");
        assert!(!dir.path().join("out_empty.csv").exists());
    }

    #[test]
    fn test_directory_untouched_without_flag() {
        let dir = TempDir::new().unwrap();
        let photos = dir.path().join("photos");
        fs::create_dir(&photos).unwrap();
        File::create(photos.join("a.jpg")).unwrap();
        let photos_str = photos.to_string_lossy().to_string();

        let template = Template::from_json_str(r#"{"subject": [], "mediatype": "DETECT"}"#).unwrap();
        let merged = merge_batch(
            &template,
            vec![record(&[("file", photos_str.as_str())])],
            &dir.path().join("out.csv"),
            false,
            &mut IdentifierRegistry::new(),
        );

        assert_eq!(merged.records.len(), 1);
        assert_eq!(merged.records[0]["mediatype"], "data");
        assert!(merged.side_outputs.is_empty());
    }

    #[test]
    fn test_same_named_directories_flag_overwrite() {
        let dir = TempDir::new().unwrap();
        let first = dir.path().join("a").join("photos");
        let second = dir.path().join("b").join("photos");
        fs::create_dir_all(&first).unwrap();
        fs::create_dir_all(&second).unwrap();
        File::create(first.join("one.jpg")).unwrap();
        File::create(second.join("two.jpg")).unwrap();
        let first_str = first.to_string_lossy().to_string();
        let second_str = second.to_string_lossy().to_string();

        let template = Template::from_json_str(r#"{"subject": []}"#).unwrap();
        let output = dir.path().join("out.csv");
        let merged = merge_batch(
            &template,
            vec![
                record(&[("file", first_str.as_str())]),
                record(&[("file", second_str.as_str())]),
            ],
            &output,
            true,
            &mut IdentifierRegistry::new(),
        );

        let side = dir.path().join("out_photos.csv");
        assert_eq!(merged.side_outputs, vec![side.clone(), side.clone()]);
        assert_eq!(merged.overwritten, vec![side.clone()]);
        assert!(merged.records.is_empty());

        let contents = fs::read_to_string(side).unwrap();
        assert!(contents.contains("two.jpg"));
        assert!(!contents.contains("one.jpg"));
    }

    #[test]
    fn test_identifiers_unique_across_batch() {
        let template =
            Template::from_json_str(r#"{"subject": [], "identifier-prefix": "acme"}"#).unwrap();
        let records = (0..25).map(|_| record(&[("file", "same.jpg")])).collect();

        let merged = merge_batch(
            &template,
            records,
            Path::new("out.csv"),
            false,
            &mut IdentifierRegistry::new(),
        );

        let ids: std::collections::HashSet<&str> = merged
            .records
            .iter()
            .map(|r| r["identifier"].as_str())
            .collect();
        assert_eq!(ids.len(), 25);
        assert!(ids.iter().all(|id| id.len() <= 80));
        assert_eq!(merged.records[0]["identifier"], "acme_same");
    }
}
