//! Directory Expansion
//!
//! A record whose `file` names a directory can be expanded into one record
//! per member file. Members share the enclosing row's fields, go through
//! the regular merge, and are written to a side table named after the
//! directory. A directory without qualifying members is left to the caller,
//! which folds it into the main output as a single `data` item.

pub mod scanner;

use std::path::{Path, PathBuf};

use crate::columns::plan_columns;
use crate::csv_io::write_records;
use crate::error::Result;
use crate::identifier::IdentifierRegistry;
use crate::merge::RecordMerger;
use crate::record::Record;

pub use scanner::{DirectoryScanner, ScanStats};

/// Side-output path: the directory's base name inserted before the output's
/// extension, e.g. `out.csv` + `photos/` gives `out_photos.csv`.
pub fn side_output_path(output: &Path, directory: &Path) -> PathBuf {
    let dir_name = directory
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "directory".to_string());
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    let file_name = match output.extension() {
        Some(ext) => format!("{}_{}.{}", stem, dir_name, ext.to_string_lossy()),
        None => format!("{}_{}", stem, dir_name),
    };

    output.with_file_name(file_name)
}

/// Expands directory rows into per-file records
#[derive(Debug, Clone)]
pub struct DirectoryExpander<'a> {
    merger: RecordMerger<'a>,
    scanner: DirectoryScanner,
    output_path: &'a Path,
}

impl<'a> DirectoryExpander<'a> {
    pub fn new(merger: RecordMerger<'a>, output_path: &'a Path) -> Self {
        Self {
            merger,
            scanner: DirectoryScanner::new(),
            output_path,
        }
    }

    /// Use a custom member scanner
    pub fn with_scanner(mut self, scanner: DirectoryScanner) -> Self {
        self.scanner = scanner;
        self
    }

    /// Merge one record per qualifying member of `directory`.
    ///
    /// Each member starts from the enclosing record with only `file`
    /// replaced by the member path. A row identifier is kept, so members
    /// share it and pick up collision suffixes in member order.
    pub fn expand_members(
        &self,
        record: &Record,
        directory: &Path,
        registry: &mut IdentifierRegistry,
    ) -> Vec<Record> {
        let (members, stats) = self.scanner.list_members(directory);
        tracing::debug!(
            directory = %directory.display(),
            members = stats.members,
            skipped = stats.skipped,
            errors = stats.errors,
            "Scanned directory"
        );

        members
            .into_iter()
            .map(|member| {
                let mut member_record = record.clone();
                member_record.insert("file".to_string(), member.to_string_lossy().to_string());
                self.merger.merge(member_record, registry)
            })
            .collect()
    }

    /// Expand `directory` and write its side table.
    ///
    /// Returns the side-output path, or `None` when the directory has no
    /// qualifying members and the caller should fall back.
    pub fn expand(
        &self,
        record: &Record,
        directory: &Path,
        registry: &mut IdentifierRegistry,
    ) -> Result<Option<PathBuf>> {
        let members = self.expand_members(record, directory, registry);
        if members.is_empty() {
            return Ok(None);
        }

        let path = side_output_path(self.output_path, directory);
        let columns = plan_columns(&members);
        write_records(&path, &columns, &members)?;

        tracing::info!(
            directory = %directory.display(),
            records = members.len(),
            "Wrote expanded directory to {}",
            path.display()
        );
        println!("Output of {} written to {}", directory.display(), path.display());

        Ok(Some(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::Template;
    use std::fs::{self, File};
    use tempfile::TempDir;

    fn template() -> Template {
        Template::from_json_str(
            r#"{"subject": ["archive"], "mediatype": "DETECT", "creator": "Studio", "identifier-prefix": "acme"}"#,
        )
        .unwrap()
    }

    fn record(pairs: &[(&str, &str)]) -> Record {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_side_output_path() {
        assert_eq!(
            side_output_path(Path::new("out.csv"), Path::new("photos")),
            PathBuf::from("out_photos.csv")
        );
        assert_eq!(
            side_output_path(Path::new("runs/out.csv"), Path::new("/data/photos/")),
            PathBuf::from("runs/out_photos.csv")
        );
        assert_eq!(
            side_output_path(Path::new("out"), Path::new("scans")),
            PathBuf::from("out_scans")
        );
    }

    #[test]
    fn test_members_share_row_fields() {
        let dir = TempDir::new().unwrap();
        let photos = dir.path().join("photos");
        fs::create_dir(&photos).unwrap();
        File::create(photos.join("one.jpg")).unwrap();
        File::create(photos.join("two.mp3")).unwrap();
        let photos_str = photos.to_string_lossy().to_string();

        let t = template();
        let output = dir.path().join("out.csv");
        let expander = DirectoryExpander::new(RecordMerger::new(&t), &output);
        let row = record(&[
            ("identifier", "album"),
            ("file", photos_str.as_str()),
            ("title", "Summer"),
        ]);

        let mut registry = IdentifierRegistry::with_clock(|| 1);
        let members = expander.expand_members(&row, &photos, &mut registry);

        assert_eq!(members.len(), 2);
        assert_eq!(members[0]["identifier"], "acme_album");
        assert_eq!(members[0]["mediatype"], "image");
        assert_eq!(members[1]["identifier"], "acme_album_1-001");
        assert_eq!(members[1]["mediatype"], "audio");
        for member in &members {
            assert_eq!(member["title"], "Summer");
            assert_eq!(member["creator"], "Studio");
            assert_eq!(member["subject[0]"], "archive");
        }
        assert!(members[0]["file"].ends_with("one.jpg"));
        assert!(members[1]["file"].ends_with("two.mp3"));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_expand_writes_side_output() {
        let dir = TempDir::new().unwrap();
        let photos = dir.path().join("photos");
        fs::create_dir(&photos).unwrap();
        File::create(photos.join("one.jpg")).unwrap();

        let t = template();
        let output = dir.path().join("out.csv");
        let expander = DirectoryExpander::new(RecordMerger::new(&t), &output);

        let written = expander
            .expand(&record(&[]), &photos, &mut IdentifierRegistry::new())
            .unwrap();

        let side = dir.path().join("out_photos.csv");
        assert_eq!(written, Some(side.clone()));
        let contents = fs::read_to_string(side).unwrap();
        assert!(contents.starts_with("identifier,file,mediatype,title,date,creator,description,subject[0]\n"));
        assert!(contents.contains("acme_one,"));
    }

    #[test]
    fn test_only_hidden_and_thumbs_falls_back() {
        let dir = TempDir::new().unwrap();
        let photos = dir.path().join("photos");
        fs::create_dir(&photos).unwrap();
        File::create(photos.join(".DS_Store")).unwrap();
        File::create(photos.join("Thumbs.db")).unwrap();

        let t = template();
        let output = dir.path().join("out.csv");
        let expander = DirectoryExpander::new(RecordMerger::new(&t), &output);
        let mut registry = IdentifierRegistry::new();

        let written = expander.expand(&record(&[]), &photos, &mut registry).unwrap();
        assert_eq!(written, None);
        assert!(!dir.path().join("out_photos.csv").exists());
        assert!(registry.is_empty());
    }
}
