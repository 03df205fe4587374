//! Directory member scanner
//!
//! Lists the immediate files of a directory using walkdir, skipping hidden
//! files, OS thumbnail caches and subdirectories.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Configuration for the member scanner
#[derive(Debug, Clone)]
pub struct DirectoryScanner {
    /// Skip names starting with `.`
    skip_hidden: bool,

    /// Lowercased file names that never count as members
    ignored_names: Vec<String>,
}

impl Default for DirectoryScanner {
    fn default() -> Self {
        Self {
            skip_hidden: true,
            ignored_names: vec!["thumbs.db".to_string()],
        }
    }
}

/// Counters from a single listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Files accepted as members
    pub members: usize,

    /// Entries rejected by the name rules or because they are not files
    pub skipped: usize,

    /// Entries that could not be read
    pub errors: usize,
}

impl DirectoryScanner {
    /// Create a new scanner with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable skipping of hidden files
    pub fn with_skip_hidden(mut self, skip: bool) -> Self {
        self.skip_hidden = skip;
        self
    }

    /// Ignore another file name, compared case-insensitively
    pub fn with_ignored_name(mut self, name: &str) -> Self {
        self.ignored_names.push(name.to_lowercase());
        self
    }

    /// Check a bare file name against the skip rules
    pub fn is_member_name(&self, name: &str) -> bool {
        if self.skip_hidden && name.starts_with('.') {
            return false;
        }
        !self.ignored_names.contains(&name.to_lowercase())
    }

    /// List qualifying member files, sorted by file name.
    ///
    /// A directory that cannot be read yields no members; the error is
    /// counted, never returned.
    pub fn list_members(&self, directory: &Path) -> (Vec<PathBuf>, ScanStats) {
        let mut stats = ScanStats::default();
        let mut members = Vec::new();

        let walker = WalkDir::new(directory)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name();

        for entry_result in walker {
            match entry_result {
                Ok(entry) => {
                    let is_member = entry.file_type().is_file()
                        && self.is_member_name(&entry.file_name().to_string_lossy());
                    if is_member {
                        members.push(entry.into_path());
                        stats.members += 1;
                    } else {
                        stats.skipped += 1;
                    }
                }
                Err(e) => {
                    tracing::debug!("Directory walk error under {}: {}", directory.display(), e);
                    stats.errors += 1;
                }
            }
        }

        (members, stats)
    }
}
