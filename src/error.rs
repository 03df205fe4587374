use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors that abort a templating run before any output is written.
#[derive(Debug, Error)]
pub enum TemplatizerError {
    #[error("Template file '{}' does not exist.", .0.display())]
    TemplateNotFound(PathBuf),
    #[error("CSV file '{}' does not exist.", .0.display())]
    RecordsNotFound(PathBuf),
    #[error("invalid template: {0}")]
    InvalidTemplate(String),
    #[error("CSV error in '{}': {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl TemplatizerError {
    /// Process exit status for this error.
    ///
    /// Usage errors are reported by clap with status 2, so the fatal
    /// conditions here start at 3 and stay distinct from each other.
    pub fn exit_code(&self) -> u8 {
        match self {
            TemplatizerError::TemplateNotFound(_) => 3,
            TemplatizerError::RecordsNotFound(_) => 4,
            TemplatizerError::InvalidTemplate(_) => 5,
            TemplatizerError::Csv { .. } | TemplatizerError::Io { .. } => 1,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        TemplatizerError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        TemplatizerError::Csv {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, TemplatizerError>;
