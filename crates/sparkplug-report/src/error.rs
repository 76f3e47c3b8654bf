use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReportError>;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to read {}: {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Description of {id} has no normative keyword (MUST, SHOULD or MAY): {description:?}")]
    MissingNormativeKeyword { id: String, description: String },

    #[error("Log ended inside the result block of {profile}.{test} opened at line {line} (no OVERALL line)")]
    UnterminatedBlock {
        profile: String,
        test: String,
        line: usize,
    },

    #[error("Result block of {profile}.{test} opened at line {line} was interrupted by another summary header at line {next_line}")]
    InterruptedBlock {
        profile: String,
        test: String,
        line: usize,
        next_line: usize,
    },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl ReportError {
    pub(crate) fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadFailed {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::WriteFailed {
            path: path.into(),
            source,
        }
    }

    /// Fatal log-structure errors abort the pipeline before any report is written.
    #[must_use]
    pub fn is_malformed_log(&self) -> bool {
        matches!(
            self,
            Self::UnterminatedBlock { .. } | Self::InterruptedBlock { .. }
        )
    }
}
