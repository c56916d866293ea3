use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecDiffError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("record source unavailable: {path}: {reason}")]
    SourceUnavailable { path: PathBuf, reason: String },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl RecDiffError {
    pub fn source_unavailable(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::SourceUnavailable {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RecDiffError>;
