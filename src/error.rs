// src/error.rs

use std::path::{Path, PathBuf};

use crate::model::Group;

/// Every failure aborts the run; nothing is retried.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("index load error in {}: {reason}", path.display())]
    IndexLoad { path: PathBuf, reason: String },

    #[error("format error in {}: {reason}", path.display())]
    Format { path: PathBuf, reason: String },

    #[error("schema error in {}: {reason}", path.display())]
    Schema { path: PathBuf, reason: String },

    #[error("{group} group has no snapshots, cannot compute mean hit counts")]
    EmptyGroup { group: Group },

    #[error("{group} group hit count overflows u64 for region {region}")]
    CountOverflow { group: Group, region: String },

    #[error("demangle error in {}: {reason}", path.display())]
    Demangle { path: PathBuf, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn index_load(path: &Path, reason: impl ToString) -> Self {
        Self::IndexLoad { path: path.to_path_buf(), reason: reason.to_string() }
    }

    pub fn format(path: &Path, reason: impl ToString) -> Self {
        Self::Format { path: path.to_path_buf(), reason: reason.to_string() }
    }

    pub fn schema(path: &Path, reason: impl ToString) -> Self {
        Self::Schema { path: path.to_path_buf(), reason: reason.to_string() }
    }

    pub fn demangle(path: &Path, reason: impl ToString) -> Self {
        Self::Demangle { path: path.to_path_buf(), reason: reason.to_string() }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
