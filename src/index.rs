// src/index.rs

use crate::error::{Error, Result};
use crate::model::{ExecutionIndex, Group};
use std::fs;
use std::path::Path;

pub fn load_index(path: &Path) -> Result<ExecutionIndex> {
    let bytes = fs::read(path).map_err(|e| Error::index_load(path, e))?;
    let index: ExecutionIndex =
        serde_json::from_slice(&bytes).map_err(|e| Error::index_load(path, e))?;

    tracing::info!(
        path = %path.display(),
        positives = index.positives.len(),
        negatives = index.negatives.len(),
        "loaded execution index"
    );
    tracing::debug!(
        positive_examples = index.positive_examples.len(),
        negative_examples = index.negative_examples.len(),
        "recorded inputs"
    );
    if let Some(example) = index.negative_examples.first() {
        tracing::info!(%example, "first failing input");
    }

    Ok(index)
}

/// Means are undefined for a group without snapshots, so such an index is
/// refused before anything is extracted.
pub fn require_both_groups(index: &ExecutionIndex) -> Result<()> {
    for group in [Group::Positive, Group::Negative] {
        if index.iterations(group).is_empty() {
            return Err(Error::EmptyGroup { group });
        }
    }
    Ok(())
}
