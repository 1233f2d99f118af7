// src/analyzer.rs

use crate::error::{Error, Result};
use crate::model::*;
use indicatif::{ParallelProgressIterator, ProgressBar};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Parses one snapshot and folds its regions into a count map.
///
/// Only `data[0]` and each function's first filename are consulted. A
/// region reported several times (one per expansion) accumulates.
pub fn extract_region_counts(path: &Path, module: Option<&str>) -> Result<RegionCountMap> {
    let bytes = fs::read(path).map_err(|e| Error::format(path, e))?;
    let snapshot: CoverageSnapshot =
        serde_json::from_slice(&bytes).map_err(|e| Error::format(path, e))?;
    let entry = snapshot
        .data
        .into_iter()
        .next()
        .ok_or_else(|| Error::format(path, "`data` array is empty"))?;

    let mut regions = RegionCountMap::new();
    for func in entry.functions {
        if module.is_some_and(|m| !func.name.contains(m)) {
            continue;
        }
        // Filenames only matter once there is a region to key.
        if func.regions.is_empty() {
            continue;
        }

        let name = &func.name;
        let file_path = match func.filenames.as_deref() {
            Some([first, ..]) => first,
            Some([]) => {
                let reason = format!("function `{name}` has an empty `filenames` list");
                return Err(Error::schema(path, reason));
            }
            None => {
                let reason = format!("function `{name}` has no `filenames` list");
                return Err(Error::schema(path, reason));
            }
        };

        for raw in &func.regions {
            if raw.len() < 5 {
                let reason =
                    format!("region of `{name}` has {} fields, expected at least 5", raw.len());
                return Err(Error::schema(path, reason));
            }
            let field = |i: usize| -> Result<u64> {
                raw[i].as_u64().ok_or_else(|| {
                    let reason = format!(
                        "region field {i} of `{name}` is not a non-negative integer: {}",
                        raw[i]
                    );
                    Error::schema(path, reason)
                })
            };
            let bound = |i: usize| -> Result<u32> {
                u32::try_from(field(i)?).map_err(|_| {
                    Error::schema(path, format!("region field {i} of `{name}` exceeds u32"))
                })
            };

            let key = SourceRegion {
                file_path: file_path.clone(),
                function_name: name.clone(),
                start_line: bound(0)?,
                start_col: bound(1)?,
                end_line: bound(2)?,
                end_col: bound(3)?,
            };
            let count = field(4)?;
            let total = regions.entry(key).or_insert(0);
            *total = total.checked_add(count).ok_or_else(|| {
                Error::schema(path, format!("hit count of a region of `{name}` overflows u64"))
            })?;
        }
    }

    tracing::debug!(path = %path.display(), regions = regions.len(), "extracted snapshot");
    Ok(regions)
}

/// Sums the region counts of every snapshot in a group.
///
/// Snapshots are parsed on the current rayon pool and merged pairwise;
/// the first failure aborts the whole group.
pub fn aggregate(
    group: Group,
    paths: &[PathBuf],
    module: Option<&str>,
    show_progress: bool,
) -> Result<GroupAggregate> {
    let start = Instant::now();
    let bar = if show_progress {
        ProgressBar::new(paths.len() as u64)
    } else {
        ProgressBar::hidden()
    };
    bar.set_message(format!("Extracting {group} snapshots"));

    let counts = paths
        .par_iter()
        .progress_with(bar.clone())
        .map(|path| extract_region_counts(path, module))
        .try_reduce(RegionCountMap::new, |mut acc, mut counts| {
            if acc.len() < counts.len() {
                std::mem::swap(&mut acc, &mut counts);
            }
            merge_counts(&mut acc, counts)
                .map_err(|region| Error::CountOverflow { group, region: region.to_string() })?;
            Ok(acc)
        })?;
    bar.finish_and_clear();

    tracing::info!(
        %group,
        snapshots = paths.len(),
        regions = counts.len(),
        elapsed = ?start.elapsed(),
        "aggregated group"
    );

    Ok(GroupAggregate { group, counts, snapshots: paths.len() })
}
