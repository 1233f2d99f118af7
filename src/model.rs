// src/model.rs

use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;

/// A contiguous span of source attributed a hit count.
///
/// Field order is significant: the derived `Ord` sorts by file, then
/// function, then the four bounds, which is the report order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceRegion {
    pub file_path: String,
    pub function_name: String,
    pub start_line: u32,
    pub start_col: u32,
    pub end_line: u32,
    pub end_col: u32,
}

impl fmt::Display for SourceRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}){}:{}:{} -> {}:{}",
            self.function_name,
            self.file_path,
            self.start_line,
            self.start_col,
            self.end_line,
            self.end_col
        )
    }
}

/// Hit counts keyed by region, for one snapshot or a whole group
pub type RegionCountMap = HashMap<SourceRegion, u64>;

/// Adds every count of `other` into `into`. A sum that would overflow
/// stops the merge and hands back the region it happened on.
pub fn merge_counts(
    into: &mut RegionCountMap,
    other: RegionCountMap,
) -> std::result::Result<(), SourceRegion> {
    for (region, count) in other {
        match into.get_mut(&region) {
            Some(total) => *total = total.checked_add(count).ok_or(region)?,
            None => {
                into.insert(region, count);
            }
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Group {
    Positive,
    Negative,
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Group::Positive => f.write_str("positive"),
            Group::Negative => f.write_str("negative"),
        }
    }
}

/// Summed counts of every snapshot in one group.
#[derive(Debug, Clone)]
pub struct GroupAggregate {
    pub group: Group,
    pub counts: RegionCountMap,
    pub snapshots: usize,
}

impl GroupAggregate {
    /// Mean hit count per snapshot, 0 for regions the group never saw.
    /// Callers must have rejected empty groups.
    pub fn mean(&self, region: &SourceRegion) -> f64 {
        let total = self.counts.get(region).copied().unwrap_or(0);
        total as f64 / self.snapshots as f64
    }
}

/// Which snapshot iterations passed and which failed.
#[derive(Debug, Clone, Deserialize)]
pub struct ExecutionIndex {
    pub positives: Vec<u64>,
    pub negatives: Vec<u64>,
    #[serde(default)]
    pub positive_examples: Vec<String>,
    #[serde(default)]
    pub negative_examples: Vec<String>,
}

impl ExecutionIndex {
    pub fn iterations(&self, group: Group) -> &[u64] {
        match group {
            Group::Positive => &self.positives,
            Group::Negative => &self.negatives,
        }
    }
}

// Shapes of an `llvm-cov export` document. Only the fields we read are
// modelled, the rest is skipped by serde.

#[derive(Debug, Deserialize)]
pub struct CoverageSnapshot {
    pub data: Vec<CoverageEntry>,
}

#[derive(Debug, Deserialize)]
pub struct CoverageEntry {
    pub functions: Vec<FunctionRecord>,
}

#[derive(Debug, Deserialize)]
pub struct FunctionRecord {
    pub name: String,
    /// Optional here so a missing list is reported as a schema problem
    /// rather than a parse failure.
    pub filenames: Option<Vec<String>>,
    #[serde(default)]
    pub regions: Vec<Vec<serde_json::Value>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(file: &str, func: &str, bounds: [u32; 4]) -> SourceRegion {
        SourceRegion {
            file_path: file.to_string(),
            function_name: func.to_string(),
            start_line: bounds[0],
            start_col: bounds[1],
            end_line: bounds[2],
            end_col: bounds[3],
        }
    }

    #[test]
    fn regions_order_by_file_then_function_then_bounds() {
        let mut regions = vec![
            region("b.rs", "a", [1, 1, 1, 1]),
            region("a.rs", "z", [1, 1, 1, 1]),
            region("a.rs", "a", [2, 1, 3, 1]),
            region("a.rs", "a", [2, 1, 2, 9]),
            region("a.rs", "a", [1, 5, 1, 6]),
        ];
        regions.sort();
        let keys: Vec<_> = regions
            .iter()
            .map(|r| {
                let (file, func) = (r.file_path.as_str(), r.function_name.as_str());
                (file, func, r.start_line, r.end_line, r.end_col)
            })
            .collect();
        assert_eq!(
            keys,
            vec![
                ("a.rs", "a", 1, 1, 6),
                ("a.rs", "a", 2, 2, 9),
                ("a.rs", "a", 2, 3, 1),
                ("a.rs", "z", 1, 1, 1),
                ("b.rs", "a", 1, 1, 1),
            ]
        );
    }

    #[test]
    fn paths_are_not_normalized() {
        let a = region("src/lib.rs", "f", [1, 1, 2, 2]);
        let b = region("./src/lib.rs", "f", [1, 1, 2, 2]);
        assert_ne!(a, b);
    }

    #[test]
    fn merge_adds_counts() {
        let r = region("a.rs", "f", [1, 1, 2, 2]);
        let mut total = RegionCountMap::from([(r.clone(), 3)]);
        merge_counts(&mut total, RegionCountMap::from([(r.clone(), 4)])).unwrap();
        assert_eq!(total[&r], 7);
    }

    #[test]
    fn merge_reports_overflowing_region() {
        let r = region("a.rs", "f", [1, 1, 2, 2]);
        let mut total = RegionCountMap::from([(r.clone(), u64::MAX)]);
        let err = merge_counts(&mut total, RegionCountMap::from([(r.clone(), 1)])).unwrap_err();
        assert_eq!(err, r);
        assert_eq!(err.to_string(), "(f)a.rs:1:1 -> 2:2");
    }

    #[test]
    fn mean_defaults_to_zero() {
        let r = region("a.rs", "f", [1, 1, 2, 2]);
        let agg = GroupAggregate {
            group: Group::Positive,
            counts: RegionCountMap::from([(r.clone(), 9)]),
            snapshots: 2,
        };
        assert_eq!(agg.mean(&r), 4.5);
        assert_eq!(agg.mean(&region("a.rs", "g", [1, 1, 2, 2])), 0.0);
    }

    #[test]
    fn index_examples_are_optional() {
        let index: ExecutionIndex =
            serde_json::from_str(r#"{"positives":[1,2],"negatives":[0]}"#).unwrap();
        assert_eq!(index.iterations(Group::Positive), &[1, 2]);
        assert_eq!(index.iterations(Group::Negative), &[0]);
        assert!(index.negative_examples.is_empty());
    }
}
