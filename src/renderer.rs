// src/renderer.rs

use crate::error::{Error, Result};
use crate::model::*;
use std::collections::BTreeSet;
use std::io::Write;
use std::path::Path;

const LABEL_WIDTH: usize = 60;
const VALUE_WIDTH: usize = 8;
const RULE_WIDTH: usize = 84;

/// One region whose mean hit count is higher in the negative group.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionDelta {
    pub region: SourceRegion,
    pub pos_mean: f64,
    pub neg_mean: f64,
    pub delta: f64,
}

impl RegionDelta {
    /// `(function)basename:start_line:start_col -> end_line:end_col`
    pub fn label(&self) -> String {
        let r = &self.region;
        let basename = Path::new(&r.file_path)
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or(&r.file_path);
        format!(
            "({}){}:{}:{} -> {}:{}",
            r.function_name, basename, r.start_line, r.start_col, r.end_line, r.end_col
        )
    }
}

/// Two-decimal rounding with ties to even, so an exact half cent such as
/// 0.125 becomes 0.12.
fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Compares two group aggregates over the union of their regions.
///
/// Both means are rounded to two decimals before subtracting, and the
/// difference is rounded again; only strictly positive deltas survive.
/// Rows come out in region order.
pub fn diff(positive: &GroupAggregate, negative: &GroupAggregate) -> Result<Vec<RegionDelta>> {
    for agg in [positive, negative] {
        if agg.snapshots == 0 {
            return Err(Error::EmptyGroup { group: agg.group });
        }
    }

    let universe: BTreeSet<&SourceRegion> =
        positive.counts.keys().chain(negative.counts.keys()).collect();

    let rows: Vec<RegionDelta> = universe
        .into_iter()
        .filter_map(|region| {
            let pos_mean = round2(positive.mean(region));
            let neg_mean = round2(negative.mean(region));
            let delta = round2(neg_mean - pos_mean);
            (delta > 0.0).then(|| RegionDelta {
                region: region.clone(),
                pos_mean,
                neg_mean,
                delta,
            })
        })
        .collect();

    tracing::info!(
        positive_regions = positive.counts.len(),
        negative_regions = negative.counts.len(),
        rows = rows.len(),
        "computed coverage deltas"
    );
    Ok(rows)
}

/// Writes the fixed-width table: header, rule, one line per row.
pub fn render<W: Write>(rows: &[RegionDelta], out: &mut W) -> std::io::Result<()> {
    let (l, w) = (LABEL_WIDTH, VALUE_WIDTH);
    writeln!(out, "{:l$} {:>w$} {:>w$} {:>w$}", "File:Line", "Pos", "Neg", "Δ")?;
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
    for row in rows {
        writeln!(
            out,
            "{:l$} {:>w$.2} {:>w$.2} {:>+w$.2}",
            row.label(),
            row.pos_mean,
            row.neg_mean,
            row.delta
        )?;
    }
    Ok(())
}
