// src/demangle.rs

use crate::error::{Error, Result};
use rustc_demangle::demangle;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

// Everything besides the function names passes through untouched.

#[derive(Debug, Deserialize, Serialize)]
struct CoverageExport {
    data: Vec<ExportData>,
    #[serde(flatten)]
    other: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Deserialize, Serialize)]
struct ExportData {
    functions: Vec<ExportFunction>,
    #[serde(flatten)]
    other: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Deserialize, Serialize)]
struct ExportFunction {
    name: String,
    #[serde(flatten)]
    other: serde_json::Map<String, serde_json::Value>,
}

/// Rewrites every function name of an `llvm-cov export` document to its
/// demangled form, without the trailing hash. Returns the number of
/// functions rewritten.
pub fn demangle_export(input: &Path, output: &Path) -> Result<usize> {
    let bytes = fs::read(input).map_err(|e| Error::demangle(input, e))?;
    let mut export: CoverageExport =
        serde_json::from_slice(&bytes).map_err(|e| Error::demangle(input, e))?;

    let mut renamed = 0;
    for data in &mut export.data {
        for func in &mut data.functions {
            func.name = format!("{:#}", demangle(&func.name));
            renamed += 1;
        }
    }

    let json = serde_json::to_vec_pretty(&export).map_err(|e| Error::demangle(output, e))?;
    fs::write(output, json).map_err(|e| Error::demangle(output, e))?;

    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        functions = renamed,
        "demangled export"
    );
    Ok(renamed)
}
