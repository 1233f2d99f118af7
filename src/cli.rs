// src/cli.rs

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Log debug events (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Hide progress bars
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compare coverage of positive and negative runs, region by region
    Diff(DiffArgs),
    /// Demangle the function names of a raw llvm-cov JSON export
    Demangle(DemangleArgs),
}

#[derive(clap::Args, Debug)]
pub struct DiffArgs {
    /// Directory holding indices.json
    #[arg(long, default_value = "target/llvm-cov-target")]
    pub coverage_dir: PathBuf,

    /// Directory holding the demangled snapshot_iteration_<i>.json files
    #[arg(long, default_value = "jsondata/demangled")]
    pub snapshot_dir: PathBuf,

    /// Only count functions whose name contains this substring
    #[arg(long)]
    pub module: Option<String>,

    /// Number of worker threads used to parse snapshots
    #[arg(short, long)]
    pub jobs: Option<usize>,
}

impl DiffArgs {
    pub fn index_path(&self) -> PathBuf {
        self.coverage_dir.join("indices.json")
    }

    pub fn snapshot_path(&self, iteration: u64) -> PathBuf {
        snapshot_path(&self.snapshot_dir, iteration)
    }
}

#[derive(clap::Args, Debug)]
pub struct DemangleArgs {
    /// Raw export produced by `llvm-cov export -format=text`
    pub input: PathBuf,

    /// Where to write the demangled export
    pub output: PathBuf,
}

pub fn snapshot_path(dir: &Path, iteration: u64) -> PathBuf {
    dir.join(format!("snapshot_iteration_{iteration}.json"))
}
