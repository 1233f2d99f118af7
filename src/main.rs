// src/main.rs

mod analyzer;
mod cli;
mod demangle;
mod error;
mod index;
mod logging;
mod model;
mod renderer;

use clap::Parser;
use cli::{Args, Command, DiffArgs};
use error::{Error, Result};
use model::Group;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(args.verbose);
    let start_time = Instant::now();

    let outcome = match &args.command {
        Command::Diff(diff) => run_diff(diff, !args.quiet).and_then(|report| {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&report)?;
            stdout.flush()?;
            Ok(())
        }),
        Command::Demangle(d) => demangle::demangle_export(&d.input, &d.output).map(|_| ()),
    };

    match outcome {
        Ok(()) => {
            tracing::info!(elapsed = ?start_time.elapsed(), "done");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Loads the index, aggregates both groups and renders the table into a
/// buffer. Nothing reaches stdout unless every stage succeeded.
fn run_diff(args: &DiffArgs, show_progress: bool) -> Result<Vec<u8>> {
    let index = index::load_index(&args.index_path())?;
    index::require_both_groups(&index)?;

    let paths = |group: Group| -> Vec<PathBuf> {
        index.iterations(group).iter().map(|&i| args.snapshot_path(i)).collect()
    };
    let positive_paths = paths(Group::Positive);
    let negative_paths = paths(Group::Negative);
    let module = args.module.as_deref();

    let aggregate_both = || -> Result<_> {
        let positive =
            analyzer::aggregate(Group::Positive, &positive_paths, module, show_progress)?;
        let negative =
            analyzer::aggregate(Group::Negative, &negative_paths, module, show_progress)?;
        Ok((positive, negative))
    };
    let (positive, negative) = match args.jobs {
        Some(jobs) => rayon::ThreadPoolBuilder::new()
            .num_threads(jobs.max(1))
            .build()
            .map_err(|e| Error::Io(std::io::Error::other(e)))?
            .install(aggregate_both)?,
        None => aggregate_both()?,
    };

    let rows = renderer::diff(&positive, &negative)?;
    let mut report = Vec::new();
    renderer::render(&rows, &mut report)?;
    Ok(report)
}
