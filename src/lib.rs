pub mod cli;
pub mod compare;
pub mod engine;
pub mod formatter;
pub mod fs;
pub mod harness;
pub mod suite;
pub mod translate;
pub mod validate;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rayon::prelude::*;

use cli::Args;
use formatter::create_formatter;
use fs::discover_suite_files;
use harness::{run_file, run_files};
use validate::{FileValidation, validate_file};

/// Run the suite. Returns the exit code: 0 = all tests passed (or all files
/// valid), 1 = failures or schema violations.
pub fn run(args: Args) -> Result<i32> {
    if let Some(jobs) = args.jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .context("failed to configure worker threads")?;
    }

    let formatter = create_formatter(&args.format);

    if args.validate {
        let files = match args.file {
            Some(ref file) => vec![existing_file(file)?],
            None => discover_suite_files(&args.tests_dir)?,
        };
        if args.debug {
            eprintln!("debug: validating {} files", files.len());
        }
        let results: Vec<FileValidation> = files.par_iter().map(|p| validate_file(p)).collect();
        formatter.print_validation(&results, &args.tests_dir);
        let invalid = results.iter().any(|r| !r.errors.is_empty());
        return Ok(if invalid { 1 } else { 0 });
    }

    // --file: run one suite file with a detailed report
    if let Some(ref file) = args.file {
        let file = existing_file(file)?;
        let report = run_file(&file);
        if args.debug {
            eprintln!(
                "debug: {}: {} tests in {:.0?}",
                file.display(),
                report.tally.total,
                report.elapsed
            );
        }
        formatter.print_file(&report);
        return Ok(if report.passed() { 0 } else { 1 });
    }

    let files = discover_suite_files(&args.tests_dir)?;
    if args.debug {
        eprintln!(
            "debug: {} suite files under {}",
            files.len(),
            args.tests_dir.display()
        );
    }

    let result = run_files(&files, args.debug);
    formatter.print_run(&result, &args.tests_dir, args.verbose);

    Ok(if result.success() { 0 } else { 1 })
}

fn existing_file(path: &Path) -> Result<PathBuf> {
    if !path.is_file() {
        anyhow::bail!("File not found: {}", path.display());
    }
    Ok(path.to_path_buf())
}
