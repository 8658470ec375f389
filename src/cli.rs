use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "regex-suite",
    version,
    about = "Run declarative regular-expression conformance suites"
)]
pub struct Args {
    /// Root directory searched recursively for `*.json` suite files
    #[arg(long, value_name = "DIR", default_value = "tests")]
    pub tests_dir: PathBuf,

    /// Run a single suite file with a detailed per-test report
    #[arg(short, long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Show every case and test in the suite report
    #[arg(short, long)]
    pub verbose: bool,

    /// Check suite files for structural problems without running them
    #[arg(long)]
    pub validate: bool,

    /// Output format
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    pub format: String,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,

    /// Number of worker threads for running suite files (default: one per CPU)
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,
}
