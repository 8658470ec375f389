pub mod json;
pub mod text;

use std::io::Write;
use std::path::Path;

use crate::harness::{FileReport, RunResult};
use crate::validate::FileValidation;

pub trait Formatter {
    /// Report for a whole suite run. `verbose` adds per-case/per-test lines.
    fn format_run(&self, run: &RunResult, tests_root: &Path, verbose: bool, out: &mut dyn Write);

    /// Detailed report for a single suite file.
    fn format_file(&self, report: &FileReport, out: &mut dyn Write);

    /// Report for schema validation of the suite tree.
    fn format_validation(
        &self,
        results: &[FileValidation],
        tests_root: &Path,
        out: &mut dyn Write,
    );

    fn print_run(&self, run: &RunResult, tests_root: &Path, verbose: bool) {
        let stdout = std::io::stdout();
        let mut lock = stdout.lock();
        self.format_run(run, tests_root, verbose, &mut lock);
    }

    fn print_file(&self, report: &FileReport) {
        let stdout = std::io::stdout();
        let mut lock = stdout.lock();
        self.format_file(report, &mut lock);
    }

    fn print_validation(&self, results: &[FileValidation], tests_root: &Path) {
        let stdout = std::io::stdout();
        let mut lock = stdout.lock();
        self.format_validation(results, tests_root, &mut lock);
    }
}

pub fn create_formatter(format: &str) -> Box<dyn Formatter> {
    match format {
        "json" => Box::new(json::JsonFormatter),
        // "text" and any unknown value
        _ => Box::new(text::TextFormatter),
    }
}
