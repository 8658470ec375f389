use std::io::Write;
use std::path::Path;

use crate::formatter::Formatter;
use crate::fs::display_path;
use crate::harness::{FileReport, RunResult};
use crate::validate::FileValidation;

const RULE_WIDTH: usize = 70;

pub struct TextFormatter;

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

/// Per-case and per-test lines for one file.
fn write_details(report: &FileReport, out: &mut dyn Write) {
    if let Some(ref error) = report.error {
        let _ = writeln!(out, "  error: {error}");
        return;
    }
    for case in &report.cases {
        let _ = writeln!(out, "  {}", case.description);
        for test in &case.tests {
            let status = if test.outcome.passed { "OK" } else { "FAILED" };
            let _ = writeln!(out, "    {status} {}", test.description);
            if !test.outcome.passed {
                let _ = writeln!(out, "      {}", test.outcome.message);
            }
        }
    }
}

impl Formatter for TextFormatter {
    fn format_run(&self, run: &RunResult, tests_root: &Path, verbose: bool, out: &mut dyn Write) {
        let _ = writeln!(out, "Running Regex Test Suite");
        let _ = writeln!(out, "Found {} test files", run.files.len());
        let _ = writeln!(out);

        for report in &run.files {
            let _ = writeln!(out, "{}", display_path(&report.path, tests_root));
            if verbose || report.error.is_some() {
                write_details(report, out);
            } else if report.passed() {
                let _ = writeln!(out, "All tests passed");
            } else {
                let _ = writeln!(out, "Some tests failed");
            }
            let _ = writeln!(out);
        }

        let tally = run.tally;
        let _ = writeln!(out, "Total Tests: {}", tally.total);
        let _ = writeln!(out, "Passed: {} ({:.1}%)", tally.passed, tally.pass_rate());
        let _ = writeln!(out, "Failed: {}", tally.failed);
        let _ = writeln!(
            out,
            "Files: {}/{} passed",
            run.passed_files(),
            run.files.len()
        );
    }

    fn format_file(&self, report: &FileReport, out: &mut dyn Write) {
        let name = report
            .path
            .file_name()
            .map_or_else(|| report.path.display().to_string(), |n| n.to_string_lossy().into_owned());
        let _ = writeln!(out, "Running tests from {name}");
        let _ = writeln!(out, "{}", rule());
        let _ = writeln!(out);

        write_details(report, out);

        let _ = writeln!(out);
        let _ = writeln!(out, "{}", rule());
        let _ = writeln!(out, "Total: {} tests", report.tally.total);
        let _ = writeln!(out, "Passed: {}", report.tally.passed);
        let _ = writeln!(out, "Failed: {}", report.tally.failed);
    }

    fn format_validation(
        &self,
        results: &[FileValidation],
        tests_root: &Path,
        out: &mut dyn Write,
    ) {
        if results.is_empty() {
            let _ = writeln!(
                out,
                "Warning: No test files found in {}",
                tests_root.display()
            );
            return;
        }

        let _ = writeln!(out, "Validating {} test files...", results.len());
        let _ = writeln!(out);

        let mut total_errors = 0;
        let mut files_with_errors = 0;
        for result in results {
            let _ = writeln!(out, "{}", display_path(&result.path, tests_root));
            if !result.errors.is_empty() {
                files_with_errors += 1;
                total_errors += result.errors.len();
                for error in &result.errors {
                    let _ = writeln!(out, "  - {error}");
                }
                let _ = writeln!(out);
            }
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "{}", rule());
        if total_errors == 0 {
            let _ = writeln!(out, "All test files are valid!");
        } else {
            let _ = writeln!(
                out,
                "Found {total_errors} error(s) in {files_with_errors} file(s)"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatter::tests::sample_report;
    use crate::harness::Tally;
    use std::path::PathBuf;

    fn render_run(run: &RunResult, verbose: bool) -> String {
        let mut buf = Vec::new();
        TextFormatter.format_run(run, Path::new("/repo/tests"), verbose, &mut buf);
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn run_summary() {
        let run = RunResult {
            tally: sample_report().tally,
            files: vec![sample_report()],
        };
        let out = render_run(&run, false);
        assert!(out.starts_with("Running Regex Test Suite\nFound 1 test files\n"));
        assert!(out.contains("Some tests failed"));
        assert!(out.contains("Total Tests: 2\nPassed: 1 (50.0%)\nFailed: 1\nFiles: 0/1 passed\n"));
        assert!(!out.contains("FAILED"));
    }

    #[test]
    fn verbose_run_lists_tests() {
        let run = RunResult {
            tally: sample_report().tally,
            files: vec![sample_report()],
        };
        let out = render_run(&run, true);
        assert!(out.contains("  literal\n    OK finds a\n    FAILED finds b\n      Match count mismatch"));
    }

    #[test]
    fn empty_run_has_zero_rate() {
        let out = render_run(&RunResult::default(), false);
        assert!(out.contains("Passed: 0 (0.0%)"));
    }

    #[test]
    fn load_error_is_shown() {
        let mut report = sample_report();
        report.cases.clear();
        report.tally = Tally::default();
        report.error = Some("failed to parse".to_string());
        let run = RunResult {
            tally: Tally::default(),
            files: vec![report],
        };
        let out = render_run(&run, false);
        assert!(out.contains("  error: failed to parse"));
        assert!(out.contains("Files: 0/1 passed"));
    }

    #[test]
    fn single_file_report() {
        let mut buf = Vec::new();
        TextFormatter.format_file(&sample_report(), &mut buf);
        let out = String::from_utf8(buf).unwrap();
        assert!(out.starts_with("Running tests from basic.json\n"));
        assert!(out.contains("    FAILED finds b\n"));
        assert!(out.ends_with("Total: 2 tests\nPassed: 1\nFailed: 1\n"));
    }

    #[test]
    fn validation_report() {
        let results = vec![
            FileValidation {
                path: PathBuf::from("/repo/tests/a.json"),
                errors: vec![],
            },
            FileValidation {
                path: PathBuf::from("/repo/tests/b.json"),
                errors: vec![
                    "Root element must be an array".to_string(),
                ],
            },
        ];
        let mut buf = Vec::new();
        TextFormatter.format_validation(&results, Path::new("/repo/tests"), &mut buf);
        let out = String::from_utf8(buf).unwrap();
        assert!(out.starts_with("Validating 2 test files...\n"));
        assert!(out.contains("  - Root element must be an array\n"));
        assert!(out.ends_with("Found 1 error(s) in 1 file(s)\n"));
    }

    #[test]
    fn validation_of_empty_tree_warns() {
        let mut buf = Vec::new();
        TextFormatter.format_validation(&[], Path::new("/repo/tests"), &mut buf);
        let out = String::from_utf8(buf).unwrap();
        assert_eq!(out, "Warning: No test files found in /repo/tests\n");
    }
}
