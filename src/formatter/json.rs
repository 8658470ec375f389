use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::formatter::Formatter;
use crate::fs::display_path;
use crate::harness::{FileReport, RunResult};
use crate::validate::FileValidation;

pub struct JsonFormatter;

#[derive(Serialize)]
struct RunOutput {
    summary: Summary,
    files: Vec<FileOutput>,
}

#[derive(Serialize)]
struct Summary {
    total: usize,
    passed: usize,
    failed: usize,
    files: usize,
    passed_files: usize,
}

#[derive(Serialize)]
struct FileOutput {
    path: String,
    passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    cases: Vec<CaseOutput>,
}

#[derive(Serialize)]
struct CaseOutput {
    description: String,
    tests: Vec<TestOutput>,
}

#[derive(Serialize)]
struct TestOutput {
    description: String,
    passed: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    message: String,
}

#[derive(Serialize)]
struct ValidationOutput {
    valid: bool,
    error_count: usize,
    files: Vec<ValidationFile>,
}

#[derive(Serialize)]
struct ValidationFile {
    path: String,
    errors: Vec<String>,
}

fn file_output(report: &FileReport, path: String) -> FileOutput {
    FileOutput {
        path,
        passed: report.passed(),
        error: report.error.clone(),
        cases: report
            .cases
            .iter()
            .map(|c| CaseOutput {
                description: c.description.clone(),
                tests: c
                    .tests
                    .iter()
                    .map(|t| TestOutput {
                        description: t.description.clone(),
                        passed: t.outcome.passed,
                        message: t.outcome.message.clone(),
                    })
                    .collect(),
            })
            .collect(),
    }
}

fn write_json<T: Serialize>(value: &T, out: &mut dyn Write) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            let _ = writeln!(out, "{json}");
        }
        Err(e) => {
            let _ = writeln!(out, "{{\"error\": \"{e}\"}}");
        }
    }
}

impl Formatter for JsonFormatter {
    fn format_run(&self, run: &RunResult, tests_root: &Path, _verbose: bool, out: &mut dyn Write) {
        let output = RunOutput {
            summary: Summary {
                total: run.tally.total,
                passed: run.tally.passed,
                failed: run.tally.failed,
                files: run.files.len(),
                passed_files: run.passed_files(),
            },
            files: run
                .files
                .iter()
                .map(|r| file_output(r, display_path(&r.path, tests_root)))
                .collect(),
        };
        write_json(&output, out);
    }

    fn format_file(&self, report: &FileReport, out: &mut dyn Write) {
        let output = RunOutput {
            summary: Summary {
                total: report.tally.total,
                passed: report.tally.passed,
                failed: report.tally.failed,
                files: 1,
                passed_files: usize::from(report.passed()),
            },
            files: vec![file_output(report, report.path.display().to_string())],
        };
        write_json(&output, out);
    }

    fn format_validation(
        &self,
        results: &[FileValidation],
        tests_root: &Path,
        out: &mut dyn Write,
    ) {
        let error_count = results.iter().map(|r| r.errors.len()).sum();
        let output = ValidationOutput {
            valid: error_count == 0,
            error_count,
            files: results
                .iter()
                .map(|r| ValidationFile {
                    path: display_path(&r.path, tests_root),
                    errors: r.errors.clone(),
                })
                .collect(),
        };
        write_json(&output, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatter::tests::sample_report;

    fn parse(buf: Vec<u8>) -> serde_json::Value {
        serde_json::from_slice(&buf).unwrap()
    }

    #[test]
    fn run_output_structure() {
        let run = RunResult {
            tally: sample_report().tally,
            files: vec![sample_report()],
        };
        let mut buf = Vec::new();
        JsonFormatter.format_run(&run, Path::new("/repo/tests"), false, &mut buf);
        let v = parse(buf);
        assert_eq!(v["summary"]["total"], 2);
        assert_eq!(v["summary"]["failed"], 1);
        assert_eq!(v["summary"]["passed_files"], 0);
        let file = &v["files"][0];
        assert_eq!(file["passed"], false);
        assert!(file.get("error").is_none());
        let tests = file["cases"][0]["tests"].as_array().unwrap();
        assert_eq!(tests.len(), 2);
        assert!(tests[0].get("message").is_none());
        assert_eq!(
            tests[1]["message"],
            "Match count mismatch: expected 1, got 0"
        );
    }

    #[test]
    fn single_file_output() {
        let mut buf = Vec::new();
        JsonFormatter.format_file(&sample_report(), &mut buf);
        let v = parse(buf);
        assert_eq!(v["summary"]["files"], 1);
        assert_eq!(v["files"][0]["path"], "/repo/tests/basic.json");
    }

    #[test]
    fn validation_output() {
        let results = vec![FileValidation {
            path: std::path::PathBuf::from("/repo/tests/a.json"),
            errors: vec!["Root element must be an array".to_string()],
        }];
        let mut buf = Vec::new();
        JsonFormatter.format_validation(&results, Path::new("/repo/tests"), &mut buf);
        let v = parse(buf);
        assert_eq!(v["valid"], false);
        assert_eq!(v["error_count"], 1);
        assert_eq!(v["files"][0]["errors"][0], "Root element must be an array");
    }
}
