//! Drives suites through translation, compilation, search and comparison,
//! and tallies the outcomes.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use fancy_regex::Regex;
use rayon::prelude::*;

use crate::compare::compare;
use crate::engine::{self, CompileError, Flags};
use crate::suite::{Case, ExpectedMatch, Suite, Test, load_suite};
use crate::translate::{to_data, to_pattern};

/// Pass/fail for one test, with a message explaining the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestOutcome {
    pub passed: bool,
    pub message: String,
}

impl TestOutcome {
    fn pass() -> Self {
        Self {
            passed: true,
            message: String::new(),
        }
    }

    fn pass_with(message: impl Into<String>) -> Self {
        Self {
            passed: true,
            message: message.into(),
        }
    }

    fn fail(message: impl Into<String>) -> Self {
        Self {
            passed: false,
            message: message.into(),
        }
    }
}

/// Running test counts. Tallies from independent files or cases combine
/// with [`Tally::merge`], which is associative and commutative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
}

impl Tally {
    pub fn record(&mut self, outcome: &TestOutcome) {
        self.total += 1;
        if outcome.passed {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
    }

    pub fn merge(self, other: Tally) -> Tally {
        Tally {
            total: self.total + other.total,
            passed: self.passed + other.passed,
            failed: self.failed + other.failed,
        }
    }

    /// Percentage of passed tests; 0 for an empty tally.
    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            100.0 * self.passed as f64 / self.total as f64
        }
    }
}

#[derive(Debug, Clone)]
pub struct TestReport {
    pub description: String,
    pub outcome: TestOutcome,
}

#[derive(Debug, Clone)]
pub struct CaseReport {
    pub description: String,
    pub tests: Vec<TestReport>,
}

/// Result of running one suite file.
#[derive(Debug, Clone)]
pub struct FileReport {
    pub path: PathBuf,
    pub cases: Vec<CaseReport>,
    /// Set when the file could not be read or decoded.
    pub error: Option<String>,
    pub tally: Tally,
    pub elapsed: Duration,
}

impl FileReport {
    /// A file passes when it loaded and every test in it passed.
    pub fn passed(&self) -> bool {
        self.error.is_none() && self.tally.failed == 0
    }
}

/// Result of running a set of suite files.
#[derive(Debug, Clone, Default)]
pub struct RunResult {
    pub files: Vec<FileReport>,
    pub tally: Tally,
}

impl RunResult {
    pub fn passed_files(&self) -> usize {
        self.files.iter().filter(|f| f.passed()).count()
    }

    /// The run succeeds when no test failed and every file loaded.
    pub fn success(&self) -> bool {
        self.tally.failed == 0 && self.files.iter().all(|f| f.error.is_none())
    }
}

/// Translate an expectation's text and groups to data form.
fn translate_expected(expected: &ExpectedMatch) -> ExpectedMatch {
    ExpectedMatch {
        start: expected.start,
        end: expected.end,
        text: to_data(&expected.text),
        groups: expected
            .groups
            .as_ref()
            .map(|groups| groups.iter().map(|g| g.as_deref().map(to_data)).collect()),
    }
}

/// Run one test against its case's compiled pattern.
pub fn run_test(compiled: &Result<Regex, CompileError>, global: bool, test: &Test) -> TestOutcome {
    let regex = match compiled {
        Ok(regex) => regex,
        Err(_) if test.matches.is_empty() => {
            return TestOutcome::pass_with("Invalid pattern correctly rejected");
        }
        Err(e) => return TestOutcome::fail(format!("Failed to compile pattern: {e}")),
    };

    let input = to_data(&test.input);
    let expected: Vec<ExpectedMatch> = test.matches.iter().map(translate_expected).collect();

    let actual = match engine::execute(regex, &input, global) {
        Ok(actual) => actual,
        Err(e) => return TestOutcome::fail(format!("Match failed: {e}")),
    };

    if actual.len() != expected.len() {
        return TestOutcome::fail(format!(
            "Match count mismatch: expected {}, got {}",
            expected.len(),
            actual.len()
        ));
    }

    for (i, (act, exp)) in actual.iter().zip(&expected).enumerate() {
        if let Err(mismatch) = compare(act, exp) {
            return TestOutcome::fail(format!("Match {i}: {mismatch}"));
        }
    }

    TestOutcome::pass()
}

/// Run every test of a case. The pattern is translated and compiled once.
pub fn run_case(case: &Case, tally: &mut Tally) -> CaseReport {
    let flags = Flags::parse(&case.flags);
    let compiled = engine::compile(&to_pattern(&case.pattern), flags);

    let tests = case
        .tests
        .iter()
        .map(|test| {
            let outcome = run_test(&compiled, flags.global, test);
            tally.record(&outcome);
            TestReport {
                description: test.description.clone(),
                outcome,
            }
        })
        .collect();

    CaseReport {
        description: case.description.clone(),
        tests,
    }
}

/// Run every case of an already-loaded suite.
pub fn run_suite(suite: &Suite) -> (Vec<CaseReport>, Tally) {
    let mut tally = Tally::default();
    let cases = suite.iter().map(|case| run_case(case, &mut tally)).collect();
    (cases, tally)
}

/// Load and run one suite file. Load failures are reported on the file,
/// not returned as errors.
pub fn run_file(path: &Path) -> FileReport {
    let start = Instant::now();
    let (cases, tally, error) = match load_suite(path) {
        Ok(suite) => {
            let (cases, tally) = run_suite(&suite);
            (cases, tally, None)
        }
        Err(e) => (Vec::new(), Tally::default(), Some(format!("{e:#}"))),
    };
    FileReport {
        path: path.to_path_buf(),
        cases,
        error,
        tally,
        elapsed: start.elapsed(),
    }
}

/// Run suite files in parallel. Reports keep the order of `files`.
pub fn run_files(files: &[PathBuf], debug: bool) -> RunResult {
    let wall_start = Instant::now();

    let reports: Vec<FileReport> = files.par_iter().map(|path| run_file(path)).collect();
    let tally = reports
        .par_iter()
        .map(|r| r.tally)
        .reduce(Tally::default, Tally::merge);

    if debug {
        for r in &reports {
            eprintln!(
                "debug: {}: {} tests in {:.0?}",
                r.path.display(),
                r.tally.total,
                r.elapsed
            );
        }
        eprintln!(
            "debug: {} files, {} tests, wall clock {:.0?}",
            reports.len(),
            tally.total,
            wall_start.elapsed()
        );
    }

    RunResult {
        files: reports,
        tally,
    }
}
