//! Field-by-field comparison of one actual match against one expectation.

use std::fmt;

use crate::engine::ActualMatch;
use crate::suite::ExpectedMatch;

/// The first field that differs, with both values rendered for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mismatch {
    Start { expected: usize, actual: usize },
    End { expected: usize, actual: usize },
    Text { expected: String, actual: String },
    GroupCount { expected: usize, actual: usize },
    /// `index` is 1-based, as groups are numbered in patterns.
    Group {
        index: usize,
        expected: Option<String>,
        actual: Option<String>,
    },
}

impl Mismatch {
    /// Name of the mismatched field.
    pub fn field(&self) -> &'static str {
        match self {
            Mismatch::Start { .. } => "start",
            Mismatch::End { .. } => "end",
            Mismatch::Text { .. } => "match",
            Mismatch::GroupCount { .. } | Mismatch::Group { .. } => "groups",
        }
    }
}

fn group_repr(group: &Option<String>) -> String {
    match group {
        Some(text) => format!("'{text}'"),
        None => "null".to_string(),
    }
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mismatch::Start { expected, actual } => write!(
                f,
                "Start position mismatch: expected {expected}, got {actual}"
            ),
            Mismatch::End { expected, actual } => write!(
                f,
                "End position mismatch: expected {expected}, got {actual}"
            ),
            Mismatch::Text { expected, actual } => write!(
                f,
                "Match text mismatch: expected '{expected}', got '{actual}'"
            ),
            Mismatch::GroupCount { expected, actual } => write!(
                f,
                "Group count mismatch: expected {expected}, got {actual}"
            ),
            Mismatch::Group {
                index,
                expected,
                actual,
            } => write!(
                f,
                "Group {index} mismatch: expected {}, got {}",
                group_repr(expected),
                group_repr(actual)
            ),
        }
    }
}

/// Compare `actual` against an already-translated expectation.
///
/// Fields are checked in order start, end, match text, then groups, and the
/// first difference is returned. Groups are only inspected when the
/// expectation declares them.
pub fn compare(actual: &ActualMatch, expected: &ExpectedMatch) -> Result<(), Mismatch> {
    if actual.start != expected.start {
        return Err(Mismatch::Start {
            expected: expected.start,
            actual: actual.start,
        });
    }
    if actual.end != expected.end {
        return Err(Mismatch::End {
            expected: expected.end,
            actual: actual.end,
        });
    }
    if actual.text != expected.text {
        return Err(Mismatch::Text {
            expected: expected.text.clone(),
            actual: actual.text.clone(),
        });
    }

    let Some(expected_groups) = &expected.groups else {
        return Ok(());
    };
    if expected_groups.len() != actual.groups.len() {
        return Err(Mismatch::GroupCount {
            expected: expected_groups.len(),
            actual: actual.groups.len(),
        });
    }
    for (i, (exp, act)) in expected_groups.iter().zip(&actual.groups).enumerate() {
        if exp != act {
            return Err(Mismatch::Group {
                index: i + 1,
                expected: exp.clone(),
                actual: act.clone(),
            });
        }
    }
    Ok(())
}
