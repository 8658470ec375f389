//! Typed model of a suite file.
//!
//! A suite file is a JSON array of cases. Each level of the hierarchy is
//! decoded into its own struct so that optional fields keep their
//! presence/absence distinction: an expected match without a `groups` key
//! decodes to `groups: None`, which is not the same as `Some(vec![])`.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// One suite file: cases in file order.
pub type Suite = Vec<Case>;

/// One pattern + flags scenario, exercised by one or more tests.
#[derive(Debug, Clone, Deserialize)]
pub struct Case {
    pub description: String,
    pub pattern: String,
    #[serde(default)]
    pub flags: String,
    pub tests: Vec<Test>,
}

/// One input string run against the case's pattern.
#[derive(Debug, Clone, Deserialize)]
pub struct Test {
    pub description: String,
    pub input: String,
    pub matches: Vec<ExpectedMatch>,
}

/// An expected occurrence of the pattern within a test's input.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExpectedMatch {
    pub start: usize,
    pub end: usize,
    #[serde(rename = "match")]
    pub text: String,
    /// `None` when the key is absent (groups are not checked at all).
    /// Entries are `None` for a JSON `null`, i.e. a group that must not
    /// have participated in the match.
    #[serde(default)]
    pub groups: Option<Vec<Option<String>>>,
}

/// Read and decode a suite file.
pub fn load_suite(path: &Path) -> Result<Suite> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_suite(&content).with_context(|| format!("failed to parse {}", path.display()))
}

/// Decode suite JSON text.
pub fn parse_suite(content: &str) -> Result<Suite> {
    Ok(serde_json::from_str(content)?)
}
