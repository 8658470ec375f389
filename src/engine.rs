//! Flag mapping, pattern compilation and match search.
//!
//! Patterns are compiled with `fancy-regex`, which layers backreferences
//! and lookaround over the `regex` crate. Engines that guarantee linear
//! time (plain `regex`) reject backreferences outright, so suites that use
//! `@[backref:...]` need the backtracking engine.
//!
//! Offsets reported in an [`ActualMatch`] are character offsets, matching
//! how suite files count `start` and `end`.

use std::fmt;

use fancy_regex::{Captures, Regex, RegexBuilder};

/// Upper bound on backtracking steps for a single search.
const BACKTRACK_LIMIT: usize = 1_000_000;

/// Options decoded from a case's `flags` string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flags {
    /// `i`
    pub case_insensitive: bool,
    /// `m`: `^`/`$` match at line boundaries.
    pub multi_line: bool,
    /// `s`: `.` matches `\n`.
    pub dot_matches_new_line: bool,
    /// `x`: free-spacing syntax.
    pub ignore_whitespace: bool,
    /// `u`: Unicode-aware classes.
    pub unicode: bool,
    /// `g`: report every non-overlapping match. Not a compiler option.
    pub global: bool,
}

impl Flags {
    /// Decode a flags string. Unknown characters are ignored and repeats
    /// are harmless.
    pub fn parse(flags: &str) -> Flags {
        let mut out = Flags::default();
        for c in flags.chars() {
            match c {
                'i' => out.case_insensitive = true,
                'm' => out.multi_line = true,
                's' => out.dot_matches_new_line = true,
                'x' => out.ignore_whitespace = true,
                'u' => out.unicode = true,
                'g' => out.global = true,
                _ => {}
            }
        }
        out
    }

    /// Inline flag group applying the compiler options, e.g. `(?is)`.
    /// Empty when no compiler option is set.
    pub fn inline_group(&self) -> String {
        let letters: String = [
            (self.case_insensitive, 'i'),
            (self.multi_line, 'm'),
            (self.dot_matches_new_line, 's'),
            (self.ignore_whitespace, 'x'),
            (self.unicode, 'u'),
        ]
        .iter()
        .filter(|(on, _)| *on)
        .map(|(_, c)| *c)
        .collect();
        if letters.is_empty() {
            String::new()
        } else {
            format!("(?{letters})")
        }
    }
}

/// The pattern was rejected by the compiler after translation.
#[derive(Debug)]
pub struct CompileError(fancy_regex::Error);

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for CompileError {}

/// The engine gave up during a search (e.g. backtrack limit exceeded).
#[derive(Debug)]
pub struct MatchError(fancy_regex::Error);

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for MatchError {}

/// One match as reported by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActualMatch {
    /// Character offset of the match start.
    pub start: usize,
    /// Character offset one past the match end.
    pub end: usize,
    pub text: String,
    /// Capture groups 1..n; `None` for a group that did not participate.
    pub groups: Vec<Option<String>>,
}

/// Compile an already-translated pattern with the given options.
pub fn compile(pattern: &str, flags: Flags) -> Result<Regex, CompileError> {
    let full = format!("{}{pattern}", flags.inline_group());
    RegexBuilder::new(&full)
        .backtrack_limit(BACKTRACK_LIMIT)
        .build()
        .map_err(CompileError)
}

/// Search `data` for matches.
///
/// With `global`, returns every non-overlapping match left to right;
/// otherwise at most the first match.
pub fn execute(regex: &Regex, data: &str, global: bool) -> Result<Vec<ActualMatch>, MatchError> {
    if !global {
        let first = regex.captures(data).map_err(MatchError)?;
        return Ok(first.map(|caps| to_actual(&caps, data)).into_iter().collect());
    }

    // An empty match is allowed right where the previous non-empty match
    // ended; after an empty match the search moves on by one character.
    let mut matches = Vec::new();
    let mut pos = 0;
    while pos <= data.len() {
        let Some(caps) = regex.captures_from_pos(data, pos).map_err(MatchError)? else {
            break;
        };
        let Some(whole) = caps.get(0) else {
            break;
        };
        let end = whole.end();
        let empty = whole.start() == end;
        matches.push(to_actual(&caps, data));
        pos = if empty {
            match data[end..].chars().next() {
                Some(c) => end + c.len_utf8(),
                None => break,
            }
        } else {
            end
        };
    }
    Ok(matches)
}

fn to_actual(caps: &Captures<'_>, data: &str) -> ActualMatch {
    let (start, end, text) = match caps.get(0) {
        Some(m) => (m.start(), m.end(), m.as_str().to_string()),
        None => (0, 0, String::new()),
    };
    let groups = (1..caps.len())
        .map(|i| caps.get(i).map(|m| m.as_str().to_string()))
        .collect();
    ActualMatch {
        start: char_offset(data, start),
        end: char_offset(data, end),
        text,
        groups,
    }
}

/// Convert a byte offset on a char boundary into a character offset.
fn char_offset(data: &str, byte: usize) -> usize {
    data.get(..byte).map_or(byte, |prefix| prefix.chars().count())
}
