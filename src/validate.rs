//! Structural validation of suite files.
//!
//! Works on untyped JSON so that every violation in a file can be reported
//! at once, rather than stopping at the first field serde cannot decode.
//! No translation or matching happens here.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

/// Violations found in one file. Empty means the file is valid.
#[derive(Debug, Clone)]
pub struct FileValidation {
    pub path: PathBuf,
    pub errors: Vec<String>,
}

/// Validate one suite file from disk.
pub fn validate_file(path: &Path) -> FileValidation {
    let errors = match std::fs::read_to_string(path) {
        Ok(content) => validate_suite_text(&content),
        Err(e) => vec![format!("Error reading file: {e}")],
    };
    FileValidation {
        path: path.to_path_buf(),
        errors,
    }
}

/// Validate suite JSON text, collecting every violation.
pub fn validate_suite_text(content: &str) -> Vec<String> {
    let data: Value = match serde_json::from_str(content) {
        Ok(v) => v,
        Err(e) => return vec![format!("Invalid JSON: {e}")],
    };
    let Some(cases) = data.as_array() else {
        return vec!["Root element must be an array".to_string()];
    };

    let mut errors = Vec::new();
    for (idx, case) in cases.iter().enumerate() {
        validate_case(&format!("Test case {idx}: "), case, &mut errors);
    }
    errors
}

fn require(prefix: &str, obj: &Map<String, Value>, fields: &[&str], errors: &mut Vec<String>) {
    for field in fields {
        if !obj.contains_key(*field) {
            errors.push(format!("{prefix}Missing required field '{field}'"));
        }
    }
}

fn check_string(prefix: &str, obj: &Map<String, Value>, field: &str, errors: &mut Vec<String>) {
    if obj.get(field).is_some_and(|v| !v.is_string()) {
        errors.push(format!("{prefix}'{field}' must be a string"));
    }
}

fn validate_case(prefix: &str, case: &Value, errors: &mut Vec<String>) {
    let Some(obj) = case.as_object() else {
        errors.push(format!("{prefix}Must be an object"));
        return;
    };
    require(prefix, obj, &["description", "pattern", "tests"], errors);

    match obj.get("description") {
        Some(Value::String(s)) if s.trim().is_empty() => {
            errors.push(format!("{prefix}'description' cannot be empty"));
        }
        Some(Value::String(_)) | None => {}
        Some(_) => errors.push(format!("{prefix}'description' must be a string")),
    }
    check_string(prefix, obj, "pattern", errors);
    check_string(prefix, obj, "flags", errors);

    match obj.get("tests") {
        None => {}
        Some(Value::Array(tests)) if tests.is_empty() => {
            errors.push(format!("{prefix}'tests' array cannot be empty"));
        }
        Some(Value::Array(tests)) => {
            for (idx, test) in tests.iter().enumerate() {
                validate_test(&format!("{prefix}Test {idx}: "), test, errors);
            }
        }
        Some(_) => errors.push(format!("{prefix}'tests' must be an array")),
    }
}

fn validate_test(prefix: &str, test: &Value, errors: &mut Vec<String>) {
    let Some(obj) = test.as_object() else {
        errors.push(format!("{prefix}Must be an object"));
        return;
    };
    require(prefix, obj, &["description", "input", "matches"], errors);
    check_string(prefix, obj, "description", errors);
    check_string(prefix, obj, "input", errors);

    match obj.get("matches") {
        None => {}
        Some(Value::Array(matches)) => {
            for (idx, m) in matches.iter().enumerate() {
                validate_match(&format!("{prefix}Match {idx}: "), m, errors);
            }
        }
        Some(_) => errors.push(format!("{prefix}'matches' must be an array")),
    }
}

/// Check an offset field; returns its value when it is a valid integer.
fn check_offset(
    prefix: &str,
    obj: &Map<String, Value>,
    field: &str,
    errors: &mut Vec<String>,
) -> Option<i64> {
    let value = obj.get(field)?;
    if !(value.is_i64() || value.is_u64()) {
        errors.push(format!("{prefix}'{field}' must be an integer"));
        return None;
    }
    // u64 values beyond i64 range are large and non-negative.
    let n = value.as_i64().unwrap_or(i64::MAX);
    if n < 0 {
        errors.push(format!("{prefix}'{field}' must be non-negative"));
    }
    Some(n)
}

fn validate_match(prefix: &str, m: &Value, errors: &mut Vec<String>) {
    let Some(obj) = m.as_object() else {
        errors.push(format!("{prefix}Must be an object"));
        return;
    };
    require(prefix, obj, &["start", "end", "match"], errors);

    let start = check_offset(prefix, obj, "start", errors);
    let end = check_offset(prefix, obj, "end", errors);
    if let (Some(start), Some(end)) = (start, end) {
        if end < start {
            errors.push(format!("{prefix}'end' must be >= 'start'"));
        }
    }

    check_string(prefix, obj, "match", errors);
    if obj.get("groups").is_some_and(|g| !g.is_array()) {
        errors.push(format!("{prefix}'groups' must be an array"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_suite_has_no_errors() {
        let errors = validate_suite_text(
            r#"[{"description": "d", "pattern": "a", "flags": "g", "tests": [
                {"description": "t", "input": "a", "matches": [
                    {"start": 0, "end": 1, "match": "a", "groups": [null]}
                ]}
            ]}]"#,
        );
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn invalid_json() {
        let errors = validate_suite_text("[{");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("Invalid JSON: "));
    }

    #[test]
    fn root_must_be_array() {
        assert_eq!(
            validate_suite_text("{}"),
            vec!["Root element must be an array"]
        );
    }

    #[test]
    fn collects_every_violation() {
        let errors = validate_suite_text(
            r#"[
                5,
                {"description": " ", "pattern": 1, "flags": [], "tests": []},
                {"tests": {}}
            ]"#,
        );
        assert_eq!(
            errors,
            vec![
                "Test case 0: Must be an object",
                "Test case 1: 'description' cannot be empty",
                "Test case 1: 'pattern' must be a string",
                "Test case 1: 'flags' must be a string",
                "Test case 1: 'tests' array cannot be empty",
                "Test case 2: Missing required field 'description'",
                "Test case 2: Missing required field 'pattern'",
                "Test case 2: 'tests' must be an array",
            ]
        );
    }

    #[test]
    fn test_and_match_violations() {
        let errors = validate_suite_text(
            r#"[{"description": "d", "pattern": "a", "tests": [
                "nope",
                {"description": 1, "input": null, "matches": 3},
                {"description": "t", "input": "a", "matches": [
                    {"start": -1, "end": 1.5, "match": 2, "groups": "x"},
                    {"start": 4, "end": 2, "match": "a"},
                    {}
                ]}
            ]}]"#,
        );
        assert_eq!(
            errors,
            vec![
                "Test case 0: Test 0: Must be an object",
                "Test case 0: Test 1: 'description' must be a string",
                "Test case 0: Test 1: 'input' must be a string",
                "Test case 0: Test 1: 'matches' must be an array",
                "Test case 0: Test 2: Match 0: 'start' must be non-negative",
                "Test case 0: Test 2: Match 0: 'end' must be an integer",
                "Test case 0: Test 2: Match 0: 'match' must be a string",
                "Test case 0: Test 2: Match 0: 'groups' must be an array",
                "Test case 0: Test 2: Match 1: 'end' must be >= 'start'",
                "Test case 0: Test 2: Match 2: Missing required field 'start'",
                "Test case 0: Test 2: Match 2: Missing required field 'end'",
                "Test case 0: Test 2: Match 2: Missing required field 'match'",
            ]
        );
    }

    #[test]
    fn unreadable_file() {
        let v = validate_file(Path::new("/no/such/file.json"));
        assert_eq!(v.errors.len(), 1);
        assert!(v.errors[0].starts_with("Error reading file: "));
    }
}
