use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ignore::WalkBuilder;

/// Discover suite files (`*.json`) under `root`, recursively, in sorted
/// path order.
pub fn discover_suite_files(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        anyhow::bail!("Tests directory not found: {}", root.display());
    }

    // Suite trees are data, not source: walk dot-entries too and don't let
    // ignore files hide anything.
    let mut builder = WalkBuilder::new(root);
    builder
        .hidden(false)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .ignore(false)
        .parents(false);

    let mut files = Vec::new();
    for entry in builder.build() {
        let entry = entry.context("error walking tests directory")?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    Ok(files)
}

/// Path shown in reports: relative to the parent of the tests root, so a
/// file under `tests/` prints as `tests/...`.
pub fn display_path(path: &Path, tests_root: &Path) -> String {
    let base = tests_root.parent().unwrap_or(tests_root);
    path.strip_prefix(base)
        .unwrap_or(path)
        .display()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn discovers_json_files_recursively_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("tests");
        fs::create_dir_all(root.join("b/nested")).unwrap();
        fs::create_dir_all(root.join("a")).unwrap();
        fs::write(root.join("z.json"), "[]").unwrap();
        fs::write(root.join("b/nested/x.json"), "[]").unwrap();
        fs::write(root.join("a/y.json"), "[]").unwrap();
        fs::write(root.join("a/notes.txt"), "").unwrap();

        let files = discover_suite_files(&root).unwrap();
        assert_eq!(
            files,
            vec![
                root.join("a").join("y.json"),
                root.join("b").join("nested").join("x.json"),
                root.join("z.json"),
            ]
        );
    }

    #[test]
    fn display_path_is_relative_to_tests_parent() {
        let root = Path::new("/repo/tests");
        let file = root.join("unicode").join("escapes.json");
        assert_eq!(
            display_path(&file, root),
            Path::new("tests").join("unicode").join("escapes.json").display().to_string()
        );
        assert_eq!(display_path(Path::new("/elsewhere/x.json"), root), "/elsewhere/x.json");
    }

    #[test]
    fn dot_directories_and_files_are_walked() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("tests");
        fs::create_dir_all(root.join(".drafts")).unwrap();
        fs::write(root.join(".drafts").join("wip.json"), "[]").unwrap();
        fs::write(root.join(".dotted.json"), "[]").unwrap();
        fs::write(root.join("plain.json"), "[]").unwrap();

        let files = discover_suite_files(&root).unwrap();
        assert_eq!(
            files,
            vec![
                root.join(".dotted.json"),
                root.join(".drafts").join("wip.json"),
                root.join("plain.json"),
            ]
        );
    }

    #[test]
    fn gitignore_does_not_hide_suites() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("tests");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join(".gitignore"), "*.json\n").unwrap();
        fs::write(root.join("kept.json"), "[]").unwrap();

        let files = discover_suite_files(&root).unwrap();
        assert_eq!(files, vec![root.join("kept.json")]);
    }

    #[test]
    fn empty_directory_has_no_files() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover_suite_files(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn missing_directory_errors() {
        let err = discover_suite_files(Path::new("/no/such/tests")).unwrap_err();
        assert!(err.to_string().contains("Tests directory not found"));
    }
}
