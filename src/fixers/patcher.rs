//! The single place that writes source files.

use std::fs;
use std::path::{Path, PathBuf};

use crate::utils::fs::{is_excluded, normalize_path};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    /// Content differed and was written back.
    Changed,
    /// The rewrite matched but produced identical content.
    Unchanged,
    /// The rewrite did not find its pattern.
    NoMatch,
    /// Excluded path or I/O failure.
    Skipped,
}

pub struct FilePatcher {
    root: PathBuf,
    exclude: Vec<String>,
}

impl FilePatcher {
    pub fn new(root: impl Into<PathBuf>, exclude: Vec<String>) -> Self {
        Self {
            root: normalize_path(&root.into()),
            exclude,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            normalize_path(path)
        } else {
            normalize_path(&self.root.join(path))
        }
    }

    /// Read `path` once, apply `rewrite`, and write back only on a real change.
    ///
    /// Failures are logged and reported as `Skipped`; they never propagate.
    pub fn patch<F>(&self, path: &Path, rewrite: F) -> PatchOutcome
    where
        F: FnOnce(&str) -> Option<String>,
    {
        let full_path = self.resolve(path);
        if !full_path.starts_with(&self.root) {
            tracing::warn!(path = %full_path.display(), "path outside the project, not patching");
            return PatchOutcome::Skipped;
        }
        if is_excluded(&self.root, &full_path, &self.exclude) {
            tracing::debug!(path = %full_path.display(), "excluded path, not patching");
            return PatchOutcome::Skipped;
        }

        let content = match fs::read_to_string(&full_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(path = %full_path.display(), error = %e, "cannot read file");
                return PatchOutcome::Skipped;
            }
        };

        let Some(updated) = rewrite(&content) else {
            return PatchOutcome::NoMatch;
        };
        if updated == content {
            return PatchOutcome::Unchanged;
        }

        if let Err(e) = fs::write(&full_path, updated) {
            tracing::warn!(path = %full_path.display(), error = %e, "cannot write file");
            return PatchOutcome::Skipped;
        }
        PatchOutcome::Changed
    }
}

/// Rewrite the 1-based `line_number` of `content`, keeping its terminator.
///
/// Returns `None` when the line does not exist, the rewrite does not match,
/// or the rewrite tried to introduce a line break.
pub fn rewrite_line_at<F>(content: &str, line_number: usize, rewrite: F) -> Option<String>
where
    F: FnOnce(&str) -> Option<String>,
{
    let index = line_number.checked_sub(1)?;
    let lines: Vec<&str> = content.split_inclusive('\n').collect();
    let raw = *lines.get(index)?;

    let (body, terminator) = if let Some(body) = raw.strip_suffix("\r\n") {
        (body, "\r\n")
    } else if let Some(body) = raw.strip_suffix('\n') {
        (body, "\n")
    } else {
        (raw, "")
    };

    let new_body = rewrite(body)?;
    if new_body.contains('\n') || new_body.contains('\r') {
        tracing::warn!(line = line_number, "line rewrite introduced a line break, ignoring");
        return None;
    }

    let mut result = String::with_capacity(content.len() + 8);
    for (i, line) in lines.iter().enumerate() {
        if i == index {
            result.push_str(&new_body);
            result.push_str(terminator);
        } else {
            result.push_str(line);
        }
    }
    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn excluded() -> Vec<String> {
        vec!["node_modules".to_string(), "dist".to_string()]
    }

    #[test]
    fn test_patch_writes_changed_content() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.ts"), "let a: any;\n").unwrap();
        let patcher = FilePatcher::new(tmp.path(), excluded());

        let outcome = patcher.patch(Path::new("a.ts"), |c| Some(c.replace("any", "unknown")));

        assert_eq!(outcome, PatchOutcome::Changed);
        assert_eq!(fs::read_to_string(tmp.path().join("a.ts")).unwrap(), "let a: unknown;\n");
    }

    #[test]
    fn test_patch_reports_unchanged_and_no_match() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.ts"), "ok\n").unwrap();
        let patcher = FilePatcher::new(tmp.path(), excluded());

        assert_eq!(
            patcher.patch(Path::new("a.ts"), |c| Some(c.to_string())),
            PatchOutcome::Unchanged
        );
        assert_eq!(patcher.patch(Path::new("a.ts"), |_| None), PatchOutcome::NoMatch);
    }

    #[test]
    fn test_patch_never_touches_excluded_paths() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("node_modules/pkg")).unwrap();
        let vendored = tmp.path().join("node_modules/pkg/index.ts");
        fs::write(&vendored, "let a: any;\n").unwrap();
        let patcher = FilePatcher::new(tmp.path(), excluded());

        let outcome = patcher.patch(&vendored, |c| Some(c.replace("any", "unknown")));

        assert_eq!(outcome, PatchOutcome::Skipped);
        assert_eq!(fs::read_to_string(&vendored).unwrap(), "let a: any;\n");
    }

    #[test]
    fn test_patch_never_leaves_the_project_root() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("project");
        fs::create_dir_all(root.join("src")).unwrap();
        let outside = tmp.path().join("x.ts");
        fs::write(&outside, "let a: any;\n").unwrap();
        let patcher = FilePatcher::new(&root, excluded());

        for path in [Path::new("../x.ts"), Path::new("src/../../x.ts"), outside.as_path()] {
            let outcome = patcher.patch(path, |c| Some(c.replace("any", "unknown")));
            assert_eq!(outcome, PatchOutcome::Skipped);
        }
        assert_eq!(fs::read_to_string(&outside).unwrap(), "let a: any;\n");
    }

    #[test]
    fn test_patch_resolves_dot_components_inside_root() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("src")).unwrap();
        fs::write(tmp.path().join("a.ts"), "let a: any;\n").unwrap();
        let patcher = FilePatcher::new(tmp.path(), excluded());

        let outcome = patcher.patch(Path::new("./src/../a.ts"), |c| Some(c.replace("any", "unknown")));

        assert_eq!(outcome, PatchOutcome::Changed);
        assert_eq!(fs::read_to_string(tmp.path().join("a.ts")).unwrap(), "let a: unknown;\n");
    }

    #[test]
    fn test_patch_missing_file_is_skipped() {
        let tmp = TempDir::new().unwrap();
        let patcher = FilePatcher::new(tmp.path(), excluded());
        let outcome = patcher.patch(Path::new("missing.ts"), |c| Some(format!("{c}!")));
        assert_eq!(outcome, PatchOutcome::Skipped);
    }

    #[test]
    fn test_rewrite_line_at_changes_only_target_line() {
        let content = "one\r\ntwo\nthree";
        let updated = rewrite_line_at(content, 2, |l| Some(l.to_uppercase())).unwrap();
        assert_eq!(updated, "one\r\nTWO\nthree");

        let last = rewrite_line_at(content, 3, |l| Some(format!("{l}!"))).unwrap();
        assert_eq!(last, "one\r\ntwo\nthree!");

        let first = rewrite_line_at(content, 1, |l| Some(l.replace("one", "1"))).unwrap();
        assert_eq!(first, "1\r\ntwo\nthree");
    }

    #[test]
    fn test_rewrite_line_at_out_of_range() {
        assert_eq!(rewrite_line_at("a\nb\n", 0, |l| Some(l.to_string())), None);
        assert_eq!(rewrite_line_at("a\nb\n", 3, |l| Some(l.to_string())), None);
    }

    #[test]
    fn test_rewrite_line_at_rejects_line_breaks() {
        assert_eq!(
            rewrite_line_at("a\nb\n", 1, |l| Some(format!("{l}\nextra"))),
            None
        );
    }
}
