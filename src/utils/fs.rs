use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// True when the root-relative form of `path` contains any excluded substring.
///
/// Matching against the relative path keeps a project that happens to live
/// under e.g. `~/dist/` from excluding itself.
pub fn is_excluded(root: &Path, path: &Path, exclude: &[String]) -> bool {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let relative = relative.to_string_lossy();
    exclude
        .iter()
        .filter(|e| !e.is_empty())
        .any(|e| relative.contains(e.as_str()))
}

/// Resolve `.` and `..` components without touching the file system.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                // `..` at the file system root stays at the root
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy();
            extensions
                .iter()
                .any(|wanted| wanted.trim_start_matches('.') == ext)
        })
        .unwrap_or(false)
}

/// Recursively collect files under `root` with one of `extensions`, skipping
/// excluded paths. Sorted for a stable batch order.
pub fn find_source_files(root: &Path, extensions: &[String], exclude: &[String]) -> Vec<PathBuf> {
    let mut results: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| {
            if e.depth() == 0 {
                return true;
            }
            e.file_name() != ".git" && !is_excluded(root, e.path(), exclude)
        })
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && has_extension(e.path(), extensions))
        .map(|e| e.into_path())
        .collect();
    results.sort();
    results
}
