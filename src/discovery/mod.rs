//! Artifact discovery.
//!
//! Finds compiled JS files and source maps below a dist folder.

use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

/// Extension of source map files.
pub const SOURCE_MAP_EXTENSION: &str = ".js.map";
/// Extension of compiled JS files.
pub const JS_EXTENSION: &str = ".js";

/// Recursively collect regular files whose name ends with one of `extensions`.
///
/// Entries that cannot be read are logged and skipped.
pub fn search(dir: &Path, extensions: &[&str]) -> Vec<PathBuf> {
    let mut found = Vec::new();

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Failed to access {}: {}", dir.display(), e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if extensions.iter().any(|ext| name.ends_with(ext)) {
            found.push(entry.into_path());
        }
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_search_by_extension() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("js")).unwrap();
        fs::write(dir.path().join("index.html"), "").unwrap();
        fs::write(dir.path().join("js/app.js"), "").unwrap();
        fs::write(dir.path().join("js/app.js.map"), "{}").unwrap();
        fs::write(dir.path().join("js/chunk-vendors.js"), "").unwrap();

        let js = search(dir.path(), &[JS_EXTENSION]);
        let names: Vec<_> = js
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["app.js", "chunk-vendors.js"]);

        let maps = search(dir.path(), &[SOURCE_MAP_EXTENSION]);
        assert_eq!(maps.len(), 1);
        assert!(maps[0].ends_with("js/app.js.map"));
    }

    #[test]
    fn test_search_missing_dir() {
        let dir = TempDir::new().unwrap();
        assert!(search(&dir.path().join("missing"), &[JS_EXTENSION]).is_empty());
    }
}
