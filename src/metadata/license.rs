//! License text lookup for an installed package.

use crate::types::{LinkedPkgError, Result};
use std::fs::{self, DirEntry};
use std::path::Path;
use tracing::debug;

/// Find the license text of the package installed in `dir`.
///
/// A `LICENSE*` file wins over anything else. Otherwise the license section of a
/// `README*` file is used. Entries are tried in directory listing order.
pub fn locate_license(dir: &Path) -> Result<String> {
    let entries: Vec<DirEntry> = fs::read_dir(dir)?.filter_map(|e| e.ok()).collect();

    for entry in entries.iter().filter(|e| has_prefix(e, "LICENSE")) {
        match fs::read(entry.path()) {
            Ok(content) => return Ok(String::from_utf8_lossy(&content).trim().to_string()),
            Err(e) => debug!("Cannot read {}: {}", entry.path().display(), e),
        }
    }

    for entry in entries.iter().filter(|e| has_prefix(e, "README")) {
        let Ok(content) = fs::read(entry.path()) else {
            continue;
        };
        if let Some(section) = readme_license_section(&String::from_utf8_lossy(&content)) {
            return Ok(section);
        }
        debug!(
            "No closed license section in {}",
            entry.path().display()
        );
    }

    Err(LinkedPkgError::LicenseFileMissing)
}

/// Non-directory entry whose upper-cased name starts with `prefix`.
fn has_prefix(entry: &DirEntry, prefix: &str) -> bool {
    let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(true);
    !is_dir
        && entry
            .file_name()
            .to_string_lossy()
            .to_uppercase()
            .starts_with(prefix)
}

/// Extract the body of the first Markdown heading that mentions "license".
///
/// The section ends at the next heading of the same or a shallower level. A section
/// still open at the end of the text yields nothing.
fn readme_license_section(text: &str) -> Option<String> {
    let mut level: Option<usize> = None;
    let mut captured: Vec<&str> = Vec::new();

    for line in text.lines() {
        match level {
            None => {
                if line.starts_with('#') && line.to_uppercase().contains("LICENSE") {
                    level = Some(heading_level(line));
                }
            }
            Some(open) => {
                if line.starts_with('#') && heading_level(line) <= open {
                    return Some(trim_blank_lines(&captured));
                }
                captured.push(line);
            }
        }
    }

    None
}

fn heading_level(line: &str) -> usize {
    line.len() - line.trim_start_matches('#').len()
}

fn trim_blank_lines(lines: &[&str]) -> String {
    let start = lines.iter().position(|l| !l.trim().is_empty());
    let end = lines.iter().rposition(|l| !l.trim().is_empty());
    match (start, end) {
        (Some(start), Some(end)) => lines[start..=end].join("\n"),
        _ => String::new(),
    }
}
