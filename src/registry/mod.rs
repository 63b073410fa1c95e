//! Module registry.
//!
//! Deduplicates modules discovered across all parsed files and groups resolved
//! modules by author and license for reporting.

mod group;

pub use group::group_by_license;

use crate::types::{Ecosystem, Module};
use std::collections::HashSet;
use tracing::debug;

/// Deduplicate modules by `(ecosystem, path)` and sort them by name.
///
/// The first occurrence of a key is kept as-is; later duplicates are dropped.
pub fn deduplicate(modules: Vec<Module>) -> Vec<Module> {
    let total = modules.len();
    let mut seen: HashSet<(Ecosystem, String)> = HashSet::new();

    let mut unique: Vec<Module> = modules
        .into_iter()
        .filter(|m| seen.insert((m.ecosystem, m.path.clone())))
        .collect();

    unique.sort_by(|a, b| a.name.cmp(&b.name));

    debug!("Deduplicated {} modules into {}", total, unique.len());
    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_paths_collapse() {
        let mut first = Module::installed("trim");
        first.version = "0.0.1".to_string();
        let mut second = Module::installed("trim");
        second.author = "someone else".to_string();
        let third = Module::installed("trim");

        let unique = deduplicate(vec![first, second, third]);
        assert_eq!(unique.len(), 1);
        assert_eq!(unique[0].version, "0.0.1");
        assert!(unique[0].author.is_empty());
    }

    #[test]
    fn test_nested_copies_are_distinct() {
        let unique = deduplicate(vec![
            Module::installed("bn.js"),
            Module::javascript("bn.js", "/node_modules/asn1.js/node_modules/bn.js"),
        ]);
        assert_eq!(unique.len(), 2);
    }

    #[test]
    fn test_sorted_by_name() {
        let unique = deduplicate(vec![
            Module::installed("vue"),
            Module::installed("@babel/runtime"),
            Module::installed("core-js"),
            Module::installed("vue"),
        ]);
        let names: Vec<_> = unique.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["@babel/runtime", "core-js", "vue"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(deduplicate(Vec::new()).is_empty());
    }
}
