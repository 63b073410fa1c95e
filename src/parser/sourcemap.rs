//! Source map parser for extracting linked modules from the sources array.

use crate::parser::resolve_loader_chain;
use crate::types::{Module, Result};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// The part of a source map this parser cares about.
#[derive(Debug, Default, Deserialize)]
struct RawSourceMap {
    /// Entries may be `null`; only strings are used.
    #[serde(default)]
    sources: Vec<Value>,
}

/// Parser for extracting module information from source maps.
#[derive(Clone)]
pub struct SourceMapParser;

impl SourceMapParser {
    /// Create a new source map parser.
    pub fn new() -> Self {
        Self
    }

    /// Parse a `.js.map` file and return the linked modules, sorted by name.
    ///
    /// Only a failure to read the file is an error; undecodable JSON yields no modules.
    pub fn parse_file(&self, path: &Path) -> Result<Vec<Module>> {
        let content = fs::read(path)?;
        let modules = self.parse(&content);
        debug!(
            "Extracted {} modules from source map: {}",
            modules.len(),
            path.display()
        );
        Ok(modules)
    }

    /// Parse source map content.
    pub fn parse(&self, content: &[u8]) -> Vec<Module> {
        let map: RawSourceMap = serde_json::from_slice(content).unwrap_or_else(|e| {
            debug!("Source map is not valid JSON, treating as empty: {}", e);
            RawSourceMap::default()
        });

        let mut by_name: BTreeMap<String, Module> = BTreeMap::new();
        for source in map.sources.iter().filter_map(Value::as_str) {
            for module in resolve_loader_chain(normalize_source(source)) {
                by_name.insert(module.name.clone(), module);
            }
        }

        by_name.into_values().collect()
    }
}

impl Default for SourceMapParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Strip the bundler-specific prefix from a source entry.
///
/// - `webpack:///./node_modules/x/index.js` (webpack)
/// - `../webpack:/project/node_modules/x/index.js` (ncc)
/// - `../webpack://project/./node_modules/x/index.js` (ncc, development build)
fn normalize_source(source: &str) -> &str {
    if let Some(rest) = source.strip_prefix("webpack:///.") {
        return rest;
    }

    if let Some(rest) = source.strip_prefix("../webpack:/") {
        let rest = rest.strip_prefix('/').unwrap_or(rest);
        return match rest.find('/') {
            Some(idx) => {
                let in_project = &rest[idx..];
                in_project.strip_prefix("/.").unwrap_or(in_project)
            }
            None => rest,
        };
    }

    source
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn names(modules: &[Module]) -> Vec<&str> {
        modules.iter().map(|m| m.name.as_str()).collect()
    }

    #[test]
    fn test_normalize_webpack_source() {
        assert_eq!(
            normalize_source("webpack:///./node_modules/@babel/runtime/helpers/x.js"),
            "/node_modules/@babel/runtime/helpers/x.js"
        );
    }

    #[test]
    fn test_normalize_ncc_sources() {
        assert_eq!(
            normalize_source("../webpack:/ncc-project/node_modules/trim/index.js"),
            "/node_modules/trim/index.js"
        );
        assert_eq!(
            normalize_source("../webpack://ncc-project/./node_modules/trim/index.js"),
            "/node_modules/trim/index.js"
        );
        assert_eq!(normalize_source("../webpack:/index"), "index");
    }

    #[test]
    fn test_normalize_leaves_other_sources() {
        assert_eq!(normalize_source("src/main.ts"), "src/main.ts");
    }

    #[test]
    fn test_parse_webpack_sourcemap() {
        let json = br#"{
            "version": 3,
            "sources": [
                "webpack:///./node_modules/@babel/runtime/helpers/x.js",
                "webpack:///./node_modules/asn1.js/node_modules/bn.js/lib/bn.js",
                "webpack:///./node_modules/vue-loader/lib/index.js??vue-loader-options!./src/App.vue?vue&type=template",
                "webpack:///./src/main.js"
            ],
            "mappings": "AAAA"
        }"#;

        let modules = SourceMapParser::new().parse(json);
        assert_eq!(names(&modules), vec!["@babel/runtime", "bn.js", "vue-loader"]);
        assert_eq!(modules[1].path, "/node_modules/asn1.js/node_modules/bn.js");
    }

    #[test]
    fn test_parse_ncc_sourcemap() {
        let json = br#"{"sources": [
            "../webpack:/ncc-project/node_modules/trim/index.js",
            "../webpack://ncc-project/./node_modules/@date-io/dayjs/build/index.js",
            "../webpack:/ncc-project/src/main.ts",
            "../webpack:/ncc-project/node_modules/trim/package.json"
        ]}"#;

        let modules = SourceMapParser::new().parse(json);
        assert_eq!(names(&modules), vec!["@date-io/dayjs", "trim"]);
        assert_eq!(modules[1].path, "/node_modules/trim");
    }

    #[test]
    fn test_malformed_json_is_empty() {
        let parser = SourceMapParser::new();
        assert!(parser.parse(b"not json at all").is_empty());
        assert!(parser.parse(br#"{"version": 3}"#).is_empty());
    }

    #[test]
    fn test_non_string_sources_are_skipped() {
        let json = br#"{"sources": [
            "webpack:///./node_modules/trim/index.js",
            null,
            5,
            "webpack:///./node_modules/vue/dist/vue.js"
        ]}"#;

        let modules = SourceMapParser::new().parse(json);
        assert_eq!(names(&modules), vec!["trim", "vue"]);
    }

    #[test]
    fn test_parse_file_errors_only_on_io() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{ broken").unwrap();

        let parser = SourceMapParser::new();
        assert!(parser.parse_file(file.path()).unwrap().is_empty());
        assert!(parser
            .parse_file(&file.path().with_extension("gone"))
            .is_err());
    }
}
