//! Core types and errors for package discovery and license resolution.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while discovering packages or resolving their metadata.
#[derive(Error, Debug)]
pub enum LinkedPkgError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("lang {0} is not supported")]
    UnsupportedEcosystem(Ecosystem),

    #[error("author not determined")]
    AuthorNotDetermined,

    #[error("license file missing")]
    LicenseFileMissing,

    #[error("Invalid package.json: {0}")]
    InvalidManifest(String),

    #[error("npm audit failed: {0}")]
    AuditError(String),

    #[error("npm audit did not finish within {0:?}")]
    AuditTimeout(Duration),
}

pub type Result<T> = std::result::Result<T, LinkedPkgError>;

/// Source ecosystem of a module; selects the metadata resolver.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Ecosystem {
    #[serde(rename = "js")]
    JavaScript,
}

impl fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ecosystem::JavaScript => f.write_str("js"),
        }
    }
}

/// A package linked into a compiled artifact.
///
/// `name` and `path` come from the bundle parsers. The remaining fields stay empty
/// until the metadata resolver fills them in.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Module {
    pub ecosystem: Ecosystem,
    /// Package name (e.g., "@babel/runtime" or "trim").
    pub name: String,
    /// Package root relative to the project root (e.g., "/node_modules/trim").
    pub path: String,
    pub author: String,
    pub license_name: String,
    pub license_content: String,
    pub version: String,
}

impl Module {
    /// Create a JavaScript module with empty metadata.
    pub fn javascript(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            ecosystem: Ecosystem::JavaScript,
            name: name.into(),
            path: path.into(),
            author: String::new(),
            license_name: String::new(),
            license_content: String::new(),
            version: String::new(),
        }
    }

    /// Create a module for a package installed directly under the project's `node_modules`.
    pub fn installed(name: &str) -> Self {
        Self::javascript(name, format!("/node_modules/{}", name))
    }
}

/// Modules sharing the exact same author and license name.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct GroupedModule {
    pub author: String,
    pub license: String,
    pub modules: Vec<Module>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_installed_module_path() {
        let module = Module::installed("@vercel/ncc");
        assert_eq!(module.ecosystem, Ecosystem::JavaScript);
        assert_eq!(module.name, "@vercel/ncc");
        assert_eq!(module.path, "/node_modules/@vercel/ncc");
        assert!(module.version.is_empty());
    }

    #[test]
    fn test_ecosystem_tag() {
        assert_eq!(Ecosystem::JavaScript.to_string(), "js");
        assert_eq!(
            serde_json::to_string(&Ecosystem::JavaScript).unwrap(),
            "\"js\""
        );
    }

    #[test]
    fn test_module_serializes_with_ecosystem_tag() {
        let json = serde_json::to_value(Module::installed("trim")).unwrap();
        assert_eq!(json["ecosystem"], "js");
        assert_eq!(json["path"], "/node_modules/trim");
    }

    #[test]
    fn test_unsupported_ecosystem_message() {
        let err = LinkedPkgError::UnsupportedEcosystem(Ecosystem::JavaScript);
        assert_eq!(err.to_string(), "lang js is not supported");
    }
}
