//! Metadata resolver for npm packages.

use crate::metadata::{locate_license, package_dir, MetadataResolver};
use crate::types::{LinkedPkgError, Module, Result};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// License name used when `package.json` has no `license` key.
pub const NO_LICENSE: &str = "no license";

/// Reads `package.json` of an installed package.
#[derive(Debug, Clone, Default)]
pub struct JavaScriptResolver;

impl JavaScriptResolver {
    /// Create a new resolver.
    pub fn new() -> Self {
        Self
    }
}

impl MetadataResolver for JavaScriptResolver {
    fn resolve(&self, module: &mut Module, root: &Path) -> Result<()> {
        let dir = package_dir(root, &module.path);
        let manifest_path = dir.join("package.json");

        let content = fs::read(&manifest_path)?;
        let manifest: Map<String, Value> = serde_json::from_slice(&content)?;

        let version = manifest
            .get("version")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                LinkedPkgError::InvalidManifest(format!(
                    "{}: missing version",
                    manifest_path.display()
                ))
            })?;

        match parse_author(&manifest) {
            Ok(author) => module.author = author,
            Err(e) => warn!("{}: {}", module.name, e),
        }

        module.license_name = parse_license_name(&manifest);

        match locate_license(&dir) {
            Ok(content) => module.license_content = content,
            Err(e) => warn!("{}: {}", module.name, e),
        }

        module.version = version.to_string();

        debug!(
            "Resolved {}@{} ({})",
            module.name, module.version, module.license_name
        );
        Ok(())
    }
}

/// Determine the author string from a manifest.
///
/// An object author renders as `name <email>`, or `name` when there is no email.
fn parse_author(manifest: &Map<String, Value>) -> Result<String> {
    match manifest.get("author") {
        None | Some(Value::Null) => Err(LinkedPkgError::AuthorNotDetermined),
        Some(Value::Object(fields)) => {
            let author = match (fields.get("name"), fields.get("email")) {
                (Some(name), Some(email)) => format!("{} <{}>", render(name), render(email)),
                (Some(name), None) => render(name),
                _ => Value::Object(fields.clone()).to_string(),
            };
            Ok(author)
        }
        Some(other) => Ok(render(other)),
    }
}

fn parse_license_name(manifest: &Map<String, Value>) -> String {
    match manifest.get("license") {
        None => NO_LICENSE.to_string(),
        Some(license) => render(license),
    }
}

/// Strings verbatim, anything else as compact JSON.
fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
