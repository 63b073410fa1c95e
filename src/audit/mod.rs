//! Vulnerability audit.
//!
//! Runs `npm audit --json` for the project and correlates the reported
//! vulnerabilities with the modules linked into the bundle.

pub mod npm;

pub use npm::NpmAudit;

use crate::types::{Module, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Decoded `npm audit --json` output (report version 2).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditReport {
    #[serde(default)]
    pub audit_report_version: u32,
    #[serde(default)]
    pub vulnerabilities: HashMap<String, Vulnerability>,
    #[serde(default)]
    pub metadata: Metadata,
}

/// A vulnerable package.
///
/// npm mixes two kinds of entries in `via`: advisories that affect the package
/// directly and names of upstream packages that pull a vulnerability in. They are
/// split into `cause` and `caused_by`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "RawVulnerability", rename_all = "camelCase")]
pub struct Vulnerability {
    pub name: String,
    pub severity: String,
    pub range: String,
    pub nodes: Vec<String>,
    pub cause: Vec<Advisory>,
    pub caused_by: Vec<String>,
    pub fix_available: Option<FixAvailable>,
}

/// An advisory that directly affects a package.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Advisory {
    pub source: u64,
    pub name: String,
    pub dependency: String,
    pub title: String,
    pub url: String,
    pub severity: String,
    pub range: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct FixAvailable {
    pub name: String,
    pub version: String,
    pub is_sem_ver_major: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    pub vulnerabilities: VulnerabilityCounts,
    pub dependencies: DependencyCounts,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VulnerabilityCounts {
    pub info: u32,
    pub low: u32,
    pub moderate: u32,
    pub high: u32,
    pub critical: u32,
    pub total: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DependencyCounts {
    pub prod: u32,
    pub dev: u32,
    pub optional: u32,
    pub peer: u32,
    pub peer_optional: u32,
    pub total: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawVulnerability {
    #[serde(default)]
    name: String,
    #[serde(default)]
    severity: String,
    #[serde(default)]
    range: String,
    #[serde(default)]
    nodes: Vec<String>,
    #[serde(default)]
    via: Vec<Via>,
    #[serde(default)]
    fix_available: Fix,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Via {
    Package(String),
    Advisory(Advisory),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Fix {
    Flag(bool),
    Available(FixAvailable),
}

impl Default for Fix {
    fn default() -> Self {
        Fix::Flag(false)
    }
}

impl From<RawVulnerability> for Vulnerability {
    fn from(raw: RawVulnerability) -> Self {
        let mut cause = Vec::new();
        let mut caused_by = Vec::new();
        for via in raw.via {
            match via {
                Via::Package(name) => caused_by.push(name),
                Via::Advisory(advisory) => cause.push(advisory),
            }
        }

        let fix_available = match raw.fix_available {
            Fix::Flag(false) => None,
            Fix::Flag(true) => Some(FixAvailable::default()),
            Fix::Available(fix) => Some(fix),
        };

        Self {
            name: raw.name,
            severity: raw.severity,
            range: raw.range,
            nodes: raw.nodes,
            cause,
            caused_by,
            fix_available,
        }
    }
}

/// Decode `npm audit --json` output.
pub fn parse_report(bytes: &[u8]) -> Result<AuditReport> {
    Ok(serde_json::from_slice(bytes)?)
}

/// A linked module with a known vulnerability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditFinding {
    pub name: String,
    pub version: String,
    pub severity: String,
    pub range: String,
    pub cause: Vec<Advisory>,
    pub caused_by: Vec<String>,
}

/// Look up every module by name in the audit report.
///
/// Modules without an entry have no known vulnerability and are left out.
pub fn correlate(modules: &[Module], report: &AuditReport) -> Vec<AuditFinding> {
    let by_name: HashMap<&str, &Vulnerability> = report
        .vulnerabilities
        .values()
        .map(|v| (v.name.as_str(), v))
        .collect();

    modules
        .iter()
        .filter_map(|module| {
            let vulnerability = by_name.get(module.name.as_str())?;
            Some(AuditFinding {
                name: module.name.clone(),
                version: module.version.clone(),
                severity: vulnerability.severity.clone(),
                range: vulnerability.range.clone(),
                cause: vulnerability.cause.clone(),
                caused_by: vulnerability.caused_by.clone(),
            })
        })
        .collect()
}
