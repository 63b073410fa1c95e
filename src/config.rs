//! Configuration handling for the CLI.

use crate::parser::webpack::DEFAULT_MAX_LINE_BYTES;
use crate::report::markdown::DEFAULT_TITLE;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

/// Dump linked package information from a compiled JavaScript application.
#[derive(Parser, Debug, Clone)]
#[command(name = "linkedpkg")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    #[command(subcommand)]
    pub command: Commands,

    /// JavaScript application dist folder (repeatable)
    #[arg(long = "js-dist", env = "LINKEDPKG_JS_DIST", value_delimiter = ',', global = true)]
    pub js_dist: Vec<PathBuf>,

    /// JavaScript project root folder (contains node_modules)
    #[arg(long = "js-root", env = "LINKEDPKG_JS_ROOT", default_value = ".", global = true)]
    pub js_root: PathBuf,

    /// Extra package to include even if it is not found in the bundle (repeatable)
    #[arg(long = "js-extra-package", global = true)]
    pub js_extra_packages: Vec<String>,

    /// Longest line accepted when scanning compiled JS, in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_LINE_BYTES, global = true)]
    pub max_line_bytes: usize,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Dump licenses of linked packages as Markdown
    License(LicenseConfig),
    /// Check linked packages against npm audit
    Audit(AuditConfig),
}

/// Configuration for the license command.
#[derive(Parser, Debug, Clone)]
pub struct LicenseConfig {
    /// Report title
    #[arg(long, default_value = DEFAULT_TITLE)]
    pub title: String,

    /// Output grouped modules as JSON instead of Markdown
    #[arg(long)]
    pub json: bool,

    /// Output file path (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Configuration for the audit command.
#[derive(Parser, Debug, Clone)]
pub struct AuditConfig {
    /// Export format
    #[arg(long = "audit-format", value_enum, default_value_t = AuditFormat::Plain)]
    pub format: AuditFormat,

    /// Time budget for npm audit in seconds
    #[arg(long, default_value = "10")]
    pub timeout: u64,
}

impl AuditConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditFormat {
    Plain,
    Json,
}

/// Inputs of the discovery and resolution pipeline.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Folders searched for compiled JS and source maps.
    pub dist_dirs: Vec<PathBuf>,
    /// Project root that holds `node_modules`.
    pub root: PathBuf,
    /// Packages added regardless of what the bundle contains.
    pub extra_packages: Vec<String>,
    pub max_line_bytes: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            dist_dirs: Vec::new(),
            root: PathBuf::from("."),
            extra_packages: Vec::new(),
            max_line_bytes: DEFAULT_MAX_LINE_BYTES,
        }
    }
}

impl Config {
    /// Pipeline configuration derived from the global flags.
    pub fn scan_config(&self) -> ScanConfig {
        ScanConfig {
            dist_dirs: self.js_dist.clone(),
            root: self.js_root.clone(),
            extra_packages: self.js_extra_packages.clone(),
            max_line_bytes: self.max_line_bytes,
        }
    }
}
