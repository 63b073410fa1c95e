//! linkedpkg - Discover the packages linked into compiled JavaScript and report their licenses.
//!
//! This library recovers package identities from:
//! - Webpack module boundary comments in compiled `.js` files
//! - The `sources` array of `.js.map` source maps
//!
//! and then resolves author, license and version information from each package's
//! installed `package.json`, `LICENSE*` and `README*` files.
//!
//! # Example
//!
//! ```no_run
//! use linkedpkg::config::ScanConfig;
//! use linkedpkg::metadata::ResolverTable;
//! use linkedpkg::registry::group_by_license;
//! use linkedpkg::scanner::Scanner;
//!
//! let config = ScanConfig {
//!     dist_dirs: vec!["dist".into()],
//!     root: ".".into(),
//!     ..Default::default()
//! };
//! let modules = Scanner::new(config, ResolverTable::with_defaults()).scan();
//! for group in group_by_license(&modules) {
//!     println!("{} ({}): {} packages", group.author, group.license, group.modules.len());
//! }
//! ```

pub mod audit;
pub mod config;
pub mod discovery;
pub mod metadata;
pub mod parser;
pub mod registry;
pub mod report;
pub mod scanner;
pub mod types;

pub use config::{AuditConfig, AuditFormat, Commands, Config, LicenseConfig, ScanConfig};
pub use scanner::Scanner;
pub use types::{Ecosystem, GroupedModule, LinkedPkgError, Module, Result};
