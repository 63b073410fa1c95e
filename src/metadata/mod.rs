//! Project metadata resolution.
//!
//! Each ecosystem registers a [`MetadataResolver`] in a [`ResolverTable`]. The table
//! is built once before resolution starts and dispatches every module to the
//! resolver registered for its ecosystem.

pub mod javascript;
pub mod license;

pub use javascript::JavaScriptResolver;
pub use license::locate_license;

use crate::types::{Ecosystem, LinkedPkgError, Module, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Fills in author, license and version information for a module.
pub trait MetadataResolver: Send + Sync {
    /// Populate `module` from the files installed under `root`.
    fn resolve(&self, module: &mut Module, root: &Path) -> Result<()>;
}

impl<F> MetadataResolver for F
where
    F: Fn(&mut Module, &Path) -> Result<()> + Send + Sync,
{
    fn resolve(&self, module: &mut Module, root: &Path) -> Result<()> {
        self(module, root)
    }
}

/// Ecosystem-to-resolver dispatch table.
#[derive(Default)]
pub struct ResolverTable {
    resolvers: HashMap<Ecosystem, Box<dyn MetadataResolver>>,
}

impl ResolverTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table with every built-in resolver registered.
    pub fn with_defaults() -> Self {
        let mut table = Self::new();
        table.register(Ecosystem::JavaScript, JavaScriptResolver::new());
        table
    }

    /// Register (or replace) the resolver for an ecosystem.
    pub fn register<R: MetadataResolver + 'static>(&mut self, ecosystem: Ecosystem, resolver: R) {
        self.resolvers.insert(ecosystem, Box::new(resolver));
    }

    /// Resolve metadata for a module using the resolver registered for its ecosystem.
    pub fn resolve(&self, module: &mut Module, root: &Path) -> Result<()> {
        let resolver = self
            .resolvers
            .get(&module.ecosystem)
            .ok_or(LinkedPkgError::UnsupportedEcosystem(module.ecosystem))?;
        resolver.resolve(module, root)
    }
}

/// Directory of an installed package, given the project root and the module path.
pub fn package_dir(root: &Path, module_path: &str) -> PathBuf {
    root.join(module_path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_table_rejects_ecosystem() {
        let table = ResolverTable::new();
        let mut module = Module::installed("trim");
        let err = table.resolve(&mut module, Path::new(".")).unwrap_err();
        assert!(matches!(
            err,
            LinkedPkgError::UnsupportedEcosystem(Ecosystem::JavaScript)
        ));
    }

    #[test]
    fn test_dispatch_to_registered_closure() {
        let mut table = ResolverTable::new();
        table.register(Ecosystem::JavaScript, |module: &mut Module, _root: &Path| -> Result<()> {
            module.version = "9.9.9".to_string();
            Ok(())
        });

        let mut module = Module::installed("trim");
        table.resolve(&mut module, Path::new(".")).unwrap();
        assert_eq!(module.version, "9.9.9");
    }

    #[test]
    fn test_package_dir_is_relative_to_root() {
        assert_eq!(
            package_dir(Path::new("/project"), "/node_modules/@babel/runtime"),
            PathBuf::from("/project/node_modules/@babel/runtime")
        );
        assert_eq!(
            package_dir(Path::new("testdata"), "sample1"),
            PathBuf::from("testdata/sample1")
        );
    }
}
