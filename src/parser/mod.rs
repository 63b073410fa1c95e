//! Module identity extraction.
//!
//! This module handles recovering package identities from:
//! - Webpack module boundary comments in compiled JS
//! - Source maps (sources array paths)
//!
//! Both parsers hand raw bundler paths to [`resolve_loader_chain`], which maps every
//! `node_modules` reference to a [`Module`].

pub mod sourcemap;
pub mod webpack;

pub use sourcemap::SourceMapParser;
pub use webpack::WebpackCommentParser;

use crate::types::Module;

const NODE_MODULES: &str = "/node_modules/";

/// Resolve a single bundler path to the package that contains it.
///
/// The last `/node_modules/` segment wins, so a dependency nested inside another
/// package resolves to the innermost package. Returns `None` when the path does not
/// point into `node_modules`.
pub fn resolve_module_path(raw: &str) -> Option<Module> {
    let path = match raw.strip_prefix('.') {
        Some(rest) if rest.starts_with("/node_modules") => rest,
        _ => raw,
    };

    let idx = path.rfind(NODE_MODULES)?;
    let after = &path[idx + NODE_MODULES.len()..];

    let mut fragments = after.split('/');
    let first = fragments.next()?;
    let name = if first.starts_with('@') {
        let package = fragments.next().filter(|p| !p.is_empty())?;
        format!("{}/{}", first, package)
    } else {
        first.to_string()
    };

    if name.is_empty() {
        return None;
    }

    let root = format!("{}{}", &path[..idx + NODE_MODULES.len()], name);
    Some(Module::javascript(name, root))
}

/// Resolve every segment of a `!`-separated loader chain.
///
/// Each segment may carry a `?query` suffix, which is dropped before resolution.
/// Segments outside `node_modules` are skipped.
pub fn resolve_loader_chain(raw: &str) -> Vec<Module> {
    raw.split('!')
        .map(|segment| segment.split('?').next().unwrap_or(segment))
        .filter_map(resolve_module_path)
        .collect()
}
