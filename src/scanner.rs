//! Main scanner orchestrating discovery, deduplication and metadata resolution.

use crate::config::ScanConfig;
use crate::discovery::{search, JS_EXTENSION, SOURCE_MAP_EXTENSION};
use crate::metadata::ResolverTable;
use crate::parser::{SourceMapParser, WebpackCommentParser};
use crate::registry::deduplicate;
use crate::report::ConsoleOutput;
use crate::types::Module;
use std::path::Path;
use tracing::{debug, info, warn};

/// Pipeline from dist folders to a deduplicated, metadata-enriched module list.
pub struct Scanner {
    config: ScanConfig,
    webpack_parser: WebpackCommentParser,
    sourcemap_parser: SourceMapParser,
    resolvers: ResolverTable,
    console: ConsoleOutput,
}

impl Scanner {
    /// Create a new scanner resolving metadata through `resolvers`.
    pub fn new(config: ScanConfig, resolvers: ResolverTable) -> Self {
        let webpack_parser = WebpackCommentParser::new().with_max_line_bytes(config.max_line_bytes);

        Self {
            config,
            webpack_parser,
            sourcemap_parser: SourceMapParser::new(),
            resolvers,
            console: ConsoleOutput::default(),
        }
    }

    /// Use a specific console for progress output.
    pub fn with_console(mut self, console: ConsoleOutput) -> Self {
        self.console = console;
        self
    }

    /// Discover and resolve all linked modules.
    pub fn scan(&self) -> Vec<Module> {
        let modules = self.collect_modules();
        self.resolve_metadata(modules)
    }

    /// Parse every artifact in the dist folders and add the extra packages.
    ///
    /// Files that cannot be read are logged and skipped.
    pub fn collect_modules(&self) -> Vec<Module> {
        let mut modules: Vec<Module> = Vec::new();

        for dir in &self.config.dist_dirs {
            for path in search(dir, &[SOURCE_MAP_EXTENSION]) {
                self.console
                    .print_progress(&format!("Parsing source map {}", path.display()));
                match self.sourcemap_parser.parse_file(&path) {
                    Ok(found) => modules.extend(found),
                    Err(e) => warn!("{}: {}", path.display(), e),
                }
            }

            for path in search(dir, &[JS_EXTENSION]) {
                self.console
                    .print_progress(&format!("Parsing bundle {}", path.display()));
                match self.webpack_parser.parse_file(&path) {
                    Ok(found) => modules.extend(found),
                    Err(e) => warn!("{}: {}", path.display(), e),
                }
            }
        }

        modules.extend(
            self.config
                .extra_packages
                .iter()
                .map(|name| Module::installed(name)),
        );

        let modules = deduplicate(modules);
        info!("Found {} linked modules", modules.len());
        modules
    }

    /// Resolve metadata for every module independently.
    ///
    /// Modules whose metadata cannot be resolved are logged and left out.
    pub fn resolve_metadata(&self, modules: Vec<Module>) -> Vec<Module> {
        let root: &Path = &self.config.root;
        let pb = self
            .console
            .create_progress_bar(modules.len() as u64, "Resolving metadata");

        let mut resolved = Vec::with_capacity(modules.len());
        for mut module in modules {
            match self.resolvers.resolve(&mut module, root) {
                Ok(()) => resolved.push(module),
                Err(e) => warn!("{}: {}", module.name, e),
            }
            if let Some(ref pb) = pb {
                pb.inc(1);
            }
        }

        if let Some(pb) = pb {
            pb.finish_and_clear();
        }

        debug!("Resolved metadata for {} modules", resolved.len());
        resolved
    }
}
