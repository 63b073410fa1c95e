//! Webpack module boundary comment parser.
//!
//! Development builds of webpack announce every bundled module with a banner like:
//!
//! ```text
//! /*!*****************************************!*\
//!   !*** ./node_modules/vue/dist/vue.esm.js ***!
//!   \*****************************************/
//! ```
//!
//! The parser collects every block comment in the file and keeps only the ones shaped
//! exactly like this banner.

use crate::parser::resolve_loader_chain;
use crate::types::{Module, Result};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use tracing::{debug, warn};

/// Default upper bound for a single line (bundlers emit very long lines).
pub const DEFAULT_MAX_LINE_BYTES: usize = 1000 * 64 * 1024;

const BANNER_PREFIX: &str = "!**********";

/// Parser for webpack module boundary comments in compiled JS files.
#[derive(Clone)]
pub struct WebpackCommentParser {
    max_line_bytes: usize,
}

impl WebpackCommentParser {
    /// Create a new parser with the default line limit.
    pub fn new() -> Self {
        Self {
            max_line_bytes: DEFAULT_MAX_LINE_BYTES,
        }
    }

    /// Override the maximum accepted line length in bytes.
    pub fn with_max_line_bytes(mut self, max_line_bytes: usize) -> Self {
        self.max_line_bytes = max_line_bytes.max(1);
        self
    }

    /// Parse a compiled JS file and return the linked modules, sorted by name.
    pub fn parse_file(&self, path: &Path) -> Result<Vec<Module>> {
        let file = File::open(path)?;
        let modules = self.parse_reader(BufReader::new(file))?;
        debug!(
            "Extracted {} modules from webpack comments: {}",
            modules.len(),
            path.display()
        );
        Ok(modules)
    }

    /// Parse compiled JS from any buffered reader.
    ///
    /// A line longer than the configured limit ends the scan; whatever was collected
    /// up to that point is still returned.
    pub fn parse_reader<R: BufRead>(&self, mut reader: R) -> Result<Vec<Module>> {
        let mut scanner = CommentScanner::default();
        let mut buf = Vec::new();

        loop {
            buf.clear();
            let limit = self.max_line_bytes as u64 + 1;
            let read = (&mut reader).take(limit).read_until(b'\n', &mut buf)?;
            if read == 0 {
                break;
            }
            if buf.len() > self.max_line_bytes && buf.last() != Some(&b'\n') {
                warn!(
                    "Line exceeds {} bytes, stopping comment scan early",
                    self.max_line_bytes
                );
                break;
            }

            let line = String::from_utf8_lossy(&buf);
            scanner.feed(line.trim_end_matches(['\n', '\r']));
        }

        if scanner.is_inside_comment() {
            debug!("Unterminated block comment at end of file, ignoring it");
        }

        Ok(modules_from_comments(&scanner.finish()))
    }
}

impl Default for WebpackCommentParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract module banners from collected comment bodies, deduplicated by name.
fn modules_from_comments(comments: &[String]) -> Vec<Module> {
    let mut by_name: BTreeMap<String, Module> = BTreeMap::new();

    for comment in comments {
        let Some(raw_path) = banner_path(comment) else {
            continue;
        };
        for module in resolve_loader_chain(raw_path) {
            by_name.insert(module.name.clone(), module);
        }
    }

    by_name.into_values().collect()
}

/// Return the module path announced by a banner comment, if this comment is one.
fn banner_path(comment: &str) -> Option<&str> {
    let lines: Vec<&str> = comment.split('\n').collect();
    if lines.len() != 3 || !lines[0].starts_with(BANNER_PREFIX) {
        return None;
    }

    let line = lines[1].trim();
    let line = line.strip_prefix("!*** ").unwrap_or(line);
    let line = line.strip_suffix("***!").unwrap_or(line);
    Some(line.trim())
}

/// Block comment scanner state.
#[derive(Debug, Default)]
enum CommentState {
    #[default]
    Outside,
    /// Inside a comment that started on an earlier line; holds the text seen so far.
    Inside(Vec<String>),
}

/// Line-by-line `/* ... */` extractor.
#[derive(Debug, Default)]
struct CommentScanner {
    state: CommentState,
    comments: Vec<String>,
}

impl CommentScanner {
    /// Consume one line, recording every comment that closes on it.
    fn feed(&mut self, line: &str) {
        let mut rest = line;

        loop {
            match &mut self.state {
                CommentState::Outside => {
                    let Some(start) = rest.find("/*") else {
                        break;
                    };
                    rest = &rest[start + 2..];
                    match rest.find("*/") {
                        Some(end) => {
                            self.comments.push(rest[..end].to_string());
                            rest = &rest[end + 2..];
                        }
                        None => {
                            self.state = CommentState::Inside(vec![rest.to_string()]);
                            break;
                        }
                    }
                }
                CommentState::Inside(pending) => match rest.find("*/") {
                    Some(end) => {
                        pending.push(rest[..end].to_string());
                        let text = pending.join("\n");
                        self.comments.push(text);
                        self.state = CommentState::Outside;
                        rest = &rest[end + 2..];
                    }
                    None => {
                        pending.push(rest.to_string());
                        break;
                    }
                },
            }
        }
    }

    fn is_inside_comment(&self) -> bool {
        matches!(self.state, CommentState::Inside(_))
    }

    /// Completed comment bodies; an unterminated trailing comment is dropped.
    fn finish(self) -> Vec<String> {
        self.comments
    }
}
