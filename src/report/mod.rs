//! Report rendering.
//!
//! This module handles:
//! - Markdown license reports
//! - Colored console output for audit findings
//! - JSON output formatting

pub mod console;
pub mod markdown;

pub use console::ConsoleOutput;
pub use markdown::write_license_report;

use serde::Serialize;
use std::io::{self, Write};

/// Write any serializable value as pretty JSON followed by a newline.
pub fn write_json<T: Serialize + ?Sized, W: Write>(value: &T, writer: &mut W) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, value)?;
    writeln!(writer)
}
