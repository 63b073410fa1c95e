//! Markdown license report.

use crate::types::GroupedModule;
use std::io::{self, Write};

/// Default report title.
pub const DEFAULT_TITLE: &str = "Used OSS Licenses";

/// Write one section per author/license group.
///
/// The license text of the first module in a group stands for the whole group.
pub fn write_license_report<W: Write>(
    title: &str,
    groups: &[GroupedModule],
    writer: &mut W,
) -> io::Result<()> {
    writeln!(writer, "# {}", title)?;
    writeln!(writer)?;

    for group in groups {
        let projects: Vec<String> = group
            .modules
            .iter()
            .map(|m| format!("{}@{}", m.name, m.version))
            .collect();

        writeln!(writer, "## {}", projects.join(", "))?;
        writeln!(writer)?;
        writeln!(writer, "* Author: {}", group.author)?;
        writeln!(writer, "* License: {}", group.license)?;

        match group.modules.first() {
            Some(first) if !first.license_content.is_empty() => {
                writeln!(writer)?;
                writeln!(writer, "```")?;
                writeln!(writer, "{}", first.license_content)?;
                writeln!(writer, "```")?;
                writeln!(writer)?;
                writeln!(writer)?;
            }
            _ => {
                writeln!(writer)?;
                writeln!(writer)?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::group_by_license;
    use crate::types::Module;

    fn module(name: &str, version: &str, author: &str, license: &str, text: &str) -> Module {
        let mut m = Module::installed(name);
        m.version = version.to_string();
        m.author = author.to_string();
        m.license_name = license.to_string();
        m.license_content = text.to_string();
        m
    }

    fn render(title: &str, modules: &[Module]) -> String {
        let mut out = Vec::new();
        write_license_report(title, &group_by_license(modules), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_grouped_section_with_license_text() {
        let output = render(
            DEFAULT_TITLE,
            &[
                module("vue", "3.0.0", "Evan You", "MIT", "MIT License"),
                module("vuex", "4.0.0", "Evan You", "MIT", ""),
            ],
        );

        assert_eq!(
            output,
            "# Used OSS Licenses\n\n## vue@3.0.0, vuex@4.0.0\n\n* Author: Evan You\n* License: MIT\n\n```\nMIT License\n```\n\n\n"
        );
    }

    #[test]
    fn test_section_without_license_text() {
        let output = render("Deps", &[module("trim", "0.0.1", "", "no license", "")]);
        assert_eq!(
            output,
            "# Deps\n\n## trim@0.0.1\n\n* Author: \n* License: no license\n\n\n"
        );
    }

    #[test]
    fn test_empty_report() {
        assert_eq!(render("Deps", &[]), "# Deps\n\n");
    }
}
