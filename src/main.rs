//! linkedpkg - Dump linked package information from compiled applications.
//!
//! CLI entry point.

use clap::Parser;
use linkedpkg::audit::{correlate, NpmAudit};
use linkedpkg::metadata::ResolverTable;
use linkedpkg::registry::group_by_license;
use linkedpkg::report::{write_json, write_license_report, ConsoleOutput};
use linkedpkg::{AuditConfig, AuditFormat, Commands, Config, LicenseConfig, Scanner};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    // Set up logging
    let filter = if config.verbose {
        EnvFilter::new("linkedpkg=debug,info")
    } else {
        EnvFilter::new("linkedpkg=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let result = match config.command.clone() {
        Commands::License(license_config) => run_license(license_config, &config),
        Commands::Audit(audit_config) => run_audit(audit_config, &config).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => code,
    }
}

fn scanner(config: &Config, json: bool) -> Scanner {
    Scanner::new(config.scan_config(), ResolverTable::with_defaults())
        .with_console(ConsoleOutput::new(config.verbose, json))
}

fn run_license(license_config: LicenseConfig, config: &Config) -> Result<(), ExitCode> {
    let modules = scanner(config, license_config.json).scan();
    let groups = group_by_license(&modules);

    let written = match license_config.output {
        Some(ref path) => match File::create(path) {
            Ok(file) => write_license_output(&license_config, &groups, BufWriter::new(file)),
            Err(e) => {
                error!("Failed to create output file {}: {}", path.display(), e);
                return Err(ExitCode::FAILURE);
            }
        },
        None => write_license_output(&license_config, &groups, io::stdout().lock()),
    };

    if let Err(e) = written {
        error!("Failed to write report: {}", e);
        return Err(ExitCode::FAILURE);
    }

    if let Some(ref path) = license_config.output {
        info!("Report written to: {}", path.display());
    }
    Ok(())
}

fn write_license_output<W: Write>(
    license_config: &LicenseConfig,
    groups: &[linkedpkg::GroupedModule],
    mut writer: W,
) -> io::Result<()> {
    if license_config.json {
        write_json(groups, &mut writer)?;
    } else {
        write_license_report(&license_config.title, groups, &mut writer)?;
    }
    writer.flush()
}

async fn run_audit(audit_config: AuditConfig, config: &Config) -> Result<(), ExitCode> {
    let json = audit_config.format == AuditFormat::Json;
    let modules = scanner(config, json).scan();

    let report = match NpmAudit::new(audit_config.timeout()).run(&config.js_root).await {
        Ok(report) => report,
        Err(e) => {
            error!("Audit failed: {}", e);
            return Err(ExitCode::FAILURE);
        }
    };

    let findings = correlate(&modules, &report);

    if json {
        if let Err(e) = write_json(&findings, &mut io::stdout().lock()) {
            error!("Failed to write findings: {}", e);
            return Err(ExitCode::FAILURE);
        }
    } else {
        ConsoleOutput::new(config.verbose, false).print_audit(&findings, modules.len());
    }

    Ok(())
}
