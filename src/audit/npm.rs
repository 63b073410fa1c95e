//! `npm audit` subprocess runner.

use crate::audit::{parse_report, AuditReport};
use crate::types::{LinkedPkgError, Result};
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tracing::debug;

/// Runs `npm audit --json` with a deadline.
#[derive(Debug, Clone)]
pub struct NpmAudit {
    program: String,
    timeout: Duration,
}

impl NpmAudit {
    /// Create a runner that gives up after `timeout`.
    pub fn new(timeout: Duration) -> Self {
        Self {
            program: "npm".to_string(),
            timeout,
        }
    }

    /// Audit the project in `root`.
    ///
    /// The child is killed if the deadline passes.
    pub async fn run(&self, root: &Path) -> Result<AuditReport> {
        match tokio::time::timeout(self.timeout, self.exec(root)).await {
            Ok(result) => result,
            Err(_) => Err(LinkedPkgError::AuditTimeout(self.timeout)),
        }
    }

    async fn exec(&self, root: &Path) -> Result<AuditReport> {
        let mut child = Command::new(&self.program)
            .args(["audit", "--json"])
            .current_dir(root)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| LinkedPkgError::AuditError(format!("failed to start {}: {}", self.program, e)))?;

        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| LinkedPkgError::AuditError("stdout was not captured".to_string()))?;

        // Decoded while the child is still running.
        let decoder = tokio::spawn(async move {
            let mut output = Vec::new();
            stdout.read_to_end(&mut output).await?;
            parse_report(&output)
        });

        let status = child.wait().await?;
        debug!("{} audit exited with {}", self.program, status);

        let report = decoder
            .await
            .map_err(|e| LinkedPkgError::AuditError(format!("decoder task failed: {}", e)))?;

        // npm exits with 1 when it finds vulnerabilities; the report is valid then.
        match report {
            Ok(report) => Ok(report),
            Err(e) if !status.success() => Err(LinkedPkgError::AuditError(format!(
                "{} audit exited with {}: {}",
                self.program, status, e
            ))),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[cfg(unix)]
    /// Runs `sh audit --json` in `dir`, so the fake audit lives in a file named `audit`.
    fn fake_npm(dir: &Path, script: &str, timeout: Duration) -> NpmAudit {
        fs::write(dir.join("audit"), script).unwrap();
        NpmAudit {
            program: "sh".to_string(),
            timeout,
        }
    }

    #[tokio::test]
    async fn test_missing_program_is_an_error() {
        let audit = NpmAudit {
            program: "linkedpkg-no-such-program".to_string(),
            timeout: Duration::from_secs(5),
        };
        let dir = TempDir::new().unwrap();
        let err = audit.run(dir.path()).await.unwrap_err();
        assert!(matches!(err, LinkedPkgError::AuditError(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_deadline_exceeded() {
        let dir = TempDir::new().unwrap();
        let audit = fake_npm(dir.path(), "sleep 5\n", Duration::from_millis(100));

        let err = audit.run(dir.path()).await.unwrap_err();
        assert!(matches!(err, LinkedPkgError::AuditTimeout(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failed_exit_with_valid_report() {
        let dir = TempDir::new().unwrap();
        let audit = fake_npm(
            dir.path(),
            "printf '%s' '{\"auditReportVersion\": 2, \"vulnerabilities\": {}}'\nexit 1\n",
            Duration::from_secs(10),
        );

        let report = audit.run(dir.path()).await.unwrap();
        assert_eq!(report.audit_report_version, 2);
        assert!(report.vulnerabilities.is_empty());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failed_exit_with_garbage_output() {
        let dir = TempDir::new().unwrap();
        let audit = fake_npm(
            dir.path(),
            "echo 'npm ERR! code ENOLOCK'\nexit 1\n",
            Duration::from_secs(10),
        );

        let err = audit.run(dir.path()).await.unwrap_err();
        assert!(matches!(err, LinkedPkgError::AuditError(_)));
    }
}
