//! Helm chart expansion through `helm template`

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

use crate::error::{CliError, Result};

/// Overrides the `helm` executable
pub const HELM_ENV: &str = "KRMGEN_HELM";

/// Whether `path` is a chart directory
pub fn is_chart(path: &Path) -> bool {
    path.join("Chart.yaml").is_file()
}

/// Options passed through to `helm template`
#[derive(Debug, Clone)]
pub struct TemplateOptions<'a> {
    pub release: &'a str,
    pub namespace: Option<&'a str>,
    pub values: &'a [PathBuf],
}

/// Render `chart` into a temporary directory
///
/// The directory is removed when the returned guard is dropped.
pub fn template(chart: &Path, options: &TemplateOptions<'_>) -> Result<TempDir> {
    let out = tempfile::Builder::new().prefix("krmgen-helm-").tempdir()?;

    let helm = std::env::var_os(HELM_ENV).unwrap_or_else(|| OsString::from("helm"));
    let mut cmd = Command::new(&helm);
    cmd.arg("template")
        .arg(options.release)
        .arg(chart)
        .arg("--output-dir")
        .arg(out.path());
    if let Some(namespace) = options.namespace {
        cmd.arg("--namespace").arg(namespace);
    }
    for values in options.values {
        cmd.arg("--values").arg(values);
    }

    tracing::info!(chart = %chart.display(), release = options.release, "Expanding Helm chart");
    let output = cmd.output().map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            CliError::helm(
                format!("'{}' was not found", helm.to_string_lossy()),
                Some(format!(
                    "Install Helm 3, set {HELM_ENV} to its path, or pass pre-rendered manifests"
                )),
            )
        } else {
            CliError::helm(format!("failed to run helm: {e}"), None)
        }
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        tracing::debug!(status = %output.status, "helm template exited");
        return Err(CliError::helm(
            format!("helm template failed: {}", stderr.trim()),
            None,
        ));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_is_chart() {
        let dir = TempDir::new().unwrap();
        assert!(!is_chart(dir.path()));
        fs::write(dir.path().join("Chart.yaml"), "apiVersion: v2\nname: demo\n").unwrap();
        assert!(is_chart(dir.path()));
    }
}
