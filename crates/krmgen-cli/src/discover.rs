//! Finding manifest files under an input path

use std::path::{Path, PathBuf};

use crate::error::{CliError, Result};

/// Manifest files under `root`, sorted
///
/// A file is returned as is; a directory is walked recursively for
/// `*.yaml` and `*.yml` files.
pub fn manifest_files(root: &Path) -> Result<Vec<PathBuf>> {
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }
    if !root.is_dir() {
        return Err(CliError::input_with_help(
            format!("{} does not exist", root.display()),
            "Pass a directory of manifests, a manifest file or a Helm chart",
        ));
    }

    let mut files = Vec::new();
    for entry in walkdir::WalkDir::new(root) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "Skipping unreadable directory entry");
                continue;
            }
        };
        let path = entry.path();
        if entry.file_type().is_file() && is_manifest(path) {
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    Ok(files)
}

fn is_manifest(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| matches!(ext.as_str(), "yaml" | "yml"))
}
