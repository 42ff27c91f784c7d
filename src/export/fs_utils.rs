// src/export/fs_utils.rs

use crate::errors::{AppError, AppResult};
use crate::utils::path::expand_tilde;
use std::fs;
use std::path::{Path, PathBuf};

/// Resolve the output directory (with `~` expansion) and create it if needed.
pub(crate) fn prepare_output_dir(dir: &str) -> AppResult<PathBuf> {
    let dir = expand_tilde(dir);
    if dir.exists() && !dir.is_dir() {
        return Err(AppError::Export(format!(
            "output path is not a directory: {}",
            dir.display()
        )));
    }
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Existing reports are replaced; the file name already carries the run date.
pub(crate) fn output_path(dir: &Path, file_name: &str) -> PathBuf {
    let path = dir.join(file_name);
    if path.exists() {
        tracing::warn!(path = %path.display(), "overwriting existing report");
    }
    path
}
