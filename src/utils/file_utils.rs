use anyhow::{Context, Result};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::V2iError;

/// Returns the first `{base}_{name}_{n}` (n = 1, 2, ...) that does not exist yet, creating it.
pub fn next_available_dir(base: &Path, video_name: &str) -> Result<PathBuf, V2iError> {
    let mut index: u64 = 1;
    loop {
        let mut candidate = OsString::from(base.as_os_str());
        candidate.push(format!("_{}_{}", video_name, index));
        let candidate = PathBuf::from(candidate);
        if !candidate.exists() {
            fs::create_dir_all(&candidate).map_err(|source| V2iError::OutputDir {
                path: candidate.clone(),
                source,
            })?;
            return Ok(candidate);
        }
        index += 1;
    }
}

/// File name without directory and extension, used as the video's display name.
pub fn video_display_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

pub fn executable_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("Failed to locate the running executable")?;
    let exe = exe.canonicalize().unwrap_or(exe);
    exe.parent()
        .map(Path::to_path_buf)
        .context("Executable path has no parent directory")
}
