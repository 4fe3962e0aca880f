use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use sitegen_core::normalize_relative_path;
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("path escapes the output directory: {0}")]
    InvalidPath(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Ensure output directory exists; create if missing.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::OutputDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    }
    Ok(())
}

/// Delete the output directory if present and recreate it empty.
pub fn prepare_output_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        if !dir.is_dir() {
            return Err(PersistError::OutputDir(format!(
                "{} is not a directory",
                dir.display()
            )));
        }
        fs::remove_dir_all(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    }
    ensure_output_dir(dir)
}

/// Joins an output-relative path onto `root`, rejecting `..` segments.
pub fn resolve_output_path(root: &Path, relative: &str) -> Result<PathBuf, PersistError> {
    let normalized = normalize_relative_path(relative);
    if normalized.is_empty() {
        return Err(PersistError::InvalidPath(relative.to_string()));
    }
    let mut target = root.to_path_buf();
    for segment in normalized.split('/') {
        match segment {
            "" | "." => {}
            ".." => return Err(PersistError::InvalidPath(relative.to_string())),
            other => target.push(other),
        }
    }
    Ok(target)
}

/// Atomically writes files below an output root: temp file in the destination
/// directory, then rename.
#[derive(Debug, Clone)]
pub struct AtomicFileWriter {
    root: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn write(&self, relative: &str, content: &[u8]) -> Result<PathBuf, PersistError> {
        let target = resolve_output_path(&self.root, relative)?;
        let dir = target
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.root.clone());
        ensure_output_dir(&dir)?;

        let mut tmp = NamedTempFile::new_in(&dir)?;
        tmp.write_all(content)?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        if target.exists() {
            fs::remove_file(&target)?;
        }
        tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
        Ok(target)
    }
}
