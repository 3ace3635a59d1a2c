use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

use crate::{Failure, FailureKind};

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl From<PersistError> for Failure {
    fn from(err: PersistError) -> Self {
        Failure::new(FailureKind::Io, err.to_string())
    }
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
    // Basic writability probe: try creating a temp file.
    NamedTempFile::new_in(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    Ok(())
}

/// Download staged in a temp file next to its destination.
///
/// Dropping it without [`StagedFile::commit`] removes the temp file, so an
/// aborted transfer leaves nothing behind.
#[derive(Debug)]
pub struct StagedFile {
    tmp: NamedTempFile,
    written: u64,
}

impl StagedFile {
    pub fn create_in(dir: &Path) -> Result<Self, PersistError> {
        if !dir.is_dir() {
            fs::create_dir_all(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
        }
        let tmp = NamedTempFile::new_in(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
        Ok(Self { tmp, written: 0 })
    }

    pub fn write_chunk(&mut self, chunk: &[u8]) -> Result<(), PersistError> {
        self.tmp.write_all(chunk)?;
        self.written += chunk.len() as u64;
        Ok(())
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    /// Syncs and renames the staged bytes to `target`.
    ///
    /// The rename replaces an existing file in one step, so `target` always
    /// holds either the old or the new contents.
    pub fn commit(mut self, target: &Path) -> Result<PathBuf, PersistError> {
        self.tmp.flush()?;
        self.tmp.as_file_mut().sync_all()?;

        self.tmp
            .persist(target)
            .map_err(|e| PersistError::Io(e.error))?;
        Ok(target.to_path_buf())
    }
}
