//! Page files in the output directory.

use std::fs;
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory {path:?} is not usable: {reason}")]
    OutputDir { path: PathBuf, reason: String },
    #[error("`{0}` does not name a file inside the output directory")]
    OutsideOutputDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Creates `dir` when missing and checks that pages can be written into it.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    let unusable = |reason: String| PersistError::OutputDir {
        path: dir.to_path_buf(),
        reason,
    };
    match fs::metadata(dir) {
        Ok(meta) if !meta.is_dir() => return Err(unusable("not a directory".into())),
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            fs::create_dir_all(dir).map_err(|e| unusable(e.to_string()))?;
        }
        Err(err) => return Err(unusable(err.to_string())),
    }
    NamedTempFile::new_in(dir).map_err(|e| unusable(e.to_string()))?;
    Ok(())
}

/// Writes downloaded pages and debug payloads under the output directory.
///
/// A page appears under its final name only once complete, so an interrupted
/// run never leaves half an image behind, and a rerun replaces the old copy.
#[derive(Debug, Clone)]
pub struct PageWriter {
    output_dir: PathBuf,
}

impl PageWriter {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    pub fn write(&self, filename: &str, content: &[u8]) -> Result<PathBuf, PersistError> {
        let target = self.target_path(filename)?;
        let parent = target.parent().unwrap_or(&self.output_dir);
        let mut tmp = NamedTempFile::new_in(parent)?;
        tmp.write_all(content)?;
        tmp.as_file_mut().sync_all()?;

        if target.is_file() {
            fs::remove_file(&target)?;
        }
        tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
        Ok(target)
    }

    // Filenames come from user-supplied prefixes and suffixes; only plain
    // relative names may land on disk.
    fn target_path(&self, filename: &str) -> Result<PathBuf, PersistError> {
        let relative = Path::new(filename);
        let mut components = relative.components().peekable();
        if components.peek().is_none()
            || !components.all(|component| matches!(component, Component::Normal(_)))
        {
            return Err(PersistError::OutsideOutputDir(filename.to_string()));
        }
        Ok(self.output_dir.join(relative))
    }
}
