use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

const MAX_LINK_DEPTH: usize = 32;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
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
    // Basic writability probe: try creating a temp file.
    NamedTempFile::new_in(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    Ok(())
}

/// Replaces a file in one step: content goes to a temp file next to the
/// target, which is then renamed over it. Readers see either the old or
/// the complete new content, never a prefix.
///
/// A symlinked target is written through: the file it points to is
/// replaced and the link stays. An existing file keeps its permissions.
pub struct AtomicFileWriter {
    target: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(target: PathBuf) -> Self {
        Self { target }
    }

    pub fn write(&self, content: &str) -> Result<PathBuf, PersistError> {
        self.write_with(|out| out.write_all(content.as_bytes()))
    }

    /// Streams content produced by `fill`. An error from `fill` leaves the
    /// target untouched and removes the temp file.
    pub fn write_with<F>(&self, fill: F) -> Result<PathBuf, PersistError>
    where
        F: FnOnce(&mut dyn Write) -> io::Result<()>,
    {
        let real_target = resolve_link(&self.target)?;
        let dir = match real_target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        ensure_output_dir(&dir)?;

        let mut tmp = NamedTempFile::new_in(&dir)?;
        {
            let mut out = BufWriter::new(tmp.as_file_mut());
            fill(&mut out)?;
            out.flush()?;
        }
        if let Ok(previous) = fs::metadata(&real_target) {
            tmp.as_file().set_permissions(previous.permissions())?;
        }
        tmp.as_file_mut().sync_all()?;

        tmp.persist(&real_target)
            .map_err(|e| PersistError::Io(e.error))?;
        Ok(self.target.clone())
    }
}

/// Follows symlinks (including dangling ones) to the path that actually
/// gets replaced. Anything that is not a link is returned as is.
fn resolve_link(path: &Path) -> Result<PathBuf, PersistError> {
    let mut current = path.to_path_buf();
    // Bounded so a link cycle cannot spin forever.
    for _ in 0..MAX_LINK_DEPTH {
        match fs::symlink_metadata(&current) {
            Ok(meta) if meta.file_type().is_symlink() => {
                let link = fs::read_link(&current)?;
                current = match current.parent() {
                    Some(parent) if link.is_relative() => parent.join(link),
                    _ => link,
                };
            }
            _ => return Ok(current),
        }
    }
    Err(PersistError::Io(io::Error::other(format!(
        "too many levels of symbolic links: {}",
        path.display()
    ))))
}
