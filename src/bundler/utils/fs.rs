//! File system utilities for framework conversion.
//!
//! Provides idempotent removal, symlink-preserving directory copies and the
//! [`WorkDirGuard`] that owns a scratch directory until it is dropped.

use crate::bundler::error::{Error, ErrorExt, Result};
use std::{
    io,
    path::{Path, PathBuf},
};

/// Removes a file, symlink or directory tree. Missing paths are not an error.
pub fn remove_path(path: &Path) -> Result<()> {
    let metadata = match std::fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e).fs_context("inspecting", path),
    };

    let result = if metadata.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    };

    match result {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).fs_context("removing", path),
    }
}

/// Creates all of the directories of the specified path, erasing it first if specified.
pub fn create_dir_all(path: &Path, erase: bool) -> Result<()> {
    if erase {
        remove_path(path)?;
    }
    std::fs::create_dir_all(path).fs_context("creating directory", path)
}

/// Makes a symbolic link to a directory.
#[cfg(unix)]
fn symlink_dir(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(src, dst)
}

/// Makes a symbolic link to a directory.
#[cfg(windows)]
fn symlink_dir(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_dir(src, dst)
}

/// Makes a symbolic link to a file.
#[cfg(unix)]
fn symlink_file(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(src, dst)
}

/// Makes a symbolic link to a file.
#[cfg(windows)]
fn symlink_file(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(src, dst)
}

/// Recursively copies a directory from one path to another, creating any
/// parent directories of the destination path as necessary.
///
/// Symlinks are recreated rather than followed, so versioned framework
/// layouts (`Versions/Current -> A`) survive the copy.
/// Fails if the source path is not a directory or doesn't exist.
pub fn copy_dir(from: &Path, to: &Path) -> Result<()> {
    if !from.exists() {
        return Err(Error::GenericError(format!("{from:?} does not exist")));
    }
    if !from.is_dir() {
        return Err(Error::GenericError(format!("{from:?} is not a Directory")));
    }

    if let Some(parent) = to.parent() {
        std::fs::create_dir_all(parent).fs_context("creating directory", parent)?;
    }

    for entry in walkdir::WalkDir::new(from) {
        let entry = entry?;
        debug_assert!(entry.path().starts_with(from));
        let rel_path = entry.path().strip_prefix(from)?;
        let dest_path = to.join(rel_path);

        if entry.file_type().is_symlink() {
            let target = std::fs::read_link(entry.path()).fs_context("reading link", entry.path())?;
            let linked = if entry.path().is_dir() {
                symlink_dir(&target, &dest_path)
            } else {
                symlink_file(&target, &dest_path)
            };
            linked.fs_context("creating symlink", &dest_path)?;
        } else if entry.file_type().is_dir() {
            std::fs::create_dir_all(&dest_path).fs_context("creating directory", &dest_path)?;
        } else {
            std::fs::copy(entry.path(), &dest_path).fs_context("copying", entry.path())?;
        }
    }

    Ok(())
}

/// Owns a scratch directory and deletes it on drop.
///
/// Call [`WorkDirGuard::keep`] to hand the directory to someone else instead.
#[derive(Debug)]
pub struct WorkDirGuard {
    path: Option<PathBuf>,
}

impl WorkDirGuard {
    /// Creates `path` as an empty directory, deleting whatever was there.
    pub fn create_fresh(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if path.exists() {
            log::debug!("Removing stale working directory {}", path.display());
        }
        // Guard first so a failed create still cleans up partial state
        let guard = Self { path: Some(path) };
        create_dir_all(guard.path(), true)?;
        Ok(guard)
    }

    /// The guarded directory.
    pub fn path(&self) -> &Path {
        self.path.as_deref().unwrap_or_else(|| Path::new(""))
    }

    /// Disarms the guard and returns the directory; the caller now owns cleanup.
    pub fn keep(mut self) -> PathBuf {
        self.path.take().unwrap_or_default()
    }
}

impl Drop for WorkDirGuard {
    fn drop(&mut self) {
        if let Some(path) = self.path.take() {
            // Best effort cleanup - nothing to propagate to in a destructor
            if let Err(e) = remove_path(&path) {
                log::warn!("Failed to remove working directory {}: {}", path.display(), e);
            } else {
                log::debug!("Removed working directory {}", path.display());
            }
        }
    }
}
