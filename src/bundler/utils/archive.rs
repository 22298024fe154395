//! Zip extraction for downloaded pod sources.

use crate::bundler::error::{ErrorExt, Result};
use crate::bundler::utils::fs::remove_path;
use std::path::{Path, PathBuf};

/// Extracts `file` into a sibling directory named after its stem.
///
/// `working/sdk-abc.zip` unpacks into `working/sdk-abc`. A directory left at
/// that location by an earlier run is removed first.
pub fn extract_zip(file: &Path) -> Result<PathBuf> {
    let stem = file.file_stem().unwrap_or(file.as_os_str());
    let dest = file.with_file_name(stem);
    if dest == file {
        crate::bail!("cannot extract {} onto itself", file.display());
    }

    remove_path(&dest)?;

    let reader = std::fs::File::open(file).fs_context("opening archive", file)?;
    let mut archive = zip::ZipArchive::new(reader)?;
    log::debug!(
        "Extracting {} entries from {} into {}",
        archive.len(),
        file.display(),
        dest.display()
    );

    if let Err(e) = archive.extract(&dest) {
        let _ = remove_path(&dest);
        return Err(e.into());
    }

    Ok(dest)
}
