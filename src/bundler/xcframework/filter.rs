//! Per-platform architecture stripping.

use std::collections::BTreeSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::bundler::{
    error::{Error, Result},
    platform::Platform,
    tools::{ToolRunner, lipo},
    utils::fs::{WorkDirGuard, copy_dir},
};

/// Working directory for one platform: `<bundle>-<platform>`, a sibling of
/// the bundle however the bundle path is spelled.
pub fn platform_work_dir(bundle: &Path, platform: Platform) -> PathBuf {
    let mut name = bundle
        .file_name()
        .map(OsString::from)
        .unwrap_or_default();
    name.push("-");
    name.push(platform.as_str());
    match bundle.parent() {
        Some(parent) => parent.join(name),
        None => PathBuf::from(name),
    }
}

/// Binary inside a framework: `Foo.framework/Foo`.
pub fn payload_path(framework: &Path) -> Option<PathBuf> {
    framework.file_stem().map(|stem| framework.join(stem))
}

/// A framework copy holding only one platform's architectures.
///
/// Dropping the value deletes its working directory. Use
/// [`PlatformBundle::keep`] to take the directory over instead.
#[derive(Debug)]
pub struct PlatformBundle {
    platform: Platform,
    framework: PathBuf,
    work_dir: WorkDirGuard,
}

impl PlatformBundle {
    /// Platform this copy was filtered for.
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Path of the filtered framework inside the working directory.
    pub fn framework(&self) -> &Path {
        &self.framework
    }

    /// Working directory that contains the framework.
    pub fn work_dir(&self) -> &Path {
        self.work_dir.path()
    }

    /// Keeps the working directory on disk and returns the framework path.
    pub fn keep(self) -> PathBuf {
        self.work_dir.keep();
        self.framework
    }
}

/// Strips a fat framework down to the architectures of one platform.
#[derive(Debug)]
pub struct ArchitectureFilter<R> {
    runner: R,
}

impl<R: ToolRunner> ArchitectureFilter<R> {
    /// Creates a filter that invokes `lipo` through `runner`.
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    /// Copies `bundle` into `<bundle>-<platform>/` and removes every
    /// architecture the platform does not accept from the copy's payload.
    ///
    /// The original bundle is never modified. On failure nothing is left in
    /// the working directory; on success the returned value owns it.
    pub fn filter_architectures(&self, bundle: &Path, platform: Platform) -> Result<PlatformBundle> {
        let valid = platform.valid_architectures();

        let name = bundle.file_name().ok_or_else(|| Error::InvalidBundle {
            path: bundle.to_path_buf(),
        })?;

        let work_dir = WorkDirGuard::create_fresh(platform_work_dir(bundle, platform))?;
        let framework = work_dir.path().join(name);

        copy_dir(bundle, &framework).map_err(|source| Error::CopyFailed {
            from: bundle.to_path_buf(),
            to: framework.clone(),
            source: Box::new(source),
        })?;

        let payload = payload_path(&framework)
            .filter(|p| p.is_file())
            .ok_or_else(|| Error::PayloadMissing {
                path: payload_path(&framework).unwrap_or_else(|| framework.clone()),
            })?;

        let current = lipo::architectures(&self.runner, &payload)?;
        let remove: BTreeSet<&str> = current
            .iter()
            .map(String::as_str)
            .filter(|arch| !platform.accepts(arch))
            .collect();

        for arch in remove.iter().filter(|a| !Platform::is_known_architecture(a)) {
            log::warn!(
                "{} contains architecture '{}' unknown to every platform, removing it",
                payload.display(),
                arch
            );
        }

        if remove.is_empty() {
            log::debug!(
                "{}: [{}] already valid for {}",
                payload.display(),
                join(current.iter().map(String::as_str)),
                platform
            );
        } else {
            log::info!(
                "Removing [{}] from {} for {}",
                join(remove.iter().copied()),
                payload.display(),
                platform
            );
            lipo::remove_architectures(&self.runner, &payload, &remove)?;
        }

        let missing: Vec<&str> = valid
            .iter()
            .copied()
            .filter(|arch| !current.contains(*arch))
            .collect();
        if !missing.is_empty() {
            log::debug!("{} slice has no [{}]", platform, join(missing));
        }

        Ok(PlatformBundle {
            platform,
            framework,
            work_dir,
        })
    }
}

fn join<'a>(items: impl IntoIterator<Item = &'a str>) -> String {
    items.into_iter().collect::<Vec<_>>().join(" ")
}
