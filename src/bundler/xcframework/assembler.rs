//! Multi-platform xcframework assembly.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use super::BUNDLE_MARKER;
use super::filter::{ArchitectureFilter, PlatformBundle};
use crate::bundler::{
    error::{Error, Result},
    platform::Platform,
    tools::{ToolRunner, xcodebuild},
    utils::fs::remove_path,
};

/// Extension of the assembled artifact.
pub const XCFRAMEWORK_EXTENSION: &str = "xcframework";

/// `<parent>/<stem>.xcframework` for a `.framework` bundle path.
pub fn xcframework_output_path(bundle: &Path) -> PathBuf {
    let mut name = bundle
        .file_stem()
        .map(OsString::from)
        .unwrap_or_default();
    name.push(".");
    name.push(XCFRAMEWORK_EXTENSION);
    match bundle.parent() {
        Some(parent) => parent.join(name),
        None => PathBuf::from(name),
    }
}

/// Converts a fat framework into an xcframework, one slice per platform.
///
/// All-or-nothing: if any platform cannot be filtered, `xcodebuild` is never
/// run. Per-platform working directories are gone when [`assemble`] returns,
/// whatever the outcome.
///
/// [`assemble`]: XcframeworkAssembler::assemble
#[derive(Debug)]
pub struct XcframeworkAssembler<R> {
    runner: R,
    platforms: Vec<Platform>,
}

impl<R: ToolRunner> XcframeworkAssembler<R> {
    /// Assembler covering every [`Platform`].
    pub fn new(runner: R) -> Self {
        Self {
            runner,
            platforms: Platform::ALL.to_vec(),
        }
    }

    /// Restricts or reorders the platforms to assemble.
    #[must_use]
    pub fn with_platforms(mut self, platforms: Vec<Platform>) -> Self {
        self.platforms = platforms;
        self
    }

    /// Platforms that will be filtered, in invocation order.
    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    /// Builds `<parent>/<stem>.xcframework` from the framework at `bundle`.
    pub fn assemble(&self, bundle: &Path) -> Result<PathBuf> {
        if !bundle.join(BUNDLE_MARKER).is_file() {
            return Err(Error::InvalidBundle {
                path: bundle.to_path_buf(),
            });
        }

        let slices = self.filter_all(bundle)?;

        let output = xcframework_output_path(bundle);
        remove_path(&output)?;

        let frameworks: Vec<PathBuf> = slices
            .iter()
            .map(|slice| slice.framework().to_path_buf())
            .collect();

        log::info!(
            "Assembling {} from {} platform slices",
            output.display(),
            frameworks.len()
        );
        let result = xcodebuild::create_xcframework(&self.runner, &frameworks, &output);

        // Slices are intermediates whether or not xcodebuild succeeded
        drop(slices);

        result.map(|()| output)
    }

    fn filter_all(&self, bundle: &Path) -> Result<Vec<PlatformBundle>> {
        let filter = ArchitectureFilter::new(&self.runner);
        let mut slices = Vec::with_capacity(self.platforms.len());

        for &platform in &self.platforms {
            match filter.filter_architectures(bundle, platform) {
                Ok(slice) => slices.push(slice),
                Err(source) => {
                    log::warn!("Filtering {} for {} failed: {}", bundle.display(), platform, source);
                    // Already filtered slices drop with `slices` here
                    return Err(Error::IncompletePlatformSet {
                        platform,
                        completed: slices.len(),
                        expected: self.platforms.len(),
                        source: Box::new(source),
                    });
                }
            }
        }

        if slices.is_empty() {
            crate::bail!("no platforms configured for {}", bundle.display());
        }

        Ok(slices)
    }
}
