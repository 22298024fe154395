//! Top-level error types and their process exit codes.
//!
//! Each pipeline stage fails with its own variant so scripted callers can
//! tell failures apart by exit code alone.

use std::path::PathBuf;
use thiserror::Error;

use crate::bundler;

/// Result type alias for builder operations
pub type Result<T> = std::result::Result<T, BuilderError>;

/// Main error type for a build run
#[derive(Error, Debug)]
pub enum BuilderError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// Versions index could not be fetched
    #[error("failed to fetch versions index {url}: {source}")]
    VersionsIndex {
        /// Index URL
        url: String,
        /// Transport or status error
        source: bundler::Error,
    },

    /// Versions index has no line for the pod
    #[error("pod {name} is not listed in the versions index")]
    VersionNotFound {
        /// Pod name
        name: String,
    },

    /// Podspec could not be fetched
    #[error("failed to fetch podspec from {url}: {source}")]
    PodspecFetch {
        /// Podspec URL
        url: String,
        /// Transport or status error
        source: bundler::Error,
    },

    /// Podspec body is not a JSON object
    #[error("could not decode podspec: {0}")]
    PodspecDecode(#[source] serde_json::Error),

    /// Podspec has no `source.http` archive
    #[error("podspec has no source.http archive to download")]
    PodspecSource,

    /// Archive download failed
    #[error("download of {url} failed: {source}")]
    Download {
        /// Archive URL
        url: String,
        /// Underlying failure
        source: bundler::Error,
    },

    /// Archive extraction failed
    #[error("failed to extract {}: {source}", .path.display())]
    Extract {
        /// Archive path
        path: PathBuf,
        /// Underlying failure
        source: bundler::Error,
    },

    /// Framework to xcframework conversion failed
    #[error("failed to convert {}: {source}", .framework.display())]
    Convert {
        /// Framework that was being converted
        framework: PathBuf,
        /// Pipeline failure
        source: bundler::Error,
    },

    /// Extracted tree could not be moved to the output directory
    #[error("could not move {} to {}: {source}", .from.display(), .to.display())]
    Relocate {
        /// Extracted tree
        from: PathBuf,
        /// Destination
        to: PathBuf,
        /// Underlying failure
        source: std::io::Error,
    },

    /// Rewritten podspec could not be written
    #[error("could not write podspec {}: {source}", .path.display())]
    PodspecWrite {
        /// Destination file
        path: PathBuf,
        /// Underlying failure
        source: std::io::Error,
    },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Bundler errors outside a specific stage
    #[error("Bundler error: {0}")]
    Bundler(#[from] bundler::Error),

    /// Generic errors from anyhow
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },
}

impl BuilderError {
    /// Process exit code for this failure class.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Cli(_) => 1,
            Self::VersionsIndex { .. } => 11,
            Self::VersionNotFound { .. } => 12,
            Self::PodspecFetch { .. } => 21,
            Self::PodspecDecode(_) => 22,
            Self::PodspecSource => 23,
            Self::Convert { source, .. } => match source {
                bundler::Error::AssemblyToolError { .. } => 33,
                bundler::Error::InvalidBundle { .. } => 34,
                _ => 31,
            },
            Self::Relocate { .. } => 32,
            Self::Download { .. } => 41,
            Self::Extract { .. } => 42,
            Self::PodspecWrite { .. } => 51,
            Self::Io(_) | Self::Bundler(_) | Self::Anyhow(_) => 1,
        }
    }

    /// Short hint printed after the error message, when one applies.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Convert { source, .. } => match source.root_cause() {
                bundler::Error::ToolError { code: None, .. }
                | bundler::Error::AssemblyToolError { code: None, .. } => Some(
                    "Install the Xcode command line tools (xcode-select --install) and retry",
                ),
                _ => None,
            },
            Self::VersionNotFound { .. } => {
                Some("Pass the pod version explicitly or check the pod name")
            }
            _ => None,
        }
    }
}
