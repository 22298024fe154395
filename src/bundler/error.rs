//! Error types for framework conversion and its supporting utilities.
//!
//! Every variant is terminal for the bundle being processed. Nothing in the
//! conversion pipeline retries.

use std::fmt::Display;
use std::path::PathBuf;
use thiserror::Error;

use super::platform::Platform;

/// Result type alias for bundler operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while converting a framework or fetching its inputs.
#[derive(Error, Debug)]
pub enum Error {
    /// Platform identifier not present in the platform table
    #[error("unknown platform '{}' (expected one of: {})", .0, Platform::identifiers())]
    UnknownPlatform(String),

    /// Bundle directory lacks the `Info.plist` marker
    #[error("{} is not a framework bundle (missing Info.plist)", .path.display())]
    InvalidBundle {
        /// Bundle path that was rejected
        path: PathBuf,
    },

    /// Copying the bundle into its platform working directory failed
    #[error("failed to copy {} to {}: {source}", .from.display(), .to.display())]
    CopyFailed {
        /// Source bundle
        from: PathBuf,
        /// Destination inside the working directory
        to: PathBuf,
        /// Underlying failure
        source: Box<Error>,
    },

    /// Binary payload named after the bundle was not found
    #[error("binary payload not found at {}", .path.display())]
    PayloadMissing {
        /// Expected payload location
        path: PathBuf,
    },

    /// Architecture inspection or edit tool failed
    #[error("{command} failed ({}): {stderr}", exit_label(.code))]
    ToolError {
        /// Rendered command line
        command: String,
        /// Exit code, `None` if the process never ran or was killed
        code: Option<i32>,
        /// Captured standard error or launch failure message
        stderr: String,
    },

    /// A platform could not be filtered so the set is incomplete
    #[error(
        "only {completed} of {expected} platforms prepared, {platform} failed: {source}"
    )]
    IncompletePlatformSet {
        /// Platform whose filter step failed
        platform: Platform,
        /// Platforms successfully filtered before the failure
        completed: usize,
        /// Platforms required
        expected: usize,
        /// Failure reported by the filter
        source: Box<Error>,
    },

    /// Multi-platform assembly tool failed
    #[error("{command} failed ({}): {stderr}", exit_label(.code))]
    AssemblyToolError {
        /// Rendered command line
        command: String,
        /// Exit code, `None` if the process never ran or was killed
        code: Option<i32>,
        /// Captured standard error or launch failure message
        stderr: String,
    },

    /// IO error without path information
    #[error("{0}")]
    IoError(#[from] std::io::Error),

    /// IO error annotated with the operation and path
    #[error("{context} {}: {error}", .path.display())]
    Fs {
        /// What was being done
        context: String,
        /// Path involved
        path: PathBuf,
        /// Underlying error
        error: std::io::Error,
    },

    /// HTTP transport or status error
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    /// Zip archive could not be read or unpacked
    #[error("{0}")]
    Zip(#[from] zip::result::ZipError),

    /// Directory traversal error
    #[error("{0}")]
    WalkDir(#[from] walkdir::Error),

    /// Relative path computation failed
    #[error("{0}")]
    StripPrefix(#[from] std::path::StripPrefixError),

    /// Error wrapped with a higher level description
    #[error("{context}: {source}")]
    Context {
        /// Description of the failed operation
        context: String,
        /// Wrapped error
        source: Box<Error>,
    },

    /// Anything else
    #[error("{0}")]
    GenericError(String),
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "did not exit normally".to_string(),
    }
}

impl Error {
    /// Innermost error, following `Context` and `IncompletePlatformSet` chains.
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::Context { source, .. } => source.root_cause(),
            Error::IncompletePlatformSet { source, .. } => source.root_cause(),
            Error::CopyFailed { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Attaches path context to raw IO results.
pub trait ErrorExt<T> {
    /// Converts an IO error into [`Error::Fs`] naming the operation and path.
    fn fs_context(self, context: &str, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, context: &str, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|error| Error::Fs {
            context: context.to_string(),
            path: path.into(),
            error,
        })
    }
}

/// Wraps errors with a description of the failed operation.
pub trait Context<T> {
    /// Wraps the error with a static description.
    fn context<C: Display>(self, context: C) -> Result<T>;

    /// Wraps the error with a lazily built description.
    fn with_context<C: Display, F: FnOnce() -> C>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> Context<T> for std::result::Result<T, E> {
    fn context<C: Display>(self, context: C) -> Result<T> {
        self.map_err(|e| Error::Context {
            context: context.to_string(),
            source: Box::new(e.into()),
        })
    }

    fn with_context<C: Display, F: FnOnce() -> C>(self, f: F) -> Result<T> {
        self.map_err(|e| Error::Context {
            context: f().to_string(),
            source: Box::new(e.into()),
        })
    }
}

/// Returns early with a [`Error::GenericError`] built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::bundler::Error::GenericError(format!($($arg)*)))
    };
}
