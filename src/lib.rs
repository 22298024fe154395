//! Fat framework to xcframework repackaging for binary CocoaPods pods.
//!
//! This library provides:
//! - The conversion pipeline ([`bundler`]): per-platform architecture
//!   filtering with `lipo` and assembly with `xcodebuild -create-xcframework`
//! - CocoaPods lookups and podspec rewriting ([`pod`])
//! - The command line front end ([`cli`])
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod bundler;
pub mod cli;
pub mod error;
pub mod pod;

// Re-export commonly used types
pub use error::{BuilderError, CliError, Result};
