//! Framework normalization pipeline.
//!
//! This module turns a fat `.framework` (device and simulator slices in one
//! binary) into an `.xcframework` with one architecture-homogeneous binary
//! per platform.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use xcframework_builder::bundler::{SystemToolRunner, XcframeworkAssembler};
//!
//! # fn example() -> xcframework_builder::bundler::Result<()> {
//! let assembler = XcframeworkAssembler::new(SystemToolRunner);
//! let xcframework = assembler.assemble(Path::new("NIMSDK/NIMSDK.framework"))?;
//! println!("Created {}", xcframework.display());
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`platform`] - Target platforms and their architecture tables
//! - [`tools`] - `lipo` and `xcodebuild` behind the [`ToolRunner`] trait
//! - [`xcframework`] - Architecture filter and assembler
//! - [`utils`] - Filesystem, HTTP and zip helpers

pub mod error;
pub mod platform;
pub mod tools;
pub mod utils;
pub mod xcframework;

pub use error::{Context, Error, ErrorExt, Result};
pub use platform::Platform;
pub use tools::{SystemToolRunner, ToolInvocation, ToolOutput, ToolRunner};
pub use xcframework::{ArchitectureFilter, PlatformBundle, XcframeworkAssembler};
