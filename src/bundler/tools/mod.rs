//! External toolchain invocation.
//!
//! The architecture filter and the xcframework assembler never spawn
//! processes directly. They go through [`ToolRunner`], which the binary backs
//! with [`SystemToolRunner`] and tests back with scripted fakes.

mod detection;
pub mod lipo;
mod runner;
pub mod xcodebuild;

pub use detection::{HAS_XCODEBUILD, HAS_XCRUN};
pub use runner::{SystemToolRunner, ToolInvocation, ToolOutput, ToolRunner};
