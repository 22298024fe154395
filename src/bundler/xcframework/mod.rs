//! Fat framework to xcframework conversion.
//!
//! [`ArchitectureFilter`] produces one single-platform copy of a framework,
//! [`XcframeworkAssembler`] drives it for every platform and merges the
//! copies with `xcodebuild`.
//!
//! ```text
//! NIMSDK.framework                      (armv7 arm64 i386 x86_64)
//!   ├─ NIMSDK.framework-iphoneos/        (armv7 arm64)      ─┐
//!   └─ NIMSDK.framework-iphonesimulator/ (i386 x86_64)      ─┴─> NIMSDK.xcframework
//! ```

mod assembler;
mod filter;

pub use assembler::{XCFRAMEWORK_EXTENSION, XcframeworkAssembler, xcframework_output_path};
pub use filter::{ArchitectureFilter, PlatformBundle, payload_path, platform_work_dir};

/// File whose presence marks a directory as a framework bundle.
pub const BUNDLE_MARKER: &str = "Info.plist";
