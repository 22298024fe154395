//! `xcodebuild -create-xcframework` wrapper.

use std::path::{Path, PathBuf};

use super::runner::{ToolInvocation, ToolRunner};
use crate::bundler::error::{Error, Result};

/// Merges per-platform frameworks into a single xcframework at `output`.
///
/// Framework order is passed through unchanged.
pub fn create_xcframework<R: ToolRunner>(
    runner: &R,
    frameworks: &[PathBuf],
    output: &Path,
) -> Result<()> {
    let mut invocation = ToolInvocation::new("xcodebuild").arg("-create-xcframework");
    for framework in frameworks {
        invocation = invocation.arg("-framework").arg(framework);
    }
    let invocation = invocation.arg("-output").arg(output);

    let result = runner.run(&invocation).map_err(|e| Error::AssemblyToolError {
        command: invocation.to_string(),
        code: None,
        stderr: e.to_string(),
    })?;

    if !result.is_success() {
        return Err(Error::AssemblyToolError {
            command: invocation.to_string(),
            code: result.code,
            stderr: result.stderr,
        });
    }

    Ok(())
}
