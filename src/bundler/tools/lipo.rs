//! `xcrun lipo` wrappers for reading and trimming fat binary architectures.

use std::collections::BTreeSet;
use std::path::Path;

use super::runner::{ToolInvocation, ToolOutput, ToolRunner};
use crate::bundler::error::{Error, Result};

/// Lists the architectures embedded in `binary`.
///
/// A failed `lipo` run is a [`Error::ToolError`]; it is never read as an
/// empty set.
pub fn architectures<R: ToolRunner>(runner: &R, binary: &Path) -> Result<BTreeSet<String>> {
    let invocation = ToolInvocation::new("xcrun")
        .args(["lipo", "-archs"])
        .arg(binary);
    let output = run_checked(runner, &invocation)?;

    Ok(output
        .stdout
        .split_whitespace()
        .map(str::to_string)
        .collect())
}

/// Removes `archs` from `binary`, rewriting it in place.
pub fn remove_architectures<R, I, S>(runner: &R, binary: &Path, archs: I) -> Result<()>
where
    R: ToolRunner,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut invocation = ToolInvocation::new("xcrun").arg("lipo");
    for arch in archs {
        invocation = invocation.arg("-remove").arg(arch.as_ref());
    }
    let invocation = invocation.arg(binary).arg("-o").arg(binary);

    run_checked(runner, &invocation).map(|_| ())
}

fn run_checked<R: ToolRunner>(runner: &R, invocation: &ToolInvocation) -> Result<ToolOutput> {
    let output = runner.run(invocation).map_err(|e| Error::ToolError {
        command: invocation.to_string(),
        code: None,
        stderr: e.to_string(),
    })?;

    if !output.is_success() {
        return Err(Error::ToolError {
            command: invocation.to_string(),
            code: output.code,
            stderr: output.stderr,
        });
    }

    Ok(output)
}
