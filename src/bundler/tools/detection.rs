//! Availability checks for the Xcode command line tools.
//!
//! Results are cached so the orchestration layer can warn once before the
//! first conversion instead of failing deep inside the pipeline.

use std::sync::LazyLock;

/// `xcrun` is on `PATH` (needed for `lipo`).
pub static HAS_XCRUN: LazyLock<bool> = LazyLock::new(|| responds("xcrun", &["--version"]));

/// `xcodebuild` is on `PATH` and answers `-version`.
pub static HAS_XCODEBUILD: LazyLock<bool> = LazyLock::new(|| responds("xcodebuild", &["-version"]));

fn responds(tool: &str, version_args: &[&str]) -> bool {
    match which::which(tool) {
        Ok(path) => {
            log::debug!("Found {} at: {}", tool, path.display());

            match std::process::Command::new(&path).args(version_args).output() {
                Ok(output) if output.status.success() => {
                    let version = String::from_utf8_lossy(&output.stdout);
                    let first_line = version.lines().next().unwrap_or_default();
                    log::info!("{} available: {}", tool, first_line.trim());
                    true
                }
                Ok(output) => {
                    log::warn!(
                        "{} found at {} but version check failed (exit code: {:?}). Stderr: {}",
                        tool,
                        path.display(),
                        output.status.code(),
                        String::from_utf8_lossy(&output.stderr).trim()
                    );
                    false
                }
                Err(e) => {
                    log::warn!(
                        "{} found at {} but failed to execute: {}",
                        tool,
                        path.display(),
                        e
                    );
                    false
                }
            }
        }
        Err(e) => {
            log::debug!("{} not found in PATH: {}", tool, e);
            false
        }
    }
}
