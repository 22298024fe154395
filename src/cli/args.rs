//! Command line argument parsing and validation.
//!
//! This module provides CLI argument parsing using clap, with environment
//! variable fallbacks for everything that is not positional.

use clap::Parser;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Duration;

use crate::bundler::{Platform, utils::http::DEFAULT_CONNECT_TIMEOUT};
use crate::error::{CliError, Result};
use crate::pod::{DEFAULT_CDN_URL, DEFAULT_SPECS_URL, is_release_version};

/// Repackages a fat-framework CocoaPods pod as xcframeworks
#[derive(Parser, Debug)]
#[command(
    name = "xcframework_builder",
    version,
    about = "Repackages a fat-framework CocoaPods pod as xcframeworks",
    long_about = "Downloads a binary CocoaPods pod, converts every embedded .framework into an
.xcframework with one slice per platform, and writes a podspec pointing at
the repackaged release.

Usage:
  xcframework_builder                    # latest upstream version
  xcframework_builder 8.9.0              # publishes 8.9.001
  xcframework_builder 8.9.0 8.9.0-xc     # explicit new version

Exit code 0 = <output>/<name> and <output>/<name>.podspec.json were written."
)]
pub struct Args {
    /// Upstream pod version (MAJOR.MINOR.PATCH); latest when omitted
    #[arg(value_name = "VERSION")]
    pub pod_version: Option<String>,

    /// Version of the repackaged pod; derived from VERSION when omitted
    #[arg(value_name = "NEW_VERSION")]
    pub new_version: Option<String>,

    /// Pod to repackage
    #[arg(short, long, env = "POD_NAME", default_value = "NIMSDK_LITE")]
    pub name: String,

    /// Git repository the rewritten podspec points at
    #[arg(
        short,
        long,
        env = "POD_REPO",
        default_value = "https://github.com/ElfSundae/NIMSDK_LITE-xcframework.git"
    )]
    pub repo: String,

    /// Directory receiving the converted pod and its podspec
    #[arg(short, long, env = "POD_OUTPUT_DIR", value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Scratch directory for downloads [default: <OUTPUT_DIR>/working]
    #[arg(short, long, value_name = "DIR")]
    pub working_dir: Option<PathBuf>,

    /// Platforms to slice, in xcframework order
    #[arg(
        long,
        value_delimiter = ',',
        default_value = "iphoneos,iphonesimulator"
    )]
    pub platforms: Vec<String>,

    /// CocoaPods CDN base URL
    #[arg(long, env = "COCOAPODS_CDN_URL", default_value = DEFAULT_CDN_URL)]
    pub cdn_url: String,

    /// Specs repository base URL
    #[arg(long, env = "COCOAPODS_SPECS_URL", default_value = DEFAULT_SPECS_URL)]
    pub specs_url: String,

    /// HTTP connect timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_CONNECT_TIMEOUT.as_secs())]
    pub connect_timeout: u64,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if let Some(version) = &self.pod_version
            && !is_release_version(version)
        {
            return Err(format!(
                "Invalid version '{version}'. Expected MAJOR.MINOR.PATCH, e.g. 8.9.0"
            ));
        }

        if self.name.trim().is_empty() {
            return Err("Pod name cannot be empty".to_string());
        }

        if self.new_version.as_deref().is_some_and(|v| v.trim().is_empty()) {
            return Err("New version cannot be empty".to_string());
        }

        if self.platforms.is_empty() {
            return Err("At least one platform is required".to_string());
        }

        Ok(())
    }
}

/// Configuration derived from validated command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Pod name
    pub name: String,
    /// Repository for the rewritten podspec
    pub repo: String,
    /// Requested upstream version
    pub version: Option<String>,
    /// Requested new version
    pub new_version: Option<String>,
    /// Output directory
    pub output_dir: PathBuf,
    /// Scratch directory
    pub working_dir: PathBuf,
    /// Platforms in slice order
    pub platforms: Vec<Platform>,
    /// CDN base URL
    pub cdn_url: String,
    /// Specs base URL
    pub specs_url: String,
    /// HTTP connect timeout
    pub connect_timeout: Duration,
    /// Output manager for terminal progress
    output: super::OutputManager,
}

impl RuntimeConfig {
    /// Validates `args` and resolves defaults.
    pub fn from_args(args: &Args) -> Result<Self> {
        args.validate()
            .map_err(|reason| CliError::InvalidArguments { reason })?;

        let platforms = args
            .platforms
            .iter()
            .map(|p| p.trim().parse::<Platform>())
            .collect::<std::result::Result<Vec<_>, _>>()?;

        // Each platform owns one working directory per bundle
        let mut seen = BTreeSet::new();
        if let Some(duplicate) = platforms.iter().find(|p| !seen.insert(**p)) {
            return Err(CliError::InvalidArguments {
                reason: format!("Platform '{duplicate}' is listed more than once"),
            }
            .into());
        }

        let working_dir = args
            .working_dir
            .clone()
            .unwrap_or_else(|| args.output_dir.join("working"));

        Ok(Self {
            name: args.name.trim().to_string(),
            repo: args.repo.clone(),
            version: args.pod_version.clone(),
            new_version: args.new_version.clone(),
            output_dir: args.output_dir.clone(),
            working_dir,
            platforms,
            cdn_url: args.cdn_url.clone(),
            specs_url: args.specs_url.clone(),
            connect_timeout: Duration::from_secs(args.connect_timeout),
            output: super::OutputManager::new(args.quiet),
        })
    }

    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }
}
