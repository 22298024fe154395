//! Command line interface for the xcframework builder.
//!
//! This module wires argument parsing, runtime configuration and the build
//! command together.

mod args;
pub mod commands;
mod output;

pub use args::{Args, RuntimeConfig};
pub use output::OutputManager;

use crate::bundler::SystemToolRunner;
use crate::error::Result;

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    let config = RuntimeConfig::from_args(&args)?;

    commands::PodBuilder::new(config, SystemToolRunner)?
        .run()
        .await?;

    Ok(0)
}
