//! Command execution for the builder.

mod build;

pub use build::{BuildReport, PodBuilder};
