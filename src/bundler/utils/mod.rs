//! Filesystem, network and archive helpers shared by the pipeline.

pub mod archive;
pub mod fs;
pub mod http;
