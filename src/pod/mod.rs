//! CocoaPods trunk lookups and podspec rewriting.

mod podspec;
mod versions;

pub use podspec::Podspec;
pub use versions::{
    DEFAULT_CDN_URL, DEFAULT_SPECS_URL, is_release_version, latest_version, name_shard,
    patch_version, podspec_url, versions_index_url,
};
