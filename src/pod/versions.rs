//! Version discovery against the CocoaPods CDN and spec repository.

use regex::Regex;

/// CocoaPods CDN serving the sharded versions index.
pub const DEFAULT_CDN_URL: &str = "https://cdn.cocoapods.org";

/// Raw view of the master specs repository.
pub const DEFAULT_SPECS_URL: &str =
    "https://raw.githubusercontent.com/CocoaPods/Specs/master/Specs";

/// Shard prefix for a pod: the first three hex digits of `md5(name)`.
///
/// `AFNetworking` becomes `a/7/5` with `/` and `a_7_5` with `_`.
pub fn name_shard(name: &str, separator: &str) -> String {
    let digest = format!("{:x}", md5::compute(name.as_bytes()));
    digest
        .chars()
        .take(3)
        .map(String::from)
        .collect::<Vec<_>>()
        .join(separator)
}

/// URL of the versions index file that lists `name`.
pub fn versions_index_url(cdn_url: &str, name: &str) -> String {
    format!(
        "{}/all_pods_versions_{}.txt",
        cdn_url.trim_end_matches('/'),
        name_shard(name, "_")
    )
}

/// URL of the JSON podspec for `name` at `version`.
pub fn podspec_url(specs_url: &str, name: &str, version: &str) -> String {
    format!(
        "{}/{}/{name}/{version}/{name}.podspec.json",
        specs_url.trim_end_matches('/'),
        name_shard(name, "/")
    )
}

/// Latest version of `name` in a versions index.
///
/// Index lines look like `Name/1.0.0/1.1.0/1.2.0`; the last entry of the
/// pod's line is taken.
pub fn latest_version(index: &str, name: &str) -> Option<String> {
    let pattern = format!(r"(?m)^{}(/.+)?/([\d.]+)\r?$", regex::escape(name));
    let re = Regex::new(&pattern).ok()?;
    re.captures(index)
        .and_then(|caps| caps.get(2))
        .map(|m| m.as_str().to_string())
}

/// Version published for the repackaged pod when none is given.
///
/// Appends digits to the last component so the new version sorts after the
/// upstream one without colliding with its next patch release:
/// `8.9.0 -> 8.9.001`, `8.9.1 -> 8.9.100`.
pub fn patch_version(version: &str) -> String {
    match version.rsplit_once('.') {
        Some((head, "0")) => format!("{head}.001"),
        Some((head, last)) => format!("{head}.{last}00"),
        None if version == "0" => "001".to_string(),
        None => format!("{version}00"),
    }
}

/// Whether `version` is a plain `MAJOR.MINOR.PATCH` release number.
pub fn is_release_version(version: &str) -> bool {
    let parts: Vec<&str> = version.split('.').collect();
    parts.len() == 3
        && parts
            .iter()
            .all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()))
}
