//! JSON podspec model.
//!
//! Podspecs are kept as an ordered JSON object so fields this tool does not
//! understand are written back untouched and in their original order.

use regex::Regex;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::Path;
use std::sync::LazyLock;

/// `**/Foo.framework` entries that are rewritten to xcframeworks.
static VENDORED_FRAMEWORK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\*\*/)(.+)\.framework$").expect("vendored framework pattern is valid")
});

/// Download location of a binary pod.
#[derive(Debug, Deserialize)]
struct HttpSource {
    http: String,
}

/// A parsed `.podspec.json` document.
#[derive(Debug, Clone, PartialEq)]
pub struct Podspec {
    fields: Map<String, Value>,
}

impl Podspec {
    /// Parses a podspec. The document must be a JSON object.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        let fields = serde_json::from_str::<Map<String, Value>>(text)?;
        Ok(Self { fields })
    }

    /// `version` field, if present.
    pub fn version(&self) -> Option<&str> {
        self.fields.get("version").and_then(Value::as_str)
    }

    /// `source.http`: the archive the pod is distributed as.
    pub fn source_http(&self) -> Option<String> {
        let source = self.fields.get("source")?.clone();
        serde_json::from_value::<HttpSource>(source)
            .ok()
            .map(|s| s.http)
    }

    /// `vendored_frameworks`, normalized to a list.
    pub fn vendored_frameworks(&self) -> Vec<String> {
        match self.fields.get("vendored_frameworks") {
            Some(Value::String(s)) => vec![s.clone()],
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(String::from)
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Raw field access.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Points the podspec at the repackaged xcframework release.
    ///
    /// - `version` becomes `new_version`
    /// - `source` becomes `{ "git": repo, "tag": new_version }`
    /// - `**/Foo.framework` entries of `vendored_frameworks` become
    ///   `<name>/**/Foo.xcframework`
    pub fn rewrite_for_xcframework(&mut self, name: &str, repo: &str, new_version: &str) {
        self.fields
            .insert("version".to_string(), Value::String(new_version.to_string()));

        let mut source = Map::new();
        source.insert("git".to_string(), Value::String(repo.to_string()));
        source.insert("tag".to_string(), Value::String(new_version.to_string()));
        self.fields.insert("source".to_string(), Value::Object(source));

        if let Some(vendored) = self.fields.get_mut("vendored_frameworks") {
            let items = match vendored.take() {
                Value::Array(items) => items,
                other => vec![other],
            };
            let rewritten = items
                .into_iter()
                .map(|item| match item {
                    Value::String(path) => Value::String(rewrite_vendored_path(&path, name)),
                    other => other,
                })
                .collect();
            *vendored = Value::Array(rewritten);
        }
    }

    /// Pretty JSON with two-space indentation, ASCII-only output and a
    /// trailing newline.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        let mut json = escape_non_ascii(&serde_json::to_string_pretty(&self.fields)?);
        json.push('\n');
        Ok(json)
    }

    /// Writes [`Podspec::to_json_pretty`] output to `path`.
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let json = self.to_json_pretty().map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }
}

fn rewrite_vendored_path(path: &str, name: &str) -> String {
    VENDORED_FRAMEWORK
        .replace(path, |caps: &regex::Captures<'_>| {
            format!("{name}/{}{}.xcframework", &caps[1], &caps[2])
        })
        .into_owned()
}

/// Escapes every non-ASCII character as `\uXXXX` (UTF-16 units, lowercase
/// hex) so the written podspec is plain ASCII.
///
/// Non-ASCII characters only occur inside JSON strings, so escaping them in
/// the rendered document cannot change its structure.
fn escape_non_ascii(json: &str) -> String {
    let mut escaped = String::with_capacity(json.len());
    let mut units = [0u16; 2];
    for c in json.chars() {
        if c.is_ascii() {
            escaped.push(c);
        } else {
            for unit in c.encode_utf16(&mut units) {
                escaped.push_str(&format!("\\u{unit:04x}"));
            }
        }
    }
    escaped
}
