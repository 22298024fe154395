//! Shared fixtures: a fake Xcode toolchain and a canned HTTP server.
//!
//! The fake toolchain treats a framework payload as a text file holding its
//! architecture list, so `lipo` edits can be checked by reading the file.

#![allow(dead_code)]

use std::collections::{BTreeSet, HashMap};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use zip::write::SimpleFileOptions;
use tokio::net::TcpListener;
use xcframework_builder::bundler::{ToolInvocation, ToolOutput, ToolRunner, utils::fs::copy_dir};

#[derive(Debug, Default)]
struct State {
    calls: Vec<ToolInvocation>,
    fail_archs_matching: Option<String>,
    fail_remove: bool,
    fail_assemble: bool,
}

/// Scripted stand-in for `xcrun lipo` and `xcodebuild`.
#[derive(Debug, Clone, Default)]
pub struct FakeToolchain {
    state: Arc<Mutex<State>>,
}

impl FakeToolchain {
    pub fn new() -> Self {
        Self::default()
    }

    /// `lipo -archs` exits 1 for payload paths containing `needle`.
    pub fn fail_archs_matching(self, needle: &str) -> Self {
        self.state.lock().unwrap().fail_archs_matching = Some(needle.to_string());
        self
    }

    /// `lipo -remove` exits 1.
    pub fn fail_remove(self) -> Self {
        self.state.lock().unwrap().fail_remove = true;
        self
    }

    /// `xcodebuild -create-xcframework` exits 70.
    pub fn fail_assemble(self) -> Self {
        self.state.lock().unwrap().fail_assemble = true;
        self
    }

    pub fn calls(&self) -> Vec<ToolInvocation> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn lipo_archs_calls(&self) -> usize {
        self.count(|args| args.first().map(String::as_str) == Some("lipo") && args.get(1).map(String::as_str) == Some("-archs"))
    }

    pub fn lipo_remove_calls(&self) -> usize {
        self.count(|args| args.first().map(String::as_str) == Some("lipo") && args.get(1).map(String::as_str) == Some("-remove"))
    }

    pub fn assemble_calls(&self) -> Vec<ToolInvocation> {
        self.calls()
            .into_iter()
            .filter(|c| c.program == "xcodebuild")
            .collect()
    }

    fn count(&self, pred: impl Fn(&[String]) -> bool) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.program == "xcrun" && pred(&c.args_lossy()))
            .count()
    }

    fn lipo(&self, args: &[String]) -> std::io::Result<ToolOutput> {
        let state = self.state.lock().unwrap();
        match args.get(1).map(String::as_str) {
            Some("-archs") => {
                let path = &args[2];
                if state
                    .fail_archs_matching
                    .as_deref()
                    .is_some_and(|needle| path.contains(needle))
                {
                    return Ok(ToolOutput::failure(1, "fatal error: can't figure out the architecture type"));
                }
                Ok(ToolOutput::success(std::fs::read_to_string(path)?))
            }
            Some("-remove") => {
                if state.fail_remove {
                    return Ok(ToolOutput::failure(1, "fatal error: -remove failed"));
                }
                let mut remove = BTreeSet::new();
                let mut rest = &args[1..];
                while rest.first().map(String::as_str) == Some("-remove") {
                    remove.insert(rest[1].clone());
                    rest = &rest[2..];
                }
                let input = &rest[0];
                assert_eq!(rest[1], "-o");
                let output = &rest[2];

                let kept: Vec<String> = std::fs::read_to_string(input)?
                    .split_whitespace()
                    .filter(|a| !remove.contains(*a))
                    .map(String::from)
                    .collect();
                std::fs::write(output, format!("{}\n", kept.join(" ")))?;
                Ok(ToolOutput::success(""))
            }
            _ => Ok(ToolOutput::failure(1, "unsupported lipo mode")),
        }
    }

    fn xcodebuild(&self, args: &[String]) -> std::io::Result<ToolOutput> {
        if self.state.lock().unwrap().fail_assemble {
            return Ok(ToolOutput::failure(70, "error: binaries with multiple platforms are not supported"));
        }
        assert_eq!(args[0], "-create-xcframework");

        let mut frameworks = Vec::new();
        let mut output = None;
        let mut rest = &args[1..];
        while !rest.is_empty() {
            match rest[0].as_str() {
                "-framework" => frameworks.push(PathBuf::from(&rest[1])),
                "-output" => output = Some(PathBuf::from(&rest[1])),
                other => panic!("unexpected xcodebuild argument {other}"),
            }
            rest = &rest[2..];
        }
        let output = output.expect("-output missing");
        if output.exists() {
            return Ok(ToolOutput::failure(70, "error: the path already exists"));
        }

        std::fs::create_dir_all(&output)?;
        std::fs::write(output.join("Info.plist"), b"xcframework")?;
        for (i, framework) in frameworks.iter().enumerate() {
            let dest = output
                .join(format!("slice-{i}"))
                .join(framework.file_name().unwrap());
            copy_dir(framework, &dest).map_err(std::io::Error::other)?;
        }
        Ok(ToolOutput::success(format!("xcframework successfully written out to: {}", output.display())))
    }
}

impl ToolRunner for FakeToolchain {
    fn run(&self, invocation: &ToolInvocation) -> std::io::Result<ToolOutput> {
        self.state.lock().unwrap().calls.push(invocation.clone());
        let args = invocation.args_lossy();
        match invocation.program.as_str() {
            "xcrun" if args.first().map(String::as_str) == Some("lipo") => self.lipo(&args),
            "xcodebuild" => self.xcodebuild(&args),
            other => Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{other}: command not found"),
            )),
        }
    }
}

/// Creates `<dir>/<name>.framework` whose payload lists `archs`.
pub fn make_framework(dir: &Path, name: &str, archs: &[&str]) -> PathBuf {
    let framework = dir.join(format!("{name}.framework"));
    std::fs::create_dir_all(framework.join("Headers")).unwrap();
    std::fs::write(framework.join("Info.plist"), b"<plist/>").unwrap();
    std::fs::write(framework.join("Headers").join(format!("{name}.h")), b"// header").unwrap();
    std::fs::write(framework.join(name), format!("{}\n", archs.join(" "))).unwrap();
    framework
}

/// Architectures recorded in a fake payload.
pub fn read_archs(payload: &Path) -> BTreeSet<String> {
    std::fs::read_to_string(payload)
        .unwrap()
        .split_whitespace()
        .map(String::from)
        .collect()
}

pub fn set(archs: &[&str]) -> BTreeSet<String> {
    archs.iter().map(|a| a.to_string()).collect()
}

/// Zip archive holding `<name>/<name>.framework` with the given payload archs.
pub fn framework_zip(name: &str, archs: &[&str]) -> Vec<u8> {
    let mut cursor = std::io::Cursor::new(Vec::new());
    {
        let mut writer = zip::ZipWriter::new(&mut cursor);
        let root = format!("{name}/{name}.framework");
        writer.start_file(format!("{root}/Info.plist"), SimpleFileOptions::default()).unwrap();
        writer.write_all(b"<plist/>").unwrap();
        writer.start_file(format!("{root}/Headers/{name}.h"), SimpleFileOptions::default()).unwrap();
        writer.write_all(b"// header").unwrap();
        writer.start_file(format!("{root}/{name}"), SimpleFileOptions::default()).unwrap();
        writer.write_all(format!("{}\n", archs.join(" ")).as_bytes()).unwrap();
        writer.finish().unwrap();
    }
    cursor.into_inner()
}

/// Serves `routes` (path -> body) on a random local port; other paths 404.
///
/// Returns the base URL, e.g. `http://127.0.0.1:54321`.
pub async fn serve(routes: HashMap<String, Vec<u8>>) -> String {
    serve_with(|_| routes).await
}

/// Like [`serve`], but the routes are built from the server's own base URL.
pub async fn serve_with(
    build: impl FnOnce(&str) -> HashMap<String, Vec<u8>>,
) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let routes = Arc::new(build(&base));

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let routes = Arc::clone(&routes);
            tokio::spawn(async move {
                let mut buf = vec![0u8; 8192];
                let n = socket.read(&mut buf).await.unwrap_or(0);
                let request = String::from_utf8_lossy(&buf[..n]);
                let path = request
                    .lines()
                    .next()
                    .and_then(|line| line.split_whitespace().nth(1))
                    .unwrap_or("/")
                    .to_string();

                let (status, body) = match routes.get(&path) {
                    Some(body) => ("200 OK", body.clone()),
                    None => ("404 Not Found", b"not found".to_vec()),
                };
                let head = format!(
                    "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    body.len()
                );
                let _ = socket.write_all(head.as_bytes()).await;
                let _ = socket.write_all(&body).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    base
}
