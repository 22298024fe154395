//! The build command: fetch, convert, relocate and republish a pod.
//!
//! Stages run strictly in order and every failure ends the run with the exit
//! code of its [`BuilderError`] variant.

use std::path::{Path, PathBuf};

use crate::bundler::{
    Platform, ToolRunner, XcframeworkAssembler,
    tools::{HAS_XCODEBUILD, HAS_XCRUN},
    utils::{archive, fs::remove_path, http::HttpClient},
};
use crate::cli::RuntimeConfig;
use crate::error::{BuilderError, Result};
use crate::pod::{self, Podspec};

/// Paths produced by a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    /// Upstream version that was repackaged
    pub version: String,
    /// Version written to the new podspec
    pub new_version: String,
    /// `<output>/<name>`
    pub pod_dir: PathBuf,
    /// `<output>/<name>.podspec.json`
    pub podspec: PathBuf,
    /// Every xcframework created, inside `pod_dir`
    pub xcframeworks: Vec<PathBuf>,
}

/// Drives one repackaging run.
#[derive(Debug)]
pub struct PodBuilder<R> {
    config: RuntimeConfig,
    http: HttpClient,
    runner: R,
}

impl<R> PodBuilder<R>
where
    R: ToolRunner + Clone + Send + 'static,
{
    /// Creates a builder that runs external tools through `runner`.
    pub fn new(config: RuntimeConfig, runner: R) -> Result<Self> {
        let http = HttpClient::new(config.connect_timeout)?;
        Ok(Self {
            config,
            http,
            runner,
        })
    }

    /// Runs every stage and returns what was produced.
    pub async fn run(&self) -> Result<BuildReport> {
        let output = self.config.output();
        let name = &self.config.name;

        let version = match &self.config.version {
            Some(version) => version.clone(),
            None => self.fetch_latest_version().await?,
        };
        let new_version = self
            .config
            .new_version
            .clone()
            .unwrap_or_else(|| pod::patch_version(&version));

        output.println(&format!("Build {name} {version} -> {new_version}"))?;

        tokio::fs::create_dir_all(&self.config.working_dir).await?;

        let mut spec = self.fetch_podspec(&version).await?;
        let (pod_dir, xcframeworks) = self.build_for_podspec(&spec).await?;

        spec.rewrite_for_xcframework(name, &self.config.repo, &new_version);
        let podspec = self.save_podspec(&spec)?;

        Ok(BuildReport {
            version,
            new_version,
            pod_dir,
            podspec,
            xcframeworks,
        })
    }

    async fn fetch_latest_version(&self) -> Result<String> {
        let output = self.config.output();
        let name = &self.config.name;
        output.start(&format!("Fetching the latest version of pod {name}"))?;

        let url = pod::versions_index_url(&self.config.cdn_url, name);
        let index = match self.http.get_text(&url).await {
            Ok(index) => index,
            Err(source) => {
                output.failure("request failed")?;
                return Err(BuilderError::VersionsIndex { url, source });
            }
        };

        match pod::latest_version(&index, name) {
            Some(version) => {
                output.success(&version)?;
                Ok(version)
            }
            None => {
                output.failure("error parsing pods versions index")?;
                Err(BuilderError::VersionNotFound { name: name.clone() })
            }
        }
    }

    async fn fetch_podspec(&self, version: &str) -> Result<Podspec> {
        let url = pod::podspec_url(&self.config.specs_url, &self.config.name, version);
        log::info!("Fetching podspec {}", url);

        let text = self
            .http
            .get_text(&url)
            .await
            .map_err(|source| BuilderError::PodspecFetch { url, source })?;

        Podspec::from_json(&text).map_err(BuilderError::PodspecDecode)
    }

    async fn build_for_podspec(&self, spec: &Podspec) -> Result<(PathBuf, Vec<PathBuf>)> {
        let output = self.config.output();
        let src = self.download_pod_source(spec).await?;

        if !*HAS_XCRUN || !*HAS_XCODEBUILD {
            log::warn!("xcrun or xcodebuild not found in PATH; conversion is likely to fail");
        }

        let frameworks = find_frameworks(&src)?;
        if frameworks.is_empty() {
            output.warn(&format!("no frameworks found under {}", src.display()))?;
        }

        let mut xcframeworks = Vec::with_capacity(frameworks.len());
        for framework in frameworks {
            let label = framework
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            output.start(&format!("Converting {label} to xcframework"))?;

            match self.convert(&framework).await {
                Ok(xcframework) => {
                    output.success("done")?;
                    remove_path(&framework)?;
                    xcframeworks.push(xcframework);
                }
                Err(e) => {
                    output.failure("failed")?;
                    discard(&src);
                    return Err(e);
                }
            }
        }

        let dist = self.config.output_dir.join(&self.config.name);
        if let Err(source) = relocate(&src, &dist) {
            discard(&src);
            return Err(BuilderError::Relocate {
                from: src,
                to: dist,
                source,
            });
        }

        let xcframeworks = xcframeworks
            .into_iter()
            .filter_map(|p| p.strip_prefix(&src).ok().map(|rel| dist.join(rel)))
            .collect();

        Ok((dist, xcframeworks))
    }

    async fn convert(&self, framework: &Path) -> Result<PathBuf> {
        let runner = self.runner.clone();
        let platforms: Vec<Platform> = self.config.platforms.clone();
        let path = framework.to_path_buf();

        tokio::task::spawn_blocking(move || {
            XcframeworkAssembler::new(runner)
                .with_platforms(platforms)
                .assemble(&path)
        })
        .await
        .map_err(|e| anyhow::anyhow!("conversion task panicked: {e}"))?
        .map_err(|source| BuilderError::Convert {
            framework: framework.to_path_buf(),
            source,
        })
    }

    async fn download_pod_source(&self, spec: &Podspec) -> Result<PathBuf> {
        let output = self.config.output();
        let url = spec.source_http().ok_or(BuilderError::PodspecSource)?;
        let to = self.config.working_dir.join(download_file_name(&url));

        output.println(&format!("Downloading {url} to {}...", to.display()))?;
        if let Err(source) = self.http.download_file(&url, &to, false).await {
            output.warn("download failed")?;
            return Err(BuilderError::Download { url, source });
        }

        let label = to
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        output.start(&format!("Extracting {label}"))?;

        let archive_path = to.clone();
        let extracted = tokio::task::spawn_blocking(move || archive::extract_zip(&archive_path))
            .await
            .map_err(|e| anyhow::anyhow!("extraction task panicked: {e}"))?;

        match extracted {
            Ok(path) => {
                output.success("done")?;
                Ok(path)
            }
            Err(source) => {
                output.failure("failed")?;
                Err(BuilderError::Extract { path: to, source })
            }
        }
    }

    fn save_podspec(&self, spec: &Podspec) -> Result<PathBuf> {
        let path = self
            .config
            .output_dir
            .join(format!("{}.podspec.json", self.config.name));

        spec.save(&path)
            .map_err(|source| BuilderError::PodspecWrite {
                path: path.clone(),
                source,
            })?;

        log::info!("Wrote {}", path.display());
        Ok(path)
    }
}

/// Local name for a downloaded archive: `<stem>-<md5(url)>.<ext>`.
///
/// The URL hash keeps archives of different releases that share a file name
/// apart in the working directory.
pub(crate) fn download_file_name(url: &str) -> String {
    let hash = format!("{:x}", md5::compute(url.as_bytes()));
    let file = url::Url::parse(url)
        .ok()
        .and_then(|u| {
            u.path_segments()
                .and_then(|mut segments| segments.next_back().map(String::from))
        })
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "source".to_string());

    let file = Path::new(&file);
    let stem = file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    match file.extension() {
        Some(ext) => format!("{stem}-{hash}.{}", ext.to_string_lossy()),
        None => format!("{stem}-{hash}"),
    }
}

/// Frameworks one level below the extracted root: `<src>/*/*.framework`.
fn find_frameworks(src: &Path) -> Result<Vec<PathBuf>> {
    let pattern = format!(
        "{}/*/*.framework",
        glob::Pattern::escape(&src.to_string_lossy())
    );
    let entries = glob::glob(&pattern)
        .map_err(|e| anyhow::anyhow!("invalid framework pattern {pattern}: {e}"))?;

    let mut frameworks: Vec<PathBuf> = entries.filter_map(|e| e.ok()).filter(|p| p.is_dir()).collect();
    frameworks.sort();
    Ok(frameworks)
}

fn relocate(src: &Path, dist: &Path) -> std::io::Result<()> {
    remove_path(dist).map_err(std::io::Error::other)?;
    std::fs::rename(src, dist)
}

fn discard(path: &Path) {
    if let Err(e) = remove_path(path) {
        log::warn!("Failed to remove {}: {}", path.display(), e);
    }
}
