//! HTTP utilities for fetching pod metadata and source archives.

use crate::bundler::error::{ErrorExt, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::AsyncWriteExt;

/// Redirect hops followed before a request is abandoned.
pub const MAX_REDIRECTS: usize = 5;

/// Default connect timeout for every request.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Thin wrapper around a configured [`reqwest::Client`].
///
/// Non-2xx responses are errors, redirects are followed up to
/// [`MAX_REDIRECTS`] hops.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    /// Builds a client with the given connect timeout.
    pub fn new(connect_timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .connect_timeout(connect_timeout)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;

        Ok(Self { client })
    }

    /// Fetches `url` and returns the body as text.
    pub async fn get_text(&self, url: &str) -> Result<String> {
        log::debug!("GET {}", url);

        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }

    /// Downloads `url` to `path`.
    ///
    /// An existing file at `path` is reused unless `overwrite` is set. The body
    /// is streamed into `<path>.downloading` and renamed once complete, so a
    /// file at `path` is always a finished download.
    pub async fn download_file(&self, url: &str, path: &Path, overwrite: bool) -> Result<()> {
        if tokio::fs::metadata(path).await.is_ok_and(|m| m.is_file()) {
            if overwrite {
                tokio::fs::remove_file(path)
                    .await
                    .fs_context("removing previous download", path)?;
            } else {
                log::info!("Reusing existing download {}", path.display());
                return Ok(());
            }
        }

        let tmp = partial_path(path);
        if let Err(e) = self.stream_to(url, &tmp).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e);
        }

        tokio::fs::rename(&tmp, path)
            .await
            .fs_context("finalizing download", path)
    }

    async fn stream_to(&self, url: &str, dest: &Path) -> Result<()> {
        log::info!("Downloading {}", url);

        let mut response = self.client.get(url).send().await?.error_for_status()?;
        let total = response.content_length();

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .fs_context("creating download directory", parent)?;
        }
        let mut file = tokio::fs::File::create(dest)
            .await
            .fs_context("creating download file", dest)?;

        let mut received: u64 = 0;
        let mut next_report: u64 = 0;
        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk)
                .await
                .fs_context("writing download", dest)?;
            received += chunk.len() as u64;

            if received >= next_report {
                match total {
                    Some(total) => log::debug!("  {received}/{total} bytes"),
                    None => log::debug!("  {received} bytes"),
                }
                next_report = received + 4 * 1024 * 1024;
            }
        }

        file.flush().await.fs_context("flushing download", dest)?;
        log::info!("Downloaded {} bytes to {}", received, dest.display());
        Ok(())
    }
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".downloading");
    PathBuf::from(name)
}
