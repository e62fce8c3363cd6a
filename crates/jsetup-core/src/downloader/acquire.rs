//! Archive acquisition: URL validation, suffix detection, transfer, post-check.

use async_trait::async_trait;
use chrono::Utc;
use std::path::{Path, PathBuf};
use url::Url;

use crate::http::{HttpClient, HttpError};
use crate::{Result, SetupError};

use super::archive::ArchiveKind;

/// Network transfer seam. The pipeline only needs "put the bytes at `url`
/// into the local file `dest`".
#[async_trait]
pub trait ArchiveFetcher: Send + Sync {
    async fn fetch(&self, url: &str, dest: &Path) -> Result<()>;
}

/// Fetcher backed by the crate's [`HttpClient`].
pub struct HttpFetcher {
    client: HttpClient,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = HttpClient::new().map_err(HttpError::Request)?;
        Ok(Self { client })
    }

    pub fn with_client(client: HttpClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ArchiveFetcher for HttpFetcher {
    async fn fetch(&self, url: &str, dest: &Path) -> Result<()> {
        self.client
            .download(url, dest)
            .await
            .map_err(|e| SetupError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            })
    }
}

/// Download the archive at `url` into a uniquely named file under `dest_dir`.
///
/// The URL must be well-formed and carry a recognized archive suffix. The
/// millisecond timestamp in the file name keeps repeated attempts within one
/// run from colliding. After the transfer the file is checked to exist and be
/// non-empty; a dangling path is never returned.
pub async fn acquire(fetcher: &dyn ArchiveFetcher, url: &str, dest_dir: &Path) -> Result<PathBuf> {
    Url::parse(url).map_err(|e| SetupError::InvalidUrl(format!("{url}: {e}")))?;

    let kind = ArchiveKind::from_url(url)
        .ok_or_else(|| SetupError::UnsupportedArchiveType(url.to_string()))?;

    tokio::fs::create_dir_all(dest_dir).await?;
    let archive_path = dest_dir.join(format!(
        "java-{}{}",
        Utc::now().timestamp_millis(),
        kind.extension()
    ));
    log::info!("Downloading file to: {}", archive_path.display());

    if let Err(err) = fetcher.fetch(url, &archive_path).await {
        log::error!("Error during downloading java: {err}");
        return Err(err);
    }

    // Post-condition: the transfer produced a readable, non-empty file
    match tokio::fs::metadata(&archive_path).await {
        Ok(meta) if meta.len() > 0 => {
            log::info!("Download successful: {}", archive_path.display());
            Ok(archive_path)
        }
        _ => Err(SetupError::DownloadVerificationFailed(archive_path)),
    }
}
