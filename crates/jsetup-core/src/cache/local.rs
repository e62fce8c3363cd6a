//! Filesystem-backed cache service.
//!
//! Packs each cached directory into a `{key}.tar.gz` blob under a storage
//! directory. This stands in for a hosted content cache on self-managed
//! workers and gives the save/restore contract a real implementation.

use async_trait::async_trait;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use super::CacheService;
use crate::{Result, SetupError};

pub struct LocalCacheService {
    storage: PathBuf,
}

impl LocalCacheService {
    /// `storage` is the directory holding the packed blobs; created lazily on
    /// the first save.
    pub fn new(storage: PathBuf) -> Self {
        Self { storage }
    }

    fn blob_path(&self, key: &str) -> PathBuf {
        self.storage.join(format!("{key}.tar.gz"))
    }
}

#[async_trait]
impl CacheService for LocalCacheService {
    async fn restore(&self, paths: &[PathBuf], key: &str) -> Result<bool> {
        let blob = self.blob_path(key);
        if !blob.exists() {
            return Ok(false);
        }

        for path in paths {
            std::fs::create_dir_all(path)?;
            let file = File::open(&blob)?;
            let decoder = GzDecoder::new(BufReader::new(file));
            tar::Archive::new(decoder)
                .unpack(path)
                .map_err(|e| SetupError::Cache(format!("failed to unpack {key}: {e}")))?;
        }

        Ok(true)
    }

    async fn save(&self, paths: &[PathBuf], key: &str) -> Result<()> {
        std::fs::create_dir_all(&self.storage)?;

        let encoder = GzEncoder::new(File::create(self.blob_path(key))?, Compression::default());
        let mut builder = tar::Builder::new(encoder);
        for path in paths {
            builder
                .append_dir_all(".", path)
                .map_err(|e| SetupError::Cache(format!("failed to pack {key}: {e}")))?;
        }
        builder
            .into_inner()
            .map_err(|e| SetupError::Cache(format!("failed to pack {key}: {e}")))?
            .finish()?;

        Ok(())
    }
}
