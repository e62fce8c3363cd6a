//! Keyed caching of expanded runtime trees.
//!
//! The actual storage is behind the [`CacheService`] trait; the manager only
//! derives the tool directory from the cache root and the key, and delegates
//! restore/save. A restore failure is a service error and propagates; it is
//! never conflated with a cache miss.

mod local;

pub use local::LocalCacheService;

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::Result;

/// External cache service contract.
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Restore the given paths from the cache. `Ok(true)` on a hit,
    /// `Ok(false)` on a miss.
    async fn restore(&self, paths: &[PathBuf], key: &str) -> Result<bool>;

    /// Persist the given paths under `key`.
    async fn save(&self, paths: &[PathBuf], key: &str) -> Result<()>;
}

/// Result of a cache lookup.
#[derive(Debug, Clone)]
pub struct CacheLookup {
    pub hit: bool,
    /// Directory the entry was (or will be) installed into; `root/key`.
    pub tool_dir: PathBuf,
}

pub struct CacheManager {
    root: PathBuf,
    service: Arc<dyn CacheService>,
}

impl CacheManager {
    /// `root` is the externally supplied tool-cache directory; when unset the
    /// platform temp directory is used.
    pub fn new(root: Option<PathBuf>, service: Arc<dyn CacheService>) -> Self {
        let root = root.unwrap_or_else(std::env::temp_dir);
        Self { root, service }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Look up `key`. On a hit the returned directory holds the restored tree.
    pub async fn lookup(&self, key: &str) -> Result<CacheLookup> {
        log::info!("Directory where tools are cached: {}", self.root.display());

        let tool_dir = self.root.join(key);
        let hit = self.service.restore(&[tool_dir.clone()], key).await?;
        if hit {
            log::info!("Restored cache for key: {}", tool_dir.display());
        }

        Ok(CacheLookup { hit, tool_dir })
    }

    /// Persist `directory` under `key`.
    pub async fn store(&self, key: &str, directory: &Path) -> Result<()> {
        if let Err(err) = self.service.save(&[directory.to_path_buf()], key).await {
            log::error!("Failed to save cache for key {key}: {err}");
            return Err(err);
        }
        log::info!("Saved to cache with key: {key}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SetupError;
    use tempfile::TempDir;

    struct MissService;

    #[async_trait]
    impl CacheService for MissService {
        async fn restore(&self, _paths: &[PathBuf], _key: &str) -> Result<bool> {
            Ok(false)
        }

        async fn save(&self, _paths: &[PathBuf], _key: &str) -> Result<()> {
            Ok(())
        }
    }

    struct FailingService;

    #[async_trait]
    impl CacheService for FailingService {
        async fn restore(&self, _paths: &[PathBuf], _key: &str) -> Result<bool> {
            Err(SetupError::Cache("service unavailable".to_string()))
        }

        async fn save(&self, _paths: &[PathBuf], _key: &str) -> Result<()> {
            Err(SetupError::Cache("service unavailable".to_string()))
        }
    }

    #[tokio::test]
    async fn test_lookup_joins_root_and_key() {
        let temp = TempDir::new().unwrap();
        let manager = CacheManager::new(Some(temp.path().to_path_buf()), Arc::new(MissService));

        let lookup = manager.lookup("java-temurin-21-jdk").await.unwrap();
        assert!(!lookup.hit);
        assert_eq!(lookup.tool_dir, temp.path().join("java-temurin-21-jdk"));
    }

    #[tokio::test]
    async fn test_missing_root_defaults_to_temp_dir() {
        let manager = CacheManager::new(None, Arc::new(MissService));
        assert_eq!(manager.root(), std::env::temp_dir());
    }

    #[tokio::test]
    async fn test_service_error_is_not_a_miss() {
        let temp = TempDir::new().unwrap();
        let manager = CacheManager::new(Some(temp.path().to_path_buf()), Arc::new(FailingService));

        let err = manager.lookup("java-temurin-21-jdk").await.unwrap_err();
        assert!(matches!(err, SetupError::Cache(_)));
    }

    #[tokio::test]
    async fn test_store_propagates_service_errors() {
        let temp = TempDir::new().unwrap();
        let manager = CacheManager::new(Some(temp.path().to_path_buf()), Arc::new(FailingService));

        let err = manager.store("key", temp.path()).await.unwrap_err();
        assert!(matches!(err, SetupError::Cache(_)));
    }
}
