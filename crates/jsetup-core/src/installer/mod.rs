//! The install pipeline.
//!
//! Sequencing is a correctness requirement, not a stylistic choice: the cache
//! lookup happens before any acquisition, and the environment is configured
//! before the trust store is touched. Every stage fails fast; no stage
//! substitutes a default for an error.

use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

use crate::cache::CacheManager;
use crate::downloader::{acquire, ArchiveExtractor, ArchiveFetcher};
use crate::env::RuntimeEnv;
use crate::inputs::InstallRequest;
use crate::resolver::UrlResolver;
use crate::truststore::{self, CommandRunner, DEFAULT_CA_ALIAS};
use crate::{Result, SetupError};

/// Trust-store augmentation options for a run.
#[derive(Debug, Clone, Default)]
pub struct TrustStoreOptions {
    pub enabled: bool,
    /// Alias for the imported root CA; falls back to the crate default.
    pub alias: Option<String>,
}

/// Options controlling a single install run.
#[derive(Debug, Clone, Default)]
pub struct InstallOptions {
    pub trust_store: TrustStoreOptions,
    /// Run `java -version` after configuring the environment.
    pub verify: bool,
}

/// Observable outputs of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct InstallOutcome {
    pub distribution: String,
    pub version: String,
    pub java_home: PathBuf,
    pub cache_hit: bool,
}

/// Orchestrates the pipeline over the injected collaborator seams.
pub struct Installer {
    resolver: UrlResolver,
    fetcher: Arc<dyn ArchiveFetcher>,
    cache: CacheManager,
    runner: Arc<dyn CommandRunner>,
}

impl Installer {
    pub fn new(
        fetcher: Arc<dyn ArchiveFetcher>,
        cache: CacheManager,
        runner: Arc<dyn CommandRunner>,
    ) -> Self {
        Self {
            resolver: UrlResolver::default(),
            fetcher,
            cache,
            runner,
        }
    }

    /// Replace the URL resolver, e.g. with updated Zulu release constants.
    pub fn with_resolver(mut self, resolver: UrlResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Run the install pipeline for the three raw inputs.
    ///
    /// validate -> cache lookup -> (miss: resolve, acquire, extract, store)
    /// -> configure environment -> optional trust-store chain -> optional
    /// runtime verification.
    pub async fn install(
        &self,
        version: &str,
        distribution: &str,
        package: &str,
        opts: &InstallOptions,
    ) -> Result<InstallOutcome> {
        let request = InstallRequest::validate(version, distribution, package)?;
        let cache_key = request.cache_key();

        let lookup = self.cache.lookup(&cache_key).await?;
        let tool_dir = lookup.tool_dir.clone();

        if !lookup.hit {
            let url = self.resolver.download_url(&request)?;
            log::info!("Downloading Java from: {url}");

            let archive_path = acquire(self.fetcher.as_ref(), &url, &tool_dir).await?;

            log::info!("Extracting Java from: {}", archive_path.display());
            ArchiveExtractor::extract(&archive_path, &tool_dir)?;

            // Removed only after extraction succeeded; a failed run leaves
            // the archive behind for diagnosis.
            tokio::fs::remove_file(&archive_path).await?;

            self.cache.store(&cache_key, &tool_dir).await?;
        }

        let runtime = RuntimeEnv::detect(&tool_dir)?;
        runtime.apply();

        if opts.trust_store.enabled {
            let alias = opts.trust_store.alias.as_deref().unwrap_or(DEFAULT_CA_ALIAS);
            let ca = truststore::generate_root_ca(self.runner.as_ref()).await?;
            truststore::import_root_ca(self.runner.as_ref(), &ca.cert_path, alias).await?;
            truststore::verify_root_ca(self.runner.as_ref(), alias).await?;
        }

        if opts.verify {
            let code = self.runner.run("java", &["-version"]).await?;
            if code != 0 {
                return Err(SetupError::RuntimeVerificationFailed(code));
            }
            log::info!("Java is set up and verified.");
        }

        Ok(InstallOutcome {
            distribution: request.distribution.to_string(),
            version: request.version.to_string(),
            java_home: runtime.java_home,
            cache_hit: lookup.hit,
        })
    }
}
