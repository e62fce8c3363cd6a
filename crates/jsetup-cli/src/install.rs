//! Install command - provision the requested Java runtime.

use anyhow::Result;
use clap::Args;
use console::style;
use std::path::PathBuf;
use std::sync::Arc;

use jsetup_core::{
    CacheManager, HttpFetcher, InstallOptions, Installer, LocalCacheService, SystemRunner,
    TrustStoreOptions,
};

/// Environment variable overriding the tool-cache root.
const TOOL_CACHE_VAR: &str = "JSETUP_TOOL_CACHE";

#[derive(Args, Debug)]
pub struct InstallArgs {
    /// Java distribution (temurin, zulu, oracle)
    #[arg(long, required = true)]
    pub distribution: String,

    /// Major Java version
    #[arg(long = "java-version", default_value = "21")]
    pub java_version: String,

    /// Package type (jdk or jre)
    #[arg(long = "java-package", default_value = "jdk")]
    pub java_package: String,

    /// Tool cache root (defaults to $JSETUP_TOOL_CACHE, then the temp dir)
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,

    /// Directory holding the packed cache blobs
    #[arg(long)]
    pub cache_storage: Option<PathBuf>,

    /// Import a locally generated root CA into the runtime trust store
    #[arg(long)]
    pub truststore: bool,

    /// Alias for the imported root CA
    #[arg(long, default_value = "custom-root-ca")]
    pub ca_alias: String,

    /// Run `java -version` after the install
    #[arg(long)]
    pub verify: bool,

    /// Print the outcome as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn execute(args: InstallArgs) -> Result<u8> {
    let cache_root = args
        .cache_dir
        .or_else(|| std::env::var_os(TOOL_CACHE_VAR).map(PathBuf::from));
    let storage = args
        .cache_storage
        .unwrap_or_else(|| std::env::temp_dir().join("jsetup-cache"));
    log::debug!("Cache blob storage: {}", storage.display());

    let fetcher = Arc::new(HttpFetcher::new()?);
    let service = Arc::new(LocalCacheService::new(storage));
    let cache = CacheManager::new(cache_root, service);

    let installer = Installer::new(fetcher, cache, Arc::new(SystemRunner));

    let opts = InstallOptions {
        trust_store: TrustStoreOptions {
            enabled: args.truststore,
            alias: Some(args.ca_alias),
        },
        verify: args.verify,
    };

    let outcome = installer
        .install(&args.java_version, &args.distribution, &args.java_package, &opts)
        .await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        println!(
            "{} {} {} installed{}",
            style("Success:").green().bold(),
            outcome.distribution,
            outcome.version,
            if outcome.cache_hit { " (from cache)" } else { "" }
        );
        println!("  java home: {}", outcome.java_home.display());
    }

    Ok(0)
}
