//! End-to-end pipeline tests with stubbed external collaborators.
//!
//! The network transfer, cache service and command execution are replaced by
//! stubs; archive extraction, cache packing and environment detection run for
//! real against a fixture JDK archive.

use async_trait::async_trait;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use jsetup_core::{
    CacheManager, CommandRunner, InstallOptions, Installer, LocalCacheService, Result, SetupError,
    TrustStoreOptions,
};
use jsetup_core::downloader::ArchiveFetcher;
use tempfile::TempDir;

// The pipeline mutates JAVA_HOME and PATH; serialize the scenarios.
static ENV_LOCK: Mutex<()> = Mutex::new(());

fn env_guard() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner())
}

/// A gzipped tar holding the usual single `jdk-21.0.7` top-level directory.
fn fixture_archive() -> Vec<u8> {
    let staging = TempDir::new().unwrap();
    let jdk = staging.path().join("jdk-21.0.7");
    std::fs::create_dir_all(jdk.join("bin")).unwrap();
    std::fs::create_dir_all(jdk.join("lib/security")).unwrap();
    std::fs::write(jdk.join("bin/java"), b"#!/bin/sh\n").unwrap();
    std::fs::write(jdk.join("lib/security/cacerts"), b"store").unwrap();
    std::fs::write(jdk.join("release"), b"JAVA_VERSION=\"21.0.7\"\n").unwrap();

    let encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    let mut builder = tar::Builder::new(encoder);
    builder.append_dir_all("jdk-21.0.7", &jdk).unwrap();
    builder.into_inner().unwrap().finish().unwrap()
}

struct StubFetcher {
    body: Vec<u8>,
    calls: AtomicUsize,
    last_url: Mutex<Option<String>>,
}

impl StubFetcher {
    fn new(body: Vec<u8>) -> Self {
        Self {
            body,
            calls: AtomicUsize::new(0),
            last_url: Mutex::new(None),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ArchiveFetcher for StubFetcher {
    async fn fetch(&self, url: &str, dest: &Path) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_url.lock().unwrap() = Some(url.to_string());
        tokio::fs::write(dest, &self.body).await?;
        Ok(())
    }
}

/// Records every command; emulates `openssl ... -out <file>` by writing a
/// placeholder so the import step finds the certificate.
#[derive(Default)]
struct StubRunner {
    commands: Mutex<Vec<(String, Vec<String>)>>,
}

impl StubRunner {
    fn commands(&self) -> Vec<(String, Vec<String>)> {
        self.commands.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandRunner for StubRunner {
    async fn run(&self, command: &str, args: &[&str]) -> Result<i32> {
        if command == "openssl" {
            if let Some(i) = args.iter().position(|a| *a == "-out") {
                std::fs::write(args[i + 1], b"stub")?;
            }
        }
        self.commands.lock().unwrap().push((
            command.to_string(),
            args.iter().map(|s| s.to_string()).collect(),
        ));
        Ok(0)
    }
}

fn installer(
    fetcher: Arc<StubFetcher>,
    runner: Arc<StubRunner>,
    cache_root: &Path,
    storage: &Path,
) -> Installer {
    let service = Arc::new(LocalCacheService::new(storage.to_path_buf()));
    let cache = CacheManager::new(Some(cache_root.to_path_buf()), service);
    Installer::new(fetcher, cache, runner)
}

#[tokio::test]
async fn test_cold_install_downloads_caches_and_configures() {
    let _guard = env_guard();
    let temp = TempDir::new().unwrap();
    let cache_root = temp.path().join("tool-cache");
    let storage = temp.path().join("cache-storage");

    let fetcher = Arc::new(StubFetcher::new(fixture_archive()));
    let runner = Arc::new(StubRunner::default());
    let installer = installer(fetcher.clone(), runner.clone(), &cache_root, &storage);

    let opts = InstallOptions {
        trust_store: TrustStoreOptions {
            enabled: true,
            alias: None,
        },
        verify: false,
    };

    let outcome = installer.install("21", "temurin", "jdk", &opts).await.unwrap();

    assert!(!outcome.cache_hit);
    assert_eq!(outcome.distribution, "temurin");
    assert_eq!(outcome.version, "21");

    // Resolver was called with the exact request values
    let url = fetcher.last_url.lock().unwrap().clone().unwrap();
    assert!(url.contains("/21/"));
    assert!(url.contains("/jdk/"));
    assert_eq!(fetcher.calls(), 1);

    // The single nested directory became the runtime home
    let tool_dir = cache_root.join("java-temurin-21-jdk");
    assert_eq!(outcome.java_home, tool_dir.join("jdk-21.0.7"));
    assert_eq!(
        std::env::var("JAVA_HOME").unwrap(),
        outcome.java_home.to_string_lossy()
    );
    let path_var = std::env::var("PATH").unwrap();
    assert!(path_var.starts_with(&outcome.java_home.join("bin").to_string_lossy().into_owned()));

    // The downloaded archive was cleaned up after extraction
    let leftovers: Vec<_> = std::fs::read_dir(&tool_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(leftovers, vec!["jdk-21.0.7".to_string()]);

    // Stored once under the deterministic key
    assert!(storage.join("java-temurin-21-jdk.tar.gz").exists());

    // Trust-store chain: key, certificate, import, verify
    let commands = runner.commands();
    let names: Vec<&str> = commands
        .iter()
        .map(|(command, args)| match (command.as_str(), args[0].as_str()) {
            ("openssl", "genrsa") => "genrsa",
            ("openssl", "req") => "req",
            ("keytool", "-importcert") => "import",
            ("keytool", "-list") => "list",
            other => panic!("unexpected command: {other:?}"),
        })
        .collect();
    assert_eq!(names, ["genrsa", "req", "import", "list"]);
}

#[tokio::test]
async fn test_warm_install_skips_acquisition() {
    let _guard = env_guard();
    let temp = TempDir::new().unwrap();
    let storage = temp.path().join("cache-storage");

    // Populate the cache with a cold run
    let first_root = temp.path().join("first-run");
    let fetcher = Arc::new(StubFetcher::new(fixture_archive()));
    let runner = Arc::new(StubRunner::default());
    installer(fetcher.clone(), runner.clone(), &first_root, &storage)
        .install("21", "temurin", "jdk", &InstallOptions::default())
        .await
        .unwrap();
    assert_eq!(fetcher.calls(), 1);

    // Second run on a fresh worker: new tool cache, same cache service
    let second_root = temp.path().join("second-run");
    let fetcher2 = Arc::new(StubFetcher::new(fixture_archive()));
    let runner2 = Arc::new(StubRunner::default());
    let outcome = installer(fetcher2.clone(), runner2, &second_root, &storage)
        .install("21", "temurin", "jdk", &InstallOptions::default())
        .await
        .unwrap();

    assert!(outcome.cache_hit);
    // Acquisition and extraction never ran
    assert_eq!(fetcher2.calls(), 0);
    // The environment is still configured, from the restored tree
    assert_eq!(
        outcome.java_home,
        second_root.join("java-temurin-21-jdk/jdk-21.0.7")
    );
    assert!(outcome.java_home.join("bin/java").exists());
}

#[tokio::test]
async fn test_invalid_inputs_fail_before_any_side_effect() {
    let _guard = env_guard();
    let temp = TempDir::new().unwrap();
    let cache_root = temp.path().join("tool-cache");
    let storage = temp.path().join("cache-storage");

    let fetcher = Arc::new(StubFetcher::new(Vec::new()));
    let runner = Arc::new(StubRunner::default());
    let installer = installer(fetcher.clone(), runner.clone(), &cache_root, &storage);

    let err = installer
        .install("2.0", "Oracle", "jdk", &InstallOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, SetupError::InvalidInput { .. }));
    assert_eq!(fetcher.calls(), 0);
    assert!(runner.commands().is_empty());
    assert!(!storage.exists());
    assert!(!cache_root.join("java-Oracle-2.0-jdk").exists());
}

#[tokio::test]
async fn test_oracle_fails_license_restricted_before_download() {
    let _guard = env_guard();
    let temp = TempDir::new().unwrap();

    let fetcher = Arc::new(StubFetcher::new(Vec::new()));
    let runner = Arc::new(StubRunner::default());
    let installer = installer(
        fetcher.clone(),
        runner,
        &temp.path().join("tool-cache"),
        &temp.path().join("cache-storage"),
    );

    let err = installer
        .install("21", "oracle", "jdk", &InstallOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, SetupError::LicenseRestricted { .. }));
    assert_eq!(fetcher.calls(), 0);
}

#[tokio::test]
async fn test_runtime_verification_runs_java_version() {
    let _guard = env_guard();
    let temp = TempDir::new().unwrap();

    let fetcher = Arc::new(StubFetcher::new(fixture_archive()));
    let runner = Arc::new(StubRunner::default());
    let installer = installer(
        fetcher,
        runner.clone(),
        &temp.path().join("tool-cache"),
        &temp.path().join("cache-storage"),
    );

    let opts = InstallOptions {
        verify: true,
        ..Default::default()
    };
    installer.install("17", "zulu", "jdk", &opts).await.unwrap();

    let commands = runner.commands();
    assert_eq!(commands.len(), 1);
    assert_eq!(commands[0].0, "java");
    assert_eq!(commands[0].1, vec!["-version".to_string()]);
}
