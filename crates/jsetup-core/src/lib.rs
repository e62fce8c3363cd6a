pub mod cache;
pub mod downloader;
pub mod env;
pub mod error;
pub mod http;
pub mod inputs;
pub mod installer;
pub mod resolver;
pub mod truststore;

pub use cache::{CacheLookup, CacheManager, CacheService, LocalCacheService};
pub use downloader::{acquire, ArchiveExtractor, ArchiveFetcher, ArchiveKind, HttpFetcher};
pub use env::RuntimeEnv;
pub use error::{CaStage, Result, SetupError};
pub use inputs::{Distribution, InstallRequest, JavaVersion, PackageType};
pub use installer::{InstallOptions, InstallOutcome, Installer, TrustStoreOptions};
pub use resolver::{UrlResolver, ZuluRelease};
pub use truststore::{CommandRunner, RootCa, SystemRunner};
