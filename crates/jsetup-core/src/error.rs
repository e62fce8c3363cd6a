use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Stage of the root-CA generation chain that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaStage {
    KeyGeneration,
    CertificateGeneration,
}

impl fmt::Display for CaStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaStage::KeyGeneration => write!(f, "key generation"),
            CaStage::CertificateGeneration => write!(f, "certificate generation"),
        }
    }
}

#[derive(Error, Debug)]
pub enum SetupError {
    // Input errors
    #[error("{version}, {distribution}, {package} is not a valid input")]
    InvalidInput {
        version: String,
        distribution: String,
        package: String,
    },

    // Resolver errors
    #[error("Unsupported distribution: {0}")]
    UnsupportedDistribution(String),

    #[error("{distribution} requires manual license acceptance and cannot be downloaded directly")]
    LicenseRestricted { distribution: String },

    // Acquisition errors
    #[error("Invalid download URL: {0}")]
    InvalidUrl(String),

    #[error("Unsupported archive type in URL: {0}")]
    UnsupportedArchiveType(String),

    #[error("Download failed for {url}: {reason}")]
    DownloadFailed { url: String, reason: String },

    #[error("Downloaded file does not exist or is inaccessible: {0}")]
    DownloadVerificationFailed(PathBuf),

    // Extraction errors
    #[error("Unsupported archive format: {0}")]
    UnsupportedArchiveFormat(String),

    #[error("Extraction failed: {0}")]
    Extraction(String),

    // Cache errors
    #[error("Cache service error: {0}")]
    Cache(String),

    // Environment errors
    #[error("Installation is corrupt: {0}")]
    InstallationCorrupt(String),

    #[error("Runtime verification failed with exit code {0}")]
    RuntimeVerificationFailed(i32),

    // Trust store errors
    #[error("JAVA_HOME is not set")]
    EnvironmentNotConfigured,

    #[error("Certificate file not found at path: {0}")]
    CertificateNotFound(PathBuf),

    #[error("Root CA {stage} failed with exit code {code}")]
    GenerationFailed { stage: CaStage, code: i32 },

    #[error("Trust store import failed with exit code {0}")]
    ImportFailed(i32),

    #[error("Trust store verification failed with exit code {0}")]
    VerifyFailed(i32),

    // Transport errors
    #[error("HTTP error: {0}")]
    Http(#[from] crate::http::HttpError),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SetupError>;
