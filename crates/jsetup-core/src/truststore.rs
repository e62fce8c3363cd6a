//! Root CA generation and Java trust store augmentation.
//!
//! The chain is generate -> import -> verify, each step shelling out to
//! external tooling (`openssl`, `keytool`) through the [`CommandRunner`]
//! seam. Every non-zero exit maps to an error tagged with the stage that
//! broke.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;

use crate::env::JAVA_HOME_VAR;
use crate::error::CaStage;
use crate::{Result, SetupError};

/// Default alias under which the root CA is imported.
pub const DEFAULT_CA_ALIAS: &str = "custom-root-ca";

/// Default password of the JDK `cacerts` store. This is the standard default
/// for the runtime family and public knowledge; it provides no
/// confidentiality.
pub const DEFAULT_STORE_PASSWORD: &str = "changeit";

const CA_KEY_BITS: &str = "2048";
const CA_VALIDITY_DAYS: &str = "365";
const CA_SUBJECT: &str = "/C=DE/ST=Berlin/L=Berlin/O=MyOrg/CN=MyRootCA";

/// External process execution seam.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `command` with `args` and return its exit code.
    async fn run(&self, command: &str, args: &[&str]) -> Result<i32>;
}

/// Runs commands on the host via `tokio::process`.
pub struct SystemRunner;

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, command: &str, args: &[&str]) -> Result<i32> {
        log::debug!("Running: {command} {}", args.join(" "));
        let status = Command::new(command).args(args).status().await?;
        Ok(status.code().unwrap_or(-1))
    }
}

/// A freshly generated root certificate authority. Key and certificate are
/// always generated together and never persist across runs.
#[derive(Debug, Clone)]
pub struct RootCa {
    pub key_path: PathBuf,
    pub cert_path: PathBuf,
}

/// Directory the CA material is generated into. Fixed per run; the operating
/// model is one run per isolated worker, so concurrent runs sharing a
/// filesystem are not handled.
pub fn ca_dir() -> PathBuf {
    std::env::temp_dir().join("jsetup-ca")
}

/// Generate a private key and a self-signed root certificate.
///
/// Not retried on failure: a partial key file on disk makes a blind retry
/// unsafe.
pub async fn generate_root_ca(runner: &dyn CommandRunner) -> Result<RootCa> {
    let dir = ca_dir();
    std::fs::create_dir_all(&dir)?;

    let key_path = dir.join("rootCA.key");
    let cert_path = dir.join("rootCA.pem");
    let key = key_path.to_string_lossy();
    let cert = cert_path.to_string_lossy();

    let code = runner
        .run("openssl", &["genrsa", "-out", key.as_ref(), CA_KEY_BITS])
        .await?;
    if code != 0 {
        return Err(SetupError::GenerationFailed {
            stage: CaStage::KeyGeneration,
            code,
        });
    }

    let code = runner
        .run(
            "openssl",
            &[
                "req",
                "-x509",
                "-new",
                "-nodes",
                "-key",
                key.as_ref(),
                "-sha256",
                "-days",
                CA_VALIDITY_DAYS,
                "-out",
                cert.as_ref(),
                "-subj",
                CA_SUBJECT,
            ],
        )
        .await?;
    if code != 0 {
        return Err(SetupError::GenerationFailed {
            stage: CaStage::CertificateGeneration,
            code,
        });
    }

    log::info!("Root CA created: {}", cert_path.display());
    Ok(RootCa {
        key_path,
        cert_path,
    })
}

/// Trust store location under the configured runtime home.
///
/// Reading `JAVA_HOME` here makes the ordering explicit: the environment must
/// be configured before any trust store operation.
fn truststore_path() -> Result<PathBuf> {
    let java_home = std::env::var_os(JAVA_HOME_VAR).ok_or(SetupError::EnvironmentNotConfigured)?;
    Ok(PathBuf::from(java_home)
        .join("lib")
        .join("security")
        .join("cacerts"))
}

/// Import the generated certificate into the runtime trust store under
/// `alias`. Returns the path of the mutated trust store file.
pub async fn import_root_ca(
    runner: &dyn CommandRunner,
    cert_path: &Path,
    alias: &str,
) -> Result<PathBuf> {
    let truststore = truststore_path()?;

    if !cert_path.exists() {
        return Err(SetupError::CertificateNotFound(cert_path.to_path_buf()));
    }

    log::info!(
        "Importing {} to Java truststore at {}",
        cert_path.display(),
        truststore.display()
    );

    let cert = cert_path.to_string_lossy();
    let store = truststore.to_string_lossy();
    let code = runner
        .run(
            "keytool",
            &[
                "-importcert",
                "-noprompt",
                "-trustcacerts",
                "-alias",
                alias,
                "-file",
                cert.as_ref(),
                "-keystore",
                store.as_ref(),
                "-storepass",
                DEFAULT_STORE_PASSWORD,
            ],
        )
        .await?;
    if code != 0 {
        return Err(SetupError::ImportFailed(code));
    }

    Ok(truststore)
}

/// Confirm `alias` is present in the trust store. Presence only; certificate
/// content and expiry are not validated.
pub async fn verify_root_ca(runner: &dyn CommandRunner, alias: &str) -> Result<()> {
    let truststore = truststore_path()?;
    let store = truststore.to_string_lossy();

    let code = runner
        .run(
            "keytool",
            &[
                "-list",
                "-keystore",
                store.as_ref(),
                "-alias",
                alias,
                "-storepass",
                DEFAULT_STORE_PASSWORD,
            ],
        )
        .await?;
    if code != 0 {
        return Err(SetupError::VerifyFailed(code));
    }

    Ok(())
}
