//! Download URL resolution per distribution.
//!
//! All vendor URL templates live here so they are not scattered across the
//! pipeline. The resolver only targets linux/x64; that is a stated
//! limitation of the tool, not an oversight.

use crate::inputs::{Distribution, InstallRequest, JavaVersion};
use crate::{Result, SetupError};

/// Point-release constants for a Zulu CDN archive name.
///
/// The CDN encodes both the Zulu bundle release and the JDK point release in
/// the file name (e.g. `zulu21.42.19-ca-jdk21.0.7-linux_x64.tar.gz`). These
/// constants drift with every upstream release, so they are data supplied to
/// the resolver rather than part of the format string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZuluRelease {
    pub major: JavaVersion,
    pub bundle: &'static str,
    pub jdk: &'static str,
}

/// Known-good Zulu release constants per supported major version.
pub const DEFAULT_ZULU_RELEASES: &[ZuluRelease] = &[
    ZuluRelease {
        major: JavaVersion::V11,
        bundle: "11.80.21",
        jdk: "11.0.27",
    },
    ZuluRelease {
        major: JavaVersion::V17,
        bundle: "17.58.21",
        jdk: "17.0.15",
    },
    ZuluRelease {
        major: JavaVersion::V21,
        bundle: "21.42.19",
        jdk: "21.0.7",
    },
];

/// Maps a validated request to a single retrieval URL.
#[derive(Debug, Clone)]
pub struct UrlResolver {
    zulu_releases: &'static [ZuluRelease],
}

impl Default for UrlResolver {
    fn default() -> Self {
        Self {
            zulu_releases: DEFAULT_ZULU_RELEASES,
        }
    }
}

impl UrlResolver {
    /// Override the Zulu release table, e.g. after an upstream point release.
    pub fn with_zulu_releases(releases: &'static [ZuluRelease]) -> Self {
        Self {
            zulu_releases: releases,
        }
    }

    /// Resolve the download URL for `request`.
    ///
    /// Oracle always fails with [`SetupError::LicenseRestricted`]: its
    /// archives require manual license acceptance and cannot be fetched
    /// directly.
    pub fn download_url(&self, request: &InstallRequest) -> Result<String> {
        match request.distribution {
            Distribution::Temurin => Ok(format!(
                "https://api.adoptium.net/v3/binary/latest/{}/ga/linux/x64/{}/hotspot/normal/eclipse",
                request.version, request.package
            )),
            Distribution::Zulu => {
                let release = self
                    .zulu_releases
                    .iter()
                    .find(|release| release.major == request.version)
                    .ok_or_else(|| {
                        SetupError::UnsupportedDistribution(format!(
                            "zulu has no release constants for version {}",
                            request.version
                        ))
                    })?;
                Ok(format!(
                    "https://cdn.azul.com/zulu/bin/zulu{}-ca-{}{}-linux_x64.tar.gz",
                    release.bundle, request.package, release.jdk
                ))
            }
            Distribution::Oracle => Err(SetupError::LicenseRestricted {
                distribution: "Oracle JDK".to_string(),
            }),
        }
    }
}
