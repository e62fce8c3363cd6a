//! Validation of the requested (version, distribution, package) triple.
//!
//! The three inputs are closed enumerations. Matching is exact and
//! case-sensitive; `"Temurin"` is rejected even though `"temurin"` is valid.
//! Cross-field combinations are not checked here, only membership.

use std::fmt;
use std::str::FromStr;

use crate::{Result, SetupError};

/// Supported major Java versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JavaVersion {
    V11,
    V17,
    V21,
}

impl JavaVersion {
    pub const ALL: [JavaVersion; 3] = [JavaVersion::V11, JavaVersion::V17, JavaVersion::V21];

    pub fn as_str(&self) -> &'static str {
        match self {
            JavaVersion::V11 => "11",
            JavaVersion::V17 => "17",
            JavaVersion::V21 => "21",
        }
    }
}

impl FromStr for JavaVersion {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, ()> {
        match s {
            "11" => Ok(JavaVersion::V11),
            "17" => Ok(JavaVersion::V17),
            "21" => Ok(JavaVersion::V21),
            _ => Err(()),
        }
    }
}

impl fmt::Display for JavaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Supported Java distributions (vendor builds).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Distribution {
    Temurin,
    Oracle,
    Zulu,
}

impl Distribution {
    pub const ALL: [Distribution; 3] =
        [Distribution::Temurin, Distribution::Oracle, Distribution::Zulu];

    pub fn as_str(&self) -> &'static str {
        match self {
            Distribution::Temurin => "temurin",
            Distribution::Oracle => "oracle",
            Distribution::Zulu => "zulu",
        }
    }
}

impl FromStr for Distribution {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, ()> {
        match s {
            "temurin" => Ok(Distribution::Temurin),
            "oracle" => Ok(Distribution::Oracle),
            "zulu" => Ok(Distribution::Zulu),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the full development kit or the runtime-only kit is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackageType {
    Jre,
    Jdk,
}

impl PackageType {
    pub const ALL: [PackageType; 2] = [PackageType::Jre, PackageType::Jdk];

    pub fn as_str(&self) -> &'static str {
        match self {
            PackageType::Jre => "jre",
            PackageType::Jdk => "jdk",
        }
    }
}

impl FromStr for PackageType {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, ()> {
        match s {
            "jre" => Ok(PackageType::Jre),
            "jdk" => Ok(PackageType::Jdk),
            _ => Err(()),
        }
    }
}

impl fmt::Display for PackageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated install request. Immutable once constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstallRequest {
    pub version: JavaVersion,
    pub distribution: Distribution,
    pub package: PackageType,
}

impl InstallRequest {
    /// Validate the three raw inputs against their enumerations.
    ///
    /// Fails with [`SetupError::InvalidInput`] naming all three raw values
    /// when any one of them is not a member. Pure; performs no I/O.
    pub fn validate(version: &str, distribution: &str, package: &str) -> Result<Self> {
        let parsed_version = version.parse::<JavaVersion>();
        let parsed_distribution = distribution.parse::<Distribution>();
        let parsed_package = package.parse::<PackageType>();

        match (parsed_version, parsed_distribution, parsed_package) {
            (Ok(version), Ok(distribution), Ok(package)) => {
                log::info!("{}, {}, {} is a valid input", version, distribution, package);
                Ok(Self {
                    version,
                    distribution,
                    package,
                })
            }
            _ => Err(SetupError::InvalidInput {
                version: version.to_string(),
                distribution: distribution.to_string(),
                package: package.to_string(),
            }),
        }
    }

    /// Deterministic cache key for this request.
    ///
    /// Identical requests always produce identical keys; no time or
    /// environment dependence.
    pub fn cache_key(&self) -> String {
        format!("java-{}-{}-{}", self.distribution, self.version, self.package)
    }
}
