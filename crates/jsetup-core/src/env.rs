//! Runtime environment layout detection and application.
//!
//! Detection is pure: it computes where `JAVA_HOME` should point without
//! touching the process environment. [`RuntimeEnv::apply`] is the single
//! place the environment is mutated, called once by the orchestrator.

use std::path::{Path, PathBuf};

use crate::{Result, SetupError};

/// Environment variable pointing at the runtime home.
pub const JAVA_HOME_VAR: &str = "JAVA_HOME";

/// The computed runtime environment for an expanded tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeEnv {
    pub java_home: PathBuf,
}

impl RuntimeEnv {
    /// Inspect the expanded tree under `root`.
    ///
    /// Archives usually expand to a single nested directory (e.g.
    /// `jdk-21.0.7`); that child is the real runtime home. Any other layout
    /// keeps `root` itself.
    pub fn detect(root: &Path) -> Result<Self> {
        let entries = std::fs::read_dir(root)
            .map_err(|e| SetupError::InstallationCorrupt(format!("{}: {e}", root.display())))?
            .collect::<std::io::Result<Vec<_>>>()
            .map_err(|e| SetupError::InstallationCorrupt(format!("{}: {e}", root.display())))?;

        let java_home = match entries.as_slice() {
            [only] => only.path(),
            _ => root.to_path_buf(),
        };

        Ok(Self { java_home })
    }

    /// The executable directory to put on the search path.
    pub fn bin_dir(&self) -> PathBuf {
        self.java_home.join("bin")
    }

    /// Mutate the process environment: set `JAVA_HOME` and prepend the bin
    /// directory to `PATH`. Child processes spawned afterwards inherit both.
    pub fn apply(&self) {
        std::env::set_var(JAVA_HOME_VAR, &self.java_home);

        let current = std::env::var_os("PATH").unwrap_or_default();
        let mut paths = vec![self.bin_dir()];
        paths.extend(std::env::split_paths(&current));
        if let Ok(joined) = std::env::join_paths(paths) {
            std::env::set_var("PATH", joined);
        }

        log::info!("JAVA_HOME set to: {}", self.java_home.display());
    }
}
