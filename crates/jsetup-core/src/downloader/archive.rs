//! Archive classification and extraction (tar.gz, tgz, zip).

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;

use crate::{Result, SetupError};

/// Archive kinds recognized by URL/file suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    TarGz,
    Tgz,
    Tar,
    Zip,
}

impl ArchiveKind {
    /// Classify a URL by its trailing characters, case-insensitively.
    ///
    /// Suffixes are checked longest-first so `.tar.gz` is never taken for a
    /// bare `.tar`.
    pub fn from_url(url: &str) -> Option<Self> {
        let lower = url.to_lowercase();

        if lower.ends_with(".tar.gz") {
            Some(ArchiveKind::TarGz)
        } else if lower.ends_with(".tgz") {
            Some(ArchiveKind::Tgz)
        } else if lower.ends_with(".zip") {
            Some(ArchiveKind::Zip)
        } else if lower.ends_with(".tar") {
            Some(ArchiveKind::Tar)
        } else {
            None
        }
    }

    /// The file suffix carried over to the downloaded temporary file.
    pub fn extension(&self) -> &'static str {
        match self {
            ArchiveKind::TarGz => ".tar.gz",
            ArchiveKind::Tgz => ".tgz",
            ArchiveKind::Tar => ".tar",
            ArchiveKind::Zip => ".zip",
        }
    }
}

/// Suffix-dispatched archive extraction.
pub struct ArchiveExtractor;

impl ArchiveExtractor {
    /// Extract `archive_path` into `dest_dir` and return the expanded tree.
    ///
    /// `.tar.gz`/`.tgz` route to the tar expansion, `.zip` to the zip
    /// expansion. Anything else, including a plain `.tar`, fails with
    /// [`SetupError::UnsupportedArchiveFormat`].
    pub fn extract(archive_path: &Path, dest_dir: &Path) -> Result<PathBuf> {
        let lower = archive_path.to_string_lossy().to_lowercase();

        std::fs::create_dir_all(dest_dir)?;

        if lower.ends_with(".tar.gz") || lower.ends_with(".tgz") {
            Self::extract_tar_gz(archive_path, dest_dir)?;
        } else if lower.ends_with(".zip") {
            Self::extract_zip(archive_path, dest_dir)?;
        } else {
            return Err(SetupError::UnsupportedArchiveFormat(
                archive_path.to_string_lossy().into_owned(),
            ));
        }

        Ok(dest_dir.to_path_buf())
    }

    fn extract_tar_gz(archive_path: &Path, dest_dir: &Path) -> Result<()> {
        let file = File::open(archive_path)?;
        let decoder = GzDecoder::new(BufReader::new(file));
        let mut archive = tar::Archive::new(decoder);

        let entries = archive
            .entries()
            .map_err(|e| SetupError::Extraction(format!("Failed to read tar: {e}")))?;

        for entry in entries {
            let mut entry =
                entry.map_err(|e| SetupError::Extraction(format!("Failed to read tar entry: {e}")))?;

            // unpack_in refuses paths that escape the destination
            let unpacked = entry
                .unpack_in(dest_dir)
                .map_err(|e| SetupError::Extraction(format!("Failed to extract: {e}")))?;
            if !unpacked {
                let path = entry
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                return Err(SetupError::Extraction(format!(
                    "Refusing to unpack {path} outside the destination directory"
                )));
            }
        }

        Ok(())
    }

    fn extract_zip(archive_path: &Path, dest_dir: &Path) -> Result<()> {
        let file = File::open(archive_path)?;
        let mut archive = zip::ZipArchive::new(BufReader::new(file))
            .map_err(|e| SetupError::Extraction(format!("Failed to open zip: {e}")))?;

        for i in 0..archive.len() {
            let mut entry = archive
                .by_index(i)
                .map_err(|e| SetupError::Extraction(format!("Failed to read zip entry: {e}")))?;

            // enclosed_name rejects traversal sequences and absolute paths
            let Some(relative) = entry.enclosed_name() else {
                return Err(SetupError::Extraction(format!(
                    "Unsafe path in zip entry: {}",
                    entry.name()
                )));
            };
            let outpath = dest_dir.join(relative);

            if entry.is_dir() {
                std::fs::create_dir_all(&outpath)?;
            } else {
                if let Some(parent) = outpath.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                let mut outfile = File::create(&outpath)?;
                std::io::copy(&mut entry, &mut outfile)?;

                #[cfg(unix)]
                {
                    use std::os::unix::fs::PermissionsExt;
                    if let Some(mode) = entry.unix_mode() {
                        std::fs::set_permissions(&outpath, std::fs::Permissions::from_mode(mode))?;
                    }
                }
            }
        }

        Ok(())
    }
}
