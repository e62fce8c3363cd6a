//! Archive acquisition and extraction.
//!
//! Acquisition validates the URL, classifies the archive by suffix, streams
//! the download into a uniquely named temporary file and verifies the result.
//! Extraction dispatches on the file suffix to a tar- or zip-aware expansion.

mod acquire;
mod archive;

pub use acquire::{acquire, ArchiveFetcher, HttpFetcher};
pub use archive::{ArchiveExtractor, ArchiveKind};
