//! Binary extraction from release archives (gzip-compressed tarballs).

use flate2::read::GzDecoder;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tar::Archive;
use tracing::{debug, trace};
use walkdir::WalkDir;

use crate::{Error, Result};

/// Unpack a `tar.gz` archive into `dest` and locate `binary_name` in it.
///
/// The archive is fully unpacked; `tar` refuses entries that would escape
/// `dest`. The binary may sit at the archive root or in a subdirectory. When
/// several entries carry the name, the shallowest wins.
///
/// # Errors
///
/// Returns [`Error::ExtractionFailure`] if the archive is not a readable
/// `tar.gz` or contains no regular file named `binary_name`.
pub fn extract_binary(data: &[u8], binary_name: &str, dest: &Path) -> Result<PathBuf> {
    debug!(%binary_name, dest = %dest.display(), bytes = data.len(), "Extracting archive");

    let decoder = GzDecoder::new(Cursor::new(data));
    let mut archive = Archive::new(decoder);
    archive.set_preserve_permissions(true);
    archive
        .unpack(dest)
        .map_err(|e| Error::extraction(binary_name, format!("Failed to unpack tar.gz: {e}")))?;

    find_binary(dest, binary_name)
}

fn find_binary(dir: &Path, binary_name: &str) -> Result<PathBuf> {
    let found = WalkDir::new(dir)
        .min_depth(1)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file() && entry.file_name() == binary_name)
        .inspect(|entry| trace!(path = %entry.path().display(), "Candidate binary"))
        .min_by_key(walkdir::DirEntry::depth);

    let Some(entry) = found else {
        let message = format!("Binary '{binary_name}' not found in archive");
        return Err(Error::extraction(binary_name, message));
    };
    Ok(entry.into_path())
}
