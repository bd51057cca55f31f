//! Verified install pipeline.
//!
//! resolve → download → verify → extract → place. Each step either hands
//! its output to the next or ends the run with a terminal error; nothing is
//! retried and nothing is written to the bin directory before the checksum
//! has been verified.

use serde::Serialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::artifact::Target;
use crate::checksum::Sha256Digest;
use crate::extract::extract_binary;
use crate::fetch::ArtifactFetcher;
use crate::manifest::ReleaseManifest;
use crate::platform::Platform;
use crate::{Error, Result};

/// Options for installation.
#[derive(Debug, Clone)]
pub struct InstallOptions {
    /// Directory the executable is placed into.
    pub bin_dir: PathBuf,
}

impl InstallOptions {
    /// Create options installing into `bin_dir`.
    #[must_use]
    pub fn new(bin_dir: impl Into<PathBuf>) -> Self {
        Self {
            bin_dir: bin_dir.into(),
        }
    }
}

impl Default for InstallOptions {
    fn default() -> Self {
        Self::new(default_bin_dir())
    }
}

/// Get the default bin directory.
///
/// The platform's user executable directory when it has one (Linux),
/// otherwise `~/.local/bin`.
#[must_use]
pub fn default_bin_dir() -> PathBuf {
    dirs::executable_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local").join("bin")))
        .unwrap_or_else(|| PathBuf::from(".local").join("bin"))
}

/// Result of a successful install.
#[derive(Debug, Clone, Serialize)]
pub struct InstalledBinary {
    /// Executable name.
    pub name: String,
    /// Release target that was installed.
    pub target: Target,
    /// Final path of the executable.
    pub path: PathBuf,
    /// SHA-256 of the installed executable.
    pub sha256: Sha256Digest,
}

/// Installs release binaries for a manifest.
pub struct Installer<F> {
    fetcher: F,
    manifest: ReleaseManifest,
    options: InstallOptions,
}

impl<F: ArtifactFetcher> Installer<F> {
    /// Create an installer.
    #[must_use]
    pub fn new(fetcher: F, manifest: ReleaseManifest, options: InstallOptions) -> Self {
        Self {
            fetcher,
            manifest,
            options,
        }
    }

    /// Install the binary for `platform`.
    ///
    /// Running this twice with the same inputs leaves the same file in
    /// place; the second run overwrites the first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedPlatform`], [`Error::DownloadFailure`],
    /// [`Error::ChecksumMismatch`], [`Error::ExtractionFailure`] or
    /// [`Error::InstallWriteFailure`] for the step that failed.
    pub async fn install(&self, platform: &Platform) -> Result<InstalledBinary> {
        let artifact = self.manifest.resolve(platform)?;
        info!(
            %platform,
            target = %artifact.target,
            url = %artifact.url,
            "Resolved release artifact"
        );

        let data = self.fetcher.fetch(&artifact.url).await?;
        debug!(
            fetcher = self.fetcher.name(),
            archive = artifact.archive_name(),
            bytes = data.len(),
            "Downloaded archive"
        );

        let actual = Sha256Digest::of(&data);
        if actual != artifact.sha256 {
            warn!(
                url = %artifact.url,
                expected = %artifact.sha256,
                %actual,
                "Checksum mismatch"
            );
            return Err(Error::checksum_mismatch(
                artifact.url.as_str(),
                artifact.sha256.to_string(),
                actual.to_string(),
            ));
        }
        debug!(sha256 = %actual, "Checksum verified");

        // Removed on drop, whatever the outcome.
        let work_dir = tempfile::Builder::new()
            .prefix("oshiv-install-")
            .tempdir()
            .map_err(|e| {
                Error::extraction(
                    artifact.binary_name.as_str(),
                    format!("Failed to create temporary directory: {e}"),
                )
            })?;
        let extracted = extract_binary(&data, &artifact.binary_name, work_dir.path())?;

        let path = place_binary(&extracted, &self.options.bin_dir, &artifact.binary_name)?;
        let sha256 = Sha256Digest::of_file(&path).map_err(|e| Error::install_write(&path, e))?;

        info!(
            binary = %artifact.binary_name,
            path = %path.display(),
            %sha256,
            "Installed release binary"
        );

        Ok(InstalledBinary {
            name: artifact.binary_name.clone(),
            target: artifact.target,
            path,
            sha256,
        })
    }
}

/// Copy `source` to `bin_dir/name` with mode 0755.
///
/// The copy is staged next to the destination and renamed over it, so an
/// existing binary is replaced in one step.
fn place_binary(source: &Path, bin_dir: &Path, name: &str) -> Result<PathBuf> {
    let dest = bin_dir.join(name);
    std::fs::create_dir_all(bin_dir).map_err(|e| Error::install_write(bin_dir, e))?;

    let mut staged = tempfile::Builder::new()
        .prefix(&format!(".{name}."))
        .suffix(".tmp")
        .tempfile_in(bin_dir)
        .map_err(|e| Error::install_write(&dest, e))?;

    let mut src = File::open(source).map_err(|e| Error::install_write(&dest, e))?;
    std::io::copy(&mut src, staged.as_file_mut()).map_err(|e| Error::install_write(&dest, e))?;
    staged
        .as_file()
        .sync_all()
        .map_err(|e| Error::install_write(&dest, e))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(staged.path(), std::fs::Permissions::from_mode(0o755))
            .map_err(|e| Error::install_write(&dest, e))?;
    }

    staged
        .persist(&dest)
        .map_err(|e| Error::install_write(&dest, e.error))?;
    debug!(dest = %dest.display(), "Placed binary");

    Ok(dest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_place_binary_creates_bin_dir() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("src-bin");
        std::fs::write(&source, b"#!/bin/sh\n").unwrap();
        let bin_dir = temp.path().join("nested").join("bin");

        let dest = place_binary(&source, &bin_dir, "tool").unwrap();

        assert_eq!(dest, bin_dir.join("tool"));
        assert_eq!(std::fs::read(&dest).unwrap(), b"#!/bin/sh\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_place_binary_sets_mode() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let source = temp.path().join("src-bin");
        std::fs::write(&source, b"bin").unwrap();

        let dest = place_binary(&source, temp.path(), "tool").unwrap();

        let mode = std::fs::metadata(&dest).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    #[test]
    fn test_place_binary_overwrites_and_leaves_no_staging_files() {
        let temp = TempDir::new().unwrap();
        let bin_dir = temp.path().join("bin");
        let source = temp.path().join("src-bin");

        std::fs::write(&source, b"old").unwrap();
        place_binary(&source, &bin_dir, "tool").unwrap();
        std::fs::write(&source, b"new").unwrap();
        let dest = place_binary(&source, &bin_dir, "tool").unwrap();

        assert_eq!(std::fs::read(&dest).unwrap(), b"new");
        let entries: Vec<_> = std::fs::read_dir(&bin_dir)
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("tool")]);
    }

    #[test]
    fn test_place_binary_unwritable_target() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("src-bin");
        std::fs::write(&source, b"bin").unwrap();
        // A regular file where the bin directory should be
        let blocker = temp.path().join("bin");
        std::fs::write(&blocker, b"").unwrap();

        let err = place_binary(&source, &blocker, "tool").unwrap_err();

        assert!(matches!(err, Error::InstallWriteFailure { .. }));
    }

    #[test]
    fn test_install_options_new() {
        let opts = InstallOptions::new("/opt/bin");
        assert_eq!(opts.bin_dir, PathBuf::from("/opt/bin"));
    }

    #[test]
    fn test_default_bin_dir_ends_with_bin() {
        assert!(default_bin_dir().ends_with("bin"));
    }
}
