//! Error types for artifact resolution and installation.

use miette::Diagnostic;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for installer operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving, verifying or installing a release.
///
/// Every variant is terminal for the invocation that produced it.
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// No release artifact exists for the host platform.
    #[error("Unsupported platform: {platform}")]
    #[diagnostic(
        code(oshiv_install::unsupported_platform),
        help("Prebuilt releases exist for macOS (any CPU), Linux x86_64 and Linux arm64")
    )]
    UnsupportedPlatform {
        /// The platform that could not be matched
        platform: String,
    },

    /// A platform string could not be parsed.
    #[error("Invalid platform '{value}': {message}")]
    #[diagnostic(
        code(oshiv_install::invalid_platform),
        help("Use the form <os>-<arch>, e.g. darwin-arm64, linux-x86_64, linux-amd64")
    )]
    InvalidPlatform {
        /// The rejected input
        value: String,
        /// Why it was rejected
        message: String,
    },

    /// The archive could not be downloaded.
    #[error("Failed to download {url}: {message}")]
    #[diagnostic(
        code(oshiv_install::download),
        help("Check network connectivity and that the release URL is reachable")
    )]
    DownloadFailure {
        /// The URL that was requested
        url: String,
        /// The error message
        message: String,
    },

    /// The downloaded bytes do not hash to the expected digest.
    #[error("Checksum mismatch for {url}: expected {expected}, got {actual}")]
    #[diagnostic(
        code(oshiv_install::checksum_mismatch),
        help("The download is corrupt or the release was replaced; nothing was installed")
    )]
    ChecksumMismatch {
        /// The URL the bytes came from
        url: String,
        /// The digest recorded in the manifest
        expected: String,
        /// The digest of the downloaded bytes
        actual: String,
    },

    /// The archive is corrupt or does not contain the expected binary.
    #[error("Failed to extract '{binary}' from archive: {message}")]
    #[diagnostic(code(oshiv_install::extraction))]
    ExtractionFailure {
        /// The binary being extracted
        binary: String,
        /// The error message
        message: String,
    },

    /// The binary could not be written into the bin directory.
    #[error("Failed to install binary to {}: {source}", path.display())]
    #[diagnostic(
        code(oshiv_install::install_write),
        help("Check that the bin directory exists or can be created, and is writable")
    )]
    InstallWriteFailure {
        /// The destination path
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A checksum in the manifest is not a 64-character hex SHA-256 digest.
    #[error("Invalid SHA-256 checksum '{value}': {message}")]
    #[diagnostic(
        code(oshiv_install::invalid_checksum),
        help("A SHA-256 digest is exactly 64 hexadecimal characters")
    )]
    InvalidChecksum {
        /// The rejected checksum string
        value: String,
        /// Why it was rejected
        message: String,
    },

    /// The manifest has no artifact for a release target.
    #[error("Manifest has no artifact for target '{target}'")]
    #[diagnostic(
        code(oshiv_install::missing_artifact),
        help("Add an [artifacts.{target}] table with url and sha256")
    )]
    MissingArtifact {
        /// The target without an artifact
        target: String,
    },

    /// The manifest could not be read or parsed.
    #[error("Manifest error{}: {message}", display_path(path.as_deref()))]
    #[diagnostic(
        code(oshiv_install::manifest),
        help("Check that the manifest file exists and is valid TOML")
    )]
    Manifest {
        /// The error message
        message: String,
        /// The manifest file path
        path: Option<PathBuf>,
        /// The underlying read or parse error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

fn display_path(path: Option<&Path>) -> String {
    match path {
        Some(path) => format!(" in {}", path.display()),
        None => String::new(),
    }
}

impl Error {
    /// Create an unsupported platform error.
    #[must_use]
    pub fn unsupported_platform(platform: impl Into<String>) -> Self {
        Self::UnsupportedPlatform {
            platform: platform.into(),
        }
    }

    /// Create an invalid platform error.
    #[must_use]
    pub fn invalid_platform(value: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPlatform {
            value: value.into(),
            message: message.into(),
        }
    }

    /// Create a download failure.
    #[must_use]
    pub fn download(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DownloadFailure {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a checksum mismatch error.
    #[must_use]
    pub fn checksum_mismatch(
        url: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::ChecksumMismatch {
            url: url.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create an extraction failure.
    #[must_use]
    pub fn extraction(binary: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ExtractionFailure {
            binary: binary.into(),
            message: message.into(),
        }
    }

    /// Create an install write failure.
    #[must_use]
    pub fn install_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::InstallWriteFailure {
            path: path.into(),
            source,
        }
    }

    /// Create an invalid checksum error.
    #[must_use]
    pub fn invalid_checksum(value: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidChecksum {
            value: value.into(),
            message: message.into(),
        }
    }

    /// Create a missing artifact error.
    #[must_use]
    pub fn missing_artifact(target: impl Into<String>) -> Self {
        Self::MissingArtifact {
            target: target.into(),
        }
    }

    /// Create a manifest error.
    #[must_use]
    pub fn manifest(message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self::Manifest {
            message: message.into(),
            path,
            source: None,
        }
    }

    /// Create a manifest error caused by a read or parse failure.
    #[must_use]
    pub fn manifest_source(
        message: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Manifest {
            message: message.into(),
            path: None,
            source: Some(source.into()),
        }
    }

    /// Attach the manifest file path to a [`Error::Manifest`]; other
    /// variants are returned unchanged.
    #[must_use]
    pub fn with_manifest_path(mut self, manifest_path: &Path) -> Self {
        if let Self::Manifest { path, .. } = &mut self {
            *path = Some(manifest_path.to_path_buf());
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_platform_error() {
        let err = Error::unsupported_platform("linux-x86");
        assert!(err.to_string().contains("linux-x86"));
    }

    #[test]
    fn test_checksum_mismatch_error() {
        let err = Error::checksum_mismatch("https://example.com/a.tar.gz", "aaa", "bbb");
        let msg = err.to_string();
        assert!(msg.contains("expected aaa"));
        assert!(msg.contains("got bbb"));
    }

    #[test]
    fn test_install_write_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = Error::install_write("/usr/local/bin/oshiv", io_err);
        assert!(err.to_string().contains("/usr/local/bin/oshiv"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_invalid_checksum_error() {
        let err = Error::invalid_checksum("abc", "expected 64 characters, got 3");
        assert!(err.to_string().contains("Invalid SHA-256 checksum 'abc'"));
    }

    #[test]
    fn test_missing_artifact_error() {
        let err = Error::missing_artifact("linux-arm64");
        assert!(err.to_string().contains("linux-arm64"));
    }

    #[test]
    fn test_manifest_error_no_path() {
        let err = Error::manifest("missing field `version`", None);
        assert_eq!(err.to_string(), "Manifest error: missing field `version`");
    }

    #[test]
    fn test_manifest_error_names_file() {
        let err = Error::manifest("Invalid manifest", None);
        let err = err.with_manifest_path(Path::new("/etc/oshiv/release.toml"));
        assert_eq!(
            err.to_string(),
            "Manifest error in /etc/oshiv/release.toml: Invalid manifest"
        );
    }

    #[test]
    fn test_manifest_error_keeps_source() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = Error::manifest_source("Failed to read manifest", io_err);
        let source = std::error::Error::source(&err).map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("gone"));
    }

    #[test]
    fn test_with_manifest_path_leaves_other_variants() {
        let err = Error::missing_artifact("linux-arm64");
        let err = err.with_manifest_path(Path::new("m.toml"));
        assert!(matches!(err, Error::MissingArtifact { .. }));
    }

    #[test]
    fn test_diagnostic_codes() {
        let err = Error::download("https://example.com", "timed out");
        let code = err.code().map(|c| c.to_string());
        assert_eq!(code.as_deref(), Some("oshiv_install::download"));
    }
}
