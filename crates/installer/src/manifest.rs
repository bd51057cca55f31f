//! Release manifest: formula metadata plus the per-target artifact table.
//!
//! The manifest for the current oshiv release is embedded at build time.
//! A replacement can be loaded from a TOML file of the same shape:
//!
//! ```toml
//! name = "oshiv"
//! description = "Tool for finding and connecting to OCI instances"
//! homepage = "https://github.com/cnopslabs/oshiv"
//! version = "1.4.0"
//! license = "MIT"
//! binary = "oshiv"
//!
//! [artifacts.linux-amd64]
//! url = "https://.../oshiv_1.4.0_linux_amd64.tar.gz"
//! sha256 = "<64 hex characters>"
//! ```
//!
//! Every checksum is validated while loading, so a malformed entry is
//! rejected before any download starts.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

use crate::artifact::{ReleaseArtifact, Target};
use crate::checksum::Sha256Digest;
use crate::platform::Platform;
use crate::{Error, Result};

const BUILTIN_MANIFEST: &str = include_str!("../manifests/oshiv.toml");

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawManifest {
    name: String,
    description: String,
    homepage: String,
    version: String,
    license: String,
    binary: Option<String>,
    #[serde(default)]
    artifacts: BTreeMap<String, RawArtifact>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawArtifact {
    url: String,
    sha256: String,
}

/// A validated release manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseManifest {
    /// Package name (e.g., "oshiv").
    pub name: String,
    /// One-line description.
    pub description: String,
    /// Project homepage.
    pub homepage: String,
    /// Release version.
    pub version: String,
    /// License identifier.
    pub license: String,
    /// Name of the executable shipped in every archive.
    pub binary: String,
    artifacts: BTreeMap<Target, ReleaseArtifact>,
}

impl ReleaseManifest {
    /// The manifest embedded in this build.
    ///
    /// # Errors
    ///
    /// Returns an error only if the embedded manifest is malformed.
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_MANIFEST)
    }

    /// Load a manifest from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or fails validation.
    pub fn load(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "Loading release manifest");
        let result = std::fs::read_to_string(path)
            .map_err(|e| Error::manifest_source("Failed to read manifest", e))
            .and_then(|content| Self::from_toml_str(&content));
        result.map_err(|e| e.with_manifest_path(path))
    }

    /// Parse and validate a manifest from TOML.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Manifest`] for TOML or schema errors,
    /// [`Error::InvalidChecksum`] for a malformed digest, and
    /// [`Error::MissingArtifact`] if any release target has no entry.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let raw: RawManifest = match toml::from_str(content) {
            Ok(raw) => raw,
            Err(e) => return Err(Error::manifest_source("Invalid manifest", e)),
        };
        Self::validate(raw)
    }

    fn validate(raw: RawManifest) -> Result<Self> {
        let binary = raw.binary.unwrap_or_else(|| raw.name.clone());
        if binary.is_empty() || binary.contains(['/', '\\']) {
            return Err(Error::manifest(
                format!("Invalid binary name '{binary}'"),
                None,
            ));
        }

        let mut artifacts = BTreeMap::new();
        for (key, entry) in raw.artifacts {
            let target: Target = key
                .parse()
                .map_err(|_| Error::manifest(format!("Unknown release target '{key}'"), None))?;
            if !is_allowed_url(&entry.url) {
                let message = format!("Artifact URL for {target} is not https: '{}'", entry.url);
                return Err(Error::manifest(message, None));
            }
            let sha256 = Sha256Digest::parse(&entry.sha256)?;
            artifacts.insert(
                target,
                ReleaseArtifact {
                    target,
                    url: entry.url,
                    sha256,
                    binary_name: binary.clone(),
                },
            );
        }

        if let Some(missing) = Target::all().iter().find(|t| !artifacts.contains_key(*t)) {
            return Err(Error::missing_artifact(missing.id()));
        }

        Ok(Self {
            name: raw.name,
            description: raw.description,
            homepage: raw.homepage,
            version: raw.version,
            license: raw.license,
            binary,
            artifacts,
        })
    }

    /// The artifact for a release target.
    #[must_use]
    pub fn artifact(&self, target: Target) -> Option<&ReleaseArtifact> {
        self.artifacts.get(&target)
    }

    /// All artifacts, ordered by target.
    pub fn artifacts(&self) -> impl Iterator<Item = &ReleaseArtifact> {
        self.artifacts.values()
    }

    /// Select the artifact for a platform.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedPlatform`] if no release target runs on
    /// `platform`.
    pub fn resolve(&self, platform: &Platform) -> Result<&ReleaseArtifact> {
        Target::for_platform(platform)
            .and_then(|target| self.artifacts.get(&target))
            .ok_or_else(|| Error::unsupported_platform(platform.to_string()))
    }
}

/// Artifact URLs must be https. Plain http is accepted for loopback hosts only.
fn is_allowed_url(url: &str) -> bool {
    if url.starts_with("https://") {
        return true;
    }
    let Some(rest) = url.strip_prefix("http://") else {
        return false;
    };
    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    let host = match authority.find(']') {
        Some(end) => &authority[..=end],
        None => authority.split(':').next().unwrap_or_default(),
    };
    matches!(host, "localhost" | "127.0.0.1" | "[::1]")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{Arch, Os};

    const DARWIN_SHA: &str = "ca8fe96cf728e620621f99ab4215b5cc8843ad33a3a1fdf8740919dd2e9b3962";
    const AMD64_SHA: &str = "f06d6e3c7e2f5ff00c21c51421bb676ffd3e3f0b6420785ccca5e126db907ff0";
    const ARM64_SHA: &str = "5bbdbbf005173a798e5bb1779a910e171889b56f908e446a08db49800e96c40d";

    fn manifest_with(darwin_sha: &str) -> String {
        format!(
            r#"
name = "tool"
description = "A tool"
homepage = "https://example.com"
version = "2.0.0"
license = "MIT"

[artifacts.darwin-all]
url = "https://example.com/tool_darwin_all.tar.gz"
sha256 = "{darwin_sha}"

[artifacts.linux-amd64]
url = "https://example.com/tool_linux_amd64.tar.gz"
sha256 = "{AMD64_SHA}"

[artifacts.linux-arm64]
url = "https://example.com/tool_linux_arm64.tar.gz"
sha256 = "{ARM64_SHA}"
"#
        )
    }

    #[test]
    fn test_builtin_manifest() {
        let manifest = ReleaseManifest::builtin().unwrap();
        assert_eq!(manifest.name, "oshiv");
        assert_eq!(manifest.version, "1.4.0");
        assert_eq!(manifest.license, "MIT");
        assert_eq!(manifest.binary, "oshiv");
        assert_eq!(manifest.artifacts().count(), 3);
    }

    #[test]
    fn test_builtin_resolution_table() {
        let manifest = ReleaseManifest::builtin().unwrap();

        let darwin = manifest
            .resolve(&Platform::new(Os::Darwin, Arch::Arm64))
            .unwrap();
        assert!(darwin.url.ends_with("oshiv_1.4.0_darwin_all.tar.gz"));
        assert_eq!(darwin.sha256.as_str(), DARWIN_SHA);

        let amd64 = manifest
            .resolve(&Platform::new(Os::Linux, Arch::X86_64))
            .unwrap();
        assert!(amd64.url.ends_with("oshiv_1.4.0_linux_amd64.tar.gz"));
        assert_eq!(amd64.sha256.as_str(), AMD64_SHA);

        let arm64 = manifest
            .resolve(&Platform::new(Os::Linux, Arch::Arm64))
            .unwrap();
        assert!(arm64.url.ends_with("oshiv_1.4.0_linux_arm64.tar.gz"));
        assert_eq!(arm64.sha256.as_str(), ARM64_SHA);

        let err = manifest
            .resolve(&Platform::new(Os::Linux, Arch::X86))
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedPlatform { .. }));
    }

    #[test]
    fn test_binary_defaults_to_name() {
        let manifest = ReleaseManifest::from_toml_str(&manifest_with(DARWIN_SHA)).unwrap();
        assert_eq!(manifest.binary, "tool");
        assert!(manifest.artifacts().all(|a| a.binary_name == "tool"));
    }

    #[test]
    fn test_65_character_checksum_rejected_at_load() {
        let content = manifest_with(&format!("{DARWIN_SHA}2"));
        let err = ReleaseManifest::from_toml_str(&content).unwrap_err();
        assert!(matches!(err, Error::InvalidChecksum { .. }));
    }

    #[test]
    fn test_missing_target_rejected() {
        let content = manifest_with(DARWIN_SHA);
        let truncated = content
            .split("[artifacts.linux-arm64]")
            .next()
            .unwrap_or_default();
        let err = ReleaseManifest::from_toml_str(truncated).unwrap_err();
        match err {
            Error::MissingArtifact { target } => assert_eq!(target, "linux-arm64"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_target_rejected() {
        let content = format!(
            r#"{}
[artifacts.windows-amd64]
url = "https://example.com/x.zip"
sha256 = "{AMD64_SHA}"
"#,
            manifest_with(DARWIN_SHA)
        );
        assert!(matches!(
            ReleaseManifest::from_toml_str(&content),
            Err(Error::Manifest { .. })
        ));
    }

    #[test]
    fn test_non_http_url_rejected() {
        let content = manifest_with(DARWIN_SHA).replace(
            "https://example.com/tool_linux_amd64.tar.gz",
            "file:///tmp/tool.tar.gz",
        );
        assert!(matches!(
            ReleaseManifest::from_toml_str(&content),
            Err(Error::Manifest { .. })
        ));
    }

    #[test]
    fn test_plain_http_rejected_for_remote_hosts() {
        let content = manifest_with(DARWIN_SHA).replace(
            "https://example.com/tool_linux_amd64.tar.gz",
            "http://example.com/tool_linux_amd64.tar.gz",
        );
        let err = ReleaseManifest::from_toml_str(&content).unwrap_err();
        assert!(err.to_string().contains("is not https"), "{err}");
    }

    #[test]
    fn test_plain_http_allowed_on_loopback() {
        let content = manifest_with(DARWIN_SHA).replace(
            "https://example.com/tool_linux_amd64.tar.gz",
            "http://127.0.0.1:8080/tool_linux_amd64.tar.gz",
        );
        let manifest = ReleaseManifest::from_toml_str(&content).unwrap();
        let artifact = manifest.artifact(Target::LinuxAmd64).unwrap();
        assert!(artifact.url.starts_with("http://127.0.0.1:8080/"));
    }

    #[test]
    fn test_allowed_url_hosts() {
        assert!(is_allowed_url("https://github.com/cnopslabs/oshiv"));
        assert!(is_allowed_url("http://localhost/tool.tar.gz"));
        assert!(is_allowed_url("http://127.0.0.1:9000/tool.tar.gz"));
        assert!(is_allowed_url("http://[::1]:9000/tool.tar.gz"));
        assert!(!is_allowed_url("http://example.com/tool.tar.gz"));
        assert!(!is_allowed_url("http://127.0.0.1.example.com/tool.tar.gz"));
        assert!(!is_allowed_url("http://127.0.0.1@example.com/tool.tar.gz"));
        assert!(!is_allowed_url("ftp://127.0.0.1/tool.tar.gz"));
    }

    #[test]
    fn test_invalid_toml() {
        let err = ReleaseManifest::from_toml_str("name = ").unwrap_err();
        assert!(err.to_string().contains("Invalid manifest"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("release.toml");
        std::fs::write(&path, manifest_with(DARWIN_SHA)).unwrap();

        let manifest = ReleaseManifest::load(&path).unwrap();
        assert_eq!(manifest.version, "2.0.0");
        let artifact = manifest.artifact(Target::LinuxAmd64).unwrap();
        assert_eq!(artifact.url, "https://example.com/tool_linux_amd64.tar.gz");
    }

    #[test]
    fn test_load_missing_file_reports_path() {
        let path = Path::new("/nonexistent/release.toml");
        let err = ReleaseManifest::load(path).unwrap_err();
        match &err {
            Error::Manifest { path: found, .. } => {
                assert_eq!(found.as_deref(), Some(path));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("/nonexistent/release.toml"));
    }

    #[test]
    fn test_load_invalid_toml_names_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "name = ").unwrap();

        let err = ReleaseManifest::load(&path).unwrap_err();

        let message = err.to_string();
        assert!(message.contains("broken.toml"), "{message}");
        assert!(message.contains("Invalid manifest"), "{message}");
        let source = std::error::Error::source(&err).map(ToString::to_string);
        assert!(source.is_some_and(|s| !s.is_empty()));
    }

    #[test]
    fn test_load_keeps_checksum_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("release.toml");
        std::fs::write(&path, manifest_with(&format!("{DARWIN_SHA}2"))).unwrap();

        let err = ReleaseManifest::load(&path).unwrap_err();
        assert!(matches!(err, Error::InvalidChecksum { .. }));
    }
}
