//! Release targets and the artifacts published for them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::checksum::Sha256Digest;
use crate::platform::{CpuFamily, Os, Platform};
use crate::{Error, Result};

/// A prebuilt release build.
///
/// Each target is published as one `tar.gz` archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Target {
    /// Universal macOS binary (Intel and Apple Silicon)
    DarwinAll,
    /// Linux `x86_64`
    LinuxAmd64,
    /// Linux ARM64/aarch64
    LinuxArm64,
}

impl Target {
    /// Returns all release targets.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::DarwinAll, Self::LinuxAmd64, Self::LinuxArm64]
    }

    /// Select the target that runs on `platform`.
    ///
    /// macOS gets the universal build regardless of CPU; Linux needs a
    /// 64-bit Intel or ARM CPU. Everything else has no release.
    #[must_use]
    pub const fn for_platform(platform: &Platform) -> Option<Self> {
        let arch = platform.arch;
        match (platform.os, arch.family(), arch.is_64_bit()) {
            (Os::Darwin, _, _) => Some(Self::DarwinAll),
            (Os::Linux, CpuFamily::Intel, true) => Some(Self::LinuxAmd64),
            (Os::Linux, CpuFamily::Arm, true) => Some(Self::LinuxArm64),
            _ => None,
        }
    }

    /// Returns the short identifier (e.g., "linux-amd64").
    #[must_use]
    pub const fn id(&self) -> &'static str {
        match self {
            Self::DarwinAll => "darwin-all",
            Self::LinuxAmd64 => "linux-amd64",
            Self::LinuxArm64 => "linux-arm64",
        }
    }

    /// Returns the suffix used in release archive names (e.g., "linux_amd64").
    #[must_use]
    pub const fn asset_suffix(&self) -> &'static str {
        match self {
            Self::DarwinAll => "darwin_all",
            Self::LinuxAmd64 => "linux_amd64",
            Self::LinuxArm64 => "linux_arm64",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Target {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|t| t.id() == s)
            .ok_or_else(|| {
                Error::invalid_platform(
                    s,
                    "unknown release target; valid targets: darwin-all, linux-amd64, linux-arm64",
                )
            })
    }
}

/// A downloadable archive containing the prebuilt binary for one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseArtifact {
    /// Target this archive was built for.
    pub target: Target,
    /// Download URL of the `tar.gz` archive.
    pub url: String,
    /// Expected SHA-256 of the archive bytes.
    pub sha256: Sha256Digest,
    /// Name of the executable inside the archive.
    pub binary_name: String,
}

impl ReleaseArtifact {
    /// File name of the archive, taken from the last URL segment.
    #[must_use]
    pub fn archive_name(&self) -> &str {
        self.url.rsplit('/').next().unwrap_or(&self.url)
    }
}
