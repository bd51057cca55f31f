//! Platform identification.
//!
//! A [`Platform`] is the (operating system, architecture) pair used to pick a
//! release artifact. Architectures carry their CPU family and bitness so that
//! 32-bit hosts are representable and can be rejected explicitly.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Platform identifier combining OS and architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Platform {
    /// Operating system.
    pub os: Os,
    /// CPU architecture.
    pub arch: Arch,
}

impl Platform {
    /// Create a new platform.
    #[must_use]
    pub const fn new(os: Os, arch: Arch) -> Self {
        Self { os, arch }
    }

    /// Detect the platform of the running host.
    #[must_use]
    pub fn detect() -> Self {
        Self {
            os: Os::from_consts(std::env::consts::OS),
            arch: Arch::from_consts(std::env::consts::ARCH),
        }
    }

    /// Parse from a string like `darwin-arm64` or `linux-amd64`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPlatform`] if the string is not `<os>-<arch>`
    /// or either half is unknown.
    pub fn parse(s: &str) -> Result<Self> {
        let Some((os_name, arch_name)) = s.split_once('-') else {
            return Err(Error::invalid_platform(s, "expected <os>-<arch>"));
        };
        let Some(os) = Os::parse(os_name) else {
            let message = format!("unknown operating system '{os_name}'");
            return Err(Error::invalid_platform(s, message));
        };
        let Some(arch) = Arch::parse(arch_name) else {
            let message = format!("unknown architecture '{arch_name}'");
            return Err(Error::invalid_platform(s, message));
        };
        Ok(Self { os, arch })
    }
}

/// Detect the host platform.
///
/// Kept as a free function so callers can inject it (or a fixed platform)
/// into the installer instead of the resolver reading global state.
#[must_use]
pub fn detect_platform() -> Platform {
    Platform::detect()
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os, self.arch)
    }
}

impl FromStr for Platform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Operating system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Os {
    /// macOS.
    Darwin,
    /// Linux.
    Linux,
    /// Any operating system without prebuilt releases.
    Other,
}

impl Os {
    fn from_consts(os: &str) -> Self {
        Self::parse(os).unwrap_or(Self::Other)
    }

    /// Parse from string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "darwin" | "macos" | "osx" => Some(Self::Darwin),
            "linux" => Some(Self::Linux),
            "windows" | "freebsd" | "netbsd" | "openbsd" | "other" => Some(Self::Other),
            _ => None,
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Darwin => write!(f, "darwin"),
            Self::Linux => write!(f, "linux"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// CPU architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
    /// 64-bit Intel/AMD.
    X86_64,
    /// 64-bit ARM.
    Arm64,
    /// 32-bit Intel.
    X86,
    /// 32-bit ARM.
    Arm,
    /// Anything else.
    Other,
}

/// CPU family, independent of bitness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuFamily {
    /// Intel/AMD x86.
    Intel,
    /// ARM.
    Arm,
    /// Anything else.
    Other,
}

impl Arch {
    fn from_consts(arch: &str) -> Self {
        Self::parse(arch).unwrap_or(Self::Other)
    }

    /// Parse from string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "x86_64" | "amd64" | "x64" => Some(Self::X86_64),
            "arm64" | "aarch64" => Some(Self::Arm64),
            "x86" | "i386" | "i686" | "386" => Some(Self::X86),
            "arm" | "armv6" | "armv7" => Some(Self::Arm),
            "riscv64" | "powerpc64" | "s390x" | "mips" | "mips64" | "other" => Some(Self::Other),
            _ => None,
        }
    }

    /// The CPU family of this architecture.
    #[must_use]
    pub const fn family(self) -> CpuFamily {
        match self {
            Self::X86_64 | Self::X86 => CpuFamily::Intel,
            Self::Arm64 | Self::Arm => CpuFamily::Arm,
            Self::Other => CpuFamily::Other,
        }
    }

    /// Whether this is a 64-bit architecture.
    #[must_use]
    pub const fn is_64_bit(self) -> bool {
        matches!(self, Self::X86_64 | Self::Arm64)
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X86_64 => write!(f, "x86_64"),
            Self::Arm64 => write!(f, "arm64"),
            Self::X86 => write!(f, "x86"),
            Self::Arm => write!(f, "arm"),
            Self::Other => write!(f, "other"),
        }
    }
}
