//! Verified installer for oshiv release binaries.
//!
//! This crate provides functionality to:
//! - Identify the host [`Platform`] (OS, CPU family, bitness)
//! - Map a platform to exactly one [`ReleaseArtifact`] from a validated
//!   [`ReleaseManifest`]
//! - Download the archive through an [`ArtifactFetcher`], verify its SHA-256,
//!   extract it, and place the executable into a bin directory
//! - Render the manifest as a Homebrew formula
//!
//! # Example
//!
//! ```ignore
//! use oshiv_install_core::{InstallOptions, Installer, ReleaseManifest, detect_platform};
//!
//! let manifest = ReleaseManifest::builtin()?;
//! let installer = Installer::new(fetcher, manifest, InstallOptions::default());
//! let installed = installer.install(&detect_platform()).await?;
//! println!("{}", installed.path.display());
//! ```

#![warn(missing_docs)]

mod artifact;
mod checksum;
mod error;
mod extract;
mod fetch;
mod formula;
mod install;
mod manifest;
mod platform;

pub use artifact::{ReleaseArtifact, Target};
pub use checksum::{SHA256_HEX_LEN, Sha256Digest};
pub use error::{Error, Result};
pub use extract::extract_binary;
pub use fetch::ArtifactFetcher;
pub use formula::FormulaGenerator;
pub use install::{InstallOptions, InstalledBinary, Installer, default_bin_dir};
pub use manifest::ReleaseManifest;
pub use platform::{Arch, CpuFamily, Os, Platform, detect_platform};
