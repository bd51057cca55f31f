//! SHA-256 digests.

use serde::{Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Length of a hex-encoded SHA-256 digest.
pub const SHA256_HEX_LEN: usize = 64;

/// A validated SHA-256 digest, stored as lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sha256Digest(String);

impl Sha256Digest {
    /// Parse a hex digest.
    ///
    /// Upper- and lowercase hex are accepted; the digest is normalized to
    /// lowercase. The value is never padded or truncated.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidChecksum`] unless the input is exactly 64
    /// hexadecimal characters.
    pub fn parse(value: &str) -> Result<Self> {
        let len = value.chars().count();
        if len != SHA256_HEX_LEN {
            return Err(Error::invalid_checksum(
                value,
                format!("expected {SHA256_HEX_LEN} hex characters, got {len}"),
            ));
        }
        if let Some(bad) = value.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(Error::invalid_checksum(
                value,
                format!("'{bad}' is not a hexadecimal character"),
            ));
        }
        Ok(Self(value.to_ascii_lowercase()))
    }

    /// Compute the digest of a byte slice.
    #[must_use]
    pub fn of(data: &[u8]) -> Self {
        Self(hex::encode(Sha256::digest(data)))
    }

    /// Compute the digest of a file, reading it in chunks.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read.
    pub fn of_file(path: &std::path::Path) -> std::io::Result<Self> {
        use std::io::Read;

        let mut file = std::fs::File::open(path)?;
        let mut hasher = Sha256::new();
        let mut buf = vec![0u8; 64 * 1024];
        loop {
            let n = file.read(&mut buf)?;
            if n == 0 {
                break;
            }
            hasher.update(&buf[..n]);
        }
        Ok(Self(hex::encode(hasher.finalize())))
    }

    /// Whether `data` hashes to this digest.
    #[must_use]
    pub fn verify(&self, data: &[u8]) -> bool {
        Self::of(data) == *self
    }

    /// The lowercase hex form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Sha256Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Sha256Digest {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for Sha256Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}
