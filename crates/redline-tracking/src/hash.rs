//! Content fingerprints.

use serde::{Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;

/// SHA-256 digest of a document's raw bytes.
///
/// Hashing works on bytes, never decoded text, so line-ending or encoding
/// normalisation can't hide a change.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Full lowercase hex encoding.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// First 16 hex characters, for log lines and status output.
    pub fn short(&self) -> String {
        hex::encode(&self.0[..8])
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({})", self.short())
    }
}

impl Serialize for ContentHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// Hash raw bytes.
pub fn hash(bytes: &[u8]) -> ContentHash {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    ContentHash(hasher.finalize().into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_digest() {
        assert_eq!(
            hash(b"").to_hex(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            hash(b"abc").to_hex(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(hash(b"Hello World\n"), hash(b"Hello World\n"));
    }

    #[test]
    fn test_line_endings_differ() {
        assert_ne!(hash(b"a\nb\n"), hash(b"a\r\nb\r\n"));
    }

    #[test]
    fn test_short_prefix() {
        let digest = hash(b"abc");
        assert_eq!(digest.short(), "ba7816bf8f01cfea");
        assert!(digest.to_hex().starts_with(&digest.short()));
        assert_eq!(format!("{digest:?}"), "ContentHash(ba7816bf8f01cfea)");
    }
}
