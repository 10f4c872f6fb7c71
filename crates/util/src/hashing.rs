//! Keyed content hashes and state checksums.
//!
//! Content hashes are capability tokens: a field value is accepted by the
//! host's tamper check only when its hash appears in the state blob. The
//! checksum seals the serialized field state map so a client cannot inject
//! hashes of its own.

use std::fmt;

use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Error)]
pub enum HashError {
    #[error("invalid hashing key: {0}")]
    InvalidKey(String),
}

/// HMAC-SHA256 hasher bound to the host's secret.
#[derive(Clone)]
pub struct KeyedHasher {
    keyed_mac: HmacSha256,
}

impl fmt::Debug for KeyedHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyedHasher").field("secret", &"<redacted>").finish()
    }
}

impl KeyedHasher {
    pub fn new(secret: impl AsRef<[u8]>) -> Result<Self, HashError> {
        let keyed_mac = HmacSha256::new_from_slice(secret.as_ref()).map_err(|err| HashError::InvalidKey(err.to_string()))?;
        Ok(Self { keyed_mac })
    }

    /// Hex-encoded keyed hash of `value`.
    pub fn hash(&self, value: &str) -> String {
        let mut mac = self.keyed_mac.clone();
        mac.update(value.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Constant-time check that `expected_hex` is the keyed hash of `value`.
    ///
    /// Only the canonical lowercase encoding produced by [`KeyedHasher::hash`] is accepted.
    pub fn verify(&self, value: &str, expected_hex: &str) -> bool {
        if expected_hex.bytes().any(|byte| !matches!(byte, b'0'..=b'9' | b'a'..=b'f')) {
            return false;
        }
        let Ok(expected) = hex::decode(expected_hex) else {
            return false;
        };
        let mut mac = self.keyed_mac.clone();
        mac.update(value.as_bytes());
        mac.verify_slice(&expected).is_ok()
    }

    /// Checksum of a serialized field state map: the keyed hash of its decimal CRC32.
    pub fn checksum(&self, serialized: &str) -> String {
        self.hash(&crc32(serialized).to_string())
    }

    pub fn verify_checksum(&self, serialized: &str, checksum: &str) -> bool {
        self.verify(&crc32(serialized).to_string(), checksum)
    }
}

/// CRC32 (IEEE) of the UTF-8 bytes of `data`.
pub fn crc32(data: &str) -> u32 {
    crc32fast::hash(data.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crc32_matches_reference_value() {
        // Well-known IEEE CRC32 of "The quick brown fox jumps over the lazy dog".
        assert_eq!(crc32("The quick brown fox jumps over the lazy dog"), 0x414F_A339);
    }

    #[test]
    fn hash_is_keyed_and_deterministic() {
        let hasher = KeyedHasher::new("salt-a").expect("hasher");
        let other = KeyedHasher::new("salt-b").expect("hasher");
        assert_eq!(hasher.hash("value"), hasher.hash("value"));
        assert_ne!(hasher.hash("value"), other.hash("value"));
        assert_eq!(hasher.hash("value").len(), 64);
    }

    #[test]
    fn checksum_round_trips_through_verify() {
        let hasher = KeyedHasher::new("salt").expect("hasher");
        let serialized = r#"{"5":"abc"}"#;
        let checksum = hasher.checksum(serialized);
        assert!(hasher.verify_checksum(serialized, &checksum));
        assert!(!hasher.verify_checksum(r#"{"5":"abd"}"#, &checksum));
        assert!(!hasher.verify_checksum(serialized, "not-hex"));
        assert!(!hasher.verify_checksum(serialized, &checksum.to_uppercase()));
    }

    #[test]
    fn debug_output_hides_secret() {
        let hasher = KeyedHasher::new("top-secret").expect("hasher");
        assert!(!format!("{hasher:?}").contains("top-secret"));
    }
}
