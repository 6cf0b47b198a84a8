//! Artifact key derivation

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide counter mixed into every key so that identical bodies
/// submitted within the same clock tick still get distinct keys.
static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Hex-encoded fingerprint naming one artifact pair
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactKey(String);

impl ArtifactKey {
    /// Derive a fresh key from the document content and the request time
    pub fn derive(content: &[u8], at: DateTime<Utc>) -> Self {
        let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed);
        let nanos = at
            .timestamp_nanos_opt()
            .unwrap_or_else(|| at.timestamp_micros());

        let mut hasher = Sha256::new();
        hasher.update(content);
        hasher.update(nanos.to_be_bytes());
        hasher.update(seq.to_be_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArtifactKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_key_is_hex_sha256() {
        let key = ArtifactKey::derive(b"<p>hello</p>", Utc::now());
        assert_eq!(key.as_str().len(), 64);
        assert!(key.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_same_content_same_instant_is_distinct() {
        let at = Utc::now();
        let first = ArtifactKey::derive(b"<p>same</p>", at);
        let second = ArtifactKey::derive(b"<p>same</p>", at);
        assert_ne!(first, second);
    }

    #[test]
    fn test_many_keys_are_unique() {
        let at = Utc::now();
        let keys: HashSet<_> = (0..1000)
            .map(|_| ArtifactKey::derive(b"<html></html>", at))
            .collect();
        assert_eq!(keys.len(), 1000);
    }
}
