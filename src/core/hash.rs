//! SHA-256 Hashing Primitive
//!
//! Every commitment, seed and fingerprint in the engine goes through here:
//! - Commit digests (`secret:nonce`)
//! - Combined seeds (`secret:player_input:nonce`)
//! - Board fingerprints (canonical text form of the board)
//!
//! Digests are always rendered as 64 lowercase hex characters.

use sha2::{Sha256, Digest};

/// Raw SHA-256 output (256 bits / 32 bytes).
pub type DigestBytes = [u8; 32];

/// Length of a hex-encoded SHA-256 digest.
pub const HEX_DIGEST_LEN: usize = 64;

/// Separator placed between seed-material fields before hashing.
pub const FIELD_SEPARATOR: &str = ":";

/// Hash raw bytes.
pub fn hash_bytes(data: &[u8]) -> DigestBytes {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Hash a UTF-8 string and return the lowercase hex digest.
pub fn hash_hex(input: &str) -> String {
    hex::encode(hash_bytes(input.as_bytes()))
}

/// Hash fields joined by [`FIELD_SEPARATOR`].
///
/// `hash_fields(&["a", "b"])` is exactly `hash_hex("a:b")`. The separator is
/// mandatory: without it `("ab", "c")` and `("a", "bc")` would collide.
pub fn hash_fields(fields: &[&str]) -> String {
    let mut hasher = CanonicalHasher::new();
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            hasher.update_str(FIELD_SEPARATOR);
        }
        hasher.update_str(field);
    }
    hasher.finalize_hex()
}

/// Check that `s` is a well-formed hex digest (64 hex chars, either case).
pub fn is_hex_digest(s: &str) -> bool {
    s.len() == HEX_DIGEST_LEN && s.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Streaming hasher over canonical text.
///
/// Feeds SHA-256 incrementally so large canonical forms never need to be
/// materialized. Order of updates is part of the output.
pub struct CanonicalHasher {
    hasher: Sha256,
}

impl Default for CanonicalHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl CanonicalHasher {
    /// Create an empty hasher (no domain prefix).
    pub fn new() -> Self {
        Self { hasher: Sha256::new() }
    }

    /// Update with UTF-8 text.
    #[inline]
    pub fn update_str(&mut self, s: &str) {
        self.hasher.update(s.as_bytes());
    }

    /// Finalize and return raw bytes.
    pub fn finalize(self) -> DigestBytes {
        self.hasher.finalize().into()
    }

    /// Finalize and return the lowercase hex digest.
    pub fn finalize_hex(self) -> String {
        hex::encode(self.finalize())
    }
}

impl std::fmt::Write for CanonicalHasher {
    fn write_str(&mut self, s: &str) -> std::fmt::Result {
        self.update_str(s);
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
