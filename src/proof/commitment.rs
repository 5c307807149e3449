//! Round Commitment Protocol
//!
//! Commit to the operator secret before the player says anything.
//! Reveal the secret afterwards so anyone can check the commitment and
//! recompute the combined seed.
//!
//! ```text
//! commit_digest = SHA256(operator_secret ":" round_nonce)
//! combined_seed = SHA256(operator_secret ":" player_input ":" round_nonce)
//! ```
//!
//! The pure functions here cannot see ordering. Publishing the commit digest
//! before the player input is known is enforced by [`crate::round::Round`].

use rand::rngs::OsRng;
use rand::{Rng, RngCore};
use serde::{Serialize, Deserialize};

use crate::core::hash::hash_fields;
use crate::error::{EngineError, EngineResult};

/// Bytes of OS entropy in an operator secret.
pub const OPERATOR_SECRET_BYTES: usize = 32;

/// Exclusive upper bound for generated round nonces.
const NONCE_BOUND: u32 = 1_000_000_000;

/// Compute the commit digest for a secret and nonce.
pub fn commit(operator_secret: &str, round_nonce: &str) -> EngineResult<String> {
    require_non_empty("operator secret", operator_secret)?;
    require_non_empty("round nonce", round_nonce)?;
    Ok(hash_fields(&[operator_secret, round_nonce]))
}

/// Compute the combined seed once the player input is fixed.
pub fn combine(operator_secret: &str, player_input: &str, round_nonce: &str) -> EngineResult<String> {
    require_non_empty("operator secret", operator_secret)?;
    require_non_empty("player input", player_input)?;
    require_non_empty("round nonce", round_nonce)?;
    Ok(hash_fields(&[operator_secret, player_input, round_nonce]))
}

/// Check a published commit digest against a revealed secret and nonce.
///
/// A mismatch is a fairness finding, not an error: this returns `false`
/// for it, and also for empty inputs that could never have been committed.
pub fn verify_commit(commit_digest: &str, operator_secret: &str, round_nonce: &str) -> bool {
    match commit(operator_secret, round_nonce) {
        Ok(computed) => computed == commit_digest,
        Err(_) => false,
    }
}

/// Published half of a round: safe to show before the reveal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundCommitment {
    /// SHA-256 of `secret:nonce`, published first.
    pub commit_digest: String,
    /// Round nonce (public from the start).
    pub round_nonce: String,
}

impl RoundCommitment {
    /// Commit to a secret under a nonce.
    pub fn new(operator_secret: &str, round_nonce: &str) -> EngineResult<Self> {
        Ok(Self {
            commit_digest: commit(operator_secret, round_nonce)?,
            round_nonce: round_nonce.to_string(),
        })
    }

    /// Verify that a revealed secret matches this commitment.
    pub fn verify(&self, operator_secret: &str) -> bool {
        verify_commit(&self.commit_digest, operator_secret, &self.round_nonce)
    }
}

/// The three strings every round's randomness comes from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedMaterial {
    /// Operator-held secret, revealed after the round.
    pub operator_secret: String,
    /// Player-supplied string.
    pub player_input: String,
    /// Per-round nonce.
    pub round_nonce: String,
}

impl SeedMaterial {
    /// Bundle seed material.
    pub fn new(
        operator_secret: impl Into<String>,
        player_input: impl Into<String>,
        round_nonce: impl Into<String>,
    ) -> Self {
        Self {
            operator_secret: operator_secret.into(),
            player_input: player_input.into(),
            round_nonce: round_nonce.into(),
        }
    }

    /// All three fields must be non-empty.
    pub fn validate(&self) -> EngineResult<()> {
        require_non_empty("operator secret", &self.operator_secret)?;
        require_non_empty("player input", &self.player_input)?;
        require_non_empty("round nonce", &self.round_nonce)
    }

    /// Commit digest for this material.
    pub fn commit_digest(&self) -> EngineResult<String> {
        commit(&self.operator_secret, &self.round_nonce)
    }

    /// Combined seed for this material.
    pub fn combined_seed(&self) -> EngineResult<String> {
        combine(&self.operator_secret, &self.player_input, &self.round_nonce)
    }
}

/// Generate a fresh operator secret: 32 OS-random bytes, hex-encoded.
pub fn generate_operator_secret() -> String {
    let mut bytes = [0u8; OPERATOR_SECRET_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Generate a short numeric round nonce.
pub fn generate_round_nonce() -> String {
    OsRng.gen_range(1..NONCE_BOUND).to_string()
}

/// Player input used when the player does not supply one.
pub fn default_player_input() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

fn require_non_empty(field: &str, value: &str) -> EngineResult<()> {
    if value.is_empty() {
        return Err(EngineError::invalid(format!("{} must not be empty", field)));
    }
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SECRET: &str = "b2a5f3f32a4d9c6ee7a8c1d33456677890abcdeffedcba0987654321ffeeddcc";
    const NONCE: &str = "42";
    const PLAYER: &str = "candidate-hello";
    const COMMIT: &str = "bb9acdc67f3f18f3345236a01f0e5072596657a9005c7d8a22cff061451a6b34";
    const COMBINED: &str = "e1dddf77de27d395ea2be2ed49aa2a59bd6bf12ee8d350c16c008abd406c07e0";

    #[test]
    fn test_known_vector() {
        assert_eq!(commit(SECRET, NONCE).unwrap(), COMMIT);
        assert_eq!(combine(SECRET, PLAYER, NONCE).unwrap(), COMBINED);
        assert!(verify_commit(COMMIT, SECRET, NONCE));
    }

    #[test]
    fn test_commitment_struct() {
        let commitment = RoundCommitment::new(SECRET, NONCE).unwrap();
        assert_eq!(commitment.commit_digest, COMMIT);
        assert!(commitment.verify(SECRET));
        assert!(!commitment.verify("some-other-secret"));
    }

    #[test]
    fn test_wrong_nonce_fails() {
        assert!(!verify_commit(COMMIT, SECRET, "43"));
    }

    #[test]
    fn test_seed_material() {
        let material = SeedMaterial::new(SECRET, PLAYER, NONCE);
        assert!(material.validate().is_ok());
        assert_eq!(material.commit_digest().unwrap(), COMMIT);
        assert_eq!(material.combined_seed().unwrap(), COMBINED);

        let empty = SeedMaterial::new(SECRET, "", NONCE);
        assert!(matches!(empty.validate(), Err(EngineError::InvalidInput(_))));
        assert!(empty.combined_seed().is_err());
    }

    #[test]
    fn test_empty_inputs_rejected() {
        assert!(commit("", NONCE).is_err());
        assert!(commit(SECRET, "").is_err());
        assert!(combine(SECRET, PLAYER, "").is_err());
        assert!(!verify_commit(COMMIT, "", NONCE));
    }

    #[test]
    fn test_generated_secret_shape() {
        let a = generate_operator_secret();
        let b = generate_operator_secret();
        assert_eq!(a.len(), OPERATOR_SECRET_BYTES * 2);
        assert!(crate::core::hash::is_hex_digest(&a));
        assert_ne!(a, b);
    }

    #[test]
    fn test_generated_nonce_numeric() {
        for _ in 0..100 {
            let nonce = generate_round_nonce();
            let value: u32 = nonce.parse().unwrap();
            assert!(value >= 1 && value < NONCE_BOUND);
        }
    }

    #[test]
    fn test_default_player_input_unique() {
        let a = default_player_input();
        assert_eq!(a.len(), 32);
        assert_ne!(a, default_player_input());
    }

    proptest! {
        #[test]
        fn prop_commit_roundtrip(secret in "[ -~]{1,80}", nonce in "[0-9]{1,10}") {
            let digest = commit(&secret, &nonce).unwrap();
            prop_assert!(verify_commit(&digest, &secret, &nonce));
            prop_assert_eq!(&digest, &commit(&secret, &nonce).unwrap());
        }

        #[test]
        fn prop_mutated_digest_fails(secret in "[a-f0-9]{64}", nonce in "[0-9]{1,6}", pos in 0usize..64) {
            let digest = commit(&secret, &nonce).unwrap();
            let mut bytes = digest.clone().into_bytes();
            bytes[pos] = if bytes[pos] == b'0' { b'1' } else { b'0' };
            let mutated = String::from_utf8(bytes).unwrap();
            prop_assert!(!verify_commit(&mutated, &secret, &nonce));
        }

        #[test]
        fn prop_combine_pure(secret in "[a-f0-9]{64}", player in "[ -~]{1,40}", nonce in "[0-9]{1,6}") {
            prop_assert_eq!(
                combine(&secret, &player, &nonce).unwrap(),
                combine(&secret, &player, &nonce).unwrap()
            );
        }
    }
}
