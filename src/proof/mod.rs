//! Provable Fairness
//!
//! Lets anyone check a round after the fact through:
//! - Commit-reveal of the operator secret
//! - Round transcript recording
//! - Verification by deterministic replay
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    PROOF SYSTEM                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  commitment.rs   - Commit digest, combined seed, secrets    │
//! │  transcript.rs   - Persistable record of a round            │
//! │  verify.rs       - Replay and public verification surface   │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod commitment;
pub mod transcript;
pub mod verify;

// Re-export key types
pub use commitment::{
    commit, combine, verify_commit, RoundCommitment, SeedMaterial,
    generate_operator_secret, generate_round_nonce, default_player_input,
};
pub use transcript::{RoundTranscript, RoundMetadata, RoundResult, RoundReveal};
pub use verify::{
    replay, verify_seed_material, verify_transcript,
    VerificationReport, VerificationResult, VerificationError,
};
