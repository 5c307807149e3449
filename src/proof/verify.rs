//! Verification API
//!
//! Verify rounds by deterministic replay. Needs nothing but the seed
//! material and the column choice, so any third party can run it.

use serde::{Serialize, Deserialize};
use tracing::warn;

use crate::core::hash::is_hex_digest;
use crate::error::EngineResult;
use crate::game::outcome::compute_outcome;
use crate::game::path::Path;
use crate::proof::commitment::{combine, commit, verify_commit};
use crate::proof::transcript::RoundTranscript;

/// Replay an outcome and compare it with stored results.
///
/// Both the landing index and the board fingerprint must match: the same
/// bucket can be reached from a different board.
///
/// # Errors
///
/// Only for inputs `compute_outcome` rejects. A mismatch is `Ok(false)`.
pub fn replay(
    combined_seed: &str,
    column: usize,
    row_count: usize,
    center_column: usize,
    expected_landing_index: usize,
    expected_board_fingerprint: &str,
) -> EngineResult<bool> {
    let outcome = compute_outcome(combined_seed, column, row_count, center_column)?;

    let matches = outcome.landing_index == expected_landing_index
        && outcome.board_fingerprint == expected_board_fingerprint;

    if !matches {
        warn!(
            "Replay mismatch: landing {} (expected {}), fingerprint {} (expected {})",
            outcome.landing_index,
            expected_landing_index,
            outcome.board_fingerprint,
            expected_board_fingerprint
        );
    }

    Ok(matches)
}

/// Everything a public verifier recomputes from revealed seed material.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VerificationReport {
    /// Recomputed `SHA256(secret:nonce)`.
    pub commit_digest: String,
    /// Recomputed `SHA256(secret:player_input:nonce)`.
    pub combined_seed: String,
    /// Recomputed board fingerprint.
    pub board_fingerprint: String,
    /// Recomputed landing index.
    pub landing_index: usize,
    /// Recomputed path.
    pub path: Path,
}

/// Recompute a round from its plain-text inputs.
///
/// This is the public verification surface: four strings plus board size in,
/// the full derivation out.
pub fn verify_seed_material(
    operator_secret: &str,
    player_input: &str,
    round_nonce: &str,
    column: usize,
    row_count: usize,
    center_column: usize,
) -> EngineResult<VerificationReport> {
    let commit_digest = commit(operator_secret, round_nonce)?;
    let combined_seed = combine(operator_secret, player_input, round_nonce)?;
    let outcome = compute_outcome(&combined_seed, column, row_count, center_column)?;

    Ok(VerificationReport {
        commit_digest,
        combined_seed,
        board_fingerprint: outcome.board_fingerprint,
        landing_index: outcome.landing_index,
        path: outcome.path,
    })
}

/// Transcript verification result.
#[derive(Debug)]
pub struct VerificationResult {
    /// Did verification pass?
    pub valid: bool,

    /// Recomputed values (absent if the transcript could not be replayed).
    pub report: Option<VerificationReport>,

    /// First problem found, if any.
    pub error: Option<VerificationError>,
}

impl VerificationResult {
    fn failed(report: Option<VerificationReport>, error: VerificationError) -> Self {
        warn!("Transcript verification failed: {}", error);
        Self { valid: false, report, error: Some(error) }
    }
}

/// Reasons a transcript fails verification.
#[derive(Debug, Clone, PartialEq)]
pub enum VerificationError {
    /// Transcript version not understood.
    VersionMismatch {
        /// Expected version.
        expected: u8,
        /// Actual version.
        got: u8,
    },

    /// Round has no computed outcome yet.
    NotStarted,

    /// Operator secret has not been revealed.
    NotRevealed,

    /// Stored digests are not 64-char hex.
    MalformedDigest,

    /// Revealed secret does not match the published commitment.
    CommitMismatch,

    /// Stored combined seed differs from the recomputed one.
    CombinedSeedMismatch {
        /// Stored value.
        expected: String,
        /// Recomputed value.
        computed: String,
    },

    /// Stored board fingerprint differs from the replay.
    FingerprintMismatch {
        /// Stored value.
        expected: String,
        /// Recomputed value.
        computed: String,
    },

    /// Stored landing index differs from the replay.
    LandingMismatch {
        /// Stored value.
        expected: usize,
        /// Recomputed value.
        computed: usize,
    },

    /// Stored path differs from the replay.
    PathMismatch {
        /// First row where the paths disagree.
        row: usize,
    },

    /// Stored multiplier is not the table's value for the landing index.
    MultiplierMismatch {
        /// Stored value.
        expected: f64,
        /// Value from the committed payout table.
        computed: f64,
    },

    /// Inputs the engine rejects outright.
    InvalidInput(String),
}

impl std::fmt::Display for VerificationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::VersionMismatch { expected, got } => {
                write!(f, "Version mismatch: expected {}, got {}", expected, got)
            }
            Self::NotStarted => write!(f, "Round has no outcome"),
            Self::NotRevealed => write!(f, "Operator secret not revealed"),
            Self::MalformedDigest => write!(f, "Malformed digest in transcript"),
            Self::CommitMismatch => write!(f, "Revealed secret does not match commitment"),
            Self::CombinedSeedMismatch { expected, computed } => {
                write!(f, "Combined seed mismatch: expected {}, computed {}", expected, computed)
            }
            Self::FingerprintMismatch { expected, computed } => {
                write!(f, "Board fingerprint mismatch: expected {}, computed {}", expected, computed)
            }
            Self::LandingMismatch { expected, computed } => {
                write!(f, "Landing index mismatch: expected {}, computed {}", expected, computed)
            }
            Self::PathMismatch { row } => write!(f, "Path mismatch from row {}", row),
            Self::MultiplierMismatch { expected, computed } => {
                write!(f, "Multiplier mismatch: expected {}, computed {}", expected, computed)
            }
            Self::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

impl std::error::Error for VerificationError {}

/// Verify a revealed round transcript by full replay.
///
/// Checks, in order: version, completeness, commitment, combined seed,
/// board fingerprint, landing index, path, multiplier. The multiplier is
/// looked up in the payout table recorded at commitment time.
pub fn verify_transcript(transcript: &RoundTranscript) -> VerificationResult {
    if transcript.version != crate::proof::transcript::TRANSCRIPT_VERSION {
        return VerificationResult::failed(None, VerificationError::VersionMismatch {
            expected: crate::proof::transcript::TRANSCRIPT_VERSION,
            got: transcript.version,
        });
    }

    let result = match &transcript.result {
        Some(r) => r,
        None => return VerificationResult::failed(None, VerificationError::NotStarted),
    };
    let reveal = match &transcript.reveal {
        Some(r) => r,
        None => return VerificationResult::failed(None, VerificationError::NotRevealed),
    };

    let meta = &transcript.metadata;
    if !is_hex_digest(&meta.commit_digest) || !is_hex_digest(&result.board_fingerprint) {
        return VerificationResult::failed(None, VerificationError::MalformedDigest);
    }

    // 1. Revealed secret must open the published commitment
    if !verify_commit(&meta.commit_digest, &reveal.operator_secret, &meta.round_nonce) {
        return VerificationResult::failed(None, VerificationError::CommitMismatch);
    }

    // 2. Replay everything from the seed material
    let report = match verify_seed_material(
        &reveal.operator_secret,
        &result.player_input,
        &meta.round_nonce,
        result.column,
        meta.rows,
        meta.center_column,
    ) {
        Ok(report) => report,
        Err(e) => {
            return VerificationResult::failed(None, VerificationError::InvalidInput(e.to_string()))
        }
    };

    let multiplier = match meta.payout.multiplier_for(report.landing_index) {
        Ok(m) => m,
        Err(e) => {
            return VerificationResult::failed(
                Some(report),
                VerificationError::InvalidInput(e.to_string()),
            )
        }
    };

    // 3. Compare against what was stored
    let error = if report.combined_seed != result.combined_seed {
        Some(VerificationError::CombinedSeedMismatch {
            expected: result.combined_seed.clone(),
            computed: report.combined_seed.clone(),
        })
    } else if report.board_fingerprint != result.board_fingerprint {
        Some(VerificationError::FingerprintMismatch {
            expected: result.board_fingerprint.clone(),
            computed: report.board_fingerprint.clone(),
        })
    } else if report.landing_index != result.landing_index {
        Some(VerificationError::LandingMismatch {
            expected: result.landing_index,
            computed: report.landing_index,
        })
    } else if let Some(row) = result.path.first_mismatch(&report.path) {
        Some(VerificationError::PathMismatch { row })
    } else if result.multiplier != multiplier {
        Some(VerificationError::MultiplierMismatch {
            expected: result.multiplier,
            computed: multiplier,
        })
    } else {
        None
    };

    match error {
        Some(error) => VerificationResult::failed(Some(report), error),
        None => VerificationResult { valid: true, report: Some(report), error: None },
    }
}

// =============================================================================
// TESTS
// =============================================================================
