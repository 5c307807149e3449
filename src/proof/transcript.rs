//! Round Transcript Recording
//!
//! Records everything needed to independently verify a round. This is the
//! record the surrounding application persists and publishes.

use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};
use uuid::Uuid;

use crate::game::path::Path;
use crate::game::payout::PayoutTable;

/// Current transcript version.
pub const TRANSCRIPT_VERSION: u8 = 1;

/// Complete round transcript.
///
/// Filled in three phases:
/// 1. `metadata` when the commitment is published
/// 2. `result` when the player input arrives and the outcome is computed
/// 3. `reveal` when the operator secret is released
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundTranscript {
    /// Version for forward compatibility.
    pub version: u8,

    /// Round metadata (public from commitment time).
    pub metadata: RoundMetadata,

    /// Computed outcome.
    pub result: Option<RoundResult>,

    /// Released operator secret.
    pub reveal: Option<RoundReveal>,
}

/// Round metadata, published with the commitment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundMetadata {
    /// Unique round identifier.
    pub round_id: Uuid,

    /// SHA-256 of `secret:nonce`.
    pub commit_digest: String,

    /// Round nonce.
    pub round_nonce: String,

    /// Board rows used for this round.
    pub rows: usize,

    /// Center column used for this round.
    pub center_column: usize,

    /// Payout table in force, fixed before any player input.
    pub payout: PayoutTable,

    /// When the commitment was published.
    pub committed_at: DateTime<Utc>,
}

/// Outcome of a started round.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundResult {
    /// Player-supplied input.
    pub player_input: String,

    /// Player's column choice.
    pub column: usize,

    /// SHA-256 of `secret:player_input:nonce`.
    pub combined_seed: String,

    /// Fingerprint of the generated board.
    pub board_fingerprint: String,

    /// Final bucket.
    pub landing_index: usize,

    /// Payout multiplier for the bucket.
    pub multiplier: f64,

    /// Per-row decisions.
    pub path: Path,

    /// When the outcome was computed.
    pub started_at: DateTime<Utc>,
}

/// Released secret.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundReveal {
    /// The operator secret committed to in `metadata.commit_digest`.
    pub operator_secret: String,

    /// When the secret was released.
    pub revealed_at: DateTime<Utc>,
}

impl RoundTranscript {
    /// Create a transcript for a freshly committed round.
    pub fn new(metadata: RoundMetadata) -> Self {
        Self {
            version: TRANSCRIPT_VERSION,
            metadata,
            result: None,
            reveal: None,
        }
    }

    /// True once both the outcome and the secret are present.
    pub fn is_complete(&self) -> bool {
        self.result.is_some() && self.reveal.is_some()
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Parse from JSON.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
