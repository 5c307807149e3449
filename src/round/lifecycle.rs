//! Round Lifecycle
//!
//! One round moves through three phases and never back:
//!
//! ```text
//! Committed ──start()──▶ Started ──reveal()──▶ Revealed
//! ```
//!
//! The commit digest exists before any player input is accepted, and the
//! combined seed is only derived inside `start()`. The secret leaves the
//! round only through `reveal()`.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::EngineError;
use crate::game::config::GameConfig;
use crate::proof::commitment::{
    combine, default_player_input, generate_operator_secret, generate_round_nonce,
    RoundCommitment,
};
use crate::proof::transcript::{RoundMetadata, RoundResult, RoundReveal, RoundTranscript};

/// Round phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    /// Commitment published, waiting for player input.
    Committed,
    /// Outcome computed, secret still held.
    Started,
    /// Secret released.
    Revealed,
}

/// Round errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RoundError {
    /// Operation not allowed in the current phase.
    #[error("Round is {actual:?}, expected {expected:?}")]
    InvalidPhase {
        /// Phase the operation needs.
        expected: RoundPhase,
        /// Phase the round is in.
        actual: RoundPhase,
    },

    /// No round with this id.
    #[error("Round {0} not found")]
    RoundNotFound(Uuid),

    /// Nonce already used by another round.
    #[error("Round nonce {0:?} already used")]
    DuplicateNonce(String),

    /// Engine rejected the inputs.
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// A single round.
pub struct Round {
    config: Arc<GameConfig>,
    operator_secret: String,
    phase: RoundPhase,
    transcript: RoundTranscript,
}

impl std::fmt::Debug for Round {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Round")
            .field("id", &self.id())
            .field("phase", &self.phase)
            .field("operator_secret", &"<redacted>")
            .finish()
    }
}

impl Round {
    /// Open a round with a fresh secret and nonce.
    pub fn commit(config: Arc<GameConfig>) -> Result<Self, RoundError> {
        Self::commit_with(config, generate_operator_secret(), generate_round_nonce())
    }

    /// Open a round with a caller-chosen secret and nonce.
    #[instrument(skip(config, operator_secret))]
    pub fn commit_with(
        config: Arc<GameConfig>,
        operator_secret: String,
        round_nonce: String,
    ) -> Result<Self, RoundError> {
        let commitment = RoundCommitment::new(&operator_secret, &round_nonce)?;

        let metadata = RoundMetadata {
            round_id: Uuid::new_v4(),
            commit_digest: commitment.commit_digest,
            round_nonce: commitment.round_nonce,
            rows: config.rows,
            center_column: config.center_column,
            payout: config.payout.clone(),
            committed_at: Utc::now(),
        };

        info!(
            "Round {} committed: {}",
            metadata.round_id, metadata.commit_digest
        );

        Ok(Self {
            config,
            operator_secret,
            phase: RoundPhase::Committed,
            transcript: RoundTranscript::new(metadata),
        })
    }

    /// Round identifier.
    pub fn id(&self) -> Uuid {
        self.transcript.metadata.round_id
    }

    /// Current phase.
    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    /// Published commitment.
    pub fn commitment(&self) -> RoundCommitment {
        RoundCommitment {
            commit_digest: self.transcript.metadata.commit_digest.clone(),
            round_nonce: self.transcript.metadata.round_nonce.clone(),
        }
    }

    /// Fix the player input and compute the outcome.
    ///
    /// `None` input gets a generated one. If the engine rejects the column
    /// the round stays `Committed` and may be started again.
    #[instrument(skip(self, player_input), fields(round = %self.id()))]
    pub fn start(
        &mut self,
        player_input: Option<String>,
        column: usize,
    ) -> Result<&RoundResult, RoundError> {
        self.expect_phase(RoundPhase::Committed)?;

        let player_input = player_input.unwrap_or_else(default_player_input);
        let meta = &self.transcript.metadata;
        let combined_seed = combine(&self.operator_secret, &player_input, &meta.round_nonce)?;
        let priced = self.config.compute_outcome(&combined_seed, column)?;

        info!(
            "Round {} started: column {} landed {} (x{})",
            meta.round_id, column, priced.outcome.landing_index, priced.multiplier
        );

        self.phase = RoundPhase::Started;
        Ok(self.transcript.result.insert(RoundResult {
            player_input,
            column,
            combined_seed,
            board_fingerprint: priced.outcome.board_fingerprint,
            landing_index: priced.outcome.landing_index,
            multiplier: priced.multiplier,
            path: priced.outcome.path,
            started_at: Utc::now(),
        }))
    }

    /// Release the operator secret.
    #[instrument(skip(self), fields(round = %self.id()))]
    pub fn reveal(&mut self) -> Result<&RoundTranscript, RoundError> {
        self.expect_phase(RoundPhase::Started)?;

        self.transcript.reveal = Some(RoundReveal {
            operator_secret: self.operator_secret.clone(),
            revealed_at: Utc::now(),
        });
        self.phase = RoundPhase::Revealed;

        info!("Round {} revealed", self.id());
        Ok(&self.transcript)
    }

    /// Transcript as it may be shown publicly right now.
    ///
    /// Holds the secret only once the round is revealed.
    pub fn public_transcript(&self) -> &RoundTranscript {
        &self.transcript
    }

    fn expect_phase(&self, expected: RoundPhase) -> Result<(), RoundError> {
        if self.phase != expected {
            return Err(RoundError::InvalidPhase { expected, actual: self.phase });
        }
        Ok(())
    }
}
