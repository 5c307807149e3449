//! Round Ledger
//!
//! In-memory collection of rounds sharing one game configuration.
//! Guarantees no two rounds share a nonce.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::game::config::GameConfig;
use crate::proof::commitment::{generate_round_nonce, generate_operator_secret, RoundCommitment};
use crate::proof::transcript::{RoundResult, RoundTranscript};
use crate::round::lifecycle::{Round, RoundError};

/// Owns every round created under one configuration.
#[derive(Debug)]
pub struct RoundLedger {
    config: Arc<GameConfig>,
    rounds: BTreeMap<Uuid, Round>,
    /// Creation order.
    order: Vec<Uuid>,
    nonces: BTreeSet<String>,
}

impl RoundLedger {
    /// Create an empty ledger.
    pub fn new(config: GameConfig) -> Self {
        Self {
            config: Arc::new(config),
            rounds: BTreeMap::new(),
            order: Vec::new(),
            nonces: BTreeSet::new(),
        }
    }

    /// Shared game configuration.
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Open a round with a fresh secret and an unused nonce.
    pub fn create_round(&mut self) -> Result<(Uuid, RoundCommitment), RoundError> {
        let mut nonce = generate_round_nonce();
        while self.nonces.contains(&nonce) {
            debug!("Nonce {} already used, drawing another", nonce);
            nonce = generate_round_nonce();
        }
        self.create_round_with(generate_operator_secret(), nonce)
    }

    /// Open a round with a caller-chosen secret and nonce.
    pub fn create_round_with(
        &mut self,
        operator_secret: String,
        round_nonce: String,
    ) -> Result<(Uuid, RoundCommitment), RoundError> {
        if self.nonces.contains(&round_nonce) {
            return Err(RoundError::DuplicateNonce(round_nonce));
        }

        let round = Round::commit_with(Arc::clone(&self.config), operator_secret, round_nonce.clone())?;
        let id = round.id();
        let commitment = round.commitment();

        self.nonces.insert(round_nonce);
        self.order.push(id);
        self.rounds.insert(id, round);

        Ok((id, commitment))
    }

    /// Start a committed round.
    pub fn start_round(
        &mut self,
        id: Uuid,
        player_input: Option<String>,
        column: usize,
    ) -> Result<RoundResult, RoundError> {
        let round = self.get_mut(id)?;
        Ok(round.start(player_input, column)?.clone())
    }

    /// Reveal a started round's secret.
    pub fn reveal_round(&mut self, id: Uuid) -> Result<RoundTranscript, RoundError> {
        let round = self.get_mut(id)?;
        Ok(round.reveal()?.clone())
    }

    /// Look up a round.
    pub fn get(&self, id: Uuid) -> Option<&Round> {
        self.rounds.get(&id)
    }

    /// Public transcripts in creation order.
    pub fn transcripts(&self) -> impl Iterator<Item = &RoundTranscript> {
        self.order
            .iter()
            .filter_map(|id| self.rounds.get(id))
            .map(Round::public_transcript)
    }

    /// Number of rounds.
    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    /// True if no rounds have been created.
    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    fn get_mut(&mut self, id: Uuid) -> Result<&mut Round, RoundError> {
        self.rounds.get_mut(&id).ok_or(RoundError::RoundNotFound(id))
    }
}
