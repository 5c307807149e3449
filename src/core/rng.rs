//! Deterministic Random Number Generator
//!
//! Uses the 32-bit xorshift (13, 17, 5) construction. Given the same combined
//! seed it produces an identical draw stream on every platform.

use crate::core::hash::is_hex_digest;
use crate::error::{EngineError, EngineResult};

/// Number of leading hex characters of the combined seed read into the state.
pub const SEED_HEX_CHARS: usize = 8;

/// Scale from a 32-bit state to a draw in [0, 1).
const DRAW_SCALE: f64 = 4_294_967_296.0; // 2^32

/// Deterministic PRNG using xorshift32.
///
/// # Determinism Guarantee
///
/// One generator drives one round: board generation consumes a prefix of
/// the stream and path simulation continues from where it stopped. The type
/// is deliberately not `Clone`, so a round cannot fork its stream by accident.
///
/// # Example
///
/// ```
/// use plinko_fair::core::rng::DeterministicRng;
///
/// let mut rng = DeterministicRng::new(1);
/// assert_eq!(rng.next_u32(), 270369); // Always the same!
/// ```
#[derive(Debug, PartialEq, Eq)]
pub struct DeterministicRng {
    state: u32,
}

impl DeterministicRng {
    /// Create a new RNG from a 32-bit seed.
    ///
    /// Xorshift is stuck at zero forever, so a zero seed becomes 1.
    pub fn new(seed: u32) -> Self {
        Self { state: if seed == 0 { 1 } else { seed } }
    }

    /// Create RNG from a hex combined seed.
    ///
    /// Reads the first 8 hex characters as a big-endian u32.
    pub fn from_combined_seed(combined_seed: &str) -> EngineResult<Self> {
        Ok(Self::new(seed_state_from_hex(combined_seed)?))
    }

    /// Advance the state and return it.
    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        let mut s = self.state;
        s ^= s << 13;
        s ^= s >> 17;
        s ^= s << 5;
        self.state = s;
        s
    }

    /// Generate the next draw in [0, 1).
    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        self.next_u32() as f64 / DRAW_SCALE
    }

    /// Generate `count` draws in stream order.
    pub fn next_n(&mut self, count: usize) -> Vec<f64> {
        (0..count).map(|_| self.next_f64()).collect()
    }

    /// Get current state (for checkpointing/debugging).
    pub fn state(&self) -> u32 {
        self.state
    }
}

/// Parse the generator seed out of a hex combined seed.
///
/// The combined seed must be a 64-char hex digest; only its first 8 chars
/// are used.
pub fn seed_state_from_hex(combined_seed: &str) -> EngineResult<u32> {
    if !is_hex_digest(combined_seed) {
        return Err(EngineError::invalid(format!(
            "combined seed must be 64 hex characters, got {:?}",
            combined_seed
        )));
    }

    let mut bytes = [0u8; SEED_HEX_CHARS / 2];
    hex::decode_to_slice(&combined_seed[..SEED_HEX_CHARS], &mut bytes)
        .map_err(|e| EngineError::invalid(format!("combined seed prefix: {}", e)))?;

    Ok(u32::from_be_bytes(bytes))
}

// =============================================================================
// TESTS
// =============================================================================
