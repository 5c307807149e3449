//! # Plinko Fair
//!
//! Provably fair outcome engine for a Plinko-style board.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       PLINKO FAIR                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── hash.rs     - SHA-256, lowercase hex digests            │
//! │  └── rng.rs      - Deterministic xorshift32 PRNG             │
//! │                                                              │
//! │  game/           - Outcome logic (deterministic)             │
//! │  ├── board.rs    - Peg board generation + fingerprint        │
//! │  ├── path.rs     - Row-by-row ball simulation                │
//! │  ├── payout.rs   - Landing index to multiplier               │
//! │  ├── outcome.rs  - Seed to outcome bundle                    │
//! │  └── config.rs   - Board size and payout configuration       │
//! │                                                              │
//! │  proof/          - Provable fairness                         │
//! │  ├── commitment.rs - Commit-reveal, seed derivation          │
//! │  ├── transcript.rs - Persistable round record                │
//! │  └── verify.rs   - Replay verification                       │
//! │                                                              │
//! │  round/          - Operator-side round lifecycle             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! The `core/`, `game/` and `proof/` modules are **100% deterministic**:
//! - All randomness from one xorshift32 stream per round
//! - Board biases rounded to 6 decimals before hashing
//! - No system time, no global state
//!
//! Given the operator secret, player input, round nonce and column, anyone
//! can recompute the commitment, combined seed, board fingerprint and
//! landing index without the operator's help.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod error;
pub mod game;
pub mod proof;
pub mod round;

// Re-export commonly used types
pub use core::rng::DeterministicRng;
pub use error::{EngineError, EngineResult};
pub use game::{compute_outcome, Board, GameConfig, Outcome, Path, PayoutTable};
pub use proof::{combine, commit, replay, verify_commit};
pub use round::{Round, RoundLedger};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default number of peg rows.
pub const DEFAULT_ROWS: usize = 12;

/// Default column with no bias adjustment.
pub const DEFAULT_CENTER_COLUMN: usize = DEFAULT_ROWS / 2;
