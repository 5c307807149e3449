//! Game Logic Module
//!
//! Board, path and payout. 100% deterministic.
//!
//! ## Module Structure
//!
//! - `board`: Peg board generation and fingerprinting
//! - `path`: Row-by-row ball simulation
//! - `payout`: Landing index to multiplier table
//! - `outcome`: Seed to outcome bundle
//! - `config`: Board size and payout configuration

pub mod board;
pub mod path;
pub mod payout;
pub mod outcome;
pub mod config;

// Re-export key types
pub use board::{Board, Peg, generate_board};
pub use path::{Direction, Path, PathStep, simulate_path};
pub use payout::PayoutTable;
pub use outcome::{Outcome, compute_outcome};
pub use config::{GameConfig, PricedOutcome};
