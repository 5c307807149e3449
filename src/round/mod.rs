//! Round lifecycle.
//!
//! The operator-side controller around the pure engine: opens rounds with a
//! published commitment, starts them once the player input is fixed, and
//! reveals the secret afterwards.

pub mod lifecycle;
pub mod ledger;

pub use lifecycle::{Round, RoundError, RoundPhase};
pub use ledger::RoundLedger;
