//! Core deterministic primitives.
//!
//! Hashing and the draw stream. Everything downstream is a pure function of
//! what these two produce, so their output must never change.

pub mod hash;
pub mod rng;

// Re-export core types
pub use hash::{hash_fields, hash_hex, is_hex_digest, CanonicalHasher, DigestBytes};
pub use rng::DeterministicRng;
