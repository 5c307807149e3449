//! Board Generation
//!
//! Builds the triangular peg board from the round's draw stream and
//! produces its public fingerprint.
//!
//! ## Canonical Form
//!
//! ```text
//! 0.422123|0.552503,0.408786|0.491574,0.468780,0.436540|...
//! ```
//!
//! Each bias is written with exactly six fractional digits, pegs in a row
//! are joined by `,` and rows by `|`. The fingerprint is SHA-256 over the
//! UTF-8 bytes of that text. Other parties recompute it, so it never changes.

use std::fmt;

use serde::{Serialize, Deserialize};

use crate::core::hash::CanonicalHasher;
use crate::core::rng::DeterministicRng;
use crate::error::{EngineError, EngineResult};

/// Lowest possible left bias (draw of 0.0).
pub const MIN_LEFT_BIAS: f64 = 0.4;

/// Highest possible left bias (draw approaching 1.0).
pub const MAX_LEFT_BIAS: f64 = 0.6;

/// Width of the bias band around 0.5.
const BIAS_SPREAD: f64 = 0.2;

const PEG_SEPARATOR: char = ',';
const ROW_SEPARATOR: char = '|';

/// A single peg.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Peg {
    /// Probability of deflecting toward index zero, in [0.4, 0.6].
    pub left_bias: f64,
}

/// Triangular board: row `r` holds `r + 1` pegs.
///
/// Immutable once generated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    rows: Vec<Vec<Peg>>,
}

impl Board {
    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// All rows in order.
    pub fn rows(&self) -> &[Vec<Peg>] {
        &self.rows
    }

    /// Look up a peg, failing loudly if the position is off the board.
    pub fn peg(&self, row: usize, index: usize) -> EngineResult<&Peg> {
        let pegs = self.rows.get(row).ok_or(EngineError::OutOfRange {
            what: "board row",
            index: row,
            max: self.rows.len().saturating_sub(1),
        })?;

        pegs.get(index).ok_or(EngineError::OutOfRange {
            what: "peg",
            index,
            max: pegs.len().saturating_sub(1),
        })
    }

    /// Canonical text form (see module docs).
    pub fn canonical_string(&self) -> String {
        self.to_string()
    }

    /// SHA-256 fingerprint of the canonical form, lowercase hex.
    ///
    /// Streams the same writer as [`Board::canonical_string`] into the hasher.
    pub fn fingerprint(&self) -> String {
        let mut hasher = CanonicalHasher::new();
        // CanonicalHasher never reports a write error.
        let _ = self.write_canonical(&mut hasher);
        hasher.finalize_hex()
    }

    /// The only writer of the canonical form.
    fn write_canonical<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        for (r, row) in self.rows.iter().enumerate() {
            if r > 0 {
                out.write_char(ROW_SEPARATOR)?;
            }
            for (p, peg) in row.iter().enumerate() {
                if p > 0 {
                    out.write_char(PEG_SEPARATOR)?;
                }
                write!(out, "{:.6}", peg.left_bias)?;
            }
        }
        Ok(())
    }

    /// Total number of pegs (= draws consumed to build the board).
    pub fn peg_count(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    /// Check the triangular shape and bias bounds.
    ///
    /// Generated boards always pass; this guards boards read back from storage.
    pub fn validate(&self) -> EngineResult<()> {
        for (r, row) in self.rows.iter().enumerate() {
            if row.len() != r + 1 {
                return Err(EngineError::invalid(format!(
                    "row {} has {} pegs, expected {}",
                    r,
                    row.len(),
                    r + 1
                )));
            }
            if let Some(peg) = row
                .iter()
                .find(|p| !(MIN_LEFT_BIAS..=MAX_LEFT_BIAS).contains(&p.left_bias))
            {
                return Err(EngineError::invalid(format!(
                    "row {} bias {} outside [{}, {}]",
                    r, peg.left_bias, MIN_LEFT_BIAS, MAX_LEFT_BIAS
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_canonical(f)
    }
}

/// Generate a board by drawing one value per peg, row-major, left to right.
///
/// The RNG is borrowed, not consumed: the caller keeps drawing from the
/// same stream for the path.
pub fn generate_board(rng: &mut DeterministicRng, row_count: usize) -> Board {
    let rows = (0..row_count)
        .map(|r| {
            (0..=r)
                .map(|_| Peg { left_bias: bias_from_draw(rng.next_f64()) })
                .collect()
        })
        .collect();

    Board { rows }
}

/// Map a uniform draw into the [0.4, 0.6] band.
#[inline]
pub fn bias_from_draw(draw: f64) -> f64 {
    round6(0.5 + (draw - 0.5) * BIAS_SPREAD)
}

/// Round to 6 decimal places, halves away from zero.
#[inline]
pub fn round6(value: f64) -> f64 {
    (value * 1_000_000.0).round() / 1_000_000.0
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const VECTOR_SEED: &str = "e1dddf77de27d395ea2be2ed49aa2a59bd6bf12ee8d350c16c008abd406c07e0";
    const VECTOR_FINGERPRINT: &str =
        "b014a7ce05d67ebac11be82cc13f1c9af6c27093d0eddefb5b54f1474fcaa09d";

    fn vector_board() -> Board {
        let mut rng = DeterministicRng::from_combined_seed(VECTOR_SEED).unwrap();
        generate_board(&mut rng, 12)
    }

    #[test]
    fn test_known_biases() {
        let board = vector_board();
        assert!((board.peg(0, 0).unwrap().left_bias - 0.422123).abs() < 1e-9);
        assert!((board.peg(1, 0).unwrap().left_bias - 0.552503).abs() < 1e-9);
        assert!((board.peg(1, 1).unwrap().left_bias - 0.408786).abs() < 1e-9);
    }

    #[test]
    fn test_known_fingerprint() {
        let board = vector_board();
        assert_eq!(board.fingerprint(), VECTOR_FINGERPRINT);
        assert!(board
            .canonical_string()
            .starts_with("0.422123|0.552503,0.408786|0.491574,0.468780,0.436540|"));
    }

    #[test]
    fn test_streamed_fingerprint_matches_canonical_text() {
        let board = vector_board();
        assert_eq!(board.fingerprint(), crate::core::hash::hash_hex(&board.canonical_string()));
    }

    #[test]
    fn test_board_consumes_one_draw_per_peg() {
        let mut rng = DeterministicRng::from_combined_seed(VECTOR_SEED).unwrap();
        let board = generate_board(&mut rng, 12);
        assert_eq!(board.peg_count(), 78);

        let mut reference = DeterministicRng::from_combined_seed(VECTOR_SEED).unwrap();
        reference.next_n(78);
        assert_eq!(rng.state(), reference.state());
    }

    #[test]
    fn test_changed_bias_changes_fingerprint() {
        let board = vector_board();
        let mut tampered = board.clone();
        tampered.rows[7][3].left_bias = round6(tampered.rows[7][3].left_bias + 0.000001);

        assert_ne!(board.fingerprint(), tampered.fingerprint());
    }

    #[test]
    fn test_changed_shape_changes_fingerprint() {
        let board = vector_board();
        let mut truncated = board.clone();
        truncated.rows.pop();

        assert_ne!(board.fingerprint(), truncated.fingerprint());
    }

    #[test]
    fn test_peg_out_of_range() {
        let board = vector_board();
        assert!(matches!(board.peg(12, 0), Err(EngineError::OutOfRange { .. })));
        assert!(matches!(board.peg(3, 4), Err(EngineError::OutOfRange { .. })));
    }

    #[test]
    fn test_validate_rejects_bad_shape() {
        let mut board = vector_board();
        assert!(board.validate().is_ok());

        board.rows[2].push(Peg { left_bias: 0.5 });
        assert!(board.validate().is_err());
    }

    #[test]
    fn test_bias_band_extremes() {
        assert_eq!(bias_from_draw(0.0), MIN_LEFT_BIAS);
        assert!(bias_from_draw(0.999_999_999_8) <= MAX_LEFT_BIAS);
        assert_eq!(bias_from_draw(0.5), 0.5);
    }

    #[test]
    fn test_round6_half_away_from_zero() {
        assert_eq!(round6(0.1234567), 0.123457);
        assert_eq!(round6(0.0000025), 0.000003);
        assert_eq!(round6(0.4), 0.4);
    }

    #[test]
    fn test_empty_board() {
        let mut rng = DeterministicRng::new(7);
        let board = generate_board(&mut rng, 0);
        assert_eq!(board.row_count(), 0);
        assert_eq!(board.canonical_string(), "");
        assert_eq!(rng.state(), 7);
    }

    proptest! {
        #[test]
        fn prop_board_shape_and_bounds(seed in any::<u32>(), rows in 1usize..24) {
            let mut rng = DeterministicRng::new(seed);
            let board = generate_board(&mut rng, rows);

            prop_assert_eq!(board.row_count(), rows);
            for (r, row) in board.rows().iter().enumerate() {
                prop_assert_eq!(row.len(), r + 1);
                for peg in row {
                    prop_assert!(peg.left_bias >= MIN_LEFT_BIAS && peg.left_bias <= MAX_LEFT_BIAS);
                }
            }
            prop_assert!(board.validate().is_ok());
        }

        #[test]
        fn prop_fingerprint_hashes_canonical_text(seed in any::<u32>(), rows in 0usize..20) {
            let board = generate_board(&mut DeterministicRng::new(seed), rows);
            prop_assert_eq!(
                board.fingerprint(),
                crate::core::hash::hash_hex(&board.canonical_string())
            );
        }

        #[test]
        fn prop_fingerprint_stable(seed in any::<u32>()) {
            let a = generate_board(&mut DeterministicRng::new(seed), 12);
            let b = generate_board(&mut DeterministicRng::new(seed), 12);
            prop_assert_eq!(a.fingerprint(), b.fingerprint());
        }
    }
}
