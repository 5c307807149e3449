//! Outcome Computation
//!
//! Seed in, board + path + landing index out. One generator is created here
//! and threaded through both phases by mutable borrow, so the path always
//! continues the board's draw stream.

use serde::{Serialize, Deserialize};
use tracing::debug;

use crate::core::rng::DeterministicRng;
use crate::error::{EngineError, EngineResult};
use crate::game::board::{generate_board, Board};
use crate::game::path::{simulate_path, Path};

/// Everything derived from a combined seed and a column choice.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    /// Generated board.
    pub board: Board,
    /// SHA-256 of the board's canonical form.
    pub board_fingerprint: String,
    /// Per-row decisions.
    pub path: Path,
    /// Final bucket, in `[0, rows]`.
    pub landing_index: usize,
}

/// Compute a round outcome.
///
/// Pure: no wall clock, no global state. The same inputs always give the
/// same bundle.
///
/// # Errors
///
/// `InvalidInput` if `column > row_count`, `center_column > row_count`, or
/// the combined seed is not a 64-char hex digest.
pub fn compute_outcome(
    combined_seed: &str,
    column: usize,
    row_count: usize,
    center_column: usize,
) -> EngineResult<Outcome> {
    if column > row_count {
        return Err(EngineError::invalid(format!(
            "column {} outside [0, {}]",
            column, row_count
        )));
    }
    if center_column > row_count {
        return Err(EngineError::invalid(format!(
            "center column {} outside [0, {}]",
            center_column, row_count
        )));
    }

    let mut rng = DeterministicRng::from_combined_seed(combined_seed)?;
    let board = generate_board(&mut rng, row_count);
    let board_fingerprint = board.fingerprint();
    let (path, landing_index) = simulate_path(&board, column, &mut rng, row_count, center_column)?;

    debug!(
        "Outcome: column {} -> landing {} (board {})",
        column,
        landing_index,
        &board_fingerprint[..16]
    );

    Ok(Outcome {
        board,
        board_fingerprint,
        path,
        landing_index,
    })
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

    #[test]
    fn test_known_outcome() {
        let outcome = compute_outcome(VECTOR_SEED, 6, 12, 6).unwrap();
        assert_eq!(outcome.landing_index, 6);
        assert_eq!(outcome.board_fingerprint, VECTOR_FINGERPRINT);
        assert_eq!(outcome.path.len(), 12);
        assert_eq!(outcome.board.row_count(), 12);
    }

    #[test]
    fn test_outcome_is_pure() {
        let a = compute_outcome(VECTOR_SEED, 3, 12, 6).unwrap();
        let b = compute_outcome(VECTOR_SEED, 3, 12, 6).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_column_does_not_change_board() {
        let a = compute_outcome(VECTOR_SEED, 0, 12, 6).unwrap();
        let b = compute_outcome(VECTOR_SEED, 12, 12, 6).unwrap();
        assert_eq!(a.board_fingerprint, b.board_fingerprint);
        assert_eq!(a.landing_index, 7);
        assert_eq!(b.landing_index, 5);
    }

    #[test]
    fn test_rejects_column_out_of_range() {
        assert!(matches!(
            compute_outcome(VECTOR_SEED, 13, 12, 6),
            Err(EngineError::InvalidInput(_))
        ));
        assert!(compute_outcome(VECTOR_SEED, 12, 12, 6).is_ok());
        assert!(compute_outcome(VECTOR_SEED, 0, 12, 6).is_ok());
    }

    #[test]
    fn test_rejects_malformed_seed() {
        assert!(matches!(
            compute_outcome("not-a-seed", 6, 12, 6),
            Err(EngineError::InvalidInput(_))
        ));
    }

    proptest! {
        #[test]
        fn prop_column_validation(column in 0usize..40) {
            let result = compute_outcome(VECTOR_SEED, column, 12, 6);
            if column <= 12 {
                let outcome = result.unwrap();
                prop_assert!(outcome.landing_index <= 12);
                prop_assert_eq!(outcome.landing_index, outcome.path.right_count());
            } else {
                prop_assert!(matches!(result, Err(EngineError::InvalidInput(_))), "column {} accepted", column);
            }
        }

        #[test]
        fn prop_any_seed_bounded(seed in "[0-9a-f]{64}", rows in 1usize..16) {
            let outcome = compute_outcome(&seed, rows / 2, rows, rows / 2).unwrap();
            prop_assert!(outcome.landing_index <= rows);
            prop_assert_eq!(outcome.path.len(), rows);
        }
    }
}
