//! Path Simulation
//!
//! Drops the ball through a generated board, one draw per row, continuing
//! the draw stream left off by board generation.

use serde::{Serialize, Deserialize};
use tracing::error;
#[cfg(feature = "debug-tracing")]
use tracing::trace;

use crate::core::rng::DeterministicRng;
use crate::error::{EngineError, EngineResult};
use crate::game::board::Board;

/// Bias shift per column of distance from the center column.
pub const COLUMN_BIAS_STEP: f64 = 0.01;

/// Slack allowed on recorded floats that went through a text round trip.
const RECORDED_VALUE_TOLERANCE: f64 = 1e-12;

/// Which way the ball went at a peg.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Toward index zero.
    Left,
    /// Toward increasing index.
    Right,
}

/// One row's decision.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathStep {
    /// Row index.
    pub row: usize,
    /// Peg consulted in this row (`min(position, row)`).
    pub peg_index: usize,
    /// Raw left bias of that peg.
    pub left_bias: f64,
    /// Left bias after the column adjustment, clamped to [0, 1].
    pub adjusted_bias: f64,
    /// Draw consumed for the decision.
    pub draw: f64,
    /// Resulting direction.
    pub direction: Direction,
}

/// Full path, one step per row.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path {
    steps: Vec<PathStep>,
}

impl Path {
    /// Steps in row order.
    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    /// Number of steps (always equals the row count).
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// True for a zero-row board.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Count of rightward decisions, which is the landing index.
    pub fn right_count(&self) -> usize {
        self.steps.iter().filter(|s| s.direction == Direction::Right).count()
    }

    /// Compare a recorded path with a recomputed one.
    ///
    /// Positions and directions must be identical; biases and draws may
    /// differ only by float parsing noise.
    pub fn matches(&self, other: &Path) -> bool {
        self.first_mismatch(other).is_none()
    }

    /// First row where two paths disagree, if any.
    ///
    /// A shorter path disagrees at the row where it ends.
    pub fn first_mismatch(&self, other: &Path) -> Option<usize> {
        let close = |a: f64, b: f64| (a - b).abs() <= RECORDED_VALUE_TOLERANCE;

        let diverged = self.steps.iter().zip(&other.steps).position(|(a, b)| {
            a.row != b.row
                || a.peg_index != b.peg_index
                || a.direction != b.direction
                || !close(a.left_bias, b.left_bias)
                || !close(a.adjusted_bias, b.adjusted_bias)
                || !close(a.draw, b.draw)
        });

        match diverged {
            Some(row) => Some(row),
            None if self.steps.len() != other.steps.len() => {
                Some(self.steps.len().min(other.steps.len()))
            }
            None => None,
        }
    }
}

/// Bias adjustment for a column choice.
///
/// Columns right of center lower the left bias, pulling the ball right.
#[inline]
pub fn column_adjustment(column: usize, center_column: usize) -> f64 {
    (column as f64 - center_column as f64) * COLUMN_BIAS_STEP
}

/// Simulate the ball's path.
///
/// # Arguments
///
/// * `board` - Board generated from the same `rng`
/// * `column` - Player's column choice
/// * `rng` - The round's RNG, already advanced past board generation
/// * `row_count` - Rows to simulate
/// * `center_column` - Column with zero adjustment
///
/// Returns the path and the landing index in `[0, row_count]`.
pub fn simulate_path(
    board: &Board,
    column: usize,
    rng: &mut DeterministicRng,
    row_count: usize,
    center_column: usize,
) -> EngineResult<(Path, usize)> {
    if board.row_count() < row_count {
        error!(
            "Board has {} rows but {} were requested",
            board.row_count(),
            row_count
        );
        return Err(EngineError::OutOfRange {
            what: "board row",
            index: row_count - 1,
            max: board.row_count().saturating_sub(1),
        });
    }

    let adjustment = column_adjustment(column, center_column);
    let mut position = 0usize;
    let mut steps = Vec::with_capacity(row_count);

    for row in 0..row_count {
        let peg_index = position.min(row);
        let left_bias = board.peg(row, peg_index)?.left_bias;
        let adjusted_bias = (left_bias + adjustment).clamp(0.0, 1.0);
        let draw = rng.next_f64();

        let direction = if draw < adjusted_bias {
            Direction::Left
        } else {
            position += 1;
            Direction::Right
        };

        #[cfg(feature = "debug-tracing")]
        trace!(row, peg_index, adjusted_bias, draw, ?direction, "peg decision");

        steps.push(PathStep {
            row,
            peg_index,
            left_bias,
            adjusted_bias,
            draw,
            direction,
        });
    }

    Ok((Path { steps }, position))
}

// =============================================================================
// TESTS
// =============================================================================
