//! Game Configuration
//!
//! Board size, center column and payout table. Loaded once at process start
//! and shared by reference afterwards.

use std::path::Path as FsPath;

use anyhow::Context;
use serde::{Serialize, Deserialize};
use tracing::info;

use crate::error::{EngineError, EngineResult};
use crate::game::outcome::{compute_outcome, Outcome};
use crate::game::payout::PayoutTable;
use crate::{DEFAULT_CENTER_COLUMN, DEFAULT_ROWS};

/// Configuration for outcome computation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Number of peg rows.
    pub rows: usize,
    /// Column with no bias adjustment.
    pub center_column: usize,
    /// Landing index to multiplier table (`rows + 1` entries).
    pub payout: PayoutTable,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            center_column: DEFAULT_CENTER_COLUMN,
            payout: PayoutTable::default(),
        }
    }
}

/// A computed outcome together with its payout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PricedOutcome {
    /// Board, fingerprint, path and landing index.
    #[serde(flatten)]
    pub outcome: Outcome,
    /// Multiplier for the landing index.
    pub multiplier: f64,
}

impl GameConfig {
    /// Create config from environment variables.
    ///
    /// - `PLINKO_ROWS`
    /// - `PLINKO_CENTER_COLUMN`
    /// - `PLINKO_PAYOUT_TABLE` (path to `{ "multipliers": [...] }`)
    ///
    /// Unset variables keep their defaults.
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Ok(rows) = std::env::var("PLINKO_ROWS") {
            config.rows = rows
                .parse()
                .with_context(|| format!("PLINKO_ROWS is not a row count: {:?}", rows))?;
            // Keep the default centered unless told otherwise.
            config.center_column = config.rows / 2;
        }

        if let Ok(center) = std::env::var("PLINKO_CENTER_COLUMN") {
            config.center_column = center
                .parse()
                .with_context(|| format!("PLINKO_CENTER_COLUMN is not a column: {:?}", center))?;
        }

        if let Ok(path) = std::env::var("PLINKO_PAYOUT_TABLE") {
            config.payout = load_payout_table(FsPath::new(&path))?;
        }

        config.validate()?;
        info!(
            "Game config: {} rows, center {}, theoretical return {:.4}",
            config.rows,
            config.center_column,
            config.payout.theoretical_return()
        );

        Ok(config)
    }

    /// Check rows, center column and payout table agree.
    pub fn validate(&self) -> EngineResult<()> {
        if self.rows == 0 {
            return Err(EngineError::invalid("board needs at least one row"));
        }
        if self.center_column > self.rows {
            return Err(EngineError::invalid(format!(
                "center column {} outside [0, {}]",
                self.center_column, self.rows
            )));
        }
        if self.payout.len() != self.rows + 1 {
            return Err(EngineError::invalid(format!(
                "payout table has {} buckets, {} rows need {}",
                self.payout.len(),
                self.rows,
                self.rows + 1
            )));
        }
        self.payout.validate()
    }

    /// Compute an outcome with this board size and attach its multiplier.
    pub fn compute_outcome(&self, combined_seed: &str, column: usize) -> EngineResult<PricedOutcome> {
        let outcome = compute_outcome(combined_seed, column, self.rows, self.center_column)?;
        let multiplier = self.payout.multiplier_for(outcome.landing_index)?;
        Ok(PricedOutcome { outcome, multiplier })
    }
}

/// Read a payout table from a JSON file.
pub fn load_payout_table(path: &FsPath) -> anyhow::Result<PayoutTable> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading payout table {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("parsing payout table {}", path.display()))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const VECTOR_SEED: &str = "e1dddf77de27d395ea2be2ed49aa2a59bd6bf12ee8d350c16c008abd406c07e0";

    #[test]
    fn test_default_config_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.rows, 12);
        assert_eq!(config.center_column, 6);
    }

    #[test]
    fn test_validate_mismatched_table() {
        let config = GameConfig { rows: 8, center_column: 4, ..GameConfig::default() };
        assert!(config.validate().is_err());

        let config = GameConfig {
            rows: 2,
            center_column: 1,
            payout: PayoutTable::new(vec![3.0, 0.5, 3.0]).unwrap(),
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_center_and_rows() {
        let config = GameConfig { center_column: 13, ..GameConfig::default() };
        assert!(config.validate().is_err());

        let config = GameConfig {
            rows: 0,
            center_column: 0,
            payout: PayoutTable::new(vec![1.0]).unwrap(),
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_priced_outcome() {
        let config = GameConfig::default();
        let priced = config.compute_outcome(VECTOR_SEED, 6).unwrap();
        assert_eq!(priced.outcome.landing_index, 6);
        assert_eq!(priced.multiplier, 0.5);
    }

    #[test]
    fn test_load_payout_table() {
        let path = std::env::temp_dir().join(format!("plinko-payout-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, r#"{ "multipliers": [4.0, 1.0, 0.2, 1.0, 4.0] }"#).unwrap();

        let table = load_payout_table(&path).unwrap();
        assert_eq!(table.len(), 5);
        std::fs::remove_file(&path).unwrap();

        assert!(load_payout_table(&path).is_err());
    }

    #[test]
    fn test_load_rejects_asymmetric_table() {
        let path = std::env::temp_dir().join(format!("plinko-payout-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, r#"{ "multipliers": [4.0, 1.0, 2.0] }"#).unwrap();

        assert!(load_payout_table(&path).is_err());
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_deserialized_config_has_checked_table() {
        let json = r#"{ "rows": 2, "center_column": 1, "payout": { "multipliers": [9.0, 0.1, 1.0] } }"#;
        assert!(serde_json::from_str::<GameConfig>(json).is_err());

        let json = r#"{ "rows": 2, "center_column": 1, "payout": { "multipliers": [3.0, 0.5, 3.0] } }"#;
        let config: GameConfig = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_ok());
    }
}
