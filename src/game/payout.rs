//! Payout Table
//!
//! Fixed landing-index to multiplier mapping. Configuration, not computed.

use serde::{Serialize, Deserialize};
use tracing::error;

use crate::error::{EngineError, EngineResult};

/// Multipliers for the default 12-row board (13 buckets).
///
/// Theoretical return under fair decisions is roughly 0.99.
pub const DEFAULT_MULTIPLIERS: [f64; 13] = [
    10.0, 3.0, 1.6, 1.4, 1.1, 1.0, 0.5, 1.0, 1.1, 1.4, 1.6, 3.0, 10.0,
];

/// Landing index to multiplier lookup.
///
/// Deserialization goes through [`PayoutTable::new`], so a table read from
/// JSON is always validated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPayoutTable")]
pub struct PayoutTable {
    multipliers: Vec<f64>,
}

/// Unchecked wire shape of a payout table.
#[derive(Deserialize)]
struct RawPayoutTable {
    multipliers: Vec<f64>,
}

impl TryFrom<RawPayoutTable> for PayoutTable {
    type Error = EngineError;

    fn try_from(raw: RawPayoutTable) -> EngineResult<Self> {
        Self::new(raw.multipliers)
    }
}

impl Default for PayoutTable {
    fn default() -> Self {
        Self { multipliers: DEFAULT_MULTIPLIERS.to_vec() }
    }
}

impl PayoutTable {
    /// Build a table, checking it is usable and symmetric.
    pub fn new(multipliers: Vec<f64>) -> EngineResult<Self> {
        let table = Self { multipliers };
        table.validate()?;
        Ok(table)
    }

    /// Number of buckets (`rows + 1`).
    pub fn len(&self) -> usize {
        self.multipliers.len()
    }

    /// True if the table has no buckets.
    pub fn is_empty(&self) -> bool {
        self.multipliers.is_empty()
    }

    /// All multipliers in bucket order.
    pub fn multipliers(&self) -> &[f64] {
        &self.multipliers
    }

    /// Multiplier for a landing index.
    pub fn multiplier_for(&self, landing_index: usize) -> EngineResult<f64> {
        self.multipliers.get(landing_index).copied().ok_or_else(|| {
            error!(
                "Landing index {} outside payout table of {} buckets",
                landing_index,
                self.multipliers.len()
            );
            EngineError::OutOfRange {
                what: "payout",
                index: landing_index,
                max: self.multipliers.len().saturating_sub(1),
            }
        })
    }

    /// Check the table is non-empty, finite, non-negative and symmetric.
    pub fn validate(&self) -> EngineResult<()> {
        if self.multipliers.is_empty() {
            return Err(EngineError::invalid("payout table is empty"));
        }

        if let Some((i, m)) = self
            .multipliers
            .iter()
            .enumerate()
            .find(|(_, m)| !m.is_finite() || **m < 0.0)
        {
            return Err(EngineError::invalid(format!(
                "payout multiplier {} at index {} must be finite and non-negative",
                m, i
            )));
        }

        let last = self.multipliers.len() - 1;
        for i in 0..=last / 2 {
            if self.multipliers[i] != self.multipliers[last - i] {
                return Err(EngineError::invalid(format!(
                    "payout table not symmetric: index {} = {}, index {} = {}",
                    i,
                    self.multipliers[i],
                    last - i,
                    self.multipliers[last - i]
                )));
            }
        }

        Ok(())
    }

    /// Expected multiplier if every peg were a fair coin.
    ///
    /// Landing index follows Binomial(n, 0.5) with `n = len - 1`.
    pub fn theoretical_return(&self) -> f64 {
        let n = self.multipliers.len().saturating_sub(1);
        let total = 2f64.powi(n as i32);

        let mut coefficient = 1.0f64;
        let mut expected = 0.0;
        for (k, m) in self.multipliers.iter().enumerate() {
            expected += coefficient / total * m;
            // C(n, k+1) = C(n, k) * (n - k) / (k + 1)
            coefficient = coefficient * (n - k) as f64 / (k + 1) as f64;
        }
        expected
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_symmetric() {
        let table = PayoutTable::default();
        let rows = table.len() - 1;
        assert_eq!(rows, 12);

        for i in 0..=rows {
            assert_eq!(
                table.multiplier_for(i).unwrap(),
                table.multiplier_for(rows - i).unwrap()
            );
        }
        assert!(table.validate().is_ok());
    }

    #[test]
    fn test_lookup() {
        let table = PayoutTable::default();
        assert_eq!(table.multiplier_for(0).unwrap(), 10.0);
        assert_eq!(table.multiplier_for(6).unwrap(), 0.5);
        assert_eq!(table.multiplier_for(12).unwrap(), 10.0);
    }

    #[test]
    fn test_out_of_range() {
        let table = PayoutTable::default();
        assert_eq!(
            table.multiplier_for(13),
            Err(EngineError::OutOfRange { what: "payout", index: 13, max: 12 })
        );
    }

    #[test]
    fn test_rejects_asymmetric() {
        assert!(PayoutTable::new(vec![2.0, 1.0, 3.0]).is_err());
        assert!(PayoutTable::new(vec![2.0, 1.0, 2.0]).is_ok());
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(PayoutTable::new(vec![]).is_err());
        assert!(PayoutTable::new(vec![-1.0, -1.0]).is_err());
        assert!(PayoutTable::new(vec![f64::NAN, f64::NAN]).is_err());
    }

    #[test]
    fn test_theoretical_return() {
        // (2 * 1796.1 + 0.5 * 924) / 4096
        let rtp = PayoutTable::default().theoretical_return();
        assert!((rtp - 4054.2 / 4096.0).abs() < 1e-9, "rtp = {}", rtp);

        // Flat table returns exactly its multiplier.
        let flat = PayoutTable::new(vec![1.0; 9]).unwrap();
        assert!((flat.theoretical_return() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_json_roundtrip_shape() {
        let json = r#"{ "multipliers": [5.0, 0.5, 5.0] }"#;
        let table: PayoutTable = serde_json::from_str(json).unwrap();
        assert_eq!(table.len(), 3);
        assert!(table.validate().is_ok());
    }

    #[test]
    fn test_deserialize_rejects_invalid_tables() {
        let asymmetric = serde_json::from_str::<PayoutTable>(r#"{ "multipliers": [2.0, 1.0, 3.0] }"#);
        assert!(asymmetric.unwrap_err().to_string().contains("not symmetric"));

        assert!(serde_json::from_str::<PayoutTable>(r#"{ "multipliers": [] }"#).is_err());
        assert!(serde_json::from_str::<PayoutTable>(r#"{ "multipliers": [-1.0, -1.0] }"#).is_err());
    }
}
