//! Mixed-radix state layouts for discretized environments.
//!
//! Tabular gym environments pack several semantic digits into one flat
//! state index. A [`StateLayout`] holds the digit bases (most-significant
//! first) and converts between the flat index and the digit vector.
//! [`TaxiState`] is the Taxi-v3 view over the standard `[5, 5, 5, 4]`
//! layout.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Digit bases of the Taxi-v3 state space: taxi row, taxi column,
/// passenger location (4 = on taxi), destination.
pub const TAXI_BASES: [u32; 4] = [5, 5, 5, 4];

/// A fixed sequence of digit bases, most-significant digit first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateLayout {
    bases: Vec<u32>,
}

impl StateLayout {
    /// Build a layout from its digit bases.
    ///
    /// Every base must be positive; a zero base would describe an empty
    /// state space and make every index undecodable.
    pub fn new(bases: Vec<u32>) -> Result<Self> {
        if bases.is_empty() {
            return Err(CoreError::Internal("layout needs at least one base"));
        }
        if let Some(position) = bases.iter().position(|&b| b == 0) {
            return Err(CoreError::InvalidBase { position });
        }
        Ok(Self { bases })
    }

    /// The standard Taxi-v3 layout (500 states).
    #[must_use]
    pub fn taxi() -> Self {
        Self {
            bases: TAXI_BASES.to_vec(),
        }
    }

    /// Number of digits in this layout.
    #[must_use]
    pub fn digits(&self) -> usize {
        self.bases.len()
    }

    /// Total number of states, i.e. the product of the bases.
    #[must_use]
    pub fn states(&self) -> usize {
        self.bases.iter().map(|&b| b as usize).product()
    }

    /// Decode a flat state index into its digits, most-significant first.
    ///
    /// Indices at or above [`states`](Self::states) are rejected rather
    /// than silently wrapped.
    pub fn decode(&self, index: usize) -> Result<Vec<u32>> {
        let states = self.states();
        if index >= states {
            return Err(CoreError::StateOutOfRange { index, states });
        }

        // Divmod from the least-significant base upward, then flip into
        // most-significant-first order.
        let mut rest = index;
        let mut digits = Vec::with_capacity(self.bases.len());
        for &base in self.bases.iter().rev() {
            digits.push((rest % base as usize) as u32);
            rest /= base as usize;
        }
        digits.reverse();
        Ok(digits)
    }

    /// Recompose a flat index from digits in most-significant-first order.
    pub fn encode(&self, digits: &[u32]) -> Result<usize> {
        if digits.len() != self.bases.len() {
            return Err(CoreError::DigitCountMismatch {
                expected: self.bases.len(),
                found: digits.len(),
            });
        }
        let mut index = 0usize;
        for (&digit, &base) in digits.iter().zip(&self.bases) {
            if digit >= base {
                return Err(CoreError::DigitOutOfRange { digit, base });
            }
            index = index * base as usize + digit as usize;
        }
        Ok(index)
    }
}

/// Semantic view of one Taxi-v3 state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxiState {
    pub row: u32,
    pub col: u32,
    /// Passenger location; 0..=3 are the pickup pads, 4 means on the taxi.
    pub passenger: u32,
    pub dest: u32,
}

impl TaxiState {
    /// Decode a flat Taxi-v3 state index.
    pub fn from_index(index: usize) -> Result<Self> {
        let digits = StateLayout::taxi().decode(index)?;
        let [row, col, passenger, dest]: [u32; 4] = digits
            .try_into()
            .map_err(|_| CoreError::Internal("taxi layout yields four digits"))?;
        Ok(Self {
            row,
            col,
            passenger,
            dest,
        })
    }

    /// The flat index this state packs into.
    pub fn to_index(self) -> Result<usize> {
        StateLayout::taxi().encode(&[self.row, self.col, self.passenger, self.dest])
    }
}
