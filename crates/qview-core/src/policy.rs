//! Per-state policy records.

use serde::{Deserialize, Serialize};

/// Greedy-policy summary of one state.
///
/// Field names match the JSON the dashboard viewers read, so a record
/// serializes 1:1 into one `policy` array element of an export file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyEntry {
    /// Flat state index.
    pub state: usize,
    /// Taxi row.
    pub row: u32,
    /// Taxi column.
    pub col: u32,
    /// Passenger location; 4 means on the taxi.
    pub passenger: u32,
    /// Destination pad.
    pub dest: u32,
    /// Index of the first maximal action value in this state's row.
    pub best_action: usize,
    /// The stored action value at `best_action`, never recomputed.
    pub value: f64,
}
