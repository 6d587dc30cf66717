//! Action-value table storage.

use crate::error::{CoreError, Result};

/// Immutable action-value table, `states x actions`, row-major.
///
/// Produced once from a training artifact and read by the exporters;
/// values are stored exactly as loaded, without rounding or sanitizing.
#[derive(Debug, Clone, PartialEq)]
pub struct QTable {
    values: Vec<f64>,
    states: usize,
    actions: usize,
}

impl QTable {
    /// Build a table from per-state rows.
    ///
    /// The input must be rectangular: every row carries one value per
    /// action. Ragged input is rejected with the offending row index.
    /// Zero rows, or rows of width zero, are valid: an empty table means
    /// nothing was learned, which is meaningful to downstream consumers.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let states = rows.len();
        let actions = rows.first().map_or(0, Vec::len);
        let mut values = Vec::with_capacity(states * actions);
        for (row_idx, row) in rows.into_iter().enumerate() {
            if row.len() != actions {
                return Err(CoreError::RaggedRow {
                    row: row_idx,
                    expected: actions,
                    found: row.len(),
                });
            }
            values.extend_from_slice(&row);
        }
        Ok(Self {
            values,
            states,
            actions,
        })
    }

    #[must_use]
    pub fn states(&self) -> usize {
        self.states
    }

    #[must_use]
    pub fn actions(&self) -> usize {
        self.actions
    }

    /// Action values of one state, or `None` when the index is out of
    /// range or the table has no actions.
    #[must_use]
    pub fn row(&self, state: usize) -> Option<&[f64]> {
        if self.actions == 0 || state >= self.states {
            return None;
        }
        self.values.get(state * self.actions..(state + 1) * self.actions)
    }

    /// Iterate the per-state rows in ascending state order.
    ///
    /// Yields nothing when the table has zero states or zero actions.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.values.chunks(self.actions.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rows_preserves_shape_and_values() {
        let table = QTable::from_rows(vec![vec![0.1, 0.2], vec![0.3, 0.4], vec![0.5, 0.6]])
            .expect("rectangular input");
        assert_eq!(table.states(), 3);
        assert_eq!(table.actions(), 2);
        assert_eq!(table.row(1), Some(&[0.3, 0.4][..]));
        assert_eq!(table.rows().count(), 3);
    }

    #[test]
    fn ragged_rows_are_rejected_with_the_offending_row() {
        let err = QTable::from_rows(vec![vec![0.0; 6], vec![0.0; 6], vec![0.0; 5]])
            .expect_err("row 2 is short");
        assert!(matches!(
            err,
            CoreError::RaggedRow {
                row: 2,
                expected: 6,
                found: 5
            }
        ));
    }

    #[test]
    fn empty_tables_are_valid() {
        let no_states = QTable::from_rows(vec![]).expect("zero states is valid");
        assert_eq!(no_states.states(), 0);
        assert_eq!(no_states.actions(), 0);
        assert_eq!(no_states.rows().count(), 0);

        let no_actions = QTable::from_rows(vec![vec![], vec![]]).expect("zero actions is valid");
        assert_eq!(no_actions.states(), 2);
        assert_eq!(no_actions.actions(), 0);
        assert_eq!(no_actions.row(0), None);
        assert_eq!(no_actions.rows().count(), 0);
    }

    #[test]
    fn row_is_none_out_of_range() {
        let table = QTable::from_rows(vec![vec![1.0]]).expect("rectangular input");
        assert!(table.row(1).is_none());
    }
}
