use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("State index {index} out of range for layout with {states} states")]
    StateOutOfRange { index: usize, states: usize },
    #[error("Expected {expected} digits, got {found}")]
    DigitCountMismatch { expected: usize, found: usize },
    #[error("Digit {digit} at or above its base {base}")]
    DigitOutOfRange { digit: u32, base: u32 },
    #[error("Layout base at position {position} must be positive")]
    InvalidBase { position: usize },
    #[error("Table row {row} has {found} actions, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("Table has {table} states but layout describes {layout}")]
    StateCountMismatch { table: usize, layout: usize },
    #[error("Internal error: {0}")]
    Internal(&'static str),
}

pub type Result<T> = std::result::Result<T, CoreError>;
