#![warn(clippy::unwrap_used, clippy::expect_used)]

//! Policy summarization and export assembly.
//!
//! This crate turns finished training artifacts into the JSON records the
//! dashboard serves verbatim. It follows the principle: **qview packages
//! what training wrote, it never relearns or rescales values**.

pub mod comparison;

use qview_core::{CoreError, PolicyEntry, QTable, Result, StateLayout, TAXI_BASES};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Episode window for the trailing reward average.
pub const REWARD_WINDOW: usize = 100;

#[cfg(feature = "telemetry")]
fn warn_non_finite(state: usize) {
    tracing::warn!(state, "action-value row contains non-finite values");
}

#[cfg(not(feature = "telemetry"))]
fn warn_non_finite(state: usize) {
    eprintln!("Warning: action-value row for state {state} contains non-finite values");
}

/// Greedy-policy summary of an action-value table, one entry per state in
/// ascending state order.
///
/// The layout must carry the four Taxi-v3 digit roles (row, column,
/// passenger, destination) and describe exactly the table's state count.
/// A table with zero states or zero actions yields an empty policy; no
/// actions learned is a valid result, not an error.
///
/// `best_action` is the first maximum of the row (ties break to the
/// lowest action index; a non-finite value never wins a comparison) and
/// `value` is the stored float at that action, never recomputed.
pub fn summarize_policy(table: &QTable, layout: &StateLayout) -> Result<Vec<PolicyEntry>> {
    if table.states() == 0 || table.actions() == 0 {
        return Ok(Vec::new());
    }
    if layout.digits() != TAXI_BASES.len() {
        return Err(CoreError::DigitCountMismatch {
            expected: TAXI_BASES.len(),
            found: layout.digits(),
        });
    }
    if table.states() != layout.states() {
        return Err(CoreError::StateCountMismatch {
            table: table.states(),
            layout: layout.states(),
        });
    }

    let mut policy = Vec::with_capacity(table.states());
    for (state, values) in table.rows().enumerate() {
        if values.iter().any(|v| !v.is_finite()) {
            warn_non_finite(state);
        }
        let [row, col, passenger, dest]: [u32; 4] = layout
            .decode(state)?
            .try_into()
            .map_err(|_| CoreError::Internal("digit count checked against layout"))?;
        let (best_action, value) = first_maximum(values);
        policy.push(PolicyEntry {
            state,
            row,
            col,
            passenger,
            dest,
            best_action,
            value,
        });
    }
    Ok(policy)
}

fn first_maximum(values: &[f64]) -> (usize, f64) {
    let mut best_action = 0;
    let mut best = values[0];
    for (action, &value) in values.iter().enumerate().skip(1) {
        // NaN loses every comparison, so it can only be reported from an
        // all-NaN row (as action 0 with its stored value).
        if value > best || (best.is_nan() && !value.is_nan()) {
            best = value;
            best_action = action;
        }
    }
    (best_action, best)
}

/// Arithmetic mean of the last `min(window, len)` rewards.
///
/// Returns `None` for an empty history: the average is unavailable, not
/// zero, and must serialize as `null` rather than a made-up number.
#[must_use]
pub fn average_last(rewards: &[f64], window: usize) -> Option<f64> {
    if rewards.is_empty() || window == 0 {
        return None;
    }
    let tail = &rewards[rewards.len().saturating_sub(window)..];
    #[allow(clippy::cast_precision_loss)]
    let count = tail.len() as f64;
    Some(tail.iter().sum::<f64>() / count)
}

/// Run metadata of one export record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetadata {
    /// Environment name, e.g. "Taxi-v3".
    pub env: String,
    /// State count of the action-value table.
    pub states: usize,
    /// Action count of the action-value table.
    pub actions: usize,
    /// Trailing reward average; `null` when the history is empty.
    pub avg_reward_last_100: Option<f64>,
}

/// The one artifact this toolchain produces per run: metadata, the full
/// greedy policy, the raw reward history, and the trajectory steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRecord {
    pub metadata: RunMetadata,
    pub policy: Vec<PolicyEntry>,
    pub rewards: Vec<f64>,
    /// Opaque step records, passed through unmodified and in order.
    pub trajectory: Vec<Value>,
}

impl ExportRecord {
    /// Assemble one export record from finished training artifacts.
    ///
    /// The whole transform either succeeds and yields exactly one record
    /// or fails with the first error; there is no partial output.
    pub fn assemble(
        env: &str,
        table: &QTable,
        layout: &StateLayout,
        rewards: Vec<f64>,
        trajectory: Vec<Value>,
    ) -> Result<Self> {
        let policy = summarize_policy(table, layout)?;
        let metadata = RunMetadata {
            env: env.to_string(),
            states: table.states(),
            actions: table.actions(),
            avg_reward_last_100: average_last(&rewards, REWARD_WINDOW),
        };
        Ok(Self {
            metadata,
            policy,
            rewards,
            trajectory,
        })
    }

    /// Pretty JSON with struct-ordered fields. Identical inputs always
    /// produce byte-identical output, so downstream diffing works.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
