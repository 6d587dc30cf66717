//! Cross-algorithm comparison summaries.
//!
//! Several training runs of the same environment (Q-learning, SARSA,
//! Expected SARSA, ...) are aggregated into one record the comparison
//! charts read: per-algorithm trailing reward mean, optional training
//! time, and the trajectory snapshots available for replay.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{average_last, REWARD_WINDOW};

/// One finished training run of a comparison set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub algorithm: String,
    pub rewards: Vec<f64>,
    /// Wall-clock training seconds, when the training script recorded it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed_sec: Option<f64>,
    /// Episode numbers with a saved trajectory snapshot.
    #[serde(default)]
    pub snapshots: Vec<u32>,
}

/// Aggregated comparison record across runs.
///
/// `mean_last100` and `elapsed_sec` are positionally aligned with
/// `algorithms`, which is sorted by name so reruns over the same inputs
/// serialize identically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonSummary {
    pub algorithms: Vec<String>,
    /// Trailing reward mean per algorithm; `null` for an empty history.
    pub mean_last100: Vec<Option<f64>>,
    /// Present only when every run carries a training time; a partial
    /// column would misalign the charts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed_sec: Option<Vec<f64>>,
    pub available_snapshots: BTreeMap<String, Vec<u32>>,
}

impl ComparisonSummary {
    /// Aggregate finished runs into one comparison record.
    #[must_use]
    pub fn from_runs(mut runs: Vec<RunSummary>) -> Self {
        runs.sort_by(|a, b| a.algorithm.cmp(&b.algorithm));

        let elapsed_sec: Option<Vec<f64>> = runs.iter().map(|r| r.elapsed_sec).collect();

        let mut available_snapshots = BTreeMap::new();
        for run in &runs {
            let mut episodes = run.snapshots.clone();
            episodes.sort_unstable();
            episodes.dedup();
            available_snapshots.insert(run.algorithm.clone(), episodes);
        }

        Self {
            algorithms: runs.iter().map(|r| r.algorithm.clone()).collect(),
            mean_last100: runs
                .iter()
                .map(|r| average_last(&r.rewards, REWARD_WINDOW))
                .collect(),
            elapsed_sec,
            available_snapshots,
        }
    }

    /// Pretty JSON with struct-ordered fields and a sorted snapshot map;
    /// identical inputs serialize byte-identically.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Canonical algorithm name for keys the training scripts wrote
/// inconsistently ("expected" is the Expected SARSA run).
#[must_use]
pub fn canonical_algorithm(name: &str) -> &str {
    match name {
        "expected" => "expected_sarsa",
        other => other,
    }
}
