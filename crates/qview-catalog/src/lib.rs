//! Episode catalogs derived from trajectory file names.
//!
//! Training scripts drop one JSON trajectory per recorded episode and
//! encode the episode metadata in the file name. This crate recognizes
//! the naming schemes in use and turns a run directory into one ordered
//! index record the dashboard can list episodes from:
//!
//! - `apples_<n>_ep_<k>.json` for snake runs (`<n>` apples eaten)
//! - `trajectory_ep_<k>.json` for bipedal walker runs
//! - `traj_<algorithm>_<k>.json` for cliff walking runs

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

/// Fallback timestamp when formatting fails
const FALLBACK_TIMESTAMP: &str = "1970-01-01T00:00:00Z";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read trajectory directory: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CatalogError>;

/// One recorded episode, as named by its trajectory file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeEntry {
    /// Trajectory file name, relative to the run directory.
    pub file: String,
    pub episode: u32,
    /// Apples eaten; present only for snake runs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apples: Option<u32>,
    /// Training algorithm; present only for cliff walking runs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<String>,
}

impl EpisodeEntry {
    /// Parse one trajectory file name; `None` for anything a training
    /// script would not have written.
    #[must_use]
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let stem = file_name.strip_suffix(".json")?;

        if let Some(rest) = stem.strip_prefix("apples_") {
            let (apples, episode) = rest.split_once("_ep_")?;
            return Some(Self {
                file: file_name.to_string(),
                episode: episode.parse().ok()?,
                apples: Some(apples.parse().ok()?),
                algorithm: None,
            });
        }

        if let Some(episode) = stem.strip_prefix("trajectory_ep_") {
            return Some(Self {
                file: file_name.to_string(),
                episode: episode.parse().ok()?,
                apples: None,
                algorithm: None,
            });
        }

        if let Some(rest) = stem.strip_prefix("traj_") {
            // The algorithm name may itself contain underscores
            // (traj_sarsa_lambda_200.json), so the episode is the part
            // after the last one.
            let (algorithm, episode) = rest.rsplit_once('_')?;
            if algorithm.is_empty() {
                return None;
            }
            return Some(Self {
                file: file_name.to_string(),
                episode: episode.parse().ok()?,
                apples: None,
                algorithm: Some(algorithm.to_string()),
            });
        }

        None
    }
}

/// Ordered episode index of one run directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub run: String,
    /// RFC3339 generation time; the catalog is an operational index, not
    /// a diffable export artifact.
    pub generated_at: String,
    pub episodes: Vec<EpisodeEntry>,
}

impl Catalog {
    /// Scan a run directory for trajectory files.
    ///
    /// A missing directory yields an empty catalog: a run without
    /// recorded episodes lists as empty, it does not fail. Files with
    /// unrecognized names are skipped.
    pub fn scan_dir(dir: &Path, run: &str) -> Result<Self> {
        let mut episodes = Vec::new();
        if dir.is_dir() {
            for entry in fs::read_dir(dir)? {
                let entry = entry?;
                let name = entry.file_name();
                let Some(name) = name.to_str() else {
                    continue;
                };
                if let Some(episode) = EpisodeEntry::from_file_name(name) {
                    episodes.push(episode);
                }
            }
        }
        episodes.sort_by(|a, b| (a.episode, &a.file).cmp(&(b.episode, &b.file)));

        Ok(Self {
            run: run.to_string(),
            generated_at: iso8601_now(),
            episodes,
        })
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn iso8601_now() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| FALLBACK_TIMESTAMP.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snake_file_names_carry_apples_and_episode() {
        let entry = EpisodeEntry::from_file_name("apples_005_ep_01.json")
            .expect("snake naming is recognized");
        assert_eq!(entry.episode, 1);
        assert_eq!(entry.apples, Some(5));
        assert_eq!(entry.algorithm, None);
    }

    #[test]
    fn walker_file_names_carry_the_episode() {
        let entry = EpisodeEntry::from_file_name("trajectory_ep_0004.json")
            .expect("walker naming is recognized");
        assert_eq!(entry.episode, 4);
        assert_eq!(entry.apples, None);
        assert_eq!(entry.algorithm, None);
    }

    #[test]
    fn cliff_file_names_keep_underscored_algorithm_names() {
        let entry = EpisodeEntry::from_file_name("traj_sarsa_lambda_200.json")
            .expect("cliff naming is recognized");
        assert_eq!(entry.episode, 200);
        assert_eq!(entry.algorithm.as_deref(), Some("sarsa_lambda"));
    }

    #[test]
    fn foreign_files_are_skipped() {
        assert!(EpisodeEntry::from_file_name("README.md").is_none());
        assert!(EpisodeEntry::from_file_name("rewards_qlearning.csv").is_none());
        assert!(EpisodeEntry::from_file_name("apples_five_ep_01.json").is_none());
        assert!(EpisodeEntry::from_file_name("traj_.json").is_none());
        assert!(EpisodeEntry::from_file_name("trajectory_ep_.json").is_none());
    }

    #[test]
    fn scan_orders_episodes_and_skips_foreign_files() {
        let dir = std::env::temp_dir().join(format!("qview_catalog_test_{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).expect("temp dir is writable");
        for name in [
            "trajectory_ep_0010.json",
            "trajectory_ep_0002.json",
            "notes.txt",
            "trajectory_ep_0007.json",
        ] {
            fs::write(dir.join(name), b"[]").expect("temp file is writable");
        }

        let catalog = Catalog::scan_dir(&dir, "run_active").expect("directory scans");
        let _ = fs::remove_dir_all(&dir);

        assert_eq!(catalog.run, "run_active");
        let episodes: Vec<u32> = catalog.episodes.iter().map(|e| e.episode).collect();
        assert_eq!(episodes, vec![2, 7, 10]);
    }

    #[test]
    fn missing_directory_yields_an_empty_catalog() {
        let dir = std::env::temp_dir().join("qview_catalog_test_missing_dir");
        let _ = fs::remove_dir_all(&dir);

        let catalog = Catalog::scan_dir(&dir, "run_active").expect("missing dir is not an error");
        assert!(catalog.episodes.is_empty());
    }

    #[test]
    fn catalog_serializes_without_absent_optionals() {
        let entry = EpisodeEntry::from_file_name("trajectory_ep_0004.json")
            .expect("walker naming is recognized");
        let json = serde_json::to_string(&entry).expect("entry serializes");
        assert!(!json.contains("apples"));
        assert!(!json.contains("algorithm"));
    }
}
