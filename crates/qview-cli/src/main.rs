//! CLI for qview.
//!
//! Provides commands for exporting finished training runs as viewer records,
//! aggregating runs into comparison summaries, and indexing trajectory
//! directories. All path resolution lives here; the library crates are pure
//! functions over explicit inputs.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use qview_catalog::{Catalog, EpisodeEntry};
use qview_core::{QTable, StateLayout};
use qview_export::comparison::{canonical_algorithm, ComparisonSummary, RunSummary};
use qview_export::ExportRecord;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export one run's Q-table, rewards and trajectory as a viewer record
    Export {
        /// Action-value table: .json 2-D array or .csv with one row per state
        #[arg(long)]
        qtable: PathBuf,

        /// Reward history: .json array or single-column .csv
        #[arg(long)]
        rewards: Option<PathBuf>,

        /// Trajectory steps (.json array); a missing file degrades to empty
        #[arg(long)]
        trajectory: Option<PathBuf>,

        /// Environment name recorded in the metadata
        #[arg(long, default_value = "Taxi-v3")]
        env: String,

        /// Path of the export record
        #[arg(long, default_value = "data/taxi_v3_results.json")]
        out: PathBuf,
    },
    /// Aggregate rewards_<algorithm> files into a comparison summary
    Compare {
        /// Directory holding rewards_<algorithm>.json|csv files
        #[arg(long)]
        dir: PathBuf,

        /// Directory holding traj_<algorithm>_<episode>.json snapshots
        #[arg(long)]
        traj_dir: Option<PathBuf>,

        /// Path of the comparison summary
        #[arg(long, default_value = "data/comparison_summary.json")]
        out: PathBuf,
    },
    /// Index a run directory's trajectory files
    Catalog {
        /// Trajectory directory of one run
        #[arg(long)]
        dir: PathBuf,

        /// Run name recorded in the catalog
        #[arg(long, default_value = "run_active")]
        run: String,

        /// Path of the catalog record
        #[arg(long, default_value = "data/catalog.json")]
        out: PathBuf,
    },
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|e| e.to_str())
}

/// Numeric rows of a CSV file; a non-numeric first record is treated as a
/// header and skipped.
fn read_csv_rows(path: &Path) -> Result<Vec<Vec<f64>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open CSV {}", path.display()))?;

    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Failed to read CSV record {idx}"))?;
        if idx == 0 && record.iter().any(|field| field.parse::<f64>().is_err()) {
            continue;
        }
        let row = record
            .iter()
            .map(str::parse)
            .collect::<std::result::Result<Vec<f64>, _>>()
            .with_context(|| format!("Non-numeric value in CSV record {idx}"))?;
        rows.push(row);
    }
    Ok(rows)
}

fn load_qtable(path: &Path) -> Result<QTable> {
    let rows: Vec<Vec<f64>> = match extension(path) {
        Some("csv") => read_csv_rows(path)?,
        _ => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open Q-table {}", path.display()))?;
            serde_json::from_reader(file)
                .with_context(|| format!("Q-table {} is not a 2-D float array", path.display()))?
        }
    };
    QTable::from_rows(rows).with_context(|| format!("Malformed Q-table {}", path.display()))
}

/// Reward history of a file that is known to exist.
fn read_rewards_file(path: &Path) -> Result<Vec<f64>> {
    match extension(path) {
        Some("csv") => Ok(read_csv_rows(path)?.into_iter().flatten().collect()),
        _ => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open reward history {}", path.display()))?;
            serde_json::from_reader(file).with_context(|| {
                format!("Reward history {} is not a float array", path.display())
            })
        }
    }
}

fn load_rewards(path: Option<&Path>) -> Result<Vec<f64>> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };
    if !path.exists() {
        eprintln!(
            "Warning: reward history {} not found; exporting an empty history",
            path.display()
        );
        return Ok(Vec::new());
    }
    read_rewards_file(path)
}

fn load_trajectory(path: Option<&Path>) -> Result<Vec<Value>> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };
    if !path.exists() {
        eprintln!(
            "Warning: trajectory {} not found; exporting an empty trajectory",
            path.display()
        );
        return Ok(Vec::new());
    }
    let file =
        File::open(path).with_context(|| format!("Failed to open trajectory {}", path.display()))?;
    serde_json::from_reader(file)
        .with_context(|| format!("Trajectory {} is not a JSON array", path.display()))
}

fn write_output(path: &Path, json: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}

/// `(algorithm, path)` pairs for every rewards_<algorithm> file in `dir`,
/// sorted by algorithm name.
fn scan_reward_files(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read results directory {}", dir.display()))?;

    let mut found = Vec::new();
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        let Some(stem) = name
            .strip_suffix(".json")
            .or_else(|| name.strip_suffix(".csv"))
        else {
            continue;
        };
        let Some(algorithm) = stem.strip_prefix("rewards_") else {
            continue;
        };
        if algorithm.is_empty() {
            continue;
        }
        found.push((canonical_algorithm(algorithm).to_string(), entry.path()));
    }
    found.sort();
    Ok(found)
}

/// Snapshot episodes per algorithm, from traj_<algorithm>_<episode>.json
/// names. A missing directory means no snapshots, not an error.
fn scan_snapshots(dir: &Path) -> Result<BTreeMap<String, Vec<u32>>> {
    let mut snapshots: BTreeMap<String, Vec<u32>> = BTreeMap::new();
    if !dir.is_dir() {
        return Ok(snapshots);
    }
    for entry in fs::read_dir(dir)
        .with_context(|| format!("Failed to read trajectory directory {}", dir.display()))?
    {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if let Some(episode) = EpisodeEntry::from_file_name(name) {
            if let Some(algorithm) = episode.algorithm {
                snapshots
                    .entry(canonical_algorithm(&algorithm).to_string())
                    .or_default()
                    .push(episode.episode);
            }
        }
    }
    Ok(snapshots)
}

fn run_export(
    qtable: &Path,
    rewards: Option<&Path>,
    trajectory: Option<&Path>,
    env: &str,
    out: &Path,
) -> Result<()> {
    let table = load_qtable(qtable)?;
    let rewards = load_rewards(rewards)?;
    let trajectory = load_trajectory(trajectory)?;

    let record = ExportRecord::assemble(env, &table, &StateLayout::taxi(), rewards, trajectory)
        .context("Failed to assemble export record")?;
    let json = record
        .to_json_pretty()
        .context("Failed to serialize export record")?;
    write_output(out, &json)?;

    println!(
        "Exported {} states x {} actions to {}",
        record.metadata.states,
        record.metadata.actions,
        out.display()
    );
    Ok(())
}

fn run_compare(dir: &Path, traj_dir: Option<&Path>, out: &Path) -> Result<()> {
    let reward_files = scan_reward_files(dir)?;
    if reward_files.is_empty() {
        anyhow::bail!(
            "No rewards_<algorithm> files found in {}",
            dir.display()
        );
    }

    let mut snapshots = match traj_dir {
        Some(dir) => scan_snapshots(dir)?,
        None => BTreeMap::new(),
    };

    let mut runs = Vec::new();
    for (algorithm, path) in reward_files {
        let rewards = read_rewards_file(&path)?;
        let snapshots = snapshots.remove(&algorithm).unwrap_or_default();
        runs.push(RunSummary {
            algorithm,
            rewards,
            elapsed_sec: None,
            snapshots,
        });
    }

    let summary = ComparisonSummary::from_runs(runs);
    let json = summary
        .to_json_pretty()
        .context("Failed to serialize comparison summary")?;
    write_output(out, &json)?;

    println!(
        "Compared {} runs to {}",
        summary.algorithms.len(),
        out.display()
    );
    Ok(())
}

fn run_catalog(dir: &Path, run: &str, out: &Path) -> Result<()> {
    let catalog =
        Catalog::scan_dir(dir, run).context("Failed to scan trajectory directory")?;
    let json = catalog
        .to_json_pretty()
        .context("Failed to serialize catalog")?;
    write_output(out, &json)?;

    println!(
        "Cataloged {} episodes of {} to {}",
        catalog.episodes.len(),
        run,
        out.display()
    );
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Export {
            qtable,
            rewards,
            trajectory,
            env,
            out,
        } => run_export(
            &qtable,
            rewards.as_deref(),
            trajectory.as_deref(),
            &env,
            &out,
        ),
        Commands::Compare { dir, traj_dir, out } => {
            run_compare(&dir, traj_dir.as_deref(), &out)
        }
        Commands::Catalog { dir, run, out } => run_catalog(&dir, &run, &out),
    }
}
