use crate::models::{Action, ActionStatus, RunResult, RunSummary};
use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Local};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Collector for the actions of one run, written out as a
/// timestamp-named JSON log file.
pub struct ActionLogger {
    source: PathBuf,
    destination: PathBuf,
    options: serde_json::Value,
    actions: Vec<Action>,
    summary: RunSummary,
    timestamp: DateTime<Local>,
}

impl ActionLogger {
    pub fn new(source: PathBuf, destination: PathBuf, options: serde_json::Value) -> Self {
        Self {
            source,
            destination,
            options,
            actions: Vec::new(),
            summary: RunSummary::default(),
            timestamp: Local::now(),
        }
    }

    /// Record one file's action and update the summary counters.
    pub fn log_action(&mut self, action: Action) {
        self.summary.processed += 1;
        match action.status {
            ActionStatus::Success => {
                self.summary.moved += 1;
                if action.rename.is_some() {
                    self.summary.renamed += 1;
                }
                if action.detection.category.contains("Unsorted") {
                    self.summary.unsorted += 1;
                }
            }
            ActionStatus::Error => self.summary.errors += 1,
            ActionStatus::Skipped => self.summary.skipped += 1,
            ActionStatus::Pending => {}
        }
        self.actions.push(action);
    }

    /// Count a duplicate routed to the holding area.
    pub fn log_duplicate(&mut self) {
        self.summary.duplicates += 1;
    }

    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }

    pub fn run_result(&self) -> RunResult {
        RunResult {
            timestamp: self.timestamp,
            source: self.source.clone(),
            destination: self.destination.clone(),
            options: self.options.clone(),
            actions: self.actions.iter().map(Action::to_log_entry).collect(),
            summary: self.summary.clone(),
        }
    }

    /// Write the run log to `log_dir/YYYY-MM-DD_HHMMSS.json`.
    pub fn save_to(&self, log_dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(log_dir)
            .with_context(|| format!("Failed to create log dir: {}", log_dir.display()))?;

        let filename = self.timestamp.format("%Y-%m-%d_%H%M%S.json").to_string();
        let log_path = log_dir.join(filename);

        let json = serde_json::to_string_pretty(&self.run_result())?;
        std::fs::write(&log_path, json)
            .with_context(|| format!("Failed to write log: {}", log_path.display()))?;

        Ok(log_path)
    }

    /// Write the run log to the default per-user log directory.
    pub fn save(&self) -> Result<PathBuf> {
        self.save_to(&crate::config::log_dir())
    }
}

/// The parts of a stored run log the status commands need.
#[derive(Debug, Clone, Deserialize)]
pub struct StoredRun {
    pub timestamp: DateTime<Local>,
    pub source: PathBuf,
    pub destination: PathBuf,
    #[serde(default)]
    pub summary: RunSummary,
}

/// Load a run log back from disk.
pub fn load_log(path: &Path) -> Result<StoredRun> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read log: {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Invalid log file: {}", path.display()))
}

/// List log files, newest first.
pub fn list_logs(log_dir: &Path, limit: Option<usize>) -> Vec<PathBuf> {
    let mut logs: Vec<PathBuf> = match std::fs::read_dir(log_dir) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("json"))
            .collect(),
        Err(_) => return Vec::new(),
    };

    logs.sort_by(|a, b| b.file_name().cmp(&a.file_name()));
    if let Some(limit) = limit {
        logs.truncate(limit);
    }
    logs
}

/// Aggregated counters across the logs of the last `days` days.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateStats {
    pub total_runs: u32,
    pub total_processed: u32,
    pub total_moved: u32,
    pub total_renamed: u32,
    pub total_errors: u32,
    pub total_duplicates: u32,
}

/// Sum up summaries from recent logs; invalid log files are skipped.
pub fn aggregate_logs(log_dir: &Path, days: i64) -> AggregateStats {
    let mut stats = AggregateStats::default();

    let cutoff = (Local::now() - Duration::days(days))
        .format("%Y-%m-%d")
        .to_string();

    for log_path in list_logs(log_dir, None) {
        // Filenames start with the run date: YYYY-MM-DD_HHMMSS.json
        let name = log_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        if name.len() < 10 || name[..10] < cutoff[..] {
            continue;
        }

        let run = match load_log(&log_path) {
            Ok(run) => run,
            Err(_) => continue,
        };

        stats.total_runs += 1;
        stats.total_processed += run.summary.processed;
        stats.total_moved += run.summary.moved;
        stats.total_renamed += run.summary.renamed;
        stats.total_errors += run.summary.errors;
        stats.total_duplicates += run.summary.duplicates;
    }

    stats
}
