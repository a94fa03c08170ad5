use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Snapshot of a file discovered in the source directory.
///
/// Created once per file and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FileInfo {
    /// Full path to the file
    pub path: PathBuf,
    /// Filename without path
    pub name: String,
    /// File extension without the dot, lowercase ("" when absent)
    pub extension: String,
    /// File size in bytes
    pub size: u64,
    /// Last modification time
    pub modified: DateTime<Local>,
    /// Creation time (falls back to modification time when unavailable)
    pub created: DateTime<Local>,
}

impl FileInfo {
    /// Build a FileInfo by stat-ing the given path.
    pub fn from_path(path: &Path) -> Result<Self> {
        let metadata = std::fs::metadata(path)
            .with_context(|| format!("Failed to stat file: {}", path.display()))?;

        let modified: DateTime<Local> = metadata
            .modified()
            .map(DateTime::from)
            .unwrap_or_else(|_| Local::now());
        let created: DateTime<Local> = metadata
            .created()
            .map(DateTime::from)
            .unwrap_or(modified);

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("")
            .to_string();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        Ok(Self {
            path: path.to_path_buf(),
            name,
            extension,
            size: metadata.len(),
            modified,
            created,
        })
    }

    /// Filename without its extension.
    pub fn stem(&self) -> &str {
        self.path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.name)
    }
}

/// Outcome of running the detector registry against one file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DetectionResult {
    /// Detected category name (e.g. "Documents"), not yet a folder name
    pub category: String,
    /// Confidence score in [0.0, 1.0]; 0.0 means no detector matched
    pub confidence: f32,
    /// Name of the detector that produced this result
    pub detector_name: String,
    /// Optional human-readable explanation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl DetectionResult {
    pub fn is_confident(&self, threshold: f32) -> bool {
        self.confidence >= threshold
    }
}

/// Outcome of a renamer proposing a better filename.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RenameResult {
    pub original_name: String,
    pub new_name: String,
    /// Name of the renamer that generated this name
    pub renamer_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_extracted: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_extracted: Option<String>,
}

/// Status of a single file action.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ActionStatus {
    Pending,
    Success,
    Error,
    Skipped,
}

/// One file's full outcome in a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Action {
    pub file: FileInfo,
    pub detection: DetectionResult,
    pub source_path: PathBuf,
    pub dest_path: PathBuf,
    pub status: ActionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rename: Option<RenameResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Action {
    /// Flattened JSON record for the run log.
    pub fn to_log_entry(&self) -> serde_json::Value {
        let mut entry = serde_json::json!({
            "file": self.file.name,
            "from": self.source_path,
            "to": self.dest_path,
            "category": self.detection.category,
            "confidence": self.detection.confidence,
            "status": self.status,
        });
        let map = entry.as_object_mut().expect("json object");
        if let Some(rename) = &self.rename {
            map.insert("renamed_from".into(), rename.original_name.clone().into());
            map.insert("renamed_to".into(), rename.new_name.clone().into());
        }
        if let Some(reason) = &self.detection.reason {
            map.insert("reason".into(), reason.clone().into());
        }
        if let Some(error) = &self.error {
            map.insert("error".into(), error.clone().into());
        }
        entry
    }
}

/// Summary counters for a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunSummary {
    pub processed: u32,
    pub moved: u32,
    pub renamed: u32,
    pub unsorted: u32,
    pub skipped: u32,
    pub errors: u32,
    pub duplicates: u32,
}

/// Complete result of one run, as written to the JSON log.
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub timestamp: DateTime<Local>,
    pub source: PathBuf,
    pub destination: PathBuf,
    pub options: serde_json::Value,
    pub actions: Vec<serde_json::Value>,
    pub summary: RunSummary,
}
