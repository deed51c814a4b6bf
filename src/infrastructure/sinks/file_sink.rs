//! Local pending queue: one JSON document per observation plus a summary index

use async_trait::async_trait;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

use super::{ObservationSink, SaveReceipt};
use crate::domain::{Observation, ObservationDocument};
use crate::shared::errors::AppError;

const PENDING_DIR: &str = "pending";
const SUMMARY_FILE: &str = "sync_summary.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    Pending,
}

/// Observation document as stored in the pending directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingRecord {
    #[serde(flatten)]
    pub observation: ObservationDocument,
    pub saved_at: String,
    pub filename: String,
    pub sync_status: SyncStatus,
}

/// Overwritten index of the pending directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncSummary {
    pub last_update: String,
    pub pending_records: usize,
    pub latest_files: Vec<String>,
}

pub struct FileSink {
    data_dir: PathBuf,
    summary_limit: usize,
}

impl FileSink {
    pub fn new(data_dir: impl Into<PathBuf>, summary_limit: usize) -> Self {
        Self {
            data_dir: data_dir.into(),
            summary_limit,
        }
    }

    pub fn pending_dir(&self) -> PathBuf {
        self.data_dir.join(PENDING_DIR)
    }

    pub fn summary_path(&self) -> PathBuf {
        self.data_dir.join(SUMMARY_FILE)
    }

    /// Write the pending document named after `saved_at`.
    ///
    /// Two saves within the same second map to the same file; the later one wins.
    pub fn write_pending(&self, observation: &Observation, saved_at: DateTime<Local>) -> Result<PathBuf, AppError> {
        let pending_dir = self.pending_dir();
        fs::create_dir_all(&pending_dir)?;

        let name = format!("gold_prices_{}.json", saved_at.format("%Y%m%d_%H%M%S"));
        let path = pending_dir.join(&name);

        let record = PendingRecord {
            observation: observation.to_document(),
            saved_at: saved_at.to_rfc3339(),
            filename: path.display().to_string(),
            sync_status: SyncStatus::Pending,
        };

        let json = serde_json::to_string_pretty(&record)?;
        fs::write(&path, json)?;

        info!("✅ Data saved to {}", path.display());
        Ok(path)
    }

    /// Recount the pending directory and overwrite the summary document
    pub fn rebuild_summary(&self) -> Result<SyncSummary, AppError> {
        let mut names = list_json_files(&self.pending_dir())?;
        names.sort_unstable_by(|a, b| b.cmp(a));

        let summary = SyncSummary {
            last_update: Local::now().to_rfc3339(),
            pending_records: names.len(),
            latest_files: names.into_iter().take(self.summary_limit).collect(),
        };

        let json = serde_json::to_string_pretty(&summary)?;
        fs::write(self.summary_path(), json)?;

        info!("📊 Summary updated: {} pending records", summary.pending_records);
        Ok(summary)
    }
}

fn list_json_files(dir: &Path) -> Result<Vec<String>, AppError> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.ends_with(".json") {
            names.push(name);
        }
    }
    Ok(names)
}

#[async_trait]
impl ObservationSink for FileSink {
    async fn save(&self, observation: &Observation) -> Result<SaveReceipt, AppError> {
        let path = self.write_pending(observation, Local::now())?;

        // The observation is already on disk; a stale summary is not a failed save
        if let Err(e) = self.rebuild_summary() {
            error!("❌ Error updating summary: {}", e);
        }

        Ok(SaveReceipt::File { path })
    }

    fn backend_type(&self) -> &'static str {
        "JSON files"
    }
}
