pub mod file_sink;
pub mod remote_sink;

use async_trait::async_trait;
use std::path::PathBuf;

use crate::domain::Observation;
use crate::shared::errors::AppError;

pub use file_sink::{FileSink, PendingRecord, SyncSummary};
pub use remote_sink::{RecentRecord, RemoteSink};

/// What a sink reports back after persisting an observation
#[derive(Debug, Clone, PartialEq)]
pub enum SaveReceipt {
    /// Pending document written to disk
    File { path: PathBuf },
    /// Row inserted remotely; fields come from the returned representation
    Remote {
        id: Option<serde_json::Value>,
        created_at: Option<String>,
    },
}

/// Persistence backend for observations
#[async_trait]
pub trait ObservationSink: Send + Sync {
    /// Persist one observation
    async fn save(&self, observation: &Observation) -> Result<SaveReceipt, AppError>;

    /// Backend type for logging
    fn backend_type(&self) -> &'static str;
}
