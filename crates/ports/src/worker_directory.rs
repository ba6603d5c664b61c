//! Worker Directory Port
//!
//! Read-only lookup into the platform's worker registry: profiles for
//! display and filtering, plus the declared-skills lookup used by
//! availability search. The core never writes through this port.

use async_trait::async_trait;
use staffhub_domain::{WorkerId, WorkerProfile};

#[async_trait]
pub trait WorkerDirectory: Send + Sync {
    async fn get_worker(
        &self,
        id: &WorkerId,
    ) -> Result<Option<WorkerProfile>, WorkerDirectoryError>;

    async fn list_workers(&self) -> Result<Vec<WorkerProfile>, WorkerDirectoryError>;

    /// Declared skill names for a worker; empty for unknown workers
    async fn get_skills(&self, id: &WorkerId) -> Result<Vec<String>, WorkerDirectoryError>;
}

/// Worker directory error
#[derive(thiserror::Error, Debug)]
pub enum WorkerDirectoryError {
    #[error("Directory lookup failed: {0}")]
    Lookup(String),
}
