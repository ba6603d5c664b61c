//! Project Directory Port
//!
//! Read-only lookup into the platform's project registry, used to resolve
//! display names and active/completed status in responses.

use async_trait::async_trait;
use staffhub_domain::{ProjectId, ProjectSummary};

#[async_trait]
pub trait ProjectDirectory: Send + Sync {
    async fn get_project(
        &self,
        id: &ProjectId,
    ) -> Result<Option<ProjectSummary>, ProjectDirectoryError>;
}

/// Project directory error
#[derive(thiserror::Error, Debug)]
pub enum ProjectDirectoryError {
    #[error("Directory lookup failed: {0}")]
    Lookup(String),
}
