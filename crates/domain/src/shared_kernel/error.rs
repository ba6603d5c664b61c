//! Domain Error Types
//!
//! Centralized error handling for the staffing core. All four
//! business-rule failures are terminal, caller-visible outcomes; anything
//! unexpected from a collaborator surfaces as `Infrastructure` unchanged.

use serde::{Deserialize, Serialize};

use crate::shared_kernel::types::{ProjectId, WorkerId};

/// Result type for domain operations
pub type DomainResult<T> = std::result::Result<T, DomainError>;

/// One failing entry of a rejected bulk batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkEntryFailure {
    pub worker_id: WorkerId,
    pub reason: String,
}

impl std::fmt::Display for BulkEntryFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.worker_id, self.reason)
    }
}

/// Main domain error enum
#[derive(thiserror::Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error(
        "Capacity exceeded for worker {worker_id}: current load {current}%, \
         requested {requested}%, resulting total {resulting}% is over 100%"
    )]
    CapacityExceeded {
        worker_id: WorkerId,
        current: u32,
        requested: u32,
        resulting: u32,
    },

    #[error("Worker {worker_id} is already assigned to project {project_id} as {role}")]
    DuplicateAssignment {
        project_id: ProjectId,
        worker_id: WorkerId,
        role: String,
    },

    #[error("Bulk assignment rejected: [{}]", .failures.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
    BulkRejected { failures: Vec<BulkEntryFailure> },

    #[error("Infrastructure error: {0}")]
    Infrastructure(String),
}
