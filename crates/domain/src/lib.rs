//! Domain Core - Staffing Business Logic and Shared Types
//!
//! This crate contains the staffing domain entities, value objects,
//! and the pure admission logic (workload ledger + assignment validator).
//! It performs no I/O; everything here operates over data the application
//! layer has already fetched through its ports.

pub mod staffing;

// Shared kernel (cross-cutting concerns)
pub mod shared_kernel {
    pub mod error;
    pub mod types;
}

pub use crate::shared_kernel::error::{BulkEntryFailure, DomainError, DomainResult};
pub use crate::shared_kernel::types::{
    AssignmentId, ProjectId, ProjectStatus, WorkerId, WorkerStatus, WorkloadPercentage,
};

pub use crate::staffing::entities::{Assignment, ProjectSummary, WorkerProfile};
pub use crate::staffing::services::{AssignmentValidator, WorkloadLedger, FULL_CAPACITY};
pub use crate::staffing::value_objects::{AssignmentDraft, AssignmentRequest, WorkerFilter};

pub use chrono::{DateTime, Utc};

/// Domain result type
pub type Result<T> = std::result::Result<T, DomainError>;
