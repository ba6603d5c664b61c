//! Assignment Aggregate Root
//!
//! The Assignment entity is the aggregate root of the staffing context:
//! a commitment of part of a worker's capacity to one project under one
//! role. Worker and project data are read-only views owned by the wider
//! platform.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared_kernel::error::{DomainError, DomainResult};
use crate::shared_kernel::types::{
    AssignmentId, ProjectId, ProjectStatus, WorkerId, WorkerStatus, WorkloadPercentage,
};

/// Upper bound on the free-text role label
pub const MAX_ROLE_LEN: usize = 100;

pub(crate) fn validate_role(role: &str) -> DomainResult<()> {
    if role.trim().is_empty() {
        return Err(DomainError::Validation("role must not be empty".to_string()));
    }
    if role.len() > MAX_ROLE_LEN {
        return Err(DomainError::Validation(format!(
            "role must be at most {} characters, got {}",
            MAX_ROLE_LEN,
            role.len()
        )));
    }
    Ok(())
}

/// Assignment aggregate root
///
/// `project_id`, `worker_id` and `assigned_date` are immutable for the
/// lifetime of the record; only role and workload may change, through
/// [`Assignment::reassign`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: AssignmentId,
    pub project_id: ProjectId,
    pub worker_id: WorkerId,
    pub role: String,
    pub workload: WorkloadPercentage,
    pub assigned_date: DateTime<Utc>,
}

impl Assignment {
    /// True iff this record carries exactly the given uniqueness triple
    pub fn matches_triple(&self, project_id: &ProjectId, worker_id: &WorkerId, role: &str) -> bool {
        self.project_id == *project_id && self.worker_id == *worker_id && self.role == role
    }

    /// Update role and workload in place. Identity fields stay untouched.
    pub fn reassign(&mut self, role: String, workload: WorkloadPercentage) -> DomainResult<()> {
        validate_role(&role)?;
        self.role = role;
        self.workload = workload;
        Ok(())
    }
}

/// Read-only worker view resolved through the platform directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerProfile {
    pub id: WorkerId,
    pub name: String,
    pub email: String,
    pub job_title: String,
    pub department: String,
    pub status: WorkerStatus,
    pub skills: Vec<String>,
}

impl WorkerProfile {
    /// Case-insensitive substring match against name, email, job title or id
    pub fn matches_search(&self, term: &str) -> bool {
        let needle = term.to_lowercase();
        self.name.to_lowercase().contains(&needle)
            || self.email.to_lowercase().contains(&needle)
            || self.job_title.to_lowercase().contains(&needle)
            || self.id.as_str().to_lowercase().contains(&needle)
    }

    /// AND semantics: the worker must hold every listed skill
    pub fn has_all_skills(&self, required: &[String]) -> bool {
        required.iter().all(|skill| self.skills.contains(skill))
    }
}

/// Read-only project view resolved through the platform directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub id: ProjectId,
    pub name: String,
    pub status: ProjectStatus,
}
