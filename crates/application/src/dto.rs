//! Response DTOs
//!
//! Shapes returned to the boundary layer. Display names are resolved
//! through the platform directories; when a directory does not know a
//! reference the raw id stands in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use staffhub_domain::{AssignmentId, ProjectId, WorkerId};

/// One assignment record as callers see it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentRecord {
    pub id: AssignmentId,
    pub project_id: ProjectId,
    pub project_name: String,
    pub worker_id: WorkerId,
    pub worker_name: String,
    pub role: String,
    pub workload_percentage: u32,
    pub assigned_date: DateTime<Utc>,
}

/// Availability-aware worker search result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerSummary {
    pub worker_id: WorkerId,
    pub name: String,
    pub email: String,
    pub job_title: String,
    pub department: String,
    pub skills: Vec<String>,
    pub current_workload: u32,
    pub available_capacity: u32,
    /// Distinct names of active projects the worker is assigned to
    pub active_projects: Vec<String>,
    pub assignments: Vec<AssignmentRecord>,
}

/// Per-project slice of a worker's committed capacity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectWorkload {
    pub project_id: ProjectId,
    pub project_name: String,
    /// Summed percentage across every role the worker holds there
    pub workload_percentage: u32,
    /// Distinct role labels joined for display
    pub roles: String,
    pub active: bool,
}

/// Workload report for a single worker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerWorkloadBreakdown {
    pub worker_id: WorkerId,
    pub worker_name: String,
    pub total_workload: u32,
    /// Portion of the total committed to currently active projects
    pub active_workload: u32,
    pub available_capacity: u32,
    pub projects: Vec<ProjectWorkload>,
}
