//! Staffing Value Objects
//!
//! Boundary input types for admission requests and the typed worker
//! search filter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared_kernel::error::DomainResult;
use crate::shared_kernel::types::{
    AssignmentId, ProjectId, WorkerId, WorkerStatus, WorkloadPercentage,
};
use crate::staffing::entities::{validate_role, Assignment, WorkerProfile};
use crate::DomainError;

/// One assignment request as it arrives from the boundary layer.
///
/// The percentage is carried raw so a malformed value is reported as a
/// validation failure instead of being unrepresentable; [`validate`]
/// converts it into the typed form.
///
/// [`validate`]: AssignmentRequest::validate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentRequest {
    pub worker_id: WorkerId,
    pub role: String,
    pub workload_percentage: u32,
}

impl AssignmentRequest {
    pub fn new(worker_id: WorkerId, role: impl Into<String>, workload_percentage: u32) -> Self {
        Self {
            worker_id,
            role: role.into(),
            workload_percentage,
        }
    }

    /// Check the request's own shape; capacity and duplicates are the
    /// validator's business.
    pub fn validate(&self) -> DomainResult<WorkloadPercentage> {
        if self.worker_id.is_empty() {
            return Err(DomainError::Validation(
                "worker id must not be empty".to_string(),
            ));
        }
        validate_role(&self.role)?;
        WorkloadPercentage::new(self.workload_percentage)
    }
}

/// A fully validated assignment awaiting an id from the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentDraft {
    pub project_id: ProjectId,
    pub worker_id: WorkerId,
    pub role: String,
    pub workload: WorkloadPercentage,
    pub assigned_date: DateTime<Utc>,
}

impl AssignmentDraft {
    pub fn new(
        project_id: ProjectId,
        worker_id: WorkerId,
        role: String,
        workload: WorkloadPercentage,
    ) -> DomainResult<Self> {
        if project_id.is_empty() {
            return Err(DomainError::Validation(
                "project id must not be empty".to_string(),
            ));
        }
        if worker_id.is_empty() {
            return Err(DomainError::Validation(
                "worker id must not be empty".to_string(),
            ));
        }
        validate_role(&role)?;

        Ok(Self {
            project_id,
            worker_id,
            role,
            workload,
            assigned_date: Utc::now(),
        })
    }

    /// Materialize the stored record once the catalog has allocated an id
    pub fn into_assignment(self, id: AssignmentId) -> Assignment {
        Assignment {
            id,
            project_id: self.project_id,
            worker_id: self.worker_id,
            role: self.role,
            workload: self.workload,
            assigned_date: self.assigned_date,
        }
    }
}

/// Typed worker search filter. Every field is optional and the populated
/// ones compose with AND semantics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerFilter {
    pub search_term: Option<String>,
    pub required_skills: Vec<String>,
    pub department: Option<String>,
    pub available_only: bool,
    pub min_available_workload: Option<u32>,
}

impl WorkerFilter {
    pub fn with_search_term(mut self, term: impl Into<String>) -> Self {
        self.search_term = Some(term.into());
        self
    }

    pub fn with_required_skills(mut self, skills: Vec<String>) -> Self {
        self.required_skills = skills;
        self
    }

    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    pub fn available_only(mut self) -> Self {
        self.available_only = true;
        self
    }

    pub fn with_min_available_workload(mut self, minimum: u32) -> Self {
        self.min_available_workload = Some(minimum);
        self
    }

    /// Profile-level criteria: search term, department and worker status.
    /// Skill matching runs separately against the skills lookup, and
    /// capacity criteria against the ledger.
    pub fn matches_profile(&self, profile: &WorkerProfile) -> bool {
        if profile.status != WorkerStatus::Active {
            return false;
        }
        if let Some(term) = &self.search_term {
            if !profile.matches_search(term) {
                return false;
            }
        }
        if let Some(department) = &self.department {
            if !profile.department.eq_ignore_ascii_case(department) {
                return false;
            }
        }
        true
    }

    /// Capacity-level criteria against the worker's available capacity
    pub fn matches_capacity(&self, available: u32) -> bool {
        if self.available_only && available == 0 {
            return false;
        }
        if let Some(minimum) = self.min_available_workload {
            if available < minimum {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn profile(name: &str, department: &str, status: WorkerStatus) -> WorkerProfile {
        WorkerProfile {
            id: WorkerId::new(format!("emp-{}", name)),
            name: name.to_string(),
            email: format!("{}@example.com", name),
            job_title: "Developer".to_string(),
            department: department.to_string(),
            status,
            skills: vec!["rust".to_string()],
        }
    }

    #[test]
    fn test_request_validation_happy_path() {
        let request = AssignmentRequest::new(WorkerId::new("emp-1".to_string()), "Developer", 60);

        let workload = request.validate().unwrap();
        assert_eq!(workload.value(), 60);
    }

    #[test]
    fn test_request_validation_rejects_bad_percentage() {
        let request = AssignmentRequest::new(WorkerId::new("emp-1".to_string()), "Developer", 150);
        assert!(request.validate().is_err());

        let request = AssignmentRequest::new(WorkerId::new("emp-1".to_string()), "Developer", 0);
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_request_validation_rejects_empty_fields() {
        let request = AssignmentRequest::new(WorkerId::new(" ".to_string()), "Developer", 60);
        assert!(request.validate().is_err());

        let request = AssignmentRequest::new(WorkerId::new("emp-1".to_string()), "", 60);
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_draft_rejects_empty_project() {
        let result = AssignmentDraft::new(
            ProjectId::new("".to_string()),
            WorkerId::new("emp-1".to_string()),
            "Developer".to_string(),
            WorkloadPercentage::new(60).unwrap(),
        );

        assert!(result.is_err());
    }

    #[test]
    fn test_draft_into_assignment_keeps_fields() {
        let draft = AssignmentDraft::new(
            ProjectId::new("proj-1".to_string()),
            WorkerId::new("emp-1".to_string()),
            "Developer".to_string(),
            WorkloadPercentage::new(60).unwrap(),
        )
        .unwrap();
        let date = draft.assigned_date;

        let assignment = draft.into_assignment(AssignmentId::new(7));

        assert_eq!(assignment.id, AssignmentId::new(7));
        assert_eq!(assignment.role, "Developer");
        assert_eq!(assignment.workload.value(), 60);
        assert_eq!(assignment.assigned_date, date);
    }

    #[test]
    fn test_filter_profile_matching_is_anded() {
        let filter = WorkerFilter::default()
            .with_search_term("ada")
            .with_department("engineering");

        assert!(filter.matches_profile(&profile("ada", "Engineering", WorkerStatus::Active)));
        assert!(!filter.matches_profile(&profile("ada", "Sales", WorkerStatus::Active)));
        assert!(!filter.matches_profile(&profile("grace", "Engineering", WorkerStatus::Active)));
    }

    #[test]
    fn test_filter_skips_inactive_workers() {
        let filter = WorkerFilter::default();
        assert!(!filter.matches_profile(&profile("ada", "Engineering", WorkerStatus::Inactive)));
    }

    #[test]
    fn test_filter_capacity_criteria() {
        let available_only = WorkerFilter::default().available_only();
        assert!(available_only.matches_capacity(1));
        assert!(!available_only.matches_capacity(0));

        let minimum = WorkerFilter::default().with_min_available_workload(30);
        assert!(minimum.matches_capacity(30));
        assert!(!minimum.matches_capacity(29));

        assert!(WorkerFilter::default().matches_capacity(0));
    }
}
