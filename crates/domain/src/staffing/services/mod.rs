//! Staffing Domain Services
//!
//! The workload ledger and the assignment validator. Both are synchronous
//! decision functions over assignment data the caller has already fetched
//! from the catalog; neither performs I/O nor raises errors itself.

use std::collections::HashSet;

use crate::shared_kernel::types::{ProjectId, WorkerId};
use crate::staffing::entities::{Assignment, ProjectSummary};

/// A worker's total allocatable budget: 100% of their effort
pub const FULL_CAPACITY: u32 = 100;

/// Answers "how much capacity does this worker currently have committed?"
/// over the worker's persisted assignment set.
pub struct WorkloadLedger;

impl WorkloadLedger {
    /// Sum of workload percentages across all given assignments
    pub fn committed(assignments: &[Assignment]) -> u32 {
        assignments.iter().map(|a| a.workload.value()).sum()
    }

    /// Remaining budget, saturating at zero
    pub fn available(assignments: &[Assignment]) -> u32 {
        FULL_CAPACITY.saturating_sub(Self::committed(assignments))
    }

    /// Active-only reporting view: only assignments on projects currently
    /// marked active count.
    pub fn committed_on_active(assignments: &[Assignment], projects: &[ProjectSummary]) -> u32 {
        let active: HashSet<&ProjectId> = projects
            .iter()
            .filter(|p| p.status.is_active())
            .map(|p| &p.id)
            .collect();

        assignments
            .iter()
            .filter(|a| active.contains(&a.project_id))
            .map(|a| a.workload.value())
            .sum()
    }
}

/// Encapsulates the two admission rules, independent of persistence.
/// Callers translate a `false` into the appropriate failure kind.
pub struct AssignmentValidator;

impl AssignmentValidator {
    /// Would adding `requested` keep the worker within budget?
    ///
    /// `excluding` is the prior percentage of an assignment being updated,
    /// subtracted first so the record is not counted against itself.
    pub fn can_accommodate(current: u32, requested: u32, excluding: Option<u32>) -> bool {
        let base = current.saturating_sub(excluding.unwrap_or(0));
        base + requested <= FULL_CAPACITY
    }

    /// Does an assignment with this exact triple already exist?
    pub fn is_duplicate(
        existing: &[Assignment],
        project_id: &ProjectId,
        worker_id: &WorkerId,
        role: &str,
    ) -> bool {
        existing
            .iter()
            .any(|a| a.matches_triple(project_id, worker_id, role))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared_kernel::types::{AssignmentId, ProjectStatus, WorkloadPercentage};
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn assignment(id: i64, project: &str, worker: &str, role: &str, workload: u32) -> Assignment {
        Assignment {
            id: AssignmentId::new(id),
            project_id: ProjectId::new(project.to_string()),
            worker_id: WorkerId::new(worker.to_string()),
            role: role.to_string(),
            workload: WorkloadPercentage::new(workload).unwrap(),
            assigned_date: Utc::now(),
        }
    }

    fn project(id: &str, status: ProjectStatus) -> ProjectSummary {
        ProjectSummary {
            id: ProjectId::new(id.to_string()),
            name: id.to_string(),
            status,
        }
    }

    #[test]
    fn test_committed_sums_all_assignments() {
        let assignments = vec![
            assignment(1, "proj-1", "emp-1", "Developer", 60),
            assignment(2, "proj-2", "emp-1", "Tester", 30),
        ];

        assert_eq!(WorkloadLedger::committed(&assignments), 90);
        assert_eq!(WorkloadLedger::available(&assignments), 10);
    }

    #[test]
    fn test_committed_is_zero_without_assignments() {
        assert_eq!(WorkloadLedger::committed(&[]), 0);
        assert_eq!(WorkloadLedger::available(&[]), FULL_CAPACITY);
    }

    #[test]
    fn test_available_saturates_at_zero() {
        // An over-budget ledger (possible through the known admission race)
        // must never report negative availability.
        let assignments = vec![
            assignment(1, "proj-1", "emp-1", "Developer", 80),
            assignment(2, "proj-2", "emp-1", "Tester", 40),
        ];

        assert_eq!(WorkloadLedger::available(&assignments), 0);
    }

    #[test]
    fn test_active_only_view_ignores_completed_projects() {
        let assignments = vec![
            assignment(1, "proj-1", "emp-1", "Developer", 60),
            assignment(2, "proj-2", "emp-1", "Tester", 30),
        ];
        let projects = vec![
            project("proj-1", ProjectStatus::Active),
            project("proj-2", ProjectStatus::Completed),
        ];

        assert_eq!(
            WorkloadLedger::committed_on_active(&assignments, &projects),
            60
        );
    }

    #[test]
    fn test_can_accommodate_at_the_boundary() {
        assert!(AssignmentValidator::can_accommodate(60, 40, None));
        assert!(!AssignmentValidator::can_accommodate(60, 41, None));
        assert!(AssignmentValidator::can_accommodate(0, 100, None));
    }

    #[test]
    fn test_can_accommodate_excludes_prior_contribution() {
        // Updating a 60% assignment to 80% with another 40% held elsewhere:
        // 100 - 60 + 80 = 120, over budget.
        assert!(!AssignmentValidator::can_accommodate(100, 80, Some(60)));
        // Same update with only the 60% held: 0 + 80 = 80, fine.
        assert!(AssignmentValidator::can_accommodate(60, 80, Some(60)));
    }

    #[test]
    fn test_is_duplicate_requires_exact_triple() {
        let existing = vec![assignment(1, "proj-1", "emp-1", "Developer", 60)];

        assert!(AssignmentValidator::is_duplicate(
            &existing,
            &ProjectId::new("proj-1".to_string()),
            &WorkerId::new("emp-1".to_string()),
            "Developer",
        ));
        assert!(!AssignmentValidator::is_duplicate(
            &existing,
            &ProjectId::new("proj-1".to_string()),
            &WorkerId::new("emp-1".to_string()),
            "Tester",
        ));
        assert!(!AssignmentValidator::is_duplicate(
            &existing,
            &ProjectId::new("proj-2".to_string()),
            &WorkerId::new("emp-1".to_string()),
            "Developer",
        ));
    }
}
