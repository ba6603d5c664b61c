//! In-Memory Assignment Catalog
//!
//! Storage adapter implementing the catalog port over a `RwLock`ed map.
//! Ids are allocated from a monotonic counter; the unique
//! (project, worker, role) triple is enforced on insert and update, and
//! `insert_all` applies a batch as a single unit.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use staffhub_domain::{Assignment, AssignmentDraft, AssignmentId, ProjectId, WorkerId};
use staffhub_ports::{AssignmentRepository, AssignmentRepositoryError};

struct CatalogState {
    next_id: i64,
    assignments: HashMap<AssignmentId, Assignment>,
}

pub struct InMemoryAssignmentRepository {
    state: RwLock<CatalogState>,
}

impl InMemoryAssignmentRepository {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(CatalogState {
                next_id: 1,
                assignments: HashMap::new(),
            }),
        }
    }
}

impl Default for InMemoryAssignmentRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn lock_error() -> AssignmentRepositoryError {
    AssignmentRepositoryError::Database("catalog lock poisoned".to_string())
}

impl CatalogState {
    fn violates_unique_triple(&self, draft: &AssignmentDraft) -> bool {
        self.assignments
            .values()
            .any(|a| a.matches_triple(&draft.project_id, &draft.worker_id, &draft.role))
    }

    fn store(&mut self, draft: AssignmentDraft) -> Assignment {
        let id = AssignmentId::new(self.next_id);
        self.next_id += 1;
        let assignment = draft.into_assignment(id);
        self.assignments.insert(id, assignment.clone());
        assignment
    }
}

#[async_trait]
impl AssignmentRepository for InMemoryAssignmentRepository {
    async fn insert(
        &self,
        draft: AssignmentDraft,
    ) -> Result<Assignment, AssignmentRepositoryError> {
        let mut state = self.state.write().map_err(|_| lock_error())?;
        if state.violates_unique_triple(&draft) {
            return Err(AssignmentRepositoryError::Duplicate {
                project_id: draft.project_id,
                worker_id: draft.worker_id,
                role: draft.role,
            });
        }
        Ok(state.store(draft))
    }

    async fn insert_all(
        &self,
        drafts: Vec<AssignmentDraft>,
    ) -> Result<Vec<Assignment>, AssignmentRepositoryError> {
        let mut state = self.state.write().map_err(|_| lock_error())?;

        // Check the whole batch, against the store and within itself,
        // before anything is written.
        for (index, draft) in drafts.iter().enumerate() {
            let clash_in_batch = drafts[..index].iter().any(|earlier| {
                earlier.project_id == draft.project_id
                    && earlier.worker_id == draft.worker_id
                    && earlier.role == draft.role
            });
            if clash_in_batch || state.violates_unique_triple(draft) {
                return Err(AssignmentRepositoryError::Duplicate {
                    project_id: draft.project_id.clone(),
                    worker_id: draft.worker_id.clone(),
                    role: draft.role.clone(),
                });
            }
        }

        Ok(drafts.into_iter().map(|draft| state.store(draft)).collect())
    }

    async fn update(&self, assignment: &Assignment) -> Result<(), AssignmentRepositoryError> {
        let mut state = self.state.write().map_err(|_| lock_error())?;
        if !state.assignments.contains_key(&assignment.id) {
            return Err(AssignmentRepositoryError::NotFound(assignment.id));
        }

        let clashes = state.assignments.values().any(|a| {
            a.id != assignment.id
                && a.matches_triple(&assignment.project_id, &assignment.worker_id, &assignment.role)
        });
        if clashes {
            return Err(AssignmentRepositoryError::Duplicate {
                project_id: assignment.project_id.clone(),
                worker_id: assignment.worker_id.clone(),
                role: assignment.role.clone(),
            });
        }

        state.assignments.insert(assignment.id, assignment.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &AssignmentId,
    ) -> Result<Option<Assignment>, AssignmentRepositoryError> {
        let state = self.state.read().map_err(|_| lock_error())?;
        Ok(state.assignments.get(id).cloned())
    }

    async fn find_by_project(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<Assignment>, AssignmentRepositoryError> {
        let state = self.state.read().map_err(|_| lock_error())?;
        let mut found: Vec<Assignment> = state
            .assignments
            .values()
            .filter(|a| a.project_id == *project_id)
            .cloned()
            .collect();
        found.sort_by_key(|a| a.id);
        Ok(found)
    }

    async fn find_by_worker(
        &self,
        worker_id: &WorkerId,
    ) -> Result<Vec<Assignment>, AssignmentRepositoryError> {
        let state = self.state.read().map_err(|_| lock_error())?;
        let mut found: Vec<Assignment> = state
            .assignments
            .values()
            .filter(|a| a.worker_id == *worker_id)
            .cloned()
            .collect();
        found.sort_by_key(|a| a.id);
        Ok(found)
    }

    async fn delete(&self, id: &AssignmentId) -> Result<bool, AssignmentRepositoryError> {
        let mut state = self.state.write().map_err(|_| lock_error())?;
        Ok(state.assignments.remove(id).is_some())
    }

    async fn delete_by_project_and_worker(
        &self,
        project_id: &ProjectId,
        worker_id: &WorkerId,
    ) -> Result<u64, AssignmentRepositoryError> {
        let mut state = self.state.write().map_err(|_| lock_error())?;
        let before = state.assignments.len();
        state
            .assignments
            .retain(|_, a| !(a.project_id == *project_id && a.worker_id == *worker_id));
        Ok((before - state.assignments.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use staffhub_domain::WorkloadPercentage;

    fn draft(project: &str, worker: &str, role: &str, workload: u32) -> AssignmentDraft {
        AssignmentDraft::new(
            ProjectId::new(project.to_string()),
            WorkerId::new(worker.to_string()),
            role.to_string(),
            WorkloadPercentage::new(workload).unwrap(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_insert_allocates_monotonic_ids() {
        let repo = InMemoryAssignmentRepository::new();

        let first = repo.insert(draft("proj-1", "emp-1", "Developer", 60)).await.unwrap();
        let second = repo.insert(draft("proj-2", "emp-1", "Tester", 20)).await.unwrap();

        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn test_insert_enforces_unique_triple() {
        let repo = InMemoryAssignmentRepository::new();

        repo.insert(draft("proj-1", "emp-1", "Developer", 60)).await.unwrap();
        let result = repo.insert(draft("proj-1", "emp-1", "Developer", 10)).await;

        assert!(matches!(
            result,
            Err(AssignmentRepositoryError::Duplicate { .. })
        ));
    }

    #[tokio::test]
    async fn test_insert_all_is_all_or_nothing() {
        let repo = InMemoryAssignmentRepository::new();
        repo.insert(draft("proj-1", "emp-2", "Developer", 10)).await.unwrap();

        // Second draft clashes with the stored record.
        let result = repo
            .insert_all(vec![
                draft("proj-1", "emp-1", "Developer", 30),
                draft("proj-1", "emp-2", "Developer", 30),
            ])
            .await;

        assert!(result.is_err());
        let remaining = repo
            .find_by_project(&ProjectId::new("proj-1".to_string()))
            .await
            .unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].worker_id.as_str(), "emp-2");
    }

    #[tokio::test]
    async fn test_insert_all_rejects_clash_within_batch() {
        let repo = InMemoryAssignmentRepository::new();

        let result = repo
            .insert_all(vec![
                draft("proj-1", "emp-1", "Developer", 30),
                draft("proj-1", "emp-1", "Developer", 30),
            ])
            .await;

        assert!(result.is_err());
        let remaining = repo
            .find_by_project(&ProjectId::new("proj-1".to_string()))
            .await
            .unwrap();
        assert!(remaining.is_empty());
    }

    #[tokio::test]
    async fn test_update_replaces_in_place() {
        let repo = InMemoryAssignmentRepository::new();
        let stored = repo.insert(draft("proj-1", "emp-1", "Developer", 60)).await.unwrap();

        let mut updated = stored.clone();
        updated
            .reassign("Lead".to_string(), WorkloadPercentage::new(80).unwrap())
            .unwrap();
        repo.update(&updated).await.unwrap();

        let found = repo.find_by_id(&stored.id).await.unwrap().unwrap();
        assert_eq!(found.role, "Lead");
        assert_eq!(found.workload.value(), 80);
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_not_found() {
        let repo = InMemoryAssignmentRepository::new();
        let stored = repo.insert(draft("proj-1", "emp-1", "Developer", 60)).await.unwrap();
        repo.delete(&stored.id).await.unwrap();

        let result = repo.update(&stored).await;

        assert!(matches!(result, Err(AssignmentRepositoryError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_cannot_create_duplicate_triple() {
        let repo = InMemoryAssignmentRepository::new();
        repo.insert(draft("proj-1", "emp-1", "Developer", 30)).await.unwrap();
        let other = repo.insert(draft("proj-1", "emp-1", "Reviewer", 20)).await.unwrap();

        let mut renamed = other.clone();
        renamed
            .reassign("Developer".to_string(), WorkloadPercentage::new(20).unwrap())
            .unwrap();
        let result = repo.update(&renamed).await;

        assert!(matches!(
            result,
            Err(AssignmentRepositoryError::Duplicate { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_reports_presence() {
        let repo = InMemoryAssignmentRepository::new();
        let stored = repo.insert(draft("proj-1", "emp-1", "Developer", 60)).await.unwrap();

        assert!(repo.delete(&stored.id).await.unwrap());
        assert!(!repo.delete(&stored.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_by_pair_removes_every_role() {
        let repo = InMemoryAssignmentRepository::new();
        repo.insert(draft("proj-1", "emp-1", "Developer", 30)).await.unwrap();
        repo.insert(draft("proj-1", "emp-1", "Reviewer", 20)).await.unwrap();
        repo.insert(draft("proj-1", "emp-2", "Developer", 30)).await.unwrap();

        let removed = repo
            .delete_by_project_and_worker(
                &ProjectId::new("proj-1".to_string()),
                &WorkerId::new("emp-1".to_string()),
            )
            .await
            .unwrap();

        assert_eq!(removed, 2);
        let remaining = repo
            .find_by_project(&ProjectId::new("proj-1".to_string()))
            .await
            .unwrap();
        assert_eq!(remaining.len(), 1);
    }
}
