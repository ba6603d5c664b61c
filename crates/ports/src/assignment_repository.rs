//! Assignment Catalog Port
//!
//! Durable store of assignment records. The catalog allocates record ids
//! and owns the referential and uniqueness rules; `insert_all` must apply
//! a batch as a single unit.

use async_trait::async_trait;
use staffhub_domain::{Assignment, AssignmentDraft, AssignmentId, ProjectId, WorkerId};

#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    /// Persist one validated draft and return the stored record
    async fn insert(&self, draft: AssignmentDraft) -> Result<Assignment, AssignmentRepositoryError>;

    /// Persist a whole batch as a single unit: either every draft is
    /// stored or none is.
    async fn insert_all(
        &self,
        drafts: Vec<AssignmentDraft>,
    ) -> Result<Vec<Assignment>, AssignmentRepositoryError>;

    /// Replace the stored record carrying `assignment.id`
    async fn update(&self, assignment: &Assignment) -> Result<(), AssignmentRepositoryError>;

    async fn find_by_id(
        &self,
        id: &AssignmentId,
    ) -> Result<Option<Assignment>, AssignmentRepositoryError>;

    async fn find_by_project(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<Assignment>, AssignmentRepositoryError>;

    async fn find_by_worker(
        &self,
        worker_id: &WorkerId,
    ) -> Result<Vec<Assignment>, AssignmentRepositoryError>;

    /// Delete by id; false when no record carried it
    async fn delete(&self, id: &AssignmentId) -> Result<bool, AssignmentRepositoryError>;

    /// Delete every role-assignment for the pair; returns the removed count
    async fn delete_by_project_and_worker(
        &self,
        project_id: &ProjectId,
        worker_id: &WorkerId,
    ) -> Result<u64, AssignmentRepositoryError>;
}

/// Assignment catalog error
#[derive(thiserror::Error, Debug)]
pub enum AssignmentRepositoryError {
    #[error("Assignment not found: {0}")]
    NotFound(AssignmentId),

    #[error("Duplicate assignment for project {project_id}, worker {worker_id}, role {role}")]
    Duplicate {
        project_id: ProjectId,
        worker_id: WorkerId,
        role: String,
    },

    #[error("Database error: {0}")]
    Database(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_assignment_repository_trait_is_object_safe() {
        let _repo: Option<Box<dyn AssignmentRepository + Send + Sync>> = None;
    }

    #[tokio::test]
    async fn test_repository_trait_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Box<dyn AssignmentRepository + Send + Sync>>();
    }

    #[test]
    fn test_repository_error_display() {
        let not_found = AssignmentRepositoryError::NotFound(AssignmentId::new(42));
        let duplicate = AssignmentRepositoryError::Duplicate {
            project_id: ProjectId::new("proj-1".to_string()),
            worker_id: WorkerId::new("emp-1".to_string()),
            role: "Developer".to_string(),
        };
        let database = AssignmentRepositoryError::Database("connection refused".to_string());

        assert!(not_found.to_string().contains("42"));
        assert!(duplicate.to_string().contains("proj-1"));
        assert!(database.to_string().contains("Database error"));
    }
}
