//! In-Memory Platform Directories
//!
//! Seed-able adapters for the worker and project lookups.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use staffhub_domain::{ProjectId, ProjectSummary, WorkerId, WorkerProfile};
use staffhub_ports::{
    ProjectDirectory, ProjectDirectoryError, WorkerDirectory, WorkerDirectoryError,
};

pub struct InMemoryWorkerDirectory {
    workers: RwLock<HashMap<WorkerId, WorkerProfile>>,
}

impl InMemoryWorkerDirectory {
    pub fn new() -> Self {
        Self {
            workers: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_workers(profiles: Vec<WorkerProfile>) -> Self {
        let directory = Self::new();
        for profile in profiles {
            directory.upsert(profile);
        }
        directory
    }

    pub fn upsert(&self, profile: WorkerProfile) {
        if let Ok(mut workers) = self.workers.write() {
            workers.insert(profile.id.clone(), profile);
        }
    }
}

impl Default for InMemoryWorkerDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WorkerDirectory for InMemoryWorkerDirectory {
    async fn get_worker(
        &self,
        id: &WorkerId,
    ) -> Result<Option<WorkerProfile>, WorkerDirectoryError> {
        let workers = self
            .workers
            .read()
            .map_err(|_| WorkerDirectoryError::Lookup("directory lock poisoned".to_string()))?;
        Ok(workers.get(id).cloned())
    }

    async fn list_workers(&self) -> Result<Vec<WorkerProfile>, WorkerDirectoryError> {
        let workers = self
            .workers
            .read()
            .map_err(|_| WorkerDirectoryError::Lookup("directory lock poisoned".to_string()))?;
        Ok(workers.values().cloned().collect())
    }

    async fn get_skills(&self, id: &WorkerId) -> Result<Vec<String>, WorkerDirectoryError> {
        Ok(self
            .get_worker(id)
            .await?
            .map(|profile| profile.skills)
            .unwrap_or_default())
    }
}

pub struct InMemoryProjectDirectory {
    projects: RwLock<HashMap<ProjectId, ProjectSummary>>,
}

impl InMemoryProjectDirectory {
    pub fn new() -> Self {
        Self {
            projects: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_projects(summaries: Vec<ProjectSummary>) -> Self {
        let directory = Self::new();
        for summary in summaries {
            directory.upsert(summary);
        }
        directory
    }

    pub fn upsert(&self, summary: ProjectSummary) {
        if let Ok(mut projects) = self.projects.write() {
            projects.insert(summary.id.clone(), summary);
        }
    }
}

impl Default for InMemoryProjectDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProjectDirectory for InMemoryProjectDirectory {
    async fn get_project(
        &self,
        id: &ProjectId,
    ) -> Result<Option<ProjectSummary>, ProjectDirectoryError> {
        let projects = self
            .projects
            .read()
            .map_err(|_| ProjectDirectoryError::Lookup("directory lock poisoned".to_string()))?;
        Ok(projects.get(id).cloned())
    }
}
