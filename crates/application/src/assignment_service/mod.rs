//! Application Service for Assignment Management
//!
//! Orchestrates single and bulk assignment creation, update, removal and
//! availability-aware worker search. Admission is check-then-act against
//! the catalog, so the service serializes the read-decide-write sequence
//! per worker: no two concurrent requests for the same worker can both
//! observe a stale ledger and overshoot the 100% budget.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{info, warn};

use staffhub_domain::{
    Assignment, AssignmentDraft, AssignmentId, AssignmentRequest, AssignmentValidator,
    BulkEntryFailure, DomainError, DomainResult, ProjectId, WorkerFilter, WorkerId,
    WorkloadLedger, WorkloadPercentage, FULL_CAPACITY,
};
use staffhub_ports::{
    AssignmentRepository, AssignmentRepositoryError, ProjectDirectory, ProjectDirectoryError,
    WorkerDirectory, WorkerDirectoryError,
};

use crate::dto::{AssignmentRecord, ProjectWorkload, WorkerSummary, WorkerWorkloadBreakdown};

/// Service tuning knobs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// When true, entries of one bulk batch targeting the same worker are
    /// accounted against each other during validation. The default keeps
    /// the historical behavior: every entry is checked against the ledger
    /// as it stood before the batch began.
    pub cumulative_bulk_validation: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            cumulative_bulk_validation: false,
        }
    }
}

/// The staffing core's only entry point
pub struct AssignmentService {
    catalog: Arc<dyn AssignmentRepository>,
    workers: Arc<dyn WorkerDirectory>,
    projects: Arc<dyn ProjectDirectory>,
    config: ServiceConfig,
    admission_locks: DashMap<WorkerId, Arc<Mutex<()>>>,
}

fn catalog_error(err: AssignmentRepositoryError) -> DomainError {
    match err {
        AssignmentRepositoryError::NotFound(id) => {
            DomainError::NotFound(format!("assignment {}", id))
        }
        AssignmentRepositoryError::Duplicate {
            project_id,
            worker_id,
            role,
        } => DomainError::DuplicateAssignment {
            project_id,
            worker_id,
            role,
        },
        AssignmentRepositoryError::Database(message) => DomainError::Infrastructure(message),
    }
}

fn worker_directory_error(err: WorkerDirectoryError) -> DomainError {
    DomainError::Infrastructure(err.to_string())
}

fn project_directory_error(err: ProjectDirectoryError) -> DomainError {
    DomainError::Infrastructure(err.to_string())
}

impl AssignmentService {
    pub fn new(
        catalog: Arc<dyn AssignmentRepository>,
        workers: Arc<dyn WorkerDirectory>,
        projects: Arc<dyn ProjectDirectory>,
    ) -> Self {
        Self::with_config(catalog, workers, projects, ServiceConfig::default())
    }

    pub fn with_config(
        catalog: Arc<dyn AssignmentRepository>,
        workers: Arc<dyn WorkerDirectory>,
        projects: Arc<dyn ProjectDirectory>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            catalog,
            workers,
            projects,
            config,
            admission_locks: DashMap::new(),
        }
    }

    /// Per-worker serialization point for the read-decide-write sequence
    fn admission_lock(&self, worker_id: &WorkerId) -> Arc<Mutex<()>> {
        self.admission_locks
            .entry(worker_id.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Assign one worker to a project under a role, consuming part of the
    /// worker's capacity.
    pub async fn assign(
        &self,
        project_id: ProjectId,
        request: AssignmentRequest,
    ) -> DomainResult<AssignmentRecord> {
        if project_id.is_empty() {
            return Err(DomainError::Validation(
                "project id must not be empty".to_string(),
            ));
        }
        let workload = request.validate()?;

        let lock = self.admission_lock(&request.worker_id);
        let _guard = lock.lock().await;

        let existing = self
            .catalog
            .find_by_worker(&request.worker_id)
            .await
            .map_err(catalog_error)?;

        if AssignmentValidator::is_duplicate(
            &existing,
            &project_id,
            &request.worker_id,
            &request.role,
        ) {
            warn!(
                worker = %request.worker_id,
                project = %project_id,
                role = %request.role,
                "duplicate assignment rejected"
            );
            return Err(DomainError::DuplicateAssignment {
                project_id,
                worker_id: request.worker_id,
                role: request.role,
            });
        }

        let current = WorkloadLedger::committed(&existing);
        let requested = workload.value();
        if !AssignmentValidator::can_accommodate(current, requested, None) {
            warn!(
                worker = %request.worker_id,
                current,
                requested,
                "assignment rejected over capacity"
            );
            return Err(DomainError::CapacityExceeded {
                worker_id: request.worker_id,
                current,
                requested,
                resulting: current + requested,
            });
        }

        let draft = AssignmentDraft::new(project_id, request.worker_id, request.role, workload)?;
        let stored = self.catalog.insert(draft).await.map_err(catalog_error)?;
        info!(
            id = %stored.id,
            worker = %stored.worker_id,
            project = %stored.project_id,
            workload = %stored.workload,
            "assignment created"
        );

        self.to_record(stored).await
    }

    /// Assign a batch of workers to one project. The batch succeeds or
    /// fails as a unit: every entry is validated against the pre-batch
    /// ledger state first, all failures are aggregated into one error, and
    /// nothing is persisted unless every entry passes.
    pub async fn assign_bulk(
        &self,
        project_id: ProjectId,
        requests: Vec<AssignmentRequest>,
    ) -> DomainResult<Vec<AssignmentRecord>> {
        if requests.is_empty() {
            return Err(DomainError::Validation(
                "at least one assignment required".to_string(),
            ));
        }
        if project_id.is_empty() {
            return Err(DomainError::Validation(
                "project id must not be empty".to_string(),
            ));
        }

        // Lock every distinct worker in sorted order so two concurrent
        // batches sharing workers cannot deadlock.
        let mut worker_ids: Vec<WorkerId> =
            requests.iter().map(|r| r.worker_id.clone()).collect();
        worker_ids.sort();
        worker_ids.dedup();
        let locks: Vec<Arc<Mutex<()>>> = worker_ids
            .iter()
            .map(|id| self.admission_lock(id))
            .collect();
        let mut guards = Vec::with_capacity(locks.len());
        for lock in &locks {
            guards.push(lock.lock().await);
        }

        // One ledger snapshot per worker, taken before any entry is judged.
        let mut snapshots: HashMap<WorkerId, Vec<Assignment>> = HashMap::new();
        for worker_id in &worker_ids {
            let assignments = self
                .catalog
                .find_by_worker(worker_id)
                .await
                .map_err(catalog_error)?;
            snapshots.insert(worker_id.clone(), assignments);
        }

        let mut failures: Vec<BulkEntryFailure> = Vec::new();
        let mut batch_load: HashMap<WorkerId, u32> = HashMap::new();
        for request in &requests {
            let existing = snapshots
                .get(&request.worker_id)
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            let carried = batch_load.get(&request.worker_id).copied().unwrap_or(0);

            match Self::validate_bulk_entry(&project_id, request, existing, carried) {
                Ok(()) => {
                    if self.config.cumulative_bulk_validation {
                        *batch_load.entry(request.worker_id.clone()).or_insert(0) +=
                            request.workload_percentage;
                    }
                }
                Err(reason) => failures.push(BulkEntryFailure {
                    worker_id: request.worker_id.clone(),
                    reason,
                }),
            }
        }

        if !failures.is_empty() {
            warn!(
                project = %project_id,
                failed = failures.len(),
                total = requests.len(),
                "bulk assignment rejected"
            );
            return Err(DomainError::BulkRejected { failures });
        }

        let mut drafts = Vec::with_capacity(requests.len());
        for request in requests {
            let workload = request.validate()?;
            drafts.push(AssignmentDraft::new(
                project_id.clone(),
                request.worker_id,
                request.role,
                workload,
            )?);
        }

        let stored = self
            .catalog
            .insert_all(drafts)
            .await
            .map_err(catalog_error)?;
        info!(project = %project_id, count = stored.len(), "bulk assignment committed");

        self.to_records(stored).await
    }

    fn validate_bulk_entry(
        project_id: &ProjectId,
        request: &AssignmentRequest,
        existing: &[Assignment],
        carried: u32,
    ) -> Result<(), String> {
        let workload = match request.validate() {
            Ok(workload) => workload,
            Err(err) => return Err(err.to_string()),
        };

        if AssignmentValidator::is_duplicate(
            existing,
            project_id,
            &request.worker_id,
            &request.role,
        ) {
            return Err(DomainError::DuplicateAssignment {
                project_id: project_id.clone(),
                worker_id: request.worker_id.clone(),
                role: request.role.clone(),
            }
            .to_string());
        }

        let current = WorkloadLedger::committed(existing) + carried;
        let requested = workload.value();
        if !AssignmentValidator::can_accommodate(current, requested, None) {
            return Err(DomainError::CapacityExceeded {
                worker_id: request.worker_id.clone(),
                current,
                requested,
                resulting: current + requested,
            }
            .to_string());
        }

        Ok(())
    }

    /// Change an assignment's role and/or workload. Project, worker and
    /// assigned date are immutable; on rejection the stored record is left
    /// untouched.
    pub async fn update(
        &self,
        assignment_id: AssignmentId,
        new_role: String,
        new_workload_percentage: u32,
    ) -> DomainResult<AssignmentRecord> {
        let existing = self
            .catalog
            .find_by_id(&assignment_id)
            .await
            .map_err(catalog_error)?
            .ok_or_else(|| DomainError::NotFound(format!("assignment {}", assignment_id)))?;

        let lock = self.admission_lock(&existing.worker_id);
        let _guard = lock.lock().await;

        // Re-read under the lock so the decision sees the current ledger.
        let record = self
            .catalog
            .find_by_id(&assignment_id)
            .await
            .map_err(catalog_error)?
            .ok_or_else(|| DomainError::NotFound(format!("assignment {}", assignment_id)))?;

        let workload = WorkloadPercentage::new(new_workload_percentage)?;
        let all = self
            .catalog
            .find_by_worker(&record.worker_id)
            .await
            .map_err(catalog_error)?;

        let total = WorkloadLedger::committed(&all);
        let prior = record.workload.value();
        let requested = workload.value();
        if !AssignmentValidator::can_accommodate(total, requested, Some(prior)) {
            let current = total.saturating_sub(prior);
            warn!(
                id = %assignment_id,
                worker = %record.worker_id,
                current,
                requested,
                "update rejected over capacity"
            );
            return Err(DomainError::CapacityExceeded {
                worker_id: record.worker_id,
                current,
                requested,
                resulting: current + requested,
            });
        }

        let mut updated = record;
        updated.reassign(new_role, workload)?;
        self.catalog.update(&updated).await.map_err(catalog_error)?;
        info!(
            id = %updated.id,
            worker = %updated.worker_id,
            workload = %updated.workload,
            "assignment updated"
        );

        self.to_record(updated).await
    }

    /// Delete by id; false (not an error) when no record carried it
    pub async fn remove(&self, assignment_id: AssignmentId) -> DomainResult<bool> {
        let removed = self
            .catalog
            .delete(&assignment_id)
            .await
            .map_err(catalog_error)?;
        if removed {
            info!(id = %assignment_id, "assignment removed");
        }
        Ok(removed)
    }

    /// Remove every role the worker holds on the project; true when at
    /// least one record went away.
    pub async fn remove_by_project_and_worker(
        &self,
        project_id: &ProjectId,
        worker_id: &WorkerId,
    ) -> DomainResult<bool> {
        let removed = self
            .catalog
            .delete_by_project_and_worker(project_id, worker_id)
            .await
            .map_err(catalog_error)?;
        if removed > 0 {
            info!(
                project = %project_id,
                worker = %worker_id,
                count = removed,
                "assignments removed"
            );
        }
        Ok(removed > 0)
    }

    pub async fn list_by_project(
        &self,
        project_id: &ProjectId,
    ) -> DomainResult<Vec<AssignmentRecord>> {
        let assignments = self
            .catalog
            .find_by_project(project_id)
            .await
            .map_err(catalog_error)?;
        self.to_records(assignments).await
    }

    pub async fn list_by_worker(
        &self,
        worker_id: &WorkerId,
    ) -> DomainResult<Vec<AssignmentRecord>> {
        let assignments = self
            .catalog
            .find_by_worker(worker_id)
            .await
            .map_err(catalog_error)?;
        self.to_records(assignments).await
    }

    /// Availability-aware worker search. All populated filter fields
    /// compose with AND semantics; results are sorted by worker name,
    /// ascending, case-insensitive.
    pub async fn find_available_workers(
        &self,
        filter: WorkerFilter,
    ) -> DomainResult<Vec<WorkerSummary>> {
        let profiles = self
            .workers
            .list_workers()
            .await
            .map_err(worker_directory_error)?;

        let mut summaries = Vec::new();
        for profile in profiles {
            if !filter.matches_profile(&profile) {
                continue;
            }

            if !filter.required_skills.is_empty() {
                let skills = self
                    .workers
                    .get_skills(&profile.id)
                    .await
                    .map_err(worker_directory_error)?;
                if !filter.required_skills.iter().all(|s| skills.contains(s)) {
                    continue;
                }
            }

            let assignments = self
                .catalog
                .find_by_worker(&profile.id)
                .await
                .map_err(catalog_error)?;
            let current_workload = WorkloadLedger::committed(&assignments);
            let available_capacity = FULL_CAPACITY.saturating_sub(current_workload);
            if !filter.matches_capacity(available_capacity) {
                continue;
            }

            let mut active_projects = Vec::new();
            let mut seen: HashSet<ProjectId> = HashSet::new();
            for assignment in &assignments {
                if !seen.insert(assignment.project_id.clone()) {
                    continue;
                }
                let project = self
                    .projects
                    .get_project(&assignment.project_id)
                    .await
                    .map_err(project_directory_error)?;
                if let Some(project) = project {
                    if project.status.is_active() {
                        active_projects.push(project.name);
                    }
                }
            }

            let records = self.to_records(assignments).await?;
            summaries.push(WorkerSummary {
                worker_id: profile.id,
                name: profile.name,
                email: profile.email,
                job_title: profile.job_title,
                department: profile.department,
                skills: profile.skills,
                current_workload,
                available_capacity,
                active_projects,
                assignments: records,
            });
        }

        summaries.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(summaries)
    }

    /// Per-project report of one worker's committed capacity
    pub async fn workload_breakdown(
        &self,
        worker_id: &WorkerId,
    ) -> DomainResult<WorkerWorkloadBreakdown> {
        let profile = self
            .workers
            .get_worker(worker_id)
            .await
            .map_err(worker_directory_error)?
            .ok_or_else(|| DomainError::NotFound(format!("worker {}", worker_id)))?;

        let assignments = self
            .catalog
            .find_by_worker(worker_id)
            .await
            .map_err(catalog_error)?;
        let total_workload = WorkloadLedger::committed(&assignments);
        let available_capacity = FULL_CAPACITY.saturating_sub(total_workload);

        // Group per distinct project in first-seen order.
        let mut order: Vec<ProjectId> = Vec::new();
        let mut per_project: HashMap<ProjectId, (u32, Vec<String>)> = HashMap::new();
        for assignment in &assignments {
            let entry = per_project
                .entry(assignment.project_id.clone())
                .or_insert_with(|| {
                    order.push(assignment.project_id.clone());
                    (0, Vec::new())
                });
            entry.0 += assignment.workload.value();
            if !entry.1.contains(&assignment.role) {
                entry.1.push(assignment.role.clone());
            }
        }

        let mut projects = Vec::with_capacity(order.len());
        let mut active_workload = 0u32;
        for project_id in order {
            if let Some((workload_percentage, roles)) = per_project.remove(&project_id) {
                let summary = self
                    .projects
                    .get_project(&project_id)
                    .await
                    .map_err(project_directory_error)?;
                let (project_name, active) = match summary {
                    Some(p) => (p.name, p.status.is_active()),
                    None => (project_id.to_string(), false),
                };
                if active {
                    active_workload += workload_percentage;
                }
                projects.push(ProjectWorkload {
                    project_id,
                    project_name,
                    workload_percentage,
                    roles: roles.join(", "),
                    active,
                });
            }
        }

        Ok(WorkerWorkloadBreakdown {
            worker_id: profile.id,
            worker_name: profile.name,
            total_workload,
            active_workload,
            available_capacity,
            projects,
        })
    }

    async fn to_record(&self, assignment: Assignment) -> DomainResult<AssignmentRecord> {
        let mut records = self.to_records(vec![assignment]).await?;
        Ok(records.remove(0))
    }

    async fn to_records(
        &self,
        assignments: Vec<Assignment>,
    ) -> DomainResult<Vec<AssignmentRecord>> {
        let mut project_names: HashMap<ProjectId, String> = HashMap::new();
        let mut worker_names: HashMap<WorkerId, String> = HashMap::new();

        let mut records = Vec::with_capacity(assignments.len());
        for assignment in assignments {
            let project_name = match project_names.get(&assignment.project_id) {
                Some(name) => name.clone(),
                None => {
                    let name = self
                        .projects
                        .get_project(&assignment.project_id)
                        .await
                        .map_err(project_directory_error)?
                        .map(|p| p.name)
                        .unwrap_or_else(|| assignment.project_id.to_string());
                    project_names.insert(assignment.project_id.clone(), name.clone());
                    name
                }
            };

            let worker_name = match worker_names.get(&assignment.worker_id) {
                Some(name) => name.clone(),
                None => {
                    let name = self
                        .workers
                        .get_worker(&assignment.worker_id)
                        .await
                        .map_err(worker_directory_error)?
                        .map(|p| p.name)
                        .unwrap_or_else(|| assignment.worker_id.to_string());
                    worker_names.insert(assignment.worker_id.clone(), name.clone());
                    name
                }
            };

            records.push(AssignmentRecord {
                id: assignment.id,
                project_id: assignment.project_id,
                project_name,
                worker_id: assignment.worker_id,
                worker_name,
                role: assignment.role,
                workload_percentage: assignment.workload.value(),
                assigned_date: assignment.assigned_date,
            });
        }

        Ok(records)
    }
}
