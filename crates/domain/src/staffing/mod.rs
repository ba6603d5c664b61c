//! Staffing Bounded Context
//!
//! Capacity-constrained employee-to-project assignment: the Assignment
//! aggregate, the read-only worker/project views, and the admission logic.

pub mod entities;
pub mod services;
pub mod value_objects;

pub use entities::{Assignment, ProjectSummary, WorkerProfile};
pub use services::{AssignmentValidator, WorkloadLedger, FULL_CAPACITY};
pub use value_objects::{AssignmentDraft, AssignmentRequest, WorkerFilter};
