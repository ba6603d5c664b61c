//! Infrastructure - In-Memory Adapters
//!
//! Reference implementations of the staffing ports backed by in-memory
//! storage. They carry the catalog's referential rules (id allocation,
//! unique triple, all-or-nothing bulk insert) and back the application
//! integration tests and embedding hosts without a database.

pub mod directories;
pub mod repositories;

pub use crate::directories::{InMemoryProjectDirectory, InMemoryWorkerDirectory};
pub use crate::repositories::InMemoryAssignmentRepository;
