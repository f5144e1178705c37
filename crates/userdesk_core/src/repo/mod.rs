//! Persistence port for the locally persisted override set.
//!
//! # Responsibility
//! - Define the whole-collection get/set contract the service injects.
//! - Isolate SQLite/JSON slot details from reconciliation orchestration.
//!
//! # Invariants
//! - The override set is read and written as a whole; there is no
//!   entry-level mutation API.
//! - Read paths reject corrupt persisted state instead of masking it.

pub mod override_repo;
