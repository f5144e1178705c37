//! Domain model for user directory records.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep one record shape shared by the remote snapshot and local overrides.
//!
//! # Invariants
//! - Every record is identified by a stable positive integer `UserId`.
//! - Deletion is represented by override tombstones, not hard delete.

pub mod user;
