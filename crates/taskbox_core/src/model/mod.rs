//! Domain model for the task list.
//!
//! # Responsibility
//! - Define canonical data structures shared by storage, service and views.
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId`.
//! - Deletion is a hard removal from the collection; there are no tombstones.

pub mod task;
