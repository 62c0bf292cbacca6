//! Persistence layer for the task collection.
//!
//! # Responsibility
//! - Define the durable key-value contract and its implementations.
//! - Map the task collection to and from its single stored blob.
//!
//! # Invariants
//! - Read paths reject malformed persisted state instead of masking it.
//! - Write paths overwrite the whole collection.

pub mod kv_store;
pub mod task_repo;
