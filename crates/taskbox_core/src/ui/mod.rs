//! Headless view layer.
//!
//! # Responsibility
//! - Project the task collection into rows a frontend can paint.
//! - Manage dialog lifetimes and transient notifications.
//!
//! # Invariants
//! - Nothing in this module mutates the task collection directly.

pub mod modal;
pub mod notify;
pub mod render;
