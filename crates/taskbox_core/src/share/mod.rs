//! Share dispatcher building blocks.
//!
//! # Responsibility
//! - Format a task as shareable text.
//! - Build encoded links for link-based targets.
//! - Define the clipboard and browser collaborator seams.

pub mod dispatch;
pub mod format;
pub mod targets;
