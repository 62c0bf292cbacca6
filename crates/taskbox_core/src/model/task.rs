//! Task domain model.
//!
//! # Responsibility
//! - Define the single persisted record (`Task`) and its identifier.
//! - Own title/description normalization used at create and edit boundaries.
//!
//! # Invariants
//! - `id` is assigned once and never changes for the task lifetime.
//! - A freshly created task always has a non-empty trimmed title.
//! - Serialized shape is exactly `{ "id", "title", "description" }`.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque task identifier.
///
/// Stored as a plain string so payloads written by other generators (for
/// example creation timestamps) still load and keep their identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Generates a fresh identifier that never collides within a session.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<String> for TaskId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// User-authored title + description record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: String,
}

impl Task {
    /// Builds a task from raw form input.
    ///
    /// Returns `None` when the title is blank after trimming; both fields are
    /// stored trimmed.
    pub fn from_input(title: &str, description: &str) -> Option<Self> {
        let draft = TaskDraft::new(title, description);
        if !draft.has_title() {
            return None;
        }
        Some(Self {
            id: TaskId::generate(),
            title: draft.title,
            description: draft.description,
        })
    }

    /// Whether the description carries visible text.
    pub fn has_description(&self) -> bool {
        !self.description.trim().is_empty()
    }
}

/// Trimmed title/description pair coming from a form or edit dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
}

impl TaskDraft {
    pub fn new(title: &str, description: &str) -> Self {
        Self {
            title: title.trim().to_string(),
            description: description.trim().to_string(),
        }
    }

    pub fn has_title(&self) -> bool {
        !self.title.is_empty()
    }
}
