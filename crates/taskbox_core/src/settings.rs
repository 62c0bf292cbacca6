//! Session-level behavior switches.
//!
//! These are plain data; frontends deserialize them from their own config
//! files and hand them to [`crate::app::TaskApp`].

use serde::{Deserialize, Serialize};

/// Default page URL embedded by link-based share targets.
pub const DEFAULT_PAGE_URL: &str = "https://taskbox.app/";

/// What to do when the stored collection cannot be decoded at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoragePolicy {
    /// Fail the session with the decode error.
    #[default]
    #[serde(alias = "fail")]
    Strict,
    /// Log the failure and start from an empty collection.
    #[serde(alias = "reset")]
    ResetOnMalformed,
}

/// Title validation applied by the edit flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditTitlePolicy {
    /// Store whatever the edit dialog submitted, blank titles included.
    #[default]
    Verbatim,
    /// Ignore edits whose trimmed title is blank.
    RequireTitle,
}

/// Settings consumed by a task session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    pub storage_policy: StoragePolicy,
    pub edit_title_policy: EditTitlePolicy,
    pub page_url: String,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            storage_policy: StoragePolicy::default(),
            edit_title_policy: EditTitlePolicy::default(),
            page_url: DEFAULT_PAGE_URL.to_string(),
        }
    }
}
