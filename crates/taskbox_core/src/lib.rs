//! Core domain logic for Taskbox.
//! This crate is the single source of truth for task list invariants.

pub mod app;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod settings;
pub mod share;
pub mod ui;

pub use app::{DialogAction, DialogContext, Handled, TaskApp, UiEvent, COPY_NOTIFICATION};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::task::{Task, TaskDraft, TaskId};
pub use repo::kv_store::{KvStore, MemoryKvStore, SqliteKvStore, StorageError, StorageResult};
pub use repo::task_repo::{KvTaskRepository, TaskRepository, TASKS_KEY};
pub use service::task_service::{Mutation, TaskService, TaskServiceError, TaskServiceResult};
pub use settings::{EditTitlePolicy, SessionSettings, StoragePolicy, DEFAULT_PAGE_URL};
pub use share::dispatch::{
    Browser, Clipboard, ClipboardError, ClipboardOutcome, ClipboardReply, ShareError,
};
pub use share::format::format_task_text;
pub use share::targets::{share_link, ShareTarget};
pub use ui::modal::{HandlerScope, ModalController, ModalKind, ModalState, PointerTarget};
pub use ui::notify::{Notification, Notifier, NOTIFICATION_TTL};
pub use ui::render::{render, ListView, PlainText, RowAction, TaskRow};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
