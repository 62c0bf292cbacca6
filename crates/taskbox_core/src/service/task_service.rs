//! Task store use-case service.
//!
//! # Responsibility
//! - Own the live, ordered task collection for one session.
//! - Persist the full collection after every mutation.
//!
//! # Invariants
//! - Insertion order is preserved; edits never reorder.
//! - No two tasks share an id.
//! - After a successful mutation the stored blob equals the live collection.
//! - A failed write keeps the in-memory change; nothing is rolled back.

use crate::model::task::{Task, TaskId};
use crate::repo::kv_store::StorageError;
use crate::repo::task_repo::TaskRepository;
use crate::settings::{EditTitlePolicy, StoragePolicy};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type TaskServiceResult<T> = Result<T, TaskServiceError>;

/// Errors surfaced by the task store.
#[derive(Debug)]
pub enum TaskServiceError {
    /// Startup load failed under the strict storage policy.
    Load(StorageError),
    /// A mutation was applied in memory but could not be written.
    Persist(StorageError),
}

impl Display for TaskServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Load(err) => write!(f, "failed to load tasks: {err}"),
            Self::Persist(err) => write!(f, "failed to persist tasks: {err}"),
        }
    }
}

impl Error for TaskServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Load(err) | Self::Persist(err) => Some(err),
        }
    }
}

/// Whether a store operation changed the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Applied,
    Ignored,
}

impl Mutation {
    pub fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// In-memory task collection backed by a [`TaskRepository`].
pub struct TaskService<R: TaskRepository> {
    repo: R,
    tasks: Vec<Task>,
    edit_title_policy: EditTitlePolicy,
}

impl<R: TaskRepository> TaskService<R> {
    /// Loads the stored collection and builds the live copy.
    ///
    /// Under [`StoragePolicy::ResetOnMalformed`] an undecodable blob yields an
    /// empty collection; the blob itself is left alone until the next write.
    pub fn open(repo: R, storage_policy: StoragePolicy) -> TaskServiceResult<Self> {
        let tasks = match (repo.load(), storage_policy) {
            (Ok(tasks), _) => tasks,
            (Err(StorageError::Malformed(message)), StoragePolicy::ResetOnMalformed) => {
                warn!(
                    "event=tasks_open module=service status=reset reason=malformed detail_len={}",
                    message.len()
                );
                Vec::new()
            }
            (Err(err), _) => return Err(TaskServiceError::Load(err)),
        };

        info!(
            "event=tasks_open module=service status=ok count={}",
            tasks.len()
        );
        Ok(Self {
            repo,
            tasks,
            edit_title_policy: EditTitlePolicy::default(),
        })
    }

    pub fn with_edit_title_policy(mut self, policy: EditTitlePolicy) -> Self {
        self.edit_title_policy = policy;
        self
    }

    /// Appends a new task built from raw form input.
    ///
    /// Blank titles (after trimming) are ignored without an error.
    pub fn create(&mut self, title: &str, description: &str) -> TaskServiceResult<Option<TaskId>> {
        let Some(task) = Task::from_input(title, description) else {
            info!("event=task_create module=service status=noop reason=blank_title");
            return Ok(None);
        };

        let id = task.id.clone();
        self.tasks.push(task);
        self.persist("task_create")?;
        info!("event=task_create module=service status=ok task_id={id}");
        Ok(Some(id))
    }

    /// Replaces title and description of the task with `id`.
    ///
    /// Values are stored as given; callers trim them at the dialog boundary.
    /// Unknown ids are ignored.
    pub fn update(
        &mut self,
        id: &TaskId,
        title: &str,
        description: &str,
    ) -> TaskServiceResult<Mutation> {
        if self.edit_title_policy == EditTitlePolicy::RequireTitle && title.trim().is_empty() {
            info!("event=task_update module=service status=noop reason=blank_title task_id={id}");
            return Ok(Mutation::Ignored);
        }

        let Some(task) = self.tasks.iter_mut().find(|task| &task.id == id) else {
            info!("event=task_update module=service status=noop reason=not_found task_id={id}");
            return Ok(Mutation::Ignored);
        };

        task.title = title.to_string();
        task.description = description.to_string();
        self.persist("task_update")?;
        info!("event=task_update module=service status=ok task_id={id}");
        Ok(Mutation::Applied)
    }

    /// Removes the task with `id` and writes the collection back.
    ///
    /// The write happens even when nothing matched.
    pub fn remove(&mut self, id: &TaskId) -> TaskServiceResult<Mutation> {
        let before = self.tasks.len();
        self.tasks.retain(|task| &task.id != id);
        let outcome = if self.tasks.len() < before {
            Mutation::Applied
        } else {
            Mutation::Ignored
        };

        self.persist("task_remove")?;
        info!(
            "event=task_remove module=service status={} task_id={id}",
            if outcome.is_applied() { "ok" } else { "noop" }
        );
        Ok(outcome)
    }

    /// Live ordered collection.
    pub fn list(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| &task.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    fn persist(&mut self, event: &'static str) -> TaskServiceResult<()> {
        self.repo.save(&self.tasks).map_err(|err| {
            warn!(
                "event={event} module=service status=diverged count={} error={}",
                self.tasks.len(),
                err
            );
            TaskServiceError::Persist(err)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{Mutation, TaskService};
    use crate::model::task::TaskId;
    use crate::repo::kv_store::MemoryKvStore;
    use crate::repo::task_repo::KvTaskRepository;
    use crate::settings::{EditTitlePolicy, StoragePolicy};

    fn empty_service() -> TaskService<KvTaskRepository<MemoryKvStore>> {
        TaskService::open(KvTaskRepository::new(MemoryKvStore::new()), StoragePolicy::Strict)
            .unwrap()
    }

    #[test]
    fn update_with_blank_title_is_stored_verbatim_by_default() {
        let mut service = empty_service();
        let id = service.create("Draft", "").unwrap().unwrap();

        let outcome = service.update(&id, "", "body").unwrap();
        assert_eq!(outcome, Mutation::Applied);
        assert_eq!(service.get(&id).unwrap().title, "");
    }

    #[test]
    fn require_title_policy_ignores_blank_edit() {
        let mut service = empty_service().with_edit_title_policy(EditTitlePolicy::RequireTitle);
        let id = service.create("Draft", "").unwrap().unwrap();

        let outcome = service.update(&id, "  ", "body").unwrap();
        assert_eq!(outcome, Mutation::Ignored);
        assert_eq!(service.get(&id).unwrap().title, "Draft");
    }

    #[test]
    fn update_unknown_id_is_ignored() {
        let mut service = empty_service();
        let outcome = service
            .update(&TaskId::from("missing"), "New", "Desc")
            .unwrap();
        assert_eq!(outcome, Mutation::Ignored);
        assert!(service.is_empty());
    }
}
