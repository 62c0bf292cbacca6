//! Task collection persistence adapter.
//!
//! # Responsibility
//! - Load and save the whole task collection as one JSON blob.
//! - Reject stored payloads that break collection invariants.
//!
//! # Invariants
//! - The blob always lives under [`TASKS_KEY`].
//! - `save` overwrites the blob with the full collection; it never appends.
//! - `load` of a missing blob is an empty collection.

use crate::model::task::Task;
use crate::repo::kv_store::{KvStore, StorageError, StorageResult};
use log::{debug, error};
use std::collections::HashSet;

/// Fixed key holding the serialized collection.
pub const TASKS_KEY: &str = "tasks";

/// Persistence contract for the task collection.
pub trait TaskRepository {
    fn load(&self) -> StorageResult<Vec<Task>>;
    fn save(&mut self, tasks: &[Task]) -> StorageResult<()>;
}

/// Task repository over any [`KvStore`].
pub struct KvTaskRepository<S: KvStore> {
    store: S,
}

impl<S: KvStore> KvTaskRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

impl<S: KvStore> TaskRepository for KvTaskRepository<S> {
    fn load(&self) -> StorageResult<Vec<Task>> {
        let Some(raw) = self.store.get(TASKS_KEY)? else {
            debug!("event=tasks_load module=repo status=ok source=empty count=0");
            return Ok(Vec::new());
        };

        match decode_tasks(&raw) {
            Ok(tasks) => {
                debug!(
                    "event=tasks_load module=repo status=ok source=store count={}",
                    tasks.len()
                );
                Ok(tasks)
            }
            Err(err) => {
                error!(
                    "event=tasks_load module=repo status=error error_code=malformed bytes={}",
                    raw.len()
                );
                Err(err)
            }
        }
    }

    fn save(&mut self, tasks: &[Task]) -> StorageResult<()> {
        let encoded = encode_tasks(tasks)?;
        if let Err(err) = self.store.set(TASKS_KEY, &encoded) {
            error!(
                "event=tasks_save module=repo status=error count={} error={}",
                tasks.len(),
                err
            );
            return Err(err);
        }
        debug!(
            "event=tasks_save module=repo status=ok count={} bytes={}",
            tasks.len(),
            encoded.len()
        );
        Ok(())
    }
}

/// Serializes the collection into its durable JSON form.
pub fn encode_tasks(tasks: &[Task]) -> StorageResult<String> {
    serde_json::to_string(tasks).map_err(StorageError::Encode)
}

/// Parses a durable JSON blob, enforcing id uniqueness.
pub fn decode_tasks(raw: &str) -> StorageResult<Vec<Task>> {
    let tasks: Vec<Task> =
        serde_json::from_str(raw).map_err(|err| StorageError::Malformed(err.to_string()))?;

    let mut seen = HashSet::with_capacity(tasks.len());
    for task in &tasks {
        if !seen.insert(&task.id) {
            return Err(StorageError::Malformed(format!(
                "duplicate task id `{}`",
                task.id
            )));
        }
    }
    Ok(tasks)
}

#[cfg(test)]
mod tests {
    use super::{decode_tasks, encode_tasks};
    use crate::model::task::{Task, TaskId};
    use crate::repo::kv_store::StorageError;

    #[test]
    fn encode_uses_flat_wire_fields() {
        let task = Task {
            id: TaskId::from("1700000000000"),
            title: "Buy milk".to_string(),
            description: String::new(),
        };
        let encoded = encode_tasks(&[task]).unwrap();
        assert_eq!(
            encoded,
            r#"[{"id":"1700000000000","title":"Buy milk","description":""}]"#
        );
    }

    #[test]
    fn decode_rejects_duplicate_ids() {
        let raw = r#"[{"id":"a","title":"x","description":""},{"id":"a","title":"y","description":""}]"#;
        let err = decode_tasks(raw).unwrap_err();
        assert!(matches!(err, StorageError::Malformed(message) if message.contains("duplicate")));
    }

    #[test]
    fn decode_rejects_non_array_payload() {
        let err = decode_tasks(r#"{"id":"a"}"#).unwrap_err();
        assert!(matches!(err, StorageError::Malformed(_)));
    }
}
