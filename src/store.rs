//! SQLite-backed task persistence.
//!
//! A single connection behind a `tokio::sync::Mutex`; every operation is an
//! independent request/response with no state between calls. Concurrent
//! updates to the same id are last-write-wins. The connection carries a
//! bounded busy timeout so a contended database fails instead of hanging.

use std::time::Duration;

use chrono::{DateTime, Utc};
use rusqlite::{params, types::Type, Connection, OptionalExtension, Row};
use thiserror::Error;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::task::{NewTask, Priority, Task, TaskPatch};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS todos (
    id          TEXT PRIMARY KEY,
    title       TEXT NOT NULL,
    description TEXT,
    priority    TEXT NOT NULL DEFAULT 'medium',
    completed   INTEGER NOT NULL DEFAULT 0,
    created_at  TEXT NOT NULL
);
";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("todo not found")]
    NotFound,

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

/// Task store over an embedded SQLite database.
pub struct TaskStore {
    conn: Mutex<Connection>,
}

impl TaskStore {
    /// Open the database named by `database_url` and ensure the schema
    /// exists. Accepts a bare path, a `sqlite://` URL, or `:memory:`.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let path = database_url
            .strip_prefix("sqlite://")
            .unwrap_or(database_url);

        let conn = if path == ":memory:" {
            Connection::open_in_memory()?
        } else {
            Connection::open(path)?
        };
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// All tasks, newest-created-first. Insertion order breaks timestamp
    /// ties so the ordering is stable for any insertion sequence.
    pub async fn list(&self) -> Result<Vec<Task>, StoreError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT id, title, description, priority, completed, created_at
             FROM todos ORDER BY created_at DESC, rowid DESC",
        )?;
        let tasks = stmt
            .query_map([], row_to_task)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tasks)
    }

    pub async fn get(&self, id: Uuid) -> Result<Task, StoreError> {
        let conn = self.conn.lock().await;
        fetch(&conn, id)
    }

    /// Persist a new task, assigning its id and creation timestamp.
    pub async fn create(&self, new: NewTask) -> Result<Task, StoreError> {
        let task = Task {
            id: Uuid::new_v4(),
            title: new.title,
            description: new.description,
            priority: new.priority,
            completed: new.completed,
            created_at: Utc::now(),
        };

        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO todos (id, title, description, priority, completed, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                task.id.to_string(),
                task.title,
                task.description,
                task.priority.as_str(),
                task.completed,
                task.created_at,
            ],
        )?;
        Ok(task)
    }

    /// Apply a partial update and return the updated task. `id` and
    /// `created_at` are never touched.
    pub async fn update(&self, id: Uuid, patch: TaskPatch) -> Result<Task, StoreError> {
        let conn = self.conn.lock().await;
        let mut task = fetch(&conn, id)?;
        patch.apply(&mut task);
        conn.execute(
            "UPDATE todos SET title = ?2, description = ?3, priority = ?4, completed = ?5
             WHERE id = ?1",
            params![
                task.id.to_string(),
                task.title,
                task.description,
                task.priority.as_str(),
                task.completed,
            ],
        )?;
        Ok(task)
    }

    /// Hard-delete a task, returning its last snapshot.
    pub async fn delete(&self, id: Uuid) -> Result<Task, StoreError> {
        let conn = self.conn.lock().await;
        let task = fetch(&conn, id)?;
        conn.execute("DELETE FROM todos WHERE id = ?1", params![id.to_string()])?;
        Ok(task)
    }
}

fn fetch(conn: &Connection, id: Uuid) -> Result<Task, StoreError> {
    conn.query_row(
        "SELECT id, title, description, priority, completed, created_at
         FROM todos WHERE id = ?1",
        params![id.to_string()],
        row_to_task,
    )
    .optional()?
    .ok_or(StoreError::NotFound)
}

fn row_to_task(row: &Row<'_>) -> rusqlite::Result<Task> {
    let id: String = row.get(0)?;
    let id = Uuid::parse_str(&id)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))?;

    let priority: String = row.get(3)?;
    let priority = priority
        .parse::<Priority>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?;

    let created_at: DateTime<Utc> = row.get(5)?;

    Ok(Task {
        id,
        title: row.get(1)?,
        description: row.get(2)?,
        priority,
        completed: row.get(4)?,
        created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_store() -> TaskStore {
        TaskStore::connect(":memory:").await.unwrap()
    }

    fn new_task(title: &str, priority: Priority) -> NewTask {
        NewTask {
            title: title.to_string(),
            description: None,
            priority,
            completed: false,
        }
    }

    #[tokio::test]
    async fn create_then_get_round_trips_user_fields() {
        let store = memory_store().await;
        let created = store
            .create(NewTask {
                title: "Write report".to_string(),
                description: Some("quarterly numbers".to_string()),
                priority: Priority::High,
                completed: false,
            })
            .await
            .unwrap();

        let fetched = store.get(created.id).await.unwrap();
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.title, "Write report");
        assert_eq!(fetched.description.as_deref(), Some("quarterly numbers"));
        assert_eq!(fetched.priority, Priority::High);
        assert!(!fetched.completed);
        assert_eq!(fetched.created_at, created.created_at);
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let store = memory_store().await;
        for title in ["first", "second", "third"] {
            store.create(new_task(title, Priority::Medium)).await.unwrap();
        }

        let titles: Vec<String> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, ["third", "second", "first"]);
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found_and_changes_nothing() {
        let store = memory_store().await;
        store.create(new_task("only", Priority::Low)).await.unwrap();

        let err = store
            .update(Uuid::new_v4(), TaskPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound));

        let tasks = store.list().await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "only");
    }

    #[tokio::test]
    async fn update_applies_patch_and_preserves_identity() {
        let store = memory_store().await;
        let created = store.create(new_task("draft", Priority::Low)).await.unwrap();

        let updated = store
            .update(
                created.id,
                TaskPatch {
                    title: Some("final".to_string()),
                    priority: Some(Priority::High),
                    completed: Some(true),
                    ..TaskPatch::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.title, "final");
        assert_eq!(updated.priority, Priority::High);
        assert!(updated.completed);

        let fetched = store.get(created.id).await.unwrap();
        assert_eq!(fetched, updated);
    }

    #[tokio::test]
    async fn second_delete_is_not_found() {
        let store = memory_store().await;
        let created = store.create(new_task("gone", Priority::Medium)).await.unwrap();

        let deleted = store.delete(created.id).await.unwrap();
        assert_eq!(deleted.id, created.id);

        let err = store.delete(created.id).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[tokio::test]
    async fn file_backed_store_survives_reconnect() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("todos.db").display());

        let id = {
            let store = TaskStore::connect(&url).await.unwrap();
            store
                .create(new_task("persisted", Priority::Medium))
                .await
                .unwrap()
                .id
        };

        let store = TaskStore::connect(&url).await.unwrap();
        let task = store.get(id).await.unwrap();
        assert_eq!(task.title, "persisted");
    }
}
