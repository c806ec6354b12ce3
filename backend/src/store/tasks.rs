use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::Row;
use taskboard_shared::{CreateTaskRequest, Status, Task};
use tracing::debug;

use super::Database;
use crate::error::StoreError;

const TASK_COLUMNS: &str = "id, username, title, description, status, created_at";

fn task_from_row(row: &Row<'_>) -> rusqlite::Result<Task> {
    let status: String = row.get(4)?;
    let status = status
        .parse::<Status>()
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(err)))?;

    Ok(Task {
        id: row.get(0)?,
        username: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        status,
        created_at: row.get::<_, DateTime<Utc>>(5)?,
    })
}

// Fixed-width so that text ordering in SQLite matches time ordering.
fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

impl Database {
    /// All tasks owned by `username`, newest first.
    pub async fn list_tasks(&self, username: &str) -> Result<Vec<Task>, StoreError> {
        let username = username.to_owned();
        let tasks = self
            .interact(move |conn| -> rusqlite::Result<Vec<Task>> {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {TASK_COLUMNS} FROM tasks WHERE username = ?1 ORDER BY created_at DESC, id DESC"
                ))?;
                let tasks = stmt
                    .query_map([username], task_from_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(tasks)
            })
            .await??;
        Ok(tasks)
    }

    /// Insert a task and read it back with its assigned id and timestamp.
    pub async fn create_task(&self, new: &CreateTaskRequest) -> Result<Task, StoreError> {
        let new = new.clone();
        let task = self
            .interact(move |conn| -> rusqlite::Result<Task> {
                conn.execute(
                    "INSERT INTO tasks (username, title, description, status, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
                    (
                        &new.username,
                        &new.title,
                        &new.description,
                        new.status.as_str(),
                        timestamp(Utc::now()),
                    ),
                )?;
                let id = conn.last_insert_rowid();
                debug!(id, username = %new.username, "task inserted");

                conn.query_row(
                    &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"),
                    [id],
                    task_from_row,
                )
            })
            .await??;
        Ok(task)
    }

    /// Set the status of task `id`. Returns `false` when no such task exists.
    pub async fn update_status(&self, id: i64, status: Status) -> Result<bool, StoreError> {
        let changed = self
            .interact(move |conn| {
                conn.execute(
                    "UPDATE tasks SET status = ?1 WHERE id = ?2",
                    (status.as_str(), id),
                )
            })
            .await??;
        Ok(changed > 0)
    }
}
