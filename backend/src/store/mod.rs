//! SQLite-backed storage for users and tasks.
//!
//! One connection behind an async mutex; requests take turns, and each query
//! runs on tokio's blocking pool so SQLite I/O never occupies an async worker.
//! Every query in
//! `users` and `tasks` binds its parameters. The single exception lives in
//! `injectable` and is only reachable from the vulnerable login route.

mod injectable;
mod tasks;
mod users;

pub use users::User;

use rusqlite::Connection;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

use crate::error::StoreError;

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL,
        password TEXT NOT NULL,
        role TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS tasks (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL,
        title TEXT NOT NULL,
        description TEXT NOT NULL,
        status TEXT NOT NULL DEFAULT 'todo' CHECK (status IN ('todo', 'doing', 'done')),
        created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
    );

    CREATE INDEX IF NOT EXISTS idx_tasks_username ON tasks(username, created_at);
"#;

/// Demo accounts. Passwords are stored in clear text on purpose.
const SEED_USERS: [(&str, &str, &str); 3] = [
    ("alice", "wonderland", "admin"),
    ("bob", "builder", "user"),
    ("charlie", "chocolate", "user"),
];

#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open (or create) the database at `path` and seed the demo users.
    /// `:memory:` gives a fresh database that disappears with the process.
    pub fn open(path: &str) -> Result<Self, StoreError> {
        let conn = if path == ":memory:" {
            Connection::open_in_memory()?
        } else {
            Connection::open(path)?
        };
        conn.execute_batch(SCHEMA)?;
        let seeded = seed_users(&conn).map_err(StoreError::Seed)?;
        info!(path, seeded, "database ready");

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn in_memory() -> Result<Self, StoreError> {
        Self::open(":memory:")
    }

    /// Run `job` with the connection held, on the blocking pool.
    async fn interact<R, F>(&self, job: F) -> Result<R, StoreError>
    where
        F: FnOnce(&Connection) -> R + Send + 'static,
        R: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        let out = tokio::task::spawn_blocking(move || {
            let conn = conn.blocking_lock();
            job(&conn)
        })
        .await?;
        Ok(out)
    }
}

/// Insert the seed accounts unless the table already has rows.
fn seed_users(conn: &Connection) -> rusqlite::Result<usize> {
    let existing: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
    if existing > 0 {
        return Ok(0);
    }

    let mut stmt = conn.prepare("INSERT INTO users (username, password, role) VALUES (?1, ?2, ?3)")?;
    for (username, password, role) in SEED_USERS {
        stmt.execute((username, password, role))?;
    }
    Ok(SEED_USERS.len())
}
