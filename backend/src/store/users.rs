use rusqlite::{OptionalExtension, Row};

use super::Database;
use crate::error::StoreError;

/// A demo account as seen by the login routes. The password never leaves the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub role: String,
}

impl User {
    pub(super) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            username: row.get(1)?,
            role: row.get(2)?,
        })
    }
}

impl Database {
    /// Exact username and password match, both bound as parameters.
    pub async fn find_user(&self, username: &str, password: &str) -> Result<Option<User>, StoreError> {
        let (username, password) = (username.to_owned(), password.to_owned());
        let user = self
            .interact(move |conn| {
                conn.query_row(
                    "SELECT id, username, role FROM users WHERE username = ?1 AND password = ?2",
                    (username, password),
                    User::from_row,
                )
                .optional()
            })
            .await??;
        Ok(user)
    }
}
