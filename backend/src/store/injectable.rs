//! The one query in the store built by string interpolation.
//!
//! It exists to demonstrate SQL injection and must keep splicing the raw
//! inputs into the statement text. Nothing else in the crate may call it
//! except the `/api/login-vulnerable` handler.

use tracing::warn;

use super::{Database, User};
use crate::error::StoreError;

impl Database {
    /// Run `SELECT ... WHERE username='<username>' AND password='<password>'`
    /// with both values pasted in verbatim. Returns every matching row; a
    /// malformed statement comes back as `StoreError::Sqlite` for the caller
    /// to echo.
    pub async fn find_users_interpolated(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Vec<User>, StoreError> {
        let sql = format!(
            "SELECT id, username, role FROM users WHERE username='{username}' AND password='{password}'"
        );
        warn!(%sql, "running interpolated login query");

        let users = self
            .interact(move |conn| -> rusqlite::Result<Vec<User>> {
                let mut stmt = conn.prepare(&sql)?;
                let users = stmt
                    .query_map([], User::from_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(users)
            })
            .await??;
        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn honest_credentials_still_work() {
        let db = Database::in_memory().unwrap();
        let users = db.find_users_interpolated("bob", "builder").await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].username, "bob");
    }

    #[tokio::test]
    async fn always_true_clause_matches_every_user() {
        let db = Database::in_memory().unwrap();
        let users = db
            .find_users_interpolated("nobody", "' OR '1'='1")
            .await
            .unwrap();
        assert_eq!(users.len(), 3);
        assert_eq!(users[0].username, "alice");
    }

    #[tokio::test]
    async fn comment_injection_skips_password_check() {
        let db = Database::in_memory().unwrap();
        let users = db.find_users_interpolated("charlie'--", "").await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].role, "user");
    }

    #[tokio::test]
    async fn broken_syntax_surfaces_sqlite_error() {
        let db = Database::in_memory().unwrap();
        let err = db.find_users_interpolated("alice'", "x").await.unwrap_err();
        assert!(matches!(err, StoreError::Sqlite(_)), "{err}");
    }
}
