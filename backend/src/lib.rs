//! HTTP API for the task board demo.
//!
//! Two login endpoints sit side by side: `/api/login` binds its parameters,
//! `/api/login-vulnerable` splices them into the SQL text. Task descriptions
//! are stored exactly as submitted so the client can show both ways of
//! rendering them.

pub mod api;
pub mod config;
pub mod error;
pub mod store;

pub use api::{router, AppState};
pub use config::Config;
pub use error::{ApiError, ConfigError, StoreError};
pub use store::Database;
