use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use taskboard_shared::MessageBody;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("failed to seed demo users: {0}")]
    Seed(rusqlite::Error),

    #[error("database worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid listen address {value:?}: {source}")]
    InvalidAddr {
        value: String,
        source: std::net::AddrParseError,
    },

    #[error("invalid allowed origin {0:?}")]
    InvalidOrigin(String),
}

/// Every way a request can fail. Each variant becomes a `{message}` body.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(&'static str),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Not found")]
    NotFound,

    /// Raw SQLite text, only produced by the injectable login.
    #[error("Query error: {0}")]
    Query(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::Query(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            ApiError::Store(err) => {
                tracing::error!(error = %err, "store failure");
                "Server error".to_string()
            }
            other => other.to_string(),
        };
        (self.status(), Json(MessageBody::new(message))).into_response()
    }
}
