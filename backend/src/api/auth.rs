use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};
use serde_json::Value;
use taskboard_shared::{LoginRequest, LoginResponse};
use tracing::{info, warn};
use validator::Validate;

use super::AppState;
use crate::error::{ApiError, StoreError};

/// Login with bound parameters and validated input.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(request) = payload.map_err(|_| ApiError::Validation("Invalid input"))?;
    request
        .validate()
        .map_err(|_| ApiError::Validation("Invalid input"))?;

    let Some(user) = state.db.find_user(&request.username, &request.password).await? else {
        warn!(username = %request.username, "login rejected");
        return Err(ApiError::InvalidCredentials);
    };

    info!(username = %user.username, role = %user.role, "login accepted");
    Ok(Json(LoginResponse {
        message: format!("Welcome {}", user.username),
        role: Some(user.role),
        token: user.username,
    }))
}

/// Whatever the caller sent, each field turned into the text that gets pasted
/// into the query. Absent fields read as empty strings; any other JSON value
/// is stringified rather than rejected, so one odd field never drops the rest.
#[derive(Debug, Default, PartialEq)]
pub struct RawCredentials {
    username: String,
    password: String,
}

impl RawCredentials {
    fn from_body(body: &Value) -> Self {
        let field = |name: &str| body.get(name).map(interpolated).unwrap_or_default();
        Self {
            username: field("username"),
            password: field("password"),
        }
    }
}

/// Text a JSON value becomes when spliced into a string template.
fn interpolated(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => "null".to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => interpolated(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Login that pastes the raw inputs into the SQL text. Injectable on purpose.
pub async fn login_vulnerable(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let credentials = payload
        .map(|Json(body)| RawCredentials::from_body(&body))
        .unwrap_or_default();

    let users = state
        .db
        .find_users_interpolated(&credentials.username, &credentials.password)
        .await
        .map_err(|err| match err {
            StoreError::Sqlite(err) => ApiError::Query(err.to_string()),
            other => ApiError::Store(other),
        })?;

    let Some(user) = users.into_iter().next() else {
        return Err(ApiError::InvalidCredentials);
    };

    warn!(username = %user.username, "vulnerable login accepted");
    Ok(Json(LoginResponse {
        message: format!("Logged in as {} ({})", user.username, user.role),
        role: None,
        token: user.username,
    }))
}
