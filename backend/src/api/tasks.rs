use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use taskboard_shared::{
    is_valid_username, CreateTaskRequest, MessageBody, TaskEnvelope, TaskList, UpdateStatusRequest,
};
use tracing::info;
use validator::Validate;

use super::AppState;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct TasksQuery {
    #[serde(default)]
    username: String,
}

pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<TasksQuery>, QueryRejection>,
) -> Result<Json<TaskList>, ApiError> {
    let username = query.map(|Query(q)| q.username).unwrap_or_default();
    if !is_valid_username(&username) {
        return Err(ApiError::Validation("Invalid user"));
    }

    let tasks = state.db.list_tasks(&username).await?;
    Ok(Json(TaskList { tasks }))
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TaskEnvelope>), ApiError> {
    let Json(request) = payload.map_err(|_| ApiError::Validation("Invalid input"))?;
    request
        .validate()
        .map_err(|_| ApiError::Validation("Invalid input"))?;

    let task = state.db.create_task(&request).await?;
    info!(id = task.id, username = %task.username, status = %task.status, "task created");
    Ok((StatusCode::CREATED, Json(TaskEnvelope { task })))
}

pub async fn update_status(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> Result<Json<MessageBody>, ApiError> {
    let id = match id {
        Ok(Path(id)) if id > 0 => id,
        _ => return Err(ApiError::Validation("Bad id")),
    };
    let Json(request) = payload.map_err(|_| ApiError::Validation("Invalid status"))?;

    if !state.db.update_status(id, request.status).await? {
        return Err(ApiError::NotFound);
    }
    info!(id, status = %request.status, "task moved");
    Ok(Json(MessageBody::new("Updated")))
}
