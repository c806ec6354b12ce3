//! `fetch` wrappers for the task board API.

use serde::de::DeserializeOwned;
use taskboard_shared::{
    CreateTaskRequest, LoginRequest, LoginResponse, MessageBody, Status, Task, TaskEnvelope,
    TaskList, UpdateStatusRequest,
};
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::{console, Request, RequestInit, Response, UrlSearchParams};

use crate::LoginMode;

#[derive(Debug, Clone)]
pub enum ApiFailure {
    /// The request never got an HTTP response.
    Network,
    /// The API answered with a non-2xx status and this message.
    Rejected(String),
    Malformed(String),
}

impl ApiFailure {
    pub fn message(&self) -> String {
        match self {
            ApiFailure::Network => "Network error".to_string(),
            ApiFailure::Rejected(message) => message.clone(),
            ApiFailure::Malformed(_) => "Unexpected response".to_string(),
        }
    }
}

fn api_url(path: &str) -> String {
    format!("{}{}", option_env!("TASKBOARD_API_BASE").unwrap_or(""), path)
}

async fn send(method: &str, path: &str, body: Option<String>) -> Result<(u16, String), ApiFailure> {
    let opts = RequestInit::new();
    opts.set_method(method);
    if let Some(body) = &body {
        opts.set_body(&JsValue::from_str(body));
    }

    let request = Request::new_with_str_and_init(&api_url(path), &opts)
        .map_err(|_| ApiFailure::Network)?;
    if body.is_some() {
        request
            .headers()
            .set("Content-Type", "application/json")
            .map_err(|_| ApiFailure::Network)?;
    }

    let window = web_sys::window().ok_or(ApiFailure::Network)?;
    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|_| ApiFailure::Network)?
        .into();

    let text_promise = response.text().map_err(|_| ApiFailure::Network)?;
    let text = JsFuture::from(text_promise)
        .await
        .map_err(|_| ApiFailure::Network)?
        .as_string()
        .ok_or(ApiFailure::Network)?;

    Ok((response.status(), text))
}

fn decode<T: DeserializeOwned>(status: u16, text: &str) -> Result<T, ApiFailure> {
    if (200..300).contains(&status) {
        return serde_json::from_str(text).map_err(|e| {
            console::log_1(&format!("Failed to parse JSON: {}", e).into());
            ApiFailure::Malformed(e.to_string())
        });
    }
    let message = serde_json::from_str::<MessageBody>(text)
        .map(|body| body.message)
        .unwrap_or_else(|_| format!("Request failed ({})", status));
    Err(ApiFailure::Rejected(message))
}

fn encode<T: serde::Serialize>(body: &T) -> Result<String, ApiFailure> {
    serde_json::to_string(body).map_err(|e| ApiFailure::Malformed(e.to_string()))
}

pub async fn login(mode: LoginMode, username: String, password: String) -> Result<LoginResponse, ApiFailure> {
    let body = encode(&LoginRequest { username, password })?;
    let (status, text) = send("POST", mode.path(), Some(body)).await?;
    decode(status, &text)
}

pub async fn fetch_tasks(username: &str) -> Result<Vec<Task>, ApiFailure> {
    let params = UrlSearchParams::new().map_err(|_| ApiFailure::Network)?;
    params.append("username", username);
    let query = String::from(params.to_string());

    let (status, text) = send("GET", &format!("/api/tasks?{}", query), None).await?;
    decode::<TaskList>(status, &text).map(|list| list.tasks)
}

pub async fn create_task(request: CreateTaskRequest) -> Result<Task, ApiFailure> {
    let body = encode(&request)?;
    let (status, text) = send("POST", "/api/tasks", Some(body)).await?;
    decode::<TaskEnvelope>(status, &text).map(|envelope| envelope.task)
}

pub async fn update_status(id: i64, status: Status) -> Result<MessageBody, ApiFailure> {
    let body = encode(&UpdateStatusRequest { status })?;
    let (code, text) = send("PATCH", &format!("/api/tasks/{}", id), Some(body)).await?;
    decode(code, &text)
}
