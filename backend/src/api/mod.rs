//! Router, shared state and the transport-level guards.

mod auth;
mod tasks;

use axum::{
    extract::{DefaultBodyLimit, Request, State},
    http::{
        header::{CONTENT_TYPE, HOST, ORIGIN, REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS},
        HeaderValue, Method, StatusCode,
    },
    middleware::{self, Next},
    response::{IntoResponse, Json, Response},
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;
use taskboard_shared::MessageBody;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::ServeDir,
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};
use tracing::warn;

use crate::config::Config;
use crate::store::Database;

pub const BODY_LIMIT: usize = 64 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

/// Origins allowed to call the API from another site.
#[derive(Debug)]
struct OriginGate {
    allowed: Vec<HeaderValue>,
}

impl OriginGate {
    fn permits(&self, origin: &HeaderValue, host: Option<&HeaderValue>) -> bool {
        if self.allowed.contains(origin) {
            return true;
        }
        // Pages served by this process are same-origin.
        let (Ok(origin), Some(Ok(host))) = (origin.to_str(), host.map(|h| h.to_str())) else {
            return false;
        };
        origin
            .strip_prefix("http://")
            .or_else(|| origin.strip_prefix("https://"))
            .is_some_and(|authority| authority == host)
    }
}

async fn reject_foreign_origin(
    State(gate): State<Arc<OriginGate>>,
    request: Request,
    next: Next,
) -> Response {
    if let Some(origin) = request.headers().get(ORIGIN) {
        if !gate.permits(origin, request.headers().get(HOST)) {
            warn!(origin = ?origin, "cross-origin request refused");
            return (
                StatusCode::FORBIDDEN,
                Json(MessageBody::new("Not allowed by CORS")),
            )
                .into_response();
        }
    }
    next.run(request).await
}

pub fn router(state: AppState, config: &Config) -> Router {
    let gate = Arc::new(OriginGate {
        allowed: config.allowed_origins.clone(),
    });
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(config.allowed_origins.clone()))
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);

    let api = Router::new()
        .route("/login", post(auth::login))
        .route("/login-vulnerable", post(auth::login_vulnerable))
        .route("/tasks", get(tasks::list).post(tasks::create))
        .route("/tasks/:id", patch(tasks::update_status))
        .layer(middleware::from_fn_with_state(gate, reject_foreign_origin))
        .layer(cors);

    // No Content-Security-Policy: the raw render path has to be able to run script.
    let headers = ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::if_not_present(
            X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            X_FRAME_OPTIONS,
            HeaderValue::from_static("SAMEORIGIN"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ));

    Router::new()
        .nest("/api", api)
        .fallback_service(ServeDir::new(&config.static_dir))
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(headers)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate() -> OriginGate {
        OriginGate {
            allowed: vec![HeaderValue::from_static("http://localhost:5500")],
        }
    }

    #[test]
    fn allow_listed_origin_passes() {
        let origin = HeaderValue::from_static("http://localhost:5500");
        assert!(gate().permits(&origin, None));
    }

    #[test]
    fn same_host_origin_passes() {
        let origin = HeaderValue::from_static("http://localhost:3000");
        let host = HeaderValue::from_static("localhost:3000");
        assert!(gate().permits(&origin, Some(&host)));
    }

    #[test]
    fn unknown_origin_is_refused() {
        let origin = HeaderValue::from_static("http://evil.test");
        let host = HeaderValue::from_static("localhost:3000");
        assert!(!gate().permits(&origin, Some(&host)));
        assert!(!gate().permits(&origin, None));
    }
}
