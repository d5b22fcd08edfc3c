use std::path::PathBuf;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::get,
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use configs::CorsConfig;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{warn, Level};

use common::types::{Health, Version};
use service::todos::TodoService;

use crate::openapi;

pub mod todos;

/// JSON request bodies above this size are refused.
pub const BODY_LIMIT: usize = 256 * 1024;

/// Shared router state: the todo service over the injected store.
#[derive(Clone)]
pub struct AppState {
    pub todos: TodoService,
}

impl AppState {
    pub fn new(todos: TodoService) -> Self {
        Self { todos }
    }
}

#[utoipa::path(get, path = "/api/health", tag = "health", responses((status = 200, description = "Alive", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { ok: true, time: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true) })
}

#[utoipa::path(get, path = "/api/version", tag = "health", responses((status = 200, description = "Build version", body = crate::openapi::VersionResponse)))]
pub async fn version() -> Json<Version> {
    Json(Version { version: env!("CARGO_PKG_VERSION").to_string() })
}

/// CORS policy from configuration; `*` allows any origin.
pub fn build_cors(cfg: &CorsConfig) -> CorsLayer {
    let origin = if cfg.allows_any() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(cfg.allow_origins.iter().filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(origin = %o, "ignoring unusable CORS origin");
                None
            }
        }))
    };
    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// `/api` routes only, with state applied.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/todos", get(todos::list_todos).post(todos::create_todo))
        .route(
            "/todos/:id",
            get(todos::get_todo).put(todos::update_todo).delete(todos::delete_todo),
        )
        .route("/health", get(health))
        .route("/version", get(version))
        .with_state(state)
}

/// Build the full application router: API, OpenAPI document, optional static files.
pub fn build_router(state: AppState, cors: CorsLayer, public_dir: Option<PathBuf>) -> Router {
    let mut app = Router::new()
        .nest("/api", api_router(state))
        .route("/api-docs/openapi.json", get(openapi::openapi_json));

    if let Some(dir) = public_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app.layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
