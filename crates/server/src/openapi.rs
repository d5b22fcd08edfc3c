use axum::Json;
use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct TodoDoc {
    pub id: i64,
    pub title: String,
    pub done: bool,
    /// `YYYY-MM-DD HH:MM:SS`, UTC
    pub created_at: String,
}

/// `done` also accepts `"true"`, `1` and `"1"`; anything else is false.
#[derive(ToSchema)]
pub struct CreateTodoDoc {
    pub title: String,
    pub done: Option<bool>,
}

#[derive(ToSchema)]
pub struct UpdateTodoDoc {
    pub title: Option<String>,
    pub done: Option<bool>,
}

#[derive(ToSchema)]
pub struct ErrorResponse { pub error: String }

#[derive(ToSchema)]
pub struct HealthResponse { pub ok: bool, pub time: String }

#[derive(ToSchema)]
pub struct VersionResponse { pub version: String }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::version,
        crate::routes::todos::list_todos,
        crate::routes::todos::get_todo,
        crate::routes::todos::create_todo,
        crate::routes::todos::update_todo,
        crate::routes::todos::delete_todo,
    ),
    components(
        schemas(
            TodoDoc,
            CreateTodoDoc,
            UpdateTodoDoc,
            ErrorResponse,
            HealthResponse,
            VersionResponse,
        )
    ),
    tags(
        (name = "todos", description = "Todo records"),
        (name = "health", description = "Liveness and version"),
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
