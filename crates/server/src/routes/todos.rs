use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use service::storage::Record;
use service::todos::{CreateTodo, UpdateTodo};

use super::AppState;
use crate::errors::ApiError;

// 请求体缺失、非 JSON 或格式错误时按空对象处理，交给字段校验；超出大小限制返回 413
fn body_or_empty<T: Default>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match body {
        Ok(Json(b)) => Ok(b),
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            Err(ApiError::PayloadTooLarge)
        }
        Err(_) => Ok(T::default()),
    }
}

/// 列出所有记录（按 id 倒序）
#[utoipa::path(get, path = "/api/todos", tag = "todos", responses((status = 200, description = "All records, newest first", body = [crate::openapi::TodoDoc])))]
pub async fn list_todos(State(state): State<AppState>) -> Json<Vec<Record>> {
    Json(state.todos.list().await)
}

/// 获取指定记录
#[utoipa::path(get, path = "/api/todos/{id}", tag = "todos", params(("id" = String, Path, description = "Record id")), responses((status = 200, description = "Record", body = crate::openapi::TodoDoc), (status = 400, description = "Invalid id", body = crate::openapi::ErrorResponse), (status = 404, description = "Not found", body = crate::openapi::ErrorResponse)))]
pub async fn get_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Record>, ApiError> {
    Ok(Json(state.todos.get(&id).await?))
}

/// 创建记录
#[utoipa::path(post, path = "/api/todos", tag = "todos", request_body = crate::openapi::CreateTodoDoc, responses((status = 201, description = "Created", body = crate::openapi::TodoDoc), (status = 400, description = "Missing or empty title", body = crate::openapi::ErrorResponse), (status = 413, description = "Body too large", body = crate::openapi::ErrorResponse), (status = 500, description = "Persist failure", body = crate::openapi::ErrorResponse)))]
pub async fn create_todo(
    State(state): State<AppState>,
    body: Result<Json<CreateTodo>, JsonRejection>,
) -> Result<(StatusCode, Json<Record>), ApiError> {
    let input = body_or_empty(body)?;
    let record = state.todos.create(input).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// 更新指定记录（部分字段）
#[utoipa::path(put, path = "/api/todos/{id}", tag = "todos", params(("id" = String, Path, description = "Record id")), request_body = crate::openapi::UpdateTodoDoc, responses((status = 200, description = "Updated", body = crate::openapi::TodoDoc), (status = 400, description = "Invalid id, empty title or nothing to update", body = crate::openapi::ErrorResponse), (status = 413, description = "Body too large", body = crate::openapi::ErrorResponse), (status = 404, description = "Not found", body = crate::openapi::ErrorResponse), (status = 500, description = "Persist failure", body = crate::openapi::ErrorResponse)))]
pub async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<UpdateTodo>, JsonRejection>,
) -> Result<Json<Record>, ApiError> {
    let input = body_or_empty(body)?;
    Ok(Json(state.todos.update(&id, input).await?))
}

/// 删除指定记录
#[utoipa::path(delete, path = "/api/todos/{id}", tag = "todos", params(("id" = String, Path, description = "Record id")), responses((status = 204, description = "Deleted"), (status = 400, description = "Invalid id", body = crate::openapi::ErrorResponse), (status = 404, description = "Not found", body = crate::openapi::ErrorResponse), (status = 500, description = "Persist failure", body = crate::openapi::ErrorResponse)))]
pub async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.todos.delete(&id).await?;
    // 无响应体
    Ok(StatusCode::NO_CONTENT)
}
