//! HTTP handlers for `/tasks`. Each one validates, calls one service
//! function and maps the outcome to a status code.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde_json::Value;

use super::schema::{self, Issue};
use super::service;
use crate::models::{Task, TaskStats};
use crate::web::AppState;
use crate::web::errors::AppError;

const TASK_NOT_FOUND: &str = "Task not found";

/// # GET /tasks
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Task>>, AppError> {
    let tasks = service::get_all_tasks(&state.store).await?;
    Ok(Json(tasks))
}

/// # GET /tasks/{id}
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Task>, AppError> {
    service::get_task_by_id(&state.store, &id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound(TASK_NOT_FOUND))
}

/// # POST /tasks
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Task>), AppError> {
    let dto = schema::parse_create(&json_body(body)?).map_err(AppError::Validation)?;
    let task = service::create_task(&state.store, dto).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// # PATCH /tasks/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Task>, AppError> {
    let dto = schema::parse_update(&json_body(body)?).map_err(AppError::Validation)?;
    service::update_task(&state.store, &id, dto)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound(TASK_NOT_FOUND))
}

/// # DELETE /tasks/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if service::delete_task(&state.store, &id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(TASK_NOT_FOUND))
    }
}

/// # GET /tasks/stats
pub async fn stats(State(state): State<AppState>) -> Result<Json<TaskStats>, AppError> {
    let stats = service::get_task_stats(&state.store).await?;
    Ok(Json(stats))
}

/// A body that is not JSON at all is reported like any other validation failure.
fn json_body(body: Result<Json<Value>, JsonRejection>) -> Result<Value, AppError> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => Err(AppError::Validation(vec![Issue::new(
            "",
            rejection.body_text(),
        )])),
    }
}
