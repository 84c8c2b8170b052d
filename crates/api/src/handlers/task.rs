//! Handlers for tasks: project-wide search and the per-shot resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use pipetrack_core::error::CoreError;
use pipetrack_core::naming::natural_key;
use pipetrack_db::models::task::{CreateTask, Task, TaskFilter, UpdateTask};
use pipetrack_db::repositories::{ShotRepo, TaskRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::shot::shot_not_found;
use crate::response::DataResponse;
use crate::state::AppState;

pub(crate) fn task_not_found(project: &str, shot: &str, task: &str) -> AppError {
    AppError::Core(CoreError::not_found("Task", natural_key(&[project, shot, task])))
}

/// GET /api/v1/projects/{project}/tasks
pub async fn search(
    State(state): State<AppState>,
    Path(project): Path<String>,
    Query(filter): Query<TaskFilter>,
) -> AppResult<Json<DataResponse<Vec<Task>>>> {
    let tasks = TaskRepo::search(&state.pool, &project, &filter).await?;
    Ok(Json(DataResponse { data: tasks }))
}

/// GET /api/v1/projects/{project}/shots/{shot}/tasks
///
/// Every task row of the shot, including ones not in its working tasks.
pub async fn list_by_shot(
    State(state): State<AppState>,
    Path((project, shot)): Path<(String, String)>,
) -> AppResult<Json<DataResponse<Vec<Task>>>> {
    if !ShotRepo::exists(&state.pool, &project, &shot).await? {
        return Err(shot_not_found(&project, &shot));
    }
    let filter = TaskFilter {
        shot: Some(shot),
        ..Default::default()
    };
    let tasks = TaskRepo::search(&state.pool, &project, &filter).await?;
    Ok(Json(DataResponse { data: tasks }))
}

/// POST /api/v1/projects/{project}/shots/{shot}/tasks
pub async fn create(
    State(state): State<AppState>,
    Path((project, shot)): Path<(String, String)>,
    Json(input): Json<CreateTask>,
) -> AppResult<(StatusCode, Json<DataResponse<Task>>)> {
    let task = input.into_task(&project, &shot);
    TaskRepo::add(&state.pool, &project, &shot, &task).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: task })))
}

/// GET /api/v1/projects/{project}/shots/{shot}/tasks/{task}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path((project, shot, task)): Path<(String, String, String)>,
) -> AppResult<Json<DataResponse<Task>>> {
    let found = TaskRepo::get(&state.pool, &project, &shot, &task)
        .await?
        .ok_or_else(|| task_not_found(&project, &shot, &task))?;
    Ok(Json(DataResponse { data: found }))
}

/// PUT /api/v1/projects/{project}/shots/{shot}/tasks/{task}
pub async fn update(
    State(state): State<AppState>,
    Path((project, shot, task)): Path<(String, String, String)>,
    Json(input): Json<UpdateTask>,
) -> AppResult<Json<DataResponse<Task>>> {
    TaskRepo::update(&state.pool, &project, &shot, &task, &input).await?;
    let found = TaskRepo::get(&state.pool, &project, &shot, &task)
        .await?
        .ok_or_else(|| task_not_found(&project, &shot, &task))?;
    Ok(Json(DataResponse { data: found }))
}

/// DELETE /api/v1/projects/{project}/shots/{shot}/tasks/{task}
pub async fn delete(
    State(state): State<AppState>,
    Path((project, shot, task)): Path<(String, String, String)>,
) -> AppResult<StatusCode> {
    if !TaskRepo::exists(&state.pool, &project, &shot, &task).await? {
        return Err(task_not_found(&project, &shot, &task));
    }
    TaskRepo::delete(&state.pool, &project, &shot, &task).await?;
    Ok(StatusCode::NO_CONTENT)
}
