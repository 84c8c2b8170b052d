//! Handlers for versions, nested under a task.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use pipetrack_core::error::CoreError;
use pipetrack_core::naming::{natural_key, version_key};
use pipetrack_core::types::VersionNumber;
use pipetrack_db::models::version::{CreateVersion, UpdateVersion, Version};
use pipetrack_db::repositories::{TaskRepo, VersionRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::task::task_not_found;
use crate::response::DataResponse;
use crate::state::AppState;

type TaskPath = (String, String, String);
type VersionPath = (String, String, String, VersionNumber);

fn version_not_found(project: &str, shot: &str, task: &str, version: VersionNumber) -> AppError {
    AppError::Core(CoreError::not_found(
        "Version",
        version_key(project, shot, task, version),
    ))
}

/// POST /api/v1/projects/{project}/shots/{shot}/tasks/{task}/versions
///
/// Reserves the next version number. The body may be omitted; supplying any
/// version field is rejected.
pub async fn create(
    State(state): State<AppState>,
    Path((project, shot, task)): Path<TaskPath>,
    body: Bytes,
) -> AppResult<(StatusCode, Json<DataResponse<Version>>)> {
    let input: CreateVersion = if body.iter().all(u8::is_ascii_whitespace) {
        CreateVersion::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| AppError::BadRequest(e.to_string()))?
    };
    let version = VersionRepo::add(&state.pool, &project, &shot, &task, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: version })))
}

/// GET /api/v1/projects/{project}/shots/{shot}/tasks/{task}/versions
pub async fn list_by_task(
    State(state): State<AppState>,
    Path((project, shot, task)): Path<TaskPath>,
) -> AppResult<Json<DataResponse<Vec<Version>>>> {
    if !TaskRepo::exists(&state.pool, &project, &shot, &task).await? {
        return Err(task_not_found(&project, &shot, &task));
    }
    let versions = VersionRepo::list_by_task(&state.pool, &project, &shot, &task).await?;
    Ok(Json(DataResponse { data: versions }))
}

/// GET /api/v1/projects/{project}/shots/{shot}/tasks/{task}/versions/latest
pub async fn latest(
    State(state): State<AppState>,
    Path((project, shot, task)): Path<TaskPath>,
) -> AppResult<Json<DataResponse<Version>>> {
    let found = VersionRepo::latest(&state.pool, &project, &shot, &task)
        .await?
        .ok_or_else(|| {
            let key = natural_key(&[project.as_str(), shot.as_str(), task.as_str()]);
            AppError::Core(CoreError::not_found("Version", format!("{key}.latest")))
        })?;
    Ok(Json(DataResponse { data: found }))
}

/// GET /api/v1/projects/{project}/shots/{shot}/tasks/{task}/versions/{version}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path((project, shot, task, version)): Path<VersionPath>,
) -> AppResult<Json<DataResponse<Version>>> {
    let found = VersionRepo::get(&state.pool, &project, &shot, &task, version)
        .await?
        .ok_or_else(|| version_not_found(&project, &shot, &task, version))?;
    Ok(Json(DataResponse { data: found }))
}

/// PUT /api/v1/projects/{project}/shots/{shot}/tasks/{task}/versions/{version}
pub async fn update(
    State(state): State<AppState>,
    Path((project, shot, task, version)): Path<VersionPath>,
    Json(input): Json<UpdateVersion>,
) -> AppResult<Json<DataResponse<Version>>> {
    VersionRepo::update(&state.pool, &project, &shot, &task, version, &input).await?;
    let found = VersionRepo::get(&state.pool, &project, &shot, &task, version)
        .await?
        .ok_or_else(|| version_not_found(&project, &shot, &task, version))?;
    Ok(Json(DataResponse { data: found }))
}

/// DELETE /api/v1/projects/{project}/shots/{shot}/tasks/{task}/versions/{version}
pub async fn delete(
    State(state): State<AppState>,
    Path((project, shot, task, version)): Path<VersionPath>,
) -> AppResult<StatusCode> {
    if !VersionRepo::exists(&state.pool, &project, &shot, &task, version).await? {
        return Err(version_not_found(&project, &shot, &task, version));
    }
    VersionRepo::delete(&state.pool, &project, &shot, &task, version).await?;
    Ok(StatusCode::NO_CONTENT)
}
