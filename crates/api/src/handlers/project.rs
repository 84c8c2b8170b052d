//! Handlers for the `/projects` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use pipetrack_core::error::CoreError;
use pipetrack_db::models::project::{Project, UpdateProject};
use pipetrack_db::repositories::ProjectRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

pub(crate) fn project_not_found(project: &str) -> AppError {
    AppError::Core(CoreError::not_found("Project", project))
}

/// POST /api/v1/projects
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<Project>,
) -> AppResult<(StatusCode, Json<DataResponse<Project>>)> {
    if ProjectRepo::exists(&state.pool, &input.project).await? {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "project '{}' already exists",
            input.project
        ))));
    }
    ProjectRepo::add(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: input })))
}

/// GET /api/v1/projects
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Project>>>> {
    let projects = ProjectRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: projects }))
}

/// GET /api/v1/projects/{project}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(project): Path<String>,
) -> AppResult<Json<DataResponse<Project>>> {
    let found = ProjectRepo::get(&state.pool, &project)
        .await?
        .ok_or_else(|| project_not_found(&project))?;
    Ok(Json(DataResponse { data: found }))
}

/// PUT /api/v1/projects/{project}
pub async fn update(
    State(state): State<AppState>,
    Path(project): Path<String>,
    Json(input): Json<UpdateProject>,
) -> AppResult<Json<DataResponse<Project>>> {
    ProjectRepo::update(&state.pool, &project, &input).await?;
    let found = ProjectRepo::get(&state.pool, &project)
        .await?
        .ok_or_else(|| project_not_found(&project))?;
    Ok(Json(DataResponse { data: found }))
}

/// DELETE /api/v1/projects/{project}
///
/// Removes every shot, task, and version of the project as well.
pub async fn delete(
    State(state): State<AppState>,
    Path(project): Path<String>,
) -> AppResult<StatusCode> {
    if !ProjectRepo::exists(&state.pool, &project).await? {
        return Err(project_not_found(&project));
    }
    ProjectRepo::delete(&state.pool, &project).await?;
    Ok(StatusCode::NO_CONTENT)
}
