//! Handlers for shots, nested under `/projects/{project}/shots`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use pipetrack_core::error::CoreError;
use pipetrack_core::naming::natural_key;
use pipetrack_db::models::shot::{CreateShot, Shot, ShotFilter, UpdateShot};
use pipetrack_db::repositories::{ProjectRepo, ShotRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::project::project_not_found;
use crate::response::DataResponse;
use crate::state::AppState;

pub(crate) fn shot_not_found(project: &str, shot: &str) -> AppError {
    AppError::Core(CoreError::not_found("Shot", natural_key(&[project, shot])))
}

/// POST /api/v1/projects/{project}/shots
///
/// Creates the shot's working tasks (or the project's default tasks) too.
pub async fn create(
    State(state): State<AppState>,
    Path(project): Path<String>,
    Json(input): Json<CreateShot>,
) -> AppResult<(StatusCode, Json<DataResponse<Shot>>)> {
    if !ProjectRepo::exists(&state.pool, &project).await? {
        return Err(project_not_found(&project));
    }
    if ShotRepo::exists(&state.pool, &project, &input.shot).await? {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "shot '{}' already exists",
            natural_key(&[project.as_str(), input.shot.as_str()])
        ))));
    }
    let shot = ShotRepo::add(&state.pool, &project, &input.into_shot(&project)).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: shot })))
}

/// GET /api/v1/projects/{project}/shots
///
/// Query parameters are the optional search criteria of [`ShotFilter`].
pub async fn search(
    State(state): State<AppState>,
    Path(project): Path<String>,
    Query(filter): Query<ShotFilter>,
) -> AppResult<Json<DataResponse<Vec<Shot>>>> {
    let shots = ShotRepo::search(&state.pool, &project, &filter).await?;
    Ok(Json(DataResponse { data: shots }))
}

/// GET /api/v1/projects/{project}/shots/{shot}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path((project, shot)): Path<(String, String)>,
) -> AppResult<Json<DataResponse<Shot>>> {
    let found = ShotRepo::get(&state.pool, &project, &shot)
        .await?
        .ok_or_else(|| shot_not_found(&project, &shot))?;
    Ok(Json(DataResponse { data: found }))
}

/// PUT /api/v1/projects/{project}/shots/{shot}
pub async fn update(
    State(state): State<AppState>,
    Path((project, shot)): Path<(String, String)>,
    Json(input): Json<UpdateShot>,
) -> AppResult<Json<DataResponse<Shot>>> {
    ShotRepo::update(&state.pool, &project, &shot, &input).await?;
    let found = ShotRepo::get(&state.pool, &project, &shot)
        .await?
        .ok_or_else(|| shot_not_found(&project, &shot))?;
    Ok(Json(DataResponse { data: found }))
}

/// DELETE /api/v1/projects/{project}/shots/{shot}
pub async fn delete(
    State(state): State<AppState>,
    Path((project, shot)): Path<(String, String)>,
) -> AppResult<StatusCode> {
    if !ShotRepo::exists(&state.pool, &project, &shot).await? {
        return Err(shot_not_found(&project, &shot));
    }
    ShotRepo::delete(&state.pool, &project, &shot).await?;
    Ok(StatusCode::NO_CONTENT)
}
