//! Route definitions for the `/projects` resource and everything under it.

use axum::routing::get;
use axum::Router;

use crate::handlers::{project, shot, task, version};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                                            -> list
/// POST   /                                            -> create
/// GET    /{project}                                   -> get_by_id
/// PUT    /{project}                                   -> update
/// DELETE /{project}                                   -> delete
///
/// GET    /{project}/tasks                             -> task::search
///
/// GET    /{project}/shots                             -> shot::search
/// POST   /{project}/shots                             -> shot::create
/// GET    /{project}/shots/{shot}                      -> shot::get_by_id
/// PUT    /{project}/shots/{shot}                      -> shot::update
/// DELETE /{project}/shots/{shot}                      -> shot::delete
///
/// GET    /{project}/shots/{shot}/tasks                -> task::list_by_shot
/// POST   /{project}/shots/{shot}/tasks                -> task::create
/// GET    /{project}/shots/{shot}/tasks/{task}         -> task::get_by_id
/// PUT    /{project}/shots/{shot}/tasks/{task}         -> task::update
/// DELETE /{project}/shots/{shot}/tasks/{task}         -> task::delete
///
/// GET    .../tasks/{task}/versions                    -> version::list_by_task
/// POST   .../tasks/{task}/versions                    -> version::create
/// GET    .../tasks/{task}/versions/latest             -> version::latest
/// GET    .../tasks/{task}/versions/{version}          -> version::get_by_id
/// PUT    .../tasks/{task}/versions/{version}          -> version::update
/// DELETE .../tasks/{task}/versions/{version}          -> version::delete
/// ```
pub fn router() -> Router<AppState> {
    let version_routes = Router::new()
        .route("/", get(version::list_by_task).post(version::create))
        .route("/latest", get(version::latest))
        .route(
            "/{version}",
            get(version::get_by_id)
                .put(version::update)
                .delete(version::delete),
        );

    let task_routes = Router::new()
        .route("/", get(task::list_by_shot).post(task::create))
        .route(
            "/{task}",
            get(task::get_by_id).put(task::update).delete(task::delete),
        )
        .nest("/{task}/versions", version_routes);

    let shot_routes = Router::new()
        .route("/", get(shot::search).post(shot::create))
        .route(
            "/{shot}",
            get(shot::get_by_id).put(shot::update).delete(shot::delete),
        )
        .nest("/{shot}/tasks", task_routes);

    Router::new()
        .route("/", get(project::list).post(project::create))
        .route(
            "/{project}",
            get(project::get_by_id)
                .put(project::update)
                .delete(project::delete),
        )
        .route("/{project}/tasks", get(task::search))
        .nest("/{project}/shots", shot_routes)
}
