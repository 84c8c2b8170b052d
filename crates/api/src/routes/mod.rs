pub mod health;
pub mod project;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /projects                                         list, add
/// /projects/{project}                               get, update, delete
/// /projects/{project}/tasks                         task search
/// /projects/{project}/shots                         shot search, add
/// /projects/{project}/shots/{shot}                  get, update, delete
/// /projects/{project}/shots/{shot}/tasks            list, add
/// /projects/{project}/shots/{shot}/tasks/{task}     get, update, delete
/// .../tasks/{task}/versions                         list, reserve
/// .../tasks/{task}/versions/latest                  highest version
/// .../tasks/{task}/versions/{version}               get, update, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/projects", project::router())
}
