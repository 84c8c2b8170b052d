//! Add / get / update / delete round-trips for every entity.

mod common;

use assert_matches::assert_matches;
use common::{date, setup, setup_project, shot_a, shot_b, PROJECT};
use pipetrack_core::error::CoreError;
use pipetrack_db::models::project::{Project, UpdateProject};
use pipetrack_db::models::shot::{Shot, UpdateShot};
use pipetrack_db::models::task::{Task, UpdateTask};
use pipetrack_db::repositories::{ProjectRepo, ShotRepo, TaskRepo};
use pipetrack_db::DbError;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Project
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = false)]
async fn test_project_roundtrip(pool: PgPool) {
    let project = setup_project(&pool).await;

    assert!(ProjectRepo::exists(&pool, PROJECT).await.unwrap());
    let found = ProjectRepo::get(&pool, PROJECT).await.unwrap().unwrap();
    assert_eq!(found, project);
    assert!(ProjectRepo::get(&pool, "missing").await.unwrap().is_none());
}

#[sqlx::test(migrations = false)]
async fn test_list_projects_sorted(pool: PgPool) {
    setup(&pool).await;
    for id in ["zeta", "alpha", "mid"] {
        ProjectRepo::add(&pool, &Project::new(id)).await.unwrap();
    }

    let ids: Vec<String> = ProjectRepo::list(&pool)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.project)
        .collect();
    assert_eq!(ids, ["alpha", "mid", "zeta"]);
}

#[sqlx::test(migrations = false)]
async fn test_add_project_invalid_id(pool: PgPool) {
    setup(&pool).await;

    let err = ProjectRepo::add(&pool, &Project::new("1st")).await.unwrap_err();
    assert_matches!(err, DbError::Core(CoreError::Validation(_)));
    assert!(!ProjectRepo::exists(&pool, "1st").await.unwrap());

    let err = ProjectRepo::add(&pool, &Project::new("")).await.unwrap_err();
    assert_matches!(err, DbError::Core(CoreError::Validation(msg)) if msg == "'project' not specified");
}

#[sqlx::test(migrations = false)]
async fn test_add_duplicate_project_fails(pool: PgPool) {
    setup_project(&pool).await;

    let err = ProjectRepo::add(&pool, &Project::new(PROJECT)).await.unwrap_err();
    let db_err = err.as_sqlx().and_then(|e| e.as_database_error()).unwrap();
    assert_eq!(db_err.constraint(), Some("uq_projects_project"));
}

#[sqlx::test(migrations = false)]
async fn test_update_project_default_tasks(pool: PgPool) {
    setup_project(&pool).await;

    let input = UpdateProject {
        default_tasks: vec!["comp".to_string(), "roto".to_string()],
    };
    ProjectRepo::update(&pool, PROJECT, &input).await.unwrap();

    let found = ProjectRepo::get(&pool, PROJECT).await.unwrap().unwrap();
    assert_eq!(found.default_tasks, ["comp", "roto"]);
}

#[sqlx::test(migrations = false)]
async fn test_update_missing_project_not_found(pool: PgPool) {
    setup(&pool).await;

    let err = ProjectRepo::update(&pool, "missing", &UpdateProject::default())
        .await
        .unwrap_err();
    assert_matches!(err, DbError::Core(CoreError::NotFound { entity: "Project", .. }));
}

// ---------------------------------------------------------------------------
// Shot
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = false)]
async fn test_shot_roundtrip(pool: PgPool) {
    setup_project(&pool).await;
    let shot = shot_a();

    let stored = ShotRepo::add(&pool, PROJECT, &shot).await.unwrap();
    assert_eq!(stored, shot);

    assert!(ShotRepo::exists(&pool, PROJECT, "CG_0010").await.unwrap());
    let found = ShotRepo::get(&pool, PROJECT, "CG_0010").await.unwrap().unwrap();
    assert_eq!(found, shot);
}

#[sqlx::test(migrations = false)]
async fn test_add_shot_seeds_default_tasks(pool: PgPool) {
    setup_project(&pool).await;

    let stored = ShotRepo::add(&pool, PROJECT, &Shot::new(PROJECT, "CG_0010"))
        .await
        .unwrap();
    assert_eq!(stored.working_tasks, ["fx_fire"]);
    assert_eq!(stored.status, "waiting");

    let task = TaskRepo::get(&pool, PROJECT, "CG_0010", "fx_fire")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(task.status, "not-set");
    assert_eq!(task.assignee, "");
    assert_eq!(task.due_date, None);
}

#[sqlx::test(migrations = false)]
async fn test_add_shot_creates_listed_tasks(pool: PgPool) {
    setup_project(&pool).await;

    ShotRepo::add(&pool, PROJECT, &shot_b()).await.unwrap();

    assert!(TaskRepo::exists(&pool, PROJECT, "CG_0020", "comp").await.unwrap());
    assert!(!TaskRepo::exists(&pool, PROJECT, "CG_0020", "fx_fire").await.unwrap());
}

#[sqlx::test(migrations = false)]
async fn test_add_shot_missing_project(pool: PgPool) {
    setup(&pool).await;

    let err = ShotRepo::add(&pool, "nowhere", &Shot::new("nowhere", "CG_0010"))
        .await
        .unwrap_err();
    assert_matches!(err, DbError::Core(CoreError::NotFound { entity: "Project", .. }));
}

#[sqlx::test(migrations = false)]
async fn test_add_shot_rejects_invalid_input(pool: PgPool) {
    setup_project(&pool).await;

    let bad_status = Shot {
        status: "finished".to_string(),
        ..shot_a()
    };
    let err = ShotRepo::add(&pool, PROJECT, &bad_status).await.unwrap_err();
    assert_matches!(err, DbError::Core(CoreError::Validation(_)));

    let bad_id = Shot::new(PROJECT, "CG 0010");
    let err = ShotRepo::add(&pool, PROJECT, &bad_id).await.unwrap_err();
    assert_matches!(err, DbError::Core(CoreError::Validation(_)));

    let repeated = Shot {
        working_tasks: vec!["comp".to_string(), "comp".to_string()],
        ..shot_a()
    };
    let err = ShotRepo::add(&pool, PROJECT, &repeated).await.unwrap_err();
    assert_matches!(err, DbError::Core(CoreError::Validation(_)));

    assert!(!ShotRepo::exists(&pool, PROJECT, "CG_0010").await.unwrap());
}

#[sqlx::test(migrations = false)]
async fn test_add_shot_project_mismatch(pool: PgPool) {
    setup_project(&pool).await;

    let err = ShotRepo::add(&pool, PROJECT, &Shot::new("other", "CG_0010"))
        .await
        .unwrap_err();
    assert_matches!(err, DbError::Core(CoreError::Validation(_)));
}

#[sqlx::test(migrations = false)]
async fn test_add_duplicate_shot_writes_nothing(pool: PgPool) {
    setup_project(&pool).await;
    ShotRepo::add(&pool, PROJECT, &shot_a()).await.unwrap();

    let again = Shot {
        working_tasks: vec!["fx_fire".to_string(), "paint".to_string()],
        ..shot_a()
    };
    let err = ShotRepo::add(&pool, PROJECT, &again).await.unwrap_err();
    assert_matches!(err, DbError::Step { step: "insert data into 'shots' table", .. });
    assert!(!TaskRepo::exists(&pool, PROJECT, "CG_0010", "paint").await.unwrap());
}

#[sqlx::test(migrations = false)]
async fn test_update_shot(pool: PgPool) {
    setup_project(&pool).await;
    let shot = ShotRepo::add(&pool, PROJECT, &shot_a()).await.unwrap();

    let mut input = UpdateShot::from(&shot);
    input.status = "done".to_string();
    input.description = "Roy stands up.".to_string();
    input.due_date = Some(date(2024, 7, 31));
    ShotRepo::update(&pool, PROJECT, "CG_0010", &input).await.unwrap();

    let found = ShotRepo::get(&pool, PROJECT, "CG_0010").await.unwrap().unwrap();
    assert_eq!(found.status, "done");
    assert_eq!(found.description, "Roy stands up.");
    assert_eq!(found.due_date, Some(date(2024, 7, 31)));
    assert_eq!(found.tags, shot.tags);
}

#[sqlx::test(migrations = false)]
async fn test_update_shot_invalid_status_leaves_row(pool: PgPool) {
    setup_project(&pool).await;
    let shot = ShotRepo::add(&pool, PROJECT, &shot_a()).await.unwrap();

    let mut input = UpdateShot::from(&shot);
    input.status = "bogus".to_string();
    input.description = "changed".to_string();
    let err = ShotRepo::update(&pool, PROJECT, "CG_0010", &input)
        .await
        .unwrap_err();
    assert_matches!(err, DbError::Core(CoreError::Validation(_)));

    let found = ShotRepo::get(&pool, PROJECT, "CG_0010").await.unwrap().unwrap();
    assert_eq!(found, shot);
}

#[sqlx::test(migrations = false)]
async fn test_update_shot_unknown_working_task(pool: PgPool) {
    setup_project(&pool).await;
    let shot = ShotRepo::add(&pool, PROJECT, &shot_a()).await.unwrap();

    let mut input = UpdateShot::from(&shot);
    input.working_tasks = vec!["fx_fire".to_string(), "matte".to_string()];
    let err = ShotRepo::update(&pool, PROJECT, "CG_0010", &input)
        .await
        .unwrap_err();
    assert_matches!(err, DbError::Core(CoreError::Validation(msg)) if msg.contains("'matte'"));
}

#[sqlx::test(migrations = false)]
async fn test_update_missing_shot_not_found(pool: PgPool) {
    setup_project(&pool).await;

    let input = UpdateShot::from(&Shot::new(PROJECT, "CG_9999"));
    let err = ShotRepo::update(&pool, PROJECT, "CG_9999", &input)
        .await
        .unwrap_err();
    assert_matches!(err, DbError::Core(CoreError::NotFound { entity: "Shot", .. }));
}

#[sqlx::test(migrations = false)]
async fn test_update_missing_shot_with_working_tasks_not_found(pool: PgPool) {
    setup_project(&pool).await;

    let input = UpdateShot {
        working_tasks: vec!["fx_fire".to_string()],
        ..UpdateShot::from(&Shot::new(PROJECT, "CG_9999"))
    };
    let err = ShotRepo::update(&pool, PROJECT, "CG_9999", &input)
        .await
        .unwrap_err();
    assert_matches!(err, DbError::Core(CoreError::NotFound { entity: "Shot", .. }));
}

#[sqlx::test(migrations = false)]
async fn test_concurrent_shot_update_and_task_delete_keep_working_tasks_valid(pool: PgPool) {
    setup_project(&pool).await;
    let shot = ShotRepo::add(&pool, PROJECT, &shot_a()).await.unwrap();

    for round in 0..100 {
        let name = format!("tmp_{round}");
        TaskRepo::add(&pool, PROJECT, "CG_0010", &Task::new(PROJECT, "CG_0010", &name))
            .await
            .unwrap();

        let input = UpdateShot {
            working_tasks: vec!["fx_fire".to_string(), name.clone()],
            ..UpdateShot::from(&shot)
        };
        let update = tokio::spawn({
            let pool = pool.clone();
            async move { ShotRepo::update(&pool, PROJECT, "CG_0010", &input).await }
        });
        let delete = tokio::spawn({
            let pool = pool.clone();
            async move { TaskRepo::delete(&pool, PROJECT, "CG_0010", &name).await }
        });

        // The update may lose the race and be rejected; the delete never fails.
        if let Err(err) = update.await.unwrap() {
            assert_matches!(err, DbError::Core(CoreError::Validation(_)));
        }
        delete.await.unwrap().unwrap();

        let found = ShotRepo::get(&pool, PROJECT, "CG_0010").await.unwrap().unwrap();
        for task in &found.working_tasks {
            assert!(
                TaskRepo::exists(&pool, PROJECT, "CG_0010", task).await.unwrap(),
                "round {round}: working task '{task}' has no task row"
            );
        }
    }
}

#[sqlx::test(migrations = false)]
async fn test_delete_shot(pool: PgPool) {
    setup_project(&pool).await;
    ShotRepo::add(&pool, PROJECT, &shot_a()).await.unwrap();

    ShotRepo::delete(&pool, PROJECT, "CG_0010").await.unwrap();
    assert!(!ShotRepo::exists(&pool, PROJECT, "CG_0010").await.unwrap());

    // Deleting again is a no-op.
    ShotRepo::delete(&pool, PROJECT, "CG_0010").await.unwrap();
}

// ---------------------------------------------------------------------------
// Task
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = false)]
async fn test_task_roundtrip(pool: PgPool) {
    setup_project(&pool).await;
    ShotRepo::add(&pool, PROJECT, &shot_a()).await.unwrap();

    let task = Task {
        status: "assigned".to_string(),
        assignee: "kim".to_string(),
        due_date: Some(date(2024, 6, 15)),
        ..Task::new(PROJECT, "CG_0010", "roto")
    };
    TaskRepo::add(&pool, PROJECT, "CG_0010", &task).await.unwrap();

    let found = TaskRepo::get(&pool, PROJECT, "CG_0010", "roto")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found, task);

    // Added tasks stay hidden from the shot until it lists them.
    let shot = ShotRepo::get(&pool, PROJECT, "CG_0010").await.unwrap().unwrap();
    assert_eq!(shot.working_tasks, ["fx_fire"]);
}

#[sqlx::test(migrations = false)]
async fn test_add_task_missing_shot(pool: PgPool) {
    setup_project(&pool).await;

    let err = TaskRepo::add(&pool, PROJECT, "CG_9999", &Task::new(PROJECT, "CG_9999", "comp"))
        .await
        .unwrap_err();
    let db_err = err.as_sqlx().and_then(|e| e.as_database_error()).unwrap();
    assert_eq!(db_err.constraint(), Some("fk_tasks_shot"));
}

#[sqlx::test(migrations = false)]
async fn test_add_task_invalid_status(pool: PgPool) {
    setup_project(&pool).await;
    ShotRepo::add(&pool, PROJECT, &shot_a()).await.unwrap();

    let task = Task {
        status: "waiting".to_string(),
        ..Task::new(PROJECT, "CG_0010", "roto")
    };
    let err = TaskRepo::add(&pool, PROJECT, "CG_0010", &task).await.unwrap_err();
    assert_matches!(err, DbError::Core(CoreError::Validation(msg)) if msg == "invalid task status: 'waiting'");
}

#[sqlx::test(migrations = false)]
async fn test_update_task(pool: PgPool) {
    setup_project(&pool).await;
    ShotRepo::add(&pool, PROJECT, &shot_a()).await.unwrap();

    let input = UpdateTask {
        status: "retake".to_string(),
        assignee: "lee".to_string(),
        due_date: Some(date(2024, 7, 1)),
    };
    TaskRepo::update(&pool, PROJECT, "CG_0010", "fx_fire", &input)
        .await
        .unwrap();

    let found = TaskRepo::get(&pool, PROJECT, "CG_0010", "fx_fire")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.status, "retake");
    assert_eq!(found.assignee, "lee");
    assert_eq!(found.due_date, Some(date(2024, 7, 1)));

    let err = TaskRepo::update(&pool, PROJECT, "CG_0010", "missing", &input)
        .await
        .unwrap_err();
    assert_matches!(err, DbError::Core(CoreError::NotFound { entity: "Task", .. }));
}

#[sqlx::test(migrations = false)]
async fn test_delete_task_removes_working_task(pool: PgPool) {
    setup_project(&pool).await;
    let shot = Shot {
        working_tasks: vec!["comp".to_string(), "fx_fire".to_string()],
        ..shot_a()
    };
    ShotRepo::add(&pool, PROJECT, &shot).await.unwrap();

    TaskRepo::delete(&pool, PROJECT, "CG_0010", "comp").await.unwrap();

    assert!(!TaskRepo::exists(&pool, PROJECT, "CG_0010", "comp").await.unwrap());
    let found = ShotRepo::get(&pool, PROJECT, "CG_0010").await.unwrap().unwrap();
    assert_eq!(found.working_tasks, ["fx_fire"]);
}
