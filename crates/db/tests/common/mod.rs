#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use pipetrack_core::types::Timestamp;
use pipetrack_db::models::project::Project;
use pipetrack_db::models::shot::Shot;
use pipetrack_db::repositories::{ProjectRepo, ShotRepo};
use sqlx::PgPool;

pub const PROJECT: &str = "test";

/// Create the schema in the per-test database.
pub async fn setup(pool: &PgPool) {
    pipetrack_db::create_tables(pool).await.unwrap();
}

/// Create the schema plus project `test` whose default task is `fx_fire`.
pub async fn setup_project(pool: &PgPool) -> Project {
    setup(pool).await;
    let project = Project {
        project: PROJECT.to_string(),
        default_tasks: vec!["fx_fire".to_string()],
    };
    ProjectRepo::add(pool, &project).await.unwrap();
    project
}

pub fn date(year: i32, month: u32, day: u32) -> Timestamp {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
}

pub fn shot_a() -> Shot {
    Shot {
        status: "in-progress".to_string(),
        edit_order: 10,
        description: "Roy sits alone in his room.".to_string(),
        cg_description: "Paint out the crew member holding the bounce board.".to_string(),
        timecode_in: "00:00:00:01".to_string(),
        timecode_out: "00:00:05:12".to_string(),
        duration: 132,
        tags: vec!["roy".to_string(), "remove".to_string()],
        working_tasks: vec!["fx_fire".to_string()],
        start_date: Some(date(2024, 5, 1)),
        end_date: None,
        due_date: Some(date(2024, 6, 30)),
        ..Shot::new(PROJECT, "CG_0010")
    }
}

pub fn shot_b() -> Shot {
    Shot {
        edit_order: 20,
        description: "He turns to look out of the window.".to_string(),
        cg_description: "Darken the overall mood.".to_string(),
        timecode_in: "00:00:05:12".to_string(),
        timecode_out: "00:00:06:03".to_string(),
        duration: 15,
        tags: vec!["roy".to_string(), "window".to_string()],
        working_tasks: vec!["comp".to_string()],
        ..Shot::new(PROJECT, "CG_0020")
    }
}

pub fn shot_c() -> Shot {
    Shot {
        edit_order: 30,
        description: "A lonely streetlight.".to_string(),
        cg_description: "Make the streetlight look older.".to_string(),
        timecode_in: "00:00:06:03".to_string(),
        timecode_out: "00:00:08:15".to_string(),
        duration: 36,
        tags: vec!["streetlight".to_string(), "window".to_string()],
        working_tasks: vec!["comp".to_string(), "fx_fire".to_string()],
        ..Shot::new(PROJECT, "CG_0030")
    }
}

/// Add shots A, B, C (inserted out of order) and return them sorted by id.
pub async fn add_shots(pool: &PgPool) -> Vec<Shot> {
    let shots = vec![shot_a(), shot_b(), shot_c()];
    for shot in [&shots[2], &shots[0], &shots[1]] {
        ShotRepo::add(pool, PROJECT, shot).await.unwrap();
    }
    shots
}
