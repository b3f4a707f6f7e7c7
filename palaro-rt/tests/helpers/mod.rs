//! Shared fixtures for palaro-rt integration tests
//!
//! Builds a results store in a temporary directory, seeds it through a writable
//! pool, then reopens it the way the service does (read-only).

#![allow(dead_code)]

use axum::body::Body;
use axum::http::Request;
use palaro_common::db::create_schema;
use palaro_rt::{build_router, AppState};
use serde_json::Value;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::path::PathBuf;
use tempfile::TempDir;

/// Temporary results store; the directory lives as long as this value
pub struct TestStore {
    _dir: TempDir,
    pub path: PathBuf,
}

impl TestStore {
    /// Empty store with the full schema
    pub async fn new() -> Self {
        Self::with_statements(&[]).await
    }

    /// Full schema seeded with the meet used across the API tests
    pub async fn seeded() -> Self {
        Self::with_statements(MEET).await
    }

    /// Seeded meet followed by `extra` statements
    pub async fn seeded_with(extra: &[&str]) -> Self {
        let statements: Vec<&str> = MEET.iter().chain(extra).copied().collect();
        Self::with_statements(&statements).await
    }

    async fn with_statements(statements: &[&str]) -> Self {
        let dir = TempDir::new().expect("Should create temp dir");
        let path = dir.path().join("palaro.db");
        let pool = writable_pool(&path).await;
        create_schema(&pool).await.expect("Should create schema");
        for statement in statements {
            sqlx::query(statement)
                .execute(&pool)
                .await
                .unwrap_or_else(|e| panic!("seed failed: {}: {}", statement, e));
        }
        pool.close().await;
        Self { _dir: dir, path }
    }

    /// Store holding only the regions table
    pub async fn partial() -> Self {
        let dir = TempDir::new().expect("Should create temp dir");
        let path = dir.path().join("partial.db");
        let pool = writable_pool(&path).await;
        sqlx::query("CREATE TABLE regions (id INTEGER PRIMARY KEY, name TEXT NOT NULL, abbreviation TEXT NOT NULL)")
            .execute(&pool)
            .await
            .expect("Should create regions");
        pool.close().await;
        Self { _dir: dir, path }
    }

    pub async fn readonly_pool(&self) -> SqlitePool {
        palaro_rt::db::connect_readonly(&self.path)
            .await
            .expect("Should open store read-only")
    }

    pub async fn app(&self, page_size: i64) -> axum::Router {
        build_router(AppState::new(self.readonly_pool().await, page_size))
    }
}

async fn writable_pool(path: &std::path::Path) -> SqlitePool {
    let url = format!("sqlite://{}?mode=rwc", path.display());
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect(&url)
        .await
        .expect("Should open writable store")
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

/// Two finished finals in the Elementary 100m, a Secondary relay won by a
/// three-member team, a Chess board with no level mapping, an unfinished
/// event, an elimination heat and one stand-alone timed heat.
const MEET: &[&str] = &[
    "INSERT INTO regions (id, name, abbreviation) VALUES
        (1, 'Central Luzon', 'CL'), (2, 'Western Visayas', 'WV'), (3, 'Davao', 'DAV')",
    "INSERT INTO school_levels (id, name) VALUES (1, 'Elementary'), (2, 'Secondary')",
    "INSERT INTO sport_subcategories (id, sport_id, name, main_category, school_level_id) VALUES
        (10, 1, '100m Dash', 'Athletics', 1),
        (20, 1, '4x100m Relay', 'Athletics', 2),
        (30, 2, 'Chess Board 1', 'Chess', NULL)",
    "INSERT INTO stages (id, name, stage_order) VALUES (1, 'Elimination', 1), (2, 'Final', 2)",
    "INSERT INTO participants (id, first_name, last_name, sex, birth_date, school_id, sport_id) VALUES
        (100, 'Ana', 'Santos', 'F', '2010-03-14', 1, 1),
        (101, 'Ben', 'Reyes', 'M', NULL, 2, 1),
        (102, 'Carla', 'Cruz', 'F', NULL, 3, 2),
        (103, 'Dan', 'Bautista', 'M', NULL, 2, 1),
        (104, 'Ella', 'Mendoza', 'F', NULL, 3, 1)",
    "INSERT INTO events (id, subcategory_id, stage_id, is_finished) VALUES
        (1, 10, 1, 1), (2, 10, 2, 1), (3, 20, 2, 1), (4, 30, 2, 1), (5, 10, 2, 0)",
    "INSERT INTO event_teams (id, event_id, region_id, team_id, rank, performance_score_id) VALUES
        (1, 2, 1, NULL, 'Gold', NULL),
        (2, 2, 2, NULL, 'silver', NULL),
        (3, 2, 3, NULL, 4, NULL),
        (4, 3, 2, 9, 'Gold', NULL),
        (5, 4, 3, NULL, 'Bronze', NULL),
        (6, 5, 1, NULL, 'Gold', NULL),
        (7, 1, 1, NULL, '1', NULL)",
    "INSERT INTO event_team_players (event_team_id, participant_id) VALUES
        (1, 100), (2, 101), (3, 102), (4, 101), (4, 103), (4, 104), (5, 102), (6, 103), (7, 100)",
    "INSERT INTO performance_events (id, subcategory_id, stage_id, main_category, is_finished, event_id) VALUES
        (1, 10, 1, 'Athletics', 1, NULL)",
    "INSERT INTO performance_teams (id, performance_event_id, region_id, team_id, player_id) VALUES
        (1, 1, 3, NULL, 104)",
    "INSERT INTO performance_scores (id, performance_team_id, sport_subcategory_id, rank) VALUES
        (1, 1, 10, '3')",
];
