//! Results store schema
//!
//! Surrounding services own the store and its migrations. The DDL here is the
//! read contract of the results engine: it builds fixture databases and lets a
//! service check at startup that every table it reads is present.

use crate::Result;
use sqlx::SqlitePool;
use tracing::debug;

/// Tables read by the results engine, in dependency order
pub const EXPECTED_TABLES: &[&str] = &[
    "regions",
    "school_levels",
    "sport_subcategories",
    "stages",
    "participants",
    "events",
    "event_teams",
    "event_team_players",
    "performance_events",
    "performance_teams",
    "performance_scores",
];

const DDL: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS regions (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        abbreviation TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS school_levels (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS sport_subcategories (
        id INTEGER PRIMARY KEY,
        sport_id INTEGER,
        name TEXT NOT NULL,
        main_category TEXT,
        school_level_id INTEGER REFERENCES school_levels(id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS stages (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        stage_order INTEGER NOT NULL DEFAULT 0
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS participants (
        id INTEGER PRIMARY KEY,
        first_name TEXT NOT NULL,
        last_name TEXT NOT NULL,
        sex TEXT,
        birth_date TEXT,
        school_id INTEGER,
        sport_id INTEGER
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS events (
        id INTEGER PRIMARY KEY,
        subcategory_id INTEGER NOT NULL REFERENCES sport_subcategories(id),
        stage_id INTEGER REFERENCES stages(id),
        is_finished INTEGER NOT NULL DEFAULT 0
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS event_teams (
        id INTEGER PRIMARY KEY,
        event_id INTEGER NOT NULL REFERENCES events(id),
        region_id INTEGER NOT NULL,
        team_id INTEGER,
        rank TEXT,
        performance_score_id INTEGER
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS event_team_players (
        event_team_id INTEGER NOT NULL REFERENCES event_teams(id),
        participant_id INTEGER NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS performance_events (
        id INTEGER PRIMARY KEY,
        subcategory_id INTEGER NOT NULL,
        stage_id INTEGER REFERENCES stages(id),
        main_category TEXT,
        is_finished INTEGER NOT NULL DEFAULT 0,
        event_id INTEGER
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS performance_teams (
        id INTEGER PRIMARY KEY,
        performance_event_id INTEGER NOT NULL REFERENCES performance_events(id),
        region_id INTEGER NOT NULL,
        team_id INTEGER,
        player_id INTEGER
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS performance_scores (
        id INTEGER PRIMARY KEY,
        performance_team_id INTEGER NOT NULL,
        sport_subcategory_id INTEGER NOT NULL,
        rank TEXT
    )
    "#,
];

/// Create every table the engine reads (idempotent)
///
/// Historical data contains dangling links, so cross-feeder link columns
/// (`performance_score_id`, `player_id`, `participant_id`) carry no REFERENCES
/// clause and foreign key enforcement is left off.
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    for statement in DDL {
        sqlx::query(statement).execute(pool).await?;
    }
    debug!(tables = EXPECTED_TABLES.len(), "Results store schema ensured");
    Ok(())
}

/// Names of expected tables absent from the store, in `EXPECTED_TABLES` order
pub async fn missing_tables(pool: &SqlitePool) -> Result<Vec<String>> {
    let present: Vec<String> = sqlx::query_scalar(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
    )
    .fetch_all(pool)
    .await?;

    Ok(EXPECTED_TABLES
        .iter()
        .filter(|table| !present.iter().any(|p| p == *table))
        .map(|table| table.to_string())
        .collect())
}
