//! Fetch phase: read every table the engine needs inside one read transaction

use palaro_common::db::{
    Event, EventTeam, EventTeamPlayer, Participant, PerformanceEvent, PerformanceScore,
    PerformanceTeam, Region, SchoolLevel, SportSubcategory, Stage,
};
use palaro_common::Result;
use sqlx::SqlitePool;
use tracing::debug;

use crate::engine::Snapshot;

// Rank columns hold medal names or ranks stored as numbers, and birth dates
// arrive in mixed formats; all are read as text and parsed by the engine.
const REGIONS: &str = "SELECT id, name, abbreviation FROM regions ORDER BY id";
const SCHOOL_LEVELS: &str = "SELECT id, name FROM school_levels ORDER BY id";
const SUBCATEGORIES: &str = "SELECT id, sport_id, name, main_category, school_level_id \
     FROM sport_subcategories ORDER BY id";
const STAGES: &str = "SELECT id, name, stage_order FROM stages ORDER BY id";
const PARTICIPANTS: &str = "SELECT id, first_name, last_name, sex, CAST(birth_date AS TEXT) AS birth_date, \
     school_id, sport_id FROM participants ORDER BY id";
const EVENTS: &str = "SELECT id, subcategory_id, stage_id, is_finished FROM events ORDER BY id";
const EVENT_TEAMS: &str = "SELECT id, event_id, region_id, team_id, CAST(rank AS TEXT) AS rank, \
     performance_score_id FROM event_teams ORDER BY id";
const EVENT_TEAM_PLAYERS: &str = "SELECT event_team_id, participant_id FROM event_team_players \
     ORDER BY event_team_id, participant_id";
const PERFORMANCE_EVENTS: &str = "SELECT id, subcategory_id, stage_id, main_category, is_finished, \
     event_id FROM performance_events ORDER BY id";
const PERFORMANCE_TEAMS: &str = "SELECT id, performance_event_id, region_id, team_id, player_id \
     FROM performance_teams ORDER BY id";
const PERFORMANCE_SCORES: &str = "SELECT id, performance_team_id, sport_subcategory_id, \
     CAST(rank AS TEXT) AS rank FROM performance_scores ORDER BY id";

/// Load a consistent snapshot of the results store
///
/// All reads share one transaction so the compute phase never mixes rows from
/// before and after a concurrent write. Rows come back in id order, which
/// makes first-seen tie-breaking reproducible.
pub async fn load_snapshot(pool: &SqlitePool) -> Result<Snapshot> {
    let mut tx = pool.begin().await?;

    let snapshot = Snapshot {
        regions: sqlx::query_as::<_, Region>(REGIONS)
            .fetch_all(&mut *tx)
            .await?,
        school_levels: sqlx::query_as::<_, SchoolLevel>(SCHOOL_LEVELS)
            .fetch_all(&mut *tx)
            .await?,
        subcategories: sqlx::query_as::<_, SportSubcategory>(SUBCATEGORIES)
            .fetch_all(&mut *tx)
            .await?,
        stages: sqlx::query_as::<_, Stage>(STAGES).fetch_all(&mut *tx).await?,
        participants: sqlx::query_as::<_, Participant>(PARTICIPANTS)
            .fetch_all(&mut *tx)
            .await?,
        events: sqlx::query_as::<_, Event>(EVENTS).fetch_all(&mut *tx).await?,
        event_teams: sqlx::query_as::<_, EventTeam>(EVENT_TEAMS)
            .fetch_all(&mut *tx)
            .await?,
        event_team_players: sqlx::query_as::<_, EventTeamPlayer>(EVENT_TEAM_PLAYERS)
            .fetch_all(&mut *tx)
            .await?,
        performance_events: sqlx::query_as::<_, PerformanceEvent>(PERFORMANCE_EVENTS)
            .fetch_all(&mut *tx)
            .await?,
        performance_teams: sqlx::query_as::<_, PerformanceTeam>(PERFORMANCE_TEAMS)
            .fetch_all(&mut *tx)
            .await?,
        performance_scores: sqlx::query_as::<_, PerformanceScore>(PERFORMANCE_SCORES)
            .fetch_all(&mut *tx)
            .await?,
    };

    tx.commit().await?;

    debug!(
        events = snapshot.events.len(),
        event_teams = snapshot.event_teams.len(),
        performance_scores = snapshot.performance_scores.len(),
        "Loaded results snapshot"
    );
    Ok(snapshot)
}
