//! Medal tally API
//!
//! - `GET /api/medals?region=`: region-only medal table
//! - `GET /api/medals/levels?region=&level=`: one medal table per school level

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Serialize;
use tracing::debug;

use super::params::{level_scope, region_filter, MedalQuery};
use crate::db::load_snapshot;
use crate::engine::{self, LevelTally, MedalTallyRow};
use crate::error::ApiResult;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct MedalTableResponse {
    pub total_results: usize,
    pub medals: Vec<MedalTallyRow>,
}

#[derive(Debug, Serialize)]
pub struct LevelMedalResponse {
    pub levels: Vec<LevelTally>,
}

/// GET /api/medals
pub async fn get_medal_table(
    State(state): State<AppState>,
    Query(query): Query<MedalQuery>,
) -> ApiResult<Json<MedalTableResponse>> {
    let snapshot = load_snapshot(&state.db).await?;
    let region = region_filter(&snapshot.regions, query.region.as_deref())?;

    let medals = engine::medal_table(&snapshot, region);
    debug!(regions = medals.len(), "Served medal table");

    Ok(Json(MedalTableResponse {
        total_results: medals.len(),
        medals,
    }))
}

/// GET /api/medals/levels
pub async fn get_level_medal_tables(
    State(state): State<AppState>,
    Query(query): Query<MedalQuery>,
) -> ApiResult<Json<LevelMedalResponse>> {
    let snapshot = load_snapshot(&state.db).await?;
    let region = region_filter(&snapshot.regions, query.region.as_deref())?;
    let scope = level_scope(&snapshot.school_levels, query.level.as_deref())?;

    let levels = engine::level_medal_tables(&snapshot, scope, region);
    debug!(levels = levels.len(), ?scope, "Served level medal tables");

    Ok(Json(LevelMedalResponse { levels }))
}
