//! Tabulation feed API
//!
//! `GET /api/tabulation?region=&level=&page=` returns one page of the
//! resolved, ordered placement feed with display fields denormalized in.

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;

use super::params::{level_scope, page_number, region_filter};
use crate::db::load_snapshot;
use crate::engine::{self, EventKey, LevelScope, PlacementLabel, ResultRow, Snapshot, SourceType};
use crate::error::ApiResult;
use crate::pagination::Pagination;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct TabulationQuery {
    pub region: Option<String>,
    pub level: Option<String>,
    /// Raw page number, read by `page_number`
    pub page: Option<String>,
}

/// One feed row as served to clients
#[derive(Debug, Serialize)]
pub struct TabulationEntry {
    /// 1-based position in the filtered feed
    pub position: i64,
    pub source_type: SourceType,
    pub event: EventKey,
    pub stage_rank: i64,
    pub subcategory_id: i64,
    pub subcategory: Option<String>,
    pub main_category: Option<String>,
    pub school_level_id: Option<i64>,
    pub school_level: Option<String>,
    pub region_id: i64,
    pub region: Option<String>,
    pub region_abbreviation: Option<String>,
    pub team_id: Option<i64>,
    pub placement: PlacementLabel,
    /// "Gold", "7", or empty when unplaced
    pub placement_label: String,
    pub participant_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub sex: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub school_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct TabulationResponse {
    pub total_results: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
    pub rows: Vec<TabulationEntry>,
}

/// GET /api/tabulation
pub async fn get_tabulation(
    State(state): State<AppState>,
    Query(query): Query<TabulationQuery>,
) -> ApiResult<Json<TabulationResponse>> {
    let requested_page = page_number(query.page.as_deref())?;
    let snapshot = load_snapshot(&state.db).await?;
    let region = region_filter(&snapshot.regions, query.region.as_deref())?;
    let scope = level_scope(&snapshot.school_levels, query.level.as_deref())?;

    let feed = engine::tabulate(&snapshot);
    let known_levels: HashSet<i64> = snapshot.school_levels.iter().map(|l| l.id).collect();
    let filtered: Vec<ResultRow> = feed
        .into_iter()
        .filter(|row| region.map_or(true, |id| row.region_id == id))
        .filter(|row| in_scope(row, scope, &known_levels))
        .collect();

    let pagination = Pagination::new(filtered.len() as i64, requested_page, state.page_size);
    let display = DisplayNames::new(&snapshot);
    let rows = pagination
        .slice(&filtered)
        .iter()
        .enumerate()
        .map(|(i, row)| display.entry(pagination.offset + i as i64 + 1, row))
        .collect();

    debug!(
        total = filtered.len(),
        page = pagination.page,
        "Served tabulation page"
    );

    Ok(Json(TabulationResponse {
        total_results: filtered.len() as i64,
        page: pagination.page,
        page_size: pagination.page_size,
        total_pages: pagination.total_pages,
        rows,
    }))
}

fn in_scope(row: &ResultRow, scope: LevelScope, known_levels: &HashSet<i64>) -> bool {
    let level = row.school_level_id.filter(|id| known_levels.contains(id));
    match scope {
        LevelScope::All => true,
        LevelScope::Level(id) => level == Some(id),
        LevelScope::Unassigned => level.is_none(),
    }
}

/// Lookup tables for the display columns of a feed page
struct DisplayNames<'a> {
    regions: HashMap<i64, (&'a str, &'a str)>,
    subcategories: HashMap<i64, &'a str>,
    levels: HashMap<i64, &'a str>,
}

impl<'a> DisplayNames<'a> {
    fn new(snapshot: &'a Snapshot) -> Self {
        Self {
            regions: snapshot
                .regions
                .iter()
                .map(|r| (r.id, (r.name.as_str(), r.abbreviation.as_str())))
                .collect(),
            subcategories: snapshot
                .subcategories
                .iter()
                .map(|s| (s.id, s.name.as_str()))
                .collect(),
            levels: snapshot
                .school_levels
                .iter()
                .map(|l| (l.id, l.name.as_str()))
                .collect(),
        }
    }

    fn entry(&self, position: i64, row: &ResultRow) -> TabulationEntry {
        let region = self.regions.get(&row.region_id);
        TabulationEntry {
            position,
            source_type: row.source_type,
            event: row.event_key,
            stage_rank: row.stage_rank,
            subcategory_id: row.subcategory_id,
            subcategory: self.subcategories.get(&row.subcategory_id).map(|s| s.to_string()),
            main_category: row.main_category.clone(),
            school_level_id: row.school_level_id,
            school_level: row
                .school_level_id
                .and_then(|id| self.levels.get(&id))
                .map(|s| s.to_string()),
            region_id: row.region_id,
            region: region.map(|(name, _)| name.to_string()),
            region_abbreviation: region.map(|(_, abbr)| abbr.to_string()),
            team_id: row.team_id,
            placement: row.placement,
            placement_label: row.placement.to_string(),
            participant_id: row.participant.id,
            first_name: row.participant.first_name.clone(),
            last_name: row.participant.last_name.clone(),
            sex: row.participant.sex.clone(),
            birth_date: row.participant.birth_date,
            school_id: row.participant.school_id,
        }
    }
}
