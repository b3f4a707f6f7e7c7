//! Query parameter parsing shared by the tabulation and medal routes

use palaro_common::db::{Region, SchoolLevel};
use serde::Deserialize;

use crate::engine::{find_region, LevelScope};
use crate::error::{ApiError, ApiResult};

/// Literal `level` value selecting the Unassigned bucket
pub const UNASSIGNED_PARAM: &str = "unassigned";

/// Query parameters accepted by the medal routes
#[derive(Debug, Default, Deserialize)]
pub struct MedalQuery {
    /// Region name or abbreviation
    pub region: Option<String>,
    /// School level id or `unassigned`
    pub level: Option<String>,
}

/// Region id for an optional `region` parameter; a blank value means no filter
pub fn region_filter(regions: &[Region], param: Option<&str>) -> ApiResult<Option<i64>> {
    match param.map(str::trim).filter(|p| !p.is_empty()) {
        None => Ok(None),
        Some(query) => find_region(regions, query)
            .map(|r| Some(r.id))
            .ok_or_else(|| ApiError::NotFound(format!("Unknown region: {}", query))),
    }
}

/// Level scope for an optional `level` parameter; a blank value means every level
pub fn level_scope(levels: &[SchoolLevel], param: Option<&str>) -> ApiResult<LevelScope> {
    let Some(raw) = param.map(str::trim).filter(|p| !p.is_empty()) else {
        return Ok(LevelScope::All);
    };

    if raw.eq_ignore_ascii_case(UNASSIGNED_PARAM) {
        return Ok(LevelScope::Unassigned);
    }

    let id: i64 = raw.parse().map_err(|_| {
        ApiError::BadRequest(format!(
            "level must be a school level id or '{}', got '{}'",
            UNASSIGNED_PARAM, raw
        ))
    })?;

    if levels.iter().any(|l| l.id == id) {
        Ok(LevelScope::Level(id))
    } else {
        Err(ApiError::NotFound(format!("Unknown school level: {}", id)))
    }
}

/// 1-indexed page number; absent or blank means page 1
///
/// Out-of-range numbers are clamped later by pagination.
pub fn page_number(param: Option<&str>) -> ApiResult<i64> {
    match param.map(str::trim).filter(|p| !p.is_empty()) {
        None => Ok(1),
        Some(raw) => raw
            .parse()
            .map_err(|_| ApiError::BadRequest(format!("page must be an integer, got '{}'", raw))),
    }
}
