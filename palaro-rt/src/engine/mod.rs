//! Results aggregation and ranking engine
//!
//! Pure functions over a [`Snapshot`]; no I/O, no shared state.
//!
//! - Tabulation feed: normalize → resolve precedence → order
//! - Medal tally: normalize (bracket only) → tally

pub mod normalizer;
pub mod ordering;
pub mod placement;
pub mod precedence;
pub mod tally;
pub mod types;

#[cfg(test)]
pub(crate) mod fixtures;

pub use placement::{MedalTier, PlacementLabel};
pub use tally::{LevelScope, LevelTally, MedalTallyRow};
pub use types::{EventKey, ParticipantRef, ResultRow, Snapshot, SourceType};

use palaro_common::db::Region;

/// Canonical per-participant placement feed
pub fn tabulate(snapshot: &Snapshot) -> Vec<ResultRow> {
    let normalized = normalizer::normalize(snapshot);
    let resolved = precedence::resolve(normalized.rows);
    ordering::order(resolved)
}

/// Region-only medal table
pub fn medal_table(snapshot: &Snapshot, region_filter: Option<i64>) -> Vec<MedalTallyRow> {
    let normalized = normalizer::normalize_bracket(snapshot);
    tally::medal_tally(&normalized.rows, &snapshot.regions, region_filter)
}

/// Medal tables per school level
pub fn level_medal_tables(
    snapshot: &Snapshot,
    scope: LevelScope,
    region_filter: Option<i64>,
) -> Vec<LevelTally> {
    let normalized = normalizer::normalize_bracket(snapshot);
    tally::level_tally(
        &normalized.rows,
        &snapshot.regions,
        &snapshot.school_levels,
        scope,
        region_filter,
    )
}

/// Region whose name or abbreviation matches `query` (trimmed, ASCII case-insensitive)
pub fn find_region<'a>(regions: &'a [Region], query: &str) -> Option<&'a Region> {
    let query = query.trim();
    regions
        .iter()
        .find(|r| r.name.eq_ignore_ascii_case(query) || r.abbreviation.eq_ignore_ascii_case(query))
}
