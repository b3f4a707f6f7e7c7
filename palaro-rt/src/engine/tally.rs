//! Medal Tally Aggregator
//!
//! Counts Gold/Silver/Bronze per region from bracket-source rows.
//!
//! **Team-aware deduplication:** a row with a `team_id` is one member of a team
//! placement, so per tier the region counts each distinct
//! `(school_level_id, subcategory_id, team_id)` once. Rows without a `team_id`
//! are individual placements and count once each. The composite key keeps two
//! unrelated teams that reuse a raw team id under different subcategories
//! apart.
//!
//! Output rows follow the medal-table cascade: gold desc, total desc,
//! silver desc, bronze desc, region asc.

use palaro_common::db::{Region, SchoolLevel};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap, HashSet};

use super::placement::MedalTier;
use super::types::{ResultRow, SourceType};

/// Display name of the level bucket holding medals with no level mapping
pub const UNASSIGNED_LEVEL: &str = "Unassigned";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MedalTallyRow {
    pub region_id: i64,
    pub region: String,
    pub abbreviation: String,
    pub gold: u32,
    pub silver: u32,
    pub bronze: u32,
    pub total: u32,
}

/// Medal table of one school level
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LevelTally {
    /// `None` for the Unassigned bucket
    pub school_level_id: Option<i64>,
    pub school_level: String,
    pub medals: Vec<MedalTallyRow>,
}

/// Which level buckets a level-scoped tally reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelScope {
    /// Every known level, plus Unassigned when any medal lacks a known level
    All,
    Level(i64),
    Unassigned,
}

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
struct TeamKey {
    school_level_id: Option<i64>,
    subcategory_id: i64,
    team_id: i64,
}

#[derive(Debug, Default)]
struct TierCount {
    individuals: u32,
    teams: HashSet<TeamKey>,
}

impl TierCount {
    fn count(&self) -> u32 {
        self.individuals + self.teams.len() as u32
    }
}

#[derive(Debug, Default)]
struct RegionMedals {
    gold: TierCount,
    silver: TierCount,
    bronze: TierCount,
}

impl RegionMedals {
    fn tier_mut(&mut self, tier: MedalTier) -> &mut TierCount {
        match tier {
            MedalTier::Gold => &mut self.gold,
            MedalTier::Silver => &mut self.silver,
            MedalTier::Bronze => &mut self.bronze,
        }
    }
}

/// Region-only medal table
///
/// Every known region appears (zeros included). Medals of a region id missing
/// from the lookup still count, under a placeholder name, unless the table is
/// filtered to one region.
pub fn medal_tally(
    rows: &[ResultRow],
    regions: &[Region],
    region_filter: Option<i64>,
) -> Vec<MedalTallyRow> {
    let counts = accumulate(rows.iter());
    tabulate(&counts, regions, region_filter)
}

/// Medal tables split by school level
///
/// Each level table lists every known region exactly once. A medal whose
/// subcategory has no level, or maps to a level absent from the lookup, lands
/// in the Unassigned bucket.
pub fn level_tally(
    rows: &[ResultRow],
    regions: &[Region],
    levels: &[SchoolLevel],
    scope: LevelScope,
    region_filter: Option<i64>,
) -> Vec<LevelTally> {
    let known: BTreeSet<i64> = levels.iter().map(|l| l.id).collect();
    let bucket_of = |row: &ResultRow| row.school_level_id.filter(|id| known.contains(id));

    let mut levels_sorted: Vec<&SchoolLevel> = levels.iter().collect();
    levels_sorted.sort_by_key(|l| l.id);

    let mut buckets: Vec<(Option<i64>, String)> = match scope {
        LevelScope::All => levels_sorted
            .iter()
            .map(|l| (Some(l.id), l.name.clone()))
            .collect(),
        LevelScope::Level(id) => levels_sorted
            .iter()
            .filter(|l| l.id == id)
            .map(|l| (Some(l.id), l.name.clone()))
            .collect(),
        LevelScope::Unassigned => vec![(None, UNASSIGNED_LEVEL.to_string())],
    };

    if scope == LevelScope::All
        && rows
            .iter()
            .any(|r| is_medal_row(r) && bucket_of(r).is_none())
    {
        buckets.push((None, UNASSIGNED_LEVEL.to_string()));
    }

    buckets
        .into_iter()
        .map(|(school_level_id, school_level)| {
            let counts = accumulate(rows.iter().filter(|r| bucket_of(*r) == school_level_id));
            LevelTally {
                school_level_id,
                school_level,
                medals: tabulate(&counts, regions, region_filter),
            }
        })
        .collect()
}

/// Medal-table order: gold desc, total desc, silver desc, bronze desc, region asc
pub fn medal_table_cmp(a: &MedalTallyRow, b: &MedalTallyRow) -> Ordering {
    b.gold
        .cmp(&a.gold)
        .then_with(|| b.total.cmp(&a.total))
        .then_with(|| b.silver.cmp(&a.silver))
        .then_with(|| b.bronze.cmp(&a.bronze))
        .then_with(|| a.region.cmp(&b.region))
        .then_with(|| a.region_id.cmp(&b.region_id))
}

fn is_medal_row(row: &ResultRow) -> bool {
    row.source_type == SourceType::Bracket && row.placement.medal().is_some()
}

fn accumulate<'a>(rows: impl Iterator<Item = &'a ResultRow>) -> HashMap<i64, RegionMedals> {
    let mut counts: HashMap<i64, RegionMedals> = HashMap::new();

    for row in rows.filter(|r| r.source_type == SourceType::Bracket) {
        let Some(tier) = row.placement.medal() else {
            continue;
        };
        let tier_count = counts.entry(row.region_id).or_default().tier_mut(tier);
        match row.team_id {
            Some(team_id) => {
                tier_count.teams.insert(TeamKey {
                    school_level_id: row.school_level_id,
                    subcategory_id: row.subcategory_id,
                    team_id,
                });
            }
            None => tier_count.individuals += 1,
        }
    }

    counts
}

fn tabulate(
    counts: &HashMap<i64, RegionMedals>,
    regions: &[Region],
    region_filter: Option<i64>,
) -> Vec<MedalTallyRow> {
    let mut table: Vec<MedalTallyRow> = regions
        .iter()
        .filter(|r| region_filter.map_or(true, |id| r.id == id))
        .map(|r| tally_row(r.id, r.name.clone(), r.abbreviation.clone(), counts.get(&r.id)))
        .collect();

    if region_filter.is_none() {
        let known: HashSet<i64> = regions.iter().map(|r| r.id).collect();
        let mut orphans: Vec<i64> = counts.keys().copied().filter(|id| !known.contains(id)).collect();
        orphans.sort_unstable();
        table.extend(
            orphans
                .into_iter()
                .map(|id| tally_row(id, format!("Region {}", id), String::new(), counts.get(&id))),
        );
    }

    table.sort_by(medal_table_cmp);
    table
}

fn tally_row(
    region_id: i64,
    region: String,
    abbreviation: String,
    medals: Option<&RegionMedals>,
) -> MedalTallyRow {
    let (gold, silver, bronze) = medals
        .map(|m| (m.gold.count(), m.silver.count(), m.bronze.count()))
        .unwrap_or((0, 0, 0));

    MedalTallyRow {
        region_id,
        region,
        abbreviation,
        gold,
        silver,
        bronze,
        total: gold + silver + bronze,
    }
}
