//! Engine data model

use chrono::NaiveDate;
use palaro_common::db::{
    Event, EventTeam, EventTeamPlayer, Participant, PerformanceEvent, PerformanceScore,
    PerformanceTeam, Region, SchoolLevel, SportSubcategory, Stage,
};
use serde::Serialize;

use super::placement::PlacementLabel;

/// Read-only copy of every row the engine consumes for one request
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub regions: Vec<Region>,
    pub school_levels: Vec<SchoolLevel>,
    pub subcategories: Vec<SportSubcategory>,
    pub stages: Vec<Stage>,
    pub participants: Vec<Participant>,
    pub events: Vec<Event>,
    pub event_teams: Vec<EventTeam>,
    pub event_team_players: Vec<EventTeamPlayer>,
    pub performance_events: Vec<PerformanceEvent>,
    pub performance_teams: Vec<PerformanceTeam>,
    pub performance_scores: Vec<PerformanceScore>,
}

/// Feeder a result row was normalized from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    Bracket,
    Performance,
}

/// Event family of a row: the performance id when the row has one, otherwise
/// the bracket event id. Kept as separate variants so ids from the two tables
/// never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum EventKey {
    Event(i64),
    Performance(i64),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParticipantRef {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub sex: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub school_id: Option<i64>,
    pub sport_id: Option<i64>,
}

impl From<&Participant> for ParticipantRef {
    fn from(p: &Participant) -> Self {
        Self {
            id: p.id,
            first_name: p.first_name.clone(),
            last_name: p.last_name.clone(),
            sex: p.sex.clone(),
            birth_date: p.parsed_birth_date(),
            school_id: p.school_id,
            sport_id: p.sport_id,
        }
    }
}

/// One participant's placement in one event family, common to both feeders
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRow {
    pub source_type: SourceType,
    pub event_key: EventKey,
    /// Stage order of the row's stage; higher is later
    pub stage_rank: i64,
    pub subcategory_id: i64,
    pub main_category: Option<String>,
    pub school_level_id: Option<i64>,
    pub region_id: i64,
    /// Present only for placements recorded at team granularity
    pub team_id: Option<i64>,
    pub placement: PlacementLabel,
    pub participant: ParticipantRef,
}

/// `(participant, subcategory, event family)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PartitionKey {
    pub participant_id: i64,
    pub subcategory_id: i64,
    pub event_key: EventKey,
}

impl ResultRow {
    pub fn partition_key(&self) -> PartitionKey {
        PartitionKey {
            participant_id: self.participant.id,
            subcategory_id: self.subcategory_id,
            event_key: self.event_key,
        }
    }
}
