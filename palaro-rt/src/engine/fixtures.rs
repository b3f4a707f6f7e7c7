//! In-memory snapshot builder for engine unit tests

use palaro_common::db::{
    Event, EventTeam, EventTeamPlayer, Participant, PerformanceEvent, PerformanceScore,
    PerformanceTeam, Region, SchoolLevel, SportSubcategory, Stage,
};

use super::placement::PlacementLabel;
use super::types::{EventKey, ParticipantRef, ResultRow, Snapshot, SourceType};

#[derive(Default)]
pub(crate) struct SnapshotBuilder {
    snapshot: Snapshot,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn region(mut self, id: i64, name: &str, abbreviation: &str) -> Self {
        self.snapshot.regions.push(Region {
            id,
            name: name.to_string(),
            abbreviation: abbreviation.to_string(),
        });
        self
    }

    pub fn level(mut self, id: i64, name: &str) -> Self {
        self.snapshot.school_levels.push(SchoolLevel {
            id,
            name: name.to_string(),
        });
        self
    }

    pub fn subcategory(mut self, id: i64, school_level_id: Option<i64>) -> Self {
        self.snapshot.subcategories.push(SportSubcategory {
            id,
            sport_id: Some(1),
            name: format!("Subcategory {}", id),
            main_category: Some(format!("Category {}", id)),
            school_level_id,
        });
        self
    }

    pub fn stage(mut self, id: i64, stage_order: i64) -> Self {
        self.snapshot.stages.push(Stage {
            id,
            name: format!("Stage {}", id),
            stage_order,
        });
        self
    }

    pub fn participant(mut self, id: i64, last_name: &str) -> Self {
        self.snapshot.participants.push(Participant {
            id,
            first_name: format!("P{}", id),
            last_name: last_name.to_string(),
            sex: Some("F".to_string()),
            birth_date: None,
            school_id: Some(1),
            sport_id: Some(1),
        });
        self
    }

    pub fn event(mut self, id: i64, subcategory_id: i64, stage_id: Option<i64>, is_finished: bool) -> Self {
        self.snapshot.events.push(Event {
            id,
            subcategory_id,
            stage_id,
            is_finished,
        });
        self
    }

    pub fn event_team(
        mut self,
        id: i64,
        event_id: i64,
        region_id: i64,
        team_id: Option<i64>,
        rank: Option<&str>,
        performance_score_id: Option<i64>,
    ) -> Self {
        self.snapshot.event_teams.push(EventTeam {
            id,
            event_id,
            region_id,
            team_id,
            rank: rank.map(str::to_string),
            performance_score_id,
        });
        self
    }

    pub fn player(mut self, event_team_id: i64, participant_id: i64) -> Self {
        self.snapshot.event_team_players.push(EventTeamPlayer {
            event_team_id,
            participant_id,
        });
        self
    }

    pub fn performance_event(
        mut self,
        id: i64,
        subcategory_id: i64,
        stage_id: Option<i64>,
        is_finished: bool,
        event_id: Option<i64>,
    ) -> Self {
        self.snapshot.performance_events.push(PerformanceEvent {
            id,
            subcategory_id,
            stage_id,
            main_category: Some(format!("Main {}", id)),
            is_finished,
            event_id,
        });
        self
    }

    pub fn performance_team(
        mut self,
        id: i64,
        performance_event_id: i64,
        region_id: i64,
        team_id: Option<i64>,
        player_id: Option<i64>,
    ) -> Self {
        self.snapshot.performance_teams.push(PerformanceTeam {
            id,
            performance_event_id,
            region_id,
            team_id,
            player_id,
        });
        self
    }

    pub fn score(mut self, id: i64, performance_team_id: i64, sport_subcategory_id: i64, rank: Option<&str>) -> Self {
        self.snapshot.performance_scores.push(PerformanceScore {
            id,
            performance_team_id,
            sport_subcategory_id,
            rank: rank.map(str::to_string),
        });
        self
    }

    pub fn build(self) -> Snapshot {
        self.snapshot
    }
}

/// Bracket result row with just the fields the resolver, orderer and tally read
pub(crate) fn row(participant_id: i64, last_name: &str, stage_rank: i64, placement: PlacementLabel) -> ResultRow {
    ResultRow {
        source_type: SourceType::Bracket,
        event_key: EventKey::Event(1),
        stage_rank,
        subcategory_id: 10,
        main_category: None,
        school_level_id: Some(1),
        region_id: 1,
        team_id: None,
        placement,
        participant: ParticipantRef {
            id: participant_id,
            first_name: format!("P{}", participant_id),
            last_name: last_name.to_string(),
            sex: None,
            birth_date: None,
            school_id: None,
            sport_id: None,
        },
    }
}
