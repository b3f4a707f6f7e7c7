//! Row Normalizer
//!
//! Maps the bracket and performance feeders into [`ResultRow`]s. Three disjoint
//! cases contribute rows:
//!
//! 1. Bracket team records with no performance score link. Placement and
//!    region come from the bracket record, stage from the bracket event,
//!    participants from the team-player join.
//! 2. Bracket team records linked to a performance score whose performance
//!    event has no bracket event of its own. Placement and region still come
//!    from the bracket record; the participant is resolved through
//!    score → performance team → player and the stage through the performance
//!    event.
//! 3. Performance scores that no bracket record links to, in performance
//!    events with no bracket event of their own. Placement comes from the
//!    score, region from the performance team.
//!
//! Only finished events contribute. Dangling references are skipped and
//! counted, never raised.

use palaro_common::db::{
    Event, Participant, PerformanceEvent, PerformanceScore, PerformanceTeam, SportSubcategory,
};
use std::collections::{HashMap, HashSet};
use tracing::debug;

use super::placement::PlacementLabel;
use super::types::{EventKey, ParticipantRef, ResultRow, Snapshot, SourceType};

/// Normalization output
#[derive(Debug, Clone, Default)]
pub struct Normalized {
    pub rows: Vec<ResultRow>,
    /// Source rows dropped because a cross-reference pointed at a missing row
    pub gaps: usize,
}

/// Normalize both feeders (all three cases)
pub fn normalize(snapshot: &Snapshot) -> Normalized {
    let index = Index::build(snapshot);
    let mut out = Normalized::default();

    unlinked_bracket_rows(snapshot, &index, &mut out);
    linked_bracket_rows(snapshot, &index, &mut out);
    performance_rows(snapshot, &index, &mut out);

    debug!(rows = out.rows.len(), gaps = out.gaps, "Normalized result rows");
    out
}

/// Normalize the bracket feeder only (cases 1 and 2); input of the medal tally
pub fn normalize_bracket(snapshot: &Snapshot) -> Normalized {
    let index = Index::build(snapshot);
    let mut out = Normalized::default();

    unlinked_bracket_rows(snapshot, &index, &mut out);
    linked_bracket_rows(snapshot, &index, &mut out);

    debug!(rows = out.rows.len(), gaps = out.gaps, "Normalized bracket rows");
    out
}

/// Id lookups over one snapshot
struct Index<'a> {
    stage_orders: HashMap<i64, i64>,
    subcategories: HashMap<i64, &'a SportSubcategory>,
    participants: HashMap<i64, &'a Participant>,
    events: HashMap<i64, &'a Event>,
    /// Event team id → member participant ids, in store order
    members: HashMap<i64, Vec<i64>>,
    performance_events: HashMap<i64, &'a PerformanceEvent>,
    performance_teams: HashMap<i64, &'a PerformanceTeam>,
    performance_scores: HashMap<i64, &'a PerformanceScore>,
    /// Scores some bracket team record links to
    linked_scores: HashSet<i64>,
}

impl<'a> Index<'a> {
    fn build(s: &'a Snapshot) -> Self {
        let mut members: HashMap<i64, Vec<i64>> = HashMap::new();
        for link in &s.event_team_players {
            members
                .entry(link.event_team_id)
                .or_default()
                .push(link.participant_id);
        }

        Self {
            stage_orders: s.stages.iter().map(|st| (st.id, st.stage_order)).collect(),
            subcategories: s.subcategories.iter().map(|sc| (sc.id, sc)).collect(),
            participants: s.participants.iter().map(|p| (p.id, p)).collect(),
            events: s.events.iter().map(|e| (e.id, e)).collect(),
            members,
            performance_events: s.performance_events.iter().map(|e| (e.id, e)).collect(),
            performance_teams: s.performance_teams.iter().map(|t| (t.id, t)).collect(),
            performance_scores: s.performance_scores.iter().map(|sc| (sc.id, sc)).collect(),
            linked_scores: s
                .event_teams
                .iter()
                .filter_map(|t| t.performance_score_id)
                .collect(),
        }
    }

    /// Stage order of a stage id; rows without a known stage rank lowest
    fn stage_rank(&self, stage_id: Option<i64>) -> i64 {
        stage_id
            .and_then(|id| self.stage_orders.get(&id).copied())
            .unwrap_or(0)
    }

    fn school_level(&self, subcategory_id: i64) -> Option<i64> {
        self.subcategories
            .get(&subcategory_id)
            .and_then(|sc| sc.school_level_id)
    }

    fn main_category(&self, subcategory_id: i64) -> Option<String> {
        self.subcategories
            .get(&subcategory_id)
            .and_then(|sc| sc.main_category.clone())
    }

    /// Follow score → performance team → performance event
    fn score_chain(
        &self,
        score_id: i64,
    ) -> Option<(&'a PerformanceScore, &'a PerformanceTeam, &'a PerformanceEvent)> {
        let score = *self.performance_scores.get(&score_id)?;
        let team = *self.performance_teams.get(&score.performance_team_id)?;
        let event = *self.performance_events.get(&team.performance_event_id)?;
        Some((score, team, event))
    }
}

fn unlinked_bracket_rows(s: &Snapshot, index: &Index<'_>, out: &mut Normalized) {
    for team in s.event_teams.iter().filter(|t| t.performance_score_id.is_none()) {
        let Some(event) = index.events.get(&team.event_id) else {
            debug!(event_team_id = team.id, event_id = team.event_id, "Skipping team record: event missing");
            out.gaps += 1;
            continue;
        };
        if !event.is_finished {
            continue;
        }

        let placement = PlacementLabel::parse(team.rank.as_deref());
        let stage_rank = index.stage_rank(event.stage_id);
        let members = index.members.get(&team.id).map(Vec::as_slice).unwrap_or(&[]);

        for participant_id in members {
            let Some(participant) = index.participants.get(participant_id) else {
                debug!(event_team_id = team.id, participant_id, "Skipping team member: participant missing");
                out.gaps += 1;
                continue;
            };

            out.rows.push(ResultRow {
                source_type: SourceType::Bracket,
                event_key: EventKey::Event(event.id),
                stage_rank,
                subcategory_id: event.subcategory_id,
                main_category: index.main_category(event.subcategory_id),
                school_level_id: index.school_level(event.subcategory_id),
                region_id: team.region_id,
                team_id: team.team_id,
                placement,
                participant: ParticipantRef::from(*participant),
            });
        }
    }
}

fn linked_bracket_rows(s: &Snapshot, index: &Index<'_>, out: &mut Normalized) {
    for team in &s.event_teams {
        let Some(score_id) = team.performance_score_id else {
            continue;
        };
        let Some(event) = index.events.get(&team.event_id) else {
            debug!(event_team_id = team.id, event_id = team.event_id, "Skipping linked team record: event missing");
            out.gaps += 1;
            continue;
        };
        if !event.is_finished {
            continue;
        }

        let Some((score, perf_team, perf_event)) = index.score_chain(score_id) else {
            debug!(event_team_id = team.id, score_id, "Skipping linked team record: score lineage broken");
            out.gaps += 1;
            continue;
        };
        // A performance event with its own bracket event is tabulated there
        if perf_event.event_id.is_some() || !perf_event.is_finished {
            continue;
        }

        let Some(participant) = perf_team
            .player_id
            .and_then(|id| index.participants.get(&id))
        else {
            debug!(event_team_id = team.id, performance_team_id = perf_team.id, "Skipping linked team record: player missing");
            out.gaps += 1;
            continue;
        };

        let subcategory_id = score.sport_subcategory_id;
        out.rows.push(ResultRow {
            source_type: SourceType::Bracket,
            event_key: EventKey::Performance(perf_event.id),
            stage_rank: index.stage_rank(perf_event.stage_id),
            subcategory_id,
            main_category: perf_event
                .main_category
                .clone()
                .or_else(|| index.main_category(subcategory_id)),
            school_level_id: index.school_level(subcategory_id),
            region_id: team.region_id,
            team_id: team.team_id.or(perf_team.team_id),
            placement: PlacementLabel::parse(team.rank.as_deref()),
            participant: ParticipantRef::from(*participant),
        });
    }
}

fn performance_rows(s: &Snapshot, index: &Index<'_>, out: &mut Normalized) {
    for score in &s.performance_scores {
        if index.linked_scores.contains(&score.id) {
            continue;
        }

        let Some((_, perf_team, perf_event)) = index.score_chain(score.id) else {
            debug!(score_id = score.id, performance_team_id = score.performance_team_id, "Skipping score: performance team or event missing");
            out.gaps += 1;
            continue;
        };
        // A performance event with its own bracket event is tabulated there
        if perf_event.event_id.is_some() || !perf_event.is_finished {
            continue;
        }

        let Some(participant) = perf_team
            .player_id
            .and_then(|id| index.participants.get(&id))
        else {
            debug!(score_id = score.id, performance_team_id = perf_team.id, "Skipping score: player missing");
            out.gaps += 1;
            continue;
        };

        let subcategory_id = score.sport_subcategory_id;
        out.rows.push(ResultRow {
            source_type: SourceType::Performance,
            event_key: EventKey::Performance(perf_event.id),
            stage_rank: index.stage_rank(perf_event.stage_id),
            subcategory_id,
            main_category: perf_event
                .main_category
                .clone()
                .or_else(|| index.main_category(subcategory_id)),
            school_level_id: index.school_level(subcategory_id),
            region_id: perf_team.region_id,
            team_id: perf_team.team_id,
            placement: PlacementLabel::parse(score.rank.as_deref()),
            participant: ParticipantRef::from(*participant),
        });
    }
}
