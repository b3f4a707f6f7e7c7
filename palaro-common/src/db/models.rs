//! Store row models
//!
//! One struct per table the results engine reads. Field names follow the
//! column names so `sqlx::FromRow` maps them directly.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Region {
    pub id: i64,
    pub name: String,
    pub abbreviation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct SchoolLevel {
    pub id: i64,
    pub name: String,
}

/// Sport subcategory; `school_level_id` is the subcategory → level mapping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct SportSubcategory {
    pub id: i64,
    pub sport_id: Option<i64>,
    pub name: String,
    pub main_category: Option<String>,
    pub school_level_id: Option<i64>,
}

/// Competition stage; higher `stage_order` is a later stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Stage {
    pub id: i64,
    pub name: String,
    pub stage_order: i64,
}

/// Roster entry; `birth_date` is kept as stored text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Participant {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub sex: Option<String>,
    pub birth_date: Option<String>,
    pub school_id: Option<i64>,
    pub sport_id: Option<i64>,
}

impl Participant {
    /// Birth date as `YYYY-MM-DD`, or the date part of a stored timestamp
    ///
    /// Unreadable values yield `None`.
    pub fn parsed_birth_date(&self) -> Option<NaiveDate> {
        let raw = self.birth_date.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .or_else(|| raw.get(..10).and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()));
        if date.is_none() {
            debug!(participant_id = self.id, birth_date = raw, "Ignoring unreadable birth date");
        }
        date
    }
}

/// Bracket (versus/elimination) event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Event {
    pub id: i64,
    pub subcategory_id: i64,
    pub stage_id: Option<i64>,
    pub is_finished: bool,
}

/// Team record within a bracket event
///
/// `rank` is the raw placement label as stored ("Gold", "2", NULL, ...).
/// `performance_score_id` links the record to a performance score when the
/// bracket placement was decided by a performance final.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct EventTeam {
    pub id: i64,
    pub event_id: i64,
    pub region_id: i64,
    pub team_id: Option<i64>,
    pub rank: Option<String>,
    pub performance_score_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct EventTeamPlayer {
    pub event_team_id: i64,
    pub participant_id: i64,
}

/// Performance (score/time based) event
///
/// `event_id` is set when the performance event has its own bracket event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PerformanceEvent {
    pub id: i64,
    pub subcategory_id: i64,
    pub stage_id: Option<i64>,
    pub main_category: Option<String>,
    pub is_finished: bool,
    pub event_id: Option<i64>,
}

/// One entrant row of a performance event; team entrants share `team_id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PerformanceTeam {
    pub id: i64,
    pub performance_event_id: i64,
    pub region_id: i64,
    pub team_id: Option<i64>,
    pub player_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PerformanceScore {
    pub id: i64,
    pub performance_team_id: i64,
    pub sport_subcategory_id: i64,
    pub rank: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn participant(birth_date: Option<&str>) -> Participant {
        Participant {
            id: 1,
            first_name: "Ana".to_string(),
            last_name: "Santos".to_string(),
            sex: None,
            birth_date: birth_date.map(str::to_string),
            school_id: None,
            sport_id: None,
        }
    }

    #[test]
    fn test_parsed_birth_date() {
        let expected = NaiveDate::from_ymd_opt(2010, 3, 14);
        assert_eq!(participant(Some("2010-03-14")).parsed_birth_date(), expected);
        assert_eq!(participant(Some("2010-03-14 00:00:00")).parsed_birth_date(), expected);
        assert_eq!(participant(Some("2010-03-14T08:30:00Z")).parsed_birth_date(), expected);
    }

    #[test]
    fn test_unreadable_birth_date_is_none() {
        for raw in [None, Some(""), Some("14/03/2010"), Some("2010-02-30"), Some("unknown")] {
            assert_eq!(participant(raw).parsed_birth_date(), None, "raw = {:?}", raw);
        }
    }
}
