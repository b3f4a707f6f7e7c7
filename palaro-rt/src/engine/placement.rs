//! Placement labels
//!
//! The store keeps placements as loosely-typed text: sometimes a medal name,
//! sometimes a numeric rank, sometimes nothing. The text is parsed exactly once,
//! during normalization, into [`PlacementLabel`]; nothing downstream looks at
//! the raw string again.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Medal tier; the discriminant is the tier's ordinal (Gold = 1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MedalTier {
    Gold = 1,
    Silver = 2,
    Bronze = 3,
}

impl MedalTier {
    pub fn ordinal(self) -> u32 {
        self as u32
    }

    pub fn name(self) -> &'static str {
        match self {
            MedalTier::Gold => "Gold",
            MedalTier::Silver => "Silver",
            MedalTier::Bronze => "Bronze",
        }
    }
}

/// Parsed placement of one result row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PlacementLabel {
    Medal(MedalTier),
    /// Numeric rank, always > 0
    Numeric(u32),
    Unplaced,
}

impl PlacementLabel {
    /// Parse a raw stored rank
    ///
    /// Medal names match case-insensitively after trimming. Positive integers,
    /// including whole-number reals such as `1.0`, become `Numeric`. Anything else (NULL, empty, zero, negative, free
    /// text) is `Unplaced`.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return PlacementLabel::Unplaced;
        };

        if raw.eq_ignore_ascii_case("gold") {
            PlacementLabel::Medal(MedalTier::Gold)
        } else if raw.eq_ignore_ascii_case("silver") {
            PlacementLabel::Medal(MedalTier::Silver)
        } else if raw.eq_ignore_ascii_case("bronze") {
            PlacementLabel::Medal(MedalTier::Bronze)
        } else {
            match raw.parse::<u32>() {
                Ok(n) if n > 0 => PlacementLabel::Numeric(n),
                Ok(_) => PlacementLabel::Unplaced,
                Err(_) => whole_number(raw).map_or(PlacementLabel::Unplaced, PlacementLabel::Numeric),
            }
        }
    }

    /// Rank group: Medal (0) < Numeric (1) < Unplaced (2)
    pub fn group(&self) -> u8 {
        match self {
            PlacementLabel::Medal(_) => 0,
            PlacementLabel::Numeric(_) => 1,
            PlacementLabel::Unplaced => 2,
        }
    }

    /// Value compared within a group; Unplaced sits above every real placement
    fn value(&self) -> u32 {
        match self {
            PlacementLabel::Medal(tier) => tier.ordinal(),
            PlacementLabel::Numeric(n) => *n,
            PlacementLabel::Unplaced => u32::MAX,
        }
    }

    /// Compare by significance: `Less` means `self` is the stronger placement
    pub fn significance_cmp(&self, other: &Self) -> Ordering {
        self.group()
            .cmp(&other.group())
            .then_with(|| self.value().cmp(&other.value()))
    }

    pub fn medal(&self) -> Option<MedalTier> {
        match self {
            PlacementLabel::Medal(tier) => Some(*tier),
            _ => None,
        }
    }
}

/// Positive whole-number real (`"2.0"`) as a rank
fn whole_number(raw: &str) -> Option<u32> {
    let value = raw.parse::<f64>().ok()?;
    (value.fract() == 0.0 && value >= 1.0 && value <= f64::from(u32::MAX)).then(|| value as u32)
}

impl fmt::Display for PlacementLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlacementLabel::Medal(tier) => f.write_str(tier.name()),
            PlacementLabel::Numeric(n) => write!(f, "{}", n),
            PlacementLabel::Unplaced => Ok(()),
        }
    }
}
