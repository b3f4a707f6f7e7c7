//! Rank Orderer
//!
//! Presentation order of resolved rows:
//! 1. Stage descending (latest stage first)
//! 2. Medal < Numeric < Unplaced
//! 3. Gold < Silver < Bronze; ascending numeric rank
//! 4. Last name ascending, case-insensitive
//!
//! The sort is stable so equal keys keep their input order and paging stays
//! reproducible.

use std::cmp::Ordering;

use super::types::ResultRow;

pub fn rank_cmp(a: &ResultRow, b: &ResultRow) -> Ordering {
    b.stage_rank
        .cmp(&a.stage_rank)
        .then_with(|| a.placement.significance_cmp(&b.placement))
        .then_with(|| caseless_cmp(&a.participant.last_name, &b.participant.last_name))
}

pub fn order(mut rows: Vec<ResultRow>) -> Vec<ResultRow> {
    rows.sort_by(rank_cmp);
    rows
}

fn caseless_cmp(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}
