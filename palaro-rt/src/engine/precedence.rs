//! Precedence Resolver
//!
//! Keeps one authoritative row per `(participant, subcategory, event family)`
//! partition. Resolution is by significance, not by recording time: the store
//! has no trustworthy global timestamp, so the stage order is the only proxy
//! for "later".
//!
//! Two passes over an arena: rows land in a vector of partition winners, with a
//! hash map from partition key to the winner's slot. A later row replaces the
//! winner only when it is strictly more authoritative, so fully-tied rows keep
//! the first one seen.

use std::cmp::Ordering;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tracing::debug;

use super::types::{PartitionKey, ResultRow};

/// Authority order between two rows of one partition; `Less` means `a` wins
///
/// Higher stage first, then Medal over Numeric over Unplaced, then
/// Gold < Silver < Bronze, then lower numeric rank.
pub fn precedence_cmp(a: &ResultRow, b: &ResultRow) -> Ordering {
    b.stage_rank
        .cmp(&a.stage_rank)
        .then_with(|| a.placement.significance_cmp(&b.placement))
}

/// Reduce rows to one winner per partition, in first-seen partition order
pub fn resolve(rows: Vec<ResultRow>) -> Vec<ResultRow> {
    let input_len = rows.len();
    let mut winners: Vec<ResultRow> = Vec::with_capacity(input_len);
    let mut slots: HashMap<PartitionKey, usize> = HashMap::with_capacity(input_len);

    for row in rows {
        match slots.entry(row.partition_key()) {
            Entry::Occupied(slot) => {
                let incumbent = &mut winners[*slot.get()];
                if precedence_cmp(&row, incumbent) == Ordering::Less {
                    *incumbent = row;
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(winners.len());
                winners.push(row);
            }
        }
    }

    debug!(
        rows = input_len,
        partitions = winners.len(),
        superseded = input_len - winners.len(),
        "Resolved partition precedence"
    );
    winners
}
