//! Tie-breaker resolution for group standings
//!
//! Sort keys by mode:
//!
//! Swiss + WINS: Swiss points, head-to-head, twenties, rating snapshot.
//!
//! Round robin, or POINTS mode: primary value, twenties, head-to-head,
//! rating snapshot. The primary value is points scored in POINTS mode and
//! match points for a round robin ranked by wins.
//!
//! Head-to-head only compares the two entries in hand, so a three-way cycle
//! (A beat B, B beat C, C beat A) has no consistent order. The resolver keeps
//! that pairwise rule and relies on a stable insertion sort, which tolerates
//! a non-transitive comparator and always yields the same order for the same
//! input.

use crate::types::{
    HeadToHeadRecord, HeadToHeadResult, Participant, ParticipantId, RankingMode, Standing,
    TieReason,
};
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Value that ranks entries first, before any tie-break
pub fn primary_value(standing: &Standing, is_swiss: bool, mode: RankingMode) -> u32 {
    match (is_swiss, mode) {
        (true, RankingMode::Wins) => standing.swiss_points(),
        (_, RankingMode::Points) => standing.total_points_scored,
        (false, RankingMode::Wins) => standing.points,
    }
}

/// Head-to-head between two entries: `Less` if `a` beat `b`
///
/// Ties and pairs that never met carry no information.
fn head_to_head(a: &Standing, b: &Standing) -> Option<Ordering> {
    let from_a = a
        .head_to_head
        .get(&b.participant_id)
        .map(|record| record.result);
    let from_b = b
        .head_to_head
        .get(&a.participant_id)
        .map(|record| record.result);

    match (from_a, from_b) {
        (Some(HeadToHeadResult::Win), _) | (None, Some(HeadToHeadResult::Loss)) => {
            Some(Ordering::Less)
        }
        (Some(HeadToHeadResult::Loss), _) | (None, Some(HeadToHeadResult::Win)) => {
            Some(Ordering::Greater)
        }
        _ => None,
    }
}

struct Comparator<'a> {
    ratings: HashMap<&'a str, f64>,
    is_swiss: bool,
    mode: RankingMode,
}

impl<'a> Comparator<'a> {
    fn new(participants: &'a [Participant], is_swiss: bool, mode: RankingMode) -> Self {
        Self {
            ratings: participants
                .iter()
                .map(|p| (p.id.as_str(), p.rating))
                .collect(),
            is_swiss,
            mode,
        }
    }

    fn rating(&self, standing: &Standing) -> f64 {
        self.ratings
            .get(standing.participant_id.as_str())
            .copied()
            .unwrap_or(0.0)
    }

    /// Every criterion except the rating snapshot
    fn compare_results(&self, a: &Standing, b: &Standing) -> Ordering {
        let primary = primary_value(b, self.is_swiss, self.mode)
            .cmp(&primary_value(a, self.is_swiss, self.mode));
        let twenties = b.total_twenties.cmp(&a.total_twenties);
        let h2h = head_to_head(a, b).unwrap_or(Ordering::Equal);

        if self.is_swiss && self.mode == RankingMode::Wins {
            primary.then(h2h).then(twenties)
        } else {
            primary.then(twenties).then(h2h)
        }
    }

    fn compare(&self, a: &Standing, b: &Standing) -> Ordering {
        self.compare_results(a, b)
            .then_with(|| self.rating(b).total_cmp(&self.rating(a)))
    }
}

/// Stable insertion sort that never panics on an inconsistent comparator
fn insertion_sort_by<T, F>(items: &mut [T], mut compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    for i in 1..items.len() {
        let mut j = i;
        while j > 0 && compare(&items[j - 1], &items[j]) == Ordering::Greater {
            items.swap(j - 1, j);
            j -= 1;
        }
    }
}

/// Sort standings, assign positions 1..=N and mark unresolved ties
///
/// Entries that only the rating snapshot separates get
/// `tie_reason = Unresolved` and list each other in `tied_with`, so the
/// organiser can decide whether a playoff is needed. The input is left
/// untouched.
pub fn resolve_tiebreaker(
    standings: &[Standing],
    participants: &[Participant],
    is_swiss: bool,
    mode: RankingMode,
) -> Vec<Standing> {
    let comparator = Comparator::new(participants, is_swiss, mode);

    let mut sorted = standings.to_vec();
    insertion_sort_by(&mut sorted, |a, b| comparator.compare(a, b));

    let tied: Vec<Vec<ParticipantId>> = sorted
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            sorted
                .iter()
                .enumerate()
                .filter(|(j, other)| {
                    *j != i && comparator.compare_results(entry, other) == Ordering::Equal
                })
                .map(|(_, other)| other.participant_id.clone())
                .collect()
        })
        .collect();

    for (index, (entry, tied_with)) in sorted.iter_mut().zip(tied).enumerate() {
        entry.position = index as u32 + 1;
        entry.tie_reason = if tied_with.is_empty() {
            None
        } else {
            warn!(
                "Unresolved tie at position {}: {} tied with {:?}",
                entry.position, entry.participant_id, tied_with
            );
            Some(TieReason::Unresolved)
        };
        entry.tied_with = tied_with;
    }

    debug!(
        "Resolved standings for {} entries ({} mode, swiss: {})",
        sorted.len(),
        mode,
        is_swiss
    );

    sorted
}

/// Record a result between two entries on both sides
///
/// `winner = None` records a tie. Entries not present are ignored and the
/// standings come back unchanged.
pub fn update_head_to_head_record(
    standings: &[Standing],
    participant_a: &str,
    participant_b: &str,
    winner: Option<&str>,
    twenties_a: u32,
    twenties_b: u32,
) -> Vec<Standing> {
    let mut updated = standings.to_vec();

    let index_a = updated.iter().position(|s| s.participant_id == participant_a);
    let index_b = updated.iter().position(|s| s.participant_id == participant_b);
    let (Some(index_a), Some(index_b)) = (index_a, index_b) else {
        return updated;
    };

    let (result_a, result_b) = match winner {
        None => (HeadToHeadResult::Tie, HeadToHeadResult::Tie),
        Some(w) if w == participant_a => (HeadToHeadResult::Win, HeadToHeadResult::Loss),
        Some(_) => (HeadToHeadResult::Loss, HeadToHeadResult::Win),
    };

    updated[index_a].head_to_head.insert(
        participant_b.to_string(),
        HeadToHeadRecord {
            result: result_a,
            twenties: twenties_a,
        },
    );
    updated[index_b].head_to_head.insert(
        participant_a.to_string(),
        HeadToHeadRecord {
            result: result_b,
            twenties: twenties_b,
        },
    );

    updated
}

/// Match points: 2 per win, 1 per tie
pub fn calculate_match_points(wins: u32, ties: u32) -> u32 {
    wins * 2 + ties
}

fn by_position(standings: &[Standing]) -> Vec<&Standing> {
    let mut sorted: Vec<&Standing> = standings.iter().collect();
    sorted.sort_by_key(|s| s.position);
    sorted
}

/// Top `num_qualifiers` participant ids by position
pub fn get_qualifiers(standings: &[Standing], num_qualifiers: usize) -> Vec<ParticipantId> {
    by_position(standings)
        .into_iter()
        .take(num_qualifiers)
        .map(|s| s.participant_id.clone())
        .collect()
}

/// Whether the last qualifier and the first non-qualifier share match points
pub fn has_tie_for_qualification(standings: &[Standing], num_qualifiers: usize) -> bool {
    if num_qualifiers == 0 || num_qualifiers >= standings.len() {
        return false;
    }

    let sorted = by_position(standings);
    sorted[num_qualifiers - 1].points == sorted[num_qualifiers].points
}

/// All participants sharing match points with the entry at `position`
pub fn get_participants_in_tie(standings: &[Standing], position: u32) -> Vec<ParticipantId> {
    let sorted = by_position(standings);
    if position < 1 || position as usize > sorted.len() {
        return Vec::new();
    }

    let target = sorted[position as usize - 1].points;
    sorted
        .into_iter()
        .filter(|s| s.points == target)
        .map(|s| s.participant_id.clone())
        .collect()
}
