//! Standings recomputation from a group's match list
//!
//! Standings are a derived view: every call starts from empty records and
//! replays each resolved match, so a corrected result never leaves stale
//! totals behind.

use crate::standings::tiebreaker::{calculate_match_points, resolve_tiebreaker};
use crate::types::{
    HeadToHeadRecord, HeadToHeadResult, Match, Participant, ParticipantId, RankingMode, Slot,
    Standing,
};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Rebuild and rank the standings of a group
///
/// Only `completed` and `walkover` matches count. A bye is a played and won
/// match for the real participant. Matches naming participants outside
/// `participant_ids` are ignored for the missing side. A winner naming
/// neither side counts as played with no result.
pub fn compute_standings(
    participant_ids: &[ParticipantId],
    matches: &[Match],
    participants: &[Participant],
    is_swiss: bool,
    mode: RankingMode,
) -> Vec<Standing> {
    let mut standings: Vec<Standing> = participant_ids.iter().map(Standing::new).collect();
    let index: HashMap<&str, usize> = participant_ids
        .iter()
        .enumerate()
        .map(|(i, id)| (id.as_str(), i))
        .collect();

    let mut counted = 0usize;
    for m in matches.iter().filter(|m| m.is_resolved()) {
        counted += 1;
        let a = index.get(m.participant_a.as_str()).copied();

        let opponent = match &m.participant_b {
            Slot::Bye => {
                if let Some(a) = a {
                    record_bye(&mut standings[a], m);
                }
                continue;
            }
            Slot::Participant(id) => id,
        };
        let b = index.get(opponent.as_str()).copied();

        let (result_a, result_b) = match m.winner.as_deref() {
            None => (Some(HeadToHeadResult::Tie), Some(HeadToHeadResult::Tie)),
            Some(w) if w == m.participant_a => {
                (Some(HeadToHeadResult::Win), Some(HeadToHeadResult::Loss))
            }
            Some(w) if w == opponent.as_str() => {
                (Some(HeadToHeadResult::Loss), Some(HeadToHeadResult::Win))
            }
            Some(w) => {
                warn!("Match {} names {} as winner, who did not play in it", m.id, w);
                (None, None)
            }
        };

        if let Some(a) = a {
            record_result(
                &mut standings[a],
                opponent,
                result_a,
                m.total_twenties_a,
                m.total_points_a,
            );
        }
        if let Some(b) = b {
            record_result(
                &mut standings[b],
                &m.participant_a,
                result_b,
                m.total_twenties_b,
                m.total_points_b,
            );
        }
    }

    for standing in standings.iter_mut() {
        standing.points = calculate_match_points(standing.matches_won, standing.matches_tied);
        standing.swiss_points = is_swiss.then_some(standing.points);
    }

    debug!(
        "Recomputed standings for {} participants from {} resolved matches",
        standings.len(),
        counted
    );

    resolve_tiebreaker(&standings, participants, is_swiss, mode)
}

fn record_bye(standing: &mut Standing, m: &Match) {
    standing.matches_played += 1;
    standing.matches_won += 1;
    standing.total_twenties += m.total_twenties_a;
    standing.total_points_scored += m.total_points_a;
}

fn record_result(
    standing: &mut Standing,
    opponent: &str,
    result: Option<HeadToHeadResult>,
    twenties: u32,
    points_scored: u32,
) {
    standing.matches_played += 1;
    standing.total_twenties += twenties;
    standing.total_points_scored += points_scored;

    let Some(result) = result else {
        return;
    };
    match result {
        HeadToHeadResult::Win => standing.matches_won += 1,
        HeadToHeadResult::Loss => standing.matches_lost += 1,
        HeadToHeadResult::Tie => standing.matches_tied += 1,
    }
    standing
        .head_to_head
        .insert(opponent.to_string(), HeadToHeadRecord { result, twenties });
}
