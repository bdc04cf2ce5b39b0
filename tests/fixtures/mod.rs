//! Shared fixtures for integration and property tests

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use std::collections::HashMap;
use tourney_core::{Match, MatchStatus, Participant, ParticipantId, Round};

/// Fixed timestamp so walkovers compare equal across runs
pub fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 10, 0, 0).unwrap()
}

/// `n` participants `p01..`, strictly descending ratings from 1800
pub fn field(n: usize) -> Vec<Participant> {
    (0..n)
        .map(|i| {
            Participant::new(
                format!("p{:02}", i + 1),
                format!("Player {}", i + 1),
                1800.0 - 25.0 * i as f64,
            )
        })
        .collect()
}

pub fn ids_of(participants: &[Participant]) -> Vec<ParticipantId> {
    participants.iter().map(|p| p.id.clone()).collect()
}

/// Record a finished match; `winner = None` is a tie
pub fn record(m: &Match, winner: Option<&str>, twenties: (u32, u32), points: (u32, u32)) -> Match {
    let mut finished = m.clone();
    finished.status = MatchStatus::Completed;
    finished.winner = winner.map(str::to_string);
    finished.total_twenties_a = twenties.0;
    finished.total_twenties_b = twenties.1;
    finished.total_points_a = points.0;
    finished.total_points_b = points.1;
    finished.completed_at = Some(fixed_time());
    finished
}

/// Resolve every pending match in favour of the higher-rated side
///
/// Byes are already walkovers and pass through untouched.
pub fn play_by_rating(matches: &[Match], participants: &[Participant]) -> Vec<Match> {
    let ratings: HashMap<&str, f64> = participants
        .iter()
        .map(|p| (p.id.as_str(), p.rating))
        .collect();

    matches
        .iter()
        .map(|m| match m.participant_b.participant() {
            None => m.clone(),
            Some(b) => {
                let rating_a = ratings.get(m.participant_a.as_str()).copied().unwrap_or(0.0);
                let rating_b = ratings.get(b.as_str()).copied().unwrap_or(0.0);
                if rating_a >= rating_b {
                    record(m, Some(&m.participant_a), (2, 0), (120, 60))
                } else {
                    record(m, Some(b), (0, 2), (60, 120))
                }
            }
        })
        .collect()
}

pub fn all_matches(rounds: &[Round]) -> Vec<Match> {
    rounds.iter().flat_map(|r| r.matches.iter().cloned()).collect()
}
