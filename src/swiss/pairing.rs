//! Swiss-system pairing
//!
//! Round 1 is a random draw. Later rounds rank the field by Swiss points and
//! pair greedily from the top, skipping opponents already met whenever an
//! unplayed one is still free. Byes go to the lowest-ranked participant who
//! has not had one yet.

use crate::error::{Result, TournamentError};
use crate::types::{pair_key, Match, Participant, ParticipantId, Round, Standing};
use crate::utils::IdGenerator;
use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::debug;

/// Minimum field for a Swiss stage
pub const MIN_SWISS_PARTICIPANTS: usize = 4;

/// Minimum number of Swiss rounds
pub const MIN_SWISS_ROUNDS: u32 = 3;

/// Generate the matches for one Swiss round
///
/// Only active participants are paired. The round-1 draw uses `rng`; later
/// rounds are fully determined by `standings` and `previous_pairings`.
pub fn generate_pairings<R: Rng + ?Sized>(
    participants: &[Participant],
    standings: &[Standing],
    previous_pairings: &[Round],
    round_number: u32,
    rng: &mut R,
    ids: &mut dyn IdGenerator,
    completed_at: DateTime<Utc>,
) -> Result<Vec<Match>> {
    if round_number == 0 {
        return Err(TournamentError::InvalidRoundNumber {
            round: round_number,
        });
    }

    let active: Vec<&Participant> = participants.iter().filter(|p| p.is_active()).collect();
    if active.len() < 2 {
        return Err(TournamentError::TooFewParticipants {
            required: 2,
            actual: active.len(),
        });
    }

    let matches = if round_number == 1 {
        random_pairings(active, rng, ids, completed_at)
    } else {
        point_based_pairings(
            active,
            standings,
            previous_pairings,
            round_number,
            ids,
            completed_at,
        )
    };

    Ok(matches)
}

/// Participants who have already received a bye
pub fn bye_history(previous_pairings: &[Round]) -> BTreeSet<ParticipantId> {
    previous_pairings
        .iter()
        .flat_map(|round| round.matches.iter())
        .filter(|m| m.is_bye())
        .map(|m| m.participant_a.clone())
        .collect()
}

/// Every real pairing played so far, as sorted id pairs
pub fn previous_pair_keys(previous_pairings: &[Round]) -> HashSet<(ParticipantId, ParticipantId)> {
    previous_pairings
        .iter()
        .flat_map(|round| round.matches.iter())
        .filter_map(Match::pair_key)
        .collect()
}

fn random_pairings<R: Rng + ?Sized>(
    mut shuffled: Vec<&Participant>,
    rng: &mut R,
    ids: &mut dyn IdGenerator,
    completed_at: DateTime<Utc>,
) -> Vec<Match> {
    shuffled.shuffle(rng);
    let mut matches = Vec::with_capacity(shuffled.len() / 2 + 1);

    if shuffled.len() % 2 != 0 {
        if let Some(bye_player) = shuffled.pop() {
            debug!("Round 1 bye goes to {}", bye_player.id);
            matches.push(Match::bye(
                ids.next_id("swiss-r1-bye"),
                bye_player.id.clone(),
                completed_at,
            ));
        }
    }

    for (index, pair) in shuffled.chunks_exact(2).enumerate() {
        matches.push(Match::pending(
            ids.next_id(&format!("swiss-r1-m{}", index + 1)),
            pair[0].id.clone(),
            pair[1].id.clone(),
        ));
    }

    matches
}

fn point_based_pairings(
    active: Vec<&Participant>,
    standings: &[Standing],
    previous_pairings: &[Round],
    round_number: u32,
    ids: &mut dyn IdGenerator,
    completed_at: DateTime<Utc>,
) -> Vec<Match> {
    let points: HashMap<&str, u32> = standings
        .iter()
        .map(|s| (s.participant_id.as_str(), s.swiss_points()))
        .collect();
    let points_of = |p: &Participant| points.get(p.id.as_str()).copied().unwrap_or(0);

    // Stable: equal points keep input order
    let mut ranked = active;
    ranked.sort_by(|a, b| points_of(*b).cmp(&points_of(*a)));

    let played = previous_pair_keys(previous_pairings);
    let byes = bye_history(previous_pairings);

    let mut matches = Vec::with_capacity(ranked.len() / 2 + 1);
    let mut paired: HashSet<&str> = HashSet::with_capacity(ranked.len());

    if ranked.len() % 2 != 0 {
        let bye_candidate = ranked
            .iter()
            .rev()
            .find(|p| !byes.contains(&p.id))
            .or_else(|| ranked.last())
            .copied();

        if let Some(candidate) = bye_candidate {
            debug!("Round {} bye goes to {}", round_number, candidate.id);
            matches.push(Match::bye(
                ids.next_id(&format!("swiss-r{}-bye", round_number)),
                candidate.id.clone(),
                completed_at,
            ));
            paired.insert(candidate.id.as_str());
        }
    }

    let mut match_counter = 1;
    for (i, participant_a) in ranked.iter().copied().enumerate() {
        if paired.contains(participant_a.id.as_str()) {
            continue;
        }

        let candidates: Vec<&Participant> = ranked[i + 1..]
            .iter()
            .copied()
            .filter(|candidate| !paired.contains(candidate.id.as_str()))
            .collect();

        let fresh = candidates
            .iter()
            .find(|candidate| !played.contains(&pair_key(&participant_a.id, &candidate.id)))
            .copied();

        let opponent = fresh.or_else(|| {
            let rematch = candidates.first().copied();
            if let Some(rematch) = rematch {
                debug!(
                    "Round {}: no unplayed opponent left for {}, rematching {}",
                    round_number, participant_a.id, rematch.id
                );
            }
            rematch
        });

        if let Some(participant_b) = opponent {
            paired.insert(participant_a.id.as_str());
            paired.insert(participant_b.id.as_str());
            matches.push(Match::pending(
                ids.next_id(&format!("swiss-r{}-m{}", round_number, match_counter)),
                participant_a.id.clone(),
                participant_b.id.clone(),
            ));
            match_counter += 1;
        }
    }

    matches
}

/// Largest sensible number of Swiss rounds: `ceil(log2(n)) + 2`
pub fn max_swiss_rounds(num_participants: usize) -> u32 {
    let ceil_log2 = if num_participants <= 1 {
        0
    } else {
        usize::BITS - (num_participants - 1).leading_zeros()
    };
    ceil_log2 + 2
}

/// Check a Swiss configuration: at least 4 participants and 3..=max rounds
pub fn validate_swiss_system(num_participants: usize, num_rounds: u32) -> Result<()> {
    if num_participants < MIN_SWISS_PARTICIPANTS {
        return Err(TournamentError::TooFewParticipants {
            required: MIN_SWISS_PARTICIPANTS,
            actual: num_participants,
        });
    }

    let max = max_swiss_rounds(num_participants);
    if num_rounds < MIN_SWISS_ROUNDS || num_rounds > max {
        return Err(TournamentError::InvalidSwissRounds {
            participants: num_participants,
            rounds: num_rounds,
            max,
        });
    }

    Ok(())
}
