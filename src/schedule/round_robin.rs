//! Round-robin scheduling using the circle method
//!
//! Position 0 stays fixed while every other seat rotates one step per round,
//! so each participant meets every other participant exactly once.

use crate::error::{Result, TournamentError};
use crate::types::{Group, Match, Participant, ParticipantId, Round};
use crate::utils::{group_letter, IdGenerator};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Default largest legal round-robin group
pub const DEFAULT_MAX_PER_GROUP: usize = 20;

/// Number of times every pairing is played
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cycles {
    #[default]
    Single,
    Double,
}

impl Cycles {
    pub fn count(self) -> u32 {
        match self {
            Cycles::Single => 1,
            Cycles::Double => 2,
        }
    }
}

/// Seat in the rotation; the bye seat only exists for odd fields
#[derive(Debug, Clone, PartialEq, Eq)]
enum Seat<'a> {
    Player(&'a ParticipantId),
    Bye,
}

/// Generate a full round-robin schedule
///
/// Odd fields get a bye seat; whoever faces it receives a completed 2-0
/// walkover stamped with `completed_at` instead of a pending match.
pub fn generate_schedule(
    participant_ids: &[ParticipantId],
    ids: &mut dyn IdGenerator,
    completed_at: DateTime<Utc>,
) -> Result<Vec<Round>> {
    if participant_ids.len() < 2 {
        return Err(TournamentError::TooFewParticipants {
            required: 2,
            actual: participant_ids.len(),
        });
    }

    let mut seats: Vec<Seat> = participant_ids.iter().map(Seat::Player).collect();
    if seats.len() % 2 != 0 {
        seats.push(Seat::Bye);
    }

    let num_seats = seats.len();
    let num_rounds = num_seats - 1;
    let matches_per_round = num_seats / 2;
    let mut rounds = Vec::with_capacity(num_rounds);

    for round in 0..num_rounds {
        let round_number = round as u32 + 1;
        let mut matches = Vec::with_capacity(matches_per_round);

        for slot in 0..matches_per_round {
            let (home, away) = if slot == 0 {
                (0, num_seats - 1)
            } else {
                (slot, num_seats - 1 - slot)
            };

            match (&seats[home], &seats[away]) {
                (Seat::Player(a), Seat::Player(b)) => {
                    let id = ids.next_id(&format!("rr-r{}-m{}", round_number, slot + 1));
                    matches.push(Match::pending(id, (*a).clone(), (*b).clone()));
                }
                (Seat::Player(player), Seat::Bye) | (Seat::Bye, Seat::Player(player)) => {
                    let id = ids.next_id(&format!("rr-r{}-bye", round_number));
                    matches.push(Match::bye(id, (*player).clone(), completed_at));
                }
                (Seat::Bye, Seat::Bye) => {}
            }
        }

        rounds.push(Round {
            round_number,
            matches,
        });

        // Everyone but the anchor moves one seat
        if round + 1 < num_rounds {
            if let Some(last) = seats.pop() {
                seats.insert(1, last);
            }
        }
    }

    info!(
        "Generated round-robin schedule: {} participants, {} rounds",
        participant_ids.len(),
        rounds.len()
    );

    Ok(rounds)
}

/// Split participants into balanced groups using a snake draft
///
/// Participants are ordered by rating (highest first) and dealt A, B, C, C,
/// B, A, A, B, ... so every group gets a comparable spread of strength.
pub fn split_into_groups(
    participants: &[Participant],
    num_groups: usize,
    ids: &mut dyn IdGenerator,
) -> Result<Vec<Group>> {
    if num_groups < 1 {
        return Err(TournamentError::InvalidGroupCount { groups: num_groups });
    }

    let required = num_groups * 2;
    if participants.len() < required {
        return Err(TournamentError::NotEnoughParticipantsForGroups {
            groups: num_groups,
            required,
            actual: participants.len(),
        });
    }

    let mut groups: Vec<Group> = (0..num_groups)
        .map(|index| {
            let letter = group_letter(index);
            Group {
                id: ids.next_id(&format!("group-{}", letter.to_lowercase())),
                name: format!("Group {}", letter),
                participants: Vec::new(),
                schedule: Vec::new(),
                pairings: Vec::new(),
                standings: Vec::new(),
            }
        })
        .collect();

    if num_groups == 1 {
        groups[0].participants = participants.iter().map(|p| p.id.clone()).collect();
        return Ok(groups);
    }

    let mut seeded: Vec<&Participant> = participants.iter().collect();
    seeded.sort_by(|a, b| b.rating.total_cmp(&a.rating));

    let mut current = 0usize;
    let mut forward = true;

    for participant in seeded {
        groups[current].participants.push(participant.id.clone());

        if forward {
            if current + 1 >= num_groups {
                forward = false;
            } else {
                current += 1;
            }
        } else if current == 0 {
            forward = true;
        } else {
            current -= 1;
        }
    }

    debug!(
        "Split {} participants into {} groups",
        participants.len(),
        num_groups
    );

    Ok(groups)
}

/// Total rounds for a round-robin group
pub fn total_rounds(num_participants: usize, cycles: Cycles) -> u32 {
    let even = if num_participants % 2 == 0 {
        num_participants
    } else {
        num_participants + 1
    };
    (even.saturating_sub(1) as u32) * cycles.count()
}

/// Check a round-robin group size against `[2, max_per_group]`
pub fn validate_group_size(num_participants: usize, max_per_group: usize) -> Result<()> {
    if num_participants < 2 || num_participants > max_per_group {
        return Err(TournamentError::InvalidGroupSize {
            size: num_participants,
            max: max_per_group,
        });
    }
    Ok(())
}
