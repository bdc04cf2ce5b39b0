//! Table assignment with per-participant variety
//!
//! Each match in a round gets its own table. Among the free tables we pick
//! the one both participants have used least, then one neither of them sat
//! at last time, then the lowest number. History is passed in as a snapshot
//! and an updated copy is handed back; the caller decides whether to keep it.

use crate::error::{Result, TournamentError};
use crate::types::{Match, ParticipantId, Round, TableNumber};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Tables each participant has been assigned, oldest first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableHistory {
    tables: BTreeMap<ParticipantId, Vec<TableNumber>>,
}

impl TableHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild history from rounds that already carry table numbers
    pub fn from_rounds(rounds: &[Round]) -> Self {
        let mut history = Self::new();
        for m in rounds.iter().flat_map(|r| r.matches.iter()) {
            if let (Some(table), Some(b)) = (m.table_number, m.participant_b.participant()) {
                history.record(&m.participant_a, table);
                history.record(b, table);
            }
        }
        history
    }

    pub fn tables_for(&self, participant_id: &str) -> &[TableNumber] {
        self.tables
            .get(participant_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Times a participant has played at a table
    pub fn usage(&self, participant_id: &str, table: TableNumber) -> usize {
        self.tables_for(participant_id)
            .iter()
            .filter(|&&t| t == table)
            .count()
    }

    /// Most recent table for a participant
    pub fn last_table(&self, participant_id: &str) -> Option<TableNumber> {
        self.tables_for(participant_id).last().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    fn record(&mut self, participant_id: &str, table: TableNumber) {
        self.tables
            .entry(participant_id.to_string())
            .or_default()
            .push(table);
    }
}

/// Rounds with tables assigned, plus the history after assignment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledRounds {
    pub rounds: Vec<Round>,
    pub history: TableHistory,
}

/// Matches of one round with tables assigned, plus the history after assignment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignedMatches {
    pub matches: Vec<Match>,
    pub history: TableHistory,
}

/// Whether a manually chosen table is free right now
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableAvailability {
    Free,
    Occupied,
}

/// Best free table for a pairing, `None` when every table is taken
fn pick_table(
    history: &TableHistory,
    participant_a: &str,
    participant_b: &str,
    total_tables: TableNumber,
    used_in_round: &BTreeSet<TableNumber>,
) -> Option<TableNumber> {
    let last_a = history.last_table(participant_a);
    let last_b = history.last_table(participant_b);

    (1..=total_tables)
        .filter(|table| !used_in_round.contains(table))
        .min_by_key(|&table| {
            let usage = history.usage(participant_a, table) + history.usage(participant_b, table);
            let recent = last_a == Some(table) || last_b == Some(table);
            (usage, recent, table)
        })
}

/// Assign tables to one round's matches, skipping byes
///
/// Matches that find no free table are left without one.
fn assign_round(
    matches: &[Match],
    total_tables: TableNumber,
    history: &mut TableHistory,
    used_in_round: &mut BTreeSet<TableNumber>,
) -> Vec<Match> {
    let mut assigned = matches.to_vec();

    for m in assigned.iter_mut() {
        let Some(participant_b) = m.participant_b.participant().cloned() else {
            continue;
        };

        match pick_table(
            history,
            &m.participant_a,
            &participant_b,
            total_tables,
            used_in_round,
        ) {
            Some(table) => {
                m.table_number = Some(table);
                used_in_round.insert(table);
                history.record(&m.participant_a, table);
                history.record(&participant_b, table);
            }
            None => {
                debug!("No free table for match {}, leaving it unassigned", m.id);
            }
        }
    }

    assigned
}

/// Assign tables across a whole round-robin schedule
///
/// Every playable match in a round must get a distinct table, so the call
/// fails up front if any round has more playable matches than tables.
pub fn assign_tables_to_rounds(
    rounds: &[Round],
    total_tables: TableNumber,
    history: &TableHistory,
) -> Result<ScheduledRounds> {
    for round in rounds {
        let required = round.matches.iter().filter(|m| !m.is_bye()).count();
        if required > total_tables as usize {
            return Err(TournamentError::InsufficientTables {
                round: round.round_number,
                required,
                available: total_tables,
            });
        }
    }

    let mut history = history.clone();
    let rounds = rounds
        .iter()
        .map(|round| {
            let mut used_in_round = BTreeSet::new();
            Round {
                round_number: round.round_number,
                matches: assign_round(&round.matches, total_tables, &mut history, &mut used_in_round),
            }
        })
        .collect();

    Ok(ScheduledRounds { rounds, history })
}

/// Assign tables to a single round, tolerating table scarcity
///
/// `tables_already_used` holds tables claimed in this round by other groups
/// sharing the venue. Matches beyond the free tables stay unassigned until a
/// table frees up.
pub fn assign_tables_with_variety(
    matches: &[Match],
    total_tables: TableNumber,
    history: &TableHistory,
    tables_already_used: &BTreeSet<TableNumber>,
) -> AssignedMatches {
    let mut history = history.clone();
    let mut used_in_round = tables_already_used.clone();
    let matches = assign_round(matches, total_tables, &mut history, &mut used_in_round);

    AssignedMatches { matches, history }
}

/// Check a manually chosen table number
pub fn validate_table_assignment(
    table: TableNumber,
    total_tables: TableNumber,
    occupied_tables: &[TableNumber],
) -> Result<TableAvailability> {
    if table < 1 || table > total_tables {
        return Err(TournamentError::InvalidTableNumber {
            table,
            total: total_tables,
        });
    }

    if occupied_tables.contains(&table) {
        Ok(TableAvailability::Occupied)
    } else {
        Ok(TableAvailability::Free)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::round_robin::generate_schedule;
    use crate::utils::SequenceIdGenerator;
    use chrono::Utc;

    fn pending(id: &str, a: &str, b: &str) -> Match {
        Match::pending(id.to_string(), a.to_string(), b.to_string())
    }

    fn players(n: usize) -> Vec<ParticipantId> {
        (1..=n).map(|i| format!("p{}", i)).collect()
    }

    #[test]
    fn test_tables_unique_within_round() {
        let mut gen = SequenceIdGenerator::new();
        let rounds = generate_schedule(&players(8), &mut gen, Utc::now()).unwrap();
        let scheduled = assign_tables_to_rounds(&rounds, 4, &TableHistory::new()).unwrap();

        for round in &scheduled.rounds {
            let tables: Vec<_> = round.matches.iter().map(|m| m.table_number.unwrap()).collect();
            let unique: BTreeSet<_> = tables.iter().copied().collect();
            assert_eq!(tables.len(), unique.len());
            assert!(tables.iter().all(|&t| (1..=4).contains(&t)));
        }
    }

    #[test]
    fn test_byes_never_get_tables() {
        let mut gen = SequenceIdGenerator::new();
        let rounds = generate_schedule(&players(5), &mut gen, Utc::now()).unwrap();
        let scheduled = assign_tables_to_rounds(&rounds, 2, &TableHistory::new()).unwrap();

        for m in scheduled.rounds.iter().flat_map(|r| r.matches.iter()) {
            assert_eq!(m.is_bye(), m.table_number.is_none());
        }
    }

    #[test]
    fn test_insufficient_tables_fails_up_front() {
        let mut gen = SequenceIdGenerator::new();
        let rounds = generate_schedule(&players(6), &mut gen, Utc::now()).unwrap();
        let err = assign_tables_to_rounds(&rounds, 2, &TableHistory::new()).unwrap_err();
        assert_eq!(
            err,
            TournamentError::InsufficientTables {
                round: 1,
                required: 3,
                available: 2
            }
        );
    }

    #[test]
    fn test_input_history_is_not_mutated() {
        let rounds = vec![Round {
            round_number: 1,
            matches: vec![pending("m1", "a", "b")],
        }];
        let history = TableHistory::new();
        let scheduled = assign_tables_to_rounds(&rounds, 3, &history).unwrap();

        assert!(history.is_empty());
        assert_eq!(scheduled.history.tables_for("a"), &[1]);
        assert_eq!(scheduled.history.tables_for("b"), &[1]);
        assert_eq!(rounds[0].matches[0].table_number, None);
    }

    #[test]
    fn test_prefers_least_used_table() {
        let rounds = vec![
            Round {
                round_number: 1,
                matches: vec![pending("m1", "a", "b"), pending("m2", "c", "d")],
            },
            Round {
                round_number: 2,
                matches: vec![pending("m3", "a", "c"), pending("m4", "b", "d")],
            },
        ];
        let scheduled = assign_tables_to_rounds(&rounds, 2, &TableHistory::new()).unwrap();

        // a and b sat at 1, c and d at 2; every pairing in round 2 mixes them
        let second = &scheduled.rounds[1].matches;
        assert_eq!(second[0].table_number, Some(1));
        assert_eq!(second[1].table_number, Some(2));
        assert_eq!(scheduled.history.tables_for("a"), &[1, 1]);
    }

    #[test]
    fn test_recent_table_loses_usage_tie() {
        let history = TableHistory::from_rounds(&[
            Round {
                round_number: 1,
                matches: vec![{
                    let mut m = pending("m1", "a", "x");
                    m.table_number = Some(2);
                    m
                }],
            },
            Round {
                round_number: 2,
                matches: vec![{
                    let mut m = pending("m2", "a", "y");
                    m.table_number = Some(1);
                    m
                }],
            },
        ]);

        // a has used 1 and 2 once each; 1 was the most recent
        let assigned = assign_tables_with_variety(
            &[pending("m3", "a", "z")],
            2,
            &history,
            &BTreeSet::new(),
        );
        assert_eq!(assigned.matches[0].table_number, Some(2));
    }

    #[test]
    fn test_scarcity_leaves_matches_unassigned() {
        let matches = vec![
            pending("m1", "a", "b"),
            pending("m2", "c", "d"),
            pending("m3", "e", "f"),
        ];
        let assigned = assign_tables_with_variety(&matches, 2, &TableHistory::new(), &BTreeSet::new());

        assert_eq!(assigned.matches[0].table_number, Some(1));
        assert_eq!(assigned.matches[1].table_number, Some(2));
        assert_eq!(assigned.matches[2].table_number, None);
        assert!(assigned.history.tables_for("e").is_empty());
    }

    #[test]
    fn test_respects_tables_claimed_by_other_groups() {
        let matches = vec![pending("m1", "a", "b"), pending("m2", "c", "d")];
        let claimed: BTreeSet<_> = [1, 3].into_iter().collect();
        let assigned = assign_tables_with_variety(&matches, 4, &TableHistory::new(), &claimed);

        assert_eq!(assigned.matches[0].table_number, Some(2));
        assert_eq!(assigned.matches[1].table_number, Some(4));
    }

    #[test]
    fn test_validate_table_assignment() {
        assert_eq!(
            validate_table_assignment(2, 4, &[1, 3]).unwrap(),
            TableAvailability::Free
        );
        assert_eq!(
            validate_table_assignment(3, 4, &[1, 3]).unwrap(),
            TableAvailability::Occupied
        );
        assert_eq!(
            validate_table_assignment(5, 4, &[]).unwrap_err(),
            TournamentError::InvalidTableNumber { table: 5, total: 4 }
        );
        assert!(validate_table_assignment(0, 4, &[]).is_err());
    }
}
