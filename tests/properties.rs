//! Property tests for scheduling, pairing, ranking and rating invariants

mod fixtures;

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::{BTreeSet, HashMap, HashSet};
use tourney_core::config::EloConfig;
use tourney_core::rating::{
    calculate_doubles_elo_delta, calculate_elo_delta, calculate_expected_positions,
    calculate_ranking_points, position_drops, winner_points,
};
use tourney_core::schedule::{assign_tables_to_rounds, generate_schedule, TableHistory};
use tourney_core::standings::{compute_standings, resolve_tiebreaker};
use tourney_core::swiss::generate_pairings;
use tourney_core::{
    GameType, MatchStatus, Participant, RankingMode, Round, SequenceIdGenerator, Standing, Tier,
};

use fixtures::{all_matches, field, fixed_time, ids_of, record};

fn tier_strategy() -> impl Strategy<Value = Tier> {
    prop_oneof![
        Just(Tier::Club),
        Just(Tier::Regional),
        Just(Tier::National),
        Just(Tier::Major),
    ]
}

fn game_type_strategy() -> impl Strategy<Value = GameType> {
    prop_oneof![Just(GameType::Singles), Just(GameType::Doubles)]
}

proptest! {
    #[test]
    fn test_round_robin_is_complete(n in 2usize..=16) {
        let participants = ids_of(&field(n));
        let rounds = generate_schedule(&participants, &mut SequenceIdGenerator::new(), fixed_time()).unwrap();

        let even = n + n % 2;
        prop_assert_eq!(rounds.len(), even - 1);

        let mut pairs = HashSet::new();
        for round in &rounds {
            let mut seen = HashSet::new();
            for m in &round.matches {
                prop_assert!(seen.insert(m.participant_a.clone()));
                if let Some(b) = m.participant_b.participant() {
                    prop_assert!(seen.insert(b.clone()));
                    prop_assert!(pairs.insert(m.pair_key().unwrap()));
                }
            }
            prop_assert_eq!(seen.len(), n);
        }
        prop_assert_eq!(pairs.len(), n * (n - 1) / 2);
    }

    #[test]
    fn test_round_robin_odd_fields_get_one_walkover_per_round(half in 1usize..=8) {
        let n = half * 2 + 1;
        let rounds = generate_schedule(&ids_of(&field(n)), &mut SequenceIdGenerator::new(), fixed_time()).unwrap();

        for round in &rounds {
            let byes: Vec<_> = round.matches.iter().filter(|m| m.is_bye()).collect();
            prop_assert_eq!(byes.len(), 1);
            prop_assert_eq!(byes[0].status, MatchStatus::Walkover);
            prop_assert_eq!((byes[0].games_won_a, byes[0].games_won_b), (2, 0));
        }
    }

    #[test]
    fn test_tables_never_repeat_within_round(n in 2usize..=20, spare in 0u32..4) {
        let rounds = generate_schedule(&ids_of(&field(n)), &mut SequenceIdGenerator::new(), fixed_time()).unwrap();
        let total_tables = (n / 2) as u32 + spare;
        let scheduled = assign_tables_to_rounds(&rounds, total_tables, &TableHistory::new()).unwrap();

        for round in &scheduled.rounds {
            let mut used = BTreeSet::new();
            for m in &round.matches {
                match m.table_number {
                    Some(table) => {
                        prop_assert!(!m.is_bye());
                        prop_assert!((1..=total_tables).contains(&table));
                        prop_assert!(used.insert(table));
                    }
                    None => prop_assert!(m.is_bye()),
                }
            }
        }
    }

    #[test]
    fn test_redistributed_drops_sum_to_target(
        tier in tier_strategy(),
        field_size in 2u32..16,
        game_type in game_type_strategy(),
    ) {
        let winner = winner_points(tier, field_size);
        let drops = position_drops(winner, field_size, game_type);
        prop_assert_eq!(drops.iter().sum::<u32>(), winner - 1);
    }

    #[test]
    fn test_last_place_scores_one(
        tier in tier_strategy(),
        field_size in 2u32..=64,
        game_type in game_type_strategy(),
    ) {
        prop_assume!(winner_points(tier, field_size) > 1);
        prop_assert_eq!(calculate_ranking_points(field_size, tier, field_size, game_type), 1);

        let table: Vec<u32> = (1..=field_size)
            .map(|p| calculate_ranking_points(p, tier, field_size, game_type))
            .collect();
        prop_assert!(table.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_equal_ratings_expect_shared_position(rating in 0.0f64..3000.0) {
        let participants = vec![
            Participant::new("a", "A", rating),
            Participant::new("b", "B", rating),
        ];
        let expected = calculate_expected_positions(&participants);
        prop_assert_eq!(expected["a"], 1.5);
        prop_assert_eq!(expected["b"], 1.5);
    }

    #[test]
    fn test_doubles_delta_is_half_the_pair_delta(
        rating_a in 500.0f64..2500.0,
        rating_b in 500.0f64..2500.0,
        expected in 1.0f64..16.0,
        actual in 1u32..=16,
        k_factor in 0.5f64..100.0,
        max_delta in 1.0f64..200.0,
    ) {
        let config = EloConfig { k_factor, max_delta, ..EloConfig::default() };
        let full = calculate_elo_delta(expected, actual, &config);
        let doubles = calculate_doubles_elo_delta(rating_a, rating_b, expected, actual, &config);
        prop_assert_eq!(doubles, (full as f64 / 2.0).round() as i32);
        prop_assert_eq!(doubles, calculate_doubles_elo_delta(rating_b, rating_a, expected, actual, &config));
    }

    #[test]
    fn test_tiebreak_is_deterministic(
        records in prop::collection::vec((0u32..4, 0u32..3, 0u32..4), 2..10),
        swiss in any::<bool>(),
    ) {
        let participants: Vec<Participant> = (0..records.len())
            .map(|i| Participant::new(format!("p{}", i), "", 1500.0))
            .collect();
        let standings: Vec<Standing> = records
            .iter()
            .enumerate()
            .map(|(i, &(won, tied, twenties))| {
                let mut s = Standing::new(format!("p{}", i));
                s.matches_won = won;
                s.matches_tied = tied;
                s.points = won * 2 + tied;
                s.total_twenties = twenties;
                s
            })
            .collect();

        let first = resolve_tiebreaker(&standings, &participants, swiss, RankingMode::Wins);
        let second = resolve_tiebreaker(&standings, &participants, swiss, RankingMode::Wins);
        prop_assert_eq!(&first, &second);

        let positions: Vec<u32> = first.iter().map(|s| s.position).collect();
        prop_assert_eq!(positions, (1..=standings.len() as u32).collect::<Vec<_>>());
        prop_assert!(first.windows(2).all(|w| w[0].points >= w[1].points));
    }

    #[test]
    fn test_swiss_never_gives_second_bye_early(half in 2usize..=4, seed in any::<u64>()) {
        let n = half * 2 + 1;
        let participants = field(n);
        let mut rng = StdRng::seed_from_u64(seed);
        let mut ids = SequenceIdGenerator::new();
        let mut rounds: Vec<Round> = Vec::new();
        let mut byes: HashMap<String, u32> = HashMap::new();

        for round_number in 1..=(n as u32 + 2) {
            let standings = compute_standings(
                &ids_of(&participants),
                &all_matches(&rounds),
                &participants,
                true,
                RankingMode::Wins,
            );
            let matches = generate_pairings(
                &participants,
                &standings,
                &rounds,
                round_number,
                &mut rng,
                &mut ids,
                fixed_time(),
            )
            .unwrap();

            let bye = matches.iter().find(|m| m.is_bye()).unwrap();
            let previous = byes.get(&bye.participant_a).copied().unwrap_or(0);
            if previous > 0 {
                prop_assert!(participants.iter().all(|p| byes.get(&p.id).copied().unwrap_or(0) > 0));
            }
            *byes.entry(bye.participant_a.clone()).or_default() += 1;

            // Lower id wins; byes pass through
            let played = matches
                .iter()
                .map(|m| match m.participant_b.participant() {
                    None => m.clone(),
                    Some(b) => {
                        let winner = if m.participant_a < *b { m.participant_a.clone() } else { b.clone() };
                        record(m, Some(&winner), (0, 0), (0, 0))
                    }
                })
                .collect();
            rounds.push(Round { round_number, matches: played });
        }
    }
}

/// Four players over three rounds: every outcome of every draw avoids rematches
#[test]
fn test_swiss_four_players_never_repeat() {
    let participants = field(4);

    for seed in 0..24u64 {
        for outcomes in 0..16u32 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut ids = SequenceIdGenerator::new();
            let mut rounds: Vec<Round> = Vec::new();
            let mut pairs = HashSet::new();

            for round_number in 1..=3u32 {
                let standings = compute_standings(
                    &ids_of(&participants),
                    &all_matches(&rounds),
                    &participants,
                    true,
                    RankingMode::Wins,
                );
                let matches = generate_pairings(
                    &participants,
                    &standings,
                    &rounds,
                    round_number,
                    &mut rng,
                    &mut ids,
                    fixed_time(),
                )
                .unwrap();
                assert_eq!(matches.len(), 2);

                let played = matches
                    .iter()
                    .enumerate()
                    .map(|(i, m)| {
                        assert!(pairs.insert(m.pair_key().unwrap()), "rematch in round {}", round_number);
                        let bit = (round_number - 1) * 2 + i as u32;
                        let a_wins = round_number == 3 || outcomes & (1 << bit) != 0;
                        let winner = if a_wins {
                            m.participant_a.clone()
                        } else {
                            m.participant_b.participant().unwrap().clone()
                        };
                        record(m, Some(&winner), (0, 0), (0, 0))
                    })
                    .collect();
                rounds.push(Round {
                    round_number,
                    matches: played,
                });
            }

            assert_eq!(pairs.len(), 6);
        }
    }
}

/// Five and six players over three rounds: every round is a complete pairing,
/// each match starts from the best-ranked unpaired participant, and a rematch
/// only appears when every opponent still unpaired was already met
#[test]
fn test_swiss_small_fields_rematch_only_when_greedy_scan_is_exhausted() {
    for n in [5usize, 6] {
        let participants = field(n);
        let order: HashMap<String, usize> = participants
            .iter()
            .enumerate()
            .map(|(i, p)| (p.id.clone(), i))
            .collect();
        let per_round = (n / 2) as u32;

        for seed in 0..24u64 {
            for outcomes in 0..(1u32 << (per_round * 3)) {
                let mut rng = StdRng::seed_from_u64(seed);
                let mut ids = SequenceIdGenerator::new();
                let mut rounds: Vec<Round> = Vec::new();
                let mut met: HashSet<(String, String)> = HashSet::new();

                for round_number in 1..=3u32 {
                    let standings = compute_standings(
                        &ids_of(&participants),
                        &all_matches(&rounds),
                        &participants,
                        true,
                        RankingMode::Wins,
                    );
                    let points: HashMap<&str, u32> = standings
                        .iter()
                        .map(|s| (s.participant_id.as_str(), s.swiss_points()))
                        .collect();
                    let matches = generate_pairings(
                        &participants,
                        &standings,
                        &rounds,
                        round_number,
                        &mut rng,
                        &mut ids,
                        fixed_time(),
                    )
                    .unwrap();

                    let mut pool: BTreeSet<String> = participants.iter().map(|p| p.id.clone()).collect();
                    let byes: Vec<_> = matches.iter().filter(|m| m.is_bye()).collect();
                    assert_eq!(byes.len(), n % 2);
                    for bye in &byes {
                        assert!(pool.remove(&bye.participant_a));
                    }

                    let mut played = Vec::new();
                    let mut index = 0u32;
                    for m in matches.iter().filter(|m| !m.is_bye()) {
                        let a = m.participant_a.clone();
                        let b = m.participant_b.participant().unwrap().clone();
                        let key = m.pair_key().unwrap();

                        if round_number > 1 {
                            let best = pool
                                .iter()
                                .min_by_key(|id| (std::cmp::Reverse(points[id.as_str()]), order[*id]))
                                .unwrap();
                            assert_eq!(&a, best, "n={} seed={} round {}", n, seed, round_number);
                        }

                        assert!(pool.remove(&a));
                        assert!(pool.remove(&b));
                        if met.contains(&key) {
                            assert!(
                                pool.iter().all(|other| met.contains(&tourney_core::pair_key(&a, other))),
                                "n={} seed={} round {}: {} rematched {} with a fresh opponent free",
                                n,
                                seed,
                                round_number,
                                a,
                                b
                            );
                        }

                        let bit = (round_number - 1) * per_round + index;
                        let winner = if outcomes & (1 << bit) != 0 { a } else { b };
                        played.push((m, winner));
                        index += 1;
                    }
                    assert!(pool.is_empty());
                    assert_eq!(index, per_round);

                    let mut recorded: Vec<_> = matches.iter().filter(|m| m.is_bye()).cloned().collect();
                    for (m, winner) in played {
                        met.insert(m.pair_key().unwrap());
                        recorded.push(record(m, Some(&winner), (0, 0), (0, 0)));
                    }
                    rounds.push(Round {
                        round_number,
                        matches: recorded,
                    });
                }
            }
        }
    }
}
