//! Season ranking points by tier and finishing position
//!
//! The winner of a full field (16 or more) earns the tier's base points;
//! smaller fields scale that down. Every other position loses points along a
//! fixed drop curve, redistributed with largest-remainder apportionment so
//! that last place always ends on exactly 1 point.

use crate::types::{GameType, Tier};
use serde::{Deserialize, Serialize};

/// Field size at which the winner earns full base points
pub const DEFAULT_FIELD_SIZE: u32 = 16;

/// Display data for a tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TierInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub base_points: u32,
}

impl Tier {
    /// Winner's points for a full field
    pub fn base_points(self) -> u32 {
        match self {
            Tier::Club => 30,
            Tier::Regional => 50,
            Tier::National => 80,
            Tier::Major => 100,
        }
    }

    pub fn info(self) -> TierInfo {
        let (name, description) = match self {
            Tier::Club => ("Club (Tier 4)", "Local club tournament"),
            Tier::Regional => ("Regional (Tier 3)", "Inter-club tournament"),
            Tier::National => ("National (Tier 2)", "National open"),
            Tier::Major => ("Major (Tier 1)", "International championship"),
        };

        TierInfo {
            name,
            description,
            base_points: self.base_points(),
        }
    }
}

/// All tiers, most prestigious first
pub fn all_tiers() -> Vec<(Tier, TierInfo)> {
    [Tier::Major, Tier::National, Tier::Regional, Tier::Club]
        .into_iter()
        .map(|tier| (tier, tier.info()))
        .collect()
}

/// Points for first place, never below 1
pub fn winner_points(tier: Tier, field_size: u32) -> u32 {
    let factor = (field_size as f64 / DEFAULT_FIELD_SIZE as f64).min(1.0);
    let points = (tier.base_points() as f64 * factor).round() as u32;
    points.max(1)
}

/// Standard drop into `position` (2 or later)
fn standard_drop(position: u32, game_type: GameType) -> u64 {
    match (game_type, position) {
        (GameType::Singles, 2) => 3,
        (GameType::Singles, 3..=5) => 2,
        (GameType::Singles, _) => 1,
        (GameType::Doubles, 2) => 5,
        (GameType::Doubles, 3) => 4,
        (GameType::Doubles, _) => 2,
    }
}

/// Per-position drops: element `i` is the loss from position `i + 1` to `i + 2`
///
/// Large fields whose standard curve already drops far enough use it as is.
/// Otherwise the curve is scaled so the drops sum to exactly
/// `winner_points - 1`, with the leftover units going to the largest
/// fractional remainders (earlier positions win ties).
pub fn position_drops(winner_points: u32, field_size: u32, game_type: GameType) -> Vec<u32> {
    let standard: Vec<u64> = (2..=field_size)
        .map(|position| standard_drop(position, game_type))
        .collect();
    let total: u64 = standard.iter().sum();
    let target = u64::from(winner_points.saturating_sub(1));

    if field_size >= DEFAULT_FIELD_SIZE && total >= target {
        return standard.into_iter().map(|d| d as u32).collect();
    }
    if total == 0 {
        return Vec::new();
    }

    let mut drops: Vec<u64> = Vec::with_capacity(standard.len());
    let mut remainders: Vec<(u64, usize)> = Vec::with_capacity(standard.len());
    for (index, step) in standard.iter().enumerate() {
        let scaled = step * target;
        drops.push(scaled / total);
        remainders.push((scaled % total, index));
    }

    let leftover = target - drops.iter().sum::<u64>();
    remainders.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
    for &(_, index) in remainders.iter().take(leftover as usize) {
        drops[index] += 1;
    }

    drops.into_iter().map(|d| d as u32).collect()
}

fn score_at(position: u32, winner: u32, drops: &[u32]) -> u32 {
    if position == 1 {
        return winner;
    }
    if winner <= 1 {
        return 1;
    }

    let lost: u32 = drops.iter().take(position as usize - 1).sum();
    winner.saturating_sub(lost).max(1)
}

/// Ranking points for a finishing position
///
/// Positions outside `1..=field_size` score 0.
pub fn calculate_ranking_points(
    position: u32,
    tier: Tier,
    field_size: u32,
    game_type: GameType,
) -> u32 {
    if position == 0 || position > field_size {
        return 0;
    }

    let winner = winner_points(tier, field_size);
    if position == 1 || winner <= 1 {
        return winner;
    }

    let drops = position_drops(winner, field_size, game_type);
    score_at(position, winner, &drops)
}

/// Points for one position in a distribution table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionPoints {
    pub position: u32,
    pub points: u32,
}

/// Points for every position of a field
pub fn points_distribution(tier: Tier, field_size: u32, game_type: GameType) -> Vec<PositionPoints> {
    let winner = winner_points(tier, field_size);
    let drops = position_drops(winner, field_size, game_type);

    (1..=field_size)
        .map(|position| PositionPoints {
            position,
            points: score_at(position, winner, &drops),
        })
        .collect()
}
