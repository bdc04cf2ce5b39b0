//! End-of-tournament rating and season ranking points
//!
//! This module provides the position-based Elo calculator and the tiered
//! ranking-points curve applied once final positions are known.

pub mod elo;
pub mod ranking;

// Re-export commonly used types
pub use elo::{
    calculate_all_elo_deltas, calculate_doubles_elo_delta, calculate_elo_delta,
    calculate_elo_from_input, calculate_expected_positions, pair_average_rating, EloInput,
    EloRatingCalculator, EloResult, RatingCalculator,
};
pub use ranking::{
    all_tiers, calculate_ranking_points, points_distribution, position_drops, winner_points,
    PositionPoints, TierInfo, DEFAULT_FIELD_SIZE,
};
