//! Tourney Core - pairing, standings and rating engine for tournaments
//!
//! This crate provides round-robin scheduling with table rotation, Swiss
//! pairing, tiebreak resolution for standings, tiered ranking points and
//! position-based Elo deltas. Every operation is a pure function over
//! caller-supplied snapshots.

pub mod config;
pub mod error;
pub mod rating;
pub mod schedule;
pub mod standings;
pub mod swiss;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{Result, TournamentError};
pub use types::*;

// Re-export key components
pub use rating::{EloRatingCalculator, RatingCalculator};
pub use utils::{IdGenerator, SequenceIdGenerator, UuidIdGenerator};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
