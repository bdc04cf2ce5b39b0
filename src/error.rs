//! Error types for the tournament engine
//!
//! Every precondition the engine checks surfaces as a distinct variant so
//! callers can map failures onto their own messaging without string matching.

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, TournamentError>;

/// Validation failures raised before any work is done
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TournamentError {
    #[error("Too few participants: {required} required, {actual} given")]
    TooFewParticipants { required: usize, actual: usize },

    #[error("Number of groups must be at least 1, got {groups}")]
    InvalidGroupCount { groups: usize },

    #[error("Not enough participants for {groups} groups (minimum {required}, got {actual})")]
    NotEnoughParticipantsForGroups {
        groups: usize,
        required: usize,
        actual: usize,
    },

    #[error("Invalid group size {size}: must be between 2 and {max}")]
    InvalidGroupSize { size: usize, max: usize },

    #[error("Invalid Swiss round count {rounds} for {participants} participants (allowed 3..={max})")]
    InvalidSwissRounds {
        participants: usize,
        rounds: u32,
        max: u32,
    },

    #[error("Invalid round number: {round}")]
    InvalidRoundNumber { round: u32 },

    #[error("Round {round} needs {required} tables but only {available} are available")]
    InsufficientTables {
        round: u32,
        required: usize,
        available: u32,
    },

    #[error("Invalid table number {table}: must be between 1 and {total}")]
    InvalidTableNumber { table: u32, total: u32 },

    #[error("Invalid Elo configuration: {reason}")]
    InvalidEloConfig { reason: String },
}
