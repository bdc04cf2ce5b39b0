//! Swiss-system pairing engine
//!
//! Pairs participants round by round from current standings, spreading byes
//! fairly and avoiding rematches where the field allows it. Table assignment
//! for Swiss rounds lives in [`crate::schedule::tables`].

pub mod pairing;

// Re-export commonly used types
pub use pairing::{
    bye_history, generate_pairings, max_swiss_rounds, previous_pair_keys, validate_swiss_system,
    MIN_SWISS_PARTICIPANTS, MIN_SWISS_ROUNDS,
};
