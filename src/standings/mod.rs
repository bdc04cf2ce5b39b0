//! Group standings and tie-breaking
//!
//! Standings are rebuilt from the match list after every result and then
//! ordered by the tiebreak resolver.

pub mod calculator;
pub mod tiebreaker;

// Re-export commonly used types
pub use calculator::compute_standings;
pub use tiebreaker::{
    calculate_match_points, get_participants_in_tie, get_qualifiers, has_tie_for_qualification,
    primary_value, resolve_tiebreaker, update_head_to_head_record,
};
