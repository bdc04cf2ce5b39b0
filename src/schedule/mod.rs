//! Round-robin scheduling and table assignment
//!
//! This module builds complete round-robin schedules, splits fields into
//! balanced groups and spreads matches across the available tables.

pub mod round_robin;
pub mod tables;

// Re-export commonly used types
pub use round_robin::{
    generate_schedule, split_into_groups, total_rounds, validate_group_size, Cycles,
    DEFAULT_MAX_PER_GROUP,
};
pub use tables::{
    assign_tables_to_rounds, assign_tables_with_variety, validate_table_assignment,
    AssignedMatches, ScheduledRounds, TableAvailability, TableHistory,
};
