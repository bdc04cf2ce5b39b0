//! Configuration management for the tournament engine
//!
//! This module handles configuration loading from TOML files and environment
//! variables, validation, and default values.

pub mod app;
pub mod elo;

// Re-export commonly used types
pub use app::{
    validate_config, EngineConfig, RankingSettings, SchedulingSettings, ServiceSettings,
};
pub use elo::EloConfig;
