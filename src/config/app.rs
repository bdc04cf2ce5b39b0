//! Main engine configuration
//!
//! This module defines the configuration structures for the tournament engine,
//! including TOML file loading, environment variable overrides and validation.

use crate::config::elo::EloConfig;
use crate::schedule::round_robin::Cycles;
use crate::types::{GameType, RankingMode, Tier};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Main engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub service: ServiceSettings,
    pub scheduling: SchedulingSettings,
    pub ranking: RankingSettings,
    pub elo: EloConfig,
}

/// Process-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

/// Group and table settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulingSettings {
    /// Largest legal round-robin group
    pub max_per_group: usize,
    /// Tables available in the venue
    pub total_tables: u32,
    /// Round-robin cycles
    pub cycles: Cycles,
}

/// Season ranking settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingSettings {
    pub tier: Tier,
    pub game_type: GameType,
    pub mode: RankingMode,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl Default for SchedulingSettings {
    fn default() -> Self {
        Self {
            max_per_group: 20,
            total_tables: 8,
            cycles: Cycles::Single,
        }
    }
}

impl Default for RankingSettings {
    fn default() -> Self {
        Self {
            tier: Tier::Club,
            game_type: GameType::Singles,
            mode: RankingMode::Wins,
        }
    }
}

impl EngineConfig {
    /// Load configuration from a TOML file, then validate it
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Apply `TOURNEY_*` environment overrides on top of the current values
    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(log_level) = env::var("TOURNEY_LOG_LEVEL") {
            self.service.log_level = log_level;
        }

        // Scheduling settings
        if let Ok(max) = env::var("TOURNEY_MAX_PER_GROUP") {
            self.scheduling.max_per_group = max
                .parse()
                .map_err(|_| anyhow!("Invalid TOURNEY_MAX_PER_GROUP value: {}", max))?;
        }
        if let Ok(tables) = env::var("TOURNEY_TOTAL_TABLES") {
            self.scheduling.total_tables = tables
                .parse()
                .map_err(|_| anyhow!("Invalid TOURNEY_TOTAL_TABLES value: {}", tables))?;
        }
        if let Ok(cycles) = env::var("TOURNEY_CYCLES") {
            self.scheduling.cycles = match cycles.as_str() {
                "1" => Cycles::Single,
                "2" => Cycles::Double,
                _ => return Err(anyhow!("Invalid TOURNEY_CYCLES value: {}", cycles)),
            };
        }

        // Ranking settings
        if let Ok(tier) = env::var("TOURNEY_TIER") {
            self.ranking.tier = tier
                .parse()
                .map_err(|_| anyhow!("Invalid TOURNEY_TIER value: {}", tier))?;
        }

        // Elo settings
        if let Ok(enabled) = env::var("TOURNEY_ELO_ENABLED") {
            self.elo.enabled = enabled
                .parse()
                .map_err(|_| anyhow!("Invalid TOURNEY_ELO_ENABLED value: {}", enabled))?;
        }
        if let Ok(k) = env::var("TOURNEY_ELO_K_FACTOR") {
            self.elo.k_factor = k
                .parse()
                .map_err(|_| anyhow!("Invalid TOURNEY_ELO_K_FACTOR value: {}", k))?;
        }
        if let Ok(max) = env::var("TOURNEY_ELO_MAX_DELTA") {
            self.elo.max_delta = max
                .parse()
                .map_err(|_| anyhow!("Invalid TOURNEY_ELO_MAX_DELTA value: {}", max))?;
        }

        Ok(())
    }
}

/// Validate configuration values
pub fn validate_config(config: &EngineConfig) -> Result<()> {
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    if config.scheduling.total_tables == 0 {
        return Err(anyhow!("Total tables must be greater than 0"));
    }
    if config.scheduling.max_per_group < 2 {
        return Err(anyhow!("Max participants per group must be at least 2"));
    }

    config.elo.validate()?;

    Ok(())
}
