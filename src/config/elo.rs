//! Rating system configuration

use crate::error::{Result, TournamentError};
use serde::{Deserialize, Serialize};

/// Elo-style rating parameters for one tournament
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EloConfig {
    pub enabled: bool,
    /// Rating given to participants without history
    pub initial_rating: f64,
    /// Rating points per position of difference between expected and actual
    pub k_factor: f64,
    /// Cap on the absolute delta for one tournament
    pub max_delta: f64,
    /// Damp the K-factor to 75% for newcomers
    pub is_first_tournament: bool,
}

impl Default for EloConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            initial_rating: 1500.0,
            k_factor: 2.0,
            max_delta: 25.0,
            is_first_tournament: false,
        }
    }
}

impl EloConfig {
    /// Validate configuration parameters
    ///
    /// A disabled configuration is always valid.
    pub fn validate(&self) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        if !(0.0..=3000.0).contains(&self.initial_rating) {
            return Err(TournamentError::InvalidEloConfig {
                reason: format!(
                    "initial rating {} must be between 0 and 3000",
                    self.initial_rating
                ),
            });
        }

        if !(self.k_factor > 0.0 && self.k_factor <= 100.0) {
            return Err(TournamentError::InvalidEloConfig {
                reason: format!("k-factor {} must be in (0, 100]", self.k_factor),
            });
        }

        if !(self.max_delta > 0.0 && self.max_delta <= 200.0) {
            return Err(TournamentError::InvalidEloConfig {
                reason: format!("max delta {} must be in (0, 200]", self.max_delta),
            });
        }

        Ok(())
    }

    /// K-factor after newcomer damping
    pub fn effective_k_factor(&self) -> f64 {
        if self.is_first_tournament {
            self.k_factor * 0.75
        } else {
            self.k_factor
        }
    }
}
