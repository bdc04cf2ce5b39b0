//! Position-based Elo rating deltas
//!
//! Participants are expected to finish in the order of their rating snapshot.
//! Finishing above that expectation gains rating, finishing below it loses
//! rating, at `k_factor` points per position and capped at `max_delta`.

use crate::config::EloConfig;
use crate::error::{Result, TournamentError};
use crate::types::{Participant, ParticipantId, Partner};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Rating change for one participant after a tournament
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EloResult {
    pub participant_id: ParticipantId,
    pub initial_rating: f64,
    pub expected_position: f64,
    pub actual_position: u32,
    pub delta: i32,
    pub final_rating: f64,
    /// Resolved doubles partner, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partner_id: Option<ParticipantId>,
    /// Average rating of the pair the delta was computed for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pair_average: Option<f64>,
}

/// Raw numbers for a single Elo calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EloInput {
    pub participant_id: ParticipantId,
    pub initial_rating: f64,
    pub expected_position: f64,
    pub actual_position: u32,
    pub k_factor: f64,
    pub max_delta: f64,
    #[serde(default)]
    pub is_doubles: bool,
    #[serde(default)]
    pub partner_rating: Option<f64>,
}

/// Expected finishing position per participant
///
/// Higher rating means a lower (better) position. Participants sharing a
/// rating share the average of the positions they jointly occupy.
pub fn calculate_expected_positions(participants: &[Participant]) -> BTreeMap<ParticipantId, f64> {
    let mut sorted: Vec<&Participant> = participants.iter().collect();
    sorted.sort_by(|a, b| b.rating.total_cmp(&a.rating));

    let mut expected = BTreeMap::new();
    let mut start = 0;
    while start < sorted.len() {
        let rating = sorted[start].rating;
        let end = sorted[start..]
            .iter()
            .position(|p| p.rating != rating)
            .map_or(sorted.len(), |offset| start + offset);

        // positions start..end (0-based) -> start+1..=end
        let average = (start + 1 + end) as f64 / 2.0;
        for p in &sorted[start..end] {
            expected.insert(p.id.clone(), average);
        }
        start = end;
    }

    expected
}

/// Rating delta from expected and actual position
///
/// Expects a validated config; the cap is applied by comparison so an
/// unvalidated `max_delta` never panics.
pub fn calculate_elo_delta(expected_position: f64, actual_position: u32, config: &EloConfig) -> i32 {
    let raw = (expected_position - actual_position as f64) * config.effective_k_factor();
    raw.min(config.max_delta).max(-config.max_delta).round() as i32
}

/// Mean rating of a doubles pair
pub fn pair_average_rating(rating_a: f64, rating_b: f64) -> f64 {
    (rating_a + rating_b) / 2.0
}

/// Per-member delta for a doubles pair
///
/// The pair is rated as one entry and each member takes half of the swing,
/// so both members always receive the same value.
pub fn calculate_doubles_elo_delta(
    rating_a: f64,
    rating_b: f64,
    expected_position: f64,
    actual_position: u32,
    config: &EloConfig,
) -> i32 {
    let full_delta = calculate_elo_delta(expected_position, actual_position, config);
    debug!(
        "Doubles pair average {:.1}, full delta {}",
        pair_average_rating(rating_a, rating_b),
        full_delta
    );
    (full_delta as f64 / 2.0).round() as i32
}

/// Find the participant record of a doubles partner
///
/// Linked partners match by id, unlinked partners by display name.
fn resolve_partner<'a>(
    participant: &Participant,
    participants: &'a [Participant],
) -> Option<&'a Participant> {
    let partner = participant.partner.as_ref()?;
    participants
        .iter()
        .filter(|p| p.id != participant.id)
        .find(|p| match partner {
            Partner::Linked { id, .. } => &p.id == id,
            Partner::Unlinked { name } => &p.name == name,
        })
}

/// Elo results for every participant with a final position
///
/// Returns nothing when rating is disabled and fails with
/// [`TournamentError::InvalidEloConfig`] before any work when the config is
/// malformed. A participant whose partner record cannot be found is rated as
/// a singles entry.
pub fn calculate_all_elo_deltas(
    participants: &[Participant],
    config: &EloConfig,
) -> Result<Vec<EloResult>> {
    if !config.enabled {
        debug!("Elo disabled, skipping {} participants", participants.len());
        return Ok(Vec::new());
    }
    config.validate()?;

    let expected_positions = calculate_expected_positions(participants);
    let mut results = Vec::new();

    for participant in participants {
        let Some(actual_position) = participant.final_position else {
            continue;
        };
        let expected_position = expected_positions
            .get(&participant.id)
            .copied()
            .unwrap_or(0.0);

        let mut participant_config = config.clone();
        participant_config.is_first_tournament |= participant.first_tournament;

        let partner = resolve_partner(participant, participants);
        if participant.partner.is_some() && partner.is_none() {
            warn!(
                "Partner of {} not found among participants, rating as singles",
                participant.id
            );
        }

        let (delta, partner_id, pair_average) = match partner {
            Some(partner) => (
                calculate_doubles_elo_delta(
                    participant.rating,
                    partner.rating,
                    expected_position,
                    actual_position,
                    &participant_config,
                ),
                Some(partner.id.clone()),
                Some(pair_average_rating(participant.rating, partner.rating)),
            ),
            None => (
                calculate_elo_delta(expected_position, actual_position, &participant_config),
                None,
                None,
            ),
        };

        results.push(EloResult {
            participant_id: participant.id.clone(),
            initial_rating: participant.rating,
            expected_position,
            actual_position,
            delta,
            final_rating: participant.rating + delta as f64,
            partner_id,
            pair_average,
        });
    }

    info!(
        "Computed Elo deltas for {} of {} participants",
        results.len(),
        participants.len()
    );

    Ok(results)
}

/// Single Elo result from raw numbers
///
/// The rating, K-factor and cap are checked like an [`EloConfig`].
pub fn calculate_elo_from_input(input: &EloInput) -> Result<EloResult> {
    let config = EloConfig {
        enabled: true,
        initial_rating: input.initial_rating,
        k_factor: input.k_factor,
        max_delta: input.max_delta,
        is_first_tournament: false,
    };
    config.validate()?;

    let (delta, pair_average) = match (input.is_doubles, input.partner_rating) {
        (true, Some(partner_rating)) => (
            calculate_doubles_elo_delta(
                input.initial_rating,
                partner_rating,
                input.expected_position,
                input.actual_position,
                &config,
            ),
            Some(pair_average_rating(input.initial_rating, partner_rating)),
        ),
        _ => (
            calculate_elo_delta(input.expected_position, input.actual_position, &config),
            None,
        ),
    };

    Ok(EloResult {
        participant_id: input.participant_id.clone(),
        initial_rating: input.initial_rating,
        expected_position: input.expected_position,
        actual_position: input.actual_position,
        delta,
        final_rating: input.initial_rating + delta as f64,
        partner_id: None,
        pair_average,
    })
}

/// Trait for computing end-of-tournament rating changes
pub trait RatingCalculator: Send + Sync {
    /// Rating changes for every participant with a final position
    fn calculate_rating_changes(&self, participants: &[Participant]) -> Result<Vec<EloResult>>;

    /// Rating given to participants without history
    fn initial_rating(&self) -> f64;

    /// Get current configuration as JSON
    fn config(&self) -> serde_json::Value;

    /// Replace configuration from JSON, validating it first
    fn update_config(&mut self, config: serde_json::Value) -> Result<()>;
}

/// Elo calculator backed by a validated [`EloConfig`]
#[derive(Debug, Clone)]
pub struct EloRatingCalculator {
    config: EloConfig,
}

impl EloRatingCalculator {
    pub fn new(config: EloConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn elo_config(&self) -> &EloConfig {
        &self.config
    }
}

impl RatingCalculator for EloRatingCalculator {
    fn calculate_rating_changes(&self, participants: &[Participant]) -> Result<Vec<EloResult>> {
        calculate_all_elo_deltas(participants, &self.config)
    }

    fn initial_rating(&self) -> f64 {
        self.config.initial_rating
    }

    fn config(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "elo",
            "enabled": self.config.enabled,
            "initial_rating": self.config.initial_rating,
            "k_factor": self.config.k_factor,
            "max_delta": self.config.max_delta,
            "is_first_tournament": self.config.is_first_tournament
        })
    }

    fn update_config(&mut self, config: serde_json::Value) -> Result<()> {
        let updated: EloConfig =
            serde_json::from_value(config).map_err(|e| TournamentError::InvalidEloConfig {
                reason: e.to_string(),
            })?;
        updated.validate()?;
        self.config = updated;
        Ok(())
    }
}
