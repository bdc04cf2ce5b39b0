//! Common types used throughout the tournament engine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Unique identifier for participants (a player or a doubles pair)
pub type ParticipantId = String;

/// Unique identifier for matches
pub type MatchId = String;

/// Unique identifier for groups
pub type GroupId = String;

/// Table numbers start at 1
pub type TableNumber = u32;

/// Enrollment status of a participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantStatus {
    #[default]
    Active,
    Withdrawn,
    Disqualified,
}

/// Doubles partner reference
///
/// A linked partner points at another participant record by id; an unlinked
/// partner is only known by name (guests without an account).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Partner {
    Linked { id: ParticipantId, name: String },
    Unlinked { name: String },
}

impl Partner {
    pub fn name(&self) -> &str {
        match self {
            Partner::Linked { name, .. } | Partner::Unlinked { name } => name,
        }
    }
}

/// Tournament participant with the rating snapshot taken at start
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    #[serde(default)]
    pub partner: Option<Partner>,
    pub rating: f64,
    #[serde(default)]
    pub final_position: Option<u32>,
    #[serde(default)]
    pub status: ParticipantStatus,
    /// First rated tournament for this participant
    #[serde(default)]
    pub first_tournament: bool,
}

impl Participant {
    /// Create an active singles participant
    pub fn new(id: impl Into<ParticipantId>, name: impl Into<String>, rating: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            partner: None,
            rating,
            final_position: None,
            status: ParticipantStatus::Active,
            first_tournament: false,
        }
    }

    pub fn with_partner(mut self, partner: Partner) -> Self {
        self.partner = Some(partner);
        self
    }

    pub fn with_final_position(mut self, position: u32) -> Self {
        self.final_position = Some(position);
        self
    }

    pub fn with_status(mut self, status: ParticipantStatus) -> Self {
        self.status = status;
        self
    }

    /// Whether the participant can still be paired
    pub fn is_active(&self) -> bool {
        self.status == ParticipantStatus::Active
    }
}

/// Second side of a match: a real participant or a bye
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Participant(ParticipantId),
    Bye,
}

impl Slot {
    pub fn participant(&self) -> Option<&ParticipantId> {
        match self {
            Slot::Participant(id) => Some(id),
            Slot::Bye => None,
        }
    }

    pub fn is_bye(&self) -> bool {
        matches!(self, Slot::Bye)
    }
}

/// Lifecycle of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Pending,
    InProgress,
    Completed,
    Walkover,
}

/// A single pairing within a round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub participant_a: ParticipantId,
    pub participant_b: Slot,
    pub status: MatchStatus,
    /// Unset on a completed match means a tie
    #[serde(default)]
    pub winner: Option<ParticipantId>,
    #[serde(default)]
    pub table_number: Option<TableNumber>,
    #[serde(default)]
    pub games_won_a: u32,
    #[serde(default)]
    pub games_won_b: u32,
    #[serde(default)]
    pub total_points_a: u32,
    #[serde(default)]
    pub total_points_b: u32,
    #[serde(default)]
    pub total_twenties_a: u32,
    #[serde(default)]
    pub total_twenties_b: u32,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Match {
    /// New pending match between two participants
    pub fn pending(id: MatchId, participant_a: ParticipantId, participant_b: ParticipantId) -> Self {
        Self {
            id,
            participant_a,
            participant_b: Slot::Participant(participant_b),
            status: MatchStatus::Pending,
            winner: None,
            table_number: None,
            games_won_a: 0,
            games_won_b: 0,
            total_points_a: 0,
            total_points_b: 0,
            total_twenties_a: 0,
            total_twenties_b: 0,
            completed_at: None,
        }
    }

    /// Walkover against a bye, already won 2-0 by the real participant
    pub fn bye(id: MatchId, participant: ParticipantId, completed_at: DateTime<Utc>) -> Self {
        Self {
            id,
            participant_a: participant.clone(),
            participant_b: Slot::Bye,
            status: MatchStatus::Walkover,
            winner: Some(participant),
            table_number: None,
            games_won_a: 2,
            games_won_b: 0,
            total_points_a: 0,
            total_points_b: 0,
            total_twenties_a: 0,
            total_twenties_b: 0,
            completed_at: Some(completed_at),
        }
    }

    pub fn is_bye(&self) -> bool {
        self.participant_b.is_bye()
    }

    /// Whether a result has been recorded
    pub fn is_resolved(&self) -> bool {
        matches!(self.status, MatchStatus::Completed | MatchStatus::Walkover)
    }

    pub fn involves(&self, participant_id: &str) -> bool {
        self.participant_a == participant_id
            || self.participant_b.participant().map(String::as_str) == Some(participant_id)
    }

    /// Order-independent key for a real pairing, `None` for byes
    pub fn pair_key(&self) -> Option<(ParticipantId, ParticipantId)> {
        self.participant_b
            .participant()
            .map(|b| pair_key(&self.participant_a, b))
    }
}

/// Sorted id pair used to detect rematches
pub fn pair_key(a: &str, b: &str) -> (ParticipantId, ParticipantId) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

/// Ordered set of matches played in parallel, numbered from 1
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Round {
    pub round_number: u32,
    pub matches: Vec<Match>,
}

/// Named pool of participants with its own schedule and standings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    pub participants: Vec<ParticipantId>,
    /// Round-robin schedule
    #[serde(default)]
    pub schedule: Vec<Round>,
    /// Swiss pairing history
    #[serde(default)]
    pub pairings: Vec<Round>,
    #[serde(default)]
    pub standings: Vec<Standing>,
}

/// Outcome of one match from one participant's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HeadToHeadResult {
    Win,
    Loss,
    Tie,
}

/// Head-to-head entry against one opponent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadToHeadRecord {
    pub result: HeadToHeadResult,
    /// Twenties scored by this participant in that match
    #[serde(default)]
    pub twenties: u32,
}

/// Why an entry carries tie metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieReason {
    /// Only the rating snapshot separates the entries
    Unresolved,
}

/// Running statistics for one participant within a group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    pub participant_id: ParticipantId,
    #[serde(default)]
    pub position: u32,
    #[serde(default)]
    pub matches_played: u32,
    #[serde(default)]
    pub matches_won: u32,
    #[serde(default)]
    pub matches_lost: u32,
    #[serde(default)]
    pub matches_tied: u32,
    /// Match points (2 win, 1 tie, 0 loss)
    #[serde(default)]
    pub points: u32,
    #[serde(default)]
    pub swiss_points: Option<u32>,
    #[serde(default)]
    pub total_twenties: u32,
    #[serde(default)]
    pub total_points_scored: u32,
    #[serde(default)]
    pub head_to_head: BTreeMap<ParticipantId, HeadToHeadRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tied_with: Vec<ParticipantId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tie_reason: Option<TieReason>,
}

impl Standing {
    /// Empty standing for a participant who has not played yet
    pub fn new(participant_id: impl Into<ParticipantId>) -> Self {
        Self {
            participant_id: participant_id.into(),
            position: 0,
            matches_played: 0,
            matches_won: 0,
            matches_lost: 0,
            matches_tied: 0,
            points: 0,
            swiss_points: None,
            total_twenties: 0,
            total_points_scored: 0,
            head_to_head: BTreeMap::new(),
            tied_with: Vec::new(),
            tie_reason: None,
        }
    }

    /// Swiss points, derived from wins and ties when no mirror is stored
    pub fn swiss_points(&self) -> u32 {
        self.swiss_points
            .unwrap_or(self.matches_won * 2 + self.matches_tied)
    }
}

/// How a group ranks its entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RankingMode {
    /// Match results (2/1/0)
    #[default]
    Wins,
    /// Total points scored
    Points,
}

impl std::fmt::Display for RankingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RankingMode::Wins => write!(f, "WINS"),
            RankingMode::Points => write!(f, "POINTS"),
        }
    }
}

/// Singles or doubles play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameType {
    #[default]
    Singles,
    Doubles,
}

/// Tournament prestige tier, ascending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tier {
    #[default]
    Club,
    Regional,
    National,
    Major,
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tier::Club => write!(f, "CLUB"),
            Tier::Regional => write!(f, "REGIONAL"),
            Tier::National => write!(f, "NATIONAL"),
            Tier::Major => write!(f, "MAJOR"),
        }
    }
}

impl std::str::FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "CLUB" => Ok(Tier::Club),
            "REGIONAL" => Ok(Tier::Regional),
            "NATIONAL" => Ok(Tier::National),
            "MAJOR" => Ok(Tier::Major),
            other => Err(format!("unknown tier: {}", other)),
        }
    }
}
