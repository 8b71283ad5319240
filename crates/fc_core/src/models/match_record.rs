use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ClubId, FixtureId, MatchId, PlayerId};

/// Aggregate result of one simulated fixture. At most one record exists per
/// fixture; re-simulation (live session reset path) overwrites it in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: MatchId,
    pub fixture_id: FixtureId,
    pub home_score: u8,
    pub away_score: u8,
    /// Home share, 35-65. Away is `100 - possession_home`.
    pub possession_home: u8,
    pub shots_home: u8,
    pub shots_away: u8,
    pub simulated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchEventType {
    Goal,
    YellowCard,
    RedCard,
    Injury,
    Substitution,
    TacticalChange,
}

/// Minute-stamped event attached to a match. Append-only per simulation;
/// cleared and regenerated if the match is overwritten.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchEventRow {
    pub match_id: MatchId,
    pub minute: u8,
    #[serde(rename = "type")]
    pub event_type: MatchEventType,
    pub club_id: ClubId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_id: Option<PlayerId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_name: Option<String>,
    pub description: String,
}

/// One row per minute of play, 90 rows per match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub match_id: MatchId,
    pub minute: u8,
    pub home_score: u8,
    pub away_score: u8,
    pub commentary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerRatingRow {
    pub match_id: MatchId,
    pub player_id: PlayerId,
    pub club_id: ClubId,
    /// 4.5-10.0, one decimal.
    pub rating: f32,
}
