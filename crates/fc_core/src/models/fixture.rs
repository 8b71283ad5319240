use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{ClubId, FixtureId, SeasonId};

/// Scope used to bucket fixtures and standings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    League,
    Group,
    Knockout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KnockoutRound {
    Semifinal,
    Final,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixtureStatus {
    Scheduled,
    Played,
}

/// One scheduled or played match between two clubs.
///
/// Immutable once created except for the one-way `scheduled -> played`
/// transition, which also fills in the score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fixture {
    pub id: FixtureId,
    pub season_id: SeasonId,
    pub round: u32,
    pub stage: Stage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<char>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub knockout_round: Option<KnockoutRound>,
    pub home_club: ClubId,
    pub away_club: ClubId,
    pub match_date: NaiveDate,
    pub status: FixtureStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home_score: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub away_score: Option<u8>,
}

impl Fixture {
    pub fn is_played(&self) -> bool {
        self.status == FixtureStatus::Played
    }

    /// Knockout results never touch a standings table.
    pub fn affects_standings(&self) -> bool {
        self.stage != Stage::Knockout
    }
}
