use serde::{Deserialize, Serialize};

use super::{ClubId, PlayerId};
use crate::tactics::TacticalProfile;

/// Club projection consumed by the engine.
///
/// The full club aggregate (finances, infrastructure, staff) lives outside
/// this crate; the engine only needs a name, a stadium for attendance income
/// and the configured tactical profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClubInfo {
    pub id: ClubId,
    pub name: String,
    pub stadium_capacity: u32,
    pub tactic: TacticalProfile,
}

/// Roster entry projection: the only player attribute the statistical model
/// reads is the overall rating.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerInfo {
    pub id: PlayerId,
    pub name: String,
    pub overall: u8,
}
