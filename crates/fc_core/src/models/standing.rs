use serde::{Deserialize, Serialize};

use super::{ClubId, SeasonId, Stage};

/// A club's ranked record within a (season, stage, group) scope.
///
/// Created at season setup with zeroed counters and mutated exactly once per
/// applied fixture result. `position` is always fully recomputed for the
/// scope, never incrementally patched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Standing {
    pub id: u64,
    pub season_id: SeasonId,
    pub club_id: ClubId,
    pub stage: Stage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<char>,
    pub position: u32,
    pub played: u32,
    pub won: u32,
    pub drawn: u32,
    pub lost: u32,
    pub goals_for: i32,
    pub goals_against: i32,
    pub goal_difference: i32,
    pub points: u32,
}

impl Standing {
    pub fn zeroed(
        id: u64,
        season_id: SeasonId,
        club_id: ClubId,
        stage: Stage,
        group: Option<char>,
    ) -> Self {
        Self {
            id,
            season_id,
            club_id,
            stage,
            group,
            position: 0,
            played: 0,
            won: 0,
            drawn: 0,
            lost: 0,
            goals_for: 0,
            goals_against: 0,
            goal_difference: 0,
            points: 0,
        }
    }
}
