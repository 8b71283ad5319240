use serde::{Deserialize, Serialize};

use super::{CompetitionId, SeasonId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeasonStatus {
    Ongoing,
    Finished,
}

/// One competition edition. Unique per (competition, year); created once by
/// season setup and mutated only by round advancement and finalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Season {
    pub id: SeasonId,
    pub competition_id: CompetitionId,
    pub year: i32,
    pub current_round: u32,
    pub status: SeasonStatus,
}

impl Season {
    pub fn is_finished(&self) -> bool {
        self.status == SeasonStatus::Finished
    }
}
