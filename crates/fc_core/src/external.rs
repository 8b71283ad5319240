//! Seams to the surrounding club-management system.
//!
//! Clubs, rosters and the financial ledger are owned by other subsystems;
//! the engine reads projections through these traits and emits its one
//! financial side effect through [`FinanceHook`].

use crate::models::{ClubId, ClubInfo, CompetitionId, PlayerInfo};

pub trait ClubDirectory: Send + Sync {
    fn club(&self, id: ClubId) -> Option<ClubInfo>;

    /// Clubs entered in a competition, pre-ordered by the caller's seeding
    /// criterion (budget, historically) for formats that care about rank.
    fn competition_clubs(&self, competition: CompetitionId) -> Vec<ClubId>;
}

pub trait RosterProvider: Send + Sync {
    fn roster(&self, club: ClubId) -> Vec<PlayerInfo>;
}

pub trait FinanceHook: Send + Sync {
    /// Register matchday ticket income for the home club.
    fn register_ticket_income(&self, club: ClubId, amount: i64);
}
