//! # fc_core - Competition & Match Simulation Engine
//!
//! Schedules a season's fixtures, simulates matches minute-by-minute with a
//! calibrated statistical model, and maintains ranked standings.
//!
//! ## Features
//! - Round-robin and group+knockout fixture scheduling
//! - Deterministic simulation (same sheets + seed = same result)
//! - Full 90-row commentary timeline and per-player ratings per match
//! - Standings with total-order tie-breaks, recomputed per result
//!
//! Club master data, rosters and finances live outside this crate and are
//! reached through the traits in [`external`].

pub mod competition;
pub mod engine;
pub mod error;
pub mod external;
pub mod models;
pub mod schedule;
pub mod store;
pub mod tactics;

pub use competition::{
    Competition, CompetitionFormat, Orchestrator, RoundReport, SeasonSummary, TopScorer,
    TICKET_PRICE,
};
pub use engine::{club_strength, SimulatedMatch, Side, TeamSheet};
pub use error::{CompetitionError, Result, ScheduleError};
pub use external::{ClubDirectory, FinanceHook, RosterProvider};
pub use models::{
    ClubId, ClubInfo, CompetitionId, Fixture, FixtureId, FixtureStatus, MatchEventRow,
    MatchEventType, MatchId, MatchRecord, PlayerId, PlayerInfo, PlayerRatingRow, Season, SeasonId,
    SeasonStatus, Stage, Standing, TimelineEntry,
};
pub use store::CompetitionStore;
pub use tactics::{Mentality, Pressing, TacticalProfile, Tempo};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
