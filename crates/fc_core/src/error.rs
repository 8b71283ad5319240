use thiserror::Error;

use crate::models::FixtureId;

/// Errors raised by the competition engine.
///
/// Pure components (scheduler, simulator, ledger) raise and never catch;
/// the orchestrator is the only layer that recovers, and only for the
/// concurrent-simulation race surfaced as [`CompetitionError::FixtureAlreadySimulated`].
#[derive(Error, Debug)]
pub enum CompetitionError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("fixture {0} has already been simulated")]
    FixtureAlreadySimulated(FixtureId),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),
}

/// Scheduler input validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("round robin requires at least 2 clubs, found {found}")]
    NotEnoughClubs { found: usize },

    #[error("continental format requires exactly 8 clubs, found {found}")]
    WrongClubCount { found: usize },
}

pub type Result<T> = std::result::Result<T, CompetitionError>;
