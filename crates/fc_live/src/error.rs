use thiserror::Error;

use fc_core::{CompetitionError, FixtureId};

#[derive(Error, Debug)]
pub enum LiveError {
    #[error(transparent)]
    Core(#[from] CompetitionError),

    #[error("no live session for fixture {0}; join it first")]
    SessionNotFound(FixtureId),

    #[error("match for fixture {0} is unavailable after simulation")]
    MatchUnavailable(FixtureId),

    #[error("live session for fixture {0} has shut down")]
    SessionClosed(FixtureId),
}

pub type Result<T> = std::result::Result<T, LiveError>;
