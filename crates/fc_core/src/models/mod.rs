//! Entity types shared across the competition engine.
//!
//! These are the shapes persisted by the in-memory store and returned from
//! orchestrator queries. Roster and club master data are owned externally;
//! the engine only reads the projections in [`club`].

mod club;
mod fixture;
mod match_record;
mod season;
mod standing;

pub use club::{ClubInfo, PlayerInfo};
pub use fixture::{Fixture, FixtureStatus, KnockoutRound, Stage};
pub use match_record::{MatchEventRow, MatchEventType, MatchRecord, PlayerRatingRow, TimelineEntry};
pub use season::{Season, SeasonStatus};
pub use standing::Standing;

pub type CompetitionId = u64;
pub type SeasonId = u64;
pub type ClubId = u64;
pub type PlayerId = u64;
pub type FixtureId = u64;
pub type MatchId = u64;
