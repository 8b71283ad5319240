//! # fc_live - Live match session coordinator
//!
//! Replays simulated matches minute-by-minute over broadcast channels. Each
//! fixture gets at most one session actor; viewers join it, drive playback,
//! and issue coach interventions that tilt the visualization.
//!
//! The crate only consumes an already-simulated match through the
//! [`MatchSource`] seam; `fc_core`'s orchestrator implements it directly.

pub mod actor;
pub mod coordinator;
pub mod error;
pub mod source;
pub mod state;

pub use actor::{ControlVerb, SessionHandle};
pub use coordinator::{ClientMessage, LiveCoordinator, ServerMessage, DEFAULT_IDLE_TTL};
pub use error::{LiveError, Result};
pub use source::{LoadedMatch, MatchSource};
pub use state::{
    BallPosition, CoachActionEntry, CoachActionKind, LiveEventLine, LiveState, Score, SideValues,
    DEFAULT_SPEED_MS, FULL_TIME_MINUTE, MAX_SPEED_MS, MIN_SPEED_MS,
};
