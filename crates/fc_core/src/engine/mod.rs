//! Statistical match engine.
//!
//! Not a positional simulation: the model samples minute-by-minute event
//! probabilities calibrated against club strength and tactics, then derives
//! commentary, ratings and aggregate statistics from the event stream.

pub mod commentary;
pub mod events;
pub mod rating;
pub mod simulator;
pub mod strength;

pub use events::{MinuteEvent, MinuteEventKind, Side};
pub use simulator::{SimEvent, SimRating, SimTimelineEntry, SimulatedMatch, TeamSheet};
pub use strength::{club_strength, DEFAULT_STRENGTH};
