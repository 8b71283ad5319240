//! Live session registry and bootstrap.
//!
//! One authoritative in-memory session exists per fixture. Bootstrap is the
//! single critical section: concurrent joins on an unsimulated fixture must
//! trigger at most one simulation. The per-fixture `OnceCell` covers this:
//! the first caller runs the initialization, everyone else awaits the same
//! pending result, and a failed init leaves the cell empty so a later join
//! can retry.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio::sync::OnceCell;

use fc_core::{CompetitionError, FixtureId, Mentality, Side};

use crate::actor::{self, ControlVerb, SessionHandle};
use crate::error::{LiveError, Result};
use crate::source::MatchSource;
use crate::state::{CoachActionKind, LiveState};

/// Sessions idle longer than this are eligible for eviction.
pub const DEFAULT_IDLE_TTL: Duration = Duration::from_secs(3600);

type SessionSlot = Arc<OnceCell<SessionHandle>>;

pub struct LiveCoordinator {
    source: Arc<dyn MatchSource>,
    sessions: Mutex<HashMap<FixtureId, SessionSlot>>,
}

impl LiveCoordinator {
    pub fn new(source: Arc<dyn MatchSource>) -> Self {
        Self { source, sessions: Mutex::new(HashMap::new()) }
    }

    fn slot(&self, fixture: FixtureId) -> SessionSlot {
        let mut sessions = self.sessions.lock().expect("session registry lock poisoned");
        sessions.entry(fixture).or_insert_with(|| Arc::new(OnceCell::new())).clone()
    }

    fn existing(&self, fixture: FixtureId) -> Result<SessionHandle> {
        let sessions = self.sessions.lock().expect("session registry lock poisoned");
        sessions
            .get(&fixture)
            .and_then(|slot| slot.get())
            .cloned()
            .ok_or(LiveError::SessionNotFound(fixture))
    }

    /// Join a fixture's live session, bootstrapping it if needed.
    ///
    /// Returns the current full state and a subscription to every later
    /// broadcast.
    pub async fn join(
        &self,
        fixture: FixtureId,
    ) -> Result<(LiveState, broadcast::Receiver<LiveState>)> {
        let slot = self.slot(fixture);
        let handle = slot
            .get_or_try_init(|| self.bootstrap(fixture))
            .await?
            .clone();

        let receiver = handle.subscribe();
        let state = handle.join().await?;
        Ok((state, receiver))
    }

    async fn bootstrap(&self, fixture: FixtureId) -> Result<SessionHandle> {
        let loaded = match self.source.load_match(fixture)? {
            Some(loaded) => loaded,
            None => {
                match self.source.simulate(fixture) {
                    Ok(()) => {}
                    Err(CompetitionError::FixtureAlreadySimulated(_)) => {
                        // Someone else simulated between our load and our
                        // trigger; the match exists now, just reload.
                        tracing::debug!(fixture, "lost simulation race, reloading");
                    }
                    Err(err) => return Err(err.into()),
                }
                self.source
                    .load_match(fixture)?
                    .ok_or(LiveError::MatchUnavailable(fixture))?
            }
        };
        tracing::info!(fixture, "live session bootstrapped");
        Ok(actor::spawn(fixture, loaded, self.source.clone()))
    }

    /// Leaving is just dropping the broadcast receiver; no reply. Kept as an
    /// explicit operation so the channel protocol maps one-to-one.
    pub fn leave(&self, _fixture: FixtureId) {}

    /// Playback control for an already-joined fixture.
    pub async fn control(
        &self,
        fixture: FixtureId,
        verb: ControlVerb,
        speed_ms: Option<u64>,
    ) -> Result<LiveState> {
        self.existing(fixture)?.control(verb, speed_ms).await
    }

    pub async fn coach_action(
        &self,
        fixture: FixtureId,
        team: Side,
        kind: CoachActionKind,
        tactic: Option<Mentality>,
    ) -> Result<LiveState> {
        self.existing(fixture)?.coach_action(team, kind, tactic).await
    }

    /// Drop sessions idle longer than `ttl`; returns how many were evicted.
    ///
    /// Dropping the registry's handle closes the actor's command channel
    /// once subscribers are gone, which stops the task.
    pub fn evict_idle(&self, ttl: Duration) -> usize {
        let mut sessions = self.sessions.lock().expect("session registry lock poisoned");
        let before = sessions.len();
        sessions.retain(|fixture, slot| match slot.get() {
            // In-flight bootstraps are never evicted.
            None => true,
            Some(handle) => {
                let keep = handle.idle_for() < ttl;
                if !keep {
                    tracing::info!(fixture, "evicting idle live session");
                }
                keep
            }
        });
        before - sessions.len()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.lock().expect("session registry lock poisoned").len()
    }

    /// Dispatch one protocol message.
    ///
    /// Errors are returned to the originating caller as a scoped
    /// [`ServerMessage::Error`]; they are never broadcast.
    pub async fn handle_message(&self, message: ClientMessage) -> Option<ServerMessage> {
        let result = match message {
            ClientMessage::Join { fixture_id } => {
                self.join(fixture_id).await.map(|(state, _rx)| Some(state))
            }
            ClientMessage::Leave { fixture_id } => {
                self.leave(fixture_id);
                Ok(None)
            }
            ClientMessage::Control { fixture_id, action, speed_ms } => {
                self.control(fixture_id, action, speed_ms).await.map(Some)
            }
            ClientMessage::CoachAction { fixture_id, team, kind, tactic } => {
                self.coach_action(fixture_id, team, kind, tactic).await.map(Some)
            }
        };
        match result {
            Ok(Some(state)) => Some(ServerMessage::State(state)),
            Ok(None) => None,
            Err(err) => Some(ServerMessage::Error { message: err.to_string() }),
        }
    }
}

/// Inbound payloads of the per-fixture subscription channel. The envelope
/// is tagged `msg` so the coach-action payload keeps `type` for its own
/// discriminator.
#[derive(Debug, Deserialize)]
#[serde(tag = "msg", rename_all = "snake_case")]
pub enum ClientMessage {
    Join {
        fixture_id: FixtureId,
    },
    Leave {
        fixture_id: FixtureId,
    },
    Control {
        fixture_id: FixtureId,
        action: ControlVerb,
        #[serde(default)]
        speed_ms: Option<u64>,
    },
    CoachAction {
        fixture_id: FixtureId,
        team: Side,
        #[serde(rename = "type")]
        kind: CoachActionKind,
        #[serde(default)]
        tactic: Option<Mentality>,
    },
}

/// Outbound payloads. State goes to all subscribers, errors only to the
/// caller that triggered them.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    State(LiveState),
    Error { message: String },
}
