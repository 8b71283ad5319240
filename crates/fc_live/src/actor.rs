//! Per-fixture session actor.
//!
//! One tokio task owns the whole [`SessionState`]; external commands and the
//! playback timer are serialized through a single `select!` loop, so command
//! handlers can never observe a half-applied tick. State changes fan out
//! over a broadcast channel.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use serde::Deserialize;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::time::{self, Interval};

use fc_core::{FixtureId, Mentality, Side};

use crate::error::{LiveError, Result};
use crate::source::{LoadedMatch, MatchSource};
use crate::state::{CoachActionKind, LiveState, SessionState};

const COMMAND_BUFFER: usize = 32;
const BROADCAST_BUFFER: usize = 64;

/// Playback verbs accepted on the control channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlVerb {
    Start,
    Pause,
    Resume,
    Step,
    Reset,
    Speed,
}

pub enum SessionCommand {
    Join {
        reply: oneshot::Sender<LiveState>,
    },
    Control {
        verb: ControlVerb,
        speed_ms: Option<u64>,
        reply: oneshot::Sender<Result<LiveState>>,
    },
    Coach {
        team: Side,
        kind: CoachActionKind,
        tactic: Option<Mentality>,
        reply: oneshot::Sender<Result<LiveState>>,
    },
}

/// Cheap clonable handle to a running session actor.
#[derive(Clone)]
pub struct SessionHandle {
    fixture_id: FixtureId,
    cmd_tx: mpsc::Sender<SessionCommand>,
    state_tx: broadcast::Sender<LiveState>,
    last_command: Arc<Mutex<Instant>>,
}

impl SessionHandle {
    pub fn fixture_id(&self) -> FixtureId {
        self.fixture_id
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LiveState> {
        self.state_tx.subscribe()
    }

    pub fn idle_for(&self) -> Duration {
        self.last_command.lock().expect("session idle clock poisoned").elapsed()
    }

    pub async fn join(&self) -> Result<LiveState> {
        let (reply, rx) = oneshot::channel();
        self.cmd_tx
            .send(SessionCommand::Join { reply })
            .await
            .map_err(|_| LiveError::SessionClosed(self.fixture_id))?;
        rx.await.map_err(|_| LiveError::SessionClosed(self.fixture_id))
    }

    pub async fn control(&self, verb: ControlVerb, speed_ms: Option<u64>) -> Result<LiveState> {
        let (reply, rx) = oneshot::channel();
        self.cmd_tx
            .send(SessionCommand::Control { verb, speed_ms, reply })
            .await
            .map_err(|_| LiveError::SessionClosed(self.fixture_id))?;
        rx.await.map_err(|_| LiveError::SessionClosed(self.fixture_id))?
    }

    pub async fn coach_action(
        &self,
        team: Side,
        kind: CoachActionKind,
        tactic: Option<Mentality>,
    ) -> Result<LiveState> {
        let (reply, rx) = oneshot::channel();
        self.cmd_tx
            .send(SessionCommand::Coach { team, kind, tactic, reply })
            .await
            .map_err(|_| LiveError::SessionClosed(self.fixture_id))?;
        rx.await.map_err(|_| LiveError::SessionClosed(self.fixture_id))?
    }
}

/// Spawn the actor task for one fixture and return its handle.
pub fn spawn(
    fixture_id: FixtureId,
    loaded: LoadedMatch,
    source: Arc<dyn MatchSource>,
) -> SessionHandle {
    let (cmd_tx, cmd_rx) = mpsc::channel(COMMAND_BUFFER);
    let (state_tx, _) = broadcast::channel(BROADCAST_BUFFER);
    let last_command = Arc::new(Mutex::new(Instant::now()));

    let handle = SessionHandle {
        fixture_id,
        cmd_tx,
        state_tx: state_tx.clone(),
        last_command: last_command.clone(),
    };

    tokio::spawn(run_session(fixture_id, loaded, source, cmd_rx, state_tx, last_command));
    handle
}

fn make_ticker(speed_ms: u64) -> Interval {
    let period = Duration::from_millis(speed_ms);
    // interval() fires immediately; offset so the first tick waits a period.
    time::interval_at(time::Instant::now() + period, period)
}

async fn run_session(
    fixture_id: FixtureId,
    loaded: LoadedMatch,
    source: Arc<dyn MatchSource>,
    mut cmd_rx: mpsc::Receiver<SessionCommand>,
    state_tx: broadcast::Sender<LiveState>,
    last_command: Arc<Mutex<Instant>>,
) {
    let mut state = SessionState::new(fixture_id, loaded);
    let mut ticker = make_ticker(state.speed_ms());

    tracing::debug!(fixture = fixture_id, "live session started");

    loop {
        tokio::select! {
            maybe_cmd = cmd_rx.recv() => {
                let Some(cmd) = maybe_cmd else {
                    break; // all handles dropped, session evicted
                };
                *last_command.lock().expect("session idle clock poisoned") = Instant::now();
                state.touch();
                match cmd {
                    SessionCommand::Join { reply } => {
                        let _ = reply.send(state.snapshot());
                    }
                    SessionCommand::Control { verb, speed_ms, reply } => {
                        let result = handle_control(
                            &mut state,
                            &mut ticker,
                            &source,
                            verb,
                            speed_ms,
                        );
                        if result.is_ok() {
                            let _ = state_tx.send(state.snapshot());
                        }
                        let _ = reply.send(result.map(|_| state.snapshot()));
                    }
                    SessionCommand::Coach { team, kind, tactic, reply } => {
                        let row = state.coach_action(team, kind, tactic);
                        source.record_coach_event(row);
                        let _ = state_tx.send(state.snapshot());
                        let _ = reply.send(Ok(state.snapshot()));
                    }
                }
            }
            _ = ticker.tick(), if state.is_playing() => {
                state.tick();
                if state.is_finished() {
                    tracing::debug!(fixture = fixture_id, "live playback reached full time");
                }
                let _ = state_tx.send(state.snapshot());
            }
        }
    }

    tracing::debug!(fixture = fixture_id, "live session stopped");
}

fn handle_control(
    state: &mut SessionState,
    ticker: &mut Interval,
    source: &Arc<dyn MatchSource>,
    verb: ControlVerb,
    speed_ms: Option<u64>,
) -> Result<()> {
    match verb {
        ControlVerb::Start => {
            // Fresh copy of timeline and events; a re-simulated match is
            // picked up here.
            let reloaded = source
                .load_match(state.fixture_id())?
                .ok_or(LiveError::MatchUnavailable(state.fixture_id()))?;
            state.start(reloaded);
            *ticker = make_ticker(state.speed_ms());
        }
        ControlVerb::Pause => state.pause(),
        ControlVerb::Resume => {
            state.resume();
            // Fresh interval: the old one kept accruing while its select
            // branch was disabled, and a stale interval replays every
            // missed tick in a burst on the next poll.
            *ticker = make_ticker(state.speed_ms());
        }
        ControlVerb::Step => state.step(),
        ControlVerb::Reset => state.reset(),
        ControlVerb::Speed => {
            let requested = speed_ms.ok_or_else(|| {
                LiveError::Core(fc_core::CompetitionError::InvalidRequest(
                    "speed control requires speed_ms".into(),
                ))
            })?;
            let applied = state.set_speed(requested);
            *ticker = make_ticker(applied);
        }
    }
    Ok(())
}
