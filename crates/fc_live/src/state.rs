//! Per-session playback state.
//!
//! A live session replays an already-computed simulation minute-by-minute.
//! Everything here is plain state owned by one session actor; the actor
//! serializes commands and timer ticks, so no internal locking is needed.

use serde::Serialize;
use std::time::Instant;

use fc_core::{FixtureId, MatchEventRow, MatchEventType, Mentality, Side};

use crate::source::LoadedMatch;

pub const DEFAULT_SPEED_MS: u64 = 900;
pub const MIN_SPEED_MS: u64 = 160;
pub const MAX_SPEED_MS: u64 = 1500;

pub const MOMENTUM_DECAY: f32 = 0.35;
const SUBSTITUTION_MOMENTUM: f32 = 1.2;
const SUBSTITUTION_WINDOW_MIN: u8 = 8;
const TACTIC_MOMENTUM: f32 = 0.6;
const TACTIC_WINDOW_MIN: u8 = 6;

pub const FULL_TIME_MINUTE: u8 = 90;

const BALL_MIN_X: f32 = 5.0;
const BALL_MAX_X: f32 = 95.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoachActionKind {
    Substitution,
    Tactic,
}

#[derive(Debug, Clone, Serialize)]
pub struct CoachActionEntry {
    pub minute: u8,
    #[serde(rename = "type")]
    pub kind: CoachActionKind,
    pub team: Side,
    pub text: String,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct SideValues<T: Copy + Serialize> {
    pub home: T,
    pub away: T,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Score {
    pub home: u8,
    pub away: u8,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct BallPosition {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct LiveEventLine {
    pub minute: u8,
    pub description: String,
}

/// Full state broadcast to every subscriber after each change.
#[derive(Debug, Clone, Serialize)]
pub struct LiveState {
    pub fixture_id: FixtureId,
    pub minute: u8,
    pub is_playing: bool,
    pub speed_ms: u64,
    pub score: Score,
    pub tactics: SideValues<Mentality>,
    pub momentum: SideValues<f32>,
    pub ball: BallPosition,
    pub commentary: String,
    pub events: Vec<LiveEventLine>,
    pub coach_actions: Vec<CoachActionEntry>,
}

pub struct SessionState {
    fixture_id: FixtureId,
    loaded: LoadedMatch,
    minute: u8,
    playing: bool,
    speed_ms: u64,
    tactics: [Mentality; 2],
    momentum: [f32; 2],
    momentum_expiry: [u8; 2],
    coach_log: Vec<CoachActionEntry>,
    /// Extra display lines appended by coach actions on top of the
    /// simulated event stream.
    coach_event_lines: Vec<LiveEventLine>,
    ball: BallPosition,
    pub created_at: Instant,
    pub last_command: Instant,
}

impl SessionState {
    pub fn new(fixture_id: FixtureId, loaded: LoadedMatch) -> Self {
        let now = Instant::now();
        Self {
            fixture_id,
            loaded,
            minute: 0,
            playing: false,
            speed_ms: DEFAULT_SPEED_MS,
            tactics: [Mentality::Balanced; 2],
            momentum: [0.0; 2],
            momentum_expiry: [0; 2],
            coach_log: Vec::new(),
            coach_event_lines: Vec::new(),
            ball: BallPosition { x: 50.0, y: 50.0 },
            created_at: now,
            last_command: now,
        }
    }

    pub fn touch(&mut self) {
        self.last_command = Instant::now();
    }

    pub fn fixture_id(&self) -> FixtureId {
        self.fixture_id
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn speed_ms(&self) -> u64 {
        self.speed_ms
    }

    pub fn is_finished(&self) -> bool {
        self.minute >= FULL_TIME_MINUTE
    }

    // ------------------------------------------------------------------
    // Playback commands
    // ------------------------------------------------------------------

    /// Restart playback from minute 1 with fresh match data.
    pub fn start(&mut self, reloaded: LoadedMatch) {
        self.loaded = reloaded;
        self.minute = 1;
        self.playing = true;
        self.tactics = [Mentality::Balanced; 2];
        self.momentum = [0.0; 2];
        self.momentum_expiry = [0; 2];
        self.coach_log.clear();
        self.coach_event_lines.clear();
        self.update_ball();
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    pub fn resume(&mut self) {
        if !self.is_finished() {
            self.playing = true;
        }
    }

    /// Advance exactly one minute; no-op past full time.
    pub fn step(&mut self) {
        if self.is_finished() {
            return;
        }
        self.minute += 1;
        self.decay_momentum();
        self.update_ball();
        if self.is_finished() {
            self.playing = false;
        }
    }

    /// Timer tick: identical to a manual step, driven at `speed_ms`.
    pub fn tick(&mut self) {
        self.step();
    }

    /// Back to minute 0, stopped. Does not re-simulate.
    pub fn reset(&mut self) {
        self.minute = 0;
        self.playing = false;
        self.momentum = [0.0; 2];
        self.momentum_expiry = [0; 2];
        self.coach_log.clear();
        self.coach_event_lines.clear();
        self.ball = BallPosition { x: 50.0, y: 50.0 };
    }

    pub fn set_speed(&mut self, speed_ms: u64) -> u64 {
        self.speed_ms = speed_ms.clamp(MIN_SPEED_MS, MAX_SPEED_MS);
        self.speed_ms
    }

    /// Apply a coach intervention and return the audit row to persist.
    pub fn coach_action(
        &mut self,
        team: Side,
        kind: CoachActionKind,
        tactic: Option<Mentality>,
    ) -> MatchEventRow {
        let idx = side_index(team);
        let club_name = self.club_name(team).to_string();
        // Match events carry minutes 1-90; a pre-kickoff action books as 1.
        let minute = self.minute.max(1);

        let (text, event_type) = match kind {
            CoachActionKind::Substitution => {
                self.boost_momentum(idx, SUBSTITUTION_MOMENTUM, SUBSTITUTION_WINDOW_MIN);
                (
                    format!("{club_name} make a substitution to freshen things up."),
                    MatchEventType::Substitution,
                )
            }
            CoachActionKind::Tactic => {
                if let Some(target) = tactic {
                    self.tactics[idx] = target;
                }
                self.boost_momentum(idx, TACTIC_MOMENTUM, TACTIC_WINDOW_MIN);
                let label = tactic_label(self.tactics[idx]);
                (
                    format!("{club_name} shift to a {label} approach."),
                    MatchEventType::TacticalChange,
                )
            }
        };

        let entry = CoachActionEntry { minute, kind, team, text: text.clone() };
        self.coach_log.push(entry);
        self.coach_event_lines.push(LiveEventLine { minute, description: text.clone() });

        let club_id = match team {
            Side::Home => self.home_club_id(),
            Side::Away => self.away_club_id(),
        };
        MatchEventRow {
            match_id: self.loaded.match_id,
            minute,
            event_type,
            club_id,
            player_id: None,
            player_name: None,
            description: text,
        }
    }

    fn boost_momentum(&mut self, idx: usize, amount: f32, window_min: u8) {
        self.momentum[idx] += amount;
        // Expiry windows extend; they are never shortened.
        let expiry = self.minute.saturating_add(window_min);
        self.momentum_expiry[idx] = self.momentum_expiry[idx].max(expiry);
    }

    fn decay_momentum(&mut self) {
        for idx in 0..2 {
            if self.minute > self.momentum_expiry[idx] && self.momentum[idx] > 0.0 {
                self.momentum[idx] = (self.momentum[idx] - MOMENTUM_DECAY).max(0.0);
            }
        }
    }

    // ------------------------------------------------------------------
    // Derived views
    // ------------------------------------------------------------------

    fn score_at(&self, minute: u8) -> Score {
        if minute == 0 {
            return Score { home: 0, away: 0 };
        }
        self.loaded
            .timeline
            .iter()
            .find(|row| row.minute == minute)
            .map(|row| Score { home: row.home_score, away: row.away_score })
            .unwrap_or(Score { home: self.loaded.home_score, away: self.loaded.away_score })
    }

    fn commentary_at(&self, minute: u8) -> String {
        if minute == 0 {
            return format!(
                "{} vs {} - waiting for kick-off.",
                self.loaded.home_name, self.loaded.away_name
            );
        }
        self.loaded
            .timeline
            .iter()
            .find(|row| row.minute == minute)
            .map(|row| row.commentary.clone())
            .unwrap_or_default()
    }

    fn goal_side_at(&self, minute: u8) -> Option<Side> {
        let goal = self
            .loaded
            .events
            .iter()
            .find(|e| e.minute == minute && e.event_type == MatchEventType::Goal)?;
        if goal.club_id == self.home_club_id() {
            Some(Side::Home)
        } else {
            Some(Side::Away)
        }
    }

    fn home_club_id(&self) -> fc_core::ClubId {
        self.loaded.home_club
    }

    fn away_club_id(&self) -> fc_core::ClubId {
        self.loaded.away_club
    }

    fn club_name(&self, side: Side) -> &str {
        match side {
            Side::Home => &self.loaded.home_name,
            Side::Away => &self.loaded.away_name,
        }
    }

    /// Recompute the visualization ball position for the current minute.
    fn update_ball(&mut self) {
        if let Some(side) = self.goal_side_at(self.minute) {
            self.ball = BallPosition {
                x: match side {
                    Side::Home => 92.0,
                    Side::Away => 8.0,
                },
                y: 50.0,
            };
            return;
        }

        let score = self.score_at(self.minute);
        let possession_bias = (f32::from(self.loaded.possession_home) - 50.0) * 0.4;
        // The chasing side pushes the ball toward the opposition goal.
        let score_bias = (f32::from(score.away) - f32::from(score.home)) * 2.0;
        let tactic_bias = mentality_tilt(self.tactics[0]) - mentality_tilt(self.tactics[1]);
        let momentum_bias = (self.momentum[0] - self.momentum[1]) * 3.0;
        let wobble = 6.0 * (self.minute as f32 * 0.7).sin();

        let x = (50.0 + possession_bias + score_bias + tactic_bias + momentum_bias + wobble)
            .clamp(BALL_MIN_X, BALL_MAX_X);
        let y = 50.0 + 15.0 * (self.minute as f32 * 1.1).sin();
        self.ball = BallPosition { x, y };
    }

    /// Full state snapshot for subscribers.
    pub fn snapshot(&self) -> LiveState {
        let minute = self.minute;
        let score = self.score_at(minute);

        let mut events: Vec<LiveEventLine> = self
            .loaded
            .events
            .iter()
            .filter(|e| e.minute <= minute)
            .map(|e| LiveEventLine { minute: e.minute, description: e.description.clone() })
            .collect();
        events.extend(self.coach_event_lines.iter().cloned());
        events.sort_by_key(|e| e.minute);

        LiveState {
            fixture_id: self.fixture_id,
            minute,
            is_playing: self.playing,
            speed_ms: self.speed_ms,
            score,
            tactics: SideValues { home: self.tactics[0], away: self.tactics[1] },
            momentum: SideValues { home: self.momentum[0], away: self.momentum[1] },
            ball: self.ball,
            commentary: self.commentary_at(minute),
            events,
            coach_actions: self.coach_log.clone(),
        }
    }
}

fn side_index(side: Side) -> usize {
    match side {
        Side::Home => 0,
        Side::Away => 1,
    }
}

fn mentality_tilt(mentality: Mentality) -> f32 {
    match mentality {
        Mentality::Attacking => 4.0,
        Mentality::Balanced => 0.0,
        Mentality::Defensive => -4.0,
    }
}

fn tactic_label(mentality: Mentality) -> &'static str {
    match mentality {
        Mentality::Attacking => "attacking",
        Mentality::Balanced => "balanced",
        Mentality::Defensive => "defensive",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fc_core::TimelineEntry;

    fn loaded() -> LoadedMatch {
        let timeline = (1..=90)
            .map(|minute| TimelineEntry {
                match_id: 1,
                minute,
                home_score: if minute >= 30 { 1 } else { 0 },
                away_score: 0,
                commentary: format!("minute {minute}"),
            })
            .collect();
        LoadedMatch {
            match_id: 1,
            fixture_id: 7,
            home_club: 100,
            away_club: 200,
            home_name: "Reds".into(),
            away_name: "Blues".into(),
            home_score: 1,
            away_score: 0,
            possession_home: 55,
            timeline,
            events: vec![MatchEventRow {
                match_id: 1,
                minute: 30,
                event_type: MatchEventType::Goal,
                club_id: 100,
                player_id: Some(1),
                player_name: Some("Nine".into()),
                description: "goal".into(),
            }],
        }
    }

    fn started() -> SessionState {
        let mut state = SessionState::new(7, loaded());
        state.start(loaded());
        state
    }

    #[test]
    fn minute_never_exceeds_ninety() {
        let mut state = started();
        for _ in 0..200 {
            state.step();
        }
        assert_eq!(state.minute(), 90);
        assert!(!state.is_playing());
        assert!(state.is_finished());
    }

    #[test]
    fn ball_x_stays_in_bounds() {
        let mut state = started();
        for _ in 0..90 {
            state.step();
            let snapshot = state.snapshot();
            assert!((5.0..=95.0).contains(&snapshot.ball.x), "x = {}", snapshot.ball.x);
        }
    }

    #[test]
    fn goal_minute_snaps_ball_to_scoring_end() {
        let mut state = started();
        while state.minute() < 30 {
            state.step();
        }
        assert_eq!(state.snapshot().ball.x, 92.0);
        assert_eq!(state.snapshot().ball.y, 50.0);
    }

    #[test]
    fn substitution_grants_momentum_with_expiry_decay() {
        let mut state = started();
        for _ in 0..10 {
            state.step();
        }
        state.coach_action(Side::Home, CoachActionKind::Substitution, None);
        assert!((state.snapshot().momentum.home - 1.2).abs() < f32::EPSILON);

        // Inside the window: no decay.
        for _ in 0..8 {
            state.step();
        }
        assert!((state.snapshot().momentum.home - 1.2).abs() < f32::EPSILON);

        // Past the window it decays 0.35 per tick down to zero.
        state.step();
        assert!((state.snapshot().momentum.home - 0.85).abs() < 1e-5);
        for _ in 0..10 {
            state.step();
        }
        assert_eq!(state.snapshot().momentum.home, 0.0);
    }

    #[test]
    fn tactic_action_updates_override_and_logs() {
        let mut state = started();
        state.step();
        let row =
            state.coach_action(Side::Away, CoachActionKind::Tactic, Some(Mentality::Attacking));
        assert_eq!(row.event_type, MatchEventType::TacticalChange);

        let snapshot = state.snapshot();
        assert_eq!(snapshot.tactics.away, Mentality::Attacking);
        assert!((snapshot.momentum.away - 0.6).abs() < f32::EPSILON);
        assert_eq!(snapshot.coach_actions.len(), 1);
        assert_eq!(snapshot.coach_actions[0].kind, CoachActionKind::Tactic);
    }

    #[test]
    fn pre_kickoff_coach_action_books_as_minute_one() {
        let mut state = SessionState::new(7, loaded());
        assert_eq!(state.minute(), 0);
        let row = state.coach_action(Side::Home, CoachActionKind::Substitution, None);
        assert_eq!(row.minute, 1);

        let snapshot = state.snapshot();
        assert_eq!(snapshot.coach_actions[0].minute, 1);
    }

    #[test]
    fn reset_rewinds_without_touching_the_match() {
        let mut state = started();
        for _ in 0..20 {
            state.step();
        }
        state.coach_action(Side::Home, CoachActionKind::Substitution, None);
        state.reset();

        let snapshot = state.snapshot();
        assert_eq!(snapshot.minute, 0);
        assert!(!snapshot.is_playing);
        assert_eq!(snapshot.momentum.home, 0.0);
        assert!(snapshot.coach_actions.is_empty());
        assert_eq!((snapshot.score.home, snapshot.score.away), (0, 0));
    }

    #[test]
    fn speed_is_clamped() {
        let mut state = started();
        assert_eq!(state.set_speed(50), MIN_SPEED_MS);
        assert_eq!(state.set_speed(10_000), MAX_SPEED_MS);
        assert_eq!(state.set_speed(700), 700);
    }
}
