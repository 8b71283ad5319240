//! Per-minute probabilistic event generation.
//!
//! Each minute both sides roll independent goal chances (not mutually
//! exclusive), plus global card/injury rolls and scripted late-game windows
//! for tactical changes and substitutions.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::models::PlayerInfo;
use crate::tactics::TacticalProfile;

pub const BASE_GOAL_CHANCE: f64 = 0.018;
pub const MIN_GOAL_CHANCE: f64 = 0.004;
pub const STRENGTH_DIVISOR: f64 = 2600.0;

const CARD_CHANCE: f64 = 0.01;
const RED_CARD_SHARE: f64 = 0.15;
const INJURY_CHANCE: f64 = 0.004;

const TACTIC_SWITCH_MINUTES: [u8; 3] = [60, 70, 80];
const UNPROMPTED_SWITCH_CHANCE: f64 = 0.15;
const SUBSTITUTION_MINUTES: [u8; 3] = [58, 68, 78];
const SUBSTITUTION_CHANCE: f64 = 0.55;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Home,
    Away,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MinuteEventKind {
    Goal { scorer: Option<PlayerInfo> },
    YellowCard { player: Option<PlayerInfo> },
    RedCard { player: Option<PlayerInfo> },
    Injury { player: Option<PlayerInfo> },
    TacticalChange,
    Substitution { player: Option<PlayerInfo> },
}

/// Minute-stamped event tagged with the acting side.
#[derive(Debug, Clone, PartialEq)]
pub struct MinuteEvent {
    pub minute: u8,
    pub side: Side,
    pub kind: MinuteEventKind,
}

/// Per-side inputs, fixed for the whole match.
pub struct SideInputs<'a> {
    pub strength: f64,
    pub tactic: &'a TacticalProfile,
    pub roster: &'a [PlayerInfo],
}

pub struct MinuteInputs<'a> {
    pub minute: u8,
    pub home: SideInputs<'a>,
    pub away: SideInputs<'a>,
    pub home_goals: u8,
    pub away_goals: u8,
}

/// Per-minute scoring probability for one side, floored so even heavily
/// outmatched sides keep a nonzero chance.
pub fn goal_chance(own_strength: f64, opponent_strength: f64, tactic: &TacticalProfile) -> f64 {
    let chance =
        BASE_GOAL_CHANCE + (own_strength - opponent_strength) / STRENGTH_DIVISOR + tactic.goal_bias();
    chance.max(MIN_GOAL_CHANCE)
}

fn random_player<R: Rng>(roster: &[PlayerInfo], rng: &mut R) -> Option<PlayerInfo> {
    if roster.is_empty() {
        None
    } else {
        Some(roster[rng.gen_range(0..roster.len())].clone())
    }
}

fn side_inputs<'a, 'b>(inputs: &'b MinuteInputs<'a>, side: Side) -> &'b SideInputs<'a> {
    match side {
        Side::Home => &inputs.home,
        Side::Away => &inputs.away,
    }
}

/// Generate all events for one minute of play.
pub fn generate_minute<R: Rng>(inputs: &MinuteInputs<'_>, rng: &mut R) -> Vec<MinuteEvent> {
    let minute = inputs.minute;
    let mut events = Vec::new();

    // Both sides sample independently; a double-scoring minute is legal.
    let home_chance = goal_chance(inputs.home.strength, inputs.away.strength, inputs.home.tactic);
    if rng.gen_bool(home_chance) {
        let scorer = random_player(inputs.home.roster, rng);
        events.push(MinuteEvent { minute, side: Side::Home, kind: MinuteEventKind::Goal { scorer } });
    }
    let away_chance = goal_chance(inputs.away.strength, inputs.home.strength, inputs.away.tactic);
    if rng.gen_bool(away_chance) {
        let scorer = random_player(inputs.away.roster, rng);
        events.push(MinuteEvent { minute, side: Side::Away, kind: MinuteEventKind::Goal { scorer } });
    }

    if rng.gen_bool(CARD_CHANCE) {
        let side = if rng.gen_bool(0.5) { Side::Home } else { Side::Away };
        let player = random_player(side_inputs(inputs, side).roster, rng);
        let kind = if rng.gen_bool(RED_CARD_SHARE) {
            MinuteEventKind::RedCard { player }
        } else {
            MinuteEventKind::YellowCard { player }
        };
        events.push(MinuteEvent { minute, side, kind });
    }

    if rng.gen_bool(INJURY_CHANCE) {
        let side = if rng.gen_bool(0.5) { Side::Home } else { Side::Away };
        let player = random_player(side_inputs(inputs, side).roster, rng);
        events.push(MinuteEvent { minute, side, kind: MinuteEventKind::Injury { player } });
    }

    if TACTIC_SWITCH_MINUTES.contains(&minute) {
        for side in [Side::Home, Side::Away] {
            let losing = match side {
                Side::Home => inputs.home_goals < inputs.away_goals,
                Side::Away => inputs.away_goals < inputs.home_goals,
            };
            if losing || rng.gen_bool(UNPROMPTED_SWITCH_CHANCE) {
                events.push(MinuteEvent { minute, side, kind: MinuteEventKind::TacticalChange });
            }
        }
    }

    if SUBSTITUTION_MINUTES.contains(&minute) {
        for side in [Side::Home, Side::Away] {
            if rng.gen_bool(SUBSTITUTION_CHANCE) {
                let player = random_player(side_inputs(inputs, side).roster, rng);
                events.push(MinuteEvent {
                    minute,
                    side,
                    kind: MinuteEventKind::Substitution { player },
                });
            }
        }
    }

    events
}
