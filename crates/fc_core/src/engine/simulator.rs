//! Match simulation loop.
//!
//! Orchestrates the event generator across 90 minutes and assembles a
//! self-contained result: score, event stream with commentary, a full
//! 90-row timeline, per-player ratings and aggregate statistics. Pure given
//! its inputs and seed; persistence happens in the caller.

use std::collections::HashMap;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::commentary;
use super::events::{self, MinuteEvent, MinuteEventKind, MinuteInputs, Side, SideInputs};
use super::rating::{self, RatingInputs};
use crate::models::{ClubId, PlayerId, PlayerInfo};
use crate::tactics::TacticalProfile;

pub const MATCH_MINUTES: u8 = 90;
pub const MIN_POSSESSION: i32 = 35;
pub const MAX_POSSESSION: i32 = 65;
/// No simulated side ever finishes with fewer shots than this.
pub const MIN_SHOTS: u8 = 2;

/// Everything the simulator needs to know about one side.
#[derive(Debug, Clone)]
pub struct TeamSheet {
    pub club_id: ClubId,
    pub name: String,
    pub strength: f64,
    pub tactic: TacticalProfile,
    pub roster: Vec<PlayerInfo>,
}

/// Generated event plus its rendered commentary line.
#[derive(Debug, Clone)]
pub struct SimEvent {
    pub event: MinuteEvent,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct SimTimelineEntry {
    pub minute: u8,
    pub home_score: u8,
    pub away_score: u8,
    pub commentary: String,
}

#[derive(Debug, Clone)]
pub struct SimRating {
    pub player_id: PlayerId,
    pub club_id: ClubId,
    pub rating: f32,
}

/// Self-contained simulation result.
#[derive(Debug, Clone)]
pub struct SimulatedMatch {
    pub home_score: u8,
    pub away_score: u8,
    pub possession_home: u8,
    pub shots_home: u8,
    pub shots_away: u8,
    pub events: Vec<SimEvent>,
    pub timeline: Vec<SimTimelineEntry>,
    pub ratings: Vec<SimRating>,
}

#[derive(Default)]
struct PlayerTally {
    goals: u8,
    yellows: u8,
    reds: u8,
}

/// Simulate a full match. Same sheets and seed always produce the same
/// result.
pub fn simulate(home: &TeamSheet, away: &TeamSheet, seed: u64) -> SimulatedMatch {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let mut home_score = 0u8;
    let mut away_score = 0u8;
    let mut sim_events: Vec<SimEvent> = Vec::new();
    let mut timeline = Vec::with_capacity(MATCH_MINUTES as usize);
    let mut tallies: HashMap<PlayerId, PlayerTally> = HashMap::new();

    for minute in 1..=MATCH_MINUTES {
        let inputs = MinuteInputs {
            minute,
            home: SideInputs { strength: home.strength, tactic: &home.tactic, roster: &home.roster },
            away: SideInputs { strength: away.strength, tactic: &away.tactic, roster: &away.roster },
            home_goals: home_score,
            away_goals: away_score,
        };
        let minute_events = events::generate_minute(&inputs, &mut rng);

        let mut minute_commentary: Option<String> = None;
        for event in minute_events {
            match (&event.kind, event.side) {
                (MinuteEventKind::Goal { scorer }, side) => {
                    match side {
                        Side::Home => home_score = home_score.saturating_add(1),
                        Side::Away => away_score = away_score.saturating_add(1),
                    }
                    if let Some(p) = scorer {
                        tallies.entry(p.id).or_default().goals += 1;
                    }
                }
                (MinuteEventKind::YellowCard { player }, _) => {
                    if let Some(p) = player {
                        tallies.entry(p.id).or_default().yellows += 1;
                    }
                }
                (MinuteEventKind::RedCard { player }, _) => {
                    if let Some(p) = player {
                        tallies.entry(p.id).or_default().reds += 1;
                    }
                }
                _ => {}
            }
            let description =
                commentary::event_line(&event, &home.name, &away.name, home_score, away_score);
            minute_commentary.get_or_insert_with(|| description.clone());
            sim_events.push(SimEvent { event, description });
        }

        let commentary = minute_commentary.unwrap_or_else(|| {
            commentary::minute_line(minute, &home.name, &away.name, home_score, away_score)
        });
        timeline.push(SimTimelineEntry { minute, home_score, away_score, commentary });
    }

    let possession_home = possession(home, away, home_score, away_score, &mut rng);
    let shots_home = shots(home_score, possession_home, &mut rng);
    let shots_away = shots(away_score, 100 - possession_home, &mut rng);

    let ratings = build_ratings(home, away, home_score, away_score, &tallies);

    tracing::debug!(
        home = %home.name,
        away = %away.name,
        score = format!("{home_score}-{away_score}"),
        possession_home,
        "match simulated"
    );

    SimulatedMatch {
        home_score,
        away_score,
        possession_home,
        shots_home,
        shots_away,
        events: sim_events,
        timeline,
        ratings,
    }
}

/// Home possession share: strength, tactics and scoreline biased around 50,
/// with a small random wobble, clamped to [35, 65].
fn possession<R: Rng>(
    home: &TeamSheet,
    away: &TeamSheet,
    home_score: u8,
    away_score: u8,
    rng: &mut R,
) -> u8 {
    let strength_bias = ((home.strength - away.strength) / 4.0).clamp(-8.0, 8.0);
    let tactic_bias = home.tactic.possession_bias() - away.tactic.possession_bias();
    // The leading side cedes the ball.
    let score_bias = 2.0 * (f64::from(home_score) - f64::from(away_score));
    let random_bias = f64::from(rng.gen_range(-3..=3));

    let raw = 50.0 + strength_bias + tactic_bias - score_bias + random_bias;
    (raw.round() as i32).clamp(MIN_POSSESSION, MAX_POSSESSION) as u8
}

fn shots<R: Rng>(goals: u8, possession: u8, rng: &mut R) -> u8 {
    let from_possession = possession / 12;
    let total = goals.saturating_add(from_possession).saturating_add(rng.gen_range(0..=2));
    total.max(MIN_SHOTS)
}

fn build_ratings(
    home: &TeamSheet,
    away: &TeamSheet,
    home_score: u8,
    away_score: u8,
    tallies: &HashMap<PlayerId, PlayerTally>,
) -> Vec<SimRating> {
    let mut ratings = Vec::with_capacity(home.roster.len() + away.roster.len());
    let sides = [
        (home, home_score, away_score),
        (away, away_score, home_score),
    ];
    for (sheet, scored, conceded) in sides {
        for player in &sheet.roster {
            let tally = tallies.get(&player.id);
            let inputs = RatingInputs {
                goals: tally.map_or(0, |t| t.goals),
                yellow_cards: tally.map_or(0, |t| t.yellows),
                red_cards: tally.map_or(0, |t| t.reds),
                team_scored: scored,
                team_conceded: conceded,
                team_won: scored > conceded,
            };
            ratings.push(SimRating {
                player_id: player.id,
                club_id: sheet.club_id,
                rating: rating::player_rating(&inputs),
            });
        }
    }
    ratings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::rating::{MAX_RATING, MIN_RATING};

    fn sheet(club_id: ClubId, name: &str, strength: f64) -> TeamSheet {
        let roster = (1..=11)
            .map(|i| PlayerInfo {
                id: club_id * 100 + i,
                name: format!("{name} {i}"),
                overall: strength as u8,
            })
            .collect();
        TeamSheet {
            club_id,
            name: name.to_string(),
            strength,
            tactic: TacticalProfile::default(),
            roster,
        }
    }

    #[test]
    fn timeline_has_one_row_per_minute() {
        let result = simulate(&sheet(1, "Reds", 75.0), &sheet(2, "Blues", 75.0), 42);
        assert_eq!(result.timeline.len(), 90);
        for (idx, row) in result.timeline.iter().enumerate() {
            assert_eq!(row.minute as usize, idx + 1);
        }
        let last = result.timeline.last().expect("90 rows");
        assert_eq!((last.home_score, last.away_score), (result.home_score, result.away_score));
    }

    #[test]
    fn score_matches_goal_events() {
        let result = simulate(&sheet(1, "Reds", 80.0), &sheet(2, "Blues", 72.0), 9);
        let home_goals = result
            .events
            .iter()
            .filter(|e| {
                e.event.side == Side::Home && matches!(e.event.kind, MinuteEventKind::Goal { .. })
            })
            .count();
        let away_goals = result
            .events
            .iter()
            .filter(|e| {
                e.event.side == Side::Away && matches!(e.event.kind, MinuteEventKind::Goal { .. })
            })
            .count();
        assert_eq!(result.home_score as usize, home_goals);
        assert_eq!(result.away_score as usize, away_goals);
    }

    #[test]
    fn aggregate_stats_stay_in_bounds() {
        for seed in 0..50 {
            let result = simulate(&sheet(1, "Reds", 88.0), &sheet(2, "Blues", 62.0), seed);
            assert!((35..=65).contains(&i32::from(result.possession_home)));
            assert!(result.shots_home >= MIN_SHOTS);
            assert!(result.shots_away >= MIN_SHOTS);
        }
    }

    #[test]
    fn every_roster_player_gets_a_rating_in_range() {
        let home = sheet(1, "Reds", 75.0);
        let away = sheet(2, "Blues", 75.0);
        let result = simulate(&home, &away, 11);
        assert_eq!(result.ratings.len(), 22);
        for r in &result.ratings {
            let rating = f64::from(r.rating);
            assert!((MIN_RATING..=MAX_RATING).contains(&rating), "rating {rating} out of range");
        }
    }

    #[test]
    fn same_seed_is_deterministic() {
        let home = sheet(1, "Reds", 78.0);
        let away = sheet(2, "Blues", 74.0);
        let a = simulate(&home, &away, 1234);
        let b = simulate(&home, &away, 1234);
        assert_eq!((a.home_score, a.away_score), (b.home_score, b.away_score));
        assert_eq!(a.possession_home, b.possession_home);
        assert_eq!(a.events.len(), b.events.len());
    }

    #[test]
    fn stronger_home_side_wins_the_aggregate() {
        let home = sheet(1, "Reds", 85.0);
        let away = sheet(2, "Blues", 70.0);
        let mut home_total = 0u32;
        let mut away_total = 0u32;
        for seed in 0..300 {
            let result = simulate(&home, &away, seed);
            home_total += u32::from(result.home_score);
            away_total += u32::from(result.away_score);
        }
        assert!(
            home_total > away_total,
            "expected home goal aggregate ahead: {home_total} vs {away_total}"
        );
    }
}
