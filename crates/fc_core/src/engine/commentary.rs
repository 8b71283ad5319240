//! Commentary text generation.
//!
//! Pure formatters: fixed lines for the structural minutes, a generic filler
//! otherwise, and event lines interpolating club/player names with the
//! running score.

use super::events::{MinuteEvent, MinuteEventKind, Side};
use crate::models::PlayerInfo;

/// Per-minute timeline line for minutes where nothing happened.
pub fn minute_line(
    minute: u8,
    home_name: &str,
    away_name: &str,
    home_goals: u8,
    away_goals: u8,
) -> String {
    match minute {
        1 => format!("Kick-off! {home_name} get us under way against {away_name}."),
        45 => format!("Half-time: {home_name} {home_goals}-{away_goals} {away_name}."),
        46 => "The second half is under way.".to_string(),
        90 => format!("Full-time: {home_name} {home_goals}-{away_goals} {away_name}."),
        _ => format!("{minute}' - The play moves on, {home_goals}-{away_goals}."),
    }
}

fn actor_name(player: &Option<PlayerInfo>, club_name: &str) -> String {
    match player {
        Some(p) => p.name.clone(),
        None => format!("a {club_name} player"),
    }
}

/// Event line including the score as it stands after the event.
pub fn event_line(
    event: &MinuteEvent,
    home_name: &str,
    away_name: &str,
    home_goals: u8,
    away_goals: u8,
) -> String {
    let club_name = match event.side {
        Side::Home => home_name,
        Side::Away => away_name,
    };
    let minute = event.minute;
    match &event.kind {
        MinuteEventKind::Goal { scorer } => {
            let who = actor_name(scorer, club_name);
            format!(
                "{minute}' - GOAL! {who} scores for {club_name}! \
                 {home_name} {home_goals}-{away_goals} {away_name}."
            )
        }
        MinuteEventKind::YellowCard { player } => {
            format!("{minute}' - {} is booked.", actor_name(player, club_name))
        }
        MinuteEventKind::RedCard { player } => {
            format!("{minute}' - Red card! {} is sent off.", actor_name(player, club_name))
        }
        MinuteEventKind::Injury { player } => {
            format!("{minute}' - {} is down injured.", actor_name(player, club_name))
        }
        MinuteEventKind::TacticalChange => {
            format!("{minute}' - {club_name} switch their tactical approach.")
        }
        MinuteEventKind::Substitution { player } => {
            format!("{minute}' - {club_name} make a change, {} comes on.", actor_name(player, club_name))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structural_minutes_have_fixed_lines() {
        assert!(minute_line(1, "Reds", "Blues", 0, 0).starts_with("Kick-off!"));
        assert_eq!(minute_line(45, "Reds", "Blues", 2, 1), "Half-time: Reds 2-1 Blues.");
        assert_eq!(minute_line(46, "Reds", "Blues", 2, 1), "The second half is under way.");
        assert_eq!(minute_line(90, "Reds", "Blues", 2, 1), "Full-time: Reds 2-1 Blues.");
    }

    #[test]
    fn goal_line_interpolates_scorer_and_score() {
        let event = MinuteEvent {
            minute: 23,
            side: Side::Away,
            kind: MinuteEventKind::Goal {
                scorer: Some(PlayerInfo { id: 9, name: "Nine".into(), overall: 80 }),
            },
        };
        let line = event_line(&event, "Reds", "Blues", 0, 1);
        assert!(line.contains("Nine"));
        assert!(line.contains("Blues"));
        assert!(line.contains("0-1"));
    }

    #[test]
    fn anonymous_actor_falls_back_to_club() {
        let event = MinuteEvent {
            minute: 70,
            side: Side::Home,
            kind: MinuteEventKind::YellowCard { player: None },
        };
        let line = event_line(&event, "Reds", "Blues", 0, 0);
        assert!(line.contains("a Reds player"));
    }
}
