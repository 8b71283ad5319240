//! Post-match player ratings.

pub const BASE_RATING: f64 = 6.5;
pub const MIN_RATING: f64 = 4.5;
pub const MAX_RATING: f64 = 10.0;

/// A player's event history plus the team result, the only inputs to the
/// rating formula.
#[derive(Debug, Clone, Copy, Default)]
pub struct RatingInputs {
    pub goals: u8,
    pub yellow_cards: u8,
    pub red_cards: u8,
    pub team_scored: u8,
    pub team_conceded: u8,
    pub team_won: bool,
}

/// One-decimal match rating in [4.5, 10.0].
///
/// 6.5 base, +0.9 per goal, -0.2 per yellow, -0.8 per red, a team bonus of
/// up to +1.0 scaled by goals scored, a malus of up to -1.0 scaled by goals
/// conceded, and +0.3 for being on the winning side.
pub fn player_rating(inputs: &RatingInputs) -> f32 {
    let mut rating = BASE_RATING;
    rating += 0.9 * f64::from(inputs.goals);
    rating -= 0.2 * f64::from(inputs.yellow_cards);
    rating -= 0.8 * f64::from(inputs.red_cards);
    rating += (0.25 * f64::from(inputs.team_scored)).min(1.0);
    rating -= (0.25 * f64::from(inputs.team_conceded)).min(1.0);
    if inputs.team_won {
        rating += 0.3;
    }
    let clamped = rating.clamp(MIN_RATING, MAX_RATING);
    ((clamped * 10.0).round() / 10.0) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_match_on_losing_side_stays_near_base() {
        let rating = player_rating(&RatingInputs {
            team_conceded: 1,
            ..Default::default()
        });
        assert_eq!(rating, 6.3);
    }

    #[test]
    fn scorer_on_winning_side_is_rewarded() {
        let rating = player_rating(&RatingInputs {
            goals: 1,
            team_scored: 2,
            team_conceded: 1,
            team_won: true,
            ..Default::default()
        });
        // 6.5 + 0.9 + 0.5 - 0.25 + 0.3
        assert_eq!(rating, 8.0);
    }

    #[test]
    fn team_scaling_is_capped_both_ways() {
        let blowout_winner = player_rating(&RatingInputs {
            team_scored: 8,
            team_won: true,
            ..Default::default()
        });
        assert_eq!(blowout_winner, 7.8); // bonus capped at +1.0

        let blowout_loser = player_rating(&RatingInputs {
            team_conceded: 8,
            ..Default::default()
        });
        assert_eq!(blowout_loser, 5.5); // malus capped at -1.0
    }

    #[test]
    fn rating_is_clamped_to_range() {
        let hat_trick_hero = player_rating(&RatingInputs {
            goals: 6,
            team_scored: 6,
            team_won: true,
            ..Default::default()
        });
        assert_eq!(hat_trick_hero, 10.0);

        let disaster = player_rating(&RatingInputs {
            red_cards: 2,
            yellow_cards: 3,
            team_conceded: 5,
            ..Default::default()
        });
        assert_eq!(disaster, 4.5);
    }
}
