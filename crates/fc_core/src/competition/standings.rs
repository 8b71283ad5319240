//! Standings ledger.
//!
//! Pure mutations over the standing rows of one (season, stage, group)
//! scope. The store runs these under its write lock so concurrent result
//! applications never interleave.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::error::{CompetitionError, Result};
use crate::models::{ClubId, Standing};

/// Apply a finished fixture's score to both clubs' rows.
///
/// The caller guarantees the fixture transitioned scheduled -> played exactly
/// once before this runs, so a result is never applied twice. Knockout
/// fixtures must be filtered out by the caller; they never reach a table.
pub fn apply_result(
    rows: &mut [Standing],
    home_club: ClubId,
    away_club: ClubId,
    home_goals: u8,
    away_goals: u8,
) -> Result<()> {
    let home_idx = find_club(rows, home_club)?;
    let away_idx = find_club(rows, away_club)?;

    apply_side(&mut rows[home_idx], home_goals, away_goals);
    apply_side(&mut rows[away_idx], away_goals, home_goals);
    Ok(())
}

fn find_club(rows: &[Standing], club: ClubId) -> Result<usize> {
    rows.iter()
        .position(|r| r.club_id == club)
        .ok_or_else(|| CompetitionError::NotFound(format!("standing row for club {club}")))
}

fn apply_side(row: &mut Standing, scored: u8, conceded: u8) {
    row.played += 1;
    row.goals_for += i32::from(scored);
    row.goals_against += i32::from(conceded);
    // Always derived, never drifted.
    row.goal_difference = row.goals_for - row.goals_against;

    match scored.cmp(&conceded) {
        Ordering::Greater => row.won += 1,
        Ordering::Less => row.lost += 1,
        Ordering::Equal => row.drawn += 1,
    }
    row.points = 3 * row.won + row.drawn;
}

/// Recompute every position in the scope from scratch.
///
/// Total order: points desc, goal difference desc, goals for desc, club name
/// asc. Recomputing the whole scope after each mutation keeps positions
/// consistent no matter which order rows were touched in.
pub fn recompute_positions(rows: &mut [Standing], club_names: &HashMap<ClubId, String>) {
    let empty = String::new();
    rows.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then_with(|| b.goal_difference.cmp(&a.goal_difference))
            .then_with(|| b.goals_for.cmp(&a.goals_for))
            .then_with(|| {
                let name_a = club_names.get(&a.club_id).unwrap_or(&empty);
                let name_b = club_names.get(&b.club_id).unwrap_or(&empty);
                name_a.cmp(name_b)
            })
    });
    for (idx, row) in rows.iter_mut().enumerate() {
        row.position = idx as u32 + 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Stage;

    fn rows(clubs: &[ClubId]) -> Vec<Standing> {
        clubs
            .iter()
            .enumerate()
            .map(|(idx, &club)| Standing::zeroed(idx as u64 + 1, 1, club, Stage::League, None))
            .collect()
    }

    fn names(pairs: &[(ClubId, &str)]) -> HashMap<ClubId, String> {
        pairs.iter().map(|&(id, name)| (id, name.to_string())).collect()
    }

    #[test]
    fn home_win_two_one() {
        let mut table = rows(&[1, 2]);
        apply_result(&mut table, 1, 2, 2, 1).expect("apply");
        recompute_positions(&mut table, &names(&[(1, "Reds"), (2, "Blues")]));

        let home = table.iter().find(|r| r.club_id == 1).expect("home row");
        assert_eq!((home.played, home.won, home.points), (1, 1, 3));
        assert_eq!((home.goals_for, home.goals_against, home.goal_difference), (2, 1, 1));
        assert_eq!(home.position, 1);

        let away = table.iter().find(|r| r.club_id == 2).expect("away row");
        assert_eq!((away.played, away.lost, away.points), (1, 1, 0));
        assert_eq!((away.goals_for, away.goals_against, away.goal_difference), (1, 2, -1));
        assert_eq!(away.position, 2);
    }

    #[test]
    fn invariants_hold_after_many_results() {
        let mut table = rows(&[1, 2, 3, 4]);
        let results: [(ClubId, ClubId, u8, u8); 6] = [
            (1, 2, 2, 1),
            (3, 4, 0, 0),
            (1, 3, 1, 3),
            (2, 4, 2, 2),
            (1, 4, 0, 1),
            (2, 3, 4, 0),
        ];
        for (home, away, hg, ag) in results {
            apply_result(&mut table, home, away, hg, ag).expect("apply");
        }
        for row in &table {
            assert_eq!(row.points, 3 * row.won + row.drawn);
            assert_eq!(row.goal_difference, row.goals_for - row.goals_against);
            assert_eq!(row.played, row.won + row.drawn + row.lost);
        }
    }

    #[test]
    fn position_order_ignores_input_order() {
        let club_names = names(&[(1, "Alpha"), (2, "Beta"), (3, "Gamma")]);
        let results: [(ClubId, ClubId, u8, u8); 3] = [(1, 2, 1, 0), (2, 3, 2, 0), (3, 1, 0, 0)];

        let mut forward = rows(&[1, 2, 3]);
        for (home, away, hg, ag) in results {
            apply_result(&mut forward, home, away, hg, ag).expect("apply");
        }
        recompute_positions(&mut forward, &club_names);

        let mut shuffled = rows(&[3, 1, 2]);
        for (home, away, hg, ag) in results.iter().rev() {
            apply_result(&mut shuffled, *home, *away, *hg, *ag).expect("apply");
        }
        recompute_positions(&mut shuffled, &club_names);

        for club in [1u64, 2, 3] {
            let a = forward.iter().find(|r| r.club_id == club).expect("row");
            let b = shuffled.iter().find(|r| r.club_id == club).expect("row");
            assert_eq!(a.position, b.position, "club {club} position diverged");
        }
    }

    #[test]
    fn ties_break_on_goal_difference_then_goals_then_name() {
        let club_names = names(&[(1, "Zebra"), (2, "Apple")]);
        let mut table = rows(&[1, 2]);
        // Both finish on identical records; Apple must rank above Zebra.
        apply_result(&mut table, 1, 2, 1, 1).expect("apply");
        recompute_positions(&mut table, &club_names);
        assert_eq!(table[0].club_id, 2);
        assert_eq!(table[1].club_id, 1);
    }

    #[test]
    fn missing_row_is_reported() {
        let mut table = rows(&[1]);
        let err = apply_result(&mut table, 1, 99, 1, 0).unwrap_err();
        assert!(matches!(err, CompetitionError::NotFound(_)));
    }
}
