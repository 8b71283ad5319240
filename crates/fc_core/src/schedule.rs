//! Fixture scheduling.
//!
//! Pure functions from an ordered club list to a round plan. The caller owns
//! date assignment (season start plus seven days per round index) and fixture
//! persistence.

use crate::error::ScheduleError;
use crate::models::ClubId;

/// (home, away) pairing within a round.
pub type Pairing = (ClubId, ClubId);

/// Rounds in playing order; each round is a list of pairings.
pub type RoundPlan = Vec<Vec<Pairing>>;

/// Group-stage pairing tagged with its group label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupPairing {
    pub group: char,
    pub home: ClubId,
    pub away: ClubId,
}

/// Complete continental-format plan: two groups of four, pre-seeded
/// semifinals one round after the group stage, and a final one round later.
#[derive(Debug, Clone)]
pub struct ContinentalPlan {
    pub group_a: Vec<ClubId>,
    pub group_b: Vec<ClubId>,
    pub group_rounds: Vec<Vec<GroupPairing>>,
    pub semifinals: [Pairing; 2],
    pub final_pairing: Pairing,
}

/// Single-leg round robin via the classic circle method.
///
/// For an odd club count a synthetic bye slot is appended; pairings touching
/// the bye are dropped while the remaining clubs keep rotating. Home/away
/// alternates with round parity so no club is always first-listed.
///
/// Produces `n - 1` rounds for even `n`, `n` rounds (one bye each) for odd.
pub fn single_round_robin(clubs: &[ClubId]) -> Result<RoundPlan, ScheduleError> {
    if clubs.len() < 2 {
        return Err(ScheduleError::NotEnoughClubs { found: clubs.len() });
    }

    let mut slots: Vec<Option<ClubId>> = clubs.iter().copied().map(Some).collect();
    if slots.len() % 2 != 0 {
        slots.push(None); // bye
    }

    let n = slots.len();
    let rounds = n - 1;
    let mut plan = Vec::with_capacity(rounds);

    for round in 0..rounds {
        let mut pairings = Vec::with_capacity(n / 2);
        for i in 0..n / 2 {
            let (first, second) = (slots[i], slots[n - 1 - i]);
            if let (Some(a), Some(b)) = (first, second) {
                if round % 2 == 0 {
                    pairings.push((a, b));
                } else {
                    pairings.push((b, a));
                }
            }
        }
        plan.push(pairings);

        // Circle rotation: first slot fixed, the rest shift by one.
        slots[1..].rotate_right(1);
    }

    Ok(plan)
}

/// Double-leg round robin: the single-leg plan followed by a mirrored copy
/// with home and away swapped.
pub fn double_round_robin(clubs: &[ClubId]) -> Result<RoundPlan, ScheduleError> {
    let mut plan = single_round_robin(clubs)?;
    let second_half: Vec<Vec<Pairing>> = plan
        .iter()
        .map(|round| round.iter().map(|&(home, away)| (away, home)).collect())
        .collect();
    plan.extend(second_half);
    Ok(plan)
}

/// Continental format over exactly 8 clubs, pre-ranked by the caller
/// (e.g. by budget).
///
/// Clubs are dealt into groups A/B alternating by rank, each group plays a
/// single-leg round robin, and the bracket is seeded at creation time:
/// A1 vs B2 and B1 vs A2 in the semifinals, A1 vs B1 in the final. Seeds are
/// the groups' creation-order top two, not actual group results; group play
/// never re-seeds the bracket.
pub fn continental(clubs: &[ClubId]) -> Result<ContinentalPlan, ScheduleError> {
    if clubs.len() != 8 {
        return Err(ScheduleError::WrongClubCount { found: clubs.len() });
    }

    let mut group_a = Vec::with_capacity(4);
    let mut group_b = Vec::with_capacity(4);
    for (rank, &club) in clubs.iter().enumerate() {
        if rank % 2 == 0 {
            group_a.push(club);
        } else {
            group_b.push(club);
        }
    }

    let plan_a = single_round_robin(&group_a)?;
    let plan_b = single_round_robin(&group_b)?;
    debug_assert_eq!(plan_a.len(), plan_b.len());

    let group_rounds = plan_a
        .into_iter()
        .zip(plan_b)
        .map(|(round_a, round_b)| {
            round_a
                .into_iter()
                .map(|(home, away)| GroupPairing { group: 'A', home, away })
                .chain(round_b.into_iter().map(|(home, away)| GroupPairing {
                    group: 'B',
                    home,
                    away,
                }))
                .collect()
        })
        .collect();

    Ok(ContinentalPlan {
        semifinals: [(group_a[0], group_b[1]), (group_b[0], group_a[1])],
        final_pairing: (group_a[0], group_b[0]),
        group_a,
        group_b,
        group_rounds,
    })
}
