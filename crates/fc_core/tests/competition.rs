//! End-to-end orchestrator tests against in-memory collaborators.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use fc_core::{
    ClubDirectory, ClubId, ClubInfo, Competition, CompetitionError, CompetitionFormat,
    CompetitionId, CompetitionStore, FinanceHook, FixtureStatus, Orchestrator, PlayerInfo,
    RosterProvider, SeasonStatus, Stage, TacticalProfile,
};

struct FixedDirectory {
    clubs: HashMap<ClubId, ClubInfo>,
    entrants: Vec<ClubId>,
}

impl ClubDirectory for FixedDirectory {
    fn club(&self, id: ClubId) -> Option<ClubInfo> {
        self.clubs.get(&id).cloned()
    }

    fn competition_clubs(&self, _competition: CompetitionId) -> Vec<ClubId> {
        self.entrants.clone()
    }
}

struct FixedRosters {
    rosters: HashMap<ClubId, Vec<PlayerInfo>>,
}

impl RosterProvider for FixedRosters {
    fn roster(&self, club: ClubId) -> Vec<PlayerInfo> {
        self.rosters.get(&club).cloned().unwrap_or_default()
    }
}

#[derive(Default)]
struct RecordingFinance {
    total: AtomicI64,
}

impl FinanceHook for RecordingFinance {
    fn register_ticket_income(&self, _club: ClubId, amount: i64) {
        self.total.fetch_add(amount, Ordering::SeqCst);
    }
}

struct Harness {
    orchestrator: Orchestrator,
    finance: Arc<RecordingFinance>,
}

fn harness(club_count: u64, format: CompetitionFormat) -> Harness {
    let mut clubs = HashMap::new();
    let mut rosters = HashMap::new();
    let mut entrants = Vec::new();
    for id in 1..=club_count {
        entrants.push(id);
        clubs.insert(
            id,
            ClubInfo {
                id,
                name: format!("Club {id:02}"),
                stadium_capacity: 20_000,
                tactic: TacticalProfile::default(),
            },
        );
        let roster = (1..=11u64)
            .map(|slot| PlayerInfo {
                id: id * 100 + slot,
                name: format!("Player {id}-{slot}"),
                overall: 60 + ((id * 3 + slot) % 30) as u8,
            })
            .collect();
        rosters.insert(id, roster);
    }

    let finance = Arc::new(RecordingFinance::default());
    let orchestrator = Orchestrator::new(
        Arc::new(CompetitionStore::new()),
        Arc::new(FixedDirectory { clubs, entrants }),
        Arc::new(FixedRosters { rosters }),
        finance.clone(),
        vec![Competition { id: 1, name: "Test League".into(), format }],
    );
    Harness { orchestrator, finance }
}

#[test]
fn setup_season_is_idempotent() {
    let h = harness(4, CompetitionFormat::League { double_round: true });
    let first = h.orchestrator.setup_season(1, 2026).expect("setup").expect("created");
    let second = h.orchestrator.setup_season(1, 2026).expect("setup").expect("existing");

    assert_eq!(first.season.id, second.season.id);
    // 4 clubs, double round robin: 6 rounds of 2 fixtures.
    assert_eq!(first.max_round, 6);
    assert_eq!(first.fixtures_total, 12);
    assert_eq!(second.fixtures_total, 12);
}

#[test]
fn league_with_one_club_is_rejected() {
    let h = harness(1, CompetitionFormat::League { double_round: false });
    let err = h.orchestrator.setup_season(1, 2026).unwrap_err();
    assert!(matches!(err, CompetitionError::Schedule(_)));
}

#[test]
fn simulating_a_fixture_twice_fails() {
    let h = harness(4, CompetitionFormat::League { double_round: false });
    let summary = h.orchestrator.setup_season(1, 2026).expect("setup").expect("created");
    let fixtures = h.orchestrator.fixtures(summary.season.id, Some(1), None).expect("fixtures");
    let fixture = &fixtures[0];

    h.orchestrator.simulate_fixture_seeded(fixture.id, 77).expect("first simulation");
    let played = h.orchestrator.fixtures(summary.season.id, Some(1), None).expect("fixtures");
    assert_eq!(played[0].status, FixtureStatus::Played);

    let err = h.orchestrator.simulate_fixture_seeded(fixture.id, 78).unwrap_err();
    assert!(matches!(err, CompetitionError::FixtureAlreadySimulated(id) if id == fixture.id));

    assert!(h.finance.total.load(Ordering::SeqCst) > 0, "ticket income must be registered");
}

#[test]
fn round_simulation_advances_and_finishes_the_season() {
    let h = harness(4, CompetitionFormat::League { double_round: false });
    let summary = h.orchestrator.setup_season(1, 2026).expect("setup").expect("created");
    let season_id = summary.season.id;

    for round in 1..=summary.max_round {
        let report = h.orchestrator.simulate_round(season_id, None).expect("round");
        assert_eq!(report.round, round);
        assert_eq!(report.results.len(), 2);
    }

    let finished = h.orchestrator.season_summary(season_id).expect("summary");
    assert_eq!(finished.season.status, SeasonStatus::Finished);
    assert_eq!(finished.fixtures_played, finished.fixtures_total);

    let err = h.orchestrator.simulate_round(season_id, None).unwrap_err();
    assert!(matches!(err, CompetitionError::InvalidRequest(_)));
}

#[test]
fn empty_round_is_rejected() {
    let h = harness(4, CompetitionFormat::League { double_round: false });
    let summary = h.orchestrator.setup_season(1, 2026).expect("setup").expect("created");
    h.orchestrator.simulate_round(summary.season.id, Some(1)).expect("round 1");
    let err = h.orchestrator.simulate_round(summary.season.id, Some(1)).unwrap_err();
    assert!(matches!(err, CompetitionError::InvalidRequest(_)));

    let err = h.orchestrator.simulate_round(summary.season.id, Some(99)).unwrap_err();
    assert!(matches!(err, CompetitionError::InvalidRequest(_)));
}

#[test]
fn standings_stay_consistent_over_a_full_season() {
    let h = harness(6, CompetitionFormat::League { double_round: true });
    let summary = h.orchestrator.setup_season(1, 2026).expect("setup").expect("created");
    let season_id = summary.season.id;

    while h.orchestrator.season_summary(season_id).expect("summary").season.status
        == SeasonStatus::Ongoing
    {
        h.orchestrator.simulate_round(season_id, None).expect("round");
    }

    let standings = h.orchestrator.standings(season_id).expect("standings");
    assert_eq!(standings.len(), 6);

    let mut positions: Vec<u32> = standings.iter().map(|s| s.position).collect();
    positions.sort_unstable();
    assert_eq!(positions, vec![1, 2, 3, 4, 5, 6]);

    for row in &standings {
        assert_eq!(row.points, 3 * row.won + row.drawn);
        assert_eq!(row.goal_difference, row.goals_for - row.goals_against);
        assert_eq!(row.played, 10);
    }

    // Ranked output must follow the total order.
    for pair in standings.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        assert!(
            (a.points, a.goal_difference, a.goals_for) >= (b.points, b.goal_difference, b.goals_for)
        );
    }
}

#[test]
fn continental_season_builds_groups_and_knockout_rounds() {
    let h = harness(8, CompetitionFormat::GroupKnockout);
    let summary = h.orchestrator.setup_season(1, 2026).expect("setup").expect("created");
    let season_id = summary.season.id;

    let group_fixtures =
        h.orchestrator.fixtures(season_id, None, Some(Stage::Group)).expect("group fixtures");
    assert_eq!(group_fixtures.len(), 12); // two groups of 4, single round robin

    let knockout =
        h.orchestrator.fixtures(season_id, None, Some(Stage::Knockout)).expect("knockout");
    assert_eq!(knockout.len(), 3); // two semifinals and a final
    assert_eq!(summary.max_round, 5);

    let standings = h.orchestrator.standings(season_id).expect("standings");
    assert_eq!(standings.len(), 8);
    assert!(standings.iter().all(|s| s.stage == Stage::Group));
    assert_eq!(standings.iter().filter(|s| s.group == Some('A')).count(), 4);

    // Knockout results must never touch the tables.
    while h.orchestrator.season_summary(season_id).expect("summary").season.status
        == SeasonStatus::Ongoing
    {
        h.orchestrator.simulate_round(season_id, None).expect("round");
    }
    let after = h.orchestrator.standings(season_id).expect("standings");
    assert!(after.iter().all(|s| s.played == 3));
}

#[test]
fn continental_with_wrong_club_count_is_skipped() {
    let h = harness(6, CompetitionFormat::GroupKnockout);
    let outcome = h.orchestrator.setup_season(1, 2026).expect("setup");
    assert!(outcome.is_none());
}

#[test]
fn top_scorers_are_ranked_by_goals() {
    let h = harness(4, CompetitionFormat::League { double_round: true });
    let summary = h.orchestrator.setup_season(1, 2026).expect("setup").expect("created");
    let season_id = summary.season.id;

    while h.orchestrator.season_summary(season_id).expect("summary").season.status
        == SeasonStatus::Ongoing
    {
        h.orchestrator.simulate_round(season_id, None).expect("round");
    }

    let scorers = h.orchestrator.top_scorers(season_id, 5).expect("scorers");
    assert!(!scorers.is_empty(), "a 12-fixture season should produce goals");
    assert!(scorers.len() <= 5);
    for pair in scorers.windows(2) {
        assert!(pair[0].goals >= pair[1].goals);
    }
}
