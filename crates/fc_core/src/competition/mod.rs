//! Competition orchestration.
//!
//! Ties the scheduler, strength resolver, match simulator and standings
//! ledger together: creates seasons, simulates fixtures and rounds, and
//! answers the queries consumed by external request handlers.

pub mod standings;

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::engine::{self, simulator, TeamSheet};
use crate::error::{CompetitionError, Result, ScheduleError};
use crate::external::{ClubDirectory, FinanceHook, RosterProvider};
use crate::models::{
    ClubId, CompetitionId, Fixture, FixtureId, FixtureStatus, KnockoutRound, MatchEventType,
    PlayerId, Season, SeasonId, SeasonStatus, Stage, Standing,
};
use crate::schedule::{self, Pairing};
use crate::store::CompetitionStore;

/// Fixed matchday ticket price fed into the income side effect.
pub const TICKET_PRICE: i64 = 35;
const DAYS_PER_ROUND: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompetitionFormat {
    League { double_round: bool },
    GroupKnockout,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Competition {
    pub id: CompetitionId,
    pub name: String,
    pub format: CompetitionFormat,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeasonSummary {
    pub season: Season,
    pub max_round: u32,
    pub fixtures_total: usize,
    pub fixtures_played: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoundReport {
    pub round: u32,
    pub results: Vec<FixtureResult>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FixtureResult {
    pub fixture_id: FixtureId,
    pub home_score: u8,
    pub away_score: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct TopScorer {
    pub player_id: PlayerId,
    pub player_name: String,
    pub club_id: ClubId,
    pub goals: u32,
}

pub struct Orchestrator {
    store: Arc<CompetitionStore>,
    directory: Arc<dyn ClubDirectory>,
    rosters: Arc<dyn RosterProvider>,
    finance: Arc<dyn FinanceHook>,
    competitions: HashMap<CompetitionId, Competition>,
}

impl Orchestrator {
    pub fn new(
        store: Arc<CompetitionStore>,
        directory: Arc<dyn ClubDirectory>,
        rosters: Arc<dyn RosterProvider>,
        finance: Arc<dyn FinanceHook>,
        competitions: Vec<Competition>,
    ) -> Self {
        let competitions = competitions.into_iter().map(|c| (c.id, c)).collect();
        Self { store, directory, rosters, finance, competitions }
    }

    pub fn store(&self) -> &Arc<CompetitionStore> {
        &self.store
    }

    pub fn club_name(&self, club: ClubId) -> Option<String> {
        self.directory.club(club).map(|c| c.name)
    }

    fn competition(&self, id: CompetitionId) -> Result<&Competition> {
        self.competitions
            .get(&id)
            .ok_or_else(|| CompetitionError::NotFound(format!("competition {id}")))
    }

    // ------------------------------------------------------------------
    // Season setup
    // ------------------------------------------------------------------

    /// Create a season with its fixtures and zeroed standings, as one unit.
    ///
    /// Idempotent: an existing (competition, year) season is returned as-is.
    /// A continental competition without exactly 8 entrants is skipped
    /// silently, returning `None`.
    pub fn setup_season(
        &self,
        competition_id: CompetitionId,
        year: i32,
    ) -> Result<Option<SeasonSummary>> {
        let competition = self.competition(competition_id)?;

        if let Some(existing) = self.store.season_by_key(competition_id, year) {
            tracing::debug!(season = existing.id, year, "season already set up");
            return Ok(Some(self.summarize(existing)));
        }

        let clubs = self.directory.competition_clubs(competition_id);
        let start = season_start(year)?;

        let season = match competition.format {
            CompetitionFormat::League { double_round } => {
                let plan = if double_round {
                    schedule::double_round_robin(&clubs)?
                } else {
                    schedule::single_round_robin(&clubs)?
                };
                let season = self.store.insert_season(competition_id, year);
                self.create_league_fixtures(&season, &plan, start);
                self.create_standings(&season, &clubs, Stage::League, None)?;
                season
            }
            CompetitionFormat::GroupKnockout => {
                let plan = match schedule::continental(&clubs) {
                    Ok(plan) => plan,
                    Err(ScheduleError::WrongClubCount { found }) => {
                        tracing::warn!(
                            competition = competition_id,
                            year,
                            found,
                            "skipping continental season, need exactly 8 clubs"
                        );
                        return Ok(None);
                    }
                    Err(err) => return Err(err.into()),
                };
                let season = self.store.insert_season(competition_id, year);
                self.create_continental_fixtures(&season, &plan, start);
                self.create_standings(&season, &plan.group_a, Stage::Group, Some('A'))?;
                self.create_standings(&season, &plan.group_b, Stage::Group, Some('B'))?;
                season
            }
        };

        tracing::info!(
            season = season.id,
            competition = competition_id,
            year,
            clubs = clubs.len(),
            "season created"
        );
        Ok(Some(self.summarize(season)))
    }

    fn create_league_fixtures(&self, season: &Season, plan: &[Vec<Pairing>], start: NaiveDate) {
        for (round_idx, pairings) in plan.iter().enumerate() {
            let date = start + Duration::days(DAYS_PER_ROUND * round_idx as i64);
            for &(home, away) in pairings {
                self.store.insert_fixture(new_fixture(
                    season.id,
                    round_idx as u32 + 1,
                    Stage::League,
                    None,
                    None,
                    home,
                    away,
                    date,
                ));
            }
        }
    }

    fn create_continental_fixtures(
        &self,
        season: &Season,
        plan: &schedule::ContinentalPlan,
        start: NaiveDate,
    ) {
        for (round_idx, pairings) in plan.group_rounds.iter().enumerate() {
            let date = start + Duration::days(DAYS_PER_ROUND * round_idx as i64);
            for pairing in pairings {
                self.store.insert_fixture(new_fixture(
                    season.id,
                    round_idx as u32 + 1,
                    Stage::Group,
                    Some(pairing.group),
                    None,
                    pairing.home,
                    pairing.away,
                    date,
                ));
            }
        }

        let group_rounds = plan.group_rounds.len() as u32;
        let semi_date = start + Duration::days(DAYS_PER_ROUND * i64::from(group_rounds));
        for &(home, away) in &plan.semifinals {
            self.store.insert_fixture(new_fixture(
                season.id,
                group_rounds + 1,
                Stage::Knockout,
                None,
                Some(KnockoutRound::Semifinal),
                home,
                away,
                semi_date,
            ));
        }

        let final_date = semi_date + Duration::days(DAYS_PER_ROUND);
        let (home, away) = plan.final_pairing;
        self.store.insert_fixture(new_fixture(
            season.id,
            group_rounds + 2,
            Stage::Knockout,
            None,
            Some(KnockoutRound::Final),
            home,
            away,
            final_date,
        ));
    }

    fn create_standings(
        &self,
        season: &Season,
        clubs: &[ClubId],
        stage: Stage,
        group: Option<char>,
    ) -> Result<()> {
        for &club in clubs {
            self.store.insert_standing(Standing::zeroed(0, season.id, club, stage, group));
        }
        // Zero-point tables still get a deterministic name-ordered ranking.
        let names = self.club_names(clubs)?;
        self.store.update_standings_scope(season.id, stage, group, |rows| {
            standings::recompute_positions(rows, &names);
            Ok(())
        })
    }

    fn club_names(&self, clubs: &[ClubId]) -> Result<HashMap<ClubId, String>> {
        clubs
            .iter()
            .map(|&id| {
                self.directory
                    .club(id)
                    .map(|c| (id, c.name))
                    .ok_or_else(|| CompetitionError::NotFound(format!("club {id}")))
            })
            .collect()
    }

    // ------------------------------------------------------------------
    // Simulation
    // ------------------------------------------------------------------

    /// Simulate one fixture with a fresh random seed.
    pub fn simulate_fixture(&self, fixture_id: FixtureId) -> Result<(u8, u8)> {
        self.simulate_fixture_seeded(fixture_id, rand::random())
    }

    /// Simulate one fixture deterministically.
    ///
    /// Rejects fixtures already played. On success the match rows replace any
    /// stale ones, the fixture flips to played, league/group standings are
    /// applied and ticket income is registered for the home club. No writes
    /// happen unless the simulation itself succeeded.
    pub fn simulate_fixture_seeded(&self, fixture_id: FixtureId, seed: u64) -> Result<(u8, u8)> {
        let fixture = self
            .store
            .fixture(fixture_id)
            .ok_or_else(|| CompetitionError::NotFound(format!("fixture {fixture_id}")))?;
        if fixture.is_played() {
            return Err(CompetitionError::FixtureAlreadySimulated(fixture_id));
        }

        let home = self.team_sheet(fixture.home_club)?;
        let away = self.team_sheet(fixture.away_club)?;
        let outcome = simulator::simulate(&home, &away, seed);

        self.store.commit_simulation(fixture_id, &outcome, Utc::now())?;

        if fixture.affects_standings() {
            let names = self.club_names(&[fixture.home_club, fixture.away_club])?;
            self.store.update_standings_scope(
                fixture.season_id,
                fixture.stage,
                fixture.group,
                |rows| {
                    standings::apply_result(
                        rows,
                        fixture.home_club,
                        fixture.away_club,
                        outcome.home_score,
                        outcome.away_score,
                    )?;
                    let mut scope_names = names;
                    for row in rows.iter() {
                        if let std::collections::hash_map::Entry::Vacant(entry) =
                            scope_names.entry(row.club_id)
                        {
                            if let Some(club) = self.directory.club(row.club_id) {
                                entry.insert(club.name);
                            }
                        }
                    }
                    standings::recompute_positions(rows, &scope_names);
                    Ok(())
                },
            )?;
        }

        self.register_income(&fixture, seed);

        tracing::info!(
            fixture = fixture_id,
            home = %home.name,
            away = %away.name,
            score = format!("{}-{}", outcome.home_score, outcome.away_score),
            "fixture simulated"
        );
        Ok((outcome.home_score, outcome.away_score))
    }

    fn team_sheet(&self, club_id: ClubId) -> Result<TeamSheet> {
        let club = self
            .directory
            .club(club_id)
            .ok_or_else(|| CompetitionError::NotFound(format!("club {club_id}")))?;
        let roster = self.rosters.roster(club_id);
        Ok(TeamSheet {
            club_id,
            name: club.name,
            strength: engine::club_strength(&roster),
            tactic: club.tactic,
            roster,
        })
    }

    fn register_income(&self, fixture: &Fixture, seed: u64) {
        let Some(home) = self.directory.club(fixture.home_club) else {
            return;
        };
        // Attendance derives from the match seed so a deterministic replay
        // books the same income.
        let mut rng = ChaCha8Rng::seed_from_u64(seed ^ 0x9e37_79b9_7f4a_7c15);
        let fill: f64 = rng.gen_range(0.55..0.98);
        let attendance = (f64::from(home.stadium_capacity) * fill) as i64;
        self.finance.register_ticket_income(fixture.home_club, attendance * TICKET_PRICE);
    }

    /// Simulate every scheduled fixture of one round, date order.
    ///
    /// Defaults to the season's current round. Afterwards the season's round
    /// counter advances (capped at the final round) and the season finishes
    /// once nothing is left scheduled.
    pub fn simulate_round(&self, season_id: SeasonId, round: Option<u32>) -> Result<RoundReport> {
        let mut season = self
            .store
            .season(season_id)
            .ok_or_else(|| CompetitionError::NotFound(format!("season {season_id}")))?;
        if season.is_finished() {
            return Err(CompetitionError::InvalidRequest(format!(
                "season {season_id} is already finished"
            )));
        }

        let max_round = self.store.max_round(season_id);
        let target = round.unwrap_or(season.current_round);
        if target == 0 || target > max_round {
            return Err(CompetitionError::InvalidRequest(format!(
                "round {target} is out of range 1..={max_round}"
            )));
        }

        let scheduled: Vec<Fixture> = self
            .store
            .fixtures_for_season(season_id, Some(target), None)
            .into_iter()
            .filter(|f| f.status == FixtureStatus::Scheduled)
            .collect();
        if scheduled.is_empty() {
            return Err(CompetitionError::InvalidRequest(format!(
                "round {target} has no scheduled fixtures"
            )));
        }

        let mut results = Vec::with_capacity(scheduled.len());
        for fixture in scheduled {
            let (home_score, away_score) = self.simulate_fixture(fixture.id)?;
            results.push(FixtureResult { fixture_id: fixture.id, home_score, away_score });
        }

        season.current_round = (target + 1).min(max_round);
        if !self.store.has_scheduled_fixtures(season_id) {
            season.status = SeasonStatus::Finished;
            tracing::info!(season = season_id, "season finished");
        }
        self.store.update_season(season.clone());

        Ok(RoundReport { round: target, results })
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn season_summary(&self, season_id: SeasonId) -> Result<SeasonSummary> {
        let season = self
            .store
            .season(season_id)
            .ok_or_else(|| CompetitionError::NotFound(format!("season {season_id}")))?;
        Ok(self.summarize(season))
    }

    fn summarize(&self, season: Season) -> SeasonSummary {
        let fixtures = self.store.fixtures_for_season(season.id, None, None);
        let played = fixtures.iter().filter(|f| f.is_played()).count();
        SeasonSummary {
            max_round: self.store.max_round(season.id),
            fixtures_total: fixtures.len(),
            fixtures_played: played,
            season,
        }
    }

    pub fn standings(&self, season_id: SeasonId) -> Result<Vec<Standing>> {
        if self.store.season(season_id).is_none() {
            return Err(CompetitionError::NotFound(format!("season {season_id}")));
        }
        Ok(self.store.standings_for_season(season_id))
    }

    pub fn fixtures(
        &self,
        season_id: SeasonId,
        round: Option<u32>,
        stage: Option<Stage>,
    ) -> Result<Vec<Fixture>> {
        if self.store.season(season_id).is_none() {
            return Err(CompetitionError::NotFound(format!("season {season_id}")));
        }
        Ok(self.store.fixtures_for_season(season_id, round, stage))
    }

    /// Season top scorers, goals desc then name asc.
    pub fn top_scorers(&self, season_id: SeasonId, limit: usize) -> Result<Vec<TopScorer>> {
        if self.store.season(season_id).is_none() {
            return Err(CompetitionError::NotFound(format!("season {season_id}")));
        }

        let mut tallies: HashMap<PlayerId, TopScorer> = HashMap::new();
        for event in self.store.events_for_season(season_id) {
            if event.event_type != MatchEventType::Goal {
                continue;
            }
            let (Some(player_id), Some(player_name)) = (event.player_id, event.player_name) else {
                continue;
            };
            tallies
                .entry(player_id)
                .or_insert_with(|| TopScorer {
                    player_id,
                    player_name,
                    club_id: event.club_id,
                    goals: 0,
                })
                .goals += 1;
        }

        let mut scorers: Vec<TopScorer> = tallies.into_values().collect();
        scorers.sort_by(|a, b| {
            b.goals.cmp(&a.goals).then_with(|| a.player_name.cmp(&b.player_name))
        });
        scorers.truncate(limit);
        Ok(scorers)
    }
}

fn season_start(year: i32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 8, 1)
        .ok_or_else(|| CompetitionError::InvalidRequest(format!("invalid season year {year}")))
}

#[allow(clippy::too_many_arguments)]
fn new_fixture(
    season_id: SeasonId,
    round: u32,
    stage: Stage,
    group: Option<char>,
    knockout_round: Option<KnockoutRound>,
    home_club: ClubId,
    away_club: ClubId,
    match_date: NaiveDate,
) -> Fixture {
    Fixture {
        id: 0,
        season_id,
        round,
        stage,
        group,
        knockout_round,
        home_club,
        away_club,
        match_date,
        status: FixtureStatus::Scheduled,
        home_score: None,
        away_score: None,
    }
}
