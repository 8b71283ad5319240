//! In-memory competition store.
//!
//! Persistence mechanics are out of scope; this store keeps every entity
//! behind a single `RwLock` and hands out clones. The one write lock also
//! gives standings mutations their required per-scope exclusivity: a result
//! application plus position recompute runs as one locked unit via
//! [`CompetitionStore::update_standings_scope`].

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};

use crate::engine::SimulatedMatch;
use crate::error::{CompetitionError, Result};
use crate::models::{
    CompetitionId, Fixture, FixtureId, FixtureStatus, MatchEventRow, MatchEventType, MatchId,
    MatchRecord, PlayerRatingRow, Season, SeasonId, Stage, Standing, TimelineEntry,
};

#[derive(Default)]
struct StoreInner {
    next_id: u64,
    seasons: HashMap<SeasonId, Season>,
    fixtures: HashMap<FixtureId, Fixture>,
    standings: HashMap<u64, Standing>,
    /// Keyed by fixture id: at most one match per fixture, overwritten on
    /// re-simulation.
    matches: HashMap<FixtureId, MatchRecord>,
    events: HashMap<MatchId, Vec<MatchEventRow>>,
    timelines: HashMap<MatchId, Vec<TimelineEntry>>,
    ratings: HashMap<MatchId, Vec<PlayerRatingRow>>,
}

impl StoreInner {
    fn alloc_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct CompetitionStore {
    inner: RwLock<StoreInner>,
}

impl CompetitionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, StoreInner> {
        self.inner.read().expect("competition store lock poisoned")
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, StoreInner> {
        self.inner.write().expect("competition store lock poisoned")
    }

    // ------------------------------------------------------------------
    // Seasons
    // ------------------------------------------------------------------

    pub fn insert_season(&self, competition_id: CompetitionId, year: i32) -> Season {
        let mut inner = self.write();
        let season = Season {
            id: inner.alloc_id(),
            competition_id,
            year,
            current_round: 1,
            status: crate::models::SeasonStatus::Ongoing,
        };
        inner.seasons.insert(season.id, season.clone());
        season
    }

    pub fn season(&self, id: SeasonId) -> Option<Season> {
        self.read().seasons.get(&id).cloned()
    }

    pub fn season_by_key(&self, competition_id: CompetitionId, year: i32) -> Option<Season> {
        self.read()
            .seasons
            .values()
            .find(|s| s.competition_id == competition_id && s.year == year)
            .cloned()
    }

    pub fn update_season(&self, season: Season) {
        self.write().seasons.insert(season.id, season);
    }

    // ------------------------------------------------------------------
    // Fixtures
    // ------------------------------------------------------------------

    pub fn insert_fixture(&self, mut fixture: Fixture) -> Fixture {
        let mut inner = self.write();
        fixture.id = inner.alloc_id();
        inner.fixtures.insert(fixture.id, fixture.clone());
        fixture
    }

    pub fn fixture(&self, id: FixtureId) -> Option<Fixture> {
        self.read().fixtures.get(&id).cloned()
    }

    /// Fixtures of a season ordered by (date, id), optionally filtered.
    pub fn fixtures_for_season(
        &self,
        season_id: SeasonId,
        round: Option<u32>,
        stage: Option<Stage>,
    ) -> Vec<Fixture> {
        let inner = self.read();
        let mut fixtures: Vec<Fixture> = inner
            .fixtures
            .values()
            .filter(|f| f.season_id == season_id)
            .filter(|f| round.map_or(true, |r| f.round == r))
            .filter(|f| stage.map_or(true, |s| f.stage == s))
            .cloned()
            .collect();
        fixtures.sort_by_key(|f| (f.match_date, f.id));
        fixtures
    }

    pub fn max_round(&self, season_id: SeasonId) -> u32 {
        self.read()
            .fixtures
            .values()
            .filter(|f| f.season_id == season_id)
            .map(|f| f.round)
            .max()
            .unwrap_or(0)
    }

    pub fn has_scheduled_fixtures(&self, season_id: SeasonId) -> bool {
        self.read()
            .fixtures
            .values()
            .any(|f| f.season_id == season_id && f.status == FixtureStatus::Scheduled)
    }

    // ------------------------------------------------------------------
    // Match results
    // ------------------------------------------------------------------

    /// Atomically transition a fixture to played and write the match record
    /// with all of its child rows, replacing any stale rows for the same
    /// fixture. Fails without writes if the fixture is missing or already
    /// played, which is what makes a lost simulation race observable.
    pub fn commit_simulation(
        &self,
        fixture_id: FixtureId,
        outcome: &SimulatedMatch,
        simulated_at: DateTime<Utc>,
    ) -> Result<MatchId> {
        let mut inner = self.write();

        let fixture = inner
            .fixtures
            .get(&fixture_id)
            .cloned()
            .ok_or_else(|| CompetitionError::NotFound(format!("fixture {fixture_id}")))?;
        if fixture.status == FixtureStatus::Played {
            return Err(CompetitionError::FixtureAlreadySimulated(fixture_id));
        }

        let match_id = match inner.matches.get(&fixture_id) {
            Some(existing) => existing.id,
            None => inner.alloc_id(),
        };

        let record = MatchRecord {
            id: match_id,
            fixture_id,
            home_score: outcome.home_score,
            away_score: outcome.away_score,
            possession_home: outcome.possession_home,
            shots_home: outcome.shots_home,
            shots_away: outcome.shots_away,
            simulated_at,
        };
        inner.matches.insert(fixture_id, record);

        let events = outcome
            .events
            .iter()
            .map(|sim| {
                let club_id = match sim.event.side {
                    crate::engine::Side::Home => fixture.home_club,
                    crate::engine::Side::Away => fixture.away_club,
                };
                let event_type = event_type_of(&sim.event.kind);
                let player = actor_of(&sim.event.kind);
                MatchEventRow {
                    match_id,
                    minute: sim.event.minute,
                    event_type,
                    club_id,
                    player_id: player.as_ref().map(|p| p.id),
                    player_name: player.map(|p| p.name),
                    description: sim.description.clone(),
                }
            })
            .collect();
        inner.events.insert(match_id, events);

        let timeline = outcome
            .timeline
            .iter()
            .map(|row| TimelineEntry {
                match_id,
                minute: row.minute,
                home_score: row.home_score,
                away_score: row.away_score,
                commentary: row.commentary.clone(),
            })
            .collect();
        inner.timelines.insert(match_id, timeline);

        let ratings = outcome
            .ratings
            .iter()
            .map(|r| PlayerRatingRow {
                match_id,
                player_id: r.player_id,
                club_id: r.club_id,
                rating: r.rating,
            })
            .collect();
        inner.ratings.insert(match_id, ratings);

        let stored = inner
            .fixtures
            .get_mut(&fixture_id)
            .ok_or_else(|| CompetitionError::NotFound(format!("fixture {fixture_id}")))?;
        stored.status = FixtureStatus::Played;
        stored.home_score = Some(outcome.home_score);
        stored.away_score = Some(outcome.away_score);

        Ok(match_id)
    }

    pub fn match_for_fixture(&self, fixture_id: FixtureId) -> Option<MatchRecord> {
        self.read().matches.get(&fixture_id).cloned()
    }

    pub fn events_for_match(&self, match_id: MatchId) -> Vec<MatchEventRow> {
        self.read().events.get(&match_id).cloned().unwrap_or_default()
    }

    pub fn timeline_for_match(&self, match_id: MatchId) -> Vec<TimelineEntry> {
        self.read().timelines.get(&match_id).cloned().unwrap_or_default()
    }

    pub fn ratings_for_match(&self, match_id: MatchId) -> Vec<PlayerRatingRow> {
        self.read().ratings.get(&match_id).cloned().unwrap_or_default()
    }

    /// Audit trail for live-session coach interventions.
    pub fn append_match_event(&self, row: MatchEventRow) {
        self.write().events.entry(row.match_id).or_default().push(row);
    }

    /// All events of all played fixtures in a season, for aggregations such
    /// as the top-scorer table.
    pub fn events_for_season(&self, season_id: SeasonId) -> Vec<MatchEventRow> {
        let inner = self.read();
        let mut rows = Vec::new();
        for record in inner.matches.values() {
            let Some(fixture) = inner.fixtures.get(&record.fixture_id) else {
                continue;
            };
            if fixture.season_id != season_id {
                continue;
            }
            if let Some(events) = inner.events.get(&record.id) {
                rows.extend(events.iter().cloned());
            }
        }
        rows
    }

    // ------------------------------------------------------------------
    // Standings
    // ------------------------------------------------------------------

    pub fn insert_standing(&self, mut standing: Standing) -> Standing {
        let mut inner = self.write();
        standing.id = inner.alloc_id();
        inner.standings.insert(standing.id, standing.clone());
        standing
    }

    pub fn standings_for_season(&self, season_id: SeasonId) -> Vec<Standing> {
        let inner = self.read();
        let mut rows: Vec<Standing> =
            inner.standings.values().filter(|s| s.season_id == season_id).cloned().collect();
        rows.sort_by_key(|s| (s.stage, s.group, s.position));
        rows
    }

    /// Run `apply` against every standing row of one (season, stage, group)
    /// scope under the write lock, then persist the mutated rows. This is
    /// the serialization point that keeps concurrent result applications
    /// from interleaving partial writes.
    pub fn update_standings_scope(
        &self,
        season_id: SeasonId,
        stage: Stage,
        group: Option<char>,
        apply: impl FnOnce(&mut [Standing]) -> Result<()>,
    ) -> Result<()> {
        let mut inner = self.write();
        let mut rows: Vec<Standing> = inner
            .standings
            .values()
            .filter(|s| s.season_id == season_id && s.stage == stage && s.group == group)
            .cloned()
            .collect();
        rows.sort_by_key(|s| s.id);

        apply(&mut rows)?;

        for row in rows {
            inner.standings.insert(row.id, row);
        }
        Ok(())
    }
}

fn event_type_of(kind: &crate::engine::MinuteEventKind) -> MatchEventType {
    use crate::engine::MinuteEventKind as K;
    match kind {
        K::Goal { .. } => MatchEventType::Goal,
        K::YellowCard { .. } => MatchEventType::YellowCard,
        K::RedCard { .. } => MatchEventType::RedCard,
        K::Injury { .. } => MatchEventType::Injury,
        K::Substitution { .. } => MatchEventType::Substitution,
        K::TacticalChange => MatchEventType::TacticalChange,
    }
}

fn actor_of(kind: &crate::engine::MinuteEventKind) -> Option<crate::models::PlayerInfo> {
    use crate::engine::MinuteEventKind as K;
    match kind {
        K::Goal { scorer } => scorer.clone(),
        K::YellowCard { player }
        | K::RedCard { player }
        | K::Injury { player }
        | K::Substitution { player } => player.clone(),
        K::TacticalChange => None,
    }
}
