//! Match data seam for live sessions.
//!
//! The coordinator never talks to the store directly; it loads and triggers
//! simulations through [`MatchSource`] so tests can count simulation calls
//! and the engine stays swappable.

use fc_core::{
    CompetitionError, FixtureId, MatchEventRow, MatchId, Orchestrator, TimelineEntry,
};

/// A fully simulated match as the live session needs it.
#[derive(Debug, Clone)]
pub struct LoadedMatch {
    pub match_id: MatchId,
    pub fixture_id: FixtureId,
    pub home_club: fc_core::ClubId,
    pub away_club: fc_core::ClubId,
    pub home_name: String,
    pub away_name: String,
    pub home_score: u8,
    pub away_score: u8,
    pub possession_home: u8,
    pub timeline: Vec<TimelineEntry>,
    pub events: Vec<MatchEventRow>,
}

pub trait MatchSource: Send + Sync + 'static {
    /// Load the simulated match for a fixture, if one exists.
    fn load_match(&self, fixture: FixtureId) -> Result<Option<LoadedMatch>, CompetitionError>;

    /// Trigger a simulation for the fixture. May fail with
    /// [`CompetitionError::FixtureAlreadySimulated`] when a concurrent caller
    /// won the race; the coordinator recovers from that by reloading.
    fn simulate(&self, fixture: FixtureId) -> Result<(), CompetitionError>;

    /// Persist a coach intervention as a match event for audit.
    fn record_coach_event(&self, row: MatchEventRow);
}

impl MatchSource for Orchestrator {
    fn load_match(&self, fixture: FixtureId) -> Result<Option<LoadedMatch>, CompetitionError> {
        let store = self.store();
        let Some(record) = store.match_for_fixture(fixture) else {
            return Ok(None);
        };
        let fixture_row = store
            .fixture(fixture)
            .ok_or_else(|| CompetitionError::NotFound(format!("fixture {fixture}")))?;

        let name_of = |club| -> Result<String, CompetitionError> {
            self.club_name(club)
                .ok_or_else(|| CompetitionError::NotFound(format!("club {club}")))
        };

        Ok(Some(LoadedMatch {
            match_id: record.id,
            fixture_id: fixture,
            home_club: fixture_row.home_club,
            away_club: fixture_row.away_club,
            home_name: name_of(fixture_row.home_club)?,
            away_name: name_of(fixture_row.away_club)?,
            home_score: record.home_score,
            away_score: record.away_score,
            possession_home: record.possession_home,
            timeline: store.timeline_for_match(record.id),
            events: store.events_for_match(record.id),
        }))
    }

    fn simulate(&self, fixture: FixtureId) -> Result<(), CompetitionError> {
        self.simulate_fixture(fixture).map(|_| ())
    }

    fn record_coach_event(&self, row: MatchEventRow) {
        self.store().append_match_event(row);
    }
}
