//! The Career aggregate: the single owned root of a playthrough.
//!
//! RULES:
//!   - Every entity is reached through the Career; cross-references are ids.
//!   - Only engine actions mutate a Career, and only on a working copy.
//!   - `standings` and the inbox unread count are caches. They are rebuilt
//!     by `refresh_caches()` at the end of every committed action.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::{
    clock::SeasonCalendar,
    config::CareerConfig,
    domain::{
        Club, Fixture, ManagerProfile, MessageKind, Player, Priority, ResultEntry, ScoutReport,
        SeasonRecord, SeasonStats, TransferOffer,
    },
    error::{CareerError, CareerResult},
    event::CareerEvent,
    inbox::{Draft, Inbox},
    league_table::{compute_standings, PointsSystem},
    match_engine::MatchSimulation,
    rng::RngBank,
    scheduler::{generate_fixtures, matchdays_for},
    types::{ClubId, FixtureId, Matchday, Money, OfferId, PlayerId, ReportId, SeasonIndex},
};

/// The match currently being played live, if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveMatch {
    pub fixture_id: FixtureId,
    pub home:       ClubId,
    pub away:       ClubId,
    pub simulation: MatchSimulation,
}

/// Monotonic id counters. Ids are never reused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdAllocator {
    pub next_fixture: FixtureId,
    pub next_offer:   OfferId,
    pub next_report:  ReportId,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self { next_fixture: 1, next_offer: 1, next_report: 1 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Career {
    pub(crate) career_id:     String,
    pub(crate) manager:       ManagerProfile,
    pub(crate) club_id:       ClubId,
    pub(crate) rng:           RngBank,
    pub(crate) calendar:      SeasonCalendar,
    pub(crate) clubs:         Vec<Club>,
    pub(crate) players:       BTreeMap<PlayerId, Player>,
    pub(crate) fixtures:      Vec<Fixture>,
    pub(crate) results:       Vec<ResultEntry>,
    pub(crate) standings:     Vec<SeasonStats>,
    pub(crate) history:       Vec<SeasonRecord>,
    pub(crate) offers:        Vec<TransferOffer>,
    pub(crate) scout_reports: Vec<ScoutReport>,
    pub(crate) inbox:         Inbox,
    pub(crate) live_match:    Option<LiveMatch>,
    pub(crate) board_target:  u32,
    pub(crate) ids:           IdAllocator,
}

impl Career {
    /// Build a career from an explicit league.
    ///
    /// Club and player ids must be unique, every player must belong to a
    /// listed club and `club_id` must be one of them. Fixtures for the first
    /// season are generated in the given club order.
    pub fn new(
        career_id: impl Into<String>,
        manager_name: impl Into<String>,
        clubs: Vec<Club>,
        players: Vec<Player>,
        club_id: ClubId,
        seed: u64,
        config: &CareerConfig,
    ) -> CareerResult<(Self, Vec<CareerEvent>)> {
        if clubs.len() < 2 {
            return Err(CareerError::InvalidInput("a league needs at least two clubs".into()));
        }
        let mut seen = HashSet::new();
        for club in &clubs {
            if !seen.insert(club.id) {
                return Err(CareerError::InvalidInput(format!("duplicate club id {}", club.id)));
            }
        }
        if !seen.contains(&club_id) {
            return Err(CareerError::ClubNotFound(club_id));
        }

        let mut by_id = BTreeMap::new();
        for p in players {
            if !seen.contains(&p.club_id) {
                return Err(CareerError::ClubNotFound(p.club_id));
            }
            let id = p.id;
            if by_id.insert(id, p).is_some() {
                return Err(CareerError::InvalidInput(format!("duplicate player id {id}")));
            }
        }

        let league = &config.league;
        let season = league.first_season;
        let order: Vec<ClubId> = clubs.iter().map(|c| c.id).collect();
        let fixtures = generate_fixtures(&order, season, 1);
        let calendar = SeasonCalendar::new(
            season,
            matchdays_for(clubs.len()),
            league.season_start_month,
            league.season_start_day,
            league.days_between_matchdays,
        )?;

        let mut career = Self {
            career_id: career_id.into(),
            manager: ManagerProfile { name: manager_name.into(), reputation: 50 },
            club_id,
            rng: RngBank::new(seed),
            calendar,
            clubs,
            players: by_id,
            ids: IdAllocator { next_fixture: fixtures.len() as FixtureId + 1, ..Default::default() },
            fixtures,
            results: Vec::new(),
            standings: Vec::new(),
            history: Vec::new(),
            offers: Vec::new(),
            scout_reports: Vec::new(),
            inbox: Inbox::default(),
            live_match: None,
            board_target: 0,
        };
        career.manager.reputation = career.managed_club()?.reputation.clamp(1, 100);
        career.board_target = career.expected_position();

        let club_name = career.managed_club()?.name.clone();
        let target = career.board_target;
        career.post(
            Draft::new(MessageKind::Board, Priority::High, "The Board", format!("Welcome to {club_name}"))
                .body(format!("The board expects a finish of {} or better this season.", ordinal(target))),
        );
        career.refresh_caches(config);

        let events = vec![CareerEvent::CareerStarted { seed, club_id, season }];
        Ok((career, events))
    }

    // ── Read access ────────────────────────────────────────────────

    pub fn career_id(&self) -> &str {
        &self.career_id
    }

    pub fn manager(&self) -> &ManagerProfile {
        &self.manager
    }

    pub fn seed(&self) -> u64 {
        self.rng.master_seed()
    }

    pub fn calendar(&self) -> &SeasonCalendar {
        &self.calendar
    }

    pub fn season(&self) -> SeasonIndex {
        self.calendar.season
    }

    pub fn matchday(&self) -> Matchday {
        self.calendar.matchday
    }

    pub fn club_id(&self) -> ClubId {
        self.club_id
    }

    pub fn clubs(&self) -> &[Club] {
        &self.clubs
    }

    pub fn club(&self, id: ClubId) -> CareerResult<&Club> {
        self.clubs.iter().find(|c| c.id == id).ok_or(CareerError::ClubNotFound(id))
    }

    pub fn managed_club(&self) -> CareerResult<&Club> {
        self.club(self.club_id)
    }

    pub fn finances(&self) -> Money {
        self.managed_club().map(|c| c.balance).unwrap_or_default()
    }

    pub fn player(&self, id: PlayerId) -> CareerResult<&Player> {
        self.players.get(&id).ok_or(CareerError::PlayerNotFound(id))
    }

    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    /// Players of a club, in id order.
    pub fn squad_of(&self, club_id: ClubId) -> Vec<&Player> {
        self.players.values().filter(|p| p.club_id == club_id).collect()
    }

    /// The manager's squad, in id order.
    pub fn squad(&self) -> Vec<&Player> {
        self.squad_of(self.club_id)
    }

    pub fn fixtures(&self) -> &[Fixture] {
        &self.fixtures
    }

    pub fn fixture(&self, id: FixtureId) -> CareerResult<&Fixture> {
        self.fixtures.iter().find(|f| f.id == id).ok_or(CareerError::FixtureNotFound(id))
    }

    pub fn fixtures_for_matchday(&self, matchday: Matchday) -> Vec<&Fixture> {
        self.fixtures.iter().filter(|f| f.matchday == matchday).collect()
    }

    /// The manager's fixture on the current matchday, if the club plays.
    pub fn next_fixture(&self) -> Option<&Fixture> {
        self.fixtures
            .iter()
            .find(|f| f.matchday == self.calendar.matchday && f.involves(self.club_id))
    }

    pub fn unplayed_in_matchday(&self, matchday: Matchday) -> usize {
        self.fixtures.iter().filter(|f| f.matchday == matchday && !f.is_played()).count()
    }

    pub fn unplayed_in_season(&self) -> usize {
        self.fixtures.iter().filter(|f| !f.is_played()).count()
    }

    pub fn results(&self) -> &[ResultEntry] {
        &self.results
    }

    /// Cached standings of the current season.
    pub fn standings(&self) -> &[SeasonStats] {
        &self.standings
    }

    /// Standings of the current season, or of an archived one.
    pub fn standings_for(&self, season: Option<SeasonIndex>) -> CareerResult<Vec<SeasonStats>> {
        match season {
            None => Ok(self.standings.clone()),
            Some(s) if s == self.calendar.season => Ok(self.standings.clone()),
            Some(s) => self
                .history
                .iter()
                .find(|r| r.season == s)
                .map(|r| r.standings.clone())
                .ok_or(CareerError::SeasonNotFound(s)),
        }
    }

    pub fn history(&self) -> &[SeasonRecord] {
        &self.history
    }

    pub fn offers(&self) -> &[TransferOffer] {
        &self.offers
    }

    pub fn offer(&self, id: OfferId) -> CareerResult<&TransferOffer> {
        self.offers.iter().find(|o| o.id == id).ok_or(CareerError::OfferNotFound(id))
    }

    pub fn scout_reports(&self) -> &[ScoutReport] {
        &self.scout_reports
    }

    pub fn scout_report(&self, id: ReportId) -> Option<&ScoutReport> {
        self.scout_reports.iter().find(|r| r.id == id)
    }

    pub fn inbox(&self) -> &Inbox {
        &self.inbox
    }

    pub fn unread_count(&self) -> usize {
        self.inbox.unread_count()
    }

    pub fn live_match(&self) -> Option<&LiveMatch> {
        self.live_match.as_ref()
    }

    pub fn board_target(&self) -> u32 {
        self.board_target
    }

    // ── Crate-internal mutation helpers ────────────────────────────

    pub(crate) fn club_mut(&mut self, id: ClubId) -> CareerResult<&mut Club> {
        self.clubs.iter_mut().find(|c| c.id == id).ok_or(CareerError::ClubNotFound(id))
    }

    pub(crate) fn player_mut(&mut self, id: PlayerId) -> CareerResult<&mut Player> {
        self.players.get_mut(&id).ok_or(CareerError::PlayerNotFound(id))
    }

    pub(crate) fn adjust_balance(&mut self, club_id: ClubId, delta: Money) -> CareerResult<()> {
        let club = self.club_mut(club_id)?;
        club.balance += delta;
        Ok(())
    }

    /// Append a message stamped with the current season, matchday and date.
    pub(crate) fn post(&mut self, draft: Draft) {
        let date = self.calendar.current_date();
        self.inbox.push(draft, self.calendar.season, self.calendar.matchday, date);
    }

    /// Position the board expects: the club's reputation rank in the league.
    pub(crate) fn expected_position(&self) -> u32 {
        let own = self.clubs.iter().find(|c| c.id == self.club_id).map(|c| c.reputation).unwrap_or(0);
        self.clubs.iter().filter(|c| c.reputation > own).count() as u32 + 1
    }

    /// Replace the fixture list with a fresh season calendar.
    pub(crate) fn schedule_season(&mut self, order: &[ClubId]) {
        let fixtures = generate_fixtures(order, self.calendar.season, self.ids.next_fixture);
        self.ids.next_fixture += fixtures.len() as FixtureId;
        self.calendar.total_matchdays = matchdays_for(order.len());
        self.fixtures = fixtures;
        self.results.clear();
    }

    /// Re-derive every cached aggregate from its authoritative log.
    pub(crate) fn refresh_caches(&mut self, config: &CareerConfig) {
        self.standings = compute_standings(&self.results, &self.clubs, PointsSystem::from(&config.league));
        self.inbox.recount();
    }
}

pub(crate) fn ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (1, 11) | (2, 12) | (3, 13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

pub(crate) fn format_money(amount: Money) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    let abs = amount.unsigned_abs();
    if abs >= 1_000_000 {
        format!("{sign}€{:.1}m", abs as f64 / 1_000_000.0)
    } else if abs >= 1_000 {
        format!("{sign}€{}k", abs / 1_000)
    } else {
        format!("{sign}€{abs}")
    }
}
