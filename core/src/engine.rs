//! The career engine: the single writer of a career.
//!
//! EXECUTION ORDER (fixed, documented, never reordered):
//!   On every tick (matchday advance or season rollover):
//!     1. Finance subsystem    (wages; Matchday ticks only)
//!     2. Scouting subsystem   (complete due reports)
//!     3. Transfer subsystem   (expiry, club answers, AI bids)
//!
//! RULES:
//!   - Every action runs on a working copy of the career. The copy is
//!     published as the new snapshot only after the action succeeded and
//!     its events were written to the store in one transaction.
//!   - A rejected action leaves the published career untouched.
//!   - Cached aggregates (standings, unread count) are re-derived from
//!     their logs before every publish.
//!   - All randomness flows through the career's RngBank.

use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    career::{Career, LiveMatch},
    command::{Command, CommandOutcome},
    config::CareerConfig,
    domain::{
        MatchEvent, MatchResult, OfferDecision, ScoutReport, SeasonStats, Tactics, TeamPair,
    },
    error::{CareerError, CareerResult},
    event::{CareerEvent, EventLogEntry},
    finance::FinanceSubsystem,
    rng::RngSlot,
    scouting::{self, ScoutingSubsystem},
    season,
    snapshot::CareerSnapshot,
    store::CareerStore,
    subsystem::{CareerSubsystem, TickKind},
    transfer_market::{self, TransferSubsystem},
    types::{ClubId, FixtureId, MessageId, Money, OfferId, PlayerId, SeasonIndex, Tick},
    world::WorldBuilder,
};

/// The state of the live match after an action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchProgress {
    pub fixture_id: FixtureId,
    pub minute:     u8,
    pub score:      TeamPair<u8>,
    /// Events of the minute just played (empty after kickoff).
    pub new_events: Vec<MatchEvent>,
    pub finished:   bool,
}

/// What an action closure may use besides the working copy.
struct Rules<'a> {
    config:     &'a CareerConfig,
    subsystems: &'a [Box<dyn CareerSubsystem>],
}

impl Rules<'_> {
    /// Run every subsystem for the tick the career has just moved to.
    fn tick(&self, career: &mut Career, kind: TickKind, events: &mut Vec<CareerEvent>) -> CareerResult<()> {
        let tick = career.calendar.tick;
        for subsystem in self.subsystems {
            let mut rng = career.rng.for_slot_at_tick(subsystem.slot(), tick);
            let new_events = subsystem.on_tick(career, self.config, kind, &mut rng)?;
            log::debug!(
                "season={} md={} tick={tick} {} ({} stream): {} events",
                career.calendar.season, career.calendar.matchday, subsystem.name(), subsystem.slot().name(),
                new_events.len(),
            );
            events.extend(new_events);
        }
        Ok(())
    }
}

pub struct CareerEngine {
    career:     Arc<Career>,
    config:     CareerConfig,
    store:      CareerStore,
    subsystems: Vec<Box<dyn CareerSubsystem>>,
}

impl CareerEngine {
    /// Wrap an existing career. `events` (usually from `Career::new`) are
    /// written to the log before the engine is returned.
    pub fn new(
        career: Career,
        events: Vec<CareerEvent>,
        config: CareerConfig,
        store: CareerStore,
    ) -> CareerResult<Self> {
        config.validate()?;
        store.migrate()?;
        let mut engine = Self {
            career: Arc::new(career),
            config,
            store,
            subsystems: Vec::new(),
        };

        // EXECUTION ORDER: fixed, documented, never reordered.
        engine.register(Box::new(FinanceSubsystem));
        engine.register(Box::new(ScoutingSubsystem));
        engine.register(Box::new(TransferSubsystem));

        let career = Arc::clone(&engine.career);
        engine.persist(&career, &events)?;
        Ok(engine)
    }

    /// Generate a league from `seed` and start a career managing `club_id`.
    pub fn new_career(
        config: CareerConfig,
        store: CareerStore,
        manager: &str,
        club_id: ClubId,
        seed: u64,
    ) -> CareerResult<Self> {
        let world = WorldBuilder::new(&config, seed).build()?;
        let career_id = uuid::Uuid::new_v4().to_string();
        let (career, events) =
            Career::new(career_id, manager, world.clubs, world.players, club_id, seed, &config)?;
        log::info!(
            "career {} started: {manager} at club {club_id}, seed {seed}",
            career.career_id()
        );
        Self::new(career, events, config, store)
    }

    /// A generated career on an in-memory store (used in tests and demos).
    pub fn in_memory(config: CareerConfig, club_id: ClubId, seed: u64) -> CareerResult<Self> {
        Self::new_career(config, CareerStore::in_memory()?, "Manager", club_id, seed)
    }

    /// Resume a saved career.
    pub fn load(config: CareerConfig, store: CareerStore, save_id: &str) -> CareerResult<Self> {
        store.migrate()?;
        let doc = store.load_document(save_id)?;
        log::info!(
            "season={} md={} loaded save '{save_id}'",
            doc.career.season(), doc.career.matchday()
        );
        Self::new(doc.career, Vec::new(), config, store)
    }

    /// Register a subsystem. Call in the documented execution order.
    pub fn register(&mut self, subsystem: Box<dyn CareerSubsystem>) {
        self.subsystems.push(subsystem);
    }

    // ── Read access ────────────────────────────────────────────────

    /// The current snapshot. Cheap: an Arc clone.
    pub fn snapshot(&self) -> CareerSnapshot {
        Arc::clone(&self.career)
    }

    pub fn career(&self) -> &Career {
        &self.career
    }

    pub fn config(&self) -> &CareerConfig {
        &self.config
    }

    pub fn store(&self) -> &CareerStore {
        &self.store
    }

    /// Standings of the current season (`None`) or of an archived one.
    pub fn get_standings(&self, season: Option<SeasonIndex>) -> CareerResult<Vec<SeasonStats>> {
        self.career.standings_for(season)
    }

    /// Query logged events for one tick. Used by the determinism tests.
    pub fn events_for_tick(&self, tick: Tick) -> CareerResult<Vec<EventLogEntry>> {
        self.store.events_for_tick(self.career.career_id(), tick)
    }

    // ── Persistence ────────────────────────────────────────────────

    /// Write the current career to a save slot; a fresh id when none given.
    pub fn save(&self, save_id: Option<&str>) -> CareerResult<String> {
        let save_id = save_id
            .map(str::to_string)
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        self.store.save_career(&save_id, &self.career)?;
        log::info!(
            "season={} md={} saved to '{save_id}'",
            self.career.season(), self.career.matchday()
        );
        Ok(save_id)
    }

    // ── Matches ────────────────────────────────────────────────────

    /// Kick off a fixture of the current matchday for live play.
    pub fn start_match(&mut self, fixture_id: FixtureId, seed: Option<u64>) -> CareerResult<MatchProgress> {
        self.commit("start_match", |career, rules, events| {
            if let Some(live) = &career.live_match {
                return Err(CareerError::AlreadyInProgress { fixture_id: live.fixture_id });
            }
            let fixture = season::playable_fixture(career, fixture_id)?;
            let seed = seed.unwrap_or_else(|| season::fixture_seed(career, fixture_id));
            let simulation = season::kick_off(career, fixture, seed, rules.config)?;
            let (home, away) = (fixture.home, fixture.away);
            career.live_match = Some(LiveMatch { fixture_id, home, away, simulation });
            events.push(CareerEvent::MatchStarted { fixture_id, seed });
            log::info!(
                "season={} md={} match: kickoff fixture {fixture_id} (seed={seed})",
                career.calendar.season, career.calendar.matchday,
            );
            Ok(progress(career, Vec::new()))
        })
    }

    /// Play one minute of the live match. A finished match is left as is.
    pub fn advance_match_minute(&mut self) -> CareerResult<MatchProgress> {
        self.commit("advance_match_minute", |career, rules, _events| {
            let live = career.live_match.as_mut().ok_or(CareerError::NoMatchInProgress)?;
            let new_events = live.simulation.step(&rules.config.match_engine).to_vec();
            Ok(progress(career, new_events))
        })
    }

    /// Play the live match through to full time.
    pub fn advance_match_to_full_time(&mut self) -> CareerResult<MatchProgress> {
        self.commit("advance_match_to_full_time", |career, rules, _events| {
            let live = career.live_match.as_mut().ok_or(CareerError::NoMatchInProgress)?;
            live.simulation.run_to_end(&rules.config.match_engine);
            Ok(progress(career, Vec::new()))
        })
    }

    /// Commit the finished live match.
    pub fn complete_match(&mut self) -> CareerResult<CareerSnapshot> {
        self.commit("complete_match", |career, rules, events| {
            let live = career.live_match.as_ref().ok_or(CareerError::NoMatchInProgress)?;
            let result = live.simulation.result()?;
            let fixture_id = live.fixture_id;
            career.live_match = None;
            season::commit_result(career, fixture_id, result, rules.config, events)
        })?;
        Ok(self.snapshot())
    }

    /// Play every unplayed fixture of the current matchday.
    ///
    /// Fixtures are simulated in parallel and committed in fixture order,
    /// so the outcome does not depend on thread scheduling.
    pub fn simulate_matchday(&mut self) -> CareerResult<CareerSnapshot> {
        self.commit("simulate_matchday", |career, rules, events| {
            if let Some(live) = &career.live_match {
                return Err(CareerError::AlreadyInProgress { fixture_id: live.fixture_id });
            }
            let matchday = career.calendar.matchday;
            let snapshot: &Career = career;
            let results: Vec<(FixtureId, MatchResult)> = snapshot
                .fixtures
                .par_iter()
                .filter(|f| f.matchday == matchday && !f.is_played())
                .map(|fixture| {
                    let seed = season::fixture_seed(snapshot, fixture.id);
                    let mut sim = season::kick_off(snapshot, fixture, seed, rules.config)?;
                    sim.run_to_end(&rules.config.match_engine);
                    Ok((fixture.id, sim.result()?))
                })
                .collect::<CareerResult<_>>()?;

            for (fixture_id, result) in results {
                season::commit_result(career, fixture_id, result, rules.config, events)?;
            }
            Ok(())
        })?;
        Ok(self.snapshot())
    }

    /// Change the managed club's tactics.
    pub fn set_tactics(&mut self, tactics: Tactics) -> CareerResult<CareerSnapshot> {
        self.commit("set_tactics", |career, _rules, events| {
            if let Some(live) = &career.live_match {
                if live.home == career.club_id || live.away == career.club_id {
                    return Err(CareerError::AlreadyInProgress { fixture_id: live.fixture_id });
                }
            }
            let club_id = career.club_id;
            career.club_mut(club_id)?.tactics = tactics;
            events.push(CareerEvent::TacticsChanged { club_id });
            Ok(())
        })?;
        Ok(self.snapshot())
    }

    // ── Calendar ───────────────────────────────────────────────────

    /// Move to the next matchday and run the tick subsystems.
    pub fn advance_matchday(&mut self) -> CareerResult<CareerSnapshot> {
        self.commit("advance_matchday", |career, rules, events| {
            season::advance_matchday(career, events)?;
            rules.tick(career, TickKind::Matchday, events)
        })?;
        Ok(self.snapshot())
    }

    /// Archive the finished season and start the next one.
    pub fn advance_season(&mut self) -> CareerResult<CareerSnapshot> {
        self.commit("advance_season", |career, rules, events| {
            let mut rng = career.rng.for_slot_at_tick(RngSlot::Season, career.calendar.tick + 1);
            season::close_season(career, rules.config, &mut rng, events)?;
            rules.tick(career, TickKind::SeasonRollover, events)
        })?;
        Ok(self.snapshot())
    }

    // ── Transfers and scouting ─────────────────────────────────────

    pub fn respond_to_offer(&mut self, offer_id: OfferId, decision: OfferDecision) -> CareerResult<CareerSnapshot> {
        self.commit("respond_to_offer", |career, rules, events| {
            ensure_no_live_match(career)?;
            transfer_market::respond(career, offer_id, decision, rules.config, events)
        })?;
        Ok(self.snapshot())
    }

    /// Register another club's bid for one of the manager's players.
    pub fn receive_offer(&mut self, player_id: PlayerId, from_club: ClubId, fee: Money) -> CareerResult<OfferId> {
        self.commit("receive_offer", |career, _rules, events| {
            ensure_no_live_match(career)?;
            transfer_market::receive_offer(career, player_id, from_club, fee, events)
        })
    }

    /// Bid for another club's player.
    pub fn make_offer(&mut self, player_id: PlayerId, fee: Money) -> CareerResult<OfferId> {
        self.commit("make_offer", |career, _rules, events| {
            ensure_no_live_match(career)?;
            transfer_market::make_offer(career, player_id, fee, events)
        })
    }

    pub fn commission_scout(&mut self, player_id: PlayerId, delay: u32) -> CareerResult<ScoutReport> {
        self.commit("commission_scout", |career, rules, events| {
            let id = scouting::commission(career, player_id, delay, rules.config, events)?;
            career
                .scout_report(id)
                .cloned()
                .ok_or_else(|| CareerError::InvalidInput(format!("report {id} was not recorded")))
        })
    }

    // ── Inbox ──────────────────────────────────────────────────────

    pub fn mark_message_read(&mut self, message_id: MessageId) -> CareerResult<CareerSnapshot> {
        self.commit("mark_message_read", |career, _rules, events| {
            career.inbox.mark_read(message_id)?;
            events.push(CareerEvent::MessageRead { message_id });
            Ok(())
        })?;
        Ok(self.snapshot())
    }

    // ── Command dispatch ───────────────────────────────────────────

    /// Apply a serialized host command.
    pub fn dispatch(&mut self, command: Command) -> CareerResult<CommandOutcome> {
        let minute = |p: MatchProgress| CommandOutcome::MatchMinute {
            fixture_id: p.fixture_id,
            minute:     p.minute,
            home_goals: p.score.home,
            away_goals: p.score.away,
        };
        Ok(match command {
            Command::StartMatch { fixture_id, seed } => minute(self.start_match(fixture_id, seed)?),
            Command::AdvanceMatchMinute => minute(self.advance_match_minute()?),
            Command::AdvanceMatchToFullTime => minute(self.advance_match_to_full_time()?),
            Command::CompleteMatch => {
                self.complete_match()?;
                CommandOutcome::Done
            }
            Command::SimulateMatchday => {
                self.simulate_matchday()?;
                CommandOutcome::Done
            }
            Command::SetTactics { tactics } => {
                self.set_tactics(tactics)?;
                CommandOutcome::Done
            }
            Command::AdvanceMatchday => {
                self.advance_matchday()?;
                CommandOutcome::Done
            }
            Command::AdvanceSeason => {
                self.advance_season()?;
                CommandOutcome::Done
            }
            Command::GetStandings { season } => CommandOutcome::Standings { table: self.get_standings(season)? },
            Command::RespondToOffer { offer_id, decision } => {
                self.respond_to_offer(offer_id, decision)?;
                CommandOutcome::Done
            }
            Command::MakeOffer { player_id, fee } => CommandOutcome::OfferCreated {
                offer_id: self.make_offer(player_id, fee)?,
            },
            Command::CommissionScout { player_id, delay } => CommandOutcome::ScoutCommissioned {
                report_id: self.commission_scout(player_id, delay)?.id,
            },
            Command::MarkMessageRead { message_id } => {
                self.mark_message_read(message_id)?;
                CommandOutcome::Done
            }
            Command::ReceiveOffer { player_id, from_club, fee } => CommandOutcome::OfferCreated {
                offer_id: self.receive_offer(player_id, from_club, fee)?,
            },
        })
    }

    // ── Internals ──────────────────────────────────────────────────

    /// Run `action` on a working copy and publish it only on success.
    fn commit<T>(
        &mut self,
        name: &str,
        action: impl FnOnce(&mut Career, &Rules<'_>, &mut Vec<CareerEvent>) -> CareerResult<T>,
    ) -> CareerResult<T> {
        let mut working = Career::clone(&self.career);
        let mut events = Vec::new();
        let rules = Rules { config: &self.config, subsystems: &self.subsystems };

        let out = match action(&mut working, &rules, &mut events) {
            Ok(out) => out,
            Err(e) => {
                log::warn!(
                    "season={} md={} {name} rejected: {e}",
                    self.career.season(), self.career.matchday()
                );
                return Err(e);
            }
        };
        working.refresh_caches(&self.config);
        self.persist(&working, &events)?;
        self.career = Arc::new(working);
        Ok(out)
    }

    fn persist(&self, career: &Career, events: &[CareerEvent]) -> CareerResult<()> {
        if events.is_empty() {
            return Ok(());
        }
        let entries = events
            .iter()
            .map(|event| {
                Ok(EventLogEntry {
                    id:         None,
                    career_id:  career.career_id().to_string(),
                    tick:       career.calendar.tick,
                    season:     career.calendar.season,
                    matchday:   career.calendar.matchday,
                    event_type: event.type_name().to_string(),
                    payload:    serde_json::to_string(event)?,
                })
            })
            .collect::<CareerResult<Vec<_>>>()?;
        self.store.append_events(&entries)
    }
}

fn ensure_no_live_match(career: &Career) -> CareerResult<()> {
    match &career.live_match {
        Some(live) => Err(CareerError::AlreadyInProgress { fixture_id: live.fixture_id }),
        None => Ok(()),
    }
}

fn progress(career: &Career, new_events: Vec<MatchEvent>) -> MatchProgress {
    match &career.live_match {
        Some(live) => MatchProgress {
            fixture_id: live.fixture_id,
            minute:     live.simulation.current_minute(),
            score:      live.simulation.score(),
            new_events,
            finished:   live.simulation.is_finished(),
        },
        None => MatchProgress {
            fixture_id: 0,
            minute:     0,
            score:      TeamPair::default(),
            new_events,
            finished:   false,
        },
    }
}
