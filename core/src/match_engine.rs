//! Match simulation: minute-by-minute evaluation of one fixture.
//!
//! RULES:
//!   - All randomness comes from the SimRng seeded at kickoff.
//!   - Each minute evaluates Home before Away, in a fixed draw order.
//!   - `run_to_end` is exactly `step` repeated, so a match stepped live and
//!     a match run in one call produce identical results for the same seed.
//!   - Strengths are recomputed every minute from the players on the pitch.
//!
//! The simulation has no side effects. Nothing reaches the career until
//! the engine commits the finished MatchResult.

use serde::{Deserialize, Serialize};

use crate::{
    config::{MatchConfig, MentalityModifier, PressingModifier, TempoModifier},
    domain::{
        Club, MatchEvent, MatchEventKind, MatchResult, MatchStats, Mentality, Player, Position,
        Pressing, Side, Tactics, TeamPair, Tempo,
    },
    error::{CareerError, CareerResult},
    rng::SimRng,
    types::{ClubId, PlayerId},
};

pub const FULL_TIME: u8 = 90;
const FULL_SIDE: f64 = 11.0;
const MIN_ON_PITCH: usize = 7;

/// One club's input to a match.
#[derive(Debug, Clone, Copy)]
pub struct MatchSide<'a> {
    pub club:    &'a Club,
    pub squad:   &'a [Player],
    pub tactics: Tactics,
}

/// The players a club sends out, and what has happened to them so far.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamSheet {
    pub club_id:       ClubId,
    pub tactics:       Tactics,
    pub starting:      Vec<PlayerId>,
    pub on_pitch:      Vec<Player>,
    pub bench:         Vec<Player>,
    pub booked:        Vec<PlayerId>,
    pub substitutions: u8,
}

/// Effective strengths of one side for one minute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SideStrength {
    pub attack:  f64,
    pub defense: f64,
    pub control: f64,
}

/// Pick the eleven and the bench from a squad.
///
/// Best eligible goalkeeper plus the ten best eligible outfield players by
/// positional rating; the next `bench_size` form the bench.
pub fn select_lineup(
    club_id: ClubId,
    squad: &[Player],
    bench_size: usize,
    min_players: usize,
) -> CareerResult<(Vec<Player>, Vec<Player>)> {
    let mut eligible: Vec<&Player> = squad.iter().filter(|p| p.is_eligible()).collect();
    let required = min_players.max(11);
    if eligible.len() < required {
        return Err(CareerError::InvalidSquad { club_id, eligible: eligible.len(), required });
    }
    eligible.sort_by(|a, b| b.rating().total_cmp(&a.rating()).then(a.id.cmp(&b.id)));

    let keeper_idx = eligible
        .iter()
        .position(|p| p.position == Position::Goalkeeper)
        .unwrap_or(0);
    let keeper = eligible.remove(keeper_idx);

    let mut xi = Vec::with_capacity(11);
    xi.push(keeper.clone());
    let mut rest = Vec::new();
    for p in eligible {
        if xi.len() < 11 && p.position != Position::Goalkeeper {
            xi.push(p.clone());
        } else {
            rest.push(p.clone());
        }
    }
    // Squads with surplus keepers still fill eleven.
    while xi.len() < 11 && !rest.is_empty() {
        xi.push(rest.remove(0));
    }
    rest.truncate(bench_size);
    Ok((xi, rest))
}

impl TeamSheet {
    pub fn from_side(side: &MatchSide<'_>, config: &MatchConfig, min_players: usize) -> CareerResult<Self> {
        let (xi, bench) = select_lineup(side.club.id, side.squad, config.bench_size, min_players)?;
        Ok(Self {
            club_id:       side.club.id,
            tactics:       side.tactics,
            starting:      xi.iter().map(|p| p.id).collect(),
            on_pitch:      xi,
            bench,
            booked:        Vec::new(),
            substitutions: 0,
        })
    }

    /// Weighted-average ratings scaled by how many players remain.
    pub fn strength(&self, config: &MatchConfig, home: bool) -> SideStrength {
        let weighted = |f: fn(&Player) -> f64, w: fn(Position) -> f64| -> f64 {
            let total_w: f64 = self.on_pitch.iter().map(|p| w(p.position)).sum();
            if total_w <= 0.0 {
                return 0.0;
            }
            self.on_pitch.iter().map(f).sum::<f64>() / total_w
        };
        let manpower = self.on_pitch.len() as f64 / FULL_SIDE;
        let mentality = mentality_modifier(config, self.tactics.mentality);
        let pressing = pressing_modifier(config, self.tactics.pressing);
        let tempo = tempo_modifier(config, self.tactics.tempo);
        let venue = if home { config.home_advantage } else { 1.0 };

        let attack = weighted(Player::attack_contribution, attack_weight) * manpower;
        let defense = weighted(Player::defense_contribution, defense_weight) * manpower;
        let control = if self.on_pitch.is_empty() {
            0.0
        } else {
            self.on_pitch.iter().map(Player::rating).sum::<f64>() / FULL_SIDE
        };

        SideStrength {
            attack:  attack * mentality.attack * venue,
            defense: defense * mentality.defense * venue,
            control: control * pressing.possession * tempo.possession * venue,
        }
    }
}

fn attack_weight(position: Position) -> f64 {
    match position {
        Position::Goalkeeper => 0.0,
        Position::Defender => 0.25,
        Position::Midfielder => 0.6,
        Position::Forward => 1.0,
    }
}

fn defense_weight(position: Position) -> f64 {
    match position {
        Position::Goalkeeper => 1.4,
        Position::Defender => 1.0,
        Position::Midfielder => 0.5,
        Position::Forward => 0.1,
    }
}

pub fn mentality_modifier(config: &MatchConfig, mentality: Mentality) -> MentalityModifier {
    match mentality {
        Mentality::Defensive => config.mentality.defensive,
        Mentality::Balanced => config.mentality.balanced,
        Mentality::Attacking => config.mentality.attacking,
    }
}

pub fn pressing_modifier(config: &MatchConfig, pressing: Pressing) -> PressingModifier {
    match pressing {
        Pressing::Low => config.pressing.low,
        Pressing::Medium => config.pressing.medium,
        Pressing::High => config.pressing.high,
    }
}

pub fn tempo_modifier(config: &MatchConfig, tempo: Tempo) -> TempoModifier {
    match tempo {
        Tempo::Slow => config.tempo.slow,
        Tempo::Normal => config.tempo.normal,
        Tempo::Fast => config.tempo.fast,
    }
}

/// A match in progress. Serialisable so it can be saved mid-game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSimulation {
    seed:       u64,
    minute:     u8,
    rng:        SimRng,
    sides:      TeamPair<TeamSheet>,
    score:      TeamPair<u8>,
    events:     Vec<MatchEvent>,
    stats:      MatchStats,
    possession: TeamPair<u16>,
}

impl MatchSimulation {
    pub fn new(
        home: &MatchSide<'_>,
        away: &MatchSide<'_>,
        seed: u64,
        config: &MatchConfig,
        min_players: usize,
    ) -> CareerResult<Self> {
        if home.club.id == away.club.id {
            return Err(CareerError::InvalidInput(format!(
                "club {} cannot play itself",
                home.club.id
            )));
        }
        let sides = TeamPair {
            home: TeamSheet::from_side(home, config, min_players)?,
            away: TeamSheet::from_side(away, config, min_players)?,
        };
        Ok(Self {
            seed,
            minute: 0,
            rng: SimRng::from_seed(seed),
            sides,
            score: TeamPair::default(),
            events: Vec::new(),
            stats: MatchStats::default(),
            possession: TeamPair::default(),
        })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn current_minute(&self) -> u8 {
        self.minute
    }

    pub fn is_finished(&self) -> bool {
        self.minute >= FULL_TIME
    }

    pub fn score(&self) -> TeamPair<u8> {
        self.score
    }

    pub fn stats(&self) -> &MatchStats {
        &self.stats
    }

    pub fn events(&self) -> &[MatchEvent] {
        &self.events
    }

    pub fn sides(&self) -> &TeamPair<TeamSheet> {
        &self.sides
    }

    /// Play one minute. Returns the events of that minute.
    /// A finished match is left untouched.
    pub fn step(&mut self, config: &MatchConfig) -> &[MatchEvent] {
        if self.is_finished() {
            return &[];
        }
        self.minute += 1;
        let first_new = self.events.len();

        let strengths = TeamPair {
            home: self.sides.home.strength(config, true),
            away: self.sides.away.strength(config, false),
        };

        let total_control = strengths.home.control + strengths.away.control;
        let home_share = if total_control > 0.0 { strengths.home.control / total_control } else { 0.5 };
        if self.rng.chance(home_share) {
            self.possession.home += 1;
        } else {
            self.possession.away += 1;
        }
        self.stats.possession = possession_split(self.possession);

        for side in [Side::Home, Side::Away] {
            let own = *strengths.get(side);
            let opp = *strengths.get(side.opponent());
            self.play_side_minute(side, own, opp, config);
        }

        if self.minute == FULL_TIME {
            log::debug!(
                "match: full time {}-{} (seed={})",
                self.score.home, self.score.away, self.seed
            );
        }
        &self.events[first_new..]
    }

    /// Play every remaining minute.
    pub fn run_to_end(&mut self, config: &MatchConfig) {
        while !self.is_finished() {
            self.step(config);
        }
    }

    /// The final result. Fails until full time.
    pub fn result(&self) -> CareerResult<MatchResult> {
        if !self.is_finished() {
            return Err(CareerError::NotFinished { minute: self.minute });
        }
        Ok(MatchResult {
            home_goals: self.score.home,
            away_goals: self.score.away,
            events:     self.events.clone(),
            stats:      self.stats,
            seed:       self.seed,
            lineups:    TeamPair {
                home: self.sides.home.starting.clone(),
                away: self.sides.away.starting.clone(),
            },
        })
    }

    fn play_side_minute(&mut self, side: Side, own: SideStrength, opp: SideStrength, config: &MatchConfig) {
        let tactics = self.sides.get(side).tactics;
        let tempo = tempo_modifier(config, tactics.tempo);
        let pressing = pressing_modifier(config, tactics.pressing);
        let ratio = if opp.defense > 0.0 { own.attack / opp.defense } else { 2.0 };

        let p_goal = (config.base_goal_rate * ratio.powf(config.strength_exponent) * tempo.events)
            .min(config.max_goal_rate);
        let p_shot = (config.base_shot_rate
            * ratio.powf(config.strength_exponent / 2.0)
            * pressing.shots
            * tempo.events)
            .min(0.6);
        let p_corner = (config.base_corner_rate * ratio.sqrt() * tempo.events).min(0.3);
        let p_foul = (config.base_foul_rate * pressing.fouls).min(0.5);

        if self.rng.chance(p_goal) {
            *self.score.get_mut(side) += 1;
            *self.stats.shots.get_mut(side) += 1;
            *self.stats.shots_on_target.get_mut(side) += 1;
            if let Some(scorer) = self.pick_scorer(side) {
                self.push_event(side, MatchEventKind::Goal { scorer });
            }
        } else if self.rng.chance(p_shot) {
            *self.stats.shots.get_mut(side) += 1;
            if self.rng.chance(config.on_target_ratio) {
                *self.stats.shots_on_target.get_mut(side) += 1;
            }
        }

        if self.rng.chance(p_corner) {
            *self.stats.corners.get_mut(side) += 1;
        }

        if self.rng.chance(p_foul) {
            *self.stats.fouls.get_mut(side) += 1;
            self.maybe_book(side, config);
        }

        if self.minute >= config.substitution_from && self.minute <= config.substitution_until {
            self.maybe_substitute(side, config);
        }
    }

    fn pick_scorer(&mut self, side: Side) -> Option<PlayerId> {
        let sheet = self.sides.get(side);
        let weights: Vec<f64> = sheet
            .on_pitch
            .iter()
            .map(|p| {
                let base = match p.position {
                    Position::Goalkeeper => 0.05,
                    Position::Defender => 1.0,
                    Position::Midfielder => 3.0,
                    Position::Forward => 5.0,
                };
                base * (p.attributes.technical as f64 + 1.0)
            })
            .collect();
        let idx = self.rng.weighted_index(&weights)?;
        Some(self.sides.get(side).on_pitch[idx].id)
    }

    fn maybe_book(&mut self, side: Side, config: &MatchConfig) {
        let candidates: Vec<usize> = self
            .sides
            .get(side)
            .on_pitch
            .iter()
            .enumerate()
            .filter(|(_, p)| p.position != Position::Goalkeeper)
            .map(|(i, _)| i)
            .collect();
        if candidates.is_empty() {
            return;
        }
        let can_dismiss = self.sides.get(side).on_pitch.len() > MIN_ON_PITCH;

        if can_dismiss && self.rng.chance(config.red_per_foul) {
            let idx = candidates[self.rng.pick_index(candidates.len())];
            self.send_off(side, idx);
        } else if self.rng.chance(config.yellow_per_foul) {
            let idx = candidates[self.rng.pick_index(candidates.len())];
            let player = self.sides.get(side).on_pitch[idx].id;
            *self.stats.yellow_cards.get_mut(side) += 1;
            self.push_event(side, MatchEventKind::YellowCard { player });
            let sheet = self.sides.get_mut(side);
            if sheet.booked.contains(&player) {
                if can_dismiss {
                    self.send_off(side, idx);
                }
            } else {
                sheet.booked.push(player);
            }
        }
    }

    fn send_off(&mut self, side: Side, idx: usize) {
        let player = self.sides.get_mut(side).on_pitch.remove(idx);
        *self.stats.red_cards.get_mut(side) += 1;
        self.push_event(side, MatchEventKind::RedCard { player: player.id });
    }

    fn maybe_substitute(&mut self, side: Side, config: &MatchConfig) {
        let sheet = self.sides.get(side);
        if sheet.substitutions >= config.max_substitutions || sheet.bench.is_empty() {
            return;
        }
        if !self.rng.chance(config.substitution_rate) {
            return;
        }

        let sheet = self.sides.get_mut(side);
        // Most tired-looking outfield player makes way.
        let Some(off_idx) = sheet
            .on_pitch
            .iter()
            .enumerate()
            .filter(|(_, p)| p.position != Position::Goalkeeper)
            .min_by(|(_, a), (_, b)| a.attributes.physical.cmp(&b.attributes.physical).then(a.id.cmp(&b.id)))
            .map(|(i, _)| i)
        else {
            return;
        };
        let position = sheet.on_pitch[off_idx].position;
        let on_idx = sheet
            .bench
            .iter()
            .position(|p| p.position == position)
            .or_else(|| sheet.bench.iter().position(|p| p.position != Position::Goalkeeper));
        let Some(on_idx) = on_idx else { return };

        let incoming = sheet.bench.remove(on_idx);
        let outgoing = std::mem::replace(&mut sheet.on_pitch[off_idx], incoming);
        sheet.substitutions += 1;
        let on = sheet.on_pitch[off_idx].id;
        self.push_event(side, MatchEventKind::Substitution { off: outgoing.id, on });
    }

    fn push_event(&mut self, side: Side, kind: MatchEventKind) {
        self.events.push(MatchEvent { minute: self.minute, side, kind });
    }
}

fn possession_split(minutes: TeamPair<u16>) -> TeamPair<u8> {
    let total = minutes.home as u32 + minutes.away as u32;
    if total == 0 {
        return TeamPair { home: 50, away: 50 };
    }
    let home = ((minutes.home as u32 * 100 + total / 2) / total) as u8;
    TeamPair { home, away: 100 - home }
}

/// Run a whole match in one call.
pub fn simulate_match(
    home: &MatchSide<'_>,
    away: &MatchSide<'_>,
    seed: u64,
    config: &MatchConfig,
    min_players: usize,
) -> CareerResult<MatchResult> {
    let mut sim = MatchSimulation::new(home, away, seed, config, min_players)?;
    sim.run_to_end(config);
    sim.result()
}
