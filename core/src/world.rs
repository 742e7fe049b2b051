//! World generation for a new career: clubs, finances and squads.
//!
//! Everything is drawn from the `World` RNG stream at tick 0, so the same
//! master seed always builds the same league.

use crate::{
    config::CareerConfig,
    domain::{
        Club, Mentality, Player, PlayerAttributes, Position, Pressing, Tactics, Tempo,
    },
    error::{CareerError, CareerResult},
    name_generator::NameGenerator,
    rng::{RngBank, RngSlot, SimRng},
    types::{ClubId, Money, PlayerId},
};

const TOP_REPUTATION: f64 = 85.0;
const REPUTATION_SPREAD: f64 = 40.0;
const BALANCE_PER_REPUTATION_SQ: Money = 4_000;
const ATTRIBUTE_SD: f64 = 6.0;

/// A generated league: clubs in reputation order plus every squad.
#[derive(Debug, Clone)]
pub struct World {
    pub clubs:   Vec<Club>,
    pub players: Vec<Player>,
}

pub struct WorldBuilder<'a> {
    config:     &'a CareerConfig,
    rng:        SimRng,
    club_count: usize,
    squad_size: usize,
}

impl<'a> WorldBuilder<'a> {
    pub fn new(config: &'a CareerConfig, seed: u64) -> Self {
        Self {
            config,
            rng: RngBank::new(seed).for_slot_at_tick(RngSlot::World, 0),
            club_count: config.league.club_count,
            squad_size: config.league.squad_size,
        }
    }

    pub fn club_count(mut self, count: usize) -> Self {
        self.club_count = count;
        self
    }

    pub fn squad_size(mut self, size: usize) -> Self {
        self.squad_size = size;
        self
    }

    pub fn build(mut self) -> CareerResult<World> {
        if self.club_count < 2 {
            return Err(CareerError::InvalidInput(format!(
                "a league needs at least two clubs, got {}",
                self.club_count
            )));
        }
        let required = self.config.league.min_matchday_squad.max(11);
        if self.squad_size < required {
            return Err(CareerError::InvalidInput(format!(
                "squad size {} is below the matchday minimum {required}",
                self.squad_size
            )));
        }

        let names = NameGenerator::club_names(&mut self.rng, self.club_count);
        let mut clubs = Vec::with_capacity(self.club_count);
        let mut players = Vec::with_capacity(self.club_count * self.squad_size);
        let mut next_player: PlayerId = 1;

        for (i, (name, short_name)) in names.into_iter().enumerate() {
            let id = i as ClubId + 1;
            let step = i as f64 / (self.club_count - 1) as f64;
            let reputation = (TOP_REPUTATION - REPUTATION_SPREAD * step + self.rng.normal(0.0, 2.0))
                .round()
                .clamp(30.0, 95.0) as u8;

            for position in squad_positions(self.squad_size) {
                players.push(self.player(next_player, id, position, reputation));
                next_player += 1;
            }

            let rep = reputation as Money;
            clubs.push(Club {
                id,
                name,
                league: self.config.league.league_name.clone(),
                reputation,
                balance: rep * rep * BALANCE_PER_REPUTATION_SQ,
                badge: format!("badges/{}.png", short_name.to_lowercase()),
                short_name,
                tactics: tactics_for(reputation),
            });
        }

        log::info!(
            "world: generated {} clubs and {} players",
            clubs.len(),
            players.len()
        );
        Ok(World { clubs, players })
    }

    fn player(&mut self, id: PlayerId, club_id: ClubId, position: Position, strength: u8) -> Player {
        let mut attr = || self.rng.normal(strength as f64, ATTRIBUTE_SD).round().clamp(25.0, 99.0) as u8;
        let attributes = PlayerAttributes { technical: attr(), physical: attr(), mental: attr() };
        let age = 17 + self.rng.next_u64_below(19) as u8;
        let mut player = Player {
            id,
            name: NameGenerator::player_name(&mut self.rng),
            position,
            age,
            attributes,
            value: 0,
            wage: 0,
            club_id,
            suspended_matchdays: 0,
            season: Default::default(),
            career: Default::default(),
        };
        player.value = market_value(&player);
        player.wage = ((player.value / 400) / 100 * 100).max(500);
        player
    }
}

/// Positional split of a squad: two goalkeepers (one more per extra eleven),
/// the outfield split 35/35/30 between defence, midfield and attack.
pub fn squad_positions(size: usize) -> Vec<Position> {
    let keepers = (size / 11).max(2).min(size);
    let outfield = size - keepers;
    let defenders = outfield * 35 / 100;
    let midfielders = outfield * 35 / 100;
    let forwards = outfield - defenders - midfielders;

    let mut positions = Vec::with_capacity(size);
    positions.extend(std::iter::repeat(Position::Goalkeeper).take(keepers));
    positions.extend(std::iter::repeat(Position::Defender).take(defenders));
    positions.extend(std::iter::repeat(Position::Midfielder).take(midfielders));
    positions.extend(std::iter::repeat(Position::Forward).take(forwards));
    positions
}

/// Transfer value from rating and age, rounded to 10k.
pub fn market_value(player: &Player) -> Money {
    let quality = (player.rating() - 40.0).max(1.0).powf(2.4) * 1_000.0;
    let age_factor = match player.age {
        0..=23 => 1.3,
        24..=30 => 1.0,
        _ => 0.6,
    };
    (((quality * age_factor) / 10_000.0).round() as Money * 10_000).max(50_000)
}

fn tactics_for(reputation: u8) -> Tactics {
    match reputation {
        75..=u8::MAX => Tactics { mentality: Mentality::Attacking, pressing: Pressing::High, tempo: Tempo::Normal },
        0..=54 => Tactics { mentality: Mentality::Defensive, pressing: Pressing::Low, tempo: Tempo::Slow },
        _ => Tactics::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_builds_the_same_world() {
        let config = CareerConfig::default();
        let a = WorldBuilder::new(&config, 42).club_count(6).build().unwrap();
        let b = WorldBuilder::new(&config, 42).club_count(6).build().unwrap();
        assert_eq!(a.clubs, b.clubs);
        assert_eq!(a.players, b.players);
    }

    #[test]
    fn squads_follow_the_positional_split() {
        let positions = squad_positions(22);
        let count = |p: Position| positions.iter().filter(|x| **x == p).count();
        assert_eq!(count(Position::Goalkeeper), 2);
        assert_eq!(count(Position::Defender), 7);
        assert_eq!(count(Position::Midfielder), 7);
        assert_eq!(count(Position::Forward), 6);
    }

    #[test]
    fn reputation_falls_down_the_league() {
        let config = CareerConfig::default();
        let world = WorldBuilder::new(&config, 9).build().unwrap();
        assert_eq!(world.clubs.len(), config.league.club_count);
        assert_eq!(world.players.len(), config.league.club_count * config.league.squad_size);
        let first = world.clubs.first().unwrap().reputation;
        let last = world.clubs.last().unwrap().reputation;
        assert!(first > last + 20, "top {first} vs bottom {last}");
    }

    #[test]
    fn undersized_squads_are_rejected() {
        let config = CareerConfig::default();
        assert!(WorldBuilder::new(&config, 1).squad_size(10).build().is_err());
    }
}
