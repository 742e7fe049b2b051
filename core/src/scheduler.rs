//! Season scheduler: the double round-robin calendar.
//!
//! Circle method: the first club stays fixed while the others rotate one
//! place per round. The second half mirrors the first with venues swapped,
//! so every pairing is played once at each ground.

use crate::{
    domain::Fixture,
    types::{ClubId, FixtureId, Matchday, SeasonIndex},
};

/// Number of matchdays a double round-robin of `club_count` clubs needs.
/// An odd league gets a bye slot, so one club rests each matchday.
pub fn matchdays_for(club_count: usize) -> Matchday {
    if club_count < 2 {
        return 0;
    }
    let slots = club_count + club_count % 2;
    (2 * (slots - 1)) as Matchday
}

/// Build the unplayed fixture list for a season, ordered by matchday.
/// Fixture ids are allocated sequentially from `first_id`.
pub fn generate_fixtures(
    clubs: &[ClubId],
    season: SeasonIndex,
    first_id: FixtureId,
) -> Vec<Fixture> {
    if clubs.len() < 2 {
        return Vec::new();
    }

    let mut slots: Vec<Option<ClubId>> = clubs.iter().copied().map(Some).collect();
    if slots.len() % 2 == 1 {
        slots.push(None);
    }
    let n = slots.len();
    let rounds = n - 1;

    let mut first_half: Vec<Vec<(ClubId, ClubId)>> = Vec::with_capacity(rounds);
    for round in 0..rounds {
        let mut pairings = Vec::with_capacity(n / 2);
        for i in 0..n / 2 {
            let (a, b) = (slots[i], slots[n - 1 - i]);
            let (Some(a), Some(b)) = (a, b) else { continue };
            // Alternate the fixed club's venue; others alternate by slot.
            let a_home = if i == 0 { round % 2 == 0 } else { (round + i) % 2 == 0 };
            pairings.push(if a_home { (a, b) } else { (b, a) });
        }
        first_half.push(pairings);
        slots[1..].rotate_right(1);
    }

    let mut fixtures = Vec::with_capacity(clubs.len() * (clubs.len() - 1));
    let mut next_id = first_id;
    let halves = [false, true];
    for (half, swap) in halves.iter().enumerate() {
        for (round, pairings) in first_half.iter().enumerate() {
            let matchday = (half * rounds + round + 1) as Matchday;
            for &(home, away) in pairings {
                let (home, away) = if *swap { (away, home) } else { (home, away) };
                fixtures.push(Fixture { id: next_id, season, matchday, home, away, result: None });
                next_id += 1;
            }
        }
    }
    fixtures
}
