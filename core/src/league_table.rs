//! League table: standings derived from the result log.
//!
//! RULE: standings are never patched. Every caller recomputes them from
//! the full result log of the season, so the cached table cannot drift.

use std::{cmp::Ordering, collections::HashMap};

use crate::{
    config::LeagueConfig,
    domain::{Club, ResultEntry, SeasonStats},
    types::ClubId,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointsSystem {
    pub win:  u32,
    pub draw: u32,
    pub loss: u32,
}

impl Default for PointsSystem {
    fn default() -> Self {
        Self { win: 3, draw: 1, loss: 0 }
    }
}

impl From<&LeagueConfig> for PointsSystem {
    fn from(config: &LeagueConfig) -> Self {
        Self { win: config.points_win, draw: config.points_draw, loss: config.points_loss }
    }
}

/// Derive the ordered table for one season.
///
/// Sort key, descending: points, goal difference, goals for; then club name
/// ascending and finally club id, so the order is total. The leader is
/// flagged champion only once every club has met every other club twice.
pub fn compute_standings(
    results: &[ResultEntry],
    clubs: &[Club],
    points: PointsSystem,
) -> Vec<SeasonStats> {
    let mut rows: HashMap<ClubId, SeasonStats> = clubs
        .iter()
        .map(|c| {
            (
                c.id,
                SeasonStats {
                    club_id:       c.id,
                    club_name:     c.name.clone(),
                    played:        0,
                    won:           0,
                    drawn:         0,
                    lost:          0,
                    goals_for:     0,
                    goals_against: 0,
                    points:        0,
                    position:      0,
                    champion:      false,
                },
            )
        })
        .collect();

    let mut counted = 0usize;
    for r in results {
        if !rows.contains_key(&r.home) || !rows.contains_key(&r.away) {
            log::warn!("league_table: fixture {} references an unknown club, skipped", r.fixture_id);
            continue;
        }
        counted += 1;
        let (home_gf, away_gf) = (r.home_goals as u32, r.away_goals as u32);
        let home_outcome = home_gf.cmp(&away_gf);
        if let Some(home) = rows.get_mut(&r.home) {
            apply_result(home, home_gf, away_gf, home_outcome, points);
        }
        if let Some(away) = rows.get_mut(&r.away) {
            apply_result(away, away_gf, home_gf, home_outcome.reverse(), points);
        }
    }

    let mut table: Vec<SeasonStats> = rows.into_values().collect();
    table.sort_by(standings_order);
    for (i, row) in table.iter_mut().enumerate() {
        row.position = i as u32 + 1;
    }

    let n = clubs.len();
    let season_complete = n >= 2 && counted == n * (n - 1);
    if season_complete {
        if let Some(leader) = table.first_mut() {
            leader.champion = true;
        }
    }
    table
}

/// The strict total order of a league table.
pub fn standings_order(a: &SeasonStats, b: &SeasonStats) -> Ordering {
    b.points
        .cmp(&a.points)
        .then_with(|| b.goal_difference().cmp(&a.goal_difference()))
        .then_with(|| b.goals_for.cmp(&a.goals_for))
        .then_with(|| a.club_name.cmp(&b.club_name))
        .then_with(|| a.club_id.cmp(&b.club_id))
}

/// The champion of a finished table, if any.
pub fn champion(table: &[SeasonStats]) -> Option<ClubId> {
    table.iter().find(|row| row.champion).map(|row| row.club_id)
}

fn apply_result(row: &mut SeasonStats, gf: u32, ga: u32, outcome: Ordering, points: PointsSystem) {
    row.played += 1;
    row.goals_for += gf;
    row.goals_against += ga;
    match outcome {
        Ordering::Greater => {
            row.won += 1;
            row.points += points.win;
        }
        Ordering::Equal => {
            row.drawn += 1;
            row.points += points.draw;
        }
        Ordering::Less => {
            row.lost += 1;
            row.points += points.loss;
        }
    }
}
