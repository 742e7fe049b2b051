use touchline_core::{
    domain::{Club, ResultEntry, Tactics},
    league_table::{champion, compute_standings, standings_order, PointsSystem},
    scheduler::generate_fixtures,
    types::ClubId,
};

// ── Test helpers ────────────────────────────────────────────────────────────

fn club(id: ClubId, name: &str) -> Club {
    Club {
        id,
        name: name.into(),
        short_name: name[..3].to_uppercase(),
        league: "Test League".into(),
        reputation: 50,
        balance: 0,
        badge: String::new(),
        tactics: Tactics::default(),
    }
}

fn result(fixture_id: u32, home: ClubId, away: ClubId, hg: u8, ag: u8) -> ResultEntry {
    ResultEntry { fixture_id, matchday: 1, home, away, home_goals: hg, away_goals: ag }
}

fn clubs() -> Vec<Club> {
    vec![club(1, "Castleton"), club(2, "Ashford"), club(3, "Bramley"), club(4, "Dunmore")]
}

// ── Tests ────────────────────────────────────────────────────────────────────

/// Points, goals for and goals against are plain sums over the result log.
#[test]
fn totals_are_derivable_from_results() {
    let results = vec![
        result(1, 1, 2, 3, 1),
        result(2, 3, 4, 0, 0),
        result(3, 2, 3, 2, 2),
        result(4, 4, 1, 1, 4),
        result(5, 1, 3, 0, 1),
    ];
    let table = compute_standings(&results, &clubs(), PointsSystem::default());
    assert_eq!(table.len(), 4);

    for row in &table {
        let (mut gf, mut ga, mut pts, mut played) = (0u32, 0u32, 0u32, 0u32);
        for r in results.iter().filter(|r| r.home == row.club_id || r.away == row.club_id) {
            let (own, other) = if r.home == row.club_id {
                (r.home_goals as u32, r.away_goals as u32)
            } else {
                (r.away_goals as u32, r.home_goals as u32)
            };
            gf += own;
            ga += other;
            played += 1;
            pts += match own.cmp(&other) {
                std::cmp::Ordering::Greater => 3,
                std::cmp::Ordering::Equal => 1,
                std::cmp::Ordering::Less => 0,
            };
        }
        assert_eq!(row.goals_for, gf, "goals for of club {}", row.club_id);
        assert_eq!(row.goals_against, ga, "goals against of club {}", row.club_id);
        assert_eq!(row.points, pts, "points of club {}", row.club_id);
        assert_eq!(row.played, played);
        assert_eq!(row.won + row.drawn + row.lost, row.played);
    }

    let total_points: u32 = table.iter().map(|r| r.points).sum();
    let draws = results.iter().filter(|r| r.home_goals == r.away_goals).count() as u32;
    assert_eq!(total_points, 3 * (results.len() as u32 - draws) + 2 * draws);
}

/// Equal on points, goal difference and goals for: name decides.
#[test]
fn full_ties_fall_back_to_club_name() {
    let results = vec![result(1, 1, 2, 1, 1), result(2, 3, 4, 1, 1)];
    let table = compute_standings(&results, &clubs(), PointsSystem::default());

    let names: Vec<&str> = table.iter().map(|r| r.club_name.as_str()).collect();
    assert_eq!(names, vec!["Ashford", "Bramley", "Castleton", "Dunmore"]);
    let positions: Vec<u32> = table.iter().map(|r| r.position).collect();
    assert_eq!(positions, vec![1, 2, 3, 4]);
}

#[test]
fn goal_difference_beats_goals_for() {
    // Ashford: +2 (2-0). Bramley: +1 but more goals (4-3).
    let results = vec![result(1, 2, 1, 2, 0), result(2, 3, 4, 4, 3)];
    let table = compute_standings(&results, &clubs(), PointsSystem::default());
    assert_eq!(table[0].club_name, "Ashford");
    assert_eq!(table[1].club_name, "Bramley");
}

#[test]
fn order_is_strict_between_distinct_clubs() {
    let table = compute_standings(&[], &clubs(), PointsSystem::default());
    for a in &table {
        for b in &table {
            if a.club_id != b.club_id {
                assert_ne!(standings_order(a, b), std::cmp::Ordering::Equal);
            }
        }
    }
}

/// No champion until every fixture of the season has a result.
#[test]
fn champion_only_when_season_is_complete() {
    let clubs = clubs();
    let ids: Vec<ClubId> = clubs.iter().map(|c| c.id).collect();
    let fixtures = generate_fixtures(&ids, 2026, 1);

    let mut results: Vec<ResultEntry> = fixtures
        .iter()
        .map(|f| {
            // Castleton (1) win every match they play; everything else is a draw.
            let (hg, ag) = if f.home == 1 { (2, 0) } else if f.away == 1 { (0, 2) } else { (1, 1) };
            result(f.id, f.home, f.away, hg, ag)
        })
        .collect();
    let last = results.pop().expect("fixtures");

    let partial = compute_standings(&results, &clubs, PointsSystem::default());
    assert_eq!(champion(&partial), None);
    assert!(partial.iter().all(|r| !r.champion));

    results.push(last);
    let full = compute_standings(&results, &clubs, PointsSystem::default());
    assert_eq!(champion(&full), Some(1));
    assert_eq!(full.iter().filter(|r| r.champion).count(), 1);
    assert!(full[0].champion);
}

#[test]
fn recomputation_is_pure() {
    let results = vec![result(1, 1, 2, 3, 1), result(2, 3, 4, 0, 2)];
    let a = compute_standings(&results, &clubs(), PointsSystem::default());
    let b = compute_standings(&results, &clubs(), PointsSystem::default());
    assert_eq!(a, b);
}

#[test]
fn custom_points_system_is_honoured() {
    let results = vec![result(1, 1, 2, 1, 0), result(2, 3, 4, 0, 0)];
    let table = compute_standings(&results, &clubs(), PointsSystem { win: 2, draw: 1, loss: 0 });
    assert_eq!(table[0].points, 2);
}
