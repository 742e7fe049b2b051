//! Matchday and season progression: committing results, moving the
//! matchday pointer and rolling one season into the next.

use crate::{
    career::{format_money, ordinal, Career},
    config::CareerConfig,
    domain::{Fixture, MatchEventKind, MatchResult, MessageKind, Player, Priority, ResultEntry, SeasonRecord},
    error::{CareerError, CareerResult},
    event::CareerEvent,
    inbox::Draft,
    league_table::{champion, compute_standings, PointsSystem},
    match_engine::{MatchSide, MatchSimulation},
    rng::SimRng,
    types::{ClubId, FixtureId},
};

/// A fixture that may be kicked off right now.
pub(crate) fn playable_fixture(career: &Career, fixture_id: FixtureId) -> CareerResult<&Fixture> {
    let fixture = career.fixture(fixture_id)?;
    if fixture.is_played() {
        return Err(CareerError::FixtureNotPlayable { fixture_id, reason: "already played" });
    }
    if fixture.matchday != career.calendar.matchday {
        return Err(CareerError::FixtureNotPlayable { fixture_id, reason: "not on the current matchday" });
    }
    Ok(fixture)
}

/// Kick off a fixture: pick both lineups and seed the simulation.
pub(crate) fn kick_off(
    career: &Career,
    fixture: &Fixture,
    seed: u64,
    config: &CareerConfig,
) -> CareerResult<MatchSimulation> {
    let home_club = career.club(fixture.home)?;
    let away_club = career.club(fixture.away)?;
    let home_squad: Vec<Player> = career.squad_of(fixture.home).into_iter().cloned().collect();
    let away_squad: Vec<Player> = career.squad_of(fixture.away).into_iter().cloned().collect();
    let home = MatchSide { club: home_club, squad: &home_squad, tactics: home_club.tactics };
    let away = MatchSide { club: away_club, squad: &away_squad, tactics: away_club.tactics };
    MatchSimulation::new(&home, &away, seed, &config.match_engine, config.league.min_matchday_squad)
}

/// Default seed of a fixture, derived from the career master seed.
pub(crate) fn fixture_seed(career: &Career, fixture_id: FixtureId) -> u64 {
    career.rng.match_seed(fixture_id, career.calendar.season)
}

/// Attach a finished result to its fixture and book everything it implies:
/// the result log, player stats, suspensions, gate receipts and the
/// manager's match report.
pub(crate) fn commit_result(
    career: &mut Career,
    fixture_id: FixtureId,
    result: MatchResult,
    config: &CareerConfig,
    events: &mut Vec<CareerEvent>,
) -> CareerResult<()> {
    let idx = career
        .fixtures
        .iter()
        .position(|f| f.id == fixture_id)
        .ok_or(CareerError::FixtureNotFound(fixture_id))?;
    if career.fixtures[idx].is_played() {
        return Err(CareerError::FixtureNotPlayable { fixture_id, reason: "already played" });
    }
    let (home, away, matchday) = {
        let f = &career.fixtures[idx];
        (f.home, f.away, f.matchday)
    };

    // Suspended players have now sat out one match.
    for p in career.players.values_mut() {
        if (p.club_id == home || p.club_id == away) && p.suspended_matchdays > 0 {
            p.suspended_matchdays -= 1;
        }
    }

    let mut appeared: Vec<_> = result.lineups.home.iter().chain(result.lineups.away.iter()).copied().collect();
    for event in &result.events {
        match event.kind {
            MatchEventKind::Substitution { on, .. } => appeared.push(on),
            MatchEventKind::Goal { scorer } => {
                let p = career.player_mut(scorer)?;
                p.season.goals += 1;
                p.career.goals += 1;
            }
            MatchEventKind::YellowCard { player } => {
                career.player_mut(player)?.season.yellow_cards += 1;
            }
            MatchEventKind::RedCard { player } => {
                let p = career.player_mut(player)?;
                p.season.red_cards += 1;
                p.suspended_matchdays = 1;
            }
        }
    }
    for id in appeared {
        let p = career.player_mut(id)?;
        p.season.appearances += 1;
        p.career.appearances += 1;
    }

    let receipts = career.club(home)?.reputation as i64 * config.finance.gate_receipts_per_reputation;
    career.adjust_balance(home, receipts)?;
    if home == career.club_id {
        events.push(CareerEvent::GateReceipts { club_id: home, amount: receipts });
    }

    career.results.push(ResultEntry {
        fixture_id,
        matchday,
        home,
        away,
        home_goals: result.home_goals,
        away_goals: result.away_goals,
    });
    events.push(CareerEvent::ResultCommitted {
        fixture_id,
        home,
        away,
        home_goals: result.home_goals,
        away_goals: result.away_goals,
    });
    log::info!(
        "season={} md={matchday} result: {} {}-{} {}",
        career.calendar.season,
        career.club(home)?.short_name,
        result.home_goals,
        result.away_goals,
        career.club(away)?.short_name,
    );

    let involves_manager = home == career.club_id || away == career.club_id;
    if involves_manager {
        let report = match_report(career, home, away, &result)?;
        career.post(report);
    }
    career.fixtures[idx].result = Some(result);
    if involves_manager {
        post_form_note(career);
    }
    Ok(())
}

fn match_report(career: &Career, home: ClubId, away: ClubId, result: &MatchResult) -> CareerResult<Draft> {
    let home_name = &career.club(home)?.name;
    let away_name = &career.club(away)?.name;
    let s = &result.stats;

    let (ours, theirs, opponent) = if home == career.club_id {
        (result.home_goals, result.away_goals, away_name)
    } else {
        (result.away_goals, result.home_goals, home_name)
    };
    let verdict = match ours.cmp(&theirs) {
        std::cmp::Ordering::Greater => "Victory",
        std::cmp::Ordering::Equal => "Draw",
        std::cmp::Ordering::Less => "Defeat",
    };

    let mut body = format!(
        "{home_name} {}-{} {away_name}\nPossession {}%-{}% | Shots {}-{} ({}-{} on target) | Corners {}-{} | Fouls {}-{}",
        result.home_goals, result.away_goals,
        s.possession.home, s.possession.away,
        s.shots.home, s.shots.away,
        s.shots_on_target.home, s.shots_on_target.away,
        s.corners.home, s.corners.away,
        s.fouls.home, s.fouls.away,
    );
    for event in &result.events {
        if let MatchEventKind::Goal { scorer } = event.kind {
            let name = career.player(scorer).map(|p| p.name.as_str()).unwrap_or("Unknown");
            body.push_str(&format!("\n{}' {name}", event.minute));
        }
    }

    Ok(Draft::new(
        MessageKind::MatchReport,
        Priority::Normal,
        "Assistant Manager",
        format!("{verdict} against {opponent} ({ours}-{theirs})"),
    )
    .body(body))
}

/// Post a form note when the manager's club starts a run of three.
fn post_form_note(career: &mut Career) {
    let club = career.club_id;
    let outcomes: Vec<std::cmp::Ordering> = career
        .results
        .iter()
        .filter(|r| r.home == club || r.away == club)
        .map(|r| {
            if r.home == club {
                r.home_goals.cmp(&r.away_goals)
            } else {
                r.away_goals.cmp(&r.home_goals)
            }
        })
        .collect();
    let n = outcomes.len();
    if n < 3 {
        return;
    }
    let last = outcomes[n - 1];
    let run_of_three = outcomes[n - 3..].iter().all(|o| *o == last);
    let longer_run = n >= 4 && outcomes[n - 4] == last;
    if !run_of_three || longer_run {
        return;
    }
    let draft = match last {
        std::cmp::Ordering::Greater => Draft::new(MessageKind::Form, Priority::Normal, "Assistant Manager", "Three wins on the bounce")
            .body("The squad is brimming with confidence."),
        std::cmp::Ordering::Less => Draft::new(MessageKind::Form, Priority::High, "Assistant Manager", "Three defeats in a row")
            .body("Heads are dropping in the dressing room."),
        std::cmp::Ordering::Equal => return,
    };
    career.post(draft);
}

/// Move the matchday pointer. Every fixture of the current matchday must
/// have a result; the final matchday is closed by `close_season` instead.
pub(crate) fn advance_matchday(career: &mut Career, events: &mut Vec<CareerEvent>) -> CareerResult<()> {
    let matchday = career.calendar.matchday;
    let unplayed = career.unplayed_in_matchday(matchday);
    if unplayed > 0 {
        return Err(CareerError::NotReady { matchday, unplayed });
    }
    if career.calendar.is_final_matchday() {
        return Err(CareerError::SeasonFinished);
    }
    let next = career.calendar.advance_matchday();
    events.push(CareerEvent::MatchdayAdvanced {
        season:   career.calendar.season,
        matchday: next,
        tick:     career.calendar.tick,
    });
    log::debug!("season={} md={next} matchday advanced", career.calendar.season);
    Ok(())
}

/// Archive the finished season and schedule the next one.
///
/// Squads, finances and career totals carry over; per-season player stats
/// and the result log are cleared.
pub(crate) fn close_season(
    career: &mut Career,
    config: &CareerConfig,
    rng: &mut SimRng,
    events: &mut Vec<CareerEvent>,
) -> CareerResult<()> {
    let unplayed = career.unplayed_in_season();
    if unplayed > 0 {
        return Err(CareerError::SeasonIncomplete { unplayed });
    }

    let season = career.calendar.season;
    let table = compute_standings(&career.results, &career.clubs, PointsSystem::from(&config.league));
    let title = champion(&table);
    let final_position = table
        .iter()
        .find(|row| row.club_id == career.club_id)
        .map(|row| row.position)
        .ok_or(CareerError::ClubNotFound(career.club_id))?;
    let club_name = career.managed_club()?.name.clone();

    career.history.push(SeasonRecord {
        season,
        standings: table,
        club_id: career.club_id,
        club_name: club_name.clone(),
        final_position,
        champion: title,
    });
    events.push(CareerEvent::SeasonArchived { season, champion: title, final_position });
    log::info!("season={season} archived: {club_name} finished {}", ordinal(final_position));

    if title == Some(career.club_id) {
        career.post(
            Draft::new(MessageKind::Milestone, Priority::Urgent, "The Board", format!("{club_name} are champions!"))
                .body(format!("The {season} title belongs to {club_name}.")),
        );
    }
    let target = career.board_target;
    let review = if final_position <= target {
        Draft::new(MessageKind::Board, Priority::Normal, "The Board", "Season review: objective met")
            .body(format!("We asked for {} and you delivered {}.", ordinal(target), ordinal(final_position)))
    } else {
        Draft::new(MessageKind::Board, Priority::High, "The Board", "Season review: objective missed")
            .body(format!("We asked for {} but finished {}.", ordinal(target), ordinal(final_position)))
    };
    career.post(review);

    let delta = (target as i32 - final_position as i32) * 2;
    career.manager.reputation = (career.manager.reputation as i32 + delta).clamp(1, 100) as u8;

    for p in career.players.values_mut() {
        p.season = Default::default();
    }

    let league = &config.league;
    let next = career.calendar.roll_over(league.season_start_month, league.season_start_day)?;
    let mut order: Vec<ClubId> = career.clubs.iter().map(|c| c.id).collect();
    rng.shuffle(&mut order);
    career.schedule_season(&order);
    career.board_target = career.expected_position();

    let balance = format_money(career.finances());
    career.post(
        Draft::new(MessageKind::Board, Priority::High, "The Board", format!("Objectives for {next}"))
            .body(format!(
                "The board expects a finish of {} or better. Current balance: {balance}.",
                ordinal(career.board_target)
            )),
    );
    events.push(CareerEvent::SeasonStarted { season: next, fixtures: career.fixtures.len() });
    log::info!("season={next} started with {} fixtures", career.fixtures.len());
    Ok(())
}
