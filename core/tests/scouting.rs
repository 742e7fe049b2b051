use touchline_core::{
    domain::{
        Club, MessageKind, OfferDecision, Player, PlayerAttributes, ScoutStatus, Tactics,
    },
    types::{ClubId, PlayerId},
    world::squad_positions,
    Career, CareerConfig, CareerEngine, CareerError, CareerStore,
};

// ── Test helpers ────────────────────────────────────────────────────────────

const MANAGED: ClubId = 1;

fn club(id: ClubId) -> Club {
    Club {
        id,
        name: format!("Club {id}"),
        short_name: format!("C{id:02}"),
        league: "Test League".into(),
        reputation: 50,
        balance: 10_000_000,
        badge: String::new(),
        tactics: Tactics::default(),
    }
}

fn player_id(club_id: ClubId, n: u32) -> PlayerId {
    (club_id - 1) * 100 + n
}

fn squad(club_id: ClubId) -> Vec<Player> {
    squad_positions(22)
        .into_iter()
        .enumerate()
        .map(|(i, position)| Player {
            id: player_id(club_id, i as u32 + 1),
            name: format!("Player {club_id}-{}", i + 1),
            position,
            age: 20 + (i as u8 % 12),
            attributes: PlayerAttributes::uniform(45 + (i as u8 % 30)),
            value: 1_000_000,
            wage: 5_000,
            club_id,
            suspended_matchdays: 0,
            season: Default::default(),
            career: Default::default(),
        })
        .collect()
}

fn engine() -> CareerEngine {
    let mut config = CareerConfig::default();
    config.transfers.incoming_offer_chance = 0.0;
    let clubs: Vec<Club> = (1..=8).map(club).collect();
    let players: Vec<Player> = (1..=8).flat_map(squad).collect();
    let (career, events) =
        Career::new("scouting-test", "Tester", clubs, players, MANAGED, 7, &config).expect("career");
    CareerEngine::new(career, events, config, CareerStore::in_memory().expect("store")).expect("engine")
}

fn next_matchday(engine: &mut CareerEngine) {
    engine.simulate_matchday().expect("simulate");
    engine.advance_matchday().expect("advance");
}

fn finish_season(engine: &mut CareerEngine) {
    loop {
        engine.simulate_matchday().expect("simulate");
        match engine.advance_matchday() {
            Ok(_) => {}
            Err(CareerError::SeasonFinished) => return,
            Err(e) => panic!("advance failed: {e}"),
        }
    }
}

fn status(engine: &CareerEngine, report_id: u32) -> ScoutStatus {
    engine.career().scout_report(report_id).expect("report").status
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[test]
fn report_completes_exactly_after_the_delay() {
    let mut engine = engine();
    for _ in 0..4 {
        next_matchday(&mut engine);
    }
    assert_eq!(engine.career().matchday(), 5);

    let target = player_id(4, 8);
    let report = engine.commission_scout(target, 3).expect("commission");
    assert_eq!(report.status, ScoutStatus::Scouting);
    assert_eq!(report.commissioned_matchday, 5);
    assert_eq!(report.completion_matchday, 8);
    assert!(report.findings.is_none());
    assert!(report.recommendation.is_none());

    next_matchday(&mut engine);
    next_matchday(&mut engine);
    assert_eq!(status(&engine, report.id), ScoutStatus::Scouting);

    let inbox_before = engine.career().inbox().len();
    next_matchday(&mut engine);
    let career = engine.career();
    assert_eq!(career.matchday(), 8);
    let done = career.scout_report(report.id).unwrap();
    assert_eq!(done.status, ScoutStatus::Completed);
    assert!(done.recommendation.is_some());
    let findings = done.findings.as_ref().expect("findings");
    assert_eq!(findings.club_id, 4);

    let staff: Vec<_> = career.inbox().messages()[inbox_before..]
        .iter()
        .filter(|m| m.kind == MessageKind::Staff)
        .collect();
    assert_eq!(staff.len(), 1);
    assert_eq!(staff[0].sender, "Chief Scout");
}

#[test]
fn commissioning_validates_its_input() {
    let mut engine = engine();
    let max = engine.config().scouting.max_delay;
    let target = player_id(3, 2);

    assert!(matches!(engine.commission_scout(target, 0), Err(CareerError::InvalidInput(_))));
    assert!(matches!(engine.commission_scout(target, max + 1), Err(CareerError::InvalidInput(_))));
    assert!(matches!(
        engine.commission_scout(player_id(MANAGED, 2), 2),
        Err(CareerError::InvalidInput(_))
    ));
    assert!(matches!(engine.commission_scout(4_242, 2), Err(CareerError::PlayerNotFound(4_242))));
    assert!(engine.career().scout_reports().is_empty());

    engine.commission_scout(target, max).expect("longest delay is allowed");
    assert!(matches!(
        engine.commission_scout(target, 1),
        Err(CareerError::AlreadyScouting { player_id }) if player_id == target
    ));
    assert_eq!(engine.career().scout_reports().len(), 1);
}

#[test]
fn completed_player_can_be_scouted_again() {
    let mut engine = engine();
    let target = player_id(2, 5);
    let first = engine.commission_scout(target, 1).unwrap();
    next_matchday(&mut engine);
    assert_eq!(status(&engine, first.id), ScoutStatus::Completed);

    let second = engine.commission_scout(target, 1).unwrap();
    assert_ne!(first.id, second.id);
}

#[test]
fn report_due_after_the_season_completes_in_the_next_one() {
    let mut engine = engine();
    finish_season(&mut engine);
    let final_matchday = engine.career().matchday();
    assert_eq!(final_matchday, 14);

    let report = engine.commission_scout(player_id(5, 3), 3).unwrap();
    engine.advance_season().expect("rollover");
    assert_eq!(engine.career().matchday(), 1);
    assert_eq!(status(&engine, report.id), ScoutStatus::Scouting);

    next_matchday(&mut engine);
    assert_eq!(status(&engine, report.id), ScoutStatus::Scouting);
    next_matchday(&mut engine);
    let done = engine.career().scout_report(report.id).unwrap();
    assert_eq!(done.status, ScoutStatus::Completed);
    assert_eq!(done.commissioned_season + 1, engine.career().season());
}

#[test]
fn findings_are_frozen_at_completion() {
    let mut engine = engine();
    let target = player_id(6, 14);
    let report = engine.commission_scout(target, 1).unwrap();
    next_matchday(&mut engine);
    let frozen = engine.career().scout_report(report.id).unwrap().clone();
    assert_eq!(frozen.status, ScoutStatus::Completed);

    // Sign the player; the report still describes them at club 6.
    let offer_id = engine.make_offer(target, 5_000_000).unwrap();
    next_matchday(&mut engine);
    engine.respond_to_offer(offer_id, OfferDecision::Accept).expect("sign");
    assert_eq!(engine.career().player(target).unwrap().club_id, MANAGED);

    for _ in 0..3 {
        next_matchday(&mut engine);
    }
    let later = engine.career().scout_report(report.id).unwrap();
    assert_eq!(later, &frozen);
    assert_eq!(later.findings.as_ref().unwrap().club_id, 6);
}
