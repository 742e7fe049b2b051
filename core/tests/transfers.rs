use touchline_core::{
    domain::{
        Club, MessageKind, NegotiationStage, OfferDecision, OfferDirection, OfferStatus, Player,
        PlayerAttributes, Tactics,
    },
    types::{ClubId, Money, PlayerId},
    world::squad_positions,
    Career, CareerConfig, CareerEngine, CareerError, CareerStore, ErrorKind,
};

// ── Test helpers ────────────────────────────────────────────────────────────

const MANAGED: ClubId = 1;
const VALUE: Money = 1_000_000;

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
            age: 25,
            attributes: PlayerAttributes::uniform(55),
            value: VALUE,
            wage: 5_000,
            club_id,
            suspended_matchdays: 0,
            season: Default::default(),
            career: Default::default(),
        })
        .collect()
}

fn config() -> CareerConfig {
    let mut config = CareerConfig::default();
    config.transfers.incoming_offer_chance = 0.0;
    config
}

fn engine_with(config: CareerConfig) -> CareerEngine {
    let clubs: Vec<Club> = (1..=8).map(club).collect();
    let players: Vec<Player> = (1..=8).flat_map(squad).collect();
    let (career, events) =
        Career::new("transfers-test", "Tester", clubs, players, MANAGED, 42, &config).expect("career");
    CareerEngine::new(career, events, config, CareerStore::in_memory().expect("store")).expect("engine")
}

fn engine() -> CareerEngine {
    engine_with(config())
}

/// Play out the current matchday and move to the next one.
fn next_matchday(engine: &mut CareerEngine) {
    engine.simulate_matchday().expect("simulate");
    engine.advance_matchday().expect("advance");
}

// ── Incoming offers ──────────────────────────────────────────────────────────

#[test]
fn accepting_incoming_offer_sells_the_player() {
    let mut engine = engine();
    let target = player_id(MANAGED, 5);
    let offer_id = engine.receive_offer(target, 4, 5_000_000).expect("offer");

    let before = engine.snapshot();
    let buyer_balance = before.club(4).unwrap().balance;
    engine.respond_to_offer(offer_id, OfferDecision::Accept).expect("accept");
    let after = engine.career();

    assert_eq!(after.offer(offer_id).unwrap().status, OfferStatus::Accepted);
    assert_eq!(after.player(target).unwrap().club_id, 4);
    assert!(after.squad().iter().all(|p| p.id != target));
    assert_eq!(after.squad().len(), before.squad().len() - 1);
    assert_eq!(after.finances(), before.finances() + 5_000_000);
    assert_eq!(after.club(4).unwrap().balance, buyer_balance - 5_000_000);
    assert_eq!(after.inbox().len(), before.inbox().len() + 1);
    let news = after.inbox().messages().last().unwrap();
    assert_eq!(news.kind, MessageKind::News);
    assert!(!news.read);
}

#[test]
fn rejecting_incoming_offer_keeps_the_player() {
    let mut engine = engine();
    let target = player_id(MANAGED, 7);
    let offer_id = engine.receive_offer(target, 2, 2_000_000).unwrap();
    let balance = engine.career().finances();

    engine.respond_to_offer(offer_id, OfferDecision::Reject).unwrap();
    let career = engine.career();
    assert_eq!(career.offer(offer_id).unwrap().status, OfferStatus::Rejected);
    assert_eq!(career.player(target).unwrap().club_id, MANAGED);
    assert_eq!(career.finances(), balance);
}

#[test]
fn incoming_offer_cannot_be_withdrawn() {
    let mut engine = engine();
    let offer_id = engine.receive_offer(player_id(MANAGED, 3), 2, 2_000_000).unwrap();

    let err = engine.respond_to_offer(offer_id, OfferDecision::Withdraw).unwrap_err();
    assert!(matches!(err, CareerError::InvalidTransition { from: OfferStatus::Pending, .. }));
    assert_eq!(err.kind(), ErrorKind::StateConflict);
    assert!(engine.career().offer(offer_id).unwrap().is_active());
}

#[test]
fn terminal_offers_stay_terminal() {
    let mut engine = engine();
    let offer_id = engine.receive_offer(player_id(MANAGED, 3), 2, 2_000_000).unwrap();
    engine.respond_to_offer(offer_id, OfferDecision::Reject).unwrap();

    for decision in [OfferDecision::Accept, OfferDecision::Reject, OfferDecision::Withdraw] {
        let err = engine.respond_to_offer(offer_id, decision).unwrap_err();
        assert!(
            matches!(
                err,
                CareerError::InvalidTransition { from: OfferStatus::Rejected, decision: d, .. } if d == decision
            ),
            "{decision:?} on a rejected offer: {err}"
        );
    }
    assert_eq!(engine.career().offer(offer_id).unwrap().status, OfferStatus::Rejected);
}

#[test]
fn sale_below_minimum_squad_is_refused() {
    let mut config = config();
    config.transfers.min_squad_after_sale = 22;
    let mut engine = engine_with(config);
    let target = player_id(MANAGED, 2);
    let offer_id = engine.receive_offer(target, 3, 3_000_000).unwrap();
    let before = engine.snapshot();

    let err = engine.respond_to_offer(offer_id, OfferDecision::Accept).unwrap_err();
    assert!(matches!(err, CareerError::SquadTooSmall { club_id: MANAGED, remaining: 21, minimum: 22 }));
    assert!(std::sync::Arc::ptr_eq(&before, &engine.snapshot()));
    assert_eq!(engine.career().player(target).unwrap().club_id, MANAGED);
}

#[test]
fn newer_offer_supersedes_older_one() {
    let mut engine = engine();
    let target = player_id(MANAGED, 9);
    let first = engine.receive_offer(target, 5, 2_000_000).unwrap();
    let second = engine.receive_offer(target, 5, 2_500_000).unwrap();
    let other_club = engine.receive_offer(target, 6, 2_200_000).unwrap();

    let career = engine.career();
    assert_eq!(career.offer(first).unwrap().status, OfferStatus::Withdrawn);
    assert_eq!(career.offer(second).unwrap().status, OfferStatus::Pending);
    assert_eq!(career.offer(other_club).unwrap().status, OfferStatus::Pending);
}

#[test]
fn accepted_sale_withdraws_other_offers_for_the_player() {
    let mut engine = engine();
    let target = player_id(MANAGED, 9);
    let winner = engine.receive_offer(target, 5, 2_000_000).unwrap();
    let loser = engine.receive_offer(target, 6, 1_800_000).unwrap();

    engine.respond_to_offer(winner, OfferDecision::Accept).unwrap();
    assert_eq!(engine.career().offer(loser).unwrap().status, OfferStatus::Withdrawn);
}

#[test]
fn unanswered_offer_expires_after_three_matchdays() {
    let mut engine = engine();
    let offer_id = engine.receive_offer(player_id(MANAGED, 4), 2, 2_000_000).unwrap();

    next_matchday(&mut engine);
    next_matchday(&mut engine);
    assert!(engine.career().offer(offer_id).unwrap().is_active());

    next_matchday(&mut engine);
    let offer = engine.career().offer(offer_id).unwrap();
    assert_eq!(offer.status, OfferStatus::Expired);
    assert_eq!(offer.resolved_tick, Some(3));

    let err = engine.respond_to_offer(offer_id, OfferDecision::Accept).unwrap_err();
    assert!(matches!(err, CareerError::InvalidTransition { from: OfferStatus::Expired, .. }));
}

#[test]
fn invalid_offers_are_rejected() {
    let mut engine = engine();
    let own = player_id(MANAGED, 1);
    let theirs = player_id(2, 1);

    assert!(matches!(engine.receive_offer(own, 2, 0), Err(CareerError::InvalidInput(_))));
    assert!(matches!(engine.receive_offer(theirs, 3, 1_000_000), Err(CareerError::InvalidInput(_))));
    assert!(matches!(engine.receive_offer(own, MANAGED, 1_000_000), Err(CareerError::InvalidInput(_))));
    assert!(matches!(engine.receive_offer(9_999, 2, 1_000_000), Err(CareerError::PlayerNotFound(9_999))));
    assert!(matches!(engine.make_offer(own, 1_000_000), Err(CareerError::InvalidInput(_))));
    assert!(matches!(
        engine.respond_to_offer(77, OfferDecision::Accept),
        Err(CareerError::OfferNotFound(77))
    ));
    assert!(engine.career().offers().is_empty());
}

// ── Outgoing offers ──────────────────────────────────────────────────────────

#[test]
fn generous_bid_is_agreed_then_completed() {
    let mut engine = engine();
    let target = player_id(6, 10);
    let fee = VALUE * 2;
    let offer_id = engine.make_offer(target, fee).unwrap();
    {
        let offer = engine.career().offer(offer_id).unwrap();
        assert_eq!(offer.direction, OfferDirection::Outgoing);
        assert_eq!(offer.stage, NegotiationStage::AwaitingClub);
        assert_eq!(offer.counterparty, 6);
    }

    // The seller answers on the next matchday advance, never immediately.
    let early = engine.respond_to_offer(offer_id, OfferDecision::Accept).unwrap_err();
    assert!(matches!(early, CareerError::InvalidTransition { .. }));

    next_matchday(&mut engine);
    assert_eq!(engine.career().offer(offer_id).unwrap().stage, NegotiationStage::Agreed);

    let balance = engine.career().finances();
    let seller_balance = engine.career().club(6).unwrap().balance;
    engine.respond_to_offer(offer_id, OfferDecision::Accept).unwrap();
    let career = engine.career();
    assert_eq!(career.offer(offer_id).unwrap().status, OfferStatus::Accepted);
    assert_eq!(career.player(target).unwrap().club_id, MANAGED);
    assert_eq!(career.finances(), balance - fee);
    assert_eq!(career.club(6).unwrap().balance, seller_balance + fee);
}

#[test]
fn lowball_bid_is_rejected_by_the_seller() {
    let mut engine = engine();
    let target = player_id(7, 3);
    let offer_id = engine.make_offer(target, VALUE / 2).unwrap();

    next_matchday(&mut engine);
    let career = engine.career();
    assert_eq!(career.offer(offer_id).unwrap().status, OfferStatus::Rejected);
    assert_eq!(career.player(target).unwrap().club_id, 7);
}

#[test]
fn completing_a_purchase_needs_the_funds() {
    let mut engine = engine();
    let fee = 50_000_000;
    let offer_id = engine.make_offer(player_id(8, 12), fee).unwrap();
    next_matchday(&mut engine);
    assert_eq!(engine.career().offer(offer_id).unwrap().stage, NegotiationStage::Agreed);

    let before = engine.snapshot();
    let err = engine.respond_to_offer(offer_id, OfferDecision::Accept).unwrap_err();
    assert!(matches!(err, CareerError::InsufficientFunds { required: 50_000_000, .. }));
    assert_eq!(err.kind(), ErrorKind::InsufficientFunds);
    assert!(std::sync::Arc::ptr_eq(&before, &engine.snapshot()));
    assert!(engine.career().offer(offer_id).unwrap().is_active());

    // The agreed deal can still be turned down.
    engine.respond_to_offer(offer_id, OfferDecision::Reject).unwrap();
    assert_eq!(engine.career().offer(offer_id).unwrap().status, OfferStatus::Rejected);
}

#[test]
fn purchases_stop_at_the_sellers_minimum_squad() {
    let mut engine = engine();
    let seller = 6;
    let offers: Vec<_> = (1..=12)
        .map(|n| engine.make_offer(player_id(seller, n), VALUE * 3 / 2).unwrap())
        .collect();
    next_matchday(&mut engine);
    for &offer_id in &offers {
        assert_eq!(engine.career().offer(offer_id).unwrap().stage, NegotiationStage::Agreed);
    }

    // 22 players, minimum 16 after a sale: six deals go through.
    for &offer_id in &offers[..6] {
        engine.respond_to_offer(offer_id, OfferDecision::Accept).unwrap();
    }
    let before = engine.snapshot();
    let err = engine.respond_to_offer(offers[6], OfferDecision::Accept).unwrap_err();
    assert!(matches!(err, CareerError::SquadTooSmall { club_id: 6, remaining: 15, minimum: 16 }));
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(std::sync::Arc::ptr_eq(&before, &engine.snapshot()));
    assert!(engine.career().offer(offers[6]).unwrap().is_active());
    assert_eq!(engine.career().squad_of(seller).len(), 16);

    // The seller can still field a side, so the season keeps moving.
    next_matchday(&mut engine);
    assert_eq!(engine.career().matchday(), 3);
}

#[test]
fn outgoing_bid_can_be_withdrawn() {
    let mut engine = engine();
    let offer_id = engine.make_offer(player_id(2, 2), VALUE).unwrap();
    engine.respond_to_offer(offer_id, OfferDecision::Withdraw).unwrap();

    assert_eq!(engine.career().offer(offer_id).unwrap().status, OfferStatus::Withdrawn);
    next_matchday(&mut engine);
    assert_eq!(engine.career().offer(offer_id).unwrap().status, OfferStatus::Withdrawn);
}

#[test]
fn transfer_actions_wait_for_the_live_match() {
    let mut engine = engine();
    let offer_id = engine.receive_offer(player_id(MANAGED, 6), 2, 2_000_000).unwrap();
    let fixture_id = engine.career().fixtures_for_matchday(1)[0].id;
    engine.start_match(fixture_id, None).unwrap();

    assert!(matches!(
        engine.respond_to_offer(offer_id, OfferDecision::Reject),
        Err(CareerError::AlreadyInProgress { .. })
    ));
    assert!(matches!(
        engine.make_offer(player_id(2, 2), VALUE),
        Err(CareerError::AlreadyInProgress { .. })
    ));
}
