//! Transfer market: offers, negotiation and the AI side of the market.
//!
//! Offer lifecycle: Pending -> {Accepted, Rejected, Withdrawn, Expired}.
//! Terminal states have no exits. Within Pending, the negotiation stage
//! records whose answer is awaited:
//!   incoming: AwaitingManager
//!   outgoing: AwaitingClub -> Agreed (selling club said yes)
//!
//! Execution: last in registration order. Pending offers expire first,
//! then selling clubs answer outgoing bids, then the AI may place one new
//! incoming bid for a squad player.

use crate::{
    career::{format_money, Career},
    config::{CareerConfig, TransferConfig},
    domain::{
        MessageKind, NegotiationStage, OfferDecision, OfferDirection, OfferStatus, Priority,
        TransferOffer,
    },
    error::{CareerError, CareerResult},
    event::CareerEvent,
    inbox::Draft,
    rng::{RngSlot, SimRng},
    subsystem::{CareerSubsystem, TickKind},
    types::{ClubId, Money, OfferId, PlayerId},
};

const FEE_ROUNDING: Money = 10_000;

/// Register a bid from another club for one of the manager's players.
pub(crate) fn receive_offer(
    career: &mut Career,
    player_id: PlayerId,
    from_club: ClubId,
    fee: Money,
    events: &mut Vec<CareerEvent>,
) -> CareerResult<OfferId> {
    if fee <= 0 {
        return Err(CareerError::InvalidInput(format!("fee must be positive, got {fee}")));
    }
    let player = career.player(player_id)?;
    if player.club_id != career.club_id {
        return Err(CareerError::InvalidInput(format!("player {player_id} is not in your squad")));
    }
    let buyer = career.club(from_club)?;
    if buyer.id == career.club_id {
        return Err(CareerError::InvalidInput("a club cannot bid for its own player".into()));
    }

    let subject = format!("{} bid for {}", buyer.name, player.name);
    let body = format!(
        "{} have offered {} for {}. The offer stands for a limited time.",
        buyer.name,
        format_money(fee),
        player.name,
    );
    let id = open_offer(career, OfferDirection::Incoming, player_id, from_club, fee, events);
    career.post(Draft::new(MessageKind::Player, Priority::High, "Director of Football", subject).body(body));
    Ok(id)
}

/// Bid for another club's player. The selling club answers on the next
/// matchday advance.
pub(crate) fn make_offer(
    career: &mut Career,
    player_id: PlayerId,
    fee: Money,
    events: &mut Vec<CareerEvent>,
) -> CareerResult<OfferId> {
    if fee <= 0 {
        return Err(CareerError::InvalidInput(format!("fee must be positive, got {fee}")));
    }
    let player = career.player(player_id)?;
    if player.club_id == career.club_id {
        return Err(CareerError::InvalidInput(format!("player {player_id} already plays for you")));
    }
    let seller = player.club_id;
    let subject = format!("Bid submitted for {}", player.name);
    let body = format!(
        "We have offered {} to {} for {}.",
        format_money(fee),
        career.club(seller)?.name,
        player.name,
    );
    let id = open_offer(career, OfferDirection::Outgoing, player_id, seller, fee, events);
    career.post(Draft::new(MessageKind::Player, Priority::Normal, "Director of Football", subject).body(body));
    Ok(id)
}

/// Create a pending offer, superseding any pending offer for the same
/// player, direction and counterparty.
fn open_offer(
    career: &mut Career,
    direction: OfferDirection,
    player_id: PlayerId,
    counterparty: ClubId,
    fee: Money,
    events: &mut Vec<CareerEvent>,
) -> OfferId {
    let tick = career.calendar.tick;
    for offer in career.offers.iter_mut().filter(|o| {
        o.is_active() && o.direction == direction && o.player_id == player_id && o.counterparty == counterparty
    }) {
        offer.status = OfferStatus::Withdrawn;
        offer.resolved_tick = Some(tick);
        events.push(CareerEvent::OfferResolved { offer_id: offer.id, status: OfferStatus::Withdrawn });
    }

    let id = career.ids.next_offer;
    career.ids.next_offer += 1;
    let stage = match direction {
        OfferDirection::Incoming => NegotiationStage::AwaitingManager,
        OfferDirection::Outgoing => NegotiationStage::AwaitingClub,
    };
    career.offers.push(TransferOffer {
        id,
        direction,
        player_id,
        counterparty,
        fee,
        status: OfferStatus::Pending,
        stage,
        created_season: career.calendar.season,
        created_matchday: career.calendar.matchday,
        created_tick: tick,
        resolved_tick: None,
    });
    events.push(CareerEvent::OfferCreated { offer_id: id, direction, player_id, counterparty, fee });
    log::info!(
        "season={} md={} transfer: offer {id} ({direction:?}) for player {player_id}, {}",
        career.calendar.season, career.calendar.matchday, format_money(fee),
    );
    id
}

/// Apply the manager's decision on an offer.
pub(crate) fn respond(
    career: &mut Career,
    offer_id: OfferId,
    decision: OfferDecision,
    config: &CareerConfig,
    events: &mut Vec<CareerEvent>,
) -> CareerResult<()> {
    let offer = career.offer(offer_id)?.clone();
    let invalid = CareerError::InvalidTransition { offer_id, from: offer.status, decision };
    if offer.status.is_terminal() {
        return Err(invalid);
    }

    use NegotiationStage::*;
    use OfferDecision::*;
    use OfferDirection::*;
    match (offer.direction, offer.stage, decision) {
        (Incoming, _, Accept) => {
            let remaining = career.squad().len().saturating_sub(1);
            let minimum = config.transfers.min_squad_after_sale;
            if remaining < minimum {
                return Err(CareerError::SquadTooSmall { club_id: career.club_id, remaining, minimum });
            }
            let managed = career.club_id;
            resolve(career, offer_id, OfferStatus::Accepted, Some(decision), events)?;
            execute_transfer(career, &offer, managed, offer.counterparty, events)?;
            let player = career.player(offer.player_id)?.name.clone();
            let buyer = career.club(offer.counterparty)?.name.clone();
            career.post(
                Draft::new(MessageKind::News, Priority::High, "Director of Football", format!("{player} sold to {buyer}"))
                    .body(format!("{player} has left for {buyer}. {} has been added to the budget.", format_money(offer.fee))),
            );
        }
        (Outgoing, Agreed, Accept) => {
            let remaining = career.squad_of(offer.counterparty).len().saturating_sub(1);
            let minimum = config.transfers.min_squad_after_sale;
            if remaining < minimum {
                return Err(CareerError::SquadTooSmall { club_id: offer.counterparty, remaining, minimum });
            }
            let available = career.finances();
            if available < offer.fee {
                return Err(CareerError::InsufficientFunds { required: offer.fee, available });
            }
            let managed = career.club_id;
            resolve(career, offer_id, OfferStatus::Accepted, Some(decision), events)?;
            execute_transfer(career, &offer, offer.counterparty, managed, events)?;
            let player = career.player(offer.player_id)?.name.clone();
            let seller = career.club(offer.counterparty)?.name.clone();
            career.post(
                Draft::new(MessageKind::News, Priority::High, "Director of Football", format!("{player} signs from {seller}"))
                    .body(format!("{player} has joined for {}.", format_money(offer.fee))),
            );
        }
        (Incoming, _, Reject) | (Outgoing, Agreed, Reject) => {
            resolve(career, offer_id, OfferStatus::Rejected, Some(decision), events)?;
            notify(career, &offer, "Offer declined", "You turned the offer down.")?;
        }
        (Outgoing, _, Withdraw) => {
            resolve(career, offer_id, OfferStatus::Withdrawn, Some(decision), events)?;
            notify(career, &offer, "Bid withdrawn", "We have withdrawn our bid.")?;
        }
        _ => return Err(invalid),
    }
    Ok(())
}

/// Move an offer to a terminal status. `decision` is the manager's answer
/// when they triggered it, `None` when the market did.
fn resolve(
    career: &mut Career,
    offer_id: OfferId,
    status: OfferStatus,
    decision: Option<OfferDecision>,
    events: &mut Vec<CareerEvent>,
) -> CareerResult<()> {
    let tick = career.calendar.tick;
    let offer = career
        .offers
        .iter_mut()
        .find(|o| o.id == offer_id)
        .ok_or(CareerError::OfferNotFound(offer_id))?;
    if !offer.status.can_transition_to(status) {
        let from = offer.status;
        return Err(match decision {
            Some(decision) => CareerError::InvalidTransition { offer_id, from, decision },
            None => CareerError::OfferClosed { offer_id, from, to: status },
        });
    }
    offer.status = status;
    offer.resolved_tick = Some(tick);
    events.push(CareerEvent::OfferResolved { offer_id, status });
    Ok(())
}

fn notify(career: &mut Career, offer: &TransferOffer, subject: &str, outcome: &str) -> CareerResult<()> {
    let player = career.player(offer.player_id)?.name.clone();
    let club = career.club(offer.counterparty)?.name.clone();
    career.post(
        Draft::new(MessageKind::Player, Priority::Normal, "Director of Football", format!("{subject}: {player}"))
            .body(format!("{outcome} ({club}, {})", format_money(offer.fee))),
    );
    Ok(())
}

/// Move a player between clubs and settle the fee. Any other pending offer
/// for the player is withdrawn.
fn execute_transfer(
    career: &mut Career,
    offer: &TransferOffer,
    from: ClubId,
    to: ClubId,
    events: &mut Vec<CareerEvent>,
) -> CareerResult<()> {
    career.adjust_balance(to, -offer.fee)?;
    career.adjust_balance(from, offer.fee)?;
    career.player_mut(offer.player_id)?.club_id = to;
    events.push(CareerEvent::PlayerTransferred { player_id: offer.player_id, from, to, fee: offer.fee });
    log::info!(
        "season={} md={} transfer: player {} moved {from} -> {to} for {}",
        career.calendar.season, career.calendar.matchday, offer.player_id, format_money(offer.fee),
    );

    let stale: Vec<OfferId> = career
        .offers
        .iter()
        .filter(|o| o.is_active() && o.player_id == offer.player_id)
        .map(|o| o.id)
        .collect();
    for id in stale {
        resolve(career, id, OfferStatus::Withdrawn, None, events)?;
    }
    Ok(())
}

/// The AI fee for a player: value times a draw from the bid band,
/// rounded to the nearest 10k.
fn ai_fee(value: Money, config: &TransferConfig, rng: &mut SimRng) -> Money {
    let raw = value as f64 * rng.range_f64(config.bid_fee_min_ratio, config.bid_fee_max_ratio);
    ((raw / FEE_ROUNDING as f64).round() as Money * FEE_ROUNDING).max(FEE_ROUNDING)
}

pub struct TransferSubsystem;

impl TransferSubsystem {
    fn expire(&self, career: &mut Career, config: &TransferConfig, kind: TickKind, events: &mut Vec<CareerEvent>) -> CareerResult<()> {
        let tick = career.calendar.tick;
        let expired: Vec<TransferOffer> = career
            .offers
            .iter()
            .filter(|o| {
                o.is_active()
                    && (kind == TickKind::SeasonRollover || tick - o.created_tick >= config.offer_expiry_matchdays)
            })
            .cloned()
            .collect();
        for offer in expired {
            resolve(career, offer.id, OfferStatus::Expired, None, events)?;
            notify(career, &offer, "Offer expired", "The deadline passed without an answer.")?;
        }
        Ok(())
    }

    /// Selling clubs answer outgoing bids placed before this tick.
    fn answer_bids(&self, career: &mut Career, config: &CareerConfig, rng: &mut SimRng, events: &mut Vec<CareerEvent>) -> CareerResult<()> {
        let tick = career.calendar.tick;
        let awaiting: Vec<TransferOffer> = career
            .offers
            .iter()
            .filter(|o| o.is_active() && o.stage == NegotiationStage::AwaitingClub && o.created_tick < tick)
            .cloned()
            .collect();
        let t = &config.transfers;

        for offer in awaiting {
            let player = career.player(offer.player_id)?;
            let still_there = player.club_id == offer.counterparty;
            let ratio = offer.fee as f64 / player.value.max(1) as f64;
            let squad_left = career.squad_of(offer.counterparty).len().saturating_sub(1);

            let agreed = still_there
                && squad_left >= t.min_squad_after_sale
                && if ratio >= t.accept_ratio {
                    true
                } else if ratio < t.reject_ratio {
                    false
                } else {
                    rng.chance((ratio - t.reject_ratio) / (t.accept_ratio - t.reject_ratio))
                };

            if agreed {
                if let Some(o) = career.offers.iter_mut().find(|o| o.id == offer.id) {
                    o.stage = NegotiationStage::Agreed;
                }
                events.push(CareerEvent::OfferAgreed { offer_id: offer.id });
                notify(career, &offer, "Bid accepted", "The selling club has agreed the fee. Confirm to complete the deal.")?;
            } else {
                resolve(career, offer.id, OfferStatus::Rejected, None, events)?;
                notify(career, &offer, "Bid rejected", "The selling club turned the bid down.")?;
            }
        }
        Ok(())
    }

    /// Maybe place one AI bid for a squad player.
    fn ai_bid(&self, career: &mut Career, config: &TransferConfig, rng: &mut SimRng, events: &mut Vec<CareerEvent>) -> CareerResult<()> {
        if !rng.chance(config.incoming_offer_chance) {
            return Ok(());
        }
        let squad = career.squad();
        if squad.len() <= config.min_squad_after_sale {
            return Ok(());
        }
        let player = squad[rng.pick_index(squad.len())];
        let (player_id, value) = (player.id, player.value);
        let fee = ai_fee(value, config, rng);
        let buyers: Vec<ClubId> = career
            .clubs
            .iter()
            .filter(|c| c.id != career.club_id && c.balance >= fee)
            .map(|c| c.id)
            .collect();
        if buyers.is_empty() {
            return Ok(());
        }
        let buyer = buyers[rng.pick_index(buyers.len())];
        receive_offer(career, player_id, buyer, fee, events)?;
        Ok(())
    }
}

impl CareerSubsystem for TransferSubsystem {
    fn name(&self) -> &'static str {
        "transfers"
    }

    fn slot(&self) -> RngSlot {
        RngSlot::Transfer
    }

    fn on_tick(
        &self,
        career: &mut Career,
        config: &CareerConfig,
        kind:   TickKind,
        rng:    &mut SimRng,
    ) -> CareerResult<Vec<CareerEvent>> {
        let mut events = Vec::new();
        self.expire(career, &config.transfers, kind, &mut events)?;
        if kind == TickKind::Matchday {
            self.answer_bids(career, config, rng, &mut events)?;
            self.ai_bid(career, &config.transfers, rng, &mut events)?;
        }
        Ok(events)
    }
}
