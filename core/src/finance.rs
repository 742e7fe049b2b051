//! Finance subsystem: wage bills.
//!
//! Every club pays its squad's wages once per matchday advance. Gate
//! receipts are booked when a home result is committed (see season.rs).
//!
//! Execution: first in registration order, Matchday ticks only.

use crate::{
    career::{format_money, Career},
    config::CareerConfig,
    domain::{MessageKind, Priority},
    error::CareerResult,
    event::CareerEvent,
    inbox::Draft,
    rng::{RngSlot, SimRng},
    subsystem::{CareerSubsystem, TickKind},
    types::{ClubId, Money},
};

pub struct FinanceSubsystem;

impl FinanceSubsystem {
    /// One matchday of wages for a club's current squad.
    pub fn wage_bill(career: &Career, club_id: ClubId, config: &CareerConfig) -> Money {
        let weekly: Money = career.squad_of(club_id).iter().map(|p| p.wage).sum();
        weekly * config.finance.wage_weeks_per_matchday
    }
}

impl CareerSubsystem for FinanceSubsystem {
    fn name(&self) -> &'static str {
        "finance"
    }

    fn slot(&self) -> RngSlot {
        RngSlot::World
    }

    fn on_tick(
        &self,
        career: &mut Career,
        config: &CareerConfig,
        kind:   TickKind,
        _rng:   &mut SimRng,
    ) -> CareerResult<Vec<CareerEvent>> {
        if kind != TickKind::Matchday {
            return Ok(vec![]);
        }

        let mut events = Vec::new();
        let bills: Vec<(ClubId, Money)> = career
            .clubs
            .iter()
            .map(|c| (c.id, Self::wage_bill(career, c.id, config)))
            .collect();

        for (club_id, amount) in bills {
            career.adjust_balance(club_id, -amount)?;
            if club_id == career.club_id {
                events.push(CareerEvent::WagesPaid { club_id, amount });
                let balance = career.finances();
                log::debug!(
                    "season={} md={} finance: wages {} paid, balance {}",
                    career.calendar.season, career.calendar.matchday,
                    format_money(amount), format_money(balance),
                );
                if balance < 0 && balance + amount >= 0 {
                    career.post(
                        Draft::new(MessageKind::Board, Priority::Urgent, "The Board", "The club is in the red")
                            .body(format!("Wages of {} have left a balance of {}.", format_money(amount), format_money(balance))),
                    );
                }
            }
        }
        Ok(events)
    }
}
