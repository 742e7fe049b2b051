use serde::{Deserialize, Serialize};

use crate::{
    domain::{OfferDecision, SeasonStats, Tactics},
    types::{ClubId, FixtureId, MessageId, Money, OfferId, PlayerId, ReportId, SeasonIndex},
};

/// Every action a host can dispatch to a career.
/// Variants are only ever appended, never removed or reordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum Command {
    // ── Matches ───────────────────────────────────
    StartMatch {
        fixture_id: FixtureId,
        #[serde(default)]
        seed:       Option<u64>,
    },
    AdvanceMatchMinute,
    AdvanceMatchToFullTime,
    CompleteMatch,
    SimulateMatchday,
    SetTactics {
        tactics: Tactics,
    },

    // ── Calendar ──────────────────────────────────
    AdvanceMatchday,
    AdvanceSeason,
    GetStandings {
        #[serde(default)]
        season: Option<SeasonIndex>,
    },

    // ── Transfers and scouting ────────────────────
    RespondToOffer {
        offer_id: OfferId,
        decision: OfferDecision,
    },
    MakeOffer {
        player_id: PlayerId,
        fee:       Money,
    },
    CommissionScout {
        player_id: PlayerId,
        delay:     u32,
    },

    // ── Inbox ─────────────────────────────────────
    MarkMessageRead {
        message_id: MessageId,
    },

    // ── Scripted market ───────────────────────────
    ReceiveOffer {
        player_id: PlayerId,
        from_club: ClubId,
        fee:       Money,
    },
}

/// What a dispatched command produced besides the new snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CommandOutcome {
    Done,
    MatchMinute {
        fixture_id: FixtureId,
        minute:     u8,
        home_goals: u8,
        away_goals: u8,
    },
    Standings {
        table: Vec<SeasonStats>,
    },
    OfferCreated {
        offer_id: OfferId,
    },
    ScoutCommissioned {
        report_id: ReportId,
    },
}
