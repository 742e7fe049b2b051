//! The career event log: one entry per committed state change.
//!
//! RULE: events describe what a committed action changed. They are
//! written in the same SQLite transaction that publishes the new
//! snapshot; a rejected action writes nothing.

use serde::{Deserialize, Serialize};

use crate::{
    domain::{OfferDirection, OfferStatus, Recommendation},
    types::{ClubId, FixtureId, Matchday, MessageId, Money, OfferId, PlayerId, ReportId, SeasonIndex, Tick},
};

/// Every event a career can emit.
/// Variants are only ever appended; stored payloads must stay readable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CareerEvent {
    // ── Lifecycle ──────────────────────────────────
    CareerStarted {
        seed:    u64,
        club_id: ClubId,
        season:  SeasonIndex,
    },
    MatchdayAdvanced {
        season:   SeasonIndex,
        matchday: Matchday,
        tick:     Tick,
    },
    SeasonArchived {
        season:         SeasonIndex,
        champion:       Option<ClubId>,
        final_position: u32,
    },
    SeasonStarted {
        season:   SeasonIndex,
        fixtures: usize,
    },

    // ── Matches ────────────────────────────────────
    MatchStarted {
        fixture_id: FixtureId,
        seed:       u64,
    },
    ResultCommitted {
        fixture_id: FixtureId,
        home:       ClubId,
        away:       ClubId,
        home_goals: u8,
        away_goals: u8,
    },
    TacticsChanged {
        club_id: ClubId,
    },

    // ── Finance ────────────────────────────────────
    WagesPaid {
        club_id: ClubId,
        amount:  Money,
    },
    GateReceipts {
        club_id: ClubId,
        amount:  Money,
    },

    // ── Transfers ──────────────────────────────────
    OfferCreated {
        offer_id:     OfferId,
        direction:    OfferDirection,
        player_id:    PlayerId,
        counterparty: ClubId,
        fee:          Money,
    },
    OfferAgreed {
        offer_id: OfferId,
    },
    OfferResolved {
        offer_id: OfferId,
        status:   OfferStatus,
    },
    PlayerTransferred {
        player_id: PlayerId,
        from:      ClubId,
        to:        ClubId,
        fee:       Money,
    },

    // ── Scouting ───────────────────────────────────
    ScoutCommissioned {
        report_id: ReportId,
        player_id: PlayerId,
        due_tick:  Tick,
    },
    ScoutCompleted {
        report_id:      ReportId,
        recommendation: Recommendation,
    },

    // ── Inbox ──────────────────────────────────────
    MessageRead {
        message_id: MessageId,
    },
}

impl CareerEvent {
    /// Stable name for the event_type column.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::CareerStarted { .. }      => "career_started",
            Self::MatchdayAdvanced { .. }   => "matchday_advanced",
            Self::SeasonArchived { .. }     => "season_archived",
            Self::SeasonStarted { .. }      => "season_started",
            Self::MatchStarted { .. }       => "match_started",
            Self::ResultCommitted { .. }    => "result_committed",
            Self::TacticsChanged { .. }     => "tactics_changed",
            Self::WagesPaid { .. }          => "wages_paid",
            Self::GateReceipts { .. }       => "gate_receipts",
            Self::OfferCreated { .. }       => "offer_created",
            Self::OfferAgreed { .. }        => "offer_agreed",
            Self::OfferResolved { .. }      => "offer_resolved",
            Self::PlayerTransferred { .. }  => "player_transferred",
            Self::ScoutCommissioned { .. }  => "scout_commissioned",
            Self::ScoutCompleted { .. }     => "scout_completed",
            Self::MessageRead { .. }        => "message_read",
        }
    }
}

/// The event log entry as persisted to SQLite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub id:         Option<i64>,
    pub career_id:  String,
    pub tick:       Tick,
    pub season:     SeasonIndex,
    pub matchday:   Matchday,
    pub event_type: String,
    pub payload:    String, // JSON-serialized CareerEvent
}
