use crate::{
    domain::{OfferDecision, OfferStatus},
    types::{ClubId, FixtureId, Matchday, MessageId, Money, OfferId, PlayerId, SeasonIndex},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CareerError {
    // ── Validation ─────────────────────────────────
    #[error("Club {club_id} has only {eligible} eligible players (need {required})")]
    InvalidSquad { club_id: ClubId, eligible: usize, required: usize },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Sale would leave club {club_id} with {remaining} players (minimum {minimum})")]
    SquadTooSmall { club_id: ClubId, remaining: usize, minimum: usize },

    // ── State conflicts ────────────────────────────
    #[error("A match is already in progress (fixture {fixture_id})")]
    AlreadyInProgress { fixture_id: FixtureId },

    #[error("No match is in progress")]
    NoMatchInProgress,

    #[error("Match not finished: minute {minute} of 90")]
    NotFinished { minute: u8 },

    #[error("Fixture {fixture_id} cannot be played now: {reason}")]
    FixtureNotPlayable { fixture_id: FixtureId, reason: &'static str },

    #[error("Matchday {matchday} not ready: {unplayed} fixtures unplayed")]
    NotReady { matchday: Matchday, unplayed: usize },

    #[error("Season incomplete: {unplayed} fixtures unplayed")]
    SeasonIncomplete { unplayed: usize },

    #[error("Final matchday reached; close the season instead")]
    SeasonFinished,

    #[error("Offer {offer_id} cannot go from {from:?} via {decision:?}")]
    InvalidTransition { offer_id: OfferId, from: OfferStatus, decision: OfferDecision },

    #[error("Offer {offer_id} is already {from:?} and cannot become {to:?}")]
    OfferClosed { offer_id: OfferId, from: OfferStatus, to: OfferStatus },

    #[error("Player {player_id} is already being scouted")]
    AlreadyScouting { player_id: PlayerId },

    // ── Not found ──────────────────────────────────
    #[error("Fixture {0} not found")]
    FixtureNotFound(FixtureId),

    #[error("Offer {0} not found")]
    OfferNotFound(OfferId),

    #[error("Player {0} not found")]
    PlayerNotFound(PlayerId),

    #[error("Club {0} not found")]
    ClubNotFound(ClubId),

    #[error("Message {0} not found")]
    MessageNotFound(MessageId),

    #[error("Season {0} not found")]
    SeasonNotFound(SeasonIndex),

    #[error("Save '{0}' not found")]
    SaveNotFound(String),

    // ── Funds ──────────────────────────────────────
    #[error("Insufficient funds: need {required}, have {available}")]
    InsufficientFunds { required: Money, available: Money },

    // ── Persistence ────────────────────────────────
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Coarse error taxonomy surfaced to hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    StateConflict,
    NotFound,
    InsufficientFunds,
    Persistence,
}

impl CareerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidSquad { .. } | Self::InvalidInput(_) | Self::SquadTooSmall { .. } => {
                ErrorKind::Validation
            }
            Self::AlreadyInProgress { .. }
            | Self::NoMatchInProgress
            | Self::NotFinished { .. }
            | Self::FixtureNotPlayable { .. }
            | Self::NotReady { .. }
            | Self::SeasonIncomplete { .. }
            | Self::SeasonFinished
            | Self::InvalidTransition { .. }
            | Self::OfferClosed { .. }
            | Self::AlreadyScouting { .. } => ErrorKind::StateConflict,
            Self::FixtureNotFound(_)
            | Self::OfferNotFound(_)
            | Self::PlayerNotFound(_)
            | Self::ClubNotFound(_)
            | Self::MessageNotFound(_)
            | Self::SeasonNotFound(_)
            | Self::SaveNotFound(_) => ErrorKind::NotFound,
            Self::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
            Self::Database(_) | Self::Serialization(_) | Self::Other(_) => ErrorKind::Persistence,
        }
    }
}

pub type CareerResult<T> = Result<T, CareerError>;
