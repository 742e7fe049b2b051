//! Value types of the career: clubs, players, fixtures, standings,
//! offers, scout reports and inbox messages.
//!
//! RULE: these types carry invariants, never behaviour that touches
//! other entities. Cross-references are ids, resolved through the Career.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{
    ClubId, FixtureId, Matchday, MessageId, Money, OfferId, PlayerId, ReportId, SeasonIndex, Tick,
};

// ── Clubs ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Club {
    pub id:         ClubId,
    pub name:       String,
    pub short_name: String,
    pub league:     String,
    /// Reputation / strength rating in [1, 100].
    pub reputation: u8,
    pub balance:    Money,
    pub badge:      String,
    pub tactics:    Tactics,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tactics {
    pub mentality: Mentality,
    pub pressing:  Pressing,
    pub tempo:     Tempo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mentality {
    Defensive,
    #[default]
    Balanced,
    Attacking,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pressing {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tempo {
    Slow,
    #[default]
    Normal,
    Fast,
}

// ── Players ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    Goalkeeper,
    Defender,
    Midfielder,
    Forward,
}

impl Position {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Goalkeeper => "GK",
            Self::Defender => "DEF",
            Self::Midfielder => "MID",
            Self::Forward => "FWD",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerAttributes {
    pub technical: u8,
    pub physical:  u8,
    pub mental:    u8,
}

impl PlayerAttributes {
    pub fn uniform(value: u8) -> Self {
        Self { technical: value, physical: value, mental: value }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlayerSeasonStats {
    pub appearances:  u16,
    pub goals:        u16,
    pub yellow_cards: u16,
    pub red_cards:    u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlayerCareerTotals {
    pub appearances: u32,
    pub goals:       u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id:         PlayerId,
    pub name:       String,
    pub position:   Position,
    pub age:        u8,
    pub attributes: PlayerAttributes,
    pub value:      Money,
    /// Weekly wage.
    pub wage:       Money,
    /// Owning club. A back-reference by id; transfers are the only mutation.
    pub club_id:    ClubId,
    /// Matchdays still to serve after a red card.
    pub suspended_matchdays: u8,
    pub season:     PlayerSeasonStats,
    pub career:     PlayerCareerTotals,
}

impl Player {
    /// Overall rating weighted for the player's position, in [0, 100].
    pub fn rating(&self) -> f64 {
        let a = &self.attributes;
        let (t, p, m) = match self.position {
            Position::Goalkeeper => (0.30, 0.30, 0.40),
            Position::Defender => (0.25, 0.40, 0.35),
            Position::Midfielder => (0.40, 0.30, 0.30),
            Position::Forward => (0.50, 0.30, 0.20),
        };
        a.technical as f64 * t + a.physical as f64 * p + a.mental as f64 * m
    }

    /// Share of this player's rating that feeds the attacking phase.
    pub fn attack_contribution(&self) -> f64 {
        let weight = match self.position {
            Position::Goalkeeper => 0.0,
            Position::Defender => 0.25,
            Position::Midfielder => 0.6,
            Position::Forward => 1.0,
        };
        self.rating() * weight
    }

    /// Share of this player's rating that feeds the defensive phase.
    pub fn defense_contribution(&self) -> f64 {
        let weight = match self.position {
            Position::Goalkeeper => 1.4,
            Position::Defender => 1.0,
            Position::Midfielder => 0.5,
            Position::Forward => 0.1,
        };
        self.rating() * weight
    }

    pub fn is_eligible(&self) -> bool {
        self.suspended_matchdays == 0
    }
}

// ── Fixtures and results ───────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Home,
    Away,
}

impl Side {
    pub fn opponent(&self) -> Side {
        match self {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
        }
    }
}

/// A home/away pair of anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TeamPair<T> {
    pub home: T,
    pub away: T,
}

impl<T> TeamPair<T> {
    pub fn get(&self, side: Side) -> &T {
        match side {
            Side::Home => &self.home,
            Side::Away => &self.away,
        }
    }

    pub fn get_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::Home => &mut self.home,
            Side::Away => &mut self.away,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MatchEventKind {
    Goal { scorer: PlayerId },
    YellowCard { player: PlayerId },
    RedCard { player: PlayerId },
    Substitution { off: PlayerId, on: PlayerId },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchEvent {
    pub minute: u8,
    pub side:   Side,
    pub kind:   MatchEventKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MatchStats {
    /// Percentages; home + away == 100 once at least one minute is played.
    pub possession:      TeamPair<u8>,
    pub shots:           TeamPair<u16>,
    pub shots_on_target: TeamPair<u16>,
    pub corners:         TeamPair<u16>,
    pub fouls:           TeamPair<u16>,
    pub yellow_cards:    TeamPair<u16>,
    pub red_cards:       TeamPair<u16>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub home_goals: u8,
    pub away_goals: u8,
    pub events:     Vec<MatchEvent>,
    pub stats:      MatchStats,
    pub seed:       u64,
    /// Starting XIs, used for appearance bookkeeping.
    pub lineups:    TeamPair<Vec<PlayerId>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixture {
    pub id:       FixtureId,
    pub season:   SeasonIndex,
    pub matchday: Matchday,
    pub home:     ClubId,
    pub away:     ClubId,
    /// Attached once on commit, immutable thereafter.
    pub result:   Option<MatchResult>,
}

impl Fixture {
    pub fn is_played(&self) -> bool {
        self.result.is_some()
    }

    pub fn involves(&self, club_id: ClubId) -> bool {
        self.home == club_id || self.away == club_id
    }
}

/// One line of the append-only result log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultEntry {
    pub fixture_id: FixtureId,
    pub matchday:   Matchday,
    pub home:       ClubId,
    pub away:       ClubId,
    pub home_goals: u8,
    pub away_goals: u8,
}

// ── Standings and history ──────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonStats {
    pub club_id:       ClubId,
    pub club_name:     String,
    pub played:        u32,
    pub won:           u32,
    pub drawn:         u32,
    pub lost:          u32,
    pub goals_for:     u32,
    pub goals_against: u32,
    pub points:        u32,
    /// 1-based league position.
    pub position:      u32,
    pub champion:      bool,
}

impl SeasonStats {
    pub fn goal_difference(&self) -> i64 {
        self.goals_for as i64 - self.goals_against as i64
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonRecord {
    pub season:         SeasonIndex,
    pub standings:      Vec<SeasonStats>,
    pub club_id:        ClubId,
    pub club_name:      String,
    pub final_position: u32,
    pub champion:       Option<ClubId>,
}

// ── Transfers ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferDirection {
    /// Another club bids for one of the manager's players.
    Incoming,
    /// The manager bids for another club's player.
    Outgoing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferStatus {
    Pending,
    Accepted,
    Rejected,
    Withdrawn,
    Expired,
}

impl OfferStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// The offer state machine: only Pending has exits.
    pub fn can_transition_to(&self, next: OfferStatus) -> bool {
        matches!(self, Self::Pending) && next != Self::Pending
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NegotiationStage {
    /// Waiting on the manager's answer (incoming bids).
    AwaitingManager,
    /// Waiting on the selling club's answer (outgoing bids).
    AwaitingClub,
    /// Selling club agreed; the manager must confirm to complete.
    Agreed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferDecision {
    Accept,
    Reject,
    Withdraw,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferOffer {
    pub id:               OfferId,
    pub direction:        OfferDirection,
    pub player_id:        PlayerId,
    pub counterparty:     ClubId,
    pub fee:              Money,
    pub status:           OfferStatus,
    pub stage:            NegotiationStage,
    pub created_season:   SeasonIndex,
    pub created_matchday: Matchday,
    pub created_tick:     Tick,
    pub resolved_tick:    Option<Tick>,
}

impl TransferOffer {
    pub fn is_active(&self) -> bool {
        self.status == OfferStatus::Pending
    }
}

// ── Scouting ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoutStatus {
    Scouting,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    HighlyRecommended,
    Recommended,
    NotRecommended,
}

/// What the scout saw, frozen at completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoutFindings {
    pub rating:  u8,
    pub age:     u8,
    pub value:   Money,
    pub club_id: ClubId,
    pub score:   u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoutReport {
    pub id:                    ReportId,
    pub player_id:             PlayerId,
    pub status:                ScoutStatus,
    pub delay:                 u32,
    pub commissioned_season:   SeasonIndex,
    pub commissioned_matchday: Matchday,
    /// commissioned_matchday + delay, in matchdays from the commissioning.
    pub completion_matchday:   Matchday,
    pub commissioned_tick:     Tick,
    pub due_tick:              Tick,
    pub recommendation:        Option<Recommendation>,
    pub findings:              Option<ScoutFindings>,
}

// ── Inbox ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Board,
    MatchReport,
    Form,
    Player,
    Milestone,
    News,
    Staff,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Urgent,
    High,
    Normal,
    Low,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboxMessage {
    pub id:       MessageId,
    pub kind:     MessageKind,
    pub subject:  String,
    pub body:     String,
    pub sender:   String,
    pub priority: Priority,
    pub season:   SeasonIndex,
    pub matchday: Matchday,
    pub date:     NaiveDate,
    /// The only mutable field.
    pub read:     bool,
}

// ── Manager ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerProfile {
    pub name:       String,
    /// Reputation in [1, 100].
    pub reputation: u8,
}
