//! Shared primitive types used across the entire career.

/// Absolute career time. One tick = one matchday advance or season rollover.
pub type Tick = u64;

/// Season-relative round number, starting at 1.
pub type Matchday = u32;

/// The calendar year a season starts in.
pub type SeasonIndex = u16;

/// Money in whole euros. Negative balances are debt.
pub type Money = i64;

pub type ClubId = u32;
pub type PlayerId = u32;
pub type FixtureId = u32;
pub type OfferId = u32;
pub type ReportId = u32;
pub type MessageId = u32;
