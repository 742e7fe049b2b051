//! Season calendar: owns the season/matchday pointer and career tick.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{
    error::{CareerError, CareerResult},
    types::{Matchday, SeasonIndex, Tick},
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeasonCalendar {
    pub season:                 SeasonIndex,
    pub matchday:               Matchday,
    pub total_matchdays:        Matchday,
    /// Absolute career time; never resets.
    pub tick:                   Tick,
    pub season_start:           NaiveDate,
    pub days_between_matchdays: u32,
}

impl SeasonCalendar {
    pub fn new(
        season: SeasonIndex,
        total_matchdays: Matchday,
        start_month: u32,
        start_day: u32,
        days_between_matchdays: u32,
    ) -> CareerResult<Self> {
        Ok(Self {
            season,
            matchday: 1,
            total_matchdays,
            tick: 0,
            season_start: season_start_date(season, start_month, start_day)?,
            days_between_matchdays,
        })
    }

    pub fn is_final_matchday(&self) -> bool {
        self.matchday >= self.total_matchdays
    }

    /// Move to the next matchday. Returns the new matchday.
    /// Panics past the final matchday; callers must check.
    pub fn advance_matchday(&mut self) -> Matchday {
        assert!(!self.is_final_matchday(), "advance_matchday() past the final matchday");
        self.matchday += 1;
        self.tick += 1;
        self.matchday
    }

    /// Start the next season at matchday 1.
    pub fn roll_over(&mut self, start_month: u32, start_day: u32) -> CareerResult<SeasonIndex> {
        let next = self.season + 1;
        self.season_start = season_start_date(next, start_month, start_day)?;
        self.season = next;
        self.matchday = 1;
        self.tick += 1;
        Ok(next)
    }

    pub fn date_of(&self, matchday: Matchday) -> NaiveDate {
        let offset = (matchday.saturating_sub(1) * self.days_between_matchdays) as i64;
        self.season_start + Duration::days(offset)
    }

    pub fn current_date(&self) -> NaiveDate {
        self.date_of(self.matchday)
    }
}

fn season_start_date(season: SeasonIndex, month: u32, day: u32) -> CareerResult<NaiveDate> {
    NaiveDate::from_ymd_opt(season as i32, month, day).ok_or_else(|| {
        CareerError::InvalidInput(format!("invalid season start {season}-{month:02}-{day:02}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matchday_dates_step_by_configured_gap() {
        let cal = SeasonCalendar::new(2026, 38, 8, 8, 7).unwrap();
        assert_eq!(cal.date_of(1), NaiveDate::from_ymd_opt(2026, 8, 8).unwrap());
        assert_eq!(cal.date_of(3), NaiveDate::from_ymd_opt(2026, 8, 22).unwrap());
    }

    #[test]
    fn roll_over_resets_matchday_but_not_tick() {
        let mut cal = SeasonCalendar::new(2026, 2, 8, 1, 7).unwrap();
        cal.advance_matchday();
        assert!(cal.is_final_matchday());
        cal.roll_over(8, 1).unwrap();
        assert_eq!(cal.season, 2027);
        assert_eq!(cal.matchday, 1);
        assert_eq!(cal.tick, 2);
    }

    #[test]
    fn invalid_start_date_is_rejected() {
        assert!(SeasonCalendar::new(2026, 10, 2, 30, 7).is_err());
    }
}
