//! The append-only career event log.

use rusqlite::params;

use crate::{error::CareerResult, event::EventLogEntry, types::Tick};

use super::CareerStore;

impl CareerStore {
    /// Append a batch of entries in one transaction: all or nothing.
    pub fn append_events(&self, entries: &[EventLogEntry]) -> CareerResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO career_event (career_id, tick, season, matchday, event_type, payload)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for entry in entries {
                stmt.execute(params![
                    entry.career_id,
                    entry.tick as i64,
                    entry.season,
                    entry.matchday,
                    entry.event_type,
                    entry.payload,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    pub fn events_for_tick(&self, career_id: &str, tick: Tick) -> CareerResult<Vec<EventLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, career_id, tick, season, matchday, event_type, payload
             FROM career_event WHERE career_id = ?1 AND tick = ?2
             ORDER BY id ASC",
        )?;
        let entries = stmt
            .query_map(params![career_id, tick as i64], |row| {
                Ok(EventLogEntry {
                    id:         Some(row.get(0)?),
                    career_id:  row.get(1)?,
                    tick:       row.get::<_, i64>(2)? as u64,
                    season:     row.get(3)?,
                    matchday:   row.get(4)?,
                    event_type: row.get(5)?,
                    payload:    row.get(6)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    /// Number of logged events of one type (for tests and summaries).
    pub fn event_count(&self, career_id: &str, event_type: &str) -> CareerResult<i64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM career_event WHERE career_id = ?1 AND event_type = ?2",
            params![career_id, event_type],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}
