//! Save slots: one row per slot holding the full career document.

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};
use serde::{Deserialize, Serialize};

use crate::{
    career::Career,
    error::{CareerError, CareerResult},
    snapshot::SaveDocument,
    types::{ClubId, Matchday, SeasonIndex, Tick},
};

use super::CareerStore;

/// The header of a save slot, for listing without loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveSummary {
    pub save_id:  String,
    pub manager:  String,
    pub club_id:  ClubId,
    pub season:   SeasonIndex,
    pub matchday: Matchday,
    pub tick:     Tick,
    pub saved_at: DateTime<Utc>,
}

impl CareerStore {
    /// Write (or overwrite) a save slot.
    pub fn save_career(&self, save_id: &str, career: &Career) -> CareerResult<()> {
        let document = SaveDocument::new(career).to_json()?;
        self.conn.execute(
            "INSERT OR REPLACE INTO career_save
                (save_id, manager, club_id, season, matchday, tick, saved_at, document)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                save_id,
                career.manager().name,
                career.club_id(),
                career.season(),
                career.matchday(),
                career.calendar().tick as i64,
                Utc::now().to_rfc3339(),
                document,
            ],
        )?;
        Ok(())
    }

    pub fn load_document(&self, save_id: &str) -> CareerResult<SaveDocument> {
        let json: Option<String> = self
            .conn
            .query_row(
                "SELECT document FROM career_save WHERE save_id = ?1",
                params![save_id],
                |row| row.get(0),
            )
            .optional()?;
        let json = json.ok_or_else(|| CareerError::SaveNotFound(save_id.to_string()))?;
        SaveDocument::from_json(&json)
    }

    /// All save slots, most recent first.
    pub fn list_saves(&self) -> CareerResult<Vec<SaveSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT save_id, manager, club_id, season, matchday, tick, saved_at
             FROM career_save ORDER BY saved_at DESC, save_id ASC",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, ClubId>(2)?,
                    row.get::<_, SeasonIndex>(3)?,
                    row.get::<_, Matchday>(4)?,
                    row.get::<_, i64>(5)? as Tick,
                    row.get::<_, String>(6)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(save_id, manager, club_id, season, matchday, tick, saved_at)| {
                let saved_at = DateTime::parse_from_rfc3339(&saved_at)
                    .map_err(|e| CareerError::Other(e.into()))?
                    .with_timezone(&Utc);
                Ok(SaveSummary { save_id, manager, club_id, season, matchday, tick, saved_at })
            })
            .collect()
    }

    pub fn delete_save(&self, save_id: &str) -> CareerResult<()> {
        let removed = self.conn.execute("DELETE FROM career_save WHERE save_id = ?1", params![save_id])?;
        if removed == 0 {
            return Err(CareerError::SaveNotFound(save_id.to_string()));
        }
        Ok(())
    }
}
