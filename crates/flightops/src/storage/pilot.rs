//! Pilot records.

use rusqlite::{params, OptionalExtension, Row};
use tracing::debug;

use super::{search_clause, Storage};
use crate::error::{Error, Result};
use crate::model::Pilot;

/// Columns that `search_pilots` accepts.
pub const PILOT_SEARCH_FIELDS: &[&str] = &["first_name", "family_name"];

const SELECT_PILOT: &str = "SELECT id, first_name, family_name FROM pilot";

/// Pilot listings are always in this order.
const PILOT_ORDER: &str = "ORDER BY first_name, family_name, id";

fn pilot_from_row(row: &Row) -> rusqlite::Result<Pilot> {
    Ok(Pilot {
        id: Some(row.get(0)?),
        first_name: row.get(1)?,
        family_name: row.get(2)?,
    })
}

impl Storage {
    /// Insert a new pilot and return its id.
    ///
    /// # Errors
    ///
    /// Returns an error if either name is blank.
    pub fn add_pilot(&self, pilot: &Pilot) -> Result<i64> {
        pilot.validate()?;
        self.conn.execute(
            "INSERT INTO pilot (first_name, family_name) VALUES (?1, ?2)",
            params![pilot.first_name, pilot.family_name],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!("Added pilot {} as {}", pilot.display_name(), id);
        Ok(id)
    }

    /// Get a pilot by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_pilot(&self, id: i64) -> Result<Option<Pilot>> {
        let pilot = self
            .conn
            .query_row(&format!("{SELECT_PILOT} WHERE id = ?1"), [id], pilot_from_row)
            .optional()?;
        Ok(pilot)
    }

    /// List all pilots by first name, family name, then id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_pilots(&self) -> Result<Vec<Pilot>> {
        let mut stmt = self.conn.prepare(&format!("{SELECT_PILOT} {PILOT_ORDER}"))?;
        let pilots = stmt
            .query_map([], pilot_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(pilots)
    }

    /// Find pilots whose `field` equals `value`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSearchField`] if `field` is not searchable.
    pub fn search_pilots(&self, field: &str, value: &str) -> Result<Vec<Pilot>> {
        let clause = search_clause("pilot", PILOT_SEARCH_FIELDS, field)?;
        let mut stmt = self
            .conn
            .prepare(&format!("{SELECT_PILOT} {clause} {PILOT_ORDER}"))?;
        let pilots = stmt
            .query_map([value], pilot_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(pilots)
    }

    /// Rename a stored pilot.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no pilot has the given id.
    pub fn update_pilot(&self, id: i64, pilot: &Pilot) -> Result<()> {
        pilot.validate()?;
        let changed = self.conn.execute(
            "UPDATE pilot SET first_name = ?1, family_name = ?2 WHERE id = ?3",
            params![pilot.first_name, pilot.family_name, id],
        )?;
        if changed == 0 {
            return Err(Error::not_found("pilot", id));
        }
        Ok(())
    }

    /// Delete a pilot. Returns whether a row was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the pilot is still rostered on a flight.
    pub fn delete_pilot(&self, id: i64) -> Result<bool> {
        let deleted = self.conn.execute("DELETE FROM pilot WHERE id = ?1", [id])?;
        Ok(deleted > 0)
    }
}
