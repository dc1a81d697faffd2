//! Aircraft records.

use rusqlite::{params, OptionalExtension, Row};
use tracing::{debug, warn};

use super::{search_clause, Storage};
use crate::error::{Error, Result};
use crate::model::{Aircraft, AircraftStatus};

/// Columns that `search_aircraft` accepts.
pub const AIRCRAFT_SEARCH_FIELDS: &[&str] = &[
    "registration",
    "manufacturer_serial_no",
    "icao_hex",
    "manufacturer",
    "model",
    "icao_type",
    "status",
];

const SELECT_AIRCRAFT: &str = "SELECT id, registration, manufacturer_serial_no, icao_hex, \
     manufacturer, model, icao_type, status FROM aircraft";

fn aircraft_from_row(row: &Row) -> rusqlite::Result<Aircraft> {
    let status: String = row.get(7)?;
    let status = status.parse().unwrap_or_else(|_| {
        warn!("Unknown aircraft status '{}', treating as Active", status);
        AircraftStatus::default()
    });

    Ok(Aircraft {
        id: Some(row.get(0)?),
        registration: row.get(1)?,
        manufacturer_serial_no: row.get(2)?,
        icao_hex: row.get(3)?,
        manufacturer: row.get(4)?,
        model: row.get(5)?,
        icao_type: row.get(6)?,
        status,
    })
}

impl Storage {
    /// Insert a new aircraft and return its id.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails or a unique column collides.
    pub fn add_aircraft(&self, aircraft: &Aircraft) -> Result<i64> {
        aircraft.validate()?;
        self.conn.execute(
            "INSERT INTO aircraft (registration, manufacturer_serial_no, icao_hex, \
             manufacturer, model, icao_type, status) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                aircraft.registration,
                aircraft.manufacturer_serial_no,
                aircraft.icao_hex,
                aircraft.manufacturer,
                aircraft.model,
                aircraft.icao_type,
                aircraft.status.as_str(),
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!("Added aircraft {} as {}", aircraft.registration, id);
        Ok(id)
    }

    /// Get an aircraft by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_aircraft(&self, id: i64) -> Result<Option<Aircraft>> {
        let aircraft = self
            .conn
            .query_row(
                &format!("{SELECT_AIRCRAFT} WHERE id = ?1"),
                [id],
                aircraft_from_row,
            )
            .optional()?;
        Ok(aircraft)
    }

    /// Get an aircraft by its registration mark.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_aircraft_by_registration(&self, registration: &str) -> Result<Option<Aircraft>> {
        let aircraft = self
            .conn
            .query_row(
                &format!("{SELECT_AIRCRAFT} WHERE registration = ?1"),
                [registration],
                aircraft_from_row,
            )
            .optional()?;
        Ok(aircraft)
    }

    /// List all aircraft ordered by registration.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_aircraft(&self) -> Result<Vec<Aircraft>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SELECT_AIRCRAFT} ORDER BY registration"))?;
        let aircraft = stmt
            .query_map([], aircraft_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(aircraft)
    }

    /// Find aircraft whose `field` equals `value`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSearchField`] if `field` is not searchable.
    pub fn search_aircraft(&self, field: &str, value: &str) -> Result<Vec<Aircraft>> {
        let clause = search_clause("aircraft", AIRCRAFT_SEARCH_FIELDS, field)?;
        let mut stmt = self
            .conn
            .prepare(&format!("{SELECT_AIRCRAFT} {clause} ORDER BY registration"))?;
        let aircraft = stmt
            .query_map([value], aircraft_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(aircraft)
    }

    /// Replace every field of a stored aircraft.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no aircraft has the given id.
    pub fn update_aircraft(&self, id: i64, aircraft: &Aircraft) -> Result<()> {
        aircraft.validate()?;
        let changed = self.conn.execute(
            "UPDATE aircraft SET registration = ?1, manufacturer_serial_no = ?2, icao_hex = ?3, \
             manufacturer = ?4, model = ?5, icao_type = ?6, status = ?7 WHERE id = ?8",
            params![
                aircraft.registration,
                aircraft.manufacturer_serial_no,
                aircraft.icao_hex,
                aircraft.manufacturer,
                aircraft.model,
                aircraft.icao_type,
                aircraft.status.as_str(),
                id,
            ],
        )?;
        if changed == 0 {
            return Err(Error::not_found("aircraft", id));
        }
        Ok(())
    }

    /// Delete an aircraft. Returns whether a row was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if flights still reference the aircraft.
    pub fn delete_aircraft(&self, id: i64) -> Result<bool> {
        let deleted = self.conn.execute("DELETE FROM aircraft WHERE id = ?1", [id])?;
        Ok(deleted > 0)
    }
}
