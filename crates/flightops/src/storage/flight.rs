//! Flight records and the joined flight summary.

use chrono::NaiveDateTime;
use rusqlite::{params, OptionalExtension, Row};
use tracing::{debug, warn};

use super::{optional_timestamp_column, search_clause, timestamp_column, Storage};
use crate::error::{Error, Result};
use crate::model::{Flight, FlightStatus, FlightSummary};
use crate::time::format_timestamp;

/// Columns that `search_flights` accepts.
pub const FLIGHT_SEARCH_FIELDS: &[&str] = &[
    "flight_number",
    "aircraft_id",
    "origin_id",
    "destination_id",
    "pilot_id",
    "copilot_id",
    "status",
];

const SELECT_FLIGHT: &str = "SELECT id, flight_number, aircraft_id, origin_id, destination_id, \
     pilot_id, copilot_id, departure_time_scheduled, arrival_time_scheduled, \
     departure_time_actual, arrival_time_actual, status FROM flight";

const SELECT_SUMMARY: &str = "SELECT flight_id, flight_number, aircraft_registration, \
     aircraft_type, origin, destination, departure_time_scheduled, arrival_time_scheduled, \
     departure_time_actual, arrival_time_actual, pilot, copilot, status FROM vw_flight_summary";

const FLIGHT_ORDER: &str = "ORDER BY departure_time_scheduled, id";

fn status_column(row: &Row, idx: usize) -> rusqlite::Result<FlightStatus> {
    let status: String = row.get(idx)?;
    Ok(status.parse().unwrap_or_else(|_| {
        warn!("Unknown flight status '{}', treating as Scheduled", status);
        FlightStatus::default()
    }))
}

fn flight_from_row(row: &Row) -> rusqlite::Result<Flight> {
    Ok(Flight {
        id: Some(row.get(0)?),
        flight_number: row.get(1)?,
        aircraft_id: row.get(2)?,
        origin_id: row.get(3)?,
        destination_id: row.get(4)?,
        pilot_id: row.get(5)?,
        copilot_id: row.get(6)?,
        departure_scheduled: timestamp_column(row, 7)?,
        arrival_scheduled: timestamp_column(row, 8)?,
        departure_actual: optional_timestamp_column(row, 9)?,
        arrival_actual: optional_timestamp_column(row, 10)?,
        status: status_column(row, 11)?,
    })
}

fn summary_from_row(row: &Row) -> rusqlite::Result<FlightSummary> {
    Ok(FlightSummary {
        id: row.get(0)?,
        flight_number: row.get(1)?,
        aircraft_registration: row.get(2)?,
        aircraft_type: row.get(3)?,
        origin: row.get(4)?,
        destination: row.get(5)?,
        departure_scheduled: timestamp_column(row, 6)?,
        arrival_scheduled: timestamp_column(row, 7)?,
        departure_actual: optional_timestamp_column(row, 8)?,
        arrival_actual: optional_timestamp_column(row, 9)?,
        pilot: row.get(10)?,
        copilot: row.get(11)?,
        status: status_column(row, 12)?,
    })
}

impl Storage {
    /// Insert a new flight and return its id.
    ///
    /// Only record-level validation happens here; crew eligibility is the
    /// scheduler's job.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails or a referenced record is missing.
    pub fn add_flight(&self, flight: &Flight) -> Result<i64> {
        flight.validate()?;
        self.conn.execute(
            "INSERT INTO flight (flight_number, aircraft_id, origin_id, destination_id, \
             pilot_id, copilot_id, departure_time_scheduled, arrival_time_scheduled, \
             departure_time_actual, arrival_time_actual, status) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                flight.flight_number,
                flight.aircraft_id,
                flight.origin_id,
                flight.destination_id,
                flight.pilot_id,
                flight.copilot_id,
                format_timestamp(&flight.departure_scheduled),
                format_timestamp(&flight.arrival_scheduled),
                flight.departure_actual.as_ref().map(format_timestamp),
                flight.arrival_actual.as_ref().map(format_timestamp),
                flight.status.as_str(),
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!("Added flight {} as {}", flight.flight_number, id);
        Ok(id)
    }

    /// Get a flight by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored timestamp is corrupt.
    pub fn get_flight(&self, id: i64) -> Result<Option<Flight>> {
        let flight = self
            .conn
            .query_row(&format!("{SELECT_FLIGHT} WHERE id = ?1"), [id], flight_from_row)
            .optional()?;
        Ok(flight)
    }

    /// Get a flight by id, failing if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no flight has the given id.
    pub fn require_flight(&self, id: i64) -> Result<Flight> {
        self.get_flight(id)?
            .ok_or_else(|| Error::not_found("flight", id))
    }

    /// List every flight in scheduled departure order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored timestamp is corrupt.
    pub fn list_flights(&self) -> Result<Vec<Flight>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SELECT_FLIGHT} {FLIGHT_ORDER}"))?;
        let flights = stmt
            .query_map([], flight_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(flights)
    }

    /// Find flights whose `field` equals `value`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSearchField`] if `field` is not searchable.
    pub fn search_flights(&self, field: &str, value: &str) -> Result<Vec<Flight>> {
        let clause = search_clause("flight", FLIGHT_SEARCH_FIELDS, field)?;
        let mut stmt = self
            .conn
            .prepare(&format!("{SELECT_FLIGHT} {clause} {FLIGHT_ORDER}"))?;
        let flights = stmt
            .query_map([value], flight_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(flights)
    }

    /// Flights on which the pilot occupies either seat.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn flights_for_pilot(&self, pilot_id: i64) -> Result<Vec<Flight>> {
        let mut stmt = self.conn.prepare(&format!(
            "{SELECT_FLIGHT} WHERE pilot_id = ?1 OR copilot_id = ?1 {FLIGHT_ORDER}"
        ))?;
        let flights = stmt
            .query_map([pilot_id], flight_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(flights)
    }

    /// Replace every field of a stored flight.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no flight has the given id.
    pub fn update_flight(&self, id: i64, flight: &Flight) -> Result<()> {
        flight.validate()?;
        let changed = self.conn.execute(
            "UPDATE flight SET flight_number = ?1, aircraft_id = ?2, origin_id = ?3, \
             destination_id = ?4, pilot_id = ?5, copilot_id = ?6, \
             departure_time_scheduled = ?7, arrival_time_scheduled = ?8, \
             departure_time_actual = ?9, arrival_time_actual = ?10, status = ?11 \
             WHERE id = ?12",
            params![
                flight.flight_number,
                flight.aircraft_id,
                flight.origin_id,
                flight.destination_id,
                flight.pilot_id,
                flight.copilot_id,
                format_timestamp(&flight.departure_scheduled),
                format_timestamp(&flight.arrival_scheduled),
                flight.departure_actual.as_ref().map(format_timestamp),
                flight.arrival_actual.as_ref().map(format_timestamp),
                flight.status.as_str(),
                id,
            ],
        )?;
        if changed == 0 {
            return Err(Error::not_found("flight", id));
        }
        debug!("Updated flight {}", id);
        Ok(())
    }

    /// Record the actual departure time and mark the flight `Departed`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown flight, or a validation
    /// error if a logged arrival would then precede the departure.
    pub fn log_departure(&self, id: i64, at: NaiveDateTime) -> Result<Flight> {
        let mut flight = self.require_flight(id)?;
        flight.departure_actual = Some(at);
        flight.status = FlightStatus::Departed;
        self.update_flight(id, &flight)?;
        Ok(flight)
    }

    /// Record the actual arrival time and mark the flight `Arrived`.
    ///
    /// A flight with no logged departure is assumed to have left on schedule.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown flight, or a validation
    /// error if the arrival is not after the departure.
    pub fn log_arrival(&self, id: i64, at: NaiveDateTime) -> Result<Flight> {
        let mut flight = self.require_flight(id)?;
        flight.departure_actual.get_or_insert(flight.departure_scheduled);
        flight.arrival_actual = Some(at);
        flight.status = FlightStatus::Arrived;
        self.update_flight(id, &flight)?;
        Ok(flight)
    }

    /// Delete a flight. Returns whether a row was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails.
    pub fn delete_flight(&self, id: i64) -> Result<bool> {
        let deleted = self.conn.execute("DELETE FROM flight WHERE id = ?1", [id])?;
        Ok(deleted > 0)
    }

    /// Every flight joined with names, in scheduled departure order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_flight_summaries(&self) -> Result<Vec<FlightSummary>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SELECT_SUMMARY} ORDER BY departure_time_scheduled, flight_id"))?;
        let summaries = stmt
            .query_map([], summary_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(summaries)
    }

    /// The joined summary for one flight.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_flight_summary(&self, id: i64) -> Result<Option<FlightSummary>> {
        let summary = self
            .conn
            .query_row(
                &format!("{SELECT_SUMMARY} WHERE flight_id = ?1"),
                [id],
                summary_from_row,
            )
            .optional()?;
        Ok(summary)
    }
}
