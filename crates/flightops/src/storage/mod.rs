//! Storage layer for flightops.
//!
//! A single `SQLite` database holds aircraft, airports, pilots and flights.
//! Each record type has its own module adding operations to [`Storage`].

mod aircraft;
mod airport;
mod flight;
pub mod migrations;
mod pilot;
pub mod schema;
mod seed;

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use rusqlite::types::Type;
use rusqlite::{Connection, Row};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::time::TIMESTAMP_FORMAT;

/// Handle to the flight-operations database.
#[derive(Debug)]
pub struct Storage {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
    /// Whether `open` created the file.
    created: bool,
}

impl Storage {
    /// Open or create a database at the given path.
    ///
    /// Creates parent directories as needed and brings the schema up to date.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let created = !path.exists();
        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch(
            "PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL; PRAGMA foreign_keys=ON;",
        )?;
        migrations::initialize_schema(&conn)?;

        if created {
            info!("Created database at {}", path.display());
        }
        Ok(Self {
            path,
            conn,
            created,
        })
    }

    /// Create an empty in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
            created: true,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether this handle created a brand-new database.
    #[must_use]
    pub fn was_created(&self) -> bool {
        self.created
    }

    /// Drop all data and recreate the schema.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema cannot be rebuilt.
    pub fn reset(&self) -> Result<()> {
        migrations::reset_schema(&self.conn)
    }

    /// Run `f` inside a transaction, committing only if it succeeds.
    pub(crate) fn with_transaction<T>(
        &self,
        f: impl FnOnce(&Connection) -> Result<T>,
    ) -> Result<T> {
        let tx = self.conn.unchecked_transaction()?;
        let value = f(&tx)?;
        tx.commit()?;
        Ok(value)
    }

    fn count_rows(&self, table: &str) -> Result<i64> {
        let count = self
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                row.get(0)
            })?;
        Ok(count)
    }

    /// Get database statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be queried.
    pub fn stats(&self) -> Result<StorageStats> {
        let db_size_bytes = if self.path.to_string_lossy() == ":memory:" {
            0
        } else {
            std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
        };

        Ok(StorageStats {
            schema_version: migrations::schema_version(&self.conn)?,
            aircraft: self.count_rows("aircraft")?,
            airports: self.count_rows("airport")?,
            pilots: self.count_rows("pilot")?,
            flights: self.count_rows("flight")?,
            db_size_bytes,
        })
    }
}

/// Row counts and file size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorageStats {
    /// Schema version recorded in the database.
    pub schema_version: i32,
    /// Number of aircraft.
    pub aircraft: i64,
    /// Number of airports.
    pub airports: i64,
    /// Number of pilots.
    pub pilots: i64,
    /// Number of flights.
    pub flights: i64,
    /// Size of the database file in bytes.
    pub db_size_bytes: u64,
}

/// Build the `SELECT ... WHERE field = ?1` clause for a whitelisted column.
fn search_clause(entity: &'static str, allowed: &[&str], field: &str) -> Result<String> {
    if allowed.contains(&field) {
        Ok(format!("WHERE {field} = ?1"))
    } else {
        Err(Error::invalid_search_field(entity, field))
    }
}

/// Read a stored `YYYY-MM-DD HH:MM` column.
fn timestamp_column(row: &Row, idx: usize) -> rusqlite::Result<NaiveDateTime> {
    let text: String = row.get(idx)?;
    NaiveDateTime::parse_from_str(&text, TIMESTAMP_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Read a nullable stored timestamp column.
fn optional_timestamp_column(row: &Row, idx: usize) -> rusqlite::Result<Option<NaiveDateTime>> {
    let text: Option<String> = row.get(idx)?;
    text.map(|text| {
        NaiveDateTime::parse_from_str(&text, TIMESTAMP_FORMAT)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
    })
    .transpose()
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::Storage;
    use crate::model::{Aircraft, Airport, Flight, Pilot};
    use crate::time::{ts, FlightWindow};

    /// Ids of the fixed records created by [`fixture`].
    #[derive(Debug, Clone, Copy)]
    pub struct Fixture {
        pub aircraft: i64,
        pub origin: i64,
        pub destination: i64,
    }

    pub fn create_test_storage() -> Storage {
        Storage::open_in_memory().expect("failed to create test storage")
    }

    /// One aircraft and two airports, enough to hang flights on.
    pub fn fixture(storage: &Storage) -> Fixture {
        let aircraft = storage
            .add_aircraft(&Aircraft::new("G-EUUH", "Airbus", "A320-214"))
            .unwrap();
        let origin = storage.add_airport(&Airport::new("LHR")).unwrap();
        let destination = storage.add_airport(&Airport::new("AMS")).unwrap();
        Fixture {
            aircraft,
            origin,
            destination,
        }
    }

    pub fn add_pilot(storage: &Storage, first: &str, family: &str) -> i64 {
        storage.add_pilot(&Pilot::new(first, family)).unwrap()
    }

    pub fn add_flight(
        storage: &Storage,
        fixture: Fixture,
        departure: &str,
        arrival: &str,
        pilot_id: Option<i64>,
        copilot_id: Option<i64>,
    ) -> i64 {
        let mut flight = Flight::new(
            "ZMY100",
            fixture.aircraft,
            fixture.origin,
            fixture.destination,
            FlightWindow::new(ts(departure), ts(arrival)),
        );
        flight.pilot_id = pilot_id;
        flight.copilot_id = copilot_id;
        storage.add_flight(&flight).unwrap()
    }
}
