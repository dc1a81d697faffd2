//! Schema versioning.
//!
//! The `metadata` table records which version the database is at. Opening a
//! database applies every newer migration in order inside one transaction.

use rusqlite::{Connection, OptionalExtension};
use tracing::{debug, info};

use crate::error::{Error, Result};

use super::schema::{CREATE_METADATA_TABLE, DROP_STATEMENTS, V1_STATEMENTS};

/// The schema version this build expects.
pub const CURRENT_VERSION: i32 = 1;

const VERSION_KEY: &str = "schema_version";

/// Bring the schema up to [`CURRENT_VERSION`].
///
/// # Errors
///
/// Returns an error if the stored version is unreadable, newer than this
/// build understands, or a migration statement fails.
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    conn.execute(CREATE_METADATA_TABLE, [])?;

    let version = schema_version(conn)?;
    if version > CURRENT_VERSION {
        return Err(Error::DatabaseMigration {
            message: format!(
                "database is at schema version {version}, newer than supported {CURRENT_VERSION}"
            ),
        });
    }
    if version == CURRENT_VERSION {
        debug!("Schema is current (version {})", version);
        return Ok(());
    }

    let tx = conn.unchecked_transaction()?;
    for next in (version + 1)..=CURRENT_VERSION {
        apply(&tx, next)?;
        info!("Applied schema migration {}", next);
    }
    set_schema_version(&tx, CURRENT_VERSION)?;
    tx.commit()?;
    Ok(())
}

/// Drop every table and view, then recreate the schema from scratch.
///
/// # Errors
///
/// Returns an error if any statement fails; the database is left untouched
/// in that case.
pub fn reset_schema(conn: &Connection) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    for statement in DROP_STATEMENTS {
        tx.execute(statement, [])?;
    }
    tx.commit()?;
    info!("Dropped all tables");
    initialize_schema(conn)
}

/// Read the schema version, 0 for a fresh database.
///
/// # Errors
///
/// Returns an error if the metadata table cannot be read or holds garbage.
pub fn schema_version(conn: &Connection) -> Result<i32> {
    let value: Option<String> = conn
        .query_row(
            "SELECT value FROM metadata WHERE key = ?1",
            [VERSION_KEY],
            |row| row.get(0),
        )
        .optional()?;

    match value {
        None => Ok(0),
        Some(value) => value.parse().map_err(|_| Error::DatabaseMigration {
            message: format!("invalid schema version: {value}"),
        }),
    }
}

fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO metadata (key, value) VALUES (?1, ?2)",
        (VERSION_KEY, version.to_string()),
    )?;
    Ok(())
}

fn apply(conn: &Connection, version: i32) -> Result<()> {
    let statements: &[&str] = match version {
        1 => V1_STATEMENTS,
        _ => {
            return Err(Error::DatabaseMigration {
                message: format!("unknown migration version: {version}"),
            })
        }
    };
    for statement in statements {
        conn.execute(statement, [])?;
    }
    Ok(())
}
