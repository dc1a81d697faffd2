//! `SQLite` schema definitions for flightops.

/// Aircraft table.
pub const CREATE_AIRCRAFT_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS aircraft (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    registration TEXT NOT NULL UNIQUE,
    manufacturer_serial_no INTEGER UNIQUE,
    icao_hex TEXT UNIQUE,
    manufacturer TEXT NOT NULL,
    model TEXT NOT NULL,
    icao_type TEXT,
    status TEXT NOT NULL DEFAULT 'Active'
        CHECK(status IN ('Active', 'Inactive', 'Decommissioned'))
)
";

/// Airport table.
pub const CREATE_AIRPORT_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS airport (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    code TEXT NOT NULL UNIQUE,
    name TEXT,
    city TEXT,
    country TEXT,
    region TEXT
)
";

/// Pilot table.
pub const CREATE_PILOT_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS pilot (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name TEXT NOT NULL,
    family_name TEXT NOT NULL
)
";

/// Flight table. Timestamps are `YYYY-MM-DD HH:MM` text.
pub const CREATE_FLIGHT_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS flight (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    flight_number TEXT NOT NULL,
    aircraft_id INTEGER NOT NULL,
    origin_id INTEGER NOT NULL,
    destination_id INTEGER NOT NULL,
    pilot_id INTEGER,
    copilot_id INTEGER,
    departure_time_scheduled TEXT NOT NULL,
    arrival_time_scheduled TEXT NOT NULL,
    departure_time_actual TEXT,
    arrival_time_actual TEXT,
    status TEXT NOT NULL DEFAULT 'Scheduled'
        CHECK(status IN ('Scheduled', 'On time', 'Delayed', 'Boarding', 'Closed', 'Departed', 'Arrived')),
    FOREIGN KEY(aircraft_id) REFERENCES aircraft(id),
    FOREIGN KEY(origin_id) REFERENCES airport(id),
    FOREIGN KEY(destination_id) REFERENCES airport(id),
    FOREIGN KEY(pilot_id) REFERENCES pilot(id),
    FOREIGN KEY(copilot_id) REFERENCES pilot(id)
)
";

/// Index for crew lookups in the pilot seat.
pub const CREATE_FLIGHT_PILOT_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_flight_pilot ON flight(pilot_id)
";

/// Index for crew lookups in the copilot seat.
pub const CREATE_FLIGHT_COPILOT_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_flight_copilot ON flight(copilot_id)
";

/// Index for chronological listings.
pub const CREATE_FLIGHT_DEPARTURE_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_flight_departure ON flight(departure_time_scheduled)
";

/// Flights joined with aircraft, airport and crew names.
pub const CREATE_FLIGHT_SUMMARY_VIEW: &str = r"
CREATE VIEW IF NOT EXISTS vw_flight_summary AS
    SELECT
        f.id AS flight_id,
        f.flight_number,
        ac.registration AS aircraft_registration,
        ac.manufacturer || ' ' || ac.model AS aircraft_type,
        apo.code AS origin,
        apd.code AS destination,
        f.departure_time_scheduled,
        f.arrival_time_scheduled,
        f.departure_time_actual,
        f.arrival_time_actual,
        p.first_name || ' ' || p.family_name AS pilot,
        cp.first_name || ' ' || cp.family_name AS copilot,
        f.status
    FROM flight f
    LEFT JOIN aircraft ac ON ac.id = f.aircraft_id
    LEFT JOIN pilot p ON p.id = f.pilot_id
    LEFT JOIN pilot cp ON cp.id = f.copilot_id
    LEFT JOIN airport apo ON apo.id = f.origin_id
    LEFT JOIN airport apd ON apd.id = f.destination_id
";

/// Key-value metadata (schema version).
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// Statements making up schema version 1, in dependency order.
pub const V1_STATEMENTS: &[&str] = &[
    CREATE_AIRCRAFT_TABLE,
    CREATE_AIRPORT_TABLE,
    CREATE_PILOT_TABLE,
    CREATE_FLIGHT_TABLE,
    CREATE_FLIGHT_PILOT_INDEX,
    CREATE_FLIGHT_COPILOT_INDEX,
    CREATE_FLIGHT_DEPARTURE_INDEX,
    CREATE_FLIGHT_SUMMARY_VIEW,
];

/// Statements that remove every schema object, dependents first.
pub const DROP_STATEMENTS: &[&str] = &[
    "DROP VIEW IF EXISTS vw_flight_summary",
    "DROP TABLE IF EXISTS flight",
    "DROP TABLE IF EXISTS aircraft",
    "DROP TABLE IF EXISTS pilot",
    "DROP TABLE IF EXISTS airport",
    "DROP TABLE IF EXISTS metadata",
];
