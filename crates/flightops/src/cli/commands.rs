//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use chrono::NaiveDateTime;
use clap::{Args, Subcommand};

use crate::model::{AircraftStatus, FlightStatus};
use crate::time::parse_timestamp;

fn parse_timestamp_arg(value: &str) -> Result<NaiveDateTime, String> {
    parse_timestamp(value).map_err(|e| e.to_string())
}

fn parse_flight_status(value: &str) -> Result<FlightStatus, String> {
    value.parse().map_err(|e: crate::Error| e.to_string())
}

fn parse_aircraft_status(value: &str) -> Result<AircraftStatus, String> {
    value.parse().map_err(|e: crate::Error| e.to_string())
}

/// Flight commands.
#[derive(Debug, Subcommand)]
pub enum FlightCommand {
    /// List all flights in departure order
    List {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show one flight in full
    Show {
        /// Flight id
        id: i64,
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Find flights where a field equals a value
    Search(SearchArgs),

    /// Schedule a new flight
    Add(NewFlightArgs),

    /// Change a flight; omitted fields keep their values
    Update {
        /// Flight id
        id: i64,
        #[command(flatten)]
        changes: FlightChanges,
    },

    /// Delete a flight
    Delete {
        /// Flight id
        id: i64,
    },

    /// Set the crew of a flight
    Assign {
        /// Flight id
        id: i64,
        /// Pilot id for the captain's seat
        #[arg(long, conflicts_with = "clear_pilot")]
        pilot: Option<i64>,
        /// Pilot id for the copilot's seat
        #[arg(long, conflicts_with = "clear_copilot")]
        copilot: Option<i64>,
        /// Leave the captain's seat empty
        #[arg(long)]
        clear_pilot: bool,
        /// Leave the copilot's seat empty
        #[arg(long)]
        clear_copilot: bool,
    },

    /// Log the actual departure and mark the flight departed
    Depart {
        /// Flight id
        id: i64,
        /// Departure time (YYYY-MM-DD HH:MM), default now
        #[arg(long, value_parser = parse_timestamp_arg)]
        at: Option<NaiveDateTime>,
    },

    /// Log the actual arrival and mark the flight arrived
    Arrive {
        /// Flight id
        id: i64,
        /// Arrival time (YYYY-MM-DD HH:MM), default now
        #[arg(long, value_parser = parse_timestamp_arg)]
        at: Option<NaiveDateTime>,
    },
}

/// Field/value search arguments shared by every record type.
#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Column to match
    pub field: String,
    /// Exact value to match
    pub value: String,
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Arguments for a new flight.
#[derive(Debug, Args)]
pub struct NewFlightArgs {
    /// Flight number, e.g. ZMY1423
    #[arg(long)]
    pub number: String,
    /// Aircraft id or registration
    #[arg(long)]
    pub aircraft: String,
    /// Origin airport id or code
    #[arg(long)]
    pub origin: String,
    /// Destination airport id or code
    #[arg(long)]
    pub destination: String,
    /// Scheduled departure (YYYY-MM-DD HH:MM)
    #[arg(long, value_parser = parse_timestamp_arg)]
    pub departure: NaiveDateTime,
    /// Scheduled arrival (YYYY-MM-DD HH:MM)
    #[arg(long, value_parser = parse_timestamp_arg)]
    pub arrival: NaiveDateTime,
    /// Pilot id for the captain's seat
    #[arg(long)]
    pub pilot: Option<i64>,
    /// Pilot id for the copilot's seat
    #[arg(long)]
    pub copilot: Option<i64>,
    /// Initial status
    #[arg(long, value_parser = parse_flight_status, default_value = "Scheduled")]
    pub status: FlightStatus,
}

/// Changes to an existing flight.
#[derive(Debug, Args)]
pub struct FlightChanges {
    /// New flight number
    #[arg(long)]
    pub number: Option<String>,
    /// New aircraft id or registration
    #[arg(long)]
    pub aircraft: Option<String>,
    /// New origin airport id or code
    #[arg(long)]
    pub origin: Option<String>,
    /// New destination airport id or code
    #[arg(long)]
    pub destination: Option<String>,
    /// New scheduled departure
    #[arg(long, value_parser = parse_timestamp_arg)]
    pub departure: Option<NaiveDateTime>,
    /// New scheduled arrival
    #[arg(long, value_parser = parse_timestamp_arg)]
    pub arrival: Option<NaiveDateTime>,
    /// New status
    #[arg(long, value_parser = parse_flight_status)]
    pub status: Option<FlightStatus>,
}

/// Pilot commands.
#[derive(Debug, Subcommand)]
pub enum PilotCommand {
    /// List all pilots
    List {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show one pilot
    Show {
        /// Pilot id
        id: i64,
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Find pilots where a field equals a value
    Search(SearchArgs),

    /// Add a pilot
    Add {
        /// Given name
        first_name: String,
        /// Family name
        family_name: String,
    },

    /// Rename a pilot
    Update {
        /// Pilot id
        id: i64,
        /// New given name
        #[arg(long)]
        first_name: Option<String>,
        /// New family name
        #[arg(long)]
        family_name: Option<String>,
    },

    /// Delete a pilot with no rostered flights
    Delete {
        /// Pilot id
        id: i64,
    },

    /// List the flights a pilot is rostered on
    Flights {
        /// Pilot id
        id: i64,
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// List pilots free to crew a flight window
    Available(AvailableArgs),
}

/// Arguments for the availability query.
#[derive(Debug, Args)]
pub struct AvailableArgs {
    /// Candidate departure (YYYY-MM-DD HH:MM)
    #[arg(long, value_parser = parse_timestamp_arg)]
    pub departure: NaiveDateTime,
    /// Candidate arrival (YYYY-MM-DD HH:MM)
    #[arg(long, value_parser = parse_timestamp_arg)]
    pub arrival: NaiveDateTime,
    /// Flight being edited, ignored for conflicts and hours
    #[arg(long)]
    pub exclude_flight: Option<i64>,
    /// Pilot already chosen for the other seat
    #[arg(long)]
    pub exclude_pilot: Option<i64>,
    /// Show every pilot with conflicts and hours
    #[arg(long)]
    pub explain: bool,
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Airport commands.
#[derive(Debug, Subcommand)]
pub enum AirportCommand {
    /// List all airports
    List {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show one airport
    Show {
        /// Airport id or code
        airport: String,
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Find airports where a field equals a value
    Search(SearchArgs),

    /// Add an airport
    Add {
        /// Airport code, e.g. LHR
        code: String,
        #[command(flatten)]
        details: AirportDetails,
    },

    /// Change an airport; omitted fields keep their values
    Update {
        /// Airport id
        id: i64,
        /// New airport code
        #[arg(long)]
        code: Option<String>,
        #[command(flatten)]
        details: AirportDetails,
    },

    /// Delete an airport no flight uses
    Delete {
        /// Airport id
        id: i64,
    },
}

/// Optional airport fields.
#[derive(Debug, Args)]
pub struct AirportDetails {
    /// Full name
    #[arg(long)]
    pub name: Option<String>,
    /// City served
    #[arg(long)]
    pub city: Option<String>,
    /// Country
    #[arg(long)]
    pub country: Option<String>,
    /// World region
    #[arg(long)]
    pub region: Option<String>,
}

/// Aircraft commands.
#[derive(Debug, Subcommand)]
pub enum AircraftCommand {
    /// List the fleet
    List {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show one aircraft
    Show {
        /// Aircraft id or registration
        aircraft: String,
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Find aircraft where a field equals a value
    Search(SearchArgs),

    /// Add an aircraft
    Add {
        /// Registration mark, e.g. G-EUUH
        registration: String,
        /// Manufacturer, e.g. Airbus
        #[arg(long)]
        manufacturer: String,
        /// Model, e.g. A320-214
        #[arg(long)]
        model: String,
        #[command(flatten)]
        details: AircraftDetails,
    },

    /// Change an aircraft; omitted fields keep their values
    Update {
        /// Aircraft id
        id: i64,
        /// New registration
        #[arg(long)]
        registration: Option<String>,
        /// New manufacturer
        #[arg(long)]
        manufacturer: Option<String>,
        /// New model
        #[arg(long)]
        model: Option<String>,
        #[command(flatten)]
        details: AircraftDetails,
    },

    /// Delete an aircraft no flight uses
    Delete {
        /// Aircraft id
        id: i64,
    },
}

/// Optional aircraft fields.
#[derive(Debug, Args)]
pub struct AircraftDetails {
    /// Manufacturer serial number
    #[arg(long)]
    pub serial: Option<i64>,
    /// ICAO 24-bit address, six hex digits
    #[arg(long)]
    pub icao_hex: Option<String>,
    /// ICAO type designator, e.g. A320
    #[arg(long)]
    pub icao_type: Option<String>,
    /// Operational status
    #[arg(long, value_parser = parse_aircraft_status)]
    pub status: Option<AircraftStatus>,
}

/// Report commands.
#[derive(Debug, Subcommand)]
pub enum ReportCommand {
    /// Rolling duty hours per pilot
    Duty {
        /// Report time (YYYY-MM-DD HH:MM), default now
        #[arg(long, value_parser = parse_timestamp_arg)]
        as_of: Option<NaiveDateTime>,
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
}

/// Database administration commands.
#[derive(Debug, Subcommand)]
pub enum AdminCommand {
    /// Drop all data and recreate the tables
    Init {
        /// Load the demo data afterwards
        #[arg(long)]
        seed: bool,
        /// Confirm that all data will be lost
        #[arg(short, long)]
        yes: bool,
    },

    /// Load the demo data into an empty database
    Seed,

    /// Show database location, schema version and row counts
    Status {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp_arg() {
        assert!(parse_timestamp_arg("2026-01-09 15:30").is_ok());
        assert!(parse_timestamp_arg("2026-01-09T15:30").is_ok());
        let err = parse_timestamp_arg("tomorrow").unwrap_err();
        assert!(err.contains("YYYY-MM-DD HH:MM"));
    }

    #[test]
    fn test_parse_flight_status() {
        assert_eq!(parse_flight_status("on-time").unwrap(), FlightStatus::OnTime);
        assert!(parse_flight_status("Cancelled").is_err());
    }

    #[test]
    fn test_parse_aircraft_status() {
        assert_eq!(
            parse_aircraft_status("inactive").unwrap(),
            AircraftStatus::Inactive
        );
    }
}
