use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::patterns;
use crate::error::{Error, Result};
use crate::time::{format_timestamp, FlightWindow};

/// Lifecycle status of a flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FlightStatus {
    /// Planned, nothing to report yet.
    #[default]
    Scheduled,
    /// Expected to leave on schedule.
    OnTime,
    /// Expected to leave late.
    Delayed,
    /// Passengers boarding.
    Boarding,
    /// Doors closed.
    Closed,
    /// Airborne.
    Departed,
    /// Landed.
    Arrived,
}

impl FlightStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [Self; 7] = [
        Self::Scheduled,
        Self::OnTime,
        Self::Delayed,
        Self::Boarding,
        Self::Closed,
        Self::Departed,
        Self::Arrived,
    ];

    /// The stored representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "Scheduled",
            Self::OnTime => "On time",
            Self::Delayed => "Delayed",
            Self::Boarding => "Boarding",
            Self::Closed => "Closed",
            Self::Departed => "Departed",
            Self::Arrived => "Arrived",
        }
    }
}

impl std::fmt::Display for FlightStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FlightStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().replace(['_', '-'], " ");
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| Error::validation("status", format!("unknown flight status '{s}'")))
    }
}

/// The seat a pilot occupies on a flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrewRole {
    /// Pilot in command.
    Pilot,
    /// Second in command.
    Copilot,
}

impl std::fmt::Display for CrewRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pilot => write!(f, "pilot"),
            Self::Copilot => write!(f, "copilot"),
        }
    }
}

/// A scheduled flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flight {
    /// Row id, `None` until stored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Commercial flight number. Not unique: the same number recurs.
    pub flight_number: String,
    /// Operating aircraft.
    pub aircraft_id: i64,
    /// Departure airport.
    pub origin_id: i64,
    /// Arrival airport.
    pub destination_id: i64,
    /// Assigned pilot, if any.
    pub pilot_id: Option<i64>,
    /// Assigned copilot, if any.
    pub copilot_id: Option<i64>,
    /// Scheduled departure.
    pub departure_scheduled: NaiveDateTime,
    /// Scheduled arrival.
    pub arrival_scheduled: NaiveDateTime,
    /// Logged departure.
    pub departure_actual: Option<NaiveDateTime>,
    /// Logged arrival.
    pub arrival_actual: Option<NaiveDateTime>,
    /// Current status.
    pub status: FlightStatus,
}

impl Flight {
    /// Create an unsaved, uncrewed flight in `Scheduled` status.
    #[must_use]
    pub fn new(
        flight_number: impl Into<String>,
        aircraft_id: i64,
        origin_id: i64,
        destination_id: i64,
        window: FlightWindow,
    ) -> Self {
        Self {
            id: None,
            flight_number: flight_number.into(),
            aircraft_id,
            origin_id,
            destination_id,
            pilot_id: None,
            copilot_id: None,
            departure_scheduled: window.departure,
            arrival_scheduled: window.arrival,
            departure_actual: None,
            arrival_actual: None,
            status: FlightStatus::Scheduled,
        }
    }

    /// The scheduled departure/arrival window.
    #[must_use]
    pub fn scheduled_window(&self) -> FlightWindow {
        FlightWindow::new(self.departure_scheduled, self.arrival_scheduled)
    }

    /// The window actually flown, falling back to the schedule for any time
    /// not yet logged.
    #[must_use]
    pub fn flown_window(&self) -> FlightWindow {
        FlightWindow::new(
            self.departure_actual.unwrap_or(self.departure_scheduled),
            self.arrival_actual.unwrap_or(self.arrival_scheduled),
        )
    }

    /// Assigned crew, one entry per occupied seat.
    pub fn crew(&self) -> impl Iterator<Item = (CrewRole, i64)> {
        [
            (CrewRole::Pilot, self.pilot_id),
            (CrewRole::Copilot, self.copilot_id),
        ]
        .into_iter()
        .filter_map(|(role, id)| id.map(|id| (role, id)))
    }

    /// Whether the given pilot occupies either seat.
    #[must_use]
    pub fn is_crewed_by(&self, pilot_id: i64) -> bool {
        self.crew().any(|(_, id)| id == pilot_id)
    }

    /// Check field formats and cross-field invariants.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] naming the first broken rule.
    pub fn validate(&self) -> Result<()> {
        patterns::flight_number().check(&self.flight_number)?;

        if !self.scheduled_window().is_well_formed() {
            return Err(Error::validation(
                "arrival_time_scheduled",
                "must be after the scheduled departure",
            ));
        }

        if let (Some(departure), Some(arrival)) = (self.departure_actual, self.arrival_actual) {
            if arrival <= departure {
                return Err(Error::validation(
                    "arrival_time_actual",
                    "must be after the actual departure",
                ));
            }
        }

        if self.origin_id == self.destination_id {
            return Err(Error::validation(
                "destination_id",
                "must differ from the origin",
            ));
        }

        if let (Some(pilot), Some(copilot)) = (self.pilot_id, self.copilot_id) {
            if pilot == copilot {
                return Err(Error::validation(
                    "copilot_id",
                    "the same pilot cannot fly both seats",
                ));
            }
        }

        Ok(())
    }
}

impl std::fmt::Display for Flight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(id) = self.id {
            write!(f, "{id}. ")?;
        }
        write!(
            f,
            "{} (dept. {})",
            self.flight_number,
            format_timestamp(&self.departure_scheduled)
        )
    }
}

/// A flight joined with the names of its aircraft, airports and crew.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlightSummary {
    /// Flight row id.
    pub id: i64,
    /// Flight number.
    pub flight_number: String,
    /// Aircraft registration.
    pub aircraft_registration: Option<String>,
    /// Manufacturer and model.
    pub aircraft_type: Option<String>,
    /// Origin airport code.
    pub origin: Option<String>,
    /// Destination airport code.
    pub destination: Option<String>,
    /// Scheduled departure.
    pub departure_scheduled: NaiveDateTime,
    /// Scheduled arrival.
    pub arrival_scheduled: NaiveDateTime,
    /// Logged departure.
    pub departure_actual: Option<NaiveDateTime>,
    /// Logged arrival.
    pub arrival_actual: Option<NaiveDateTime>,
    /// Pilot display name.
    pub pilot: Option<String>,
    /// Copilot display name.
    pub copilot: Option<String>,
    /// Current status.
    pub status: FlightStatus,
}
