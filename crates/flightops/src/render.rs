//! Terminal tables.
//!
//! Each record type has a flat row struct deriving [`Tabled`]; conversions
//! format timestamps and hours once so every listing looks the same.

use tabled::settings::{Alignment, Style};
use tabled::{Table, Tabled};

use crate::config::TableStyle;
use crate::eligibility::{PilotAssessment, PilotChoice};
use crate::model::{Aircraft, Airport, FlightSummary, Pilot};
use crate::report::DutyReportRow;
use crate::time::format_timestamp;

/// Render rows as a table in the configured style.
pub fn render_table<T: Tabled>(rows: &[T], style: TableStyle) -> String {
    let mut table = Table::new(rows);
    match style {
        TableStyle::Rounded => {
            table.with(Style::rounded());
        }
        TableStyle::Ascii => {
            table.with(Style::ascii());
        }
        TableStyle::Markdown => {
            table.with(Style::markdown());
        }
    }
    table.with(Alignment::left());
    table.to_string()
}

fn or_dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}

fn format_hours(hours: f64) -> String {
    format!("{hours:.2}")
}

/// Aircraft listing row.
#[derive(Debug, Tabled)]
pub struct AircraftRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Registration")]
    registration: String,
    #[tabled(rename = "Type")]
    type_name: String,
    #[tabled(rename = "ICAO")]
    icao_type: String,
    #[tabled(rename = "MSN")]
    serial: String,
    #[tabled(rename = "Hex")]
    icao_hex: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&Aircraft> for AircraftRow {
    fn from(aircraft: &Aircraft) -> Self {
        Self {
            id: aircraft.id.map(|id| id.to_string()).unwrap_or_default(),
            registration: aircraft.registration.clone(),
            type_name: aircraft.type_name(),
            icao_type: or_dash(aircraft.icao_type.as_deref()),
            serial: aircraft
                .manufacturer_serial_no
                .map_or_else(|| "-".to_string(), |n| n.to_string()),
            icao_hex: or_dash(aircraft.icao_hex.as_deref()),
            status: aircraft.status.to_string(),
        }
    }
}

/// Airport listing row.
#[derive(Debug, Tabled)]
pub struct AirportRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "City")]
    city: String,
    #[tabled(rename = "Country")]
    country: String,
    #[tabled(rename = "Region")]
    region: String,
}

impl From<&Airport> for AirportRow {
    fn from(airport: &Airport) -> Self {
        Self {
            id: airport.id.map(|id| id.to_string()).unwrap_or_default(),
            code: airport.code.clone(),
            name: or_dash(airport.name.as_deref()),
            city: or_dash(airport.city.as_deref()),
            country: or_dash(airport.country.as_deref()),
            region: or_dash(airport.region.as_deref()),
        }
    }
}

/// Pilot listing row.
#[derive(Debug, Tabled)]
pub struct PilotRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "First name")]
    first_name: String,
    #[tabled(rename = "Family name")]
    family_name: String,
}

impl From<&Pilot> for PilotRow {
    fn from(pilot: &Pilot) -> Self {
        Self {
            id: pilot.id.map(|id| id.to_string()).unwrap_or_default(),
            first_name: pilot.first_name.clone(),
            family_name: pilot.family_name.clone(),
        }
    }
}

/// Flight listing row, built from the joined summary.
#[derive(Debug, Tabled)]
pub struct FlightRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Flight")]
    flight_number: String,
    #[tabled(rename = "Aircraft")]
    aircraft: String,
    #[tabled(rename = "Route")]
    route: String,
    #[tabled(rename = "Departure")]
    departure: String,
    #[tabled(rename = "Arrival")]
    arrival: String,
    #[tabled(rename = "Pilot")]
    pilot: String,
    #[tabled(rename = "Copilot")]
    copilot: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&FlightSummary> for FlightRow {
    fn from(summary: &FlightSummary) -> Self {
        let departure = summary
            .departure_actual
            .unwrap_or(summary.departure_scheduled);
        let arrival = summary.arrival_actual.unwrap_or(summary.arrival_scheduled);
        Self {
            id: summary.id,
            flight_number: summary.flight_number.clone(),
            aircraft: or_dash(summary.aircraft_registration.as_deref()),
            route: format!(
                "{} > {}",
                summary.origin.as_deref().unwrap_or("?"),
                summary.destination.as_deref().unwrap_or("?")
            ),
            departure: format_timestamp(&departure),
            arrival: format_timestamp(&arrival),
            pilot: or_dash(summary.pilot.as_deref()),
            copilot: or_dash(summary.copilot.as_deref()),
            status: summary.status.to_string(),
        }
    }
}

/// A two-column field/value row for detail views.
#[derive(Debug, Tabled)]
pub struct FieldRow {
    #[tabled(rename = "Field")]
    field: String,
    #[tabled(rename = "Value")]
    value: String,
}

impl FieldRow {
    /// Create a row.
    #[must_use]
    pub fn new(field: &str, value: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            value: value.into(),
        }
    }
}

/// Field rows describing one flight in full.
#[must_use]
pub fn flight_detail(summary: &FlightSummary) -> Vec<FieldRow> {
    let optional = |ts: Option<chrono::NaiveDateTime>| {
        ts.as_ref().map_or_else(|| "-".to_string(), format_timestamp)
    };
    vec![
        FieldRow::new("ID", summary.id.to_string()),
        FieldRow::new("Flight number", summary.flight_number.clone()),
        FieldRow::new(
            "Aircraft",
            format!(
                "{} ({})",
                summary.aircraft_registration.as_deref().unwrap_or("-"),
                summary.aircraft_type.as_deref().unwrap_or("-")
            ),
        ),
        FieldRow::new("Origin", or_dash(summary.origin.as_deref())),
        FieldRow::new("Destination", or_dash(summary.destination.as_deref())),
        FieldRow::new(
            "Scheduled departure",
            format_timestamp(&summary.departure_scheduled),
        ),
        FieldRow::new(
            "Scheduled arrival",
            format_timestamp(&summary.arrival_scheduled),
        ),
        FieldRow::new("Actual departure", optional(summary.departure_actual)),
        FieldRow::new("Actual arrival", optional(summary.arrival_actual)),
        FieldRow::new("Pilot", or_dash(summary.pilot.as_deref())),
        FieldRow::new("Copilot", or_dash(summary.copilot.as_deref())),
        FieldRow::new("Status", summary.status.to_string()),
    ]
}

/// One pilot's eligibility, with the reasons.
#[derive(Debug, Tabled)]
pub struct AssessmentRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Pilot")]
    name: String,
    #[tabled(rename = "Conflicts")]
    conflicts: String,
    #[tabled(rename = "Hours (28d)")]
    existing_hours: String,
    #[tabled(rename = "+ Flight")]
    candidate_hours: String,
    #[tabled(rename = "Eligible")]
    eligible: String,
}

impl From<&PilotAssessment> for AssessmentRow {
    fn from(assessment: &PilotAssessment) -> Self {
        let conflicts = if assessment.conflicting_flights.is_empty() {
            (if assessment.conflicted { "yes" } else { "-" }).to_string()
        } else {
            assessment
                .conflicting_flights
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        };
        Self {
            id: assessment
                .pilot
                .id
                .map(|id| id.to_string())
                .unwrap_or_default(),
            name: assessment.pilot.display_name(),
            conflicts,
            existing_hours: format_hours(assessment.existing_hours),
            candidate_hours: format_hours(assessment.candidate_hours),
            eligible: if assessment.eligible { "yes" } else { "no" }.to_string(),
        }
    }
}

/// A selectable pilot.
#[derive(Debug, Tabled)]
pub struct ChoiceRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Pilot")]
    name: String,
}

impl From<&PilotChoice> for ChoiceRow {
    fn from(choice: &PilotChoice) -> Self {
        Self {
            id: choice.id,
            name: choice.display_name.clone(),
        }
    }
}

/// Duty report row.
#[derive(Debug, Tabled)]
pub struct DutyRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Pilot")]
    name: String,
    #[tabled(rename = "Flights")]
    flights: usize,
    #[tabled(rename = "Hours (28d)")]
    hours: String,
    #[tabled(rename = "Remaining")]
    remaining: String,
}

impl From<&DutyReportRow> for DutyRow {
    fn from(row: &DutyReportRow) -> Self {
        Self {
            id: row.pilot_id,
            name: row.name.clone(),
            flights: row.flights_assigned,
            hours: format_hours(row.hours_last_28_days),
            remaining: format_hours(row.remaining_hours),
        }
    }
}

/// Convert a slice of records into rows.
pub fn rows<'a, S: 'a, R: From<&'a S>>(items: &'a [S]) -> Vec<R> {
    items.iter().map(R::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FlightStatus;
    use crate::time::ts;

    fn summary() -> FlightSummary {
        FlightSummary {
            id: 1,
            flight_number: "ZMY1423".to_string(),
            aircraft_registration: Some("G-EUUH".to_string()),
            aircraft_type: Some("Airbus A320-214".to_string()),
            origin: Some("LHR".to_string()),
            destination: Some("AMS".to_string()),
            departure_scheduled: ts("2026-01-09 15:30"),
            arrival_scheduled: ts("2026-01-09 16:55"),
            departure_actual: None,
            arrival_actual: Some(ts("2026-01-09 16:50")),
            pilot: Some("Alex Morrison".to_string()),
            copilot: None,
            status: FlightStatus::Arrived,
        }
    }

    #[test]
    fn test_flight_row_prefers_actuals() {
        let row = FlightRow::from(&summary());
        assert_eq!(row.route, "LHR > AMS");
        assert_eq!(row.departure, "2026-01-09 15:30");
        assert_eq!(row.arrival, "2026-01-09 16:50");
        assert_eq!(row.copilot, "-");
    }

    #[test]
    fn test_render_contains_headers_and_values() {
        let rendered = render_table(&[FlightRow::from(&summary())], TableStyle::Rounded);
        assert!(rendered.contains("Flight"));
        assert!(rendered.contains("ZMY1423"));
        assert!(rendered.contains("Alex Morrison"));
    }

    #[test]
    fn test_markdown_style() {
        let mut pilot = Pilot::new("Emily", "Carter");
        pilot.id = Some(2);
        let rendered = render_table(&rows::<_, PilotRow>(&[pilot]), TableStyle::Markdown);
        assert!(rendered.lines().any(|line| line.starts_with('|')));
        assert!(rendered.contains("Carter"));
    }

    #[test]
    fn test_flight_detail_lists_every_field() {
        let detail = flight_detail(&summary());
        assert_eq!(detail.len(), 12);
        assert_eq!(detail[7].value, "-");
        assert_eq!(detail[8].value, "2026-01-09 16:50");
    }

    #[test]
    fn test_assessment_row() {
        let mut pilot = Pilot::new("Alex", "Morrison");
        pilot.id = Some(1);
        let assessment = PilotAssessment {
            pilot,
            conflicted: true,
            conflicting_flights: vec![3, 9],
            existing_hours: 12.5,
            candidate_hours: 1.0,
            eligible: false,
        };
        let row = AssessmentRow::from(&assessment);
        assert_eq!(row.conflicts, "3, 9");
        assert_eq!(row.existing_hours, "12.50");
        assert_eq!(row.eligible, "no");
    }
}
