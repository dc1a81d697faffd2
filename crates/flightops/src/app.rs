//! Command execution.
//!
//! [`App`] owns the configuration and the open store and turns parsed
//! commands into storage calls and rendered output. One-shot invocations and
//! the interactive shell both go through [`App::execute`].

use std::collections::HashSet;
use std::io::Write;

use serde::Serialize;
use tabled::Tabled;
use tracing::{info, warn};

use crate::cli::{
    AdminCommand, AircraftCommand, AircraftDetails, AirportCommand, AirportDetails,
    AvailableArgs, Command, ConfigCommand, FlightChanges, FlightCommand, NewFlightArgs,
    PilotCommand, ReportCommand, SearchArgs,
};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::{Aircraft, Airport, Flight, FlightSummary, Pilot};
use crate::render::{
    flight_detail, render_table, rows, AircraftRow, AirportRow, AssessmentRow, ChoiceRow,
    DutyRow, FieldRow, FlightRow, PilotRow,
};
use crate::report::duty_report;
use crate::scheduler::Scheduler;
use crate::storage::Storage;
use crate::time::{format_timestamp, now, FlightWindow};

/// An open flight-operations store plus the settings used to present it.
#[derive(Debug)]
pub struct App {
    config: Config,
    storage: Storage,
}

impl App {
    /// Open the configured database, loading the demo data into a new one
    /// when `seed_on_create` is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or seeded.
    pub fn open(config: Config) -> Result<Self> {
        let storage = Storage::open(config.database_path())?;
        Self::with_storage(config, storage)
    }

    /// Wrap an already open store.
    ///
    /// # Errors
    ///
    /// Returns an error if seeding a newly created store fails.
    pub fn with_storage(config: Config, storage: Storage) -> Result<Self> {
        if storage.was_created() && config.storage.seed_on_create {
            storage.seed_demo_data()?;
        }
        Ok(Self { config, storage })
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The underlying store.
    #[must_use]
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Run one command, writing its output to `out`.
    ///
    /// # Errors
    ///
    /// Returns validation, lookup, eligibility or storage errors from the
    /// command, or an I/O error if `out` cannot be written.
    pub fn execute(&self, command: Command, out: &mut dyn Write) -> Result<()> {
        match command {
            Command::Flights(cmd) => self.flights(cmd, out),
            Command::Pilots(cmd) => self.pilots(cmd, out),
            Command::Airports(cmd) => self.airports(cmd, out),
            Command::Aircraft(cmd) => self.aircraft(cmd, out),
            Command::Report(cmd) => self.report(cmd, out),
            Command::Admin(cmd) => self.admin(cmd, out),
            Command::Config(cmd) => run_config(&self.config, cmd, out),
            Command::Shell => {
                writeln!(out, "Already in the shell.")?;
                Ok(())
            }
        }
    }

    fn scheduler(&self) -> Scheduler<'_> {
        Scheduler::new(&self.storage)
    }

    fn table<'a, S, R>(&self, out: &mut dyn Write, items: &'a [S], empty: &str) -> Result<()>
    where
        R: Tabled + From<&'a S>,
    {
        if items.is_empty() {
            writeln!(out, "{empty}")?;
        } else {
            let table_rows: Vec<R> = rows(items);
            writeln!(out, "{}", render_table(&table_rows, self.config.interface.table_style))?;
        }
        Ok(())
    }

    // === Flights ===

    fn flights(&self, cmd: FlightCommand, out: &mut dyn Write) -> Result<()> {
        match cmd {
            FlightCommand::List { json } => {
                let summaries = self.storage.list_flight_summaries()?;
                if json {
                    write_json(out, &summaries)
                } else {
                    self.table::<_, FlightRow>(out, &summaries, "No flights.")
                }
            }
            FlightCommand::Show { id, json } => {
                let summary = self
                    .storage
                    .get_flight_summary(id)?
                    .ok_or_else(|| Error::not_found("flight", id))?;
                if json {
                    write_json(out, &summary)
                } else {
                    let detail = flight_detail(&summary);
                    writeln!(out, "{}", render_table(&detail, self.config.interface.table_style))?;
                    Ok(())
                }
            }
            FlightCommand::Search(SearchArgs { field, value, json }) => {
                let flights = self.storage.search_flights(&field, &value)?;
                let summaries = self.summaries_for(&flights)?;
                if json {
                    write_json(out, &summaries)
                } else {
                    self.table::<_, FlightRow>(out, &summaries, "No matching flights.")
                }
            }
            FlightCommand::Add(args) => {
                let flight = self.new_flight(args)?;
                let id = self.scheduler().add_flight(&flight)?;
                writeln!(out, "Added flight {} as {id}", flight.flight_number)?;
                Ok(())
            }
            FlightCommand::Update { id, changes } => {
                let mut flight = self.storage.require_flight(id)?;
                self.apply_flight_changes(&mut flight, changes)?;
                self.scheduler().update_flight(id, &flight)?;
                writeln!(out, "Updated flight {id}")?;
                Ok(())
            }
            FlightCommand::Delete { id } => {
                if !self.storage.delete_flight(id)? {
                    return Err(Error::not_found("flight", id));
                }
                writeln!(out, "Deleted flight {id}")?;
                Ok(())
            }
            FlightCommand::Assign {
                id,
                pilot,
                copilot,
                clear_pilot,
                clear_copilot,
            } => {
                let current = self.storage.require_flight(id)?;
                let pilot = if clear_pilot {
                    None
                } else {
                    pilot.or(current.pilot_id)
                };
                let copilot = if clear_copilot {
                    None
                } else {
                    copilot.or(current.copilot_id)
                };
                let flight = self.scheduler().assign_crew(id, pilot, copilot)?;
                writeln!(
                    out,
                    "Crew for {}: pilot {}, copilot {}",
                    flight.flight_number,
                    self.pilot_label(flight.pilot_id)?,
                    self.pilot_label(flight.copilot_id)?
                )?;
                Ok(())
            }
            FlightCommand::Depart { id, at } => {
                let at = at.unwrap_or_else(now);
                let flight = self.storage.log_departure(id, at)?;
                writeln!(
                    out,
                    "{} departed at {}",
                    flight.flight_number,
                    format_timestamp(&at)
                )?;
                Ok(())
            }
            FlightCommand::Arrive { id, at } => {
                let at = at.unwrap_or_else(now);
                let flight = self.storage.log_arrival(id, at)?;
                writeln!(
                    out,
                    "{} arrived at {} ({:.2} h flown)",
                    flight.flight_number,
                    format_timestamp(&at),
                    flight.flown_window().duration_hours()
                )?;
                Ok(())
            }
        }
    }

    fn new_flight(&self, args: NewFlightArgs) -> Result<Flight> {
        let aircraft = self.resolve_aircraft(&args.aircraft)?;
        let origin = self.resolve_airport(&args.origin)?;
        let destination = self.resolve_airport(&args.destination)?;

        let mut flight = Flight::new(
            args.number,
            record_id(aircraft.id)?,
            record_id(origin.id)?,
            record_id(destination.id)?,
            FlightWindow::new(args.departure, args.arrival),
        );
        flight.pilot_id = args.pilot;
        flight.copilot_id = args.copilot;
        flight.status = args.status;
        Ok(flight)
    }

    fn apply_flight_changes(&self, flight: &mut Flight, changes: FlightChanges) -> Result<()> {
        if let Some(number) = changes.number {
            flight.flight_number = number;
        }
        if let Some(aircraft) = changes.aircraft {
            flight.aircraft_id = record_id(self.resolve_aircraft(&aircraft)?.id)?;
        }
        if let Some(origin) = changes.origin {
            flight.origin_id = record_id(self.resolve_airport(&origin)?.id)?;
        }
        if let Some(destination) = changes.destination {
            flight.destination_id = record_id(self.resolve_airport(&destination)?.id)?;
        }
        if let Some(departure) = changes.departure {
            flight.departure_scheduled = departure;
        }
        if let Some(arrival) = changes.arrival {
            flight.arrival_scheduled = arrival;
        }
        if let Some(status) = changes.status {
            flight.status = status;
        }
        Ok(())
    }

    fn summaries_for(&self, flights: &[Flight]) -> Result<Vec<FlightSummary>> {
        let ids: HashSet<i64> = flights.iter().filter_map(|f| f.id).collect();
        Ok(self
            .storage
            .list_flight_summaries()?
            .into_iter()
            .filter(|summary| ids.contains(&summary.id))
            .collect())
    }

    fn pilot_label(&self, pilot_id: Option<i64>) -> Result<String> {
        let Some(id) = pilot_id else {
            return Ok("-".to_string());
        };
        Ok(self
            .storage
            .get_pilot(id)?
            .map_or_else(|| id.to_string(), |p| p.display_name()))
    }

    // === Pilots ===

    fn pilots(&self, cmd: PilotCommand, out: &mut dyn Write) -> Result<()> {
        match cmd {
            PilotCommand::List { json } => {
                let pilots = self.storage.list_pilots()?;
                if json {
                    write_json(out, &pilots)
                } else {
                    self.table::<_, PilotRow>(out, &pilots, "No pilots.")
                }
            }
            PilotCommand::Show { id, json } => {
                let pilot = self.require_pilot(id)?;
                if json {
                    write_json(out, &pilot)
                } else {
                    self.table::<_, PilotRow>(out, std::slice::from_ref(&pilot), "")
                }
            }
            PilotCommand::Search(SearchArgs { field, value, json }) => {
                let pilots = self.storage.search_pilots(&field, &value)?;
                if json {
                    write_json(out, &pilots)
                } else {
                    self.table::<_, PilotRow>(out, &pilots, "No matching pilots.")
                }
            }
            PilotCommand::Add {
                first_name,
                family_name,
            } => {
                let pilot = Pilot::new(first_name, family_name);
                let id = self.storage.add_pilot(&pilot)?;
                writeln!(out, "Added pilot {} as {id}", pilot.display_name())?;
                Ok(())
            }
            PilotCommand::Update {
                id,
                first_name,
                family_name,
            } => {
                let mut pilot = self.require_pilot(id)?;
                if let Some(first_name) = first_name {
                    pilot.first_name = first_name;
                }
                if let Some(family_name) = family_name {
                    pilot.family_name = family_name;
                }
                self.storage.update_pilot(id, &pilot)?;
                writeln!(out, "Updated pilot {id}")?;
                Ok(())
            }
            PilotCommand::Delete { id } => {
                if !self.storage.flights_for_pilot(id)?.is_empty() {
                    return Err(Error::validation(
                        "pilot",
                        format!("pilot {id} is still rostered on flights"),
                    ));
                }
                if !self.storage.delete_pilot(id)? {
                    return Err(Error::not_found("pilot", id));
                }
                writeln!(out, "Deleted pilot {id}")?;
                Ok(())
            }
            PilotCommand::Flights { id, json } => {
                self.require_pilot(id)?;
                let flights = self.storage.flights_for_pilot(id)?;
                let summaries = self.summaries_for(&flights)?;
                if json {
                    write_json(out, &summaries)
                } else {
                    self.table::<_, FlightRow>(out, &summaries, "No flights for this pilot.")
                }
            }
            PilotCommand::Available(args) => self.available(&args, out),
        }
    }

    fn available(&self, args: &AvailableArgs, out: &mut dyn Write) -> Result<()> {
        let window = FlightWindow::new(args.departure, args.arrival);
        if !window.is_well_formed() {
            return Err(Error::validation(
                "arrival",
                "scheduled arrival must be after scheduled departure",
            ));
        }

        let scheduler = self.scheduler();
        if args.explain {
            let assessments = scheduler.assess(&window, args.exclude_flight)?;
            if args.json {
                return write_json(out, &assessments);
            }
            self.table::<_, AssessmentRow>(out, &assessments, "No pilots.")
        } else {
            let choices =
                scheduler.pilot_choices(&window, args.exclude_flight, args.exclude_pilot)?;
            if args.json {
                return write_json(out, &choices);
            }
            self.table::<_, ChoiceRow>(out, &choices, "No pilots available for this window.")
        }
    }

    fn require_pilot(&self, id: i64) -> Result<Pilot> {
        self.storage
            .get_pilot(id)?
            .ok_or_else(|| Error::not_found("pilot", id))
    }

    // === Airports ===

    fn airports(&self, cmd: AirportCommand, out: &mut dyn Write) -> Result<()> {
        match cmd {
            AirportCommand::List { json } => {
                let airports = self.storage.list_airports()?;
                if json {
                    write_json(out, &airports)
                } else {
                    self.table::<_, AirportRow>(out, &airports, "No airports.")
                }
            }
            AirportCommand::Show { airport, json } => {
                let airport = self.resolve_airport(&airport)?;
                if json {
                    write_json(out, &airport)
                } else {
                    self.table::<_, AirportRow>(out, std::slice::from_ref(&airport), "")
                }
            }
            AirportCommand::Search(SearchArgs { field, value, json }) => {
                let airports = self.storage.search_airports(&field, &value)?;
                if json {
                    write_json(out, &airports)
                } else {
                    self.table::<_, AirportRow>(out, &airports, "No matching airports.")
                }
            }
            AirportCommand::Add { code, details } => {
                let mut airport = Airport::new(code.to_uppercase());
                apply_airport_details(&mut airport, details);
                let id = self.storage.add_airport(&airport)?;
                writeln!(out, "Added airport {} as {id}", airport.code)?;
                Ok(())
            }
            AirportCommand::Update { id, code, details } => {
                let mut airport = self
                    .storage
                    .get_airport(id)?
                    .ok_or_else(|| Error::not_found("airport", id))?;
                if let Some(code) = code {
                    airport.code = code.to_uppercase();
                }
                apply_airport_details(&mut airport, details);
                self.storage.update_airport(id, &airport)?;
                writeln!(out, "Updated airport {id}")?;
                Ok(())
            }
            AirportCommand::Delete { id } => {
                if !self.storage.delete_airport(id)? {
                    return Err(Error::not_found("airport", id));
                }
                writeln!(out, "Deleted airport {id}")?;
                Ok(())
            }
        }
    }

    fn resolve_airport(&self, reference: &str) -> Result<Airport> {
        match reference.trim().parse::<i64>() {
            Ok(id) => self
                .storage
                .get_airport(id)?
                .ok_or_else(|| Error::not_found("airport", id)),
            Err(_) => self
                .storage
                .get_airport_by_code(&reference.trim().to_uppercase())?
                .ok_or_else(|| {
                    Error::validation("airport", format!("no airport with code '{reference}'"))
                }),
        }
    }

    // === Aircraft ===

    fn aircraft(&self, cmd: AircraftCommand, out: &mut dyn Write) -> Result<()> {
        match cmd {
            AircraftCommand::List { json } => {
                let fleet = self.storage.list_aircraft()?;
                if json {
                    write_json(out, &fleet)
                } else {
                    self.table::<_, AircraftRow>(out, &fleet, "No aircraft.")
                }
            }
            AircraftCommand::Show { aircraft, json } => {
                let aircraft = self.resolve_aircraft(&aircraft)?;
                if json {
                    write_json(out, &aircraft)
                } else {
                    self.table::<_, AircraftRow>(out, std::slice::from_ref(&aircraft), "")
                }
            }
            AircraftCommand::Search(SearchArgs { field, value, json }) => {
                let fleet = self.storage.search_aircraft(&field, &value)?;
                if json {
                    write_json(out, &fleet)
                } else {
                    self.table::<_, AircraftRow>(out, &fleet, "No matching aircraft.")
                }
            }
            AircraftCommand::Add {
                registration,
                manufacturer,
                model,
                details,
            } => {
                let mut aircraft = Aircraft::new(registration.to_uppercase(), manufacturer, model);
                apply_aircraft_details(&mut aircraft, details);
                let id = self.storage.add_aircraft(&aircraft)?;
                writeln!(out, "Added aircraft {} as {id}", aircraft.registration)?;
                Ok(())
            }
            AircraftCommand::Update {
                id,
                registration,
                manufacturer,
                model,
                details,
            } => {
                let mut aircraft = self
                    .storage
                    .get_aircraft(id)?
                    .ok_or_else(|| Error::not_found("aircraft", id))?;
                if let Some(registration) = registration {
                    aircraft.registration = registration.to_uppercase();
                }
                if let Some(manufacturer) = manufacturer {
                    aircraft.manufacturer = manufacturer;
                }
                if let Some(model) = model {
                    aircraft.model = model;
                }
                apply_aircraft_details(&mut aircraft, details);
                self.storage.update_aircraft(id, &aircraft)?;
                writeln!(out, "Updated aircraft {id}")?;
                Ok(())
            }
            AircraftCommand::Delete { id } => {
                if !self.storage.delete_aircraft(id)? {
                    return Err(Error::not_found("aircraft", id));
                }
                writeln!(out, "Deleted aircraft {id}")?;
                Ok(())
            }
        }
    }

    fn resolve_aircraft(&self, reference: &str) -> Result<Aircraft> {
        match reference.trim().parse::<i64>() {
            Ok(id) => self
                .storage
                .get_aircraft(id)?
                .ok_or_else(|| Error::not_found("aircraft", id)),
            Err(_) => self
                .storage
                .get_aircraft_by_registration(&reference.trim().to_uppercase())?
                .ok_or_else(|| {
                    Error::validation(
                        "aircraft",
                        format!("no aircraft with registration '{reference}'"),
                    )
                }),
        }
    }

    // === Reports ===

    fn report(&self, cmd: ReportCommand, out: &mut dyn Write) -> Result<()> {
        match cmd {
            ReportCommand::Duty { as_of, json } => {
                let as_of = as_of.unwrap_or_else(now);
                let flights = self.storage.list_flights()?;
                let pilots = self.storage.list_pilots()?;
                let report = duty_report(&flights, &pilots, as_of);
                if json {
                    write_json(out, &report)
                } else {
                    writeln!(out, "Duty hours for the 28 days to {}", format_timestamp(&as_of))?;
                    self.table::<_, DutyRow>(out, &report, "No pilots.")
                }
            }
        }
    }

    // === Admin ===

    fn admin(&self, cmd: AdminCommand, out: &mut dyn Write) -> Result<()> {
        match cmd {
            AdminCommand::Init { seed, yes } => {
                if !yes {
                    writeln!(
                        out,
                        "This deletes every record in {}.",
                        self.storage.path().display()
                    )?;
                    writeln!(out, "Use --yes to confirm.")?;
                    return Ok(());
                }
                warn!("Resetting database at {}", self.storage.path().display());
                self.storage.reset()?;
                if seed {
                    self.storage.seed_demo_data()?;
                }
                writeln!(
                    out,
                    "Database initialised{}.",
                    if seed { " with demo data" } else { "" }
                )?;
                Ok(())
            }
            AdminCommand::Seed => {
                self.storage.seed_demo_data()?;
                writeln!(out, "Demo data loaded.")?;
                Ok(())
            }
            AdminCommand::Status { json } => {
                let stats = self.storage.stats()?;
                if json {
                    let status = serde_json::json!({
                        "database_path": self.storage.path(),
                        "stats": stats,
                    });
                    return write_json(out, &status);
                }
                let rows = [
                    FieldRow::new("Database", self.storage.path().display().to_string()),
                    FieldRow::new("Schema version", stats.schema_version.to_string()),
                    FieldRow::new("Aircraft", stats.aircraft.to_string()),
                    FieldRow::new("Airports", stats.airports.to_string()),
                    FieldRow::new("Pilots", stats.pilots.to_string()),
                    FieldRow::new("Flights", stats.flights.to_string()),
                    FieldRow::new("Size (bytes)", stats.db_size_bytes.to_string()),
                ];
                writeln!(out, "{}", render_table(&rows, self.config.interface.table_style))?;
                Ok(())
            }
        }
    }
}

/// Run a configuration command. Needs no database.
///
/// # Errors
///
/// Returns an error if the output cannot be written.
pub fn run_config(config: &Config, cmd: ConfigCommand, out: &mut dyn Write) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                return write_json(out, config);
            }
            let rows = [
                FieldRow::new("Config file", Config::default_config_path().display().to_string()),
                FieldRow::new("Database", config.database_path().display().to_string()),
                FieldRow::new("Seed on create", config.storage.seed_on_create.to_string()),
                FieldRow::new(
                    "Table style",
                    format!("{:?}", config.interface.table_style).to_lowercase(),
                ),
                FieldRow::new("History size", config.interface.history_size.to_string()),
                FieldRow::new("History file", config.history_path().display().to_string()),
            ];
            writeln!(out, "{}", render_table(&rows, config.interface.table_style))?;
        }
        ConfigCommand::Path => {
            writeln!(out, "{}", Config::default_config_path().display())?;
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            writeln!(out, "Validating configuration: {}", path.display())?;
            match Config::load_from(Some(path)) {
                Ok(_) => writeln!(out, "Configuration is valid.")?,
                Err(e) => {
                    info!("Configuration rejected: {e}");
                    writeln!(out, "Configuration error: {e}")?;
                }
            }
        }
    }
    Ok(())
}

fn write_json<T: Serialize + ?Sized>(out: &mut dyn Write, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

fn record_id(id: Option<i64>) -> Result<i64> {
    id.ok_or_else(|| Error::internal("stored record without an id"))
}

fn apply_airport_details(airport: &mut Airport, details: AirportDetails) {
    if details.name.is_some() {
        airport.name = details.name;
    }
    if details.city.is_some() {
        airport.city = details.city;
    }
    if details.country.is_some() {
        airport.country = details.country;
    }
    if details.region.is_some() {
        airport.region = details.region;
    }
}

fn apply_aircraft_details(aircraft: &mut Aircraft, details: AircraftDetails) {
    if details.serial.is_some() {
        aircraft.manufacturer_serial_no = details.serial;
    }
    if let Some(icao_hex) = details.icao_hex {
        aircraft.icao_hex = Some(icao_hex.to_uppercase());
    }
    if let Some(icao_type) = details.icao_type {
        aircraft.icao_type = Some(icao_type.to_uppercase());
    }
    if let Some(status) = details.status {
        aircraft.status = status;
    }
}
