//! Demo data for a fresh database.

use tracing::info;

use super::Storage;
use crate::error::{Error, Result};

const SEED_AIRCRAFT: &str = r"
INSERT INTO aircraft (registration, manufacturer_serial_no, icao_hex, manufacturer, model, icao_type, status)
VALUES
    ('G-EUUH', 1245, '406BCA', 'Airbus', 'A320-214', 'A320', 'Active'),
    ('EI-HAX', 62345, '4CA82F', 'Boeing', '737-8 MAX', 'B38M', 'Active'),
    ('G-VDOT', 312, '4078F2', 'Airbus', 'A350-941', 'A359', 'Active'),
    ('N24974', 36478, 'A2B3C4', 'Boeing', '787-9 Dreamliner', 'B789', 'Active'),
    ('YL-AAQ', 55089, '502D5F', 'Airbus', 'A220-300', 'BCS3', 'Active')
";

const SEED_AIRPORTS: &str = r"
INSERT INTO airport (code, name, city, country, region)
VALUES
    ('LHR', 'London Heathrow', 'London', 'United Kingdom', 'Europe'),
    ('AMS', 'Amsterdam Schiphol', 'Amsterdam', 'Netherlands', 'Europe'),
    ('CDG', 'Paris Charles de Gaulle', 'Paris', 'France', 'Europe'),
    ('FRA', 'Frankfurt', 'Frankfurt', 'Germany', 'Europe'),
    ('MAD', 'Madrid Barajas', 'Madrid', 'Spain', 'Europe'),
    ('DXB', 'Dubai International', 'Dubai', 'United Arab Emirates', 'Middle East'),
    ('DOH', 'Hamad International', 'Doha', 'Qatar', 'Middle East'),
    ('JFK', 'John F. Kennedy International', 'New York', 'United States', 'North America'),
    ('LAX', 'Los Angeles International', 'Los Angeles', 'United States', 'North America'),
    ('YYZ', 'Toronto Pearson', 'Toronto', 'Canada', 'North America'),
    ('DEL', 'Indira Gandhi International', 'New Delhi', 'India', 'South Asia'),
    ('SIN', 'Singapore Changi', 'Singapore', 'Singapore', 'Southeast Asia'),
    ('HKG', 'Hong Kong International', 'Hong Kong', 'China (SAR)', 'East Asia'),
    ('NRT', 'Tokyo Narita', 'Tokyo', 'Japan', 'East Asia'),
    ('SYD', 'Sydney Kingsford Smith', 'Sydney', 'Australia', 'Oceania')
";

const SEED_PILOTS: &str = r"
INSERT INTO pilot (first_name, family_name)
VALUES
    ('Alex', 'Morrison'),
    ('Emily', 'Carter'),
    ('Daniel', 'Hughes'),
    ('Sophie', 'Bennett'),
    ('Michael', 'Reed'),
    ('Laura', 'Whitaker'),
    ('James', 'Thornton'),
    ('Priya', 'Malhotra'),
    ('Noah', 'Feldman'),
    ('Isabella', 'Russo')
";

// Ids refer to the rows above, so this must run on empty tables.
const SEED_FLIGHTS: &str = r"
INSERT INTO flight (flight_number, aircraft_id, origin_id, destination_id, pilot_id, copilot_id,
                    departure_time_scheduled, arrival_time_scheduled,
                    departure_time_actual, arrival_time_actual, status)
VALUES
    ('ZMY1423', 1, 1, 2, 1, 10, '2026-01-09 15:30', '2026-01-09 16:55', '2026-01-09 15:30', '2026-01-09 16:50', 'Arrived'),
    ('ZMY65', 2, 1, 3, 2, 3, '2026-01-14 09:50', '2026-01-14 11:15', '2026-01-14 09:50', '2026-01-14 11:15', 'Arrived'),
    ('ZMY324', 3, 1, 4, 3, 6, '2026-02-03 18:20', '2026-02-03 20:05', '2026-02-03 18:35', '2026-02-03 20:15', 'Arrived'),
    ('ZMY147', 4, 1, 5, 4, 3, '2026-03-19 06:50', '2026-03-19 09:20', '2026-03-19 06:50', '2026-03-19 09:35', 'Arrived'),
    ('ZMY1545', 5, 1, 6, 5, 7, '2026-04-07 21:00', '2026-04-08 04:05', '2026-04-07 21:00', NULL, 'Departed'),
    ('ZMY1245', 1, 1, 7, 6, 2, '2026-05-25 13:40', '2026-05-25 20:50', '2026-05-25 13:40', NULL, 'Departed'),
    ('ZMY6654', 2, 8, 1, 7, 9, '2026-06-11 00:15', '2026-06-11 07:30', NULL, NULL, 'Closed'),
    ('ZMY3418', 3, 9, 1, 8, 3, '2026-07-29 17:50', '2026-07-30 04:25', NULL, NULL, 'Boarding'),
    ('ZMY3654', 4, 10, 1, 9, 8, '2026-08-08 10:10', '2026-08-08 17:35', NULL, NULL, 'Delayed'),
    ('ZMY2697', 5, 11, 1, 10, 2, '2026-09-14 23:40', '2026-09-15 08:55', NULL, NULL, 'On time'),
    ('ZMY144', 1, 12, 1, 1, 4, '2026-10-02 04:30', '2026-10-02 18:00', NULL, NULL, 'On time'),
    ('ZMY1423', 2, 1, 2, 4, 8, '2026-11-18 15:20', '2026-11-18 16:45', NULL, NULL, 'Scheduled')
";

impl Storage {
    /// Load the demo fleet, airports, pilots and flights.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if any table already holds rows, or a
    /// storage error if an insert fails. Nothing is written on failure.
    pub fn seed_demo_data(&self) -> Result<()> {
        let stats = self.stats()?;
        if stats.aircraft + stats.airports + stats.pilots + stats.flights > 0 {
            return Err(Error::validation(
                "database",
                "demo data can only be loaded into an empty database",
            ));
        }

        self.with_transaction(|conn| {
            for statement in [SEED_AIRCRAFT, SEED_AIRPORTS, SEED_PILOTS, SEED_FLIGHTS] {
                conn.execute(statement, [])?;
            }
            Ok(())
        })?;

        info!("Loaded demo data into {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::create_test_storage;
    use crate::model::FlightStatus;
    use crate::time::ts;

    #[test]
    fn test_seed_counts() {
        let storage = create_test_storage();
        storage.seed_demo_data().unwrap();

        let stats = storage.stats().unwrap();
        assert_eq!(stats.aircraft, 5);
        assert_eq!(stats.airports, 15);
        assert_eq!(stats.pilots, 10);
        assert_eq!(stats.flights, 12);
    }

    #[test]
    fn test_seed_records_pass_validation() {
        let storage = create_test_storage();
        storage.seed_demo_data().unwrap();

        for aircraft in storage.list_aircraft().unwrap() {
            aircraft.validate().unwrap();
        }
        for airport in storage.list_airports().unwrap() {
            airport.validate().unwrap();
        }
        for flight in storage.list_flights().unwrap() {
            flight.validate().unwrap();
        }
    }

    #[test]
    fn test_seed_first_flight() {
        let storage = create_test_storage();
        storage.seed_demo_data().unwrap();

        let flight = storage.require_flight(1).unwrap();
        assert_eq!(flight.flight_number, "ZMY1423");
        assert_eq!(flight.pilot_id, Some(1));
        assert_eq!(flight.copilot_id, Some(10));
        assert_eq!(flight.arrival_actual, Some(ts("2026-01-09 16:50")));
        assert_eq!(flight.status, FlightStatus::Arrived);
    }

    #[test]
    fn test_seed_twice_rejected() {
        let storage = create_test_storage();
        storage.seed_demo_data().unwrap();
        let err = storage.seed_demo_data().unwrap_err();
        assert!(err.is_validation_error());
        assert_eq!(storage.stats().unwrap().flights, 12);
    }

    #[test]
    fn test_seed_after_reset() {
        let storage = create_test_storage();
        storage.seed_demo_data().unwrap();
        storage.reset().unwrap();
        storage.seed_demo_data().unwrap();
        assert_eq!(storage.stats().unwrap().pilots, 10);
    }
}
