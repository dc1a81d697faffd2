//! Crew-aware flight scheduling.
//!
//! [`Scheduler`] sits between callers and [`Storage`] for any write that
//! touches crew or schedule, refusing assignments the eligibility engine
//! rejects.

use tracing::{debug, info};

use crate::eligibility::{EligibilityEngine, PilotAssessment, PilotChoice};
use crate::error::{Error, Result};
use crate::model::{Flight, Pilot};
use crate::storage::Storage;
use crate::time::FlightWindow;

/// Crew-aware operations over a [`Storage`].
#[derive(Debug, Clone, Copy)]
pub struct Scheduler<'a> {
    storage: &'a Storage,
}

impl<'a> Scheduler<'a> {
    /// Create a scheduler over the given storage.
    #[must_use]
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    fn engine(&self) -> EligibilityEngine<'a, Storage, Storage> {
        EligibilityEngine::new(self.storage, self.storage)
    }

    /// Pilots free to fly `window`.
    ///
    /// # Errors
    ///
    /// Returns an error if flights or pilots cannot be read.
    pub fn available_pilots(
        &self,
        window: &FlightWindow,
        excluded_flight_id: Option<i64>,
    ) -> Result<Vec<Pilot>> {
        self.engine().find_available_pilots(window, excluded_flight_id)
    }

    /// Every pilot's standing for `window`.
    ///
    /// # Errors
    ///
    /// Returns an error if flights or pilots cannot be read.
    pub fn assess(
        &self,
        window: &FlightWindow,
        excluded_flight_id: Option<i64>,
    ) -> Result<Vec<PilotAssessment>> {
        self.engine().evaluate(window, excluded_flight_id)
    }

    /// Eligible pilots as choices, leaving out the one already picked for the
    /// other seat.
    ///
    /// # Errors
    ///
    /// Returns an error if flights or pilots cannot be read.
    pub fn pilot_choices(
        &self,
        window: &FlightWindow,
        excluded_flight_id: Option<i64>,
        exclude_pilot: Option<i64>,
    ) -> Result<Vec<PilotChoice>> {
        self.engine()
            .choices(window, excluded_flight_id, exclude_pilot)
    }

    /// Validate and store a new flight.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PilotUnavailable`] if an assigned crew member is not
    /// eligible for the flight's window, or any validation/storage error.
    pub fn add_flight(&self, flight: &Flight) -> Result<i64> {
        flight.validate()?;
        let crew: Vec<i64> = flight.crew().map(|(_, id)| id).collect();
        self.check_crew(&flight.scheduled_window(), None, &crew)?;
        let id = self.storage.add_flight(flight)?;
        info!("Scheduled flight {} as {}", flight.flight_number, id);
        Ok(id)
    }

    /// Validate and store changes to an existing flight.
    ///
    /// Crew members are re-checked when the schedule moves; otherwise only
    /// newly assigned crew are checked. The flight itself never counts
    /// against its own crew.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown flight,
    /// [`Error::PilotUnavailable`] for an ineligible crew member, or any
    /// validation/storage error.
    pub fn update_flight(&self, id: i64, flight: &Flight) -> Result<()> {
        let current = self.storage.require_flight(id)?;
        flight.validate()?;

        let window = flight.scheduled_window();
        let moved = window != current.scheduled_window();
        let crew: Vec<i64> = flight
            .crew()
            .map(|(_, pilot_id)| pilot_id)
            .filter(|pilot_id| moved || !current.is_crewed_by(*pilot_id))
            .collect();

        self.check_crew(&window, Some(id), &crew)?;
        self.storage.update_flight(id, flight)
    }

    /// Set or clear both crew seats on a stored flight.
    ///
    /// # Errors
    ///
    /// As [`Scheduler::update_flight`].
    pub fn assign_crew(
        &self,
        flight_id: i64,
        pilot_id: Option<i64>,
        copilot_id: Option<i64>,
    ) -> Result<Flight> {
        let mut flight = self.storage.require_flight(flight_id)?;
        flight.pilot_id = pilot_id;
        flight.copilot_id = copilot_id;
        self.update_flight(flight_id, &flight)?;
        info!(
            "Crewed flight {} with pilot {:?}, copilot {:?}",
            flight_id, pilot_id, copilot_id
        );
        Ok(flight)
    }

    fn check_crew(
        &self,
        window: &FlightWindow,
        excluded_flight_id: Option<i64>,
        crew: &[i64],
    ) -> Result<()> {
        if crew.is_empty() {
            return Ok(());
        }

        for &pilot_id in crew {
            if self.storage.get_pilot(pilot_id)?.is_none() {
                return Err(Error::not_found("pilot", pilot_id));
            }
        }

        let assessments = self.assess(window, excluded_flight_id)?;
        for &pilot_id in crew {
            let eligible = assessments
                .iter()
                .any(|a| a.pilot.id == Some(pilot_id) && a.eligible);
            if !eligible {
                debug!("Pilot {} rejected for {}", pilot_id, window);
                return Err(Error::PilotUnavailable { pilot_id });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FlightStatus;
    use crate::storage::test_support::*;
    use crate::time::ts;

    fn new_flight(fx: Fixture, departure: &str, arrival: &str) -> Flight {
        Flight::new(
            "ZMY300",
            fx.aircraft,
            fx.origin,
            fx.destination,
            FlightWindow::new(ts(departure), ts(arrival)),
        )
    }

    #[test]
    fn test_add_flight_with_free_crew() {
        let storage = create_test_storage();
        let fx = fixture(&storage);
        let alex = add_pilot(&storage, "Alex", "Morrison");
        let emily = add_pilot(&storage, "Emily", "Carter");

        let mut flight = new_flight(fx, "2026-03-01 10:00", "2026-03-01 12:00");
        flight.pilot_id = Some(alex);
        flight.copilot_id = Some(emily);

        let id = Scheduler::new(&storage).add_flight(&flight).unwrap();
        assert_eq!(storage.require_flight(id).unwrap().copilot_id, Some(emily));
    }

    #[test]
    fn test_add_flight_rejects_busy_pilot() {
        let storage = create_test_storage();
        let fx = fixture(&storage);
        let alex = add_pilot(&storage, "Alex", "Morrison");
        add_flight(&storage, fx, "2026-03-01 10:00", "2026-03-01 12:00", Some(alex), None);

        let mut flight = new_flight(fx, "2026-03-01 11:00", "2026-03-01 13:00");
        flight.copilot_id = Some(alex);

        let err = Scheduler::new(&storage).add_flight(&flight).unwrap_err();
        assert!(matches!(err, Error::PilotUnavailable { pilot_id } if pilot_id == alex));
        assert_eq!(storage.stats().unwrap().flights, 1);
    }

    #[test]
    fn test_add_flight_unknown_pilot() {
        let storage = create_test_storage();
        let fx = fixture(&storage);
        let mut flight = new_flight(fx, "2026-03-01 10:00", "2026-03-01 12:00");
        flight.pilot_id = Some(99);

        let err = Scheduler::new(&storage).add_flight(&flight).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_add_uncrewed_flight() {
        let storage = create_test_storage();
        let fx = fixture(&storage);
        let flight = new_flight(fx, "2026-03-01 10:00", "2026-03-01 12:00");
        assert!(Scheduler::new(&storage).add_flight(&flight).is_ok());
    }

    #[test]
    fn test_update_same_window_keeps_crew() {
        let storage = create_test_storage();
        let fx = fixture(&storage);
        let alex = add_pilot(&storage, "Alex", "Morrison");
        let id = add_flight(&storage, fx, "2026-03-01 10:00", "2026-03-01 12:00", Some(alex), None);

        let mut flight = storage.require_flight(id).unwrap();
        flight.status = FlightStatus::Boarding;
        Scheduler::new(&storage).update_flight(id, &flight).unwrap();
        assert_eq!(
            storage.require_flight(id).unwrap().status,
            FlightStatus::Boarding
        );
    }

    #[test]
    fn test_reschedule_over_own_window() {
        let storage = create_test_storage();
        let fx = fixture(&storage);
        let alex = add_pilot(&storage, "Alex", "Morrison");
        let id = add_flight(&storage, fx, "2026-03-01 10:00", "2026-03-01 12:00", Some(alex), None);

        let mut flight = storage.require_flight(id).unwrap();
        flight.departure_scheduled = ts("2026-03-01 11:00");
        flight.arrival_scheduled = ts("2026-03-01 13:00");
        Scheduler::new(&storage).update_flight(id, &flight).unwrap();
    }

    #[test]
    fn test_reschedule_into_other_commitment_rejected() {
        let storage = create_test_storage();
        let fx = fixture(&storage);
        let alex = add_pilot(&storage, "Alex", "Morrison");
        add_flight(&storage, fx, "2026-03-02 10:00", "2026-03-02 12:00", Some(alex), None);
        let id = add_flight(&storage, fx, "2026-03-01 10:00", "2026-03-01 12:00", Some(alex), None);

        let mut flight = storage.require_flight(id).unwrap();
        flight.departure_scheduled = ts("2026-03-02 11:00");
        flight.arrival_scheduled = ts("2026-03-02 13:00");
        let err = Scheduler::new(&storage).update_flight(id, &flight).unwrap_err();
        assert!(matches!(err, Error::PilotUnavailable { .. }));
    }

    #[test]
    fn test_update_unknown_flight() {
        let storage = create_test_storage();
        let fx = fixture(&storage);
        let flight = new_flight(fx, "2026-03-01 10:00", "2026-03-01 12:00");
        let err = Scheduler::new(&storage).update_flight(7, &flight).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_assign_crew() {
        let storage = create_test_storage();
        let fx = fixture(&storage);
        let alex = add_pilot(&storage, "Alex", "Morrison");
        let emily = add_pilot(&storage, "Emily", "Carter");
        let id = add_flight(&storage, fx, "2026-03-01 10:00", "2026-03-01 12:00", None, None);

        let flight = Scheduler::new(&storage)
            .assign_crew(id, Some(emily), Some(alex))
            .unwrap();
        assert_eq!(flight.pilot_id, Some(emily));
        assert_eq!(storage.require_flight(id).unwrap().copilot_id, Some(alex));
    }

    #[test]
    fn test_assign_busy_copilot_rejected() {
        let storage = create_test_storage();
        let fx = fixture(&storage);
        let alex = add_pilot(&storage, "Alex", "Morrison");
        add_flight(&storage, fx, "2026-03-01 09:00", "2026-03-01 10:00", Some(alex), None);
        let id = add_flight(&storage, fx, "2026-03-01 10:00", "2026-03-01 12:00", None, None);

        let err = Scheduler::new(&storage)
            .assign_crew(id, None, Some(alex))
            .unwrap_err();
        assert!(matches!(err, Error::PilotUnavailable { .. }));
        assert_eq!(storage.require_flight(id).unwrap().copilot_id, None);
    }

    #[test]
    fn test_pilot_choices_skip_other_seat() {
        let storage = create_test_storage();
        let alex = add_pilot(&storage, "Alex", "Morrison");
        let emily = add_pilot(&storage, "Emily", "Carter");
        let window = FlightWindow::new(ts("2026-03-01 10:00"), ts("2026-03-01 12:00"));

        let choices = Scheduler::new(&storage)
            .pilot_choices(&window, None, Some(alex))
            .unwrap();
        assert_eq!(choices.len(), 1);
        assert_eq!(choices[0].id, emily);
    }

    #[test]
    fn test_seeded_availability() {
        let storage = create_test_storage();
        storage.seed_demo_data().unwrap();
        let scheduler = Scheduler::new(&storage);

        // ZMY1423 on 2026-01-09 is crewed by pilots 1 and 10.
        let window = FlightWindow::new(ts("2026-01-09 16:00"), ts("2026-01-09 17:30"));
        let ids: Vec<_> = scheduler
            .available_pilots(&window, None)
            .unwrap()
            .into_iter()
            .filter_map(|p| p.id)
            .collect();
        assert_eq!(ids.len(), 8);
        assert!(!ids.contains(&1));
        assert!(!ids.contains(&10));

        let editing: Vec<_> = scheduler
            .available_pilots(&window, Some(1))
            .unwrap()
            .into_iter()
            .filter_map(|p| p.id)
            .collect();
        assert_eq!(editing.len(), 10);
    }
}
