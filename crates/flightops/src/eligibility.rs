//! Pilot eligibility.
//!
//! Decides which pilots may crew a flight in a given window. A pilot is
//! eligible when none of their commitments overlaps the window and their
//! flown hours over the trailing [`ROLLING_WINDOW_DAYS`] plus the new flight
//! stay strictly under [`MAX_DUTY_HOURS`].
//!
//! The engine only reads. It pulls every flight and pilot from its sources on
//! each call and keeps nothing between calls.

use std::collections::HashMap;

use chrono::{Duration, NaiveDateTime};
use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::model::{CrewRole, Flight, Pilot};
use crate::storage::Storage;
use crate::time::{hours, round_hours, FlightWindow};

/// Flown hours a pilot must stay strictly under, counting the new flight.
pub const MAX_DUTY_HOURS: f64 = 100.0;

/// Length of the trailing window over which flown hours accumulate.
pub const ROLLING_WINDOW_DAYS: i64 = 28;

/// Anything that can list every flight.
pub trait FlightSource {
    /// Every flight, crewed or not.
    ///
    /// # Errors
    ///
    /// Returns the underlying store's error unchanged.
    fn list_all_flights(&self) -> Result<Vec<Flight>>;
}

/// Anything that can list every pilot.
pub trait PilotSource {
    /// Every pilot.
    ///
    /// # Errors
    ///
    /// Returns the underlying store's error unchanged.
    fn list_all_pilots(&self) -> Result<Vec<Pilot>>;
}

impl FlightSource for Storage {
    fn list_all_flights(&self) -> Result<Vec<Flight>> {
        self.list_flights()
    }
}

impl PilotSource for Storage {
    fn list_all_pilots(&self) -> Result<Vec<Pilot>> {
        self.list_pilots()
    }
}

impl FlightSource for [Flight] {
    fn list_all_flights(&self) -> Result<Vec<Flight>> {
        Ok(self.to_vec())
    }
}

impl PilotSource for [Pilot] {
    fn list_all_pilots(&self) -> Result<Vec<Pilot>> {
        Ok(self.to_vec())
    }
}

/// One pilot's seat on one flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commitment {
    /// The committed pilot.
    pub pilot_id: i64,
    /// Which seat they occupy.
    pub role: CrewRole,
    /// The flight, if it has been stored.
    pub flight_id: Option<i64>,
    /// Scheduled departure and arrival.
    pub scheduled: FlightWindow,
    /// Logged departure.
    pub departure_actual: Option<NaiveDateTime>,
    /// Logged arrival.
    pub arrival_actual: Option<NaiveDateTime>,
}

impl Commitment {
    /// Hours flown, using logged times where present.
    #[must_use]
    pub fn flown_hours(&self) -> f64 {
        let departure = self.departure_actual.unwrap_or(self.scheduled.departure);
        let arrival = self.arrival_actual.unwrap_or(self.scheduled.arrival);
        hours(arrival - departure)
    }

    fn is_from(&self, flight_id: Option<i64>) -> bool {
        flight_id.is_some() && self.flight_id == flight_id
    }
}

/// Expand flights into commitments, one per occupied seat.
#[must_use]
pub fn commitments(flights: &[Flight]) -> Vec<Commitment> {
    flights
        .iter()
        .flat_map(|flight| {
            flight.crew().map(|(role, pilot_id)| Commitment {
                pilot_id,
                role,
                flight_id: flight.id,
                scheduled: flight.scheduled_window(),
                departure_actual: flight.departure_actual,
                arrival_actual: flight.arrival_actual,
            })
        })
        .collect()
}

/// Pilots with a commitment overlapping `window`, mapped to the ids of the
/// flights they conflict with. Commitments from `excluded_flight_id` are
/// skipped.
#[must_use]
pub fn conflicted_pilots(
    commitments: &[Commitment],
    window: &FlightWindow,
    excluded_flight_id: Option<i64>,
) -> HashMap<i64, Vec<i64>> {
    let mut conflicts: HashMap<i64, Vec<i64>> = HashMap::new();
    for commitment in commitments {
        if commitment.is_from(excluded_flight_id) || !commitment.scheduled.overlaps(window) {
            continue;
        }
        let flights = conflicts.entry(commitment.pilot_id).or_default();
        if let Some(id) = commitment.flight_id {
            if !flights.contains(&id) {
                flights.push(id);
            }
        }
    }
    conflicts
}

/// Per-pilot flown hours for commitments whose scheduled arrival falls in
/// `[as_of - ROLLING_WINDOW_DAYS, as_of]`. Each total is rounded to two
/// decimals once, after summing.
#[must_use]
pub fn rolling_hours(
    commitments: &[Commitment],
    as_of: NaiveDateTime,
    excluded_flight_id: Option<i64>,
) -> HashMap<i64, f64> {
    let window_start = as_of - Duration::days(ROLLING_WINDOW_DAYS);

    let mut totals: HashMap<i64, f64> = HashMap::new();
    for commitment in commitments {
        let arrival = commitment.scheduled.arrival;
        if commitment.is_from(excluded_flight_id) || arrival < window_start || arrival > as_of {
            continue;
        }
        *totals.entry(commitment.pilot_id).or_insert(0.0) += commitment.flown_hours();
    }

    for total in totals.values_mut() {
        *total = round_hours(*total);
    }
    totals
}

/// Whether `existing + candidate` stays strictly under [`MAX_DUTY_HOURS`].
#[must_use]
pub fn within_cap(existing_hours: f64, candidate_hours: f64) -> bool {
    existing_hours + candidate_hours < MAX_DUTY_HOURS
}

/// How one pilot fares against a candidate window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PilotAssessment {
    /// The pilot assessed.
    pub pilot: Pilot,
    /// Whether any commitment overlaps the window.
    pub conflicted: bool,
    /// Stored flights that overlap the window.
    pub conflicting_flights: Vec<i64>,
    /// Rolling hours already flown.
    pub existing_hours: f64,
    /// Duration of the candidate window.
    pub candidate_hours: f64,
    /// Not conflicted and within the cap.
    pub eligible: bool,
}

impl PilotAssessment {
    /// Hours left before the cap, never negative.
    #[must_use]
    pub fn remaining_hours(&self) -> f64 {
        (MAX_DUTY_HOURS - self.existing_hours).max(0.0)
    }
}

/// A pilot as offered for selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PilotChoice {
    /// Pilot id.
    pub id: i64,
    /// `"{first_name} {family_name}"`.
    pub display_name: String,
}

impl std::fmt::Display for PilotChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}. {}", self.id, self.display_name)
    }
}

/// Turn pilots into choices, dropping `exclude_pilot` (the one already
/// picked for the other seat) and any pilot not yet stored.
#[must_use]
pub fn pilot_choices(pilots: &[Pilot], exclude_pilot: Option<i64>) -> Vec<PilotChoice> {
    pilots
        .iter()
        .filter_map(|pilot| {
            let id = pilot.id?;
            (Some(id) != exclude_pilot).then(|| PilotChoice {
                id,
                display_name: pilot.display_name(),
            })
        })
        .collect()
}

/// Computes pilot eligibility over a flight source and a pilot source.
#[derive(Debug)]
pub struct EligibilityEngine<'a, F: ?Sized, P: ?Sized> {
    flights: &'a F,
    pilots: &'a P,
}

impl<'a, F, P> EligibilityEngine<'a, F, P>
where
    F: FlightSource + ?Sized,
    P: PilotSource + ?Sized,
{
    /// Create an engine reading from the given sources.
    pub fn new(flights: &'a F, pilots: &'a P) -> Self {
        Self { flights, pilots }
    }

    /// Pilots free to crew a flight in `window`.
    ///
    /// Pass the id of the flight being edited as `excluded_flight_id` so it
    /// neither conflicts with itself nor counts toward its crew's hours.
    /// Pilots come back in the pilot source's order.
    ///
    /// # Errors
    ///
    /// Returns the source's error if flights or pilots cannot be listed.
    pub fn find_available_pilots(
        &self,
        window: &FlightWindow,
        excluded_flight_id: Option<i64>,
    ) -> Result<Vec<Pilot>> {
        Ok(self
            .evaluate(window, excluded_flight_id)?
            .into_iter()
            .filter(|assessment| assessment.eligible)
            .map(|assessment| assessment.pilot)
            .collect())
    }

    /// Assess every pilot against `window`, eligible or not.
    ///
    /// # Errors
    ///
    /// Returns the source's error if flights or pilots cannot be listed.
    pub fn evaluate(
        &self,
        window: &FlightWindow,
        excluded_flight_id: Option<i64>,
    ) -> Result<Vec<PilotAssessment>> {
        let flights = self.flights.list_all_flights()?;
        let pilots = self.pilots.list_all_pilots()?;

        let commitments = commitments(&flights);
        let conflicts = conflicted_pilots(&commitments, window, excluded_flight_id);
        let rolling = rolling_hours(&commitments, window.departure, excluded_flight_id);
        let candidate_hours = window.duration_hours();

        let assessments: Vec<PilotAssessment> = pilots
            .into_iter()
            .map(|pilot| {
                let (conflicted, conflicting_flights, existing_hours) = match pilot.id {
                    Some(id) => (
                        conflicts.contains_key(&id),
                        conflicts.get(&id).cloned().unwrap_or_default(),
                        rolling.get(&id).copied().unwrap_or(0.0),
                    ),
                    None => (false, Vec::new(), 0.0),
                };
                let eligible = !conflicted && within_cap(existing_hours, candidate_hours);
                PilotAssessment {
                    pilot,
                    conflicted,
                    conflicting_flights,
                    existing_hours,
                    candidate_hours,
                    eligible,
                }
            })
            .collect();

        debug!(
            "{} of {} pilots eligible for {} ({} commitments, excluding flight {:?})",
            assessments.iter().filter(|a| a.eligible).count(),
            assessments.len(),
            window,
            commitments.len(),
            excluded_flight_id
        );
        Ok(assessments)
    }

    /// Eligible pilots as selectable choices, minus `exclude_pilot`.
    ///
    /// # Errors
    ///
    /// Returns the source's error if flights or pilots cannot be listed.
    pub fn choices(
        &self,
        window: &FlightWindow,
        excluded_flight_id: Option<i64>,
        exclude_pilot: Option<i64>,
    ) -> Result<Vec<PilotChoice>> {
        let available = self.find_available_pilots(window, excluded_flight_id)?;
        Ok(pilot_choices(&available, exclude_pilot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::time::ts;
    use proptest::prelude::*;

    fn pilot(id: i64, first: &str, family: &str) -> Pilot {
        let mut pilot = Pilot::new(first, family);
        pilot.id = Some(id);
        pilot
    }

    fn roster() -> Vec<Pilot> {
        vec![
            pilot(1, "Alex", "Morrison"),
            pilot(2, "Emily", "Carter"),
            pilot(3, "Daniel", "Hughes"),
        ]
    }

    fn flight(
        id: i64,
        pilot_id: Option<i64>,
        copilot_id: Option<i64>,
        departure: &str,
        arrival: &str,
    ) -> Flight {
        let mut flight = Flight::new("ZMY100", 1, 1, 2, window(departure, arrival));
        flight.id = Some(id);
        flight.pilot_id = pilot_id;
        flight.copilot_id = copilot_id;
        flight
    }

    fn window(departure: &str, arrival: &str) -> FlightWindow {
        FlightWindow::new(ts(departure), ts(arrival))
    }

    fn available_ids(
        flights: &[Flight],
        pilots: &[Pilot],
        candidate: &FlightWindow,
        excluded: Option<i64>,
    ) -> Vec<i64> {
        EligibilityEngine::new(flights, pilots)
            .find_available_pilots(candidate, excluded)
            .unwrap()
            .into_iter()
            .filter_map(|p| p.id)
            .collect()
    }

    fn assessment_for(
        flights: &[Flight],
        pilots: &[Pilot],
        candidate: &FlightWindow,
        excluded: Option<i64>,
        pilot_id: i64,
    ) -> PilotAssessment {
        EligibilityEngine::new(flights, pilots)
            .evaluate(candidate, excluded)
            .unwrap()
            .into_iter()
            .find(|a| a.pilot.id == Some(pilot_id))
            .unwrap()
    }

    /// One flight a day for `count` days, each `hours_each` long.
    fn history(
        pilot_id: i64,
        first_id: i64,
        count: i64,
        hours_each: i64,
        start: &str,
    ) -> Vec<Flight> {
        let start = ts(start);
        (0..count)
            .map(|i| {
                let departure = start + Duration::days(i);
                let arrival = departure + Duration::hours(hours_each);
                let mut flight = Flight::new("ZMY200", 1, 1, 2, FlightWindow::new(departure, arrival));
                flight.id = Some(first_id + i);
                flight.pilot_id = Some(pilot_id);
                flight
            })
            .collect()
    }

    #[test]
    fn test_commitments_one_per_seat() {
        let flights = vec![
            flight(1, Some(7), None, "2026-01-09 15:30", "2026-01-09 16:55"),
            flight(2, None, Some(8), "2026-01-10 15:30", "2026-01-10 16:55"),
            flight(3, Some(1), Some(2), "2026-01-11 15:30", "2026-01-11 16:55"),
            flight(4, None, None, "2026-01-12 15:30", "2026-01-12 16:55"),
        ];
        let commitments = commitments(&flights);
        assert_eq!(commitments.len(), 4);

        let for_seven: Vec<_> = commitments.iter().filter(|c| c.pilot_id == 7).collect();
        assert_eq!(for_seven.len(), 1);
        assert_eq!(for_seven[0].role, CrewRole::Pilot);
        assert_eq!(for_seven[0].flight_id, Some(1));

        let third: Vec<_> = commitments.iter().filter(|c| c.flight_id == Some(3)).collect();
        assert_eq!(third.len(), 2);
        assert_eq!(third[0].scheduled, third[1].scheduled);
    }

    #[test]
    fn test_uncrewed_flight_never_conflicts() {
        let flights = vec![flight(1, None, None, "2026-01-09 15:30", "2026-01-09 16:55")];
        let candidate = window("2026-01-09 15:30", "2026-01-09 16:55");
        assert_eq!(available_ids(&flights, &roster(), &candidate, None), vec![1, 2, 3]);
    }

    #[test]
    fn test_overlapping_flight_excludes_pilot() {
        let flights = vec![flight(1, Some(1), None, "2026-01-09 15:30", "2026-01-09 16:55")];
        let candidate = window("2026-01-09 16:00", "2026-01-09 17:30");
        assert_eq!(available_ids(&flights, &roster(), &candidate, None), vec![2, 3]);

        let assessment = assessment_for(&flights, &roster(), &candidate, None, 1);
        assert!(assessment.conflicted);
        assert_eq!(assessment.conflicting_flights, vec![1]);
        assert!(!assessment.eligible);
    }

    #[test]
    fn test_non_overlapping_copilot_with_light_load_is_eligible() {
        let flights = vec![
            flight(1, Some(1), None, "2026-01-02 06:00", "2026-01-02 16:00"),
            flight(2, None, Some(1), "2026-01-09 15:30", "2026-01-09 16:55"),
        ];
        let candidate = window("2026-01-09 17:00", "2026-01-09 18:00");

        let assessment = assessment_for(&flights, &roster(), &candidate, None, 1);
        assert!(!assessment.conflicted);
        assert!((assessment.existing_hours - 11.42).abs() < 1e-9);
        assert!((assessment.candidate_hours - 1.0).abs() < 1e-9);
        assert!(assessment.eligible);
    }

    #[test]
    fn test_touching_end_is_a_conflict() {
        let flights = vec![flight(1, Some(1), None, "2026-01-09 15:30", "2026-01-09 16:55")];
        let candidate = window("2026-01-09 16:55", "2026-01-09 18:00");
        assert!(!available_ids(&flights, &roster(), &candidate, None).contains(&1));
    }

    #[test]
    fn test_touching_start_is_a_conflict() {
        let flights = vec![flight(1, Some(1), None, "2026-01-09 15:30", "2026-01-09 16:55")];
        let candidate = window("2026-01-09 14:00", "2026-01-09 15:30");
        assert!(!available_ids(&flights, &roster(), &candidate, None).contains(&1));
    }

    #[test]
    fn test_candidate_containing_commitment_conflicts() {
        let flights = vec![flight(1, Some(1), None, "2026-01-09 15:30", "2026-01-09 16:55")];
        let candidate = window("2026-01-09 12:00", "2026-01-09 20:00");
        assert!(!available_ids(&flights, &roster(), &candidate, None).contains(&1));
    }

    #[test]
    fn test_one_minute_gap_is_not_a_conflict() {
        let flights = vec![flight(1, Some(1), None, "2026-01-09 15:30", "2026-01-09 16:55")];
        let candidate = window("2026-01-09 16:56", "2026-01-09 18:00");
        assert!(available_ids(&flights, &roster(), &candidate, None).contains(&1));
    }

    #[test]
    fn test_pilot_without_flights_is_eligible() {
        let flights = vec![flight(1, Some(1), Some(2), "2026-01-09 15:30", "2026-01-09 16:55")];
        let candidate = window("2026-01-09 15:00", "2026-01-09 16:00");

        let assessment = assessment_for(&flights, &roster(), &candidate, None, 3);
        assert!(assessment.eligible);
        assert!(assessment.existing_hours.abs() < f64::EPSILON);
    }

    #[test]
    fn test_over_cap_is_excluded() {
        // 9 x 11h = 99h inside the trailing window
        let mut flights = history(1, 100, 9, 11, "2026-02-01 06:00");
        flights.push(flight(1, Some(2), None, "2026-01-01 06:00", "2026-01-01 07:00"));
        let candidate = window("2026-02-20 10:00", "2026-02-20 11:30");

        let assessment = assessment_for(&flights, &roster(), &candidate, None, 1);
        assert!((assessment.existing_hours - 99.0).abs() < 1e-9);
        assert!(!assessment.conflicted);
        assert!(!assessment.eligible);
        assert_eq!(available_ids(&flights, &roster(), &candidate, None), vec![2, 3]);
    }

    #[test]
    fn test_just_under_cap_is_eligible() {
        let flights = history(1, 100, 9, 11, "2026-02-01 06:00");
        let candidate = window("2026-02-20 10:00", "2026-02-20 10:59");
        assert!(available_ids(&flights, &roster(), &candidate, None).contains(&1));
    }

    #[test]
    fn test_cap_is_strict() {
        // 4 x 25h = exactly 100h, then a zero-length candidate
        let flights = history(1, 100, 4, 25, "2026-02-01 00:00");
        let candidate = window("2026-02-20 10:00", "2026-02-20 10:00");

        let assessment = assessment_for(&flights, &roster(), &candidate, None, 1);
        assert!((assessment.existing_hours - 100.0).abs() < 1e-9);
        assert!(assessment.candidate_hours.abs() < f64::EPSILON);
        assert!(!assessment.eligible);
    }

    #[test]
    fn test_within_cap_boundary() {
        assert!(within_cap(99.99, 0.0));
        assert!(!within_cap(100.0, 0.0));
        assert!(within_cap(10.0, 1.0));
        assert!(!within_cap(99.0, 1.5));
    }

    #[test]
    fn test_self_exclusion_when_editing() {
        let flights = vec![flight(42, Some(1), None, "2026-03-01 10:00", "2026-03-01 12:00")];
        let candidate = window("2026-03-01 10:00", "2026-03-01 12:00");

        assert!(!available_ids(&flights, &roster(), &candidate, None).contains(&1));
        assert!(available_ids(&flights, &roster(), &candidate, Some(42)).contains(&1));
    }

    #[test]
    fn test_exclusion_only_skips_the_named_flight() {
        let flights = vec![
            flight(42, Some(1), None, "2026-03-01 10:00", "2026-03-01 12:00"),
            flight(43, Some(1), None, "2026-03-01 11:00", "2026-03-01 13:00"),
        ];
        let candidate = window("2026-03-01 10:00", "2026-03-01 12:00");

        let assessment = assessment_for(&flights, &roster(), &candidate, Some(42), 1);
        assert_eq!(assessment.conflicting_flights, vec![43]);
        assert!(!assessment.eligible);
    }

    #[test]
    fn test_edited_flight_hours_not_counted_twice() {
        // 97h of history plus the 2h flight being edited. Counting the edited
        // flight's old hours as well as its new duration would give 101h.
        let mut flights = history(1, 100, 27, 1, "2026-02-01 00:00");
        flights.extend(history(1, 200, 7, 10, "2026-02-01 05:00"));
        flights.push(flight(42, Some(1), None, "2026-02-27 10:00", "2026-02-27 12:00"));
        let candidate = window("2026-02-28 10:00", "2026-02-28 12:00");

        let editing = assessment_for(&flights, &roster(), &candidate, Some(42), 1);
        assert!((editing.existing_hours - 97.0).abs() < 1e-9);
        assert!(editing.eligible);

        let adding = assessment_for(&flights, &roster(), &candidate, None, 1);
        assert!((adding.existing_hours - 99.0).abs() < 1e-9);
        assert!(!adding.eligible);
    }

    #[test]
    fn test_rolling_window_includes_exactly_28_days() {
        let flights = vec![flight(1, Some(1), None, "2026-02-01 08:00", "2026-02-01 10:00")];
        let commitments = commitments(&flights);

        let hours = rolling_hours(&commitments, ts("2026-03-01 10:00"), None);
        assert!((hours[&1] - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_rolling_window_excludes_29_days() {
        let flights = vec![flight(1, Some(1), None, "2026-01-31 08:00", "2026-01-31 10:00")];
        let commitments = commitments(&flights);

        let hours = rolling_hours(&commitments, ts("2026-03-01 10:00"), None);
        assert!(!hours.contains_key(&1));
    }

    #[test]
    fn test_rolling_window_ignores_later_flights() {
        let flights = vec![flight(1, Some(1), None, "2026-03-05 08:00", "2026-03-05 10:00")];
        let commitments = commitments(&flights);

        let hours = rolling_hours(&commitments, ts("2026-03-01 10:00"), None);
        assert!(hours.is_empty());
    }

    #[test]
    fn test_rolling_hours_prefer_actual_times() {
        let mut logged = flight(1, Some(1), None, "2026-02-10 08:00", "2026-02-10 10:00");
        logged.departure_actual = Some(ts("2026-02-10 08:20"));
        logged.arrival_actual = Some(ts("2026-02-10 10:35"));
        let commitments = commitments(&[logged]);

        let hours = rolling_hours(&commitments, ts("2026-02-20 10:00"), None);
        assert!((hours[&1] - 2.25).abs() < 1e-9);
    }

    #[test]
    fn test_rolling_hours_round_total_once() {
        // Three 20-minute flights: rounding each to 0.33 would give 0.99.
        let flights = vec![
            flight(1, Some(1), None, "2026-02-10 08:00", "2026-02-10 08:20"),
            flight(2, Some(1), None, "2026-02-11 08:00", "2026-02-11 08:20"),
            flight(3, Some(1), None, "2026-02-12 08:00", "2026-02-12 08:20"),
        ];
        let hours = rolling_hours(&commitments(&flights), ts("2026-02-20 10:00"), None);
        assert!((hours[&1] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_dual_role_conflict_detected_once() {
        let flights = vec![
            flight(1, Some(1), None, "2026-01-09 15:30", "2026-01-09 16:55"),
            flight(2, None, Some(1), "2026-01-09 16:00", "2026-01-09 17:00"),
        ];
        let candidate = window("2026-01-09 16:30", "2026-01-09 18:00");

        let conflicts = conflicted_pilots(&commitments(&flights), &candidate, None);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[&1], vec![1, 2]);
        assert_eq!(available_ids(&flights, &roster(), &candidate, None), vec![2, 3]);
    }

    #[test]
    fn test_both_seats_on_same_flight_listed_once() {
        let mut odd = flight(1, Some(1), None, "2026-01-09 15:30", "2026-01-09 16:55");
        odd.copilot_id = Some(1);
        let candidate = window("2026-01-09 16:00", "2026-01-09 17:00");

        let conflicts = conflicted_pilots(&commitments(&[odd]), &candidate, None);
        assert_eq!(conflicts[&1], vec![1]);
    }

    #[test]
    fn test_unknown_pilot_id_in_flight_is_harmless() {
        let flights = vec![flight(1, Some(7), None, "2026-01-09 15:30", "2026-01-09 16:55")];
        let commitments = commitments(&flights);
        assert_eq!(commitments.len(), 1);
        assert_eq!(commitments[0].pilot_id, 7);

        let candidate = window("2026-01-09 15:30", "2026-01-09 16:55");
        assert_eq!(available_ids(&flights, &roster(), &candidate, None), vec![1, 2, 3]);
    }

    #[test]
    fn test_output_follows_pilot_source_order() {
        let pilots = vec![
            pilot(3, "Daniel", "Hughes"),
            pilot(1, "Alex", "Morrison"),
            pilot(2, "Emily", "Carter"),
        ];
        let candidate = window("2026-01-09 15:30", "2026-01-09 16:55");
        assert_eq!(available_ids(&[], &pilots, &candidate, None), vec![3, 1, 2]);
    }

    #[test]
    fn test_pilot_choices_excludes_other_seat() {
        let choices = pilot_choices(&roster(), Some(2));
        let ids: Vec<_> = choices.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(choices[0].display_name, "Alex Morrison");
        assert_eq!(choices[0].to_string(), "1. Alex Morrison");
    }

    #[test]
    fn test_engine_choices() {
        let flights = vec![flight(1, Some(1), None, "2026-01-09 15:30", "2026-01-09 16:55")];
        let pilots = roster();
        let engine = EligibilityEngine::new(flights.as_slice(), pilots.as_slice());
        let candidate = window("2026-01-09 16:00", "2026-01-09 17:00");

        let choices = engine.choices(&candidate, None, Some(3)).unwrap();
        assert_eq!(
            choices,
            vec![PilotChoice {
                id: 2,
                display_name: "Emily Carter".to_string()
            }]
        );
    }

    #[test]
    fn test_remaining_hours() {
        let flights = history(1, 100, 4, 10, "2026-02-01 00:00");
        let candidate = window("2026-02-20 10:00", "2026-02-20 11:00");
        let assessment = assessment_for(&flights, &roster(), &candidate, None, 1);
        assert!((assessment.remaining_hours() - 60.0).abs() < 1e-9);
    }

    struct FailingStore;

    impl FlightSource for FailingStore {
        fn list_all_flights(&self) -> Result<Vec<Flight>> {
            Err(Error::internal("store offline"))
        }
    }

    #[test]
    fn test_source_error_propagates() {
        let pilots = roster();
        let engine = EligibilityEngine::new(&FailingStore, pilots.as_slice());
        let candidate = window("2026-01-09 15:30", "2026-01-09 16:55");
        let err = engine.find_available_pilots(&candidate, None).unwrap_err();
        assert!(err.to_string().contains("store offline"));
    }

    proptest! {
        #[test]
        fn prop_idle_pilot_eligible_under_cap(start_min in 0i64..100_000, len_min in 0i64..5_999) {
            let departure = ts("2026-01-01 00:00") + Duration::minutes(start_min);
            let candidate = FlightWindow::new(departure, departure + Duration::minutes(len_min));
            let pilots = roster();
            prop_assert_eq!(available_ids(&[], &pilots, &candidate, None), vec![1, 2, 3]);
        }

        #[test]
        fn prop_role_does_not_change_outcome(
            offset_min in -600i64..600,
            len_min in 1i64..600,
        ) {
            let base = ts("2026-01-09 12:00");
            let stored = FlightWindow::new(base, base + Duration::hours(2));
            let departure = base + Duration::minutes(offset_min);
            let candidate = FlightWindow::new(departure, departure + Duration::minutes(len_min));

            let mut as_pilot = Flight::new("ZMY1", 1, 1, 2, stored);
            as_pilot.id = Some(1);
            as_pilot.pilot_id = Some(1);
            let mut as_copilot = as_pilot.clone();
            as_copilot.pilot_id = None;
            as_copilot.copilot_id = Some(1);

            let pilots = roster();
            prop_assert_eq!(
                available_ids(&[as_pilot], &pilots, &candidate, None),
                available_ids(&[as_copilot], &pilots, &candidate, None)
            );
        }
    }
}
