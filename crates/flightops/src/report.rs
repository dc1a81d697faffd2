//! Pilot duty report.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::eligibility::{commitments, rolling_hours, MAX_DUTY_HOURS};
use crate::model::{Flight, Pilot};

/// One pilot's line in the duty report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DutyReportRow {
    /// Pilot id.
    pub pilot_id: i64,
    /// `"{first_name} {family_name}"`.
    pub name: String,
    /// Flights the pilot is rostered on, in either seat, at any time.
    pub flights_assigned: usize,
    /// Hours flown in the rolling window ending at the report time.
    pub hours_last_28_days: f64,
    /// Hours left before the duty cap.
    pub remaining_hours: f64,
}

/// Build the duty report as of `as_of`, one row per stored pilot in the
/// order given.
#[must_use]
pub fn duty_report(flights: &[Flight], pilots: &[Pilot], as_of: NaiveDateTime) -> Vec<DutyReportRow> {
    let hours = rolling_hours(&commitments(flights), as_of, None);

    pilots
        .iter()
        .filter_map(|pilot| {
            let pilot_id = pilot.id?;
            let hours_last_28_days = hours.get(&pilot_id).copied().unwrap_or(0.0);
            Some(DutyReportRow {
                pilot_id,
                name: pilot.display_name(),
                flights_assigned: flights.iter().filter(|f| f.is_crewed_by(pilot_id)).count(),
                hours_last_28_days,
                remaining_hours: (MAX_DUTY_HOURS - hours_last_28_days).max(0.0),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::test_support::create_test_storage;
    use crate::time::ts;

    #[test]
    fn test_report_on_seed_data() {
        let storage = create_test_storage();
        storage.seed_demo_data().unwrap();
        let flights = storage.list_flights().unwrap();
        let pilots = storage.list_pilots().unwrap();

        let report = duty_report(&flights, &pilots, ts("2026-01-20 00:00"));
        assert_eq!(report.len(), 10);

        // Alex Morrison: ZMY1423 (flew 15:30-16:50) and ZMY144 in October.
        let alex = report.iter().find(|r| r.pilot_id == 1).unwrap();
        assert_eq!(alex.name, "Alex Morrison");
        assert_eq!(alex.flights_assigned, 2);
        assert!((alex.hours_last_28_days - 1.33).abs() < 1e-9);
        assert!((alex.remaining_hours - 98.67).abs() < 1e-9);

        // Daniel Hughes flew ZMY65 as copilot, 09:50-11:15.
        let daniel = report.iter().find(|r| r.pilot_id == 3).unwrap();
        assert!((daniel.hours_last_28_days - 1.42).abs() < 1e-9);
        assert_eq!(daniel.flights_assigned, 4);
    }

    #[test]
    fn test_report_idle_pilot() {
        let mut pilot = Pilot::new("Noah", "Feldman");
        pilot.id = Some(9);
        let report = duty_report(&[], &[pilot], ts("2026-01-20 00:00"));
        assert_eq!(report[0].flights_assigned, 0);
        assert!(report[0].hours_last_28_days.abs() < f64::EPSILON);
        assert!((report[0].remaining_hours - MAX_DUTY_HOURS).abs() < f64::EPSILON);
    }

    #[test]
    fn test_report_skips_unsaved_pilots() {
        let report = duty_report(&[], &[Pilot::new("A", "B")], ts("2026-01-20 00:00"));
        assert!(report.is_empty());
    }
}
