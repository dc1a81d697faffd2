//! Record types kept in the flight-operations store.

mod aircraft;
mod airport;
mod flight;
pub mod patterns;
mod pilot;

pub use aircraft::{Aircraft, AircraftStatus};
pub use airport::Airport;
pub use flight::{CrewRole, Flight, FlightStatus, FlightSummary};
pub use pilot::Pilot;
