//! `flightops` - Flight operations records and crew scheduling
//!
//! This library keeps aircraft, airports, pilots and flights in a local
//! `SQLite` database and decides which pilots may crew a flight: a pilot is
//! eligible when they have no overlapping flight and the new flight keeps
//! their rolling 28-day duty hours under the cap.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod app;
pub mod cli;
pub mod config;
pub mod eligibility;
pub mod error;
pub mod logging;
pub mod model;
pub mod render;
pub mod report;
pub mod scheduler;
pub mod shell;
pub mod storage;
pub mod time;

pub use app::App;
pub use config::Config;
pub use eligibility::{EligibilityEngine, FlightSource, PilotSource, MAX_DUTY_HOURS};
pub use error::{Error, Result};
pub use logging::init_logging;
pub use scheduler::Scheduler;
pub use storage::{Storage, StorageStats};
pub use time::FlightWindow;
