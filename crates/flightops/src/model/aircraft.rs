use serde::{Deserialize, Serialize};

use super::patterns;
use crate::error::{Error, Result};

/// Operational status of an airframe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AircraftStatus {
    /// In service.
    #[default]
    Active,
    /// Temporarily out of service.
    Inactive,
    /// Permanently retired.
    Decommissioned,
}

impl AircraftStatus {
    /// All statuses, in display order.
    pub const ALL: [Self; 3] = [Self::Active, Self::Inactive, Self::Decommissioned];

    /// The stored representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
            Self::Decommissioned => "Decommissioned",
        }
    }
}

impl std::fmt::Display for AircraftStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AircraftStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::validation("status", format!("unknown aircraft status '{s}'")))
    }
}

/// An airframe in the fleet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aircraft {
    /// Row id, `None` until stored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Registration mark (unique).
    pub registration: String,
    /// Manufacturer serial number (unique when present).
    pub manufacturer_serial_no: Option<i64>,
    /// ICAO 24-bit address in hex (unique when present).
    pub icao_hex: Option<String>,
    /// Manufacturer name.
    pub manufacturer: String,
    /// Model name.
    pub model: String,
    /// ICAO type designator.
    pub icao_type: Option<String>,
    /// Operational status.
    pub status: AircraftStatus,
}

impl Aircraft {
    /// Create an active aircraft with only the required fields set.
    #[must_use]
    pub fn new(
        registration: impl Into<String>,
        manufacturer: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            registration: registration.into(),
            manufacturer_serial_no: None,
            icao_hex: None,
            manufacturer: manufacturer.into(),
            model: model.into(),
            icao_type: None,
            status: AircraftStatus::Active,
        }
    }

    /// Manufacturer and model, e.g. `Airbus A320-214`.
    #[must_use]
    pub fn type_name(&self) -> String {
        format!("{} {}", self.manufacturer, self.model)
    }

    /// Check field formats.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] naming the first invalid field.
    pub fn validate(&self) -> Result<()> {
        patterns::registration().check(&self.registration)?;
        patterns::require_text("manufacturer", &self.manufacturer)?;
        patterns::require_text("model", &self.model)?;
        if let Some(serial) = self.manufacturer_serial_no {
            if serial <= 0 {
                return Err(Error::validation(
                    "manufacturer_serial_no",
                    "must be a positive number",
                ));
            }
        }
        if let Some(hex) = &self.icao_hex {
            patterns::icao_hex().check(hex)?;
        }
        if let Some(icao_type) = &self.icao_type {
            patterns::icao_type().check(icao_type)?;
        }
        Ok(())
    }
}

impl std::fmt::Display for Aircraft {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.registration, self.type_name())
    }
}
