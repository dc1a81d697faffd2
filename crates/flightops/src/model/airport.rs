use serde::{Deserialize, Serialize};

use super::patterns;
use crate::error::Result;

/// An airport that flights depart from or arrive at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Airport {
    /// Row id, `None` until stored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// IATA/ICAO code (unique).
    pub code: String,
    /// Full name.
    pub name: Option<String>,
    /// City served.
    pub city: Option<String>,
    /// Country.
    pub country: Option<String>,
    /// World region, e.g. `Europe`.
    pub region: Option<String>,
}

impl Airport {
    /// Create an airport with only its code set.
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            id: None,
            code: code.into(),
            name: None,
            city: None,
            country: None,
            region: None,
        }
    }

    /// Check field formats.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Validation`] if the code is malformed.
    pub fn validate(&self) -> Result<()> {
        patterns::airport_code().check(&self.code)
    }
}

impl std::fmt::Display for Airport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} ({name})", self.code),
            None => f.write_str(&self.code),
        }
    }
}
