//! Built-in field patterns used by record validation.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Error, Result};

/// A compiled pattern that a text field must match.
#[derive(Debug)]
pub struct FieldPattern {
    /// Field the pattern applies to.
    pub field: &'static str,

    /// Human-readable description of the expected shape.
    pub description: &'static str,

    regex: Regex,
}

impl FieldPattern {
    /// Create a new field pattern.
    ///
    /// # Panics
    ///
    /// Panics if the regex pattern is invalid.
    #[must_use]
    pub fn new(field: &'static str, description: &'static str, pattern: &str) -> Self {
        Self {
            field,
            description,
            regex: Regex::new(pattern).expect("Invalid regex pattern"),
        }
    }

    /// Check if the value matches this pattern.
    #[must_use]
    pub fn matches(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }

    /// Validate a value, producing a [`Error::Validation`] on mismatch.
    ///
    /// # Errors
    ///
    /// Returns an error if the value does not match.
    pub fn check(&self, value: &str) -> Result<()> {
        if self.matches(value) {
            Ok(())
        } else {
            Err(Error::validation(
                self.field,
                format!("'{value}' is not {}", self.description),
            ))
        }
    }
}

/// Aircraft registration mark, e.g. `G-EUUH` or `N24974`.
pub fn registration() -> &'static FieldPattern {
    static PATTERN: OnceLock<FieldPattern> = OnceLock::new();
    PATTERN.get_or_init(|| {
        FieldPattern::new(
            "registration",
            "a registration mark (e.g. G-EUUH)",
            r"^[A-Z0-9]{1,3}-?[A-Z0-9]{1,6}$",
        )
    })
}

/// ICAO 24-bit transponder address as six hex digits.
pub fn icao_hex() -> &'static FieldPattern {
    static PATTERN: OnceLock<FieldPattern> = OnceLock::new();
    PATTERN.get_or_init(|| {
        FieldPattern::new(
            "icao_hex",
            "a 6-digit hexadecimal address",
            r"^[0-9A-F]{6}$",
        )
    })
}

/// ICAO aircraft type designator, e.g. `A320` or `B38M`.
pub fn icao_type() -> &'static FieldPattern {
    static PATTERN: OnceLock<FieldPattern> = OnceLock::new();
    PATTERN.get_or_init(|| {
        FieldPattern::new(
            "icao_type",
            "an ICAO type designator (e.g. A320)",
            r"^[A-Z][A-Z0-9]{1,3}$",
        )
    })
}

/// IATA or ICAO airport code.
pub fn airport_code() -> &'static FieldPattern {
    static PATTERN: OnceLock<FieldPattern> = OnceLock::new();
    PATTERN.get_or_init(|| {
        FieldPattern::new(
            "code",
            "a 3 or 4 letter airport code",
            r"^[A-Z]{3,4}$",
        )
    })
}

/// Airline flight number, e.g. `ZMY1423`.
pub fn flight_number() -> &'static FieldPattern {
    static PATTERN: OnceLock<FieldPattern> = OnceLock::new();
    PATTERN.get_or_init(|| {
        FieldPattern::new(
            "flight_number",
            "a flight number (e.g. ZMY1423)",
            r"^[A-Z0-9]{2,3}[0-9]{1,4}[A-Z]?$",
        )
    })
}

/// Reject empty or whitespace-only text.
///
/// # Errors
///
/// Returns [`Error::Validation`] for blank input.
pub fn require_text(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(Error::validation(field, "must not be empty"))
    } else {
        Ok(())
    }
}
