use serde::{Deserialize, Serialize};

use super::patterns;
use crate::error::Result;

/// A pilot who can be rostered as captain or first officer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pilot {
    /// Row id, `None` until stored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub family_name: String,
}

impl Pilot {
    /// Create an unsaved pilot.
    #[must_use]
    pub fn new(first_name: impl Into<String>, family_name: impl Into<String>) -> Self {
        Self {
            id: None,
            first_name: first_name.into(),
            family_name: family_name.into(),
        }
    }

    /// `"{first_name} {family_name}"`, as shown in pilot choices.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.family_name)
    }

    /// Check that both names are present.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Validation`] for a blank name.
    pub fn validate(&self) -> Result<()> {
        patterns::require_text("first_name", &self.first_name)?;
        patterns::require_text("family_name", &self.family_name)
    }
}

impl std::fmt::Display for Pilot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.id {
            Some(id) => write!(f, "{id}. {}", self.display_name()),
            None => f.write_str(&self.display_name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name() {
        let pilot = Pilot::new("Alex", "Morrison");
        assert_eq!(pilot.display_name(), "Alex Morrison");
        assert_eq!(pilot.to_string(), "Alex Morrison");
    }

    #[test]
    fn test_display_with_id() {
        let mut pilot = Pilot::new("Emily", "Carter");
        pilot.id = Some(2);
        assert_eq!(pilot.to_string(), "2. Emily Carter");
    }

    #[test]
    fn test_validate_blank_family_name() {
        let err = Pilot::new("Emily", "").validate().unwrap_err();
        assert!(err.to_string().contains("family_name"));
    }
}
