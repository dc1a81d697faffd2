//! Airport records.

use rusqlite::{params, OptionalExtension, Row};
use tracing::debug;

use super::{search_clause, Storage};
use crate::error::{Error, Result};
use crate::model::Airport;

/// Columns that `search_airports` accepts.
pub const AIRPORT_SEARCH_FIELDS: &[&str] = &["code", "name", "city", "country", "region"];

const SELECT_AIRPORT: &str = "SELECT id, code, name, city, country, region FROM airport";

fn airport_from_row(row: &Row) -> rusqlite::Result<Airport> {
    Ok(Airport {
        id: Some(row.get(0)?),
        code: row.get(1)?,
        name: row.get(2)?,
        city: row.get(3)?,
        country: row.get(4)?,
        region: row.get(5)?,
    })
}

impl Storage {
    /// Insert a new airport and return its id.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails or the code already exists.
    pub fn add_airport(&self, airport: &Airport) -> Result<i64> {
        airport.validate()?;
        self.conn.execute(
            "INSERT INTO airport (code, name, city, country, region) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                airport.code,
                airport.name,
                airport.city,
                airport.country,
                airport.region
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!("Added airport {} as {}", airport.code, id);
        Ok(id)
    }

    /// Get an airport by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_airport(&self, id: i64) -> Result<Option<Airport>> {
        let airport = self
            .conn
            .query_row(
                &format!("{SELECT_AIRPORT} WHERE id = ?1"),
                [id],
                airport_from_row,
            )
            .optional()?;
        Ok(airport)
    }

    /// Get an airport by its code.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_airport_by_code(&self, code: &str) -> Result<Option<Airport>> {
        let airport = self
            .conn
            .query_row(
                &format!("{SELECT_AIRPORT} WHERE code = ?1"),
                [code],
                airport_from_row,
            )
            .optional()?;
        Ok(airport)
    }

    /// List all airports ordered by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_airports(&self) -> Result<Vec<Airport>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SELECT_AIRPORT} ORDER BY code"))?;
        let airports = stmt
            .query_map([], airport_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(airports)
    }

    /// Find airports whose `field` equals `value`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSearchField`] if `field` is not searchable.
    pub fn search_airports(&self, field: &str, value: &str) -> Result<Vec<Airport>> {
        let clause = search_clause("airport", AIRPORT_SEARCH_FIELDS, field)?;
        let mut stmt = self
            .conn
            .prepare(&format!("{SELECT_AIRPORT} {clause} ORDER BY code"))?;
        let airports = stmt
            .query_map([value], airport_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(airports)
    }

    /// Replace every field of a stored airport.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no airport has the given id.
    pub fn update_airport(&self, id: i64, airport: &Airport) -> Result<()> {
        airport.validate()?;
        let changed = self.conn.execute(
            "UPDATE airport SET code = ?1, name = ?2, city = ?3, country = ?4, region = ?5 \
             WHERE id = ?6",
            params![
                airport.code,
                airport.name,
                airport.city,
                airport.country,
                airport.region,
                id
            ],
        )?;
        if changed == 0 {
            return Err(Error::not_found("airport", id));
        }
        Ok(())
    }

    /// Delete an airport. Returns whether a row was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if flights still reference the airport.
    pub fn delete_airport(&self, id: i64) -> Result<bool> {
        let deleted = self.conn.execute("DELETE FROM airport WHERE id = ?1", [id])?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    fn heathrow() -> Airport {
        let mut airport = Airport::new("LHR");
        airport.name = Some("London Heathrow".to_string());
        airport.city = Some("London".to_string());
        airport.country = Some("United Kingdom".to_string());
        airport.region = Some("Europe".to_string());
        airport
    }

    #[test]
    fn test_add_and_get_by_code() {
        let storage = create_test_storage();
        let id = storage.add_airport(&heathrow()).unwrap();

        let by_id = storage.get_airport(id).unwrap().unwrap();
        let by_code = storage.get_airport_by_code("LHR").unwrap().unwrap();
        assert_eq!(by_id, by_code);
        assert_eq!(by_id.city.as_deref(), Some("London"));
    }

    #[test]
    fn test_duplicate_code_rejected() {
        let storage = create_test_storage();
        storage.add_airport(&heathrow()).unwrap();
        assert!(storage.add_airport(&Airport::new("LHR")).is_err());
    }

    #[test]
    fn test_list_ordered_by_code() {
        let storage = create_test_storage();
        storage.add_airport(&Airport::new("SYD")).unwrap();
        storage.add_airport(&Airport::new("AMS")).unwrap();
        let codes: Vec<_> = storage
            .list_airports()
            .unwrap()
            .into_iter()
            .map(|a| a.code)
            .collect();
        assert_eq!(codes, vec!["AMS", "SYD"]);
    }

    #[test]
    fn test_search_by_region() {
        let storage = create_test_storage();
        storage.add_airport(&heathrow()).unwrap();
        storage.add_airport(&Airport::new("SYD")).unwrap();
        let found = storage.search_airports("region", "Europe").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].code, "LHR");
    }

    #[test]
    fn test_search_rejects_unknown_field() {
        let storage = create_test_storage();
        assert!(storage.search_airports("id", "1").is_err());
    }

    #[test]
    fn test_update_and_delete() {
        let storage = create_test_storage();
        let id = storage.add_airport(&Airport::new("LHR")).unwrap();
        storage.update_airport(id, &heathrow()).unwrap();
        assert_eq!(
            storage.get_airport(id).unwrap().unwrap().name.as_deref(),
            Some("London Heathrow")
        );
        assert!(storage.delete_airport(id).unwrap());
        assert!(storage.update_airport(id, &heathrow()).unwrap_err().is_not_found());
    }
}
