//! src/domain/medicine/expiry.rs
use chrono::{DateTime, NaiveDate, NaiveDateTime};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("An expiry date must not be empty")]
    Empty,
    #[error("Invalid expiry date: {0}. Expected a date in YYYY-MM-DD format")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryDate(NaiveDate);

impl ExpiryDate {
    /// Parses `YYYY-MM-DD`. ISO 8601 date-times, with or without an offset
    /// (`2024-06-15T10:00`, `2024-06-15T10:00:00`, `2024-06-15T10:00:00Z`), are
    /// accepted too, in which case only their calendar date is kept.
    pub fn parse(s: String) -> Result<Self, Error> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::Empty);
        }

        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Ok(Self(date));
        }

        if let Ok(timestamp) = DateTime::parse_from_rfc3339(s) {
            return Ok(Self(timestamp.date_naive()));
        }

        ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
            .map(|timestamp| Self(timestamp.date()))
            .ok_or_else(|| Error::Invalid(s.to_string()))
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl std::fmt::Display for ExpiryDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}
