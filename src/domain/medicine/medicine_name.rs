//! src/domain/medicine/medicine_name.rs
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("A medicine name must not be empty")]
    Empty,
}

/// Free-text name of the medicine, as the recipient typed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MedicineName(String);

impl MedicineName {
    pub fn parse(s: String) -> Result<Self, Error> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::Empty);
        }

        Ok(Self(s.to_string()))
    }
}

impl AsRef<str> for MedicineName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MedicineName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_ref())
    }
}
