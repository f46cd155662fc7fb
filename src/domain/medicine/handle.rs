//! src/domain/medicine/handle.rs

const MAX_DIGITS: usize = 20;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("A WhatsApp number must not be empty")]
    Empty,
    #[error("{0} is not a valid WhatsApp number")]
    Invalid(String),
}

/// Phone number identifying a WhatsApp account, stored as bare digits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipientHandle(String);

impl RecipientHandle {
    /// Accepts the usual ways of writing a phone number: `+254 712-345 678`,
    /// `(555) 010.0100`, or plain digits.
    pub fn parse(s: String) -> Result<Self, Error> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(Error::Empty);
        }

        let digits: String = trimmed
            .chars()
            .filter(|c| !matches!(c, '+' | ' ' | '-' | '.' | '(' | ')'))
            .collect();

        let is_valid = !digits.is_empty()
            && digits.len() <= MAX_DIGITS
            && digits.chars().all(|c| c.is_ascii_digit());
        if !is_valid {
            return Err(Error::Invalid(trimmed.to_string()));
        }

        Ok(Self(digits))
    }

    /// Address of the account on WhatsApp Web.
    pub fn chat_id(&self) -> String {
        format!("{}@c.us", self.0)
    }
}

impl AsRef<str> for RecipientHandle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RecipientHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_ref())
    }
}
