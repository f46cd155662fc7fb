//! src/domain/medicine/mod.rs
pub mod expiry;
pub mod handle;
pub mod medicine_name;
pub mod name;

pub use expiry::ExpiryDate;
pub use handle::RecipientHandle;
pub use medicine_name::MedicineName;
pub use name::RecipientName;

use crate::domain::reminder::{self, Reminder};
use crate::routes::MedicineForm;
use chrono::NaiveDate;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Missing required fields: name, whatsapp, medicine, expiry")]
    MissingFields,
    #[error(transparent)]
    Name(#[from] name::Error),
    #[error(transparent)]
    Handle(#[from] handle::Error),
    #[error(transparent)]
    Medicine(#[from] medicine_name::Error),
    #[error(transparent)]
    Expiry(#[from] expiry::Error),
}

/// A validated request to remind someone about an expiring medicine.
#[derive(Debug, Clone)]
pub struct MedicineReminder {
    pub recipient: RecipientName,
    pub handle: RecipientHandle,
    pub medicine: MedicineName,
    pub expiry: ExpiryDate,
}

impl MedicineReminder {
    pub fn evaluate(&self, today: NaiveDate) -> Reminder {
        reminder::evaluate(self.expiry.date(), today)
    }

    pub fn notification_text(&self) -> String {
        format!(
            "Hi {}, your medicine \"{}\" is expiring in {} days. Please return or replace it.",
            self.recipient,
            self.medicine,
            reminder::REMINDER_LEAD_DAYS
        )
    }
}

fn required(field: Option<String>) -> Result<String, ValidationError> {
    match field {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ValidationError::MissingFields),
    }
}

impl TryFrom<MedicineForm> for MedicineReminder {
    type Error = ValidationError;

    fn try_from(form: MedicineForm) -> Result<Self, Self::Error> {
        // Presence of every field is checked before any of them is parsed.
        let name = required(form.name)?;
        let whatsapp = required(form.whatsapp)?;
        let medicine = required(form.medicine)?;
        let expiry = required(form.expiry)?;

        Ok(Self {
            recipient: RecipientName::parse(name)?,
            handle: RecipientHandle::parse(whatsapp)?,
            medicine: MedicineName::parse(medicine)?,
            expiry: ExpiryDate::parse(expiry)?,
        })
    }
}
