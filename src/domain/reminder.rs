//! src/domain/reminder.rs
use chrono::{Days, NaiveDate};

/// Number of days before expiry at which a reminder becomes due.
pub const REMINDER_LEAD_DAYS: u64 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reminder {
    pub due: bool,
    pub reminder_date: NaiveDate,
}

/// Decides whether the reminder for a medicine expiring on `expiry` is due on `today`.
///
/// The reminder date is `expiry` minus [`REMINDER_LEAD_DAYS`] calendar days.
/// The reminder is due when that date is on or before `today`.
pub fn evaluate(expiry: NaiveDate, today: NaiveDate) -> Reminder {
    let reminder_date = expiry
        .checked_sub_days(Days::new(REMINDER_LEAD_DAYS))
        .unwrap_or(NaiveDate::MIN);

    Reminder {
        due: reminder_date <= today,
        reminder_date,
    }
}
