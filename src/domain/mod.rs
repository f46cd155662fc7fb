//! src/domain/mod.rs
mod medicine;
pub use medicine::*;

pub mod reminder;
pub use reminder::Reminder;
