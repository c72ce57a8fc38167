//! Recurrence expansion.
//!
//! Turns one submitted event plus a repeat rule into the concrete
//! occurrences that get persisted. Everything here is pure: the current
//! time is a parameter, never read from the clock.

mod error;
mod generator;
mod types;

pub use error::RecurrenceError;
pub use generator::{generate, last_day_of_month};
pub use types::{Recurrence, RecurrenceDescriptor, RecurrencePattern};
