//! Slot generation from a doctor's working hours.
//!
//! ```text
//! "10:00AM-4:00PM" ──parse──▶ TimeRange ──generate_slots(15)──▶ [10:00 AM, 10:15 AM, ...]
//! ```
//!
//! Malformed timing strings fail closed: callers get an empty slot list and a
//! [`ScheduleError`] with a message they can show the user.

mod slots;
mod time_range;

pub use slots::*;
pub use time_range::*;

use thiserror::Error;

/// Schedule errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("No working hours configured")]
    Empty,

    #[error("Unrecognized working hours format: {0}")]
    MalformedRange(String),

    #[error("Invalid time of day: {0}")]
    InvalidTime(String),

    #[error("Working hours end ({end}) is not after start ({start})")]
    EmptyRange { start: String, end: String },

    #[error("Slot interval must be positive")]
    InvalidInterval,
}

impl ScheduleError {
    /// Message suitable for display next to the booking form.
    pub fn user_message(&self) -> String {
        match self {
            ScheduleError::Empty => "This doctor has not published working hours yet.".into(),
            ScheduleError::InvalidInterval => "Appointments cannot be scheduled right now.".into(),
            _ => "This doctor's working hours could not be read. Please try another doctor."
                .into(),
        }
    }
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
