//! Appointment booking.
//!
//! ```text
//! date ──▶ generate_slots ──┐
//!                           ├──▶ partition ──▶ user picks slot ──▶ confirm ──▶ Pending
//! backend booked slots ─────┘
//! ```
//!
//! - [`partition`]: pure availability logic
//! - [`AppointmentBackend`]: the collaborator that persists bookings
//! - [`BookingService`]: the flow, with one retry for idempotent reads and
//!   none for writes

mod backend;
mod reconcile;
mod service;

pub use backend::*;
pub use reconcile::*;
pub use service::*;

use thiserror::Error;

use crate::models::{AccessDenied, StatusTransitionError};
use crate::schedule::ScheduleError;

/// Booking errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BookingError {
    #[error("Doctor schedule unavailable: {0}")]
    Schedule(#[from] ScheduleError),

    #[error("Invalid booking request: {0}")]
    InvalidRequest(String),

    #[error("Slot {0} is no longer available")]
    SlotUnavailable(String),

    #[error(transparent)]
    Transition(#[from] StatusTransitionError),

    #[error(transparent)]
    Forbidden(#[from] AccessDenied),

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),
}

impl BookingError {
    /// Whether trying the same action again might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            BookingError::Backend(e) => e.is_retryable(),
            _ => false,
        }
    }

    /// Message suitable for display in the booking dialog.
    pub fn user_message(&self) -> String {
        match self {
            BookingError::Schedule(e) => e.user_message(),
            BookingError::InvalidRequest(_) => "Please choose one of the listed times.".into(),
            BookingError::SlotUnavailable(slot) => {
                format!("{} was just taken. Please pick another time.", slot)
            }
            BookingError::Transition(e) => format!("This appointment is already {}.", e.from),
            BookingError::Forbidden(_) => "Your account cannot perform this action.".into(),
            BookingError::Backend(BackendError::NotFound(_)) => {
                "We could not find that record.".into()
            }
            BookingError::Backend(e) if e.is_retryable() => {
                "Could not reach the server. Please try again.".into()
            }
            BookingError::Backend(_) => "The server rejected the request.".into(),
        }
    }
}

pub type BookingResult<T> = Result<T, BookingError>;
