//! The backend collaborator the booking flow depends on.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Appointment, AppointmentStatus, Doctor, Role, UserProfile};

/// Failures reported by a backend implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Request rejected: {0}")]
    Rejected(String),
}

impl BackendError {
    /// Transient failures that may succeed on another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, BackendError::Network(_) | BackendError::Timeout)
    }
}

pub type BackendResult<T> = Result<T, BackendError>;

/// Backend acknowledgement of a booking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookingConfirmation {
    pub appointment_id: String,
    pub status: AppointmentStatus,
}

/// Operations provided by the appointment backend.
///
/// Reads (`get_*`, `list_*`) are idempotent. `book_appointment`,
/// `remove_appointment` and `update_appointment_status` are not, and callers
/// must not retry them automatically.
pub trait AppointmentBackend {
    /// Slot labels already reserved for a doctor on a date.
    fn get_booked_slots(&self, doctor_id: &str, date: NaiveDate) -> BackendResult<Vec<String>>;

    /// Reserve a slot. A taken slot is reported as [`BackendError::Conflict`].
    fn book_appointment(&self, appointment: &Appointment) -> BackendResult<BookingConfirmation>;

    /// Withdraw an appointment.
    fn remove_appointment(&self, appointment_id: &str) -> BackendResult<()>;

    /// Record a doctor-driven status change.
    fn update_appointment_status(
        &self,
        appointment_id: &str,
        status: AppointmentStatus,
    ) -> BackendResult<()>;

    /// Resolve a patient's ID from their email.
    fn get_patient_by_email(&self, email: &str) -> BackendResult<String>;

    fn get_doctor_by_id(&self, doctor_id: &str) -> BackendResult<Doctor>;

    fn get_user_details(&self, user_id: &str) -> BackendResult<UserProfile>;

    /// Appointments where the user takes part in the given role.
    fn list_appointments(&self, role: Role, user_id: &str) -> BackendResult<Vec<Appointment>>;
}
