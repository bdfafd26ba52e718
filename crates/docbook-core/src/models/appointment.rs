//! Appointment models and the status state machine.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::schedule::Slot;

/// Appointment status.
///
/// ```text
/// Pending ──approve──▶ Approved ──complete──▶ Completed
///    │
///    └──cancel──▶ Cancelled
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    /// Requested by the patient, awaiting the doctor
    Pending,
    /// Accepted by the doctor
    Approved,
    /// Visit took place
    Completed,
    /// Withdrawn by patient or doctor
    Cancelled,
}

impl AppointmentStatus {
    /// Statuses reachable in one step from this one.
    pub fn valid_transitions(&self) -> &'static [AppointmentStatus] {
        match self {
            AppointmentStatus::Pending => {
                &[AppointmentStatus::Approved, AppointmentStatus::Cancelled]
            }
            AppointmentStatus::Approved => &[AppointmentStatus::Completed],
            AppointmentStatus::Completed | AppointmentStatus::Cancelled => &[],
        }
    }

    pub fn can_transition_to(&self, next: AppointmentStatus) -> bool {
        self.valid_transitions().contains(&next)
    }

    pub fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Approved => "approved",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AppointmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(AppointmentStatus::Pending),
            "approved" => Ok(AppointmentStatus::Approved),
            "completed" => Ok(AppointmentStatus::Completed),
            "cancelled" => Ok(AppointmentStatus::Cancelled),
            other => Err(format!("Unknown appointment status: {}", other)),
        }
    }
}

/// Rejected status change.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Cannot move appointment from {from} to {to}")]
pub struct StatusTransitionError {
    pub from: AppointmentStatus,
    pub to: AppointmentStatus,
}

/// What a patient submits when confirming a slot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookingRequest {
    pub doctor_id: String,
    pub date: NaiveDate,
    pub slot: Slot,
    pub notes: Option<String>,
}

/// A booked appointment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Appointment {
    /// Unique appointment ID
    pub id: String,
    /// Doctor being visited
    pub doctor_id: String,
    /// Patient who booked
    pub patient_id: String,
    /// Visit date
    pub date: NaiveDate,
    /// Visit start slot
    pub slot: Slot,
    /// Current status
    pub status: AppointmentStatus,
    /// Reason for visit or other notes
    pub notes: Option<String>,
    /// Creation timestamp
    pub created_at: String,
    /// Last update timestamp
    pub updated_at: String,
}

impl Appointment {
    /// Create a new pending appointment.
    pub fn new(doctor_id: String, patient_id: String, date: NaiveDate, slot: Slot) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            doctor_id,
            patient_id,
            date,
            slot,
            status: AppointmentStatus::Pending,
            notes: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Create from a patient's booking request.
    pub fn from_request(request: &BookingRequest, patient_id: String) -> Self {
        let mut appointment = Self::new(
            request.doctor_id.clone(),
            patient_id,
            request.date,
            request.slot,
        );
        appointment.notes = request.notes.clone();
        appointment
    }

    /// Move to `next` if the state machine allows it.
    pub fn transition_to(&mut self, next: AppointmentStatus) -> Result<(), StatusTransitionError> {
        if !self.status.can_transition_to(next) {
            return Err(StatusTransitionError {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        self.touch();
        Ok(())
    }

    pub fn approve(&mut self) -> Result<(), StatusTransitionError> {
        self.transition_to(AppointmentStatus::Approved)
    }

    pub fn cancel(&mut self) -> Result<(), StatusTransitionError> {
        self.transition_to(AppointmentStatus::Cancelled)
    }

    pub fn complete(&mut self) -> Result<(), StatusTransitionError> {
        self.transition_to(AppointmentStatus::Completed)
    }

    /// Whether this appointment still holds its slot.
    pub fn holds_slot(&self) -> bool {
        self.status != AppointmentStatus::Cancelled
    }

    /// Two appointments conflict when both hold the same doctor/date/slot.
    pub fn conflicts_with(&self, other: &Appointment) -> bool {
        self.id != other.id
            && self.holds_slot()
            && other.holds_slot()
            && self.doctor_id == other.doctor_id
            && self.date == other.date
            && self.slot == other.slot
    }

    /// Touch the updated_at timestamp.
    pub fn touch(&mut self) {
        self.updated_at = chrono::Utc::now().to_rfc3339();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_appointment() -> Appointment {
        Appointment::new(
            "doc-1".into(),
            "pat-1".into(),
            NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            Slot::parse("10:00 AM").unwrap(),
        )
    }

    #[test]
    fn test_new_is_pending() {
        let appt = make_appointment();
        assert_eq!(appt.status, AppointmentStatus::Pending);
        assert_eq!(appt.id.len(), 36);
        assert!(appt.holds_slot());
    }

    #[test]
    fn test_happy_path() {
        let mut appt = make_appointment();
        appt.approve().unwrap();
        appt.complete().unwrap();
        assert_eq!(appt.status, AppointmentStatus::Completed);
        assert!(appt.status.is_terminal());
    }

    #[test]
    fn test_cancelled_is_terminal() {
        let mut appt = make_appointment();
        appt.cancel().unwrap();
        assert_eq!(appt.status, AppointmentStatus::Cancelled);

        for next in [
            AppointmentStatus::Pending,
            AppointmentStatus::Approved,
            AppointmentStatus::Completed,
            AppointmentStatus::Cancelled,
        ] {
            let err = appt.transition_to(next).unwrap_err();
            assert_eq!(err.from, AppointmentStatus::Cancelled);
            assert_eq!(err.to, next);
        }
        assert_eq!(appt.status, AppointmentStatus::Cancelled);
    }

    #[test]
    fn test_pending_cannot_complete() {
        let mut appt = make_appointment();
        assert!(appt.complete().is_err());
        assert_eq!(appt.status, AppointmentStatus::Pending);
    }

    #[test]
    fn test_approved_cannot_cancel() {
        let mut appt = make_appointment();
        appt.approve().unwrap();
        assert!(appt.cancel().is_err());
    }

    #[test]
    fn test_cancelled_does_not_conflict() {
        let a = make_appointment();
        let mut b = make_appointment();
        assert!(a.conflicts_with(&b));

        b.cancel().unwrap();
        assert!(!a.conflicts_with(&b));
    }

    #[test]
    fn test_status_serde() {
        let json = serde_json::to_string(&AppointmentStatus::Approved).unwrap();
        assert_eq!(json, "\"approved\"");
        assert_eq!(
            "cancelled".parse::<AppointmentStatus>().unwrap(),
            AppointmentStatus::Cancelled
        );
    }
}
