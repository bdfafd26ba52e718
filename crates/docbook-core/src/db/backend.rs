//! The local store as a booking backend.

use chrono::NaiveDate;

use super::{Database, DbError};
use crate::booking::{AppointmentBackend, BackendError, BackendResult, BookingConfirmation};
use crate::models::{Appointment, AppointmentStatus, Doctor, Role, UserProfile};

impl From<DbError> for BackendError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound(what) => BackendError::NotFound(what),
            DbError::Conflict(what) => BackendError::Conflict(what),
            other => BackendError::Rejected(other.to_string()),
        }
    }
}

impl AppointmentBackend for Database {
    fn get_booked_slots(&self, doctor_id: &str, date: NaiveDate) -> BackendResult<Vec<String>> {
        let slots = self.booked_slots(doctor_id, date)?;
        Ok(slots.iter().map(|s| s.label()).collect())
    }

    fn book_appointment(&self, appointment: &Appointment) -> BackendResult<BookingConfirmation> {
        if self.get_doctor(&appointment.doctor_id)?.is_none() {
            return Err(BackendError::NotFound(format!("doctor {}", appointment.doctor_id)));
        }

        self.insert_appointment(appointment)?;
        Ok(BookingConfirmation {
            appointment_id: appointment.id.clone(),
            status: appointment.status,
        })
    }

    fn remove_appointment(&self, appointment_id: &str) -> BackendResult<()> {
        self.set_appointment_status(appointment_id, AppointmentStatus::Cancelled)?;
        Ok(())
    }

    fn update_appointment_status(
        &self,
        appointment_id: &str,
        status: AppointmentStatus,
    ) -> BackendResult<()> {
        self.set_appointment_status(appointment_id, status)?;
        Ok(())
    }

    fn get_patient_by_email(&self, email: &str) -> BackendResult<String> {
        match self.get_user_by_email(email)? {
            Some(user) if user.role == Role::Patient => Ok(user.user_id),
            _ => Err(BackendError::NotFound(format!("patient {}", email))),
        }
    }

    fn get_doctor_by_id(&self, doctor_id: &str) -> BackendResult<Doctor> {
        self.get_doctor(doctor_id)?
            .ok_or_else(|| BackendError::NotFound(format!("doctor {}", doctor_id)))
    }

    fn get_user_details(&self, user_id: &str) -> BackendResult<UserProfile> {
        self.get_user(user_id)?
            .ok_or_else(|| BackendError::NotFound(format!("user {}", user_id)))
    }

    fn list_appointments(&self, role: Role, user_id: &str) -> BackendResult<Vec<Appointment>> {
        let appointments = match role {
            Role::Doctor => self.list_appointments_for_doctor(user_id)?,
            Role::Patient => self.list_appointments_for_patient(user_id)?,
        };
        Ok(appointments)
    }
}
