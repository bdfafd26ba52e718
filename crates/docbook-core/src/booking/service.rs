//! Booking flow: load slots, confirm, cancel, and doctor-driven transitions.

use chrono::NaiveDate;

use crate::config::{DocBookConfig, DEFAULT_SLOT_INTERVAL_MINUTES};
use crate::models::{
    AccessDenied, Appointment, AppointmentStatus, BookingRequest, Doctor, Role, Session, UserProfile,
};
use crate::schedule::generate_slots;

use super::{
    partition_labels, AppointmentBackend, BackendError, BackendResult, BookingError,
    BookingResult, SlotPartition,
};

/// Drives the booking flow against a backend.
pub struct BookingService<'a, B: AppointmentBackend + ?Sized> {
    backend: &'a B,
    slot_interval_minutes: u32,
    read_retries: u32,
}

impl<'a, B: AppointmentBackend + ?Sized> BookingService<'a, B> {
    /// Create a service with default settings.
    pub fn new(backend: &'a B) -> Self {
        Self {
            backend,
            slot_interval_minutes: DEFAULT_SLOT_INTERVAL_MINUTES,
            read_retries: 1,
        }
    }

    /// Create a service using the slot interval and retry count from config.
    pub fn with_config(backend: &'a B, config: &DocBookConfig) -> Self {
        Self {
            backend,
            slot_interval_minutes: config.slot_interval_minutes,
            read_retries: config.read_retries,
        }
    }

    pub fn slot_interval_minutes(&self) -> u32 {
        self.slot_interval_minutes
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Generate a doctor's slots for `date` and mark the booked ones.
    pub fn load_slots(&self, doctor_id: &str, date: NaiveDate) -> BookingResult<SlotPartition> {
        let doctor = self.doctor(doctor_id)?;
        let range = doctor.working_hours()?;
        let all_slots = generate_slots(&range, self.slot_interval_minutes);

        let booked = self.read("get_booked_slots", || {
            self.backend.get_booked_slots(doctor_id, date)
        })?;

        let partition = partition_labels(&all_slots, &booked);
        log::debug!(
            "Doctor {} on {}: {} available, {} booked",
            doctor_id,
            date,
            partition.available.len(),
            partition.booked.len()
        );
        Ok(partition)
    }

    pub fn doctor(&self, doctor_id: &str) -> BookingResult<Doctor> {
        Ok(self.read("get_doctor_by_id", || {
            self.backend.get_doctor_by_id(doctor_id)
        })?)
    }

    pub fn user_details(&self, user_id: &str) -> BookingResult<UserProfile> {
        Ok(self.read("get_user_details", || {
            self.backend.get_user_details(user_id)
        })?)
    }

    pub fn patient_id_for_email(&self, email: &str) -> BookingResult<String> {
        Ok(self.read("get_patient_by_email", || {
            self.backend.get_patient_by_email(email)
        })?)
    }

    /// Appointments visible on the session's dashboard.
    pub fn appointments_for(&self, session: &Session) -> BookingResult<Vec<Appointment>> {
        Ok(self.read("list_appointments", || {
            self.backend.list_appointments(session.role, &session.user_id)
        })?)
    }

    // =========================================================================
    // Writes (never retried)
    // =========================================================================

    /// Book the requested slot for the signed-in patient.
    ///
    /// The slot must be one generated from the doctor's hours and not already
    /// booked. If another patient takes it between the availability check and
    /// the booking call, the backend's conflict surfaces as
    /// [`BookingError::SlotUnavailable`].
    pub fn confirm(&self, session: &Session, request: &BookingRequest) -> BookingResult<Appointment> {
        session.require_role(Role::Patient)?;

        let partition = self.load_slots(&request.doctor_id, request.date)?;
        if !partition.contains(&request.slot) {
            return Err(BookingError::InvalidRequest(format!(
                "{} is not a bookable time for this doctor",
                request.slot
            )));
        }
        if !partition.is_available(&request.slot) {
            return Err(BookingError::SlotUnavailable(request.slot.label()));
        }

        let mut appointment = Appointment::from_request(request, session.user_id.clone());

        match self.backend.book_appointment(&appointment) {
            Ok(confirmation) => {
                appointment.id = confirmation.appointment_id;
                appointment.status = confirmation.status;
                log::info!(
                    "Booked appointment {} with {} at {} on {}",
                    appointment.id,
                    appointment.doctor_id,
                    appointment.slot,
                    appointment.date
                );
                Ok(appointment)
            }
            Err(BackendError::Conflict(reason)) => {
                log::warn!("Slot {} taken before confirmation: {}", request.slot, reason);
                Err(BookingError::SlotUnavailable(request.slot.label()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Cancel an appointment the session takes part in.
    ///
    /// The local record only changes once the backend accepts the removal.
    pub fn cancel(&self, session: &Session, appointment: &mut Appointment) -> BookingResult<()> {
        ensure_participant(session, appointment)?;
        ensure_transition(appointment, AppointmentStatus::Cancelled)?;

        self.backend.remove_appointment(&appointment.id)?;
        appointment.cancel()?;
        log::info!("Cancelled appointment {}", appointment.id);
        Ok(())
    }

    /// Doctor approves a pending appointment.
    pub fn approve(&self, session: &Session, appointment: &mut Appointment) -> BookingResult<()> {
        session.require_role(Role::Doctor)?;
        ensure_participant(session, appointment)?;
        self.apply_status(appointment, AppointmentStatus::Approved)
    }

    /// Mark an approved appointment as completed.
    pub fn complete(&self, session: &Session, appointment: &mut Appointment) -> BookingResult<()> {
        session.require_role(Role::Doctor)?;
        ensure_participant(session, appointment)?;
        self.apply_status(appointment, AppointmentStatus::Completed)
    }

    fn apply_status(&self, appointment: &mut Appointment, next: AppointmentStatus) -> BookingResult<()> {
        ensure_transition(appointment, next)?;
        self.backend
            .update_appointment_status(&appointment.id, next)?;
        appointment.transition_to(next)?;
        log::info!("Appointment {} is now {}", appointment.id, next);
        Ok(())
    }

    /// Run an idempotent read, retrying transient failures.
    fn read<T>(&self, operation: &str, f: impl Fn() -> BackendResult<T>) -> BackendResult<T> {
        let mut attempt = 0;
        loop {
            match f() {
                Err(e) if e.is_retryable() && attempt < self.read_retries => {
                    attempt += 1;
                    log::warn!("{} failed ({}), retrying ({}/{})", operation, e, attempt, self.read_retries);
                }
                result => return result,
            }
        }
    }
}

fn ensure_transition(appointment: &Appointment, next: AppointmentStatus) -> BookingResult<()> {
    if appointment.status.can_transition_to(next) {
        Ok(())
    } else {
        Err(crate::models::StatusTransitionError {
            from: appointment.status,
            to: next,
        }
        .into())
    }
}

fn ensure_participant(session: &Session, appointment: &Appointment) -> BookingResult<()> {
    let participant = match session.role {
        Role::Doctor => &appointment.doctor_id,
        Role::Patient => &appointment.patient_id,
    };
    if *participant == session.user_id {
        Ok(())
    } else {
        Err(AccessDenied::NotParticipant {
            user_id: session.user_id.clone(),
            appointment_id: appointment.id.clone(),
        }
        .into())
    }
}
