//! DocBook Core Library
//!
//! Appointment booking, prescription QR payloads and medication reminders for
//! the DocBook doctor/patient app.
//!
//! # Architecture
//!
//! ```text
//!   Patient picks date
//!          │
//!          ▼
//!   Doctor timings ──parse──▶ TimeRange ──generate_slots──▶ [Slot]
//!                                                              │
//!   Backend booked slots ─────────────────────────────────▶ partition
//!                                                              │
//!                                            available / booked (display)
//!                                                              │
//!                                                   patient confirms slot
//!                                                              │
//!                                              ┌───────────────▼──────────────┐
//!                                              │  book_appointment (backend)  │
//!                                              │  Pending ─▶ Approved ─▶ Done │
//!                                              │     └──▶ Cancelled           │
//!                                              └──────────────────────────────┘
//!
//!   Doctor writes prescription ──encode──▶ QR ──scan──▶ decode ──▶ reminders
//! ```
//!
//! # Modules
//!
//! - [`schedule`]: Working-hours parsing and slot generation
//! - [`booking`]: Availability reconciliation, booking flow, backend trait
//! - [`codec`]: Prescription QR payload encode/decode
//! - [`models`]: Domain types (Appointment, Prescription, Doctor, Session, etc.)
//! - [`reminders`]: Medication reminders from prescription schedules
//! - [`directory`]: Doctor search
//! - [`dashboard`]: Doctor/patient dashboard summaries
//! - [`db`]: Local SQLite store implementing the backend
//! - [`config`]: Client configuration

pub mod booking;
pub mod codec;
pub mod config;
pub mod dashboard;
pub mod db;
pub mod directory;
pub mod models;
pub mod reminders;
pub mod schedule;

// Re-export commonly used types
pub use booking::{AppointmentBackend, BackendError, BookingError, BookingService, SlotPartition};
pub use codec::{decode, encode, DecodeError};
pub use config::DocBookConfig;
pub use db::Database;
pub use models::{
    Appointment, AppointmentStatus, BookingRequest, Doctor, MedicationReminder, Prescription,
    Role, Session, UserProfile,
};
pub use schedule::{generate_slots, Slot, TimeRange};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

use chrono::NaiveDate;

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum DocBookError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Slot unavailable: {0}")]
    SlotUnavailable(String),

    #[error("Not permitted: {0}")]
    Forbidden(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Scan error: {0}")]
    ScanError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<db::DbError> for DocBookError {
    fn from(e: db::DbError) -> Self {
        DocBookError::DatabaseError(e.to_string())
    }
}

impl From<schedule::ScheduleError> for DocBookError {
    fn from(e: schedule::ScheduleError) -> Self {
        DocBookError::InvalidInput(e.user_message())
    }
}

impl From<codec::DecodeError> for DocBookError {
    fn from(e: codec::DecodeError) -> Self {
        DocBookError::ScanError(e.user_message().to_string())
    }
}

impl From<codec::EncodeError> for DocBookError {
    fn from(e: codec::EncodeError) -> Self {
        DocBookError::InvalidInput(e.to_string())
    }
}

impl From<models::PrescriptionError> for DocBookError {
    fn from(e: models::PrescriptionError) -> Self {
        DocBookError::InvalidInput(e.to_string())
    }
}

impl From<BookingError> for DocBookError {
    fn from(e: BookingError) -> Self {
        let message = e.user_message();
        match e {
            BookingError::SlotUnavailable(_) => DocBookError::SlotUnavailable(message),
            BookingError::Forbidden(_) => DocBookError::Forbidden(message),
            BookingError::Backend(BackendError::NotFound(what)) => DocBookError::NotFound(what),
            BookingError::Backend(ref b) if b.is_retryable() => DocBookError::NetworkError(message),
            BookingError::Backend(b) => DocBookError::DatabaseError(b.to_string()),
            _ => DocBookError::InvalidInput(message),
        }
    }
}

impl From<serde_json::Error> for DocBookError {
    fn from(e: serde_json::Error) -> Self {
        DocBookError::InvalidInput(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for DocBookError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        DocBookError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a database at the given path.
#[uniffi::export]
pub fn open_database(path: String) -> Result<Arc<DocBookCore>, DocBookError> {
    let db = Database::open(&path)?;
    Ok(DocBookCore::wrap(db, DocBookConfig::default()))
}

/// Open or create a database, with settings read from a JSON config file.
///
/// A missing config file means default settings.
#[uniffi::export]
pub fn open_database_with_config(path: String, config_path: String) -> Result<Arc<DocBookCore>, DocBookError> {
    let config = DocBookConfig::load(&config_path)
        .map_err(|e| DocBookError::InvalidInput(format!("{:#}", e)))?;
    let db = Database::open(&path)?;
    Ok(DocBookCore::wrap(db, config))
}

/// Create an in-memory database (for testing).
#[uniffi::export]
pub fn open_database_in_memory() -> Result<Arc<DocBookCore>, DocBookError> {
    let db = Database::open_in_memory()?;
    Ok(DocBookCore::wrap(db, DocBookConfig::default()))
}

/// Slot labels for a timing string such as "10:00AM-4:00PM".
#[uniffi::export]
pub fn generate_time_slots(timing: String, interval_minutes: u32) -> Result<Vec<String>, DocBookError> {
    let slots = schedule::available_time_slots(&timing, interval_minutes)?;
    Ok(slots.iter().map(Slot::label).collect())
}

/// Encode a prescription for display as a QR code.
#[uniffi::export]
pub fn encode_prescription(prescription: FfiPrescription) -> Result<String, DocBookError> {
    let prescription = prescription.into_validated()?;
    Ok(codec::encode(&prescription)?)
}

/// Decode a scanned QR payload.
#[uniffi::export]
pub fn decode_prescription(payload: String) -> Result<FfiPrescription, DocBookError> {
    Ok(codec::decode(&payload)?.into())
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe database wrapper for FFI.
#[derive(uniffi::Object)]
pub struct DocBookCore {
    db: Arc<Mutex<Database>>,
    config: DocBookConfig,
}

impl DocBookCore {
    fn wrap(db: Database, config: DocBookConfig) -> Arc<Self> {
        Arc::new(Self {
            db: Arc::new(Mutex::new(db)),
            config,
        })
    }

    fn load_appointment(db: &Database, appointment_id: &str) -> Result<Appointment, DocBookError> {
        db.get_appointment(appointment_id)?
            .ok_or_else(|| DocBookError::NotFound(format!("appointment {}", appointment_id)))
    }
}

#[uniffi::export]
impl DocBookCore {
    // =========================================================================
    // Directory Operations
    // =========================================================================

    /// Add or update a doctor profile.
    pub fn upsert_doctor(&self, doctor: FfiDoctor) -> Result<(), DocBookError> {
        let db = self.db.lock()?;
        db.upsert_doctor(&doctor.into())?;
        Ok(())
    }

    /// Register a user account.
    pub fn register_user(&self, user: FfiUser) -> Result<(), DocBookError> {
        let db = self.db.lock()?;
        let profile = UserProfile::try_from(user)?;
        db.insert_user(&profile)?;
        Ok(())
    }

    /// Search doctors by name or specialty.
    pub fn search_doctors(&self, query: String, limit: u32) -> Result<Vec<FfiDoctor>, DocBookError> {
        let db = self.db.lock()?;
        let doctors = db.list_doctors()?;
        Ok(directory::search_doctors(&doctors, &query, limit as usize)
            .into_iter()
            .map(|m| m.doctor.into())
            .collect())
    }

    // =========================================================================
    // Booking Operations
    // =========================================================================

    /// Available and booked slots for a doctor on a date (YYYY-MM-DD).
    pub fn load_slots(&self, doctor_id: String, date: String) -> Result<FfiSlotPartition, DocBookError> {
        let db = self.db.lock()?;
        let service = BookingService::with_config(&*db, &self.config);
        let partition = service.load_slots(&doctor_id, parse_date(&date)?)?;
        Ok(partition.into())
    }

    /// Book a slot for the signed-in patient.
    pub fn book_appointment(
        &self,
        session: FfiSession,
        doctor_id: String,
        date: String,
        slot: String,
        notes: Option<String>,
    ) -> Result<FfiAppointment, DocBookError> {
        let session = Session::try_from(session)?;
        let request = BookingRequest {
            doctor_id,
            date: parse_date(&date)?,
            slot: Slot::parse(&slot)?,
            notes,
        };

        let db = self.db.lock()?;
        let service = BookingService::with_config(&*db, &self.config);
        let appointment = service.confirm(&session, &request)?;
        Ok(appointment.into())
    }

    /// Cancel an appointment.
    pub fn cancel_appointment(
        &self,
        session: FfiSession,
        appointment_id: String,
    ) -> Result<FfiAppointment, DocBookError> {
        let session = Session::try_from(session)?;
        let db = self.db.lock()?;
        let mut appointment = Self::load_appointment(&db, &appointment_id)?;
        BookingService::with_config(&*db, &self.config).cancel(&session, &mut appointment)?;
        Ok(appointment.into())
    }

    /// Doctor approves a pending appointment.
    pub fn approve_appointment(
        &self,
        session: FfiSession,
        appointment_id: String,
    ) -> Result<FfiAppointment, DocBookError> {
        let session = Session::try_from(session)?;
        let db = self.db.lock()?;
        let mut appointment = Self::load_appointment(&db, &appointment_id)?;
        BookingService::with_config(&*db, &self.config).approve(&session, &mut appointment)?;
        Ok(appointment.into())
    }

    /// Doctor marks an approved appointment as completed.
    pub fn complete_appointment(
        &self,
        session: FfiSession,
        appointment_id: String,
    ) -> Result<FfiAppointment, DocBookError> {
        let session = Session::try_from(session)?;
        let db = self.db.lock()?;
        let mut appointment = Self::load_appointment(&db, &appointment_id)?;
        BookingService::with_config(&*db, &self.config).complete(&session, &mut appointment)?;
        Ok(appointment.into())
    }

    /// Dashboard summary as JSON for the session's role.
    pub fn dashboard_json(&self, session: FfiSession, today: String) -> Result<String, DocBookError> {
        let session = Session::try_from(session)?;
        let today = parse_date(&today)?;

        let db = self.db.lock()?;
        let service = BookingService::with_config(&*db, &self.config);
        let appointments = service.appointments_for(&session)?;
        let summary = dashboard::DashboardSummary::for_session(&session, &appointments, today);
        Ok(summary.to_json()?)
    }

    // =========================================================================
    // Prescription / Reminder Operations
    // =========================================================================

    /// Decode a scanned prescription and store one reminder per medicine.
    pub fn import_prescription(
        &self,
        patient_id: String,
        payload: String,
        start_date: String,
    ) -> Result<Vec<FfiReminder>, DocBookError> {
        let prescription = codec::decode(&payload)?;
        let start_date = parse_date(&start_date)?;
        let reminders = reminders::reminders_from_prescription(&prescription, &patient_id, start_date);

        let mut db = self.db.lock()?;
        db.insert_reminders(&reminders)?;
        log::info!(
            "Imported prescription for {} with {} reminders",
            patient_id,
            reminders.len()
        );
        Ok(reminders.into_iter().map(|r| r.into()).collect())
    }

    /// A patient's active reminders.
    pub fn list_reminders(&self, patient_id: String) -> Result<Vec<FfiReminder>, DocBookError> {
        let db = self.db.lock()?;
        let reminders = db.list_reminders_for_patient(&patient_id, true)?;
        Ok(reminders.into_iter().map(|r| r.into()).collect())
    }

    /// Turn a reminder off (or back on).
    pub fn set_reminder_active(&self, reminder_id: String, active: bool) -> Result<bool, DocBookError> {
        let db = self.db.lock()?;
        Ok(db.set_reminder_active(&reminder_id, active)?)
    }
}

fn parse_date(date: &str) -> Result<NaiveDate, DocBookError> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|_| DocBookError::InvalidInput(format!("Invalid date: {}", date)))
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe session.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSession {
    pub user_id: String,
    pub email: String,
    pub role: String,
}

impl TryFrom<FfiSession> for Session {
    type Error = DocBookError;

    fn try_from(session: FfiSession) -> Result<Self, Self::Error> {
        let role = session.role.parse::<Role>().map_err(DocBookError::InvalidInput)?;
        Ok(Session::new(session.user_id, session.email, role))
    }
}

/// FFI-safe user.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiUser {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub role: String,
}

impl TryFrom<FfiUser> for UserProfile {
    type Error = DocBookError;

    fn try_from(user: FfiUser) -> Result<Self, Self::Error> {
        Ok(UserProfile {
            user_id: user.user_id,
            name: user.name,
            email: user.email,
            role: user.role.parse::<Role>().map_err(DocBookError::InvalidInput)?,
        })
    }
}

/// FFI-safe doctor.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDoctor {
    pub id: String,
    pub name: String,
    pub email: String,
    pub specialty: String,
    pub timings: String,
    pub consultation_fee: Option<f64>,
}

impl From<Doctor> for FfiDoctor {
    fn from(doctor: Doctor) -> Self {
        Self {
            id: doctor.id,
            name: doctor.name,
            email: doctor.email,
            specialty: doctor.specialty,
            timings: doctor.timings,
            consultation_fee: doctor.consultation_fee,
        }
    }
}

impl From<FfiDoctor> for Doctor {
    fn from(doctor: FfiDoctor) -> Self {
        Doctor {
            id: doctor.id,
            name: doctor.name,
            email: doctor.email,
            specialty: doctor.specialty,
            timings: doctor.timings,
            consultation_fee: doctor.consultation_fee,
        }
    }
}

/// FFI-safe slot partition.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSlotPartition {
    pub available: Vec<String>,
    pub booked: Vec<String>,
}

impl From<SlotPartition> for FfiSlotPartition {
    fn from(partition: SlotPartition) -> Self {
        Self {
            available: partition.available_labels(),
            booked: partition.booked_labels(),
        }
    }
}

/// FFI-safe appointment.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAppointment {
    pub id: String,
    pub doctor_id: String,
    pub patient_id: String,
    pub date: String,
    pub slot: String,
    pub status: String,
    pub notes: Option<String>,
}

impl From<Appointment> for FfiAppointment {
    fn from(appointment: Appointment) -> Self {
        Self {
            id: appointment.id,
            doctor_id: appointment.doctor_id,
            patient_id: appointment.patient_id,
            date: appointment.date.to_string(),
            slot: appointment.slot.label(),
            status: appointment.status.to_string(),
            notes: appointment.notes,
        }
    }
}

/// FFI-safe prescription.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPrescription {
    pub patient_name: String,
    pub patient_email: String,
    pub medicines: Vec<String>,
    pub schedule: String,
    pub instructions: String,
}

impl FfiPrescription {
    fn into_validated(self) -> Result<Prescription, DocBookError> {
        Ok(Prescription::new(
            self.patient_name,
            self.patient_email,
            self.medicines,
            self.schedule,
            self.instructions,
        )?)
    }
}

impl From<Prescription> for FfiPrescription {
    fn from(prescription: Prescription) -> Self {
        Self {
            patient_name: prescription.patient_name,
            patient_email: prescription.patient_email,
            medicines: prescription.medicines,
            schedule: prescription.schedule,
            instructions: prescription.instructions,
        }
    }
}

/// FFI-safe medication reminder.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiReminder {
    pub id: String,
    pub medicine: String,
    /// Times of day as "HH:MM"
    pub times: Vec<String>,
    pub start_date: String,
    pub end_date: Option<String>,
    pub active: bool,
}

impl From<MedicationReminder> for FfiReminder {
    fn from(reminder: MedicationReminder) -> Self {
        Self {
            id: reminder.id,
            medicine: reminder.medicine,
            times: reminder
                .times
                .iter()
                .map(|t| t.format("%H:%M").to_string())
                .collect(),
            start_date: reminder.start_date.to_string(),
            end_date: reminder.end_date.map(|d| d.to_string()),
            active: reminder.active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patient_session() -> FfiSession {
        FfiSession {
            user_id: "pat-1".into(),
            email: "asha@example.com".into(),
            role: "patient".into(),
        }
    }

    fn doctor_session() -> FfiSession {
        FfiSession {
            user_id: "doc-1".into(),
            email: "rao@example.com".into(),
            role: "doctor".into(),
        }
    }

    fn setup() -> Arc<DocBookCore> {
        let core = open_database_in_memory().unwrap();
        core.upsert_doctor(FfiDoctor {
            id: "doc-1".into(),
            name: "Dr. Rao".into(),
            email: "rao@example.com".into(),
            specialty: "Cardiology".into(),
            timings: "10:00AM-11:00AM".into(),
            consultation_fee: Some(500.0),
        })
        .unwrap();
        core
    }

    #[test]
    fn test_generate_time_slots() {
        let slots = generate_time_slots("10:00AM-11:00AM".into(), 15).unwrap();
        assert_eq!(slots, vec!["10:00 AM", "10:15 AM", "10:30 AM", "10:45 AM"]);
        assert!(matches!(
            generate_time_slots("".into(), 15),
            Err(DocBookError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_book_and_cancel_via_ffi() {
        let core = setup();

        let booked = core
            .book_appointment(patient_session(), "doc-1".into(), "2030-02-04".into(), "10:15 AM".into(), None)
            .unwrap();
        assert_eq!(booked.status, "pending");

        let partition = core.load_slots("doc-1".into(), "2030-02-04".into()).unwrap();
        assert_eq!(partition.booked, vec!["10:15 AM"]);

        let again = core.book_appointment(
            patient_session(),
            "doc-1".into(),
            "2030-02-04".into(),
            "10:15AM".into(),
            None,
        );
        assert!(matches!(again, Err(DocBookError::SlotUnavailable(_))));

        let cancelled = core.cancel_appointment(patient_session(), booked.id).unwrap();
        assert_eq!(cancelled.status, "cancelled");
        let partition = core.load_slots("doc-1".into(), "2030-02-04".into()).unwrap();
        assert!(partition.booked.is_empty());
    }

    #[test]
    fn test_approve_via_ffi() {
        let core = setup();
        let booked = core
            .book_appointment(patient_session(), "doc-1".into(), "2030-02-04".into(), "10:30 AM".into(), None)
            .unwrap();

        let approved = core.approve_appointment(doctor_session(), booked.id.clone()).unwrap();
        assert_eq!(approved.status, "approved");

        let json = core.dashboard_json(doctor_session(), "2030-02-01".into()).unwrap();
        assert!(json.contains("\"approved\": 1"));
    }

    #[test]
    fn test_open_database_with_config() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("docbook.db").to_string_lossy().to_string();
        let config_path = dir.path().join("config.json");
        std::fs::write(&config_path, r#"{"slot_interval_minutes": 30}"#).unwrap();

        let core = open_database_with_config(db_path.clone(), config_path.to_string_lossy().to_string()).unwrap();
        core.upsert_doctor(FfiDoctor {
            id: "doc-1".into(),
            name: "Dr. Rao".into(),
            email: "rao@example.com".into(),
            specialty: "Cardiology".into(),
            timings: "10:00AM-11:00AM".into(),
            consultation_fee: None,
        })
        .unwrap();
        let partition = core.load_slots("doc-1".into(), "2030-02-04".into()).unwrap();
        assert_eq!(partition.available, vec!["10:00 AM", "10:30 AM"]);

        // Missing config file falls back to defaults
        let missing = dir.path().join("absent.json").to_string_lossy().to_string();
        let core = open_database_with_config(db_path.clone(), missing).unwrap();
        assert_eq!(core.load_slots("doc-1".into(), "2030-02-04".into()).unwrap().available.len(), 4);

        std::fs::write(&config_path, r#"{"slot_interval_minutes": 0}"#).unwrap();
        assert!(matches!(
            open_database_with_config(db_path, config_path.to_string_lossy().to_string()),
            Err(DocBookError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_prescription_import_creates_reminders() {
        let core = setup();
        let payload = encode_prescription(FfiPrescription {
            patient_name: "Asha".into(),
            patient_email: "asha@example.com".into(),
            medicines: vec!["Amoxicillin 500mg".into(), "Cetirizine 10mg".into()],
            schedule: "morning and night for 5 days".into(),
            instructions: "after food".into(),
        })
        .unwrap();

        let reminders = core
            .import_prescription("pat-1".into(), payload, "2030-02-04".into())
            .unwrap();
        assert_eq!(reminders.len(), 2);
        assert_eq!(reminders[0].times, vec!["08:00", "21:00"]);
        assert_eq!(reminders[0].end_date.as_deref(), Some("2030-02-08"));

        assert_eq!(core.list_reminders("pat-1".into()).unwrap().len(), 2);
        assert!(matches!(
            core.import_prescription("pat-1".into(), "garbage".into(), "2030-02-04".into()),
            Err(DocBookError::ScanError(_))
        ));
    }
}
