//! Appointment database operations.

use chrono::NaiveDate;
use rusqlite::{params, ErrorCode, OptionalExtension, Row};

use super::{Database, DbError, DbResult};
use crate::models::{Appointment, AppointmentStatus};
use crate::schedule::Slot;

const APPOINTMENT_COLUMNS: &str =
    "id, doctor_id, patient_id, date, slot_minute, status, notes, created_at, updated_at";

impl Database {
    /// Insert a new appointment.
    ///
    /// Fails with [`DbError::Conflict`] if a live appointment already holds
    /// the same doctor/date/slot.
    pub fn insert_appointment(&self, appointment: &Appointment) -> DbResult<()> {
        let result = self.conn.execute(
            r#"
            INSERT INTO appointments (
                id, doctor_id, patient_id, date, slot_minute,
                status, notes, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                appointment.id,
                appointment.doctor_id,
                appointment.patient_id,
                appointment.date.to_string(),
                appointment.slot.minute_of_day(),
                appointment.status.as_str(),
                appointment.notes,
                appointment.created_at,
                appointment.updated_at,
            ],
        );

        match result {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == ErrorCode::ConstraintViolation
                    && err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                Err(DbError::Conflict(format!(
                    "{} on {} with {}",
                    appointment.slot, appointment.date, appointment.doctor_id
                )))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Get an appointment by ID.
    pub fn get_appointment(&self, id: &str) -> DbResult<Option<Appointment>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM appointments WHERE id = ?", APPOINTMENT_COLUMNS),
                [id],
                map_appointment_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// Apply a status change, enforcing the appointment state machine.
    pub fn set_appointment_status(&self, id: &str, status: AppointmentStatus) -> DbResult<Appointment> {
        let mut appointment = self
            .get_appointment(id)?
            .ok_or_else(|| DbError::NotFound(format!("appointment {}", id)))?;

        appointment
            .transition_to(status)
            .map_err(|e| DbError::Constraint(e.to_string()))?;

        self.conn.execute(
            "UPDATE appointments SET status = ?2, updated_at = ?3 WHERE id = ?1",
            params![appointment.id, status.as_str(), appointment.updated_at],
        )?;
        Ok(appointment)
    }

    /// Appointments with a doctor, soonest first.
    pub fn list_appointments_for_doctor(&self, doctor_id: &str) -> DbResult<Vec<Appointment>> {
        self.list_appointments_where("doctor_id", doctor_id)
    }

    /// Appointments booked by a patient, soonest first.
    pub fn list_appointments_for_patient(&self, patient_id: &str) -> DbResult<Vec<Appointment>> {
        self.list_appointments_where("patient_id", patient_id)
    }

    /// Slots held by live appointments for a doctor on a date.
    pub fn booked_slots(&self, doctor_id: &str, date: NaiveDate) -> DbResult<Vec<Slot>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT slot_minute FROM appointments
            WHERE doctor_id = ?1 AND date = ?2 AND status != 'cancelled'
            ORDER BY slot_minute
            "#,
        )?;

        let minutes = stmt
            .query_map(params![doctor_id, date.to_string()], |row| row.get::<_, u32>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        minutes
            .into_iter()
            .map(|m| {
                Slot::from_minute_of_day(m)
                    .ok_or_else(|| DbError::Constraint(format!("Invalid slot minute: {}", m)))
            })
            .collect()
    }

    fn list_appointments_where(&self, column: &str, value: &str) -> DbResult<Vec<Appointment>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM appointments WHERE {} = ? ORDER BY date, slot_minute",
            APPOINTMENT_COLUMNS, column
        ))?;

        let rows = stmt.query_map([value], map_appointment_row)?;

        let mut appointments = Vec::new();
        for row in rows {
            appointments.push(row?.try_into()?);
        }
        Ok(appointments)
    }
}

/// Intermediate row struct for database mapping.
struct AppointmentRow {
    id: String,
    doctor_id: String,
    patient_id: String,
    date: String,
    slot_minute: u32,
    status: String,
    notes: Option<String>,
    created_at: String,
    updated_at: String,
}

fn map_appointment_row(row: &Row<'_>) -> rusqlite::Result<AppointmentRow> {
    Ok(AppointmentRow {
        id: row.get(0)?,
        doctor_id: row.get(1)?,
        patient_id: row.get(2)?,
        date: row.get(3)?,
        slot_minute: row.get(4)?,
        status: row.get(5)?,
        notes: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

impl TryFrom<AppointmentRow> for Appointment {
    type Error = DbError;

    fn try_from(row: AppointmentRow) -> Result<Self, Self::Error> {
        let date = NaiveDate::parse_from_str(&row.date, "%Y-%m-%d")
            .map_err(|e| DbError::Constraint(format!("Invalid date {}: {}", row.date, e)))?;
        let slot = Slot::from_minute_of_day(row.slot_minute)
            .ok_or_else(|| DbError::Constraint(format!("Invalid slot minute: {}", row.slot_minute)))?;
        let status = row
            .status
            .parse::<AppointmentStatus>()
            .map_err(DbError::Constraint)?;

        Ok(Appointment {
            id: row.id,
            doctor_id: row.doctor_id,
            patient_id: row.patient_id,
            date,
            slot,
            status,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
