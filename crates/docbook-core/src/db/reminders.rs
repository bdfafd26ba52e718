//! Medication reminder database operations.

use chrono::{NaiveDate, NaiveTime};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{Database, DbError, DbResult};
use crate::models::MedicationReminder;

const REMINDER_COLUMNS: &str =
    "id, patient_id, medicine, times, start_date, end_date, active, created_at";

impl Database {
    /// Insert a reminder.
    pub fn insert_reminder(&self, reminder: &MedicationReminder) -> DbResult<()> {
        insert_reminder_row(&self.conn, reminder)
    }

    /// Insert a batch of reminders atomically: either all are stored or none.
    pub fn insert_reminders(&mut self, reminders: &[MedicationReminder]) -> DbResult<()> {
        let tx = self.transaction()?;
        for reminder in reminders {
            insert_reminder_row(&tx, reminder)?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Get a reminder by ID.
    pub fn get_reminder(&self, id: &str) -> DbResult<Option<MedicationReminder>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM medication_reminders WHERE id = ?", REMINDER_COLUMNS),
                [id],
                map_reminder_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// A patient's reminders, optionally only active ones.
    pub fn list_reminders_for_patient(
        &self,
        patient_id: &str,
        active_only: bool,
    ) -> DbResult<Vec<MedicationReminder>> {
        let mut stmt = self.conn.prepare(&format!(
            r#"
            SELECT {} FROM medication_reminders
            WHERE patient_id = ?1 AND (?2 = 0 OR active = 1)
            ORDER BY start_date, medicine
            "#,
            REMINDER_COLUMNS
        ))?;

        let rows = stmt.query_map(params![patient_id, active_only], map_reminder_row)?;

        let mut reminders = Vec::new();
        for row in rows {
            reminders.push(row?.try_into()?);
        }
        Ok(reminders)
    }

    /// Turn a reminder on or off.
    pub fn set_reminder_active(&self, id: &str, active: bool) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "UPDATE medication_reminders SET active = ?2 WHERE id = ?1",
            params![id, active],
        )?;
        Ok(rows_affected > 0)
    }

    /// Delete a reminder.
    pub fn delete_reminder(&self, id: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM medication_reminders WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }
}

fn insert_reminder_row(conn: &Connection, reminder: &MedicationReminder) -> DbResult<()> {
    let times_json = serde_json::to_string(&reminder.times)?;

    conn.execute(
        r#"
        INSERT INTO medication_reminders (
            id, patient_id, medicine, times, start_date, end_date, active, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
        params![
            reminder.id,
            reminder.patient_id,
            reminder.medicine,
            times_json,
            reminder.start_date.to_string(),
            reminder.end_date.map(|d| d.to_string()),
            reminder.active,
            reminder.created_at,
        ],
    )?;
    Ok(())
}

/// Intermediate row struct for database mapping.
struct ReminderRow {
    id: String,
    patient_id: String,
    medicine: String,
    times: String,
    start_date: String,
    end_date: Option<String>,
    active: bool,
    created_at: String,
}

fn map_reminder_row(row: &Row<'_>) -> rusqlite::Result<ReminderRow> {
    Ok(ReminderRow {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        medicine: row.get(2)?,
        times: row.get(3)?,
        start_date: row.get(4)?,
        end_date: row.get(5)?,
        active: row.get(6)?,
        created_at: row.get(7)?,
    })
}

fn parse_date(s: &str) -> DbResult<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| DbError::Constraint(format!("Invalid date {}: {}", s, e)))
}

impl TryFrom<ReminderRow> for MedicationReminder {
    type Error = DbError;

    fn try_from(row: ReminderRow) -> Result<Self, Self::Error> {
        let times: Vec<NaiveTime> = serde_json::from_str(&row.times)?;

        Ok(MedicationReminder {
            id: row.id,
            patient_id: row.patient_id,
            medicine: row.medicine,
            times,
            start_date: parse_date(&row.start_date)?,
            end_date: row.end_date.as_deref().map(parse_date).transpose()?,
            active: row.active,
            created_at: row.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_reminder(patient: &str, medicine: &str) -> MedicationReminder {
        let mut reminder = MedicationReminder::new(
            patient.into(),
            medicine.into(),
            vec![NaiveTime::from_hms_opt(8, 0, 0).unwrap(), NaiveTime::from_hms_opt(21, 0, 0).unwrap()],
            NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
        );
        reminder.end_date = NaiveDate::from_ymd_opt(2026, 5, 5);
        reminder
    }

    #[test]
    fn test_insert_and_get() {
        let db = Database::open_in_memory().unwrap();
        let reminder = make_reminder("pat-1", "Amoxicillin 500mg");
        db.insert_reminder(&reminder).unwrap();

        assert_eq!(db.get_reminder(&reminder.id).unwrap(), Some(reminder));
    }

    #[test]
    fn test_active_filter() {
        let db = Database::open_in_memory().unwrap();
        let a = make_reminder("pat-1", "A");
        let b = make_reminder("pat-1", "B");
        db.insert_reminder(&a).unwrap();
        db.insert_reminder(&b).unwrap();
        db.insert_reminder(&make_reminder("pat-2", "C")).unwrap();

        assert!(db.set_reminder_active(&a.id, false).unwrap());

        assert_eq!(db.list_reminders_for_patient("pat-1", false).unwrap().len(), 2);
        let active = db.list_reminders_for_patient("pat-1", true).unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].medicine, "B");
    }

    #[test]
    fn test_batch_insert_is_atomic() {
        let mut db = Database::open_in_memory().unwrap();
        let first = make_reminder("pat-1", "A");
        let second = make_reminder("pat-1", "B");

        db.insert_reminders(&[first.clone(), second]).unwrap();
        assert_eq!(db.list_reminders_for_patient("pat-1", false).unwrap().len(), 2);

        // A duplicate ID in the middle aborts the whole batch
        let fresh = make_reminder("pat-2", "C");
        let err = db
            .insert_reminders(&[fresh.clone(), first, make_reminder("pat-2", "D")])
            .unwrap_err();
        assert!(matches!(err, DbError::Sqlite(_)));
        assert_eq!(db.get_reminder(&fresh.id).unwrap(), None);
        assert!(db.list_reminders_for_patient("pat-2", false).unwrap().is_empty());
    }

    #[test]
    fn test_delete() {
        let db = Database::open_in_memory().unwrap();
        let reminder = make_reminder("pat-1", "A");
        db.insert_reminder(&reminder).unwrap();

        assert!(db.delete_reminder(&reminder.id).unwrap());
        assert!(!db.delete_reminder(&reminder.id).unwrap());
        assert_eq!(db.get_reminder(&reminder.id).unwrap(), None);
    }
}
