//! Doctor database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbResult};
use crate::models::Doctor;

const DOCTOR_COLUMNS: &str = "id, name, email, specialty, timings, consultation_fee";

impl Database {
    /// Insert or update a doctor profile.
    pub fn upsert_doctor(&self, doctor: &Doctor) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO doctors (id, name, email, specialty, timings, consultation_fee)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                email = excluded.email,
                specialty = excluded.specialty,
                timings = excluded.timings,
                consultation_fee = excluded.consultation_fee,
                updated_at = datetime('now')
            "#,
            params![
                doctor.id,
                doctor.name,
                doctor.email,
                doctor.specialty,
                doctor.timings,
                doctor.consultation_fee,
            ],
        )?;
        Ok(())
    }

    /// Get a doctor by ID.
    pub fn get_doctor(&self, id: &str) -> DbResult<Option<Doctor>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM doctors WHERE id = ?", DOCTOR_COLUMNS),
                [id],
                map_doctor_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// List all doctors, ordered by name.
    pub fn list_doctors(&self) -> DbResult<Vec<Doctor>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM doctors ORDER BY name", DOCTOR_COLUMNS))?;
        let rows = stmt.query_map([], map_doctor_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}

fn map_doctor_row(row: &Row<'_>) -> rusqlite::Result<Doctor> {
    Ok(Doctor {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        specialty: row.get(3)?,
        timings: row.get(4)?,
        consultation_fee: row.get(5)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_and_get() {
        let db = Database::open_in_memory().unwrap();

        let mut doctor = Doctor::new(
            "d1".into(),
            "Dr. Rao".into(),
            "Cardiology".into(),
            "10:00AM-4:00PM".into(),
        );
        doctor.consultation_fee = Some(500.0);
        db.upsert_doctor(&doctor).unwrap();
        assert_eq!(db.get_doctor("d1").unwrap(), Some(doctor.clone()));

        doctor.timings = "9:00AM-1:00PM".into();
        db.upsert_doctor(&doctor).unwrap();
        assert_eq!(db.get_doctor("d1").unwrap().unwrap().timings, "9:00AM-1:00PM");
        assert_eq!(db.list_doctors().unwrap().len(), 1);
    }

    #[test]
    fn test_list_ordered_by_name() {
        let db = Database::open_in_memory().unwrap();
        for (id, name) in [("d1", "Dr. Zed"), ("d2", "Dr. Amy")] {
            db.upsert_doctor(&Doctor::new(id.into(), name.into(), "GP".into(), "9AM-5PM".into()))
                .unwrap();
        }
        let names: Vec<String> = db.list_doctors().unwrap().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["Dr. Amy", "Dr. Zed"]);
    }
}
