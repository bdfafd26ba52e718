//! Medication reminder models.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// A recurring daily reminder to take one medicine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MedicationReminder {
    /// Unique reminder ID
    pub id: String,
    /// Patient the reminder belongs to
    pub patient_id: String,
    /// Medicine line as prescribed
    pub medicine: String,
    /// Times of day to remind, ascending
    pub times: Vec<NaiveTime>,
    /// First day of the course
    pub start_date: NaiveDate,
    /// Last day of the course (inclusive); open-ended if absent
    pub end_date: Option<NaiveDate>,
    /// Whether the patient still wants reminders
    pub active: bool,
    /// Creation timestamp
    pub created_at: String,
}

impl MedicationReminder {
    /// Create a new active reminder. Times are sorted and deduplicated.
    pub fn new(
        patient_id: String,
        medicine: String,
        mut times: Vec<NaiveTime>,
        start_date: NaiveDate,
    ) -> Self {
        times.sort();
        times.dedup();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            patient_id,
            medicine,
            times,
            start_date,
            end_date: None,
            active: true,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Whether the course covers the given day.
    pub fn is_scheduled_on(&self, date: NaiveDate) -> bool {
        self.active
            && date >= self.start_date
            && self.end_date.map_or(true, |end| date <= end)
    }

    /// The first reminder strictly after `now`.
    pub fn next_due(&self, now: NaiveDateTime) -> Option<NaiveDateTime> {
        if !self.active || self.times.is_empty() {
            return None;
        }

        let mut date = now.date().max(self.start_date);
        loop {
            if let Some(end) = self.end_date {
                if date > end {
                    return None;
                }
            }
            if let Some(time) = self
                .times
                .iter()
                .map(|t| date.and_time(*t))
                .find(|dt| *dt > now)
            {
                return Some(time);
            }
            date = date.succ_opt()?;
        }
    }

    /// Every reminder in the half-open window `[from, to)`.
    pub fn due_between(&self, from: NaiveDateTime, to: NaiveDateTime) -> Vec<NaiveDateTime> {
        let mut due = Vec::new();
        if !self.active || from >= to {
            return due;
        }

        let mut date = from.date().max(self.start_date);
        while date <= to.date() {
            if !self.is_scheduled_on(date) {
                break;
            }
            due.extend(
                self.times
                    .iter()
                    .map(|t| date.and_time(*t))
                    .filter(|dt| *dt >= from && *dt < to),
            );
            match date.succ_opt() {
                Some(next) => date = next,
                None => break,
            }
        }
        due
    }
}
