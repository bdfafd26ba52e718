//! Dashboard summaries for doctors and patients.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{Appointment, AppointmentStatus, Role, Session};

/// Appointment counts by status.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusCounts {
    pub pending: u32,
    pub approved: u32,
    pub completed: u32,
    pub cancelled: u32,
}

impl StatusCounts {
    pub fn total(&self) -> u32 {
        self.pending + self.approved + self.completed + self.cancelled
    }

    fn record(&mut self, status: AppointmentStatus) {
        match status {
            AppointmentStatus::Pending => self.pending += 1,
            AppointmentStatus::Approved => self.approved += 1,
            AppointmentStatus::Completed => self.completed += 1,
            AppointmentStatus::Cancelled => self.cancelled += 1,
        }
    }
}

/// What a user sees on landing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardSummary {
    /// Whose dashboard this is
    pub user_id: String,
    pub role: Role,
    /// Day the summary was computed for
    pub as_of: NaiveDate,
    pub counts: StatusCounts,
    /// Non-terminal appointments from `as_of` on, soonest first
    pub upcoming: Vec<Appointment>,
    /// Pending requests awaiting the doctor (empty for patients)
    pub awaiting_approval: Vec<Appointment>,
}

impl DashboardSummary {
    /// Build a summary from the appointments the backend returned for `session`.
    ///
    /// Appointments that do not involve the session's user are skipped.
    pub fn for_session(session: &Session, appointments: &[Appointment], today: NaiveDate) -> Self {
        match session.role {
            Role::Doctor => Self::for_doctor(&session.user_id, appointments, today),
            Role::Patient => Self::for_patient(&session.user_id, appointments, today),
        }
    }

    pub fn for_doctor(doctor_id: &str, appointments: &[Appointment], today: NaiveDate) -> Self {
        let mine: Vec<&Appointment> = appointments
            .iter()
            .filter(|a| a.doctor_id == doctor_id)
            .collect();

        let mut awaiting_approval: Vec<Appointment> = mine
            .iter()
            .filter(|a| a.status == AppointmentStatus::Pending && a.date >= today)
            .map(|a| (*a).clone())
            .collect();
        sort_chronologically(&mut awaiting_approval);

        Self::build(doctor_id, Role::Doctor, &mine, today, awaiting_approval)
    }

    pub fn for_patient(patient_id: &str, appointments: &[Appointment], today: NaiveDate) -> Self {
        let mine: Vec<&Appointment> = appointments
            .iter()
            .filter(|a| a.patient_id == patient_id)
            .collect();

        Self::build(patient_id, Role::Patient, &mine, today, Vec::new())
    }

    fn build(
        user_id: &str,
        role: Role,
        appointments: &[&Appointment],
        today: NaiveDate,
        awaiting_approval: Vec<Appointment>,
    ) -> Self {
        let mut counts = StatusCounts::default();
        for appointment in appointments {
            counts.record(appointment.status);
        }

        let mut upcoming: Vec<Appointment> = appointments
            .iter()
            .filter(|a| !a.status.is_terminal() && a.date >= today)
            .map(|a| (*a).clone())
            .collect();
        sort_chronologically(&mut upcoming);

        Self {
            user_id: user_id.to_string(),
            role,
            as_of: today,
            counts,
            upcoming,
            awaiting_approval,
        }
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn sort_chronologically(appointments: &mut [Appointment]) {
    appointments.sort_by(|a, b| a.date.cmp(&b.date).then(a.slot.cmp(&b.slot)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::Slot;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 7, day).unwrap()
    }

    fn appt(doctor: &str, patient: &str, day: u32, slot: &str) -> Appointment {
        Appointment::new(doctor.into(), patient.into(), d(day), Slot::parse(slot).unwrap())
    }

    fn fixtures() -> Vec<Appointment> {
        let mut approved = appt("doc-1", "pat-1", 12, "9:00 AM");
        approved.approve().unwrap();

        let mut cancelled = appt("doc-1", "pat-2", 12, "9:30 AM");
        cancelled.cancel().unwrap();

        let mut completed = appt("doc-1", "pat-1", 3, "10:00 AM");
        completed.approve().unwrap();
        completed.complete().unwrap();

        vec![
            appt("doc-1", "pat-2", 15, "11:00 AM"),
            approved,
            cancelled,
            completed,
            appt("doc-1", "pat-1", 10, "2:00 PM"),
            appt("doc-1", "pat-3", 1, "2:00 PM"),
            appt("doc-2", "pat-1", 11, "4:00 PM"),
        ]
    }

    #[test]
    fn test_doctor_summary() {
        let summary = DashboardSummary::for_doctor("doc-1", &fixtures(), d(10));

        assert_eq!(
            summary.counts,
            StatusCounts {
                pending: 3,
                approved: 1,
                completed: 1,
                cancelled: 1
            }
        );
        assert_eq!(summary.counts.total(), 6);

        let upcoming: Vec<(NaiveDate, String)> = summary
            .upcoming
            .iter()
            .map(|a| (a.date, a.slot.label()))
            .collect();
        assert_eq!(
            upcoming,
            vec![
                (d(10), "2:00 PM".to_string()),
                (d(12), "9:00 AM".to_string()),
                (d(15), "11:00 AM".to_string()),
            ]
        );
        assert_eq!(summary.awaiting_approval.len(), 2);
    }

    #[test]
    fn test_patient_summary_spans_doctors() {
        let session = Session::new("pat-1", "p@example.com", Role::Patient);
        let summary = DashboardSummary::for_session(&session, &fixtures(), d(10));

        assert_eq!(summary.role, Role::Patient);
        assert_eq!(summary.counts.total(), 4);
        assert_eq!(summary.upcoming.len(), 3);
        assert!(summary.awaiting_approval.is_empty());
    }

    #[test]
    fn test_to_json() {
        let summary = DashboardSummary::for_doctor("doc-1", &fixtures(), d(10));
        let json = summary.to_json().unwrap();
        assert!(json.contains("\"awaiting_approval\""));
        assert!(json.contains("\"2:00 PM\""));
    }
}
