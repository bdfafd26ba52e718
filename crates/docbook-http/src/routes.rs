//! URL construction for the backend API.

use chrono::NaiveDate;
use docbook_core::models::Role;
use urlencoding::encode;

/// Builds endpoint URLs from a base such as `https://api.example.com/v1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routes {
    base_url: String,
}

impl Routes {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn doctor(&self, doctor_id: &str) -> String {
        format!("{}/doctors/{}", self.base_url, encode(doctor_id))
    }

    pub fn booked_slots(&self, doctor_id: &str, date: NaiveDate) -> String {
        format!("{}/booked-slots?date={}", self.doctor(doctor_id), date.format("%Y-%m-%d"))
    }

    pub fn appointments(&self) -> String {
        format!("{}/appointments", self.base_url)
    }

    pub fn appointment(&self, appointment_id: &str) -> String {
        format!("{}/{}", self.appointments(), encode(appointment_id))
    }

    pub fn appointment_status(&self, appointment_id: &str) -> String {
        format!("{}/status", self.appointment(appointment_id))
    }

    pub fn patient_by_email(&self, email: &str) -> String {
        format!("{}/patients?email={}", self.base_url, encode(email.trim()))
    }

    pub fn user(&self, user_id: &str) -> String {
        format!("{}/users/{}", self.base_url, encode(user_id))
    }

    pub fn appointments_for(&self, role: Role, user_id: &str) -> String {
        let collection = match role {
            Role::Doctor => "doctors",
            Role::Patient => "patients",
        };
        format!(
            "{}/{}/{}/appointments",
            self.base_url,
            collection,
            encode(user_id)
        )
    }
}
