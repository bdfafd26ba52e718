//! Blocking reqwest client implementing the backend trait.

use std::time::Duration;

use chrono::NaiveDate;
use docbook_core::booking::{
    AppointmentBackend, BackendError, BackendResult, BookingConfirmation,
};
use docbook_core::config::DocBookConfig;
use docbook_core::models::{Appointment, AppointmentStatus, Doctor, Role, UserProfile};
use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::routes::Routes;
use crate::wire::{
    classify_status, BookedSlotsResponse, PatientLookupResponse, StatusUpdateRequest,
};

/// Client construction errors.
#[derive(Error, Debug)]
pub enum HttpError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

/// Backend reached over HTTP/JSON. Every request carries the configured
/// timeout; retries are left to [`BookingService`](docbook_core::BookingService).
pub struct HttpBackend {
    client: Client,
    routes: Routes,
}

impl HttpBackend {
    /// Build a client from configuration.
    pub fn from_config(config: &DocBookConfig) -> Result<Self, HttpError> {
        config
            .validate()
            .map_err(|e| HttpError::Config(e.to_string()))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            routes: Routes::new(&config.api_base_url),
        })
    }

    pub fn routes(&self) -> &Routes {
        &self.routes
    }

    fn send(&self, request: RequestBuilder) -> BackendResult<reqwest::blocking::Response> {
        let response = request.send().map_err(map_transport_error)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().unwrap_or_default();
        let err = classify_status(status.as_u16(), &body);
        log::debug!("Backend returned {}: {}", status, err);
        Err(err)
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> BackendResult<T> {
        log::debug!("GET {}", url);
        let response = self.send(self.client.get(url))?;
        response.json::<T>().map_err(map_body_error)
    }
}

impl AppointmentBackend for HttpBackend {
    fn get_booked_slots(&self, doctor_id: &str, date: NaiveDate) -> BackendResult<Vec<String>> {
        let body: BookedSlotsResponse = self.get_json(&self.routes.booked_slots(doctor_id, date))?;
        Ok(body.slots)
    }

    fn book_appointment(&self, appointment: &Appointment) -> BackendResult<BookingConfirmation> {
        let url = self.routes.appointments();
        log::debug!("POST {}", url);
        let response = self.send(self.client.post(&url).json(appointment))?;
        response.json::<BookingConfirmation>().map_err(map_body_error)
    }

    fn remove_appointment(&self, appointment_id: &str) -> BackendResult<()> {
        let url = self.routes.appointment(appointment_id);
        log::debug!("DELETE {}", url);
        self.send(self.client.delete(&url))?;
        Ok(())
    }

    fn update_appointment_status(
        &self,
        appointment_id: &str,
        status: AppointmentStatus,
    ) -> BackendResult<()> {
        let url = self.routes.appointment_status(appointment_id);
        log::debug!("PATCH {}", url);
        self.send(self.client.patch(&url).json(&StatusUpdateRequest { status }))?;
        Ok(())
    }

    fn get_patient_by_email(&self, email: &str) -> BackendResult<String> {
        let body: PatientLookupResponse = self.get_json(&self.routes.patient_by_email(email))?;
        Ok(body.patient_id)
    }

    fn get_doctor_by_id(&self, doctor_id: &str) -> BackendResult<Doctor> {
        self.get_json(&self.routes.doctor(doctor_id))
    }

    fn get_user_details(&self, user_id: &str) -> BackendResult<UserProfile> {
        self.get_json(&self.routes.user(user_id))
    }

    fn list_appointments(&self, role: Role, user_id: &str) -> BackendResult<Vec<Appointment>> {
        self.get_json(&self.routes.appointments_for(role, user_id))
    }
}

fn map_transport_error(e: reqwest::Error) -> BackendError {
    if e.is_timeout() {
        BackendError::Timeout
    } else {
        BackendError::Network(e.to_string())
    }
}

fn map_body_error(e: reqwest::Error) -> BackendError {
    if e.is_timeout() {
        BackendError::Timeout
    } else {
        BackendError::Rejected(format!("Unexpected response body: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_rejects_invalid() {
        let mut config = DocBookConfig::default();
        config.request_timeout_secs = 0;
        assert!(matches!(
            HttpBackend::from_config(&config),
            Err(HttpError::Config(_))
        ));
    }

    #[test]
    fn test_from_config_uses_base_url() {
        let mut config = DocBookConfig::default();
        config.api_base_url = "http://127.0.0.1:9/api/".into();
        let backend = HttpBackend::from_config(&config).unwrap();
        assert_eq!(backend.routes().base_url(), "http://127.0.0.1:9/api");
    }
}
