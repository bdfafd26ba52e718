//! Request/response bodies and status mapping.

use docbook_core::booking::BackendError;
use docbook_core::models::AppointmentStatus;
use serde::{Deserialize, Serialize};

/// `GET /doctors/{id}/booked-slots` response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookedSlotsResponse {
    pub slots: Vec<String>,
}

/// `GET /patients?email=` response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientLookupResponse {
    pub patient_id: String,
}

/// `PATCH /appointments/{id}/status` body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusUpdateRequest {
    pub status: AppointmentStatus,
}

/// Error body returned by the backend on failure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    #[serde(alias = "error")]
    pub message: String,
}

/// Map a non-success HTTP status to a backend error.
///
/// The message comes from the JSON error body when present, else the raw
/// body, else the status code.
pub fn classify_status(status: u16, body: &str) -> BackendError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.message)
        .unwrap_or_else(|_| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                format!("HTTP {}", status)
            } else {
                trimmed.chars().take(200).collect()
            }
        });

    match status {
        404 => BackendError::NotFound(message),
        409 => BackendError::Conflict(message),
        408 | 504 => BackendError::Timeout,
        502 | 503 => BackendError::Network(message),
        _ => BackendError::Rejected(message),
    }
}
