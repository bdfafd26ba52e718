//! Prescription payloads for QR transport.
//!
//! A doctor's client encodes a [`Prescription`](crate::models::Prescription)
//! into a short text payload that is rendered as a QR code; the patient's
//! client decodes whatever the scanner read back into the same record.

mod prescription;

pub use prescription::*;

use thiserror::Error;

use crate::models::PrescriptionError;

/// Errors producing a payload.
#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("Prescription is not valid: {0}")]
    Invalid(#[from] PrescriptionError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Payload is {size} bytes, QR capacity is {max}")]
    TooLarge { size: usize, max: usize },
}

/// Errors reading a scanned payload. Always recoverable: show the message
/// and let the user scan again.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Image contained no scannable code")]
    NoScannableCode,

    #[error("Not a recognized prescription payload: {0}")]
    NotRecognized(String),
}

impl DecodeError {
    /// Message suitable for display under the scanner view.
    pub fn user_message(&self) -> &'static str {
        match self {
            DecodeError::NoScannableCode => {
                "No QR code was found. Hold the code steady and try again."
            }
            DecodeError::NotRecognized(_) => {
                "This QR code is not a DocBook prescription."
            }
        }
    }
}

pub type DecodeResult<T> = Result<T, DecodeError>;
