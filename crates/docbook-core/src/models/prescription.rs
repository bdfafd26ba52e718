//! Prescription model.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Prescription validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PrescriptionError {
    #[error("Patient name is required")]
    MissingPatientName,

    #[error("Invalid patient email: {0}")]
    InvalidEmail(String),

    #[error("At least one medicine is required")]
    NoMedicines,
}

/// A prescription written by a doctor and handed to the patient as a QR code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Prescription {
    pub patient_name: String,
    pub patient_email: String,
    /// One entry per medicine line, free text (e.g., "Amoxicillin 500mg")
    pub medicines: Vec<String>,
    /// When to take the medicines (e.g., "morning and night for 5 days")
    pub schedule: String,
    /// Additional instructions (e.g., "after food")
    pub instructions: String,
}

impl Prescription {
    /// Create a validated prescription. Blank medicine lines are dropped.
    pub fn new(
        patient_name: String,
        patient_email: String,
        medicines: Vec<String>,
        schedule: String,
        instructions: String,
    ) -> Result<Self, PrescriptionError> {
        let prescription = Self {
            patient_name: patient_name.trim().to_string(),
            patient_email: patient_email.trim().to_string(),
            medicines: medicines
                .into_iter()
                .map(|m| m.trim().to_string())
                .filter(|m| !m.is_empty())
                .collect(),
            schedule: schedule.trim().to_string(),
            instructions: instructions.trim().to_string(),
        };
        prescription.validate()?;
        Ok(prescription)
    }

    /// Check field invariants (used after decoding untrusted payloads).
    pub fn validate(&self) -> Result<(), PrescriptionError> {
        if self.patient_name.trim().is_empty() {
            return Err(PrescriptionError::MissingPatientName);
        }
        if !is_plausible_email(&self.patient_email) {
            return Err(PrescriptionError::InvalidEmail(self.patient_email.clone()));
        }
        if self.medicines.iter().all(|m| m.trim().is_empty()) {
            return Err(PrescriptionError::NoMedicines);
        }
        Ok(())
    }

    /// Split a multi-line medicines textarea into entries.
    pub fn medicines_from_text(text: &str) -> Vec<String> {
        text.lines()
            .flat_map(|line| line.split(';'))
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .collect()
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !email.chars().any(char::is_whitespace)
        }
        None => false,
    }
}
