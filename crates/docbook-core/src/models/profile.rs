//! Doctor and user profiles, and the per-user session context.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::schedule::{ScheduleResult, TimeRange};

/// Which dashboard a user sees.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Doctor,
    Patient,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Doctor => "doctor",
            Role::Patient => "patient",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "doctor" => Ok(Role::Doctor),
            "patient" => Ok(Role::Patient),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// A doctor's public profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Doctor {
    /// Backend doctor ID
    pub id: String,
    /// Display name
    pub name: String,
    /// Contact email
    pub email: String,
    /// Specialty (e.g., "Cardiology")
    pub specialty: String,
    /// Working hours as configured by the doctor (e.g., "10:00AM-4:00PM")
    pub timings: String,
    /// Fee per consultation
    pub consultation_fee: Option<f64>,
}

impl Doctor {
    /// Create a doctor with required fields.
    pub fn new(id: String, name: String, specialty: String, timings: String) -> Self {
        Self {
            id,
            name,
            email: String::new(),
            specialty,
            timings,
            consultation_fee: None,
        }
    }

    /// Parse the configured timings into a working-hours range.
    pub fn working_hours(&self) -> ScheduleResult<TimeRange> {
        TimeRange::parse(&self.timings)
    }
}

/// Basic user profile returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// Returned when a session may not perform an action.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccessDenied {
    #[error("Action requires role {required:?}, session has {actual:?}")]
    WrongRole { required: Role, actual: Role },

    #[error("User {user_id} is not part of appointment {appointment_id}")]
    NotParticipant {
        user_id: String,
        appointment_id: String,
    },
}

/// The signed-in user, passed explicitly to every operation that cares
/// about who is acting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub user_id: String,
    pub email: String,
    pub role: Role,
}

impl Session {
    pub fn new(user_id: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            email: email.into(),
            role,
        }
    }

    pub fn from_profile(profile: &UserProfile) -> Self {
        Self::new(profile.user_id.clone(), profile.email.clone(), profile.role)
    }

    pub fn is_doctor(&self) -> bool {
        self.role == Role::Doctor
    }

    pub fn is_patient(&self) -> bool {
        self.role == Role::Patient
    }

    /// Fail unless the session has the given role.
    pub fn require_role(&self, required: Role) -> Result<(), AccessDenied> {
        if self.role == required {
            Ok(())
        } else {
            Err(AccessDenied::WrongRole {
                required,
                actual: self.role,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_roundtrip_str() {
        assert_eq!("Doctor".parse::<Role>().unwrap(), Role::Doctor);
        assert_eq!(Role::Patient.as_str(), "patient");
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_require_role() {
        let session = Session::new("u1", "pat@example.com", Role::Patient);
        assert!(session.require_role(Role::Patient).is_ok());

        let err = session.require_role(Role::Doctor).unwrap_err();
        assert_eq!(
            err,
            AccessDenied::WrongRole {
                required: Role::Doctor,
                actual: Role::Patient,
            }
        );
    }

    #[test]
    fn test_doctor_working_hours() {
        let doctor = Doctor::new(
            "d1".into(),
            "Dr. Rao".into(),
            "Cardiology".into(),
            "10:00AM-4:00PM".into(),
        );
        assert_eq!(doctor.working_hours().unwrap().duration_minutes(), 360);

        let broken = Doctor::new("d2".into(), "Dr. Lee".into(), "ENT".into(), "TBD".into());
        assert!(broken.working_hours().is_err());
    }
}
