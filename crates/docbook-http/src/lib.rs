//! HTTP/JSON backend for DocBook.
//!
//! Implements [`AppointmentBackend`](docbook_core::AppointmentBackend) against
//! the REST API:
//!
//! | Operation                 | Request                                        |
//! |---------------------------|------------------------------------------------|
//! | get_doctor_by_id          | `GET    /doctors/{id}`                         |
//! | get_booked_slots          | `GET    /doctors/{id}/booked-slots?date=...`   |
//! | book_appointment          | `POST   /appointments`                         |
//! | remove_appointment        | `DELETE /appointments/{id}`                    |
//! | update_appointment_status | `PATCH  /appointments/{id}/status`             |
//! | get_patient_by_email      | `GET    /patients?email=...`                   |
//! | get_user_details          | `GET    /users/{id}`                           |
//! | list_appointments         | `GET    /{doctors,patients}/{id}/appointments` |

pub mod routes;
pub mod wire;

#[cfg(feature = "http")]
pub mod client;

pub use routes::Routes;
pub use wire::classify_status;

#[cfg(feature = "http")]
pub use client::{HttpBackend, HttpError};
