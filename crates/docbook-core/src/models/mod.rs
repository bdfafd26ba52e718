//! Domain models for DocBook.

mod appointment;
mod prescription;
mod profile;
mod reminder;

pub use appointment::*;
pub use prescription::*;
pub use profile::*;
pub use reminder::*;
