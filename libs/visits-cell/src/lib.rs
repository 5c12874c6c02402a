// libs/visits-cell/src/lib.rs
//! # Visits Cell
//!
//! Appointment browsing for patients: the doctor directory, a doctor's
//! open slots, and booking. Every operation requires a stored credential
//! and fails locally with `AuthenticationMissing` when there is none.
//!
//! ## API Endpoints consumed
//! - `GET /api/user/doctors` - Doctor directory
//! - `GET /api/availability/{doctorId}` - Open slots for one doctor
//! - `POST /api/appointment` - Book a slot

pub mod models;
pub mod services;

pub use models::{Appointment, AppointmentRequest, AvailabilitySlot, Doctor};
pub use services::VisitsClient;
