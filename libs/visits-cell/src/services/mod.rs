pub mod visits;

pub use visits::{VisitsClient, APPOINTMENT_PATH, AVAILABILITY_PATH, DOCTORS_PATH};
