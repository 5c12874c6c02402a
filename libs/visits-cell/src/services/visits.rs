// libs/visits-cell/src/services/visits.rs
use std::sync::Arc;

use tracing::{debug, info};

use shared_http::{CallConfig, CallMode, RequestPipeline};
use shared_models::RequestError;

use crate::models::{Appointment, AppointmentRequest, AvailabilitySlot, Doctor};

pub const DOCTORS_PATH: &str = "/api/user/doctors";
pub const AVAILABILITY_PATH: &str = "/api/availability";
pub const APPOINTMENT_PATH: &str = "/api/appointment";

pub struct VisitsClient {
    pipeline: Arc<RequestPipeline>,
}

impl VisitsClient {
    pub fn new(pipeline: Arc<RequestPipeline>) -> Self {
        Self { pipeline }
    }

    /// GET /api/user/doctors
    pub async fn list_doctors(&self) -> Result<Vec<Doctor>, RequestError> {
        self.pipeline.ensure_authenticated()?;
        debug!("Fetching doctor list");

        self.pipeline
            .execute_as(CallConfig::get(DOCTORS_PATH), CallMode::FullPayload)
            .await
    }

    /// GET /api/availability/{doctorId}
    pub async fn list_availability(&self, doctor_id: &str) -> Result<Vec<AvailabilitySlot>, RequestError> {
        self.pipeline.ensure_authenticated()?;

        let doctor_id = doctor_id.trim();
        if doctor_id.is_empty() {
            return Err(RequestError::validation("Doctor id must not be empty"));
        }

        debug!("Fetching availability for doctor: {}", doctor_id);

        let target = format!("{}/{}", AVAILABILITY_PATH, urlencoding::encode(doctor_id));
        self.pipeline
            .execute_as(CallConfig::get(target), CallMode::FullPayload)
            .await
    }

    /// POST /api/appointment
    pub async fn create_appointment(&self, request: &AppointmentRequest) -> Result<Appointment, RequestError> {
        self.pipeline.ensure_authenticated()?;

        if let Some(field) = request.missing_field() {
            return Err(RequestError::validation(format!("Appointment {} must not be empty", field)));
        }

        info!(
            "Creating appointment with doctor {} for patient {}",
            request.doctor_id, request.patient_id
        );

        let body = serde_json::to_string(request)
            .map_err(|e| RequestError::validation(format!("Appointment payload not encodable: {}", e)))?;

        self.pipeline
            .execute_as(CallConfig::post(APPOINTMENT_PATH).body(body), CallMode::FullPayload)
            .await
    }
}
