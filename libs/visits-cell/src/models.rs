use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// Records are owned by the booking backend. Fields the UI reads are typed;
// everything else rides along in `extra` untouched.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    pub id: String,
    #[serde(default, alias = "name", skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilitySlot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctor_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Booking payload. Doctor, patient and slot are required; the rest of the
/// shape belongs to the booking backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentRequest {
    pub doctor_id: String,
    pub patient_id: String,
    pub slot: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AppointmentRequest {
    pub fn new(
        doctor_id: impl Into<String>,
        patient_id: impl Into<String>,
        slot: impl Into<String>,
    ) -> Self {
        Self {
            doctor_id: doctor_id.into(),
            patient_id: patient_id.into(),
            slot: slot.into(),
            extra: Map::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Name of the first required field that is blank, if any.
    pub fn missing_field(&self) -> Option<&'static str> {
        [
            ("doctorId", &self.doctor_id),
            ("patientId", &self.patient_id),
            ("slot", &self.slot),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctor_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
