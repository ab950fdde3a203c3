//! API payload and domain types for the clinic backend

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Value shown when a nested reference is missing on a record
pub const MISSING: &str = "N/A";

/// Minimal embedded reference to a person record (patient, doctor).
///
/// The backend populates these inconsistently; every field is optional and
/// projection must degrade to [`MISSING`] instead of failing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonRef {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Display name for an optional person reference
pub fn person_name(person: Option<&PersonRef>) -> String {
    person
        .and_then(|p| p.name.clone())
        .unwrap_or_else(|| MISSING.to_string())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "userId", default)]
    pub patient: Option<PersonRef>,
    #[serde(rename = "doctorId", default)]
    pub doctor: Option<PersonRef>,
    #[serde(default)]
    pub appointment_date: Option<String>,
    #[serde(default)]
    pub appointment_time: Option<String>,
    #[serde(default)]
    pub booking_status: Option<String>,
    #[serde(default)]
    pub consultation_fee: Option<f64>,
    #[serde(default)]
    pub total_amount: Option<f64>,
    #[serde(default)]
    pub paid: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub specialization: Option<String>,
    #[serde(default)]
    pub consultation_fee: Option<f64>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub gender: Option<String>,
}

/// Orderable lab service from the priced catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lab {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A test ordered for a patient, tracked through report upload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientTest {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub test_name: Option<String>,
    #[serde(rename = "patientId", default)]
    pub patient: Option<PersonRef>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub paid: Option<bool>,
    #[serde(default)]
    pub total_paid: Option<f64>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub report_status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub user: Option<UserProfile>,
}

/// JSON body for booking an appointment at the reception desk
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub patient_name: String,
    pub patient_email: String,
    pub patient_phone: String,
    pub doctor_id: String,
    pub appointment_date: String,
    pub appointment_time: String,
}

/// JSON body for creating or updating a lab catalog entry
#[derive(Debug, Clone, Serialize)]
pub struct LabPayload {
    pub name: String,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Vital signs recorded against an appointment
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Vitals {
    pub blood_pressure: String,
    pub temperature: String,
    pub pulse: String,
    pub weight: String,
}

/// One pending report attachment, held in memory until upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// Assembled report upload, handed to the multipart mutation
#[derive(Debug, Clone, PartialEq)]
pub struct UploadPayload {
    pub target_id: String,
    pub name: String,
    pub description: Option<String>,
    pub files: Vec<Attachment>,
}

/// Format an optional amount as currency, [`MISSING`] when absent
pub fn fmt_currency(amount: Option<f64>) -> String {
    match amount {
        Some(a) => format!("${:.2}", a),
        None => MISSING.to_string(),
    }
}

/// Paid / Unpaid badge for a payment flag
pub fn paid_badge(paid: Option<bool>) -> &'static str {
    match paid {
        Some(true) => "Paid",
        Some(false) | None => "Unpaid",
    }
}

/// Format a backend timestamp as a calendar date.
///
/// The backend sends RFC 3339 timestamps; anything unparseable is shown
/// as received rather than dropped.
pub fn fmt_date(raw: Option<&str>) -> String {
    match raw {
        None => MISSING.to_string(),
        Some(s) => match s.parse::<DateTime<Utc>>() {
            Ok(dt) => dt.format("%Y-%m-%d").to_string(),
            Err(_) => s.to_string(),
        },
    }
}

/// Display fallback for optional text fields
pub fn or_missing(value: Option<&str>) -> String {
    match value {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => MISSING.to_string(),
    }
}
