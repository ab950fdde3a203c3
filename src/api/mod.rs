//! HTTP client for the clinic REST backend
//!
//! All endpoint operations live here; responses pass through the envelope
//! adapter so callers always see plain domain types.

pub mod endpoints;
pub mod envelope;
pub mod error;

pub use endpoints::Endpoints;
pub use error::{ApiError, ErrorInfo};

use reqwest::multipart;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::Config;
use crate::models::{
    Appointment, BookingRequest, Doctor, Lab, LabPayload, LoginRequest, LoginResponse, Patient,
    PatientTest, UploadPayload, UserProfile, Vitals,
};

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Build a client from configuration; no token attached yet
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let http = Client::builder()
            .user_agent(&config.http.user_agent)
            .timeout(config.http_timeout())
            .build()?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    /// Same client with a bearer token attached to every request
    pub fn with_token(mut self, token: String) -> Self {
        self.token = Some(token);
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut builder = self.http.request(method, self.url(path));
        if let Some(ref token) = self.token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    /// Read a response body, mapping non-success statuses to [`ApiError::Status`]
    /// and unwrapping the envelope on success
    async fn read_body<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = server_message(&body)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
            warn!("API request failed with status {}: {}", status, message);
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(envelope::decode(&body)?)
    }

    /// Check only the status of a write that returns no useful body
    async fn read_ack(response: Response) -> Result<(), ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        let message = server_message(&body)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        debug!("GET {}", path);
        let response = self.request(Method::GET, path).send().await?;
        Self::read_body(response).await
    }

    async fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        debug!("{} {}", method, path);
        let response = self.request(method, path).json(body).send().await?;
        Self::read_body(response).await
    }

    // --- auth ---

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.send_json(Method::POST, Endpoints::LOGIN, &body).await
    }

    pub async fn profile(&self) -> Result<UserProfile, ApiError> {
        self.get_json(Endpoints::PROFILE).await
    }

    // --- appointments ---

    pub async fn list_appointments(&self) -> Result<Vec<Appointment>, ApiError> {
        self.get_json(Endpoints::APPOINTMENTS).await
    }

    pub async fn get_appointment(&self, id: &str) -> Result<Appointment, ApiError> {
        self.get_json(&format!("{}/{}", Endpoints::APPOINTMENTS, id)).await
    }

    pub async fn book_appointment(&self, booking: &BookingRequest) -> Result<Appointment, ApiError> {
        self.send_json(Method::POST, Endpoints::BOOK_APPOINTMENT, booking).await
    }

    pub async fn cancel_appointment(&self, id: &str) -> Result<(), ApiError> {
        let path = format!("{}/{}", Endpoints::CANCEL_APPOINTMENT, id);
        debug!("POST {}", path);
        let response = self.request(Method::POST, &path).send().await?;
        Self::read_ack(response).await
    }

    pub async fn submit_vitals(&self, appointment_id: &str, vitals: &Vitals) -> Result<(), ApiError> {
        let path = format!("{}/{}", Endpoints::SUBMIT_VITALS, appointment_id);
        debug!("POST {}", path);
        let response = self.request(Method::POST, &path).json(vitals).send().await?;
        Self::read_ack(response).await
    }

    // --- doctors & patients ---

    pub async fn list_doctors(&self) -> Result<Vec<Doctor>, ApiError> {
        self.get_json(Endpoints::DOCTORS).await
    }

    pub async fn list_patients(&self) -> Result<Vec<Patient>, ApiError> {
        self.get_json(Endpoints::PATIENTS).await
    }

    // --- labs ---

    pub async fn list_labs(&self) -> Result<Vec<Lab>, ApiError> {
        self.get_json(Endpoints::LABS).await
    }

    pub async fn get_lab(&self, id: &str) -> Result<Lab, ApiError> {
        self.get_json(&format!("{}/{}", Endpoints::LABS, id)).await
    }

    pub async fn add_lab(&self, payload: &LabPayload) -> Result<Lab, ApiError> {
        self.send_json(Method::POST, Endpoints::ADD_LAB, payload).await
    }

    pub async fn update_lab(&self, id: &str, payload: &LabPayload) -> Result<Lab, ApiError> {
        let path = format!("{}/{}", Endpoints::UPDATE_LAB, id);
        self.send_json(Method::PUT, &path, payload).await
    }

    // --- patient tests ---

    pub async fn list_patient_tests(&self) -> Result<Vec<PatientTest>, ApiError> {
        self.get_json(Endpoints::TESTS).await
    }

    pub async fn get_patient_test(&self, id: &str) -> Result<PatientTest, ApiError> {
        self.get_json(&format!("{}/{}", Endpoints::TESTS, id)).await
    }

    /// Upload report files for a patient test as multipart/form-data.
    ///
    /// One `files` part per attachment, in the order the user added them.
    pub async fn upload_report(&self, payload: &UploadPayload) -> Result<(), ApiError> {
        let path = format!("{}/{}", Endpoints::UPLOAD_REPORT, payload.target_id);
        debug!("POST {} ({} file(s))", path, payload.files.len());

        let mut form = multipart::Form::new()
            .text("testId", payload.target_id.clone())
            .text("reportName", payload.name.clone());
        if let Some(ref description) = payload.description {
            form = form.text("reportDescription", description.clone());
        }

        for attachment in &payload.files {
            let part = multipart::Part::bytes(attachment.bytes.clone())
                .file_name(attachment.file_name.clone());
            form = form.part("files", part);
        }

        let response = self.request(Method::POST, &path).multipart(form).send().await?;
        Self::read_ack(response).await
    }
}

/// Pull a human-readable message out of an error body when the server sent one
fn server_message(body: &str) -> Option<String> {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        message: Option<String>,
        error: Option<String>,
    }

    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    parsed.message.or(parsed.error).filter(|m| !m.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_message_extraction() {
        assert_eq!(
            server_message(r#"{"message": "Doctor not available"}"#).as_deref(),
            Some("Doctor not available")
        );
        assert_eq!(
            server_message(r#"{"error": "invalid token"}"#).as_deref(),
            Some("invalid token")
        );
        assert_eq!(server_message("<html>oops</html>"), None);
        assert_eq!(server_message(r#"{"message": ""}"#), None);
    }

    #[test]
    fn test_base_url_normalization() {
        let config = Config {
            api_base_url: "http://localhost:5000/".to_string(),
            email: None,
            password: None,
            token: Some("t".to_string()),
            retries: Default::default(),
            http: Default::default(),
            log_file: String::new(),
        };
        let client = ApiClient::new(&config).unwrap();
        assert_eq!(client.url("/api/v1/doctors"), "http://localhost:5000/api/v1/doctors");
    }
}
