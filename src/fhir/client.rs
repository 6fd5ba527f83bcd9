//! FHIR REST API Client
//!
//! HTTP client for the remote clinical-data server. Each operation is a
//! single request with no retry or backoff: a failure is terminal for the
//! user action that triggered it, and the user retriggers manually.

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::types::{Bundle, ExerciseCoding, Measurement, Observation, Patient, ServiceRequest};

/// FHIR client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FhirConfig {
    /// Base URL of the FHIR server (e.g. "https://server.fire.ly")
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Content type for request bodies, "application/fhir+json" or plain
    /// "application/json" depending on the server
    #[serde(default = "default_content_type")]
    pub content_type: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,

    /// Coding of the tracked exercise
    #[serde(default)]
    pub exercise: ExerciseCoding,
}

fn default_base_url() -> String {
    "https://server.fire.ly".to_string()
}

fn default_content_type() -> String {
    "application/fhir+json".to_string()
}

fn default_request_timeout() -> u64 {
    10_000
}

impl Default for FhirConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            content_type: default_content_type(),
            request_timeout_ms: default_request_timeout(),
            exercise: ExerciseCoding::default(),
        }
    }
}

/// FHIR REST API client
pub struct FhirClient {
    client: Client,
    config: FhirConfig,
}

impl FhirClient {
    /// Create a new client with the given configuration
    pub fn new(config: FhirConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(config.request_timeout_ms))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }

    /// Get the current configuration
    pub fn config(&self) -> &FhirConfig {
        &self.config
    }

    /// Create a patient resource and return the server-assigned id
    pub async fn create_patient(&self, patient: &Patient) -> Result<String, FhirError> {
        let url = format!("{}/Patient", self.config.base_url);
        let response = self.send_post(&url, patient).await?;

        let created: Patient = response.json().await.map_err(FhirError::Request)?;
        created.id.ok_or(FhirError::MissingId)
    }

    /// Create an active exercise order for the patient
    ///
    /// Fire-and-forget: the created resource is not inspected beyond the
    /// response status.
    pub async fn create_service_request(&self, patient_id: &str) -> Result<(), FhirError> {
        let url = format!("{}/ServiceRequest", self.config.base_url);
        let order = ServiceRequest::active_order(patient_id, &self.config.exercise);

        self.send_post(&url, &order).await?;
        tracing::debug!(patient_id, "created exercise order");
        Ok(())
    }

    /// Coded display text of the patient's first active order, if any
    pub async fn active_task_display(&self, patient_id: &str) -> Result<Option<String>, FhirError> {
        let url = format!(
            "{}/ServiceRequest?patient={}&status=active",
            self.config.base_url,
            urlencoding::encode(patient_id)
        );

        let response = self.send_get(&url).await?;
        let bundle: Bundle<ServiceRequest> = response.json().await.map_err(FhirError::Request)?;

        let display = bundle
            .resources()
            .next()
            .and_then(|order| order.coded_display().map(str::to_string));
        Ok(display)
    }

    /// Fetch the patient's exercise measurements, oldest first
    ///
    /// Entries without a value or a parseable timestamp are skipped.
    pub async fn fetch_measurements(&self, patient_id: &str) -> Result<Vec<Measurement>, FhirError> {
        let url = format!(
            "{}/Observation?patient={}&code={}&_sort=date",
            self.config.base_url,
            urlencoding::encode(patient_id),
            urlencoding::encode(&self.config.exercise.code)
        );

        let response = self.send_get(&url).await?;
        let bundle: Bundle<Observation> = response.json().await.map_err(FhirError::Request)?;

        let total = bundle.entry.len();
        let measurements: Vec<Measurement> = bundle
            .resources()
            .filter_map(Measurement::from_observation)
            .collect();

        if measurements.len() < total {
            tracing::debug!(
                skipped = total - measurements.len(),
                "ignored observations without a value or timestamp"
            );
        }

        Ok(measurements)
    }

    /// Submit one measurement as a new observation
    pub async fn submit_measurement(
        &self,
        patient_id: &str,
        measurement: &Measurement,
    ) -> Result<(), FhirError> {
        let url = format!("{}/Observation", self.config.base_url);
        let body = measurement.to_observation(patient_id, &self.config.exercise);

        self.send_post(&url, &body).await?;
        tracing::debug!(patient_id, reps = measurement.reps, "uploaded measurement");
        Ok(())
    }

    /// Send a POST request, mapping non-success statuses to errors
    async fn send_post<T: Serialize>(
        &self,
        url: &str,
        body: &T,
    ) -> Result<reqwest::Response, FhirError> {
        let response = self
            .client
            .post(url)
            .json(body)
            .header(CONTENT_TYPE, self.config.content_type.as_str())
            .header(ACCEPT, self.config.content_type.as_str())
            .send()
            .await
            .map_err(Self::classify)?;

        Self::check_status(response).await
    }

    /// Send a GET request, mapping non-success statuses to errors
    async fn send_get(&self, url: &str) -> Result<reqwest::Response, FhirError> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, self.config.content_type.as_str())
            .send()
            .await
            .map_err(Self::classify)?;

        Self::check_status(response).await
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, FhirError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            Err(FhirError::Api {
                status: status.as_u16(),
                message: text,
            })
        }
    }

    fn classify(e: reqwest::Error) -> FhirError {
        if e.is_timeout() {
            FhirError::Timeout
        } else if e.is_connect() {
            FhirError::Unavailable
        } else {
            FhirError::Request(e)
        }
    }
}

// ============================================
// Errors
// ============================================

/// Errors that can occur when talking to the FHIR server
#[derive(Error, Debug)]
pub enum FhirError {
    #[error("FHIR server unavailable")]
    Unavailable,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Server returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Request timeout")]
    Timeout,

    #[error("Server response did not include a resource id")]
    MissingId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FhirConfig::default();
        assert_eq!(config.base_url, "https://server.fire.ly");
        assert_eq!(config.content_type, "application/fhir+json");
        assert_eq!(config.exercise.code, "22656-1");
        assert_eq!(config.exercise.display, "Squats");
    }

    #[test]
    fn test_config_deserializes_with_partial_section() {
        let config: FhirConfig = toml::from_str(
            r#"
            base_url = "http://localhost:8080/fhir"
            content_type = "application/json"
            "#,
        )
        .unwrap();

        assert_eq!(config.base_url, "http://localhost:8080/fhir");
        assert_eq!(config.content_type, "application/json");
        assert_eq!(config.exercise.unit, "reps");
    }
}
