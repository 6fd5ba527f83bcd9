//! User-facing flows
//!
//! The three dashboard actions as sequential pipelines over the FHIR client:
//! - `load`: fetch the prescribed task, then the measurement history
//! - `upload`: submit one measurement, then re-fetch the history
//! - `create_test_data`: create a test patient and its exercise order
//!
//! Each flow validates its raw inputs before any network call and awaits its
//! requests strictly in sequence; there is no parallel fan-out.

use thiserror::Error;

use crate::fhir::{FhirClient, FhirError, Measurement, Patient};
use crate::series::ChartSeries;

/// Status text shown when the patient has no active order
pub const NO_TASK_DISPLAY: &str = "No active prescription (you can still upload)";

/// Everything the dashboard shows for one patient lookup
#[derive(Debug, Clone)]
pub struct DashboardView {
    /// Coded display of the first active order, or [`NO_TASK_DISPLAY`]
    pub task_display: String,
    /// Measurement history, oldest first
    pub measurements: Vec<Measurement>,
    /// Chart-ready label/value sequences built from the history
    pub series: ChartSeries,
}

/// Load a patient's prescription and measurement history
pub async fn load(client: &FhirClient, patient_id: &str) -> Result<DashboardView, WorkflowError> {
    let patient_id = patient_id.trim();
    if patient_id.is_empty() {
        return Err(WorkflowError::EmptyPatientId);
    }

    let task_display = client
        .active_task_display(patient_id)
        .await?
        .unwrap_or_else(|| NO_TASK_DISPLAY.to_string());

    let measurements = client.fetch_measurements(patient_id).await?;
    let series = ChartSeries::from_measurements(&measurements);

    tracing::info!(
        patient_id,
        entries = measurements.len(),
        task = %task_display,
        "loaded dashboard"
    );

    Ok(DashboardView {
        task_display,
        measurements,
        series,
    })
}

/// Submit a new measurement and return the refreshed history
///
/// `reps` and `weight` are the raw form inputs; an empty weight means no
/// load component is attached.
pub async fn upload(
    client: &FhirClient,
    patient_id: &str,
    reps: &str,
    weight: &str,
) -> Result<Vec<Measurement>, WorkflowError> {
    let patient_id = patient_id.trim();
    if patient_id.is_empty() {
        return Err(WorkflowError::EmptyPatientId);
    }

    let measurement = parse_entry(reps, weight)?;
    client.submit_measurement(patient_id, &measurement).await?;

    Ok(client.fetch_measurements(patient_id).await?)
}

/// Create a test patient with an active exercise order
///
/// Returns the server-assigned patient id; the caller runs the load flow
/// with it afterwards.
pub async fn create_test_data(client: &FhirClient) -> Result<String, WorkflowError> {
    let subject = Patient::new("Test", "User").gender("unknown");
    let patient_id = client.create_patient(&subject).await?;

    client.create_service_request(&patient_id).await?;

    tracing::info!(patient_id, "created test patient and order");
    Ok(patient_id)
}

/// Validate and parse the raw form inputs into a measurement
pub fn parse_entry(reps: &str, weight: &str) -> Result<Measurement, WorkflowError> {
    let reps = reps.trim();
    if reps.is_empty() {
        return Err(WorkflowError::EmptyReps);
    }

    let reps: f64 = reps
        .parse()
        .map_err(|_| WorkflowError::InvalidNumber(reps.to_string()))?;
    let mut measurement = Measurement::new(reps);

    let weight = weight.trim();
    if !weight.is_empty() {
        let kg: f64 = weight
            .parse()
            .map_err(|_| WorkflowError::InvalidNumber(weight.to_string()))?;
        measurement = measurement.load_kg(kg);
    }

    Ok(measurement)
}

/// Errors surfaced by the dashboard flows
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("A patient ID is required")]
    EmptyPatientId,

    #[error("A repetition count is required")]
    EmptyReps,

    #[error("Not a number: {0}")]
    InvalidNumber(String),

    #[error(transparent)]
    Fhir(#[from] FhirError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fhir::FhirConfig;

    #[tokio::test]
    async fn test_load_rejects_empty_patient_id_before_any_request() {
        let client = FhirClient::new(FhirConfig::default());

        let result = load(&client, "   ").await;
        assert!(matches!(result, Err(WorkflowError::EmptyPatientId)));
    }

    #[tokio::test]
    async fn test_upload_rejects_empty_patient_id() {
        let client = FhirClient::new(FhirConfig::default());

        let result = upload(&client, "", "12", "").await;
        assert!(matches!(result, Err(WorkflowError::EmptyPatientId)));
    }

    #[test]
    fn test_parse_entry_requires_reps() {
        assert!(matches!(
            parse_entry("", "20"),
            Err(WorkflowError::EmptyReps)
        ));
        assert!(matches!(
            parse_entry("  ", ""),
            Err(WorkflowError::EmptyReps)
        ));
    }

    #[test]
    fn test_parse_entry_rejects_non_numeric_input() {
        assert!(matches!(
            parse_entry("twelve", ""),
            Err(WorkflowError::InvalidNumber(_))
        ));
        assert!(matches!(
            parse_entry("12", "heavy"),
            Err(WorkflowError::InvalidNumber(_))
        ));
    }

    #[test]
    fn test_parse_entry_attaches_load_iff_weight_entered() {
        let bare = parse_entry("12", "").unwrap();
        assert_eq!(bare.reps, 12.0);
        assert_eq!(bare.load_kg, None);

        let loaded = parse_entry("8", " 20.5 ").unwrap();
        assert_eq!(loaded.reps, 8.0);
        assert_eq!(loaded.load_kg, Some(20.5));
    }
}
