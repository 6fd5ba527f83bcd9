//! # Reptrack
//!
//! Exercise Adherence Tracking - A Rust client for recording and visualizing
//! prescribed exercise performance over FHIR.
//!
//! ## Features
//!
//! - **Typed wire records**: Patient, ServiceRequest and Observation mapped
//!   through a serde boundary, keeping schema knowledge out of the view layer
//! - **Single-shot client**: every operation is one awaited request, no
//!   retries, no partial-state rollback
//! - **Chart-ready series**: parallel label/value sequences with one fixed
//!   local-time label policy
//! - **Sequential flows**: load, upload and test-data creation as the same
//!   pipelines the dashboard UI runs
//!
//! ## Modules
//!
//! - [`fhir`]: wire types and the REST client
//! - [`series`]: chart series preparation
//! - [`workflows`]: the three user flows
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use reptrack::fhir::{FhirClient, FhirConfig};
//! use reptrack::workflows;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = FhirClient::new(FhirConfig::default());
//!
//!     // Create a test patient with an active squats order
//!     let patient_id = workflows::create_test_data(&client).await?;
//!
//!     // Fetch the prescription and measurement history
//!     let view = workflows::load(&client, &patient_id).await?;
//!     println!("{}: {} entries", view.task_display, view.measurements.len());
//!
//!     // Record 12 reps with a 20 kg load
//!     workflows::upload(&client, &patient_id, "12", "20").await?;
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod fhir;
pub mod series;
pub mod workflows;

// Re-export top-level types for convenience
pub use fhir::{
    Bundle, CodeableConcept, ExerciseCoding, FhirClient, FhirConfig, FhirError, Measurement,
    Observation, Patient, ServiceRequest,
};

pub use series::{format_label, ChartSeries};

pub use workflows::{DashboardView, WorkflowError, NO_TASK_DISPLAY};

pub use config::{Config, ConfigError, LoggingConfig};
