//! FHIR client and wire types
//!
//! This module isolates all schema knowledge about the remote server:
//! - [`types`]: serde wire records and the `Measurement` domain record
//! - [`client`]: the reqwest-based REST client

pub mod client;
pub mod types;

pub use client::{FhirClient, FhirConfig, FhirError};
pub use types::{
    Bundle, BundleEntry, CodeableConcept, Coding, ExerciseCoding, HumanName, Measurement,
    Observation, ObservationComponent, Patient, Quantity, Reference, ServiceRequest, UCUM_SYSTEM,
};
