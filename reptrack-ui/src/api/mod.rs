//! FHIR API Access
//!
//! HTTP calls against the remote clinical-data server.

pub mod client;

pub use client::*;
