//! Reptrack Dashboard
//!
//! Exercise adherence dashboard built with Leptos (WASM).
//!
//! # Features
//!
//! - Patient lookup by server-assigned identifier
//! - Prescription status from active exercise orders
//! - Repetition history rendered as a canvas line chart
//! - Entry form for uploading new measurements
//!
//! # Architecture
//!
//! This is a client-side rendered (CSR) Leptos application that compiles to
//! WebAssembly. It talks directly to a FHIR server via HTTP; there is no
//! backend of its own.

use leptos::*;

mod api;
mod app;
mod components;
mod pages;
mod state;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    // Mount the app to the document body
    mount_to_body(|| view! { <app::App /> });
}
