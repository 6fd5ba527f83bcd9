//! UI Components
//!
//! Reusable Leptos components for the dashboard.

pub mod chart;
pub mod entry;
pub mod toast;

pub use chart::Chart;
pub use entry::MeasurementEntry;
pub use toast::Toast;
