//! State Management
//!
//! Global dashboard state shared across components.

pub mod global;

pub use global::{provide_dashboard_state, DashboardState, MeasurePoint};
