//! Global Dashboard State
//!
//! Reactive state management using Leptos signals.

use leptos::*;

/// Global dashboard state provided to all components
#[derive(Clone)]
pub struct DashboardState {
    /// Patient identifier currently entered
    pub patient_id: RwSignal<String>,
    /// Status text for the prescribed task
    pub task_display: RwSignal<String>,
    /// Measurement history as chart points, oldest first
    pub points: RwSignal<Vec<MeasurePoint>>,
    /// Whether the results panel is revealed
    pub panel_visible: RwSignal<bool>,
    /// A load chain is in flight
    pub loading: RwSignal<bool>,
    /// An upload chain is in flight
    pub submitting: RwSignal<bool>,
    /// Error message to display
    pub error: RwSignal<Option<String>>,
    /// Success message (for toasts)
    pub success: RwSignal<Option<String>>,
}

/// One charted measurement: a time label and the repetition count
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MeasurePoint {
    pub label: String,
    pub value: f64,
}

/// Provide dashboard state to the component tree
pub fn provide_dashboard_state() {
    let state = DashboardState {
        patient_id: create_rw_signal(String::new()),
        task_display: create_rw_signal(String::new()),
        points: create_rw_signal(Vec::new()),
        panel_visible: create_rw_signal(false),
        loading: create_rw_signal(false),
        submitting: create_rw_signal(false),
        error: create_rw_signal(None),
        success: create_rw_signal(None),
    };

    provide_context(state);
}

impl DashboardState {
    /// True while any request chain is in flight
    ///
    /// Used to ignore a second trigger instead of racing two chains against
    /// the shared chart state.
    pub fn busy(&self) -> bool {
        self.loading.get() || self.submitting.get()
    }

    /// Value of the most recent measurement
    pub fn last_value(&self) -> Option<f64> {
        self.points.get().last().map(|p| p.value)
    }

    /// Show a success message (auto-clears after timeout)
    pub fn show_success(&self, message: &str) {
        self.success.set(Some(message.to_string()));

        let success_signal = self.success;
        gloo_timers::callback::Timeout::new(3000, move || {
            success_signal.set(None);
        })
        .forget();
    }

    /// Show an error message (auto-clears after timeout)
    pub fn show_error(&self, message: &str) {
        self.error.set(Some(message.to_string()));

        let error_signal = self.error;
        gloo_timers::callback::Timeout::new(5000, move || {
            error_signal.set(None);
        })
        .forget();
    }
}
