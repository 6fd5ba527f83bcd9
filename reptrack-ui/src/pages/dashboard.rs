//! Dashboard Page
//!
//! The single dashboard view: patient lookup, prescription status, the
//! repetition chart, and the entry form.

use leptos::*;

use crate::api;
use crate::components::{Chart, MeasurementEntry};
use crate::state::global::DashboardState;

/// Status text shown when the patient has no active order
const NO_TASK_DISPLAY: &str = "No active prescription (you can still upload)";

/// Dashboard page component
#[component]
pub fn Dashboard() -> impl IntoView {
    let state = use_context::<DashboardState>().expect("DashboardState not found");

    let patient_id = state.patient_id;
    let panel_visible = state.panel_visible;
    let loading = state.loading;

    let state_for_load = state.clone();
    let on_load = move |_| {
        let state = state_for_load.clone();
        if state.busy() {
            return;
        }

        let pid = state.patient_id.get().trim().to_string();
        if pid.is_empty() {
            state.show_error("Enter a patient ID");
            return;
        }

        spawn_local(async move {
            load_dashboard(state, pid).await;
        });
    };

    let state_for_create = state;
    let on_create = move |_| {
        let state = state_for_create.clone();
        if state.busy() {
            return;
        }

        spawn_local(async move {
            state.loading.set(true);

            match api::create_test_patient().await {
                Ok(id) => {
                    if let Err(e) = api::create_service_request(&id).await {
                        web_sys::console::error_1(
                            &format!("Failed to create order: {}", e).into(),
                        );
                        state.show_error("Could not create test data");
                        state.loading.set(false);
                        return;
                    }

                    state.patient_id.set(id.clone());
                    state.show_success(&format!("Created test patient {}", id));
                    state.loading.set(false);

                    // Same transition as pressing Load with the new id
                    load_dashboard(state, id).await;
                }
                Err(e) => {
                    web_sys::console::error_1(
                        &format!("Failed to create test patient: {}", e).into(),
                    );
                    state.show_error("Could not create test data");
                    state.loading.set(false);
                }
            }
        });
    };

    view! {
        <div class="space-y-8">
            // Page header
            <div>
                <h1 class="text-3xl font-bold">"Exercise Dashboard"</h1>
                <p class="text-gray-400 mt-1">"Prescribed exercise and recorded repetitions"</p>
            </div>

            // Patient lookup
            <section class="bg-gray-800 rounded-xl p-6">
                <label class="block text-sm text-gray-400 mb-2">"Patient ID"</label>
                <div class="flex flex-col md:flex-row gap-2">
                    <input
                        type="text"
                        placeholder="Server-assigned identifier"
                        prop:value=move || patient_id.get()
                        on:input=move |ev| patient_id.set(event_target_value(&ev))
                        class="flex-1 bg-gray-700 rounded-lg px-4 py-3 text-white
                               border border-gray-600 focus:border-primary-500 focus:outline-none"
                    />
                    <button
                        on:click=on_load
                        disabled=move || loading.get()
                        class="px-6 py-3 bg-primary-600 hover:bg-primary-700 disabled:bg-gray-600
                               rounded-lg font-medium transition-colors"
                    >
                        {move || if loading.get() { "Loading..." } else { "Load" }}
                    </button>
                    <button
                        on:click=on_create
                        disabled=move || loading.get()
                        class="px-6 py-3 bg-gray-700 hover:bg-gray-600 disabled:bg-gray-600
                               rounded-lg font-medium transition-colors"
                    >
                        "Create test data"
                    </button>
                </div>
            </section>

            // Results panel, revealed after a successful load
            {move || {
                if panel_visible.get() {
                    view! { <ResultsPanel /> }.into_view()
                } else {
                    view! {}.into_view()
                }
            }}
        </div>
    }
}

/// Prescription status, chart and entry form
#[component]
fn ResultsPanel() -> impl IntoView {
    let state = use_context::<DashboardState>().expect("DashboardState not found");

    let task_display = state.task_display;
    let loading = state.loading;
    let points = state.points;

    view! {
        <div class="space-y-8">
            // Prescription status
            <section class="bg-gray-800 rounded-xl p-6">
                <h2 class="text-lg font-semibold mb-2">"Prescription"</h2>
                <p class="text-xl">{move || task_display.get()}</p>
                <p class="text-sm text-gray-400 mt-2">
                    {move || {
                        let count = points.get().len();
                        match state.last_value() {
                            Some(last) => format!("{} entries, last: {:.0} reps", count, last),
                            None => "No entries yet".to_string(),
                        }
                    }}
                </p>
            </section>

            // Repetition chart
            <section class="bg-gray-800 rounded-xl p-6">
                <h2 class="text-xl font-semibold mb-4">"Repetition History"</h2>

                {move || {
                    if loading.get() {
                        view! {
                            <div class="h-64 flex items-center justify-center">
                                <div class="loading-spinner w-8 h-8" />
                            </div>
                        }.into_view()
                    } else {
                        view! { <Chart /> }.into_view()
                    }
                }}
            </section>

            // Entry form
            <section class="bg-gray-800 rounded-xl p-6">
                <h2 class="text-xl font-semibold mb-4">"Upload Entry"</h2>
                <MeasurementEntry />
            </section>
        </div>
    }
}

/// Fetch the prescription and measurement history, then reveal the panel
///
/// The two requests run strictly in sequence; the panel is revealed only
/// after the task lookup succeeded.
async fn load_dashboard(state: DashboardState, patient_id: String) {
    state.loading.set(true);

    match api::fetch_task_display(&patient_id).await {
        Ok(display) => {
            state
                .task_display
                .set(display.unwrap_or_else(|| NO_TASK_DISPLAY.to_string()));
            state.panel_visible.set(true);

            match api::fetch_points(&patient_id).await {
                Ok(points) => state.points.set(points),
                Err(e) => {
                    web_sys::console::error_1(
                        &format!("Failed to fetch measurements: {}", e).into(),
                    );
                    state.show_error("Could not load measurements");
                }
            }
        }
        Err(e) => {
            web_sys::console::error_1(&format!("Failed to fetch task: {}", e).into());
            state.show_error("Could not load records for that ID");
        }
    }

    state.loading.set(false);
}
