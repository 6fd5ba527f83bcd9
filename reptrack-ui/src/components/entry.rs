//! Measurement Entry Component
//!
//! Form for uploading a new exercise entry: repetitions and an optional
//! load in kilograms.

use leptos::*;

use crate::api;
use crate::state::global::DashboardState;

/// Measurement entry form component
#[component]
pub fn MeasurementEntry() -> impl IntoView {
    let state = use_context::<DashboardState>().expect("DashboardState not found");

    let (reps, set_reps) = create_signal(String::new());
    let (weight, set_weight) = create_signal(String::new());
    let submitting = state.submitting;

    let state_for_submit = state;
    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let state = state_for_submit.clone();
        if state.busy() {
            return;
        }

        let patient_id = state.patient_id.get().trim().to_string();
        if patient_id.is_empty() {
            state.show_error("Enter a patient ID first");
            return;
        }

        let raw_reps = reps.get();
        let raw_reps = raw_reps.trim();
        if raw_reps.is_empty() {
            state.show_error("Enter a repetition count");
            return;
        }
        let parsed_reps: f64 = match raw_reps.parse() {
            Ok(v) => v,
            Err(_) => {
                state.show_error("Repetitions must be a number");
                return;
            }
        };

        // The load component is attached only when a weight was entered
        let raw_weight = weight.get();
        let raw_weight = raw_weight.trim();
        let parsed_weight = if raw_weight.is_empty() {
            None
        } else {
            match raw_weight.parse::<f64>() {
                Ok(v) => Some(v),
                Err(_) => {
                    state.show_error("Weight must be a number");
                    return;
                }
            }
        };

        state.submitting.set(true);

        spawn_local(async move {
            match api::submit_observation(&patient_id, parsed_reps, parsed_weight).await {
                Ok(()) => {
                    state.show_success("Entry uploaded");
                    set_reps.set(String::new());
                    set_weight.set(String::new());

                    // Re-fetch so the chart shows the new entry
                    match api::fetch_points(&patient_id).await {
                        Ok(points) => state.points.set(points),
                        Err(e) => state.show_error(&e),
                    }
                }
                Err(e) => {
                    state.show_error(&e);
                }
            }
            state.submitting.set(false);
        });
    };

    view! {
        <form on:submit=on_submit class="space-y-4">
            <div>
                <label class="block text-sm text-gray-400 mb-2">"Repetitions"</label>
                <input
                    type="number"
                    placeholder="e.g. 12"
                    prop:value=move || reps.get()
                    on:input=move |ev| set_reps.set(event_target_value(&ev))
                    class="w-full bg-gray-700 rounded-lg px-4 py-3 text-white
                           border border-gray-600 focus:border-primary-500 focus:outline-none"
                />
            </div>

            <div>
                <label class="block text-sm text-gray-400 mb-2">"Load in kg (optional)"</label>
                <input
                    type="number"
                    placeholder="e.g. 20"
                    prop:value=move || weight.get()
                    on:input=move |ev| set_weight.set(event_target_value(&ev))
                    class="w-full bg-gray-700 rounded-lg px-4 py-3 text-white
                           border border-gray-600 focus:border-primary-500 focus:outline-none"
                />
            </div>

            <button
                type="submit"
                disabled=move || submitting.get()
                class="w-full bg-primary-600 hover:bg-primary-700 disabled:bg-gray-600
                       disabled:cursor-not-allowed rounded-lg py-3 font-semibold
                       transition-colors flex items-center justify-center space-x-2"
            >
                {move || if submitting.get() {
                    view! {
                        <div class="loading-spinner w-5 h-5" />
                        <span>"Uploading..."</span>
                    }.into_view()
                } else {
                    view! {
                        <span>"Upload Entry"</span>
                    }.into_view()
                }}
            </button>
        </form>
    }
}
