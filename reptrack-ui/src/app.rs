//! App Root Component
//!
//! Main application component with global state providers.

use leptos::*;

use crate::api;
use crate::components::Toast;
use crate::pages::Dashboard;
use crate::state::global::provide_dashboard_state;

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    // Provide dashboard state to all components
    provide_dashboard_state();

    view! {
        <div class="min-h-screen bg-gray-900 text-white flex flex-col">
            // Header
            <header class="bg-gray-800 border-b border-gray-700 py-4 px-4">
                <div class="container mx-auto flex items-center justify-between">
                    <span class="text-xl font-bold">"Reptrack"</span>
                    <span class="text-sm text-gray-400">{api::get_fhir_base()}</span>
                </div>
            </header>

            // Main content area
            <main class="flex-1 container mx-auto px-4 py-8">
                <Dashboard />
            </main>

            // Toast notifications
            <Toast />
        </div>
    }
}
