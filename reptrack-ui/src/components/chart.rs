//! Chart Component
//!
//! Repetition history line chart using HTML5 Canvas.

use leptos::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::api::{EXERCISE_DISPLAY, EXERCISE_UNIT};
use crate::state::global::{DashboardState, MeasurePoint};

/// Series color for the repetition line
const SERIES_COLOR: &str = "#FF6384";

/// Repetition history chart component
///
/// The canvas handle lives inside this component only; every redraw clears
/// the full canvas before drawing, so the previous chart is disposed before
/// its replacement appears and redrawing the same data is idempotent.
#[component]
pub fn Chart() -> impl IntoView {
    let state = use_context::<DashboardState>().expect("DashboardState not found");
    let canvas_ref = create_node_ref::<html::Canvas>();

    // Redraw whenever the measurement list changes
    create_effect(move |_| {
        let points = state.points.get();

        if let Some(canvas) = canvas_ref.get() {
            draw_chart(&canvas, &points);
        }
    });

    view! {
        <div class="relative">
            <canvas
                node_ref=canvas_ref
                width="800"
                height="400"
                class="w-full h-64 md:h-96 rounded-lg"
            />

            // Legend
            <div class="flex justify-center items-center space-x-2 mt-4">
                <div
                    class="w-3 h-3 rounded-full"
                    style=format!("background-color: {}", SERIES_COLOR)
                />
                <span class="text-sm text-gray-300">
                    {format!("{} ({})", EXERCISE_DISPLAY, EXERCISE_UNIT)}
                </span>
            </div>
        </div>
    }
}

/// Draw the chart on canvas
fn draw_chart(canvas: &HtmlCanvasElement, points: &[MeasurePoint]) {
    let ctx = match canvas.get_context("2d") {
        Ok(Some(ctx)) => match ctx.dyn_into::<CanvasRenderingContext2d>() {
            Ok(ctx) => ctx,
            Err(_) => return,
        },
        _ => return,
    };

    let width = canvas.width() as f64;
    let height = canvas.height() as f64;

    // Margins
    let margin_left = 60.0;
    let margin_right = 20.0;
    let margin_top = 20.0;
    let margin_bottom = 40.0;

    let chart_width = width - margin_left - margin_right;
    let chart_height = height - margin_top - margin_bottom;

    // Clear canvas; this releases whatever chart was drawn before
    ctx.set_fill_style(&"#1f2937".into()); // gray-800
    ctx.fill_rect(0.0, 0.0, width, height);

    // Value range for the y-axis
    let mut value_min = f64::INFINITY;
    let mut value_max = f64::NEG_INFINITY;

    for point in points {
        value_min = value_min.min(point.value);
        value_max = value_max.max(point.value);
    }

    if points.is_empty() {
        value_min = 0.0;
        value_max = 1.0;
    }

    // Add padding to y range
    let y_range = value_max - value_min;
    let y_padding = if y_range > 0.0 { y_range * 0.1 } else { 1.0 };
    value_min -= y_padding;
    value_max += y_padding;

    // Draw grid lines
    ctx.set_stroke_style(&"#374151".into()); // gray-700
    ctx.set_line_width(1.0);

    // Horizontal grid lines (5 lines)
    for i in 0..=5 {
        let y = margin_top + (i as f64 / 5.0) * chart_height;
        ctx.begin_path();
        ctx.move_to(margin_left, y);
        ctx.line_to(width - margin_right, y);
        ctx.stroke();

        // Y-axis labels
        let value = value_max - (i as f64 / 5.0) * (value_max - value_min);
        ctx.set_fill_style(&"#9ca3af".into()); // gray-400
        ctx.set_font("12px sans-serif");
        let _ = ctx.fill_text(&format!("{:.0}", value), 5.0, y + 4.0);
    }

    if points.is_empty() {
        ctx.set_fill_style(&"#6b7280".into());
        ctx.set_font("16px sans-serif");
        let _ = ctx.fill_text("No measurements yet", width / 2.0 - 80.0, height / 2.0);
        return;
    }

    // X position for a point index; a single point sits in the middle
    let x_at = |i: usize| -> f64 {
        if points.len() == 1 {
            margin_left + chart_width / 2.0
        } else {
            margin_left + (i as f64 / (points.len() - 1) as f64) * chart_width
        }
    };
    let y_at = |value: f64| -> f64 {
        margin_top + ((value_max - value) / (value_max - value_min)) * chart_height
    };

    // Draw the series line
    ctx.set_stroke_style(&SERIES_COLOR.into());
    ctx.set_line_width(2.0);
    ctx.begin_path();

    for (i, point) in points.iter().enumerate() {
        let x = x_at(i);
        let y = y_at(point.value);

        if i == 0 {
            ctx.move_to(x, y);
        } else {
            ctx.line_to(x, y);
        }
    }

    ctx.stroke();

    // Draw points
    ctx.set_fill_style(&SERIES_COLOR.into());
    for (i, point) in points.iter().enumerate() {
        ctx.begin_path();
        let _ = ctx.arc(x_at(i), y_at(point.value), 3.0, 0.0, std::f64::consts::PI * 2.0);
        ctx.fill();
    }

    // Draw x-axis labels (at most 6, evenly spaced over the points)
    ctx.set_fill_style(&"#9ca3af".into());
    ctx.set_font("12px sans-serif");

    let step = (points.len() / 6).max(1);
    for (i, point) in points.iter().enumerate().step_by(step) {
        let _ = ctx.fill_text(&point.label, x_at(i) - 30.0, height - 10.0);
    }
}
