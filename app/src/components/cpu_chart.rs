//! CPU Time Chart Component
//!
//! Stacked bar chart of CPU time per SQL digest, drawn with ECharts via
//! wasm-bindgen JS interop. Dragging across the time axis reports the brushed
//! range through `on_brush`.

use std::rc::Rc;

use dioxus::prelude::*;
use gloo_timers::future::TimeoutFuture;
use serde::Serialize;
use serde_json::json;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

use topsql_core::chart::{BrushEndEvent, build_option};
use topsql_core::format::format_tick;

use crate::types::{Group, TimeRange};

const CHART_ID: &str = "chart-cpu-time";

// ─────────────────────────────────────────────────────────────────────────────
// ECharts JS Interop
// ─────────────────────────────────────────────────────────────────────────────

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_namespace = echarts, js_name = init)]
    fn echarts_init(dom: &web_sys::Element) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_namespace = echarts, js_name = getInstanceByDom)]
    fn echarts_get_instance(dom: &web_sys::Element) -> Result<JsValue, JsValue>;
}

fn chart_element() -> Option<web_sys::Element> {
    web_sys::window()?.document()?.get_element_by_id(CHART_ID)
}

fn existing_chart() -> Option<JsValue> {
    let element = chart_element()?;
    let instance = echarts_get_instance(&element).ok()?;
    (!instance.is_null() && !instance.is_undefined()).then_some(instance)
}

/// Existing instance, or a new one. `None` until the element and the ECharts
/// script are both available.
fn init_chart() -> Option<JsValue> {
    if let Some(chart) = existing_chart() {
        return Some(chart);
    }
    let element = chart_element()?;
    echarts_init(&element).ok()
}

/// Call `target[name](...args)`, ignoring missing methods and JS exceptions
fn call_method(target: &JsValue, name: &str, args: &[JsValue]) -> Option<JsValue> {
    let func = js_sys::Reflect::get(target, &JsValue::from_str(name))
        .ok()?
        .dyn_into::<js_sys::Function>()
        .ok()?;
    let args: js_sys::Array = args.iter().collect();
    match func.apply(target, &args) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(method = name, error = ?err, "ECharts call failed");
            None
        }
    }
}

fn to_js(value: &serde_json::Value) -> Option<JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|err| tracing::error!(error = %err, "Failed to convert chart option"))
        .ok()
}

/// Put the chart in horizontal brush mode so a plain drag selects a range
fn enable_brush(chart: &JsValue) {
    let action = json!({
        "type": "takeGlobalCursor",
        "key": "brush",
        "brushOption": { "brushType": "lineX", "brushMode": "single" },
    });
    if let Some(action) = to_js(&action) {
        call_method(chart, "dispatchAction", &[action]);
    }
}

fn clear_brush(chart: &JsValue) {
    if let Some(action) = to_js(&json!({ "type": "brush", "areas": [] })) {
        call_method(chart, "dispatchAction", &[action]);
    }
}

fn render_groups(chart: &JsValue, groups: &[Group], tick_formatter: &JsValue) {
    let Some(option) = to_js(&build_option(groups)) else {
        return;
    };

    // Tick labels are formatted in Rust so they match the reset control
    if let Ok(x_axis) = js_sys::Reflect::get(&option, &JsValue::from_str("xAxis"))
        && let Ok(axis_label) = js_sys::Reflect::get(&x_axis, &JsValue::from_str("axisLabel"))
    {
        let _ = js_sys::Reflect::set(&axis_label, &JsValue::from_str("formatter"), tick_formatter);
    }

    let Some(opts) = to_js(&json!({ "notMerge": true })) else {
        return;
    };
    call_method(chart, "setOption", &[option, opts]);
    enable_brush(chart);
}

/// Detach `brush_handler` and release the instance
fn dispose_chart(brush_handler: &JsValue) {
    if let Some(chart) = existing_chart() {
        call_method(&chart, "off", &[JsValue::from_str("brushEnd"), brush_handler.clone()]);
        call_method(&chart, "dispose", &[]);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Component
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Props, Clone, PartialEq)]
pub struct CpuChartProps {
    /// Aggregated groups, largest total first
    pub groups: Vec<Group>,
    /// Range the user dragged out on the time axis
    pub on_brush: EventHandler<TimeRange>,
    #[props(default)]
    pub loading: bool,
}

#[component]
pub fn CpuChart(props: CpuChartProps) -> Element {
    let mut groups = use_signal(|| props.groups.clone());
    let mut chart_ready = use_signal(|| false);
    let mut brushed = use_signal(|| None::<TimeRange>);
    let on_brush = props.on_brush;

    // Keep the signal in step with the prop without subscribing this render
    if *groups.peek() != props.groups {
        groups.set(props.groups.clone());
    }

    let tick_formatter = use_hook(|| {
        Rc::new(Closure::<dyn Fn(f64) -> String>::new(|value: f64| {
            format_tick(value.round() as i64)
        }))
    });

    // Listener closures live as long as this component; detached in use_drop
    let on_brush_end = use_hook(|| {
        Rc::new(Closure::<dyn FnMut(JsValue)>::new(move |event: JsValue| {
            match serde_wasm_bindgen::from_value::<BrushEndEvent>(event) {
                Ok(event) => {
                    if let Some(range) = event.time_range() {
                        brushed.set(Some(range));
                    }
                }
                Err(err) => tracing::warn!(error = %err, "Unreadable brushEnd event"),
            }
            // The refetch redraws the chart for the new range
            if let Some(chart) = existing_chart() {
                clear_brush(&chart);
            }
        }))
    });

    let on_resize = use_hook(|| {
        let closure = Rc::new(Closure::<dyn Fn()>::new(|| {
            if let Some(chart) = existing_chart() {
                call_method(&chart, "resize", &[]);
            }
        }));
        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("resize", (*closure).as_ref().unchecked_ref());
        }
        closure
    });

    // Create the instance once the element and script are both there
    let brush_handler = on_brush_end.clone();
    use_future(move || {
        let brush_handler = brush_handler.clone();
        async move {
            for _ in 0..50 {
                if let Some(chart) = init_chart() {
                    let handler: &JsValue = (*brush_handler).as_ref();
                    call_method(&chart, "on", &[JsValue::from_str("brushEnd"), handler.clone()]);
                    chart_ready.set(true);
                    return;
                }
                TimeoutFuture::new(100).await;
            }
            tracing::error!("ECharts did not load; chart unavailable");
        }
    });

    // Redraw when data changes or the chart first becomes ready
    use_effect(move || {
        let ready = chart_ready();
        let data = groups.read().clone();
        if !ready {
            return;
        }
        if let Some(chart) = existing_chart() {
            render_groups(&chart, &data, (*tick_formatter).as_ref());
        }
    });

    use_effect(move || {
        if let Some(range) = brushed() {
            on_brush.call(range);
        }
    });

    use_drop(move || {
        if let Some(window) = web_sys::window() {
            let _ = window
                .remove_event_listener_with_callback("resize", (*on_resize).as_ref().unchecked_ref());
        }
        dispose_chart((*on_brush_end).as_ref());
    });

    let is_empty = groups.read().is_empty();

    rsx! {
        div { class: "cpu-chart",
            div { id: CHART_ID, class: "chart-container" }
            if is_empty {
                div { class: "chart-empty",
                    if props.loading { "Loading…" } else { "No CPU time recorded in this range" }
                }
            }
        }
    }
}
