#![allow(non_snake_case)]

use dioxus::prelude::*;
use topsql_core::{QueryStatus, group_by_digest};
use topsql_types::{TOP_OPTIONS, WINDOW_OPTIONS};

use crate::api;
use crate::components::{CpuChart, ToastFrame, ToastKind, use_toast, use_toast_provider};
use crate::query::use_series_query;
use crate::types::{Instance, Selection, SelectionAction};
use crate::utils::{reset_label, select_value};

static CSS: Asset = asset!("/assets/styles.css");

const ECHARTS_SRC: &str = "https://cdn.jsdelivr.net/npm/echarts@5.5.1/dist/echarts.min.js";

#[component]
pub fn App() -> Element {
    use_toast_provider();
    let mut toasts = use_toast();

    let mut selection = use_signal(Selection::default);
    let mut last_series_error = use_signal(|| None::<String>);

    // Instance list: fetched once on load
    let instances = use_resource(|| async move { api::get_instances().await.map_err(|e| e.to_string()) });

    let series_key = use_memo(move || selection.read().series_key());
    let series = use_series_query(series_key);
    let groups = use_memo(move || {
        series
            .read()
            .data
            .as_deref()
            .map(group_by_digest)
            .unwrap_or_default()
    });

    use_effect(move || {
        if let Some(Err(err)) = &*instances.read() {
            tracing::error!(error = %err, "Failed to load instances");
            toasts.push(format!("Failed to load instances: {err}"), ToastKind::Error);
        }
    });

    // One toast per distinct failure, not one per poll
    use_effect(move || {
        let error = series.read().error.clone();
        if *last_series_error.peek() == error {
            return;
        }
        if let Some(err) = &error {
            toasts.push(format!("Failed to load CPU time: {err}"), ToastKind::Warning);
        }
        last_series_error.set(error);
    });

    let instance_list: Vec<Instance> = match &*instances.read() {
        Some(Ok(list)) => list.clone(),
        _ => Vec::new(),
    };
    let instances_loading = instances.read().is_none();
    let current = selection.read().clone();
    let snapshot = series.read().clone();

    rsx! {
        link { rel: "stylesheet", href: CSS }
        document::Script { src: ECHARTS_SRC }
        main { class: "container",
            header { class: "app-header",
                h1 { "Top SQL" }
                if snapshot.is_fetching {
                    span { class: "fetch-indicator", "Refreshing…" }
                }
                if let Some(err) = &snapshot.error {
                    span { class: "error-indicator", title: "{err}", "Last refresh failed" }
                }
            }

            section { class: "controls",
                select {
                    class: "selector",
                    value: select_value(current.instance.as_deref()),
                    disabled: instances_loading,
                    onchange: move |e: FormEvent| {
                        selection.write().apply(SelectionAction::SelectInstance(e.value()));
                    },
                    option { value: "", "Select Instance" }
                    for inst in instance_list.iter() {
                        option { key: "{inst.instance}", value: "{inst.instance}", "{inst.label()}" }
                    }
                }

                select {
                    class: "selector",
                    value: select_value(current.top.as_deref()),
                    onchange: move |e: FormEvent| {
                        selection.write().apply(SelectionAction::SelectTop(e.value()));
                    },
                    option { value: "", "Select Top" }
                    for top in TOP_OPTIONS {
                        option { key: "{top}", value: "{top}", "{top}" }
                    }
                }

                select {
                    class: "selector",
                    value: select_value(current.window.as_deref()),
                    onchange: move |e: FormEvent| {
                        selection.write().apply(SelectionAction::SelectWindow(e.value()));
                    },
                    option { value: "", "Select Window" }
                    for window in WINDOW_OPTIONS {
                        option { key: "{window}", value: "{window}", "{window}" }
                    }
                }

                if let Some(range) = current.time_range {
                    button {
                        class: "btn btn-reset-range",
                        onclick: move |_| {
                            selection.write().apply(SelectionAction::ResetTimeRange);
                        },
                        "{reset_label(&range)}"
                    }
                }
            }

            if current.series_key().is_some() {
                CpuChart {
                    groups: groups(),
                    loading: snapshot.status == QueryStatus::Loading,
                    on_brush: move |range| {
                        selection.write().apply(SelectionAction::BrushTimeRange(range));
                    },
                }
            } else {
                div { class: "placeholder", "Select an instance to see its CPU time by SQL." }
            }

            ToastFrame {}
        }
    }
}
