//! ECharts option building for the stacked CPU time chart.
//!
//! The option is plain JSON so it can be built and checked natively; the web
//! view converts it to a JS object and attaches the tick formatter and brush
//! handling on top.

use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;
use serde_json::{Value, json};
use topsql_types::TimeRange;

use crate::aggregate::Group;

/// Stack id shared by every series so bars at one timestamp pile up
pub const STACK_KEY: &str = "cpu_time";

/// Points of every group placed on the union of all timestamps.
///
/// Bars stack per data index, so each series gets a value (0 when absent) at
/// every timestamp that any series has.
pub fn align_by_timestamp(groups: &[Group]) -> Vec<Vec<[u64; 2]>> {
    let timestamps: BTreeSet<u64> = groups
        .iter()
        .flat_map(|g| g.series.iter().map(|[ts, _]| *ts))
        .collect();

    groups
        .iter()
        .map(|group| {
            let mut by_ts: BTreeMap<u64, u64> = timestamps.iter().map(|ts| (*ts, 0)).collect();
            for [ts, cpu] in &group.series {
                if let Some(v) = by_ts.get_mut(ts) {
                    *v = v.saturating_add(*cpu);
                }
            }
            by_ts.into_iter().map(|(ts, cpu)| [ts, cpu]).collect()
        })
        .collect()
}

/// Full chart option: time x-axis, linear y-axis, one stacked bar series per
/// group, legend on the right, brush limited to the x-axis.
pub fn build_option(groups: &[Group]) -> Value {
    let aligned = align_by_timestamp(groups);

    let series: Vec<Value> = groups
        .iter()
        .zip(aligned)
        .map(|(group, data)| {
            json!({
                "type": "bar",
                "id": group.label.sql_digest,
                "name": group.display_name(),
                "stack": STACK_KEY,
                "emphasis": { "focus": "series" },
                "data": data,
            })
        })
        .collect();

    let legend_names: Vec<&str> = groups.iter().map(Group::display_name).collect();

    json!({
        "animation": false,
        "grid": { "left": 60, "right": 340, "top": 30, "bottom": 40 },
        "tooltip": {
            "trigger": "axis",
            "axisPointer": { "type": "shadow" },
            "confine": true,
        },
        "legend": {
            "type": "scroll",
            "orient": "vertical",
            "right": 10,
            "top": 20,
            "bottom": 20,
            "width": 300,
            "data": legend_names,
        },
        "toolbox": { "show": false },
        "brush": {
            "toolbox": ["lineX"],
            "xAxisIndex": 0,
            "brushMode": "single",
            "transformable": false,
        },
        "xAxis": {
            "type": "time",
            "axisLabel": { "hideOverlap": false },
        },
        "yAxis": { "type": "value" },
        "series": series,
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Brush Events
// ─────────────────────────────────────────────────────────────────────────────

/// Payload of the ECharts `brushEnd` event (only the fields used here).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BrushEndEvent {
    #[serde(default)]
    pub areas: Vec<BrushArea>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BrushArea {
    #[serde(rename = "brushType", default)]
    pub brush_type: String,
    /// For `lineX` brushes: `[start, end]` in x-axis data units (epoch millis)
    #[serde(rename = "coordRange", default)]
    pub coord_range: Vec<f64>,
}

impl BrushEndEvent {
    /// Selected x-extent as a time range, if the brush covered one
    pub fn time_range(&self) -> Option<TimeRange> {
        let area = self
            .areas
            .iter()
            .find(|a| a.brush_type == "lineX" && a.coord_range.len() >= 2)?;
        let (start, end) = (area.coord_range[0], area.coord_range[1]);
        if !start.is_finite() || !end.is_finite() {
            return None;
        }
        Some(TimeRange::new(start.round() as i64, end.round() as i64))
    }
}
