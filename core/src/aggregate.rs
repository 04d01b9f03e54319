//! Per-digest grouping of raw CPU time series.
//!
//! Turns the `/cpu_time` response into chart-ready groups ordered by total CPU
//! time, heaviest first. The order decides stacking order and legend priority.

use hashbrown::HashMap;
use serde::Serialize;
use topsql_types::CpuTimeSeries;

/// Identity of one chart series
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Label {
    #[serde(rename = "SQLDigest")]
    pub sql_digest: String,
    #[serde(rename = "SQLText")]
    pub sql_text: String,
}

/// One SQL digest's points, as `[timestamp_millis, cpu_millis]` pairs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Group {
    pub label: Label,
    pub series: Vec<[u64; 2]>,
}

impl Group {
    /// Series name for the legend: the SQL text, or the digest when there is none
    pub fn display_name(&self) -> &str {
        if self.label.sql_text.is_empty() {
            &self.label.sql_digest
        } else {
            &self.label.sql_text
        }
    }
}

fn total_cpu(series: &CpuTimeSeries) -> u64 {
    series
        .cpu_time_millis
        .iter()
        .fold(0u64, |acc, cpu| acc.saturating_add(*cpu))
}

/// Group raw series by SQL digest, heaviest total CPU first.
///
/// Duplicate digests keep the last record. Ties on total are ordered by digest,
/// descending.
pub fn group_by_digest(raw: &[CpuTimeSeries]) -> Vec<Group> {
    let mut by_digest: HashMap<&str, &CpuTimeSeries> = HashMap::with_capacity(raw.len());
    for series in raw {
        by_digest.insert(series.sql_digest.as_str(), series);
    }

    let mut ordered: Vec<(&str, u64, &CpuTimeSeries)> = by_digest
        .into_iter()
        .map(|(digest, series)| (digest, total_cpu(series), series))
        .collect();
    ordered.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| b.0.cmp(a.0)));

    let groups: Vec<Group> = ordered
        .into_iter()
        .map(|(digest, _, series)| {
            if series.timestamp_secs.len() != series.cpu_time_millis.len() {
                tracing::warn!(
                    digest,
                    timestamps = series.timestamp_secs.len(),
                    values = series.cpu_time_millis.len(),
                    "Series arrays differ in length, extra points dropped"
                );
            }

            let points = series
                .timestamp_secs
                .iter()
                .zip(&series.cpu_time_millis)
                .map(|(ts, cpu)| [ts.saturating_mul(1000), *cpu])
                .collect();

            Group {
                label: Label {
                    sql_digest: series.sql_digest.clone(),
                    sql_text: series.sql_text.clone(),
                },
                series: points,
            }
        })
        .collect();

    tracing::debug!(
        input = raw.len(),
        groups = groups.len(),
        "Grouped CPU time series by digest"
    );
    groups
}
