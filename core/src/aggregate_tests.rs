//! Tests for digest grouping and ordering

use std::collections::HashSet;

use proptest::prelude::*;
use topsql_types::CpuTimeSeries;

use crate::aggregate::{Group, group_by_digest};

fn total(group: &Group) -> u64 {
    group.series.iter().map(|[_, cpu]| cpu).sum()
}

fn raw(digest: &str, text: &str, ts: &[u64], cpu: &[u64]) -> CpuTimeSeries {
    CpuTimeSeries {
        sql_digest: digest.to_string(),
        plan_digest: format!("plan-{digest}"),
        sql_text: text.to_string(),
        plan_text: String::new(),
        timestamp_secs: ts.to_vec(),
        cpu_time_millis: cpu.to_vec(),
    }
}

fn order(groups: &[Group]) -> Vec<&str> {
    groups.iter().map(|g| g.label.sql_digest.as_str()).collect()
}

#[test]
fn test_single_digest_points_scaled_to_millis() {
    let groups = group_by_digest(&[raw("A", "SELECT 1", &[100, 200], &[10, 20])]);

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].label.sql_digest, "A");
    assert_eq!(groups[0].label.sql_text, "SELECT 1");
    assert_eq!(groups[0].series, vec![[100_000, 10], [200_000, 20]]);
}

#[test]
fn test_heavier_digest_first() {
    let groups = group_by_digest(&[
        raw("light", "", &[1, 2], &[10, 20]),
        raw("heavy", "", &[1, 2], &[25, 25]),
    ]);
    assert_eq!(order(&groups), vec!["heavy", "light"]);
}

#[test]
fn test_tie_broken_by_digest_descending() {
    let groups = group_by_digest(&[
        raw("aaa", "", &[1], &[5]),
        raw("ccc", "", &[1], &[5]),
        raw("bbb", "", &[1], &[5]),
    ]);
    assert_eq!(order(&groups), vec!["ccc", "bbb", "aaa"]);
}

#[test]
fn test_empty_series_kept_and_sorted_last() {
    let groups = group_by_digest(&[
        raw("empty", "SELECT idle", &[], &[]),
        raw("busy", "SELECT busy", &[1], &[3]),
        raw("zero", "", &[1], &[0]),
    ]);

    assert_eq!(order(&groups), vec!["busy", "zero", "empty"]);
    let empty = groups.iter().find(|g| g.label.sql_digest == "empty").unwrap();
    assert!(empty.series.is_empty());
}

#[test]
fn test_duplicate_digest_last_record_wins() {
    let groups = group_by_digest(&[
        raw("A", "first", &[1], &[100]),
        raw("B", "", &[1], &[50]),
        raw("A", "second", &[1, 2], &[1, 1]),
    ]);

    assert_eq!(groups.len(), 2);
    assert_eq!(order(&groups), vec!["B", "A"]);
    assert_eq!(groups[1].label.sql_text, "second");
    assert_eq!(groups[1].series, vec![[1_000, 1], [2_000, 1]]);
}

#[test]
fn test_mismatched_lengths_pair_up_to_shorter() {
    let groups = group_by_digest(&[raw("A", "", &[1, 2, 3], &[7, 8])]);
    assert_eq!(groups[0].series, vec![[1_000, 7], [2_000, 8]]);
}

#[test]
fn test_display_name_falls_back_to_digest() {
    let groups = group_by_digest(&[
        raw("d1", "", &[1], &[2]),
        raw("d2", "SELECT * FROM t", &[1], &[1]),
    ]);
    assert_eq!(groups[0].display_name(), "d1");
    assert_eq!(groups[1].display_name(), "SELECT * FROM t");
}

#[test]
fn test_empty_input_yields_no_groups() {
    assert!(group_by_digest(&[]).is_empty());
}

#[test]
fn test_group_serializes_with_chart_field_names() {
    let groups = group_by_digest(&[raw("A", "SELECT 1", &[100], &[10])]);
    let json = serde_json::to_value(&groups[0]).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "Label": { "SQLDigest": "A", "SQLText": "SELECT 1" },
            "Series": [[100000, 10]]
        })
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Properties
// ─────────────────────────────────────────────────────────────────────────────

fn arb_series() -> impl Strategy<Value = CpuTimeSeries> {
    ("[a-e]{1,2}", prop::collection::vec((0u64..2_000_000_000, 0u64..10_000), 0..8)).prop_map(
        |(digest, points)| {
            let (timestamp_secs, cpu_time_millis) = points.into_iter().unzip();
            CpuTimeSeries {
                sql_text: format!("SELECT '{digest}'"),
                sql_digest: digest,
                timestamp_secs,
                cpu_time_millis,
                ..Default::default()
            }
        },
    )
}

proptest! {
    #[test]
    fn prop_one_group_per_distinct_digest(input in prop::collection::vec(arb_series(), 0..12)) {
        let distinct: HashSet<&str> = input.iter().map(|s| s.sql_digest.as_str()).collect();
        prop_assert_eq!(group_by_digest(&input).len(), distinct.len());
    }

    #[test]
    fn prop_ordered_by_total_then_digest_desc(input in prop::collection::vec(arb_series(), 0..12)) {
        let groups = group_by_digest(&input);
        for pair in groups.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            let (sum_a, sum_b) = (total(a), total(b));
            prop_assert!(sum_a > sum_b || (sum_a == sum_b && a.label.sql_digest > b.label.sql_digest));
        }
    }

    #[test]
    fn prop_points_match_last_raw_record(input in prop::collection::vec(arb_series(), 1..12)) {
        for group in group_by_digest(&input) {
            let source = input
                .iter()
                .rev()
                .find(|s| s.sql_digest == group.label.sql_digest)
                .unwrap();
            prop_assert_eq!(group.series.len(), source.timestamp_secs.len());
            prop_assert_eq!(group.series.len(), source.cpu_time_millis.len());
            for (i, point) in group.series.iter().enumerate() {
                prop_assert_eq!(point[0], source.timestamp_secs[i] * 1000);
                prop_assert_eq!(point[1], source.cpu_time_millis[i]);
            }
        }
    }

    #[test]
    fn prop_grouping_is_deterministic(input in prop::collection::vec(arb_series(), 0..12)) {
        prop_assert_eq!(group_by_digest(&input), group_by_digest(&input));
    }
}
