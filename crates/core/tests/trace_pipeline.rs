//! End-to-end checks over a recorded trace fixture.

use director_core::flow::{
    LayoutCache, build_flow_layout, filter_nodes_by_viewport, node_rects, sequence_edges,
    structure_edges,
};
use director_core::{
    EngineConfig, SeekDirection, StudioConfigExt, build_density, build_intervals,
    collect_step_boundaries, derive_lane_groups, derive_playback_state, derive_window_range,
    find_next_boundary, visible_intervals, visible_lane_groups,
};
use director_protocol::{
    ContainerSize, FlowViewport, LaneStrategy, PlaybackState, TimelineStudioConfig, TraceSummary,
};

fn load_trace() -> TraceSummary {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/sample-trace.json");
    let text = std::fs::read_to_string(path).expect("fixture readable");
    serde_json::from_str(&text).expect("fixture parses")
}

fn lane_of(layout: &director_protocol::IntervalLayout, id: &str) -> usize {
    layout.interval(id).expect("interval present").lane
}

#[test]
fn fixture_lays_out_into_two_lanes() {
    let trace = load_trace();
    let layout = build_intervals(&trace.started_at, trace.ended_at.as_deref(), &trace.steps)
        .expect("valid trace");

    assert_eq!(layout.wall_time_ms, 12_000.0);
    assert_eq!(layout.wall_time_ms, trace.reported_wall_time_ms());
    assert_eq!(layout.lane_count, 2);
    assert_eq!(lane_of(&layout, "s1"), 0);
    assert_eq!(lane_of(&layout, "s2"), 0);
    assert_eq!(lane_of(&layout, "s3"), 1);
    assert_eq!(lane_of(&layout, "s4"), 0);
    assert_eq!(lane_of(&layout, "s6"), 0);

    let running = layout.interval("s6").expect("running step");
    assert_eq!(running.duration_ms(), 0.0);
    assert_eq!(running.w_pct, director_protocol::MIN_WIDTH_PCT);
}

#[test]
fn fixture_density_tracks_concurrency() {
    let trace = load_trace();
    let density = build_density(&trace.started_at, trace.ended_at.as_deref(), &trace.steps, 12)
        .expect("valid trace");
    assert_eq!(
        density.buckets,
        vec![1, 1, 3, 2, 2, 2, 2, 2, 1, 2, 0, 0]
    );
    assert_eq!(density.peak(), 3);
}

#[test]
fn fixture_playback_and_seeking() {
    let trace = load_trace();
    let end = trace.ended_at.as_deref();
    let layout = build_intervals(&trace.started_at, end, &trace.steps).expect("valid trace");
    let fetch = layout.interval("s3").expect("s3");
    assert_eq!(derive_playback_state(fetch, 1_000.0), PlaybackState::Future);
    assert_eq!(derive_playback_state(fetch, 4_000.0), PlaybackState::Active);
    assert_eq!(derive_playback_state(fetch, 8_000.0), PlaybackState::Past);

    let boundaries =
        collect_step_boundaries(&trace.started_at, end, &trace.steps).expect("valid trace");
    assert_eq!(
        boundaries,
        vec![0.0, 2_000.0, 2_500.0, 5_000.0, 6_000.0, 7_500.0, 9_000.0]
    );
    assert_eq!(
        find_next_boundary(&boundaries, 2_000.0, SeekDirection::Forward),
        Some(2_500.0)
    );
    assert_eq!(
        find_next_boundary(&boundaries, 6_000.0, SeekDirection::Backward),
        Some(5_000.0)
    );
}

#[test]
fn fixture_window_keeps_selection() {
    let trace = load_trace();
    let config = EngineConfig::default();
    let layout = build_intervals(&trace.started_at, trace.ended_at.as_deref(), &trace.steps)
        .expect("valid trace");

    let window = derive_window_range(layout.wall_time_ms, 11_000.0, 5_000.0, &config.window);
    assert_eq!((window.start_ms, window.end_ms), (7_000.0, 12_000.0));

    let visible = visible_intervals(&layout.intervals, Some(&window), Some("s1"), &config.window);
    let ids: Vec<&str> = visible.iter().map(|i| i.step_id.as_str()).collect();
    // Overscan reaches back to 6000 ms, picking up s2 and s4 by their edges.
    assert_eq!(ids, vec!["s2", "s4", "s5", "s6", "s1"]);
}

#[test]
fn fixture_lane_groups_reconcile_saved_config() {
    let trace = load_trace();
    let types = derive_lane_groups(&trace.steps, LaneStrategy::Type);
    assert_eq!(
        types,
        vec!["decision", "guardrail", "handoff", "llm_call", "tool_call"]
    );
    assert_eq!(
        derive_lane_groups(&trace.steps, LaneStrategy::Parent),
        vec!["root", "s1", "s5"]
    );

    let mut saved = TimelineStudioConfig::default();
    saved.r#type.order = vec!["tool_call".into(), "retired".into()];
    saved.r#type.hidden = vec!["guardrail".into()];

    let updated = saved
        .reconcile(LaneStrategy::Type, &types)
        .expect("stale config is rewritten");
    let lanes = updated.for_strategy(LaneStrategy::Type);
    assert_eq!(
        lanes.order,
        vec!["tool_call", "decision", "guardrail", "handoff", "llm_call"]
    );
    assert_eq!(
        visible_lane_groups(lanes),
        vec!["tool_call", "decision", "handoff", "llm_call"]
    );
    assert_eq!(updated.reconcile(LaneStrategy::Type, &types), None);
}

#[test]
fn fixture_flow_layout_and_culling() {
    let trace = load_trace();
    let config = EngineConfig::default();
    let edges = structure_edges(&trace.steps);
    assert_eq!(edges.len(), 4);
    assert_eq!(sequence_edges(&trace.steps).len(), 5);

    let nodes = build_flow_layout(&trace.steps, &edges, &config.layout);
    let positions: Vec<(&str, f64, f64)> = nodes
        .iter()
        .map(|n| (n.id.as_str(), n.position.x, n.position.y))
        .collect();
    assert_eq!(
        positions,
        vec![
            ("s1", 0.0, 0.0),
            ("s2", 300.0, 0.0),
            ("s3", 300.0, 168.0),
            ("s4", 300.0, 336.0),
            ("s5", 0.0, 168.0),
            ("s6", 300.0, 504.0),
        ]
    );

    let mut cache = LayoutCache::new();
    let cached = cache
        .layout_or_compute(&trace.id, &trace.steps, &edges, &config.layout)
        .to_vec();
    assert_eq!(cached, nodes);
    assert_eq!(cache.len(), 1);

    let rects = node_rects(&nodes, &config.layout);
    let viewport = FlowViewport {
        x: 0.0,
        y: 0.0,
        zoom: 1.0,
    };
    let container = ContainerSize {
        width: 400.0,
        height: 200.0,
    };
    let visible: Vec<&str> = filter_nodes_by_viewport(&rects, &viewport, &container, 0.0)
        .into_iter()
        .map(|r| r.id.as_str())
        .collect();
    assert_eq!(visible, vec!["s1", "s2", "s3", "s5"]);
}
