use director_core::flow::{self, DEFAULT_VIEWPORT_PADDING, LayoutCache};
use director_core::{EngineConfig, SeekDirection, WindowConfig};
use director_protocol::{
    ContainerSize, FlowEdge, FlowNode, FlowViewport, LaneStrategy, StepInterval, StepRecord,
    StepSummary, WindowRange,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;

fn from_json<T: DeserializeOwned>(json: &str, what: &str) -> Result<T, JsError> {
    serde_json::from_str(json).map_err(|e| JsError::new(&format!("invalid {what}: {e}")))
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, JsError> {
    serde_json::to_string(value).map_err(|e| JsError::new(&e.to_string()))
}

fn parse_strategy(strategy: &str) -> Result<LaneStrategy, JsError> {
    strategy.parse().map_err(|e: String| JsError::new(&e))
}

/// Lay out steps into trace-relative lanes. `steps_json` is an array of
/// steps with `id`, `startedAt` and optional `endedAt`; returns the layout
/// as JSON.
#[wasm_bindgen]
pub fn build_intervals(
    trace_start: &str,
    trace_end: Option<String>,
    steps_json: &str,
) -> Result<String, JsError> {
    let steps: Vec<StepRecord> = from_json(steps_json, "steps")?;
    let layout = director_core::build_intervals(trace_start, trace_end.as_deref(), &steps)
        .map_err(|e| JsError::new(&e.to_string()))?;
    to_json(&layout)
}

/// Density histogram for the minimap, as JSON.
#[wasm_bindgen]
pub fn build_density(
    trace_start: &str,
    trace_end: Option<String>,
    steps_json: &str,
    bucket_count: usize,
) -> Result<String, JsError> {
    let steps: Vec<StepRecord> = from_json(steps_json, "steps")?;
    let density =
        director_core::build_density(trace_start, trace_end.as_deref(), &steps, bucket_count)
            .map_err(|e| JsError::new(&e.to_string()))?;
    to_json(&density)
}

/// `"past"`, `"active"` or `"future"` for one interval.
#[wasm_bindgen]
pub fn derive_playback_state(interval_json: &str, playhead_ms: f64) -> Result<String, JsError> {
    let interval: StepInterval = from_json(interval_json, "interval")?;
    Ok(director_core::derive_playback_state(&interval, playhead_ms)
        .as_str()
        .to_string())
}

/// Window of `span_ms` around the playhead. `config_json` optionally
/// overrides the window settings.
#[wasm_bindgen]
pub fn derive_window_range(
    wall_time_ms: f64,
    playhead_ms: f64,
    span_ms: f64,
    config_json: Option<String>,
) -> Result<String, JsError> {
    let config: WindowConfig = match config_json {
        Some(json) => from_json(&json, "window config")?,
        None => WindowConfig::default(),
    };
    let window = director_core::derive_window_range(wall_time_ms, playhead_ms, span_ms, &config);
    to_json(&window)
}

/// Playhead of the primary trace mapped onto a ghost trace.
#[wasm_bindgen]
pub fn map_playhead(playhead_ms: f64, from_wall_time_ms: f64, to_wall_time_ms: f64) -> f64 {
    director_core::map_playhead(playhead_ms, from_wall_time_ms, to_wall_time_ms)
}

/// The primary trace's window, overscanned and projected onto a ghost trace.
#[wasm_bindgen]
pub fn rescale_window(
    window_json: &str,
    from_wall_time_ms: f64,
    to_wall_time_ms: f64,
    config_json: Option<String>,
) -> Result<String, JsError> {
    let window: WindowRange = from_json(window_json, "window")?;
    let config: WindowConfig = match config_json {
        Some(json) => from_json(&json, "window config")?,
        None => WindowConfig::default(),
    };
    let ghost =
        director_core::rescale_window(&window, from_wall_time_ms, to_wall_time_ms, &config);
    to_json(&ghost)
}

#[wasm_bindgen]
pub fn collect_step_boundaries(
    trace_start: &str,
    trace_end: Option<String>,
    steps_json: &str,
) -> Result<Vec<f64>, JsError> {
    let steps: Vec<StepRecord> = from_json(steps_json, "steps")?;
    director_core::collect_step_boundaries(trace_start, trace_end.as_deref(), &steps)
        .map_err(|e| JsError::new(&e.to_string()))
}

/// Next boundary to seek to, or `undefined` when there are none.
#[wasm_bindgen]
pub fn find_next_boundary(boundaries: &[f64], current_ms: f64, forward: bool) -> Option<f64> {
    let direction = if forward {
        SeekDirection::Forward
    } else {
        SeekDirection::Backward
    };
    director_core::find_next_boundary(boundaries, current_ms, direction)
}

#[wasm_bindgen]
pub fn derive_lane_groups(steps_json: &str, strategy: &str) -> Result<String, JsError> {
    let steps: Vec<StepSummary> = from_json(steps_json, "steps")?;
    let groups = director_core::derive_lane_groups(&steps, parse_strategy(strategy)?);
    to_json(&groups)
}

/// Reconcile a saved `{ order, hidden }` config against the known groups.
#[wasm_bindgen]
pub fn normalize_lane_order(
    known_json: &str,
    order_json: &str,
    hidden_json: &str,
) -> Result<String, JsError> {
    let known: Vec<String> = from_json(known_json, "known groups")?;
    let order: Vec<String> = from_json(order_json, "lane order")?;
    let hidden: Vec<String> = from_json(hidden_json, "hidden lanes")?;
    to_json(&director_core::normalize_lane_order(&known, &order, &hidden))
}

/// Edges for the flow view: `"structure"` (parent to child) or `"sequence"`
/// (recording order).
#[wasm_bindgen]
pub fn flow_edges(steps_json: &str, mode: &str) -> Result<String, JsError> {
    let steps: Vec<StepSummary> = from_json(steps_json, "steps")?;
    let edges = match mode {
        "structure" => flow::structure_edges(&steps),
        "sequence" => flow::sequence_edges(&steps),
        _ => return Err(JsError::new(&format!("unknown edge mode: {mode}"))),
    };
    to_json(&edges)
}

/// Ids of the laid-out nodes inside the padded viewport.
#[wasm_bindgen]
pub fn filter_nodes_by_viewport(
    nodes_json: &str,
    viewport_json: &str,
    container_json: &str,
) -> Result<String, JsError> {
    let nodes: Vec<FlowNode> = from_json(nodes_json, "nodes")?;
    let viewport: FlowViewport = from_json(viewport_json, "viewport")?;
    let container: ContainerSize = from_json(container_json, "container size")?;
    let rects = flow::node_rects(&nodes, &EngineConfig::default().layout);
    let visible: Vec<&str> =
        flow::filter_nodes_by_viewport(&rects, &viewport, &container, DEFAULT_VIEWPORT_PADDING)
            .into_iter()
            .map(|node| node.id.as_str())
            .collect();
    to_json(&visible)
}

/// Flow layouts memoized per trace. Each JS instance owns its own cache.
#[wasm_bindgen]
#[derive(Default)]
pub struct FlowLayoutCache {
    inner: LayoutCache,
    config: EngineConfig,
}

#[wasm_bindgen]
impl FlowLayoutCache {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Layout for `key`, reused while the steps and edges are unchanged.
    pub fn layout(
        &mut self,
        key: &str,
        steps_json: &str,
        edges_json: &str,
    ) -> Result<String, JsError> {
        let steps: Vec<StepSummary> = from_json(steps_json, "steps")?;
        let edges: Vec<FlowEdge> = from_json(edges_json, "edges")?;
        let nodes = self
            .inner
            .layout_or_compute(key, &steps, &edges, &self.config.layout);
        to_json(nodes)
    }

    pub fn remove(&mut self, key: &str) -> bool {
        self.inner.remove(key)
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }

    #[wasm_bindgen(getter)]
    pub fn size(&self) -> usize {
        self.inner.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok<T>(result: Result<T, JsError>) -> T {
        match result {
            Ok(value) => value,
            Err(_) => panic!("bridge call failed"),
        }
    }

    const STEPS: &str = r#"[
        {"id": "a", "startedAt": "2026-01-27T10:00:00.000Z", "endedAt": "2026-01-27T10:00:10.000Z"},
        {"id": "b", "startedAt": "2026-01-27T10:00:05.000Z", "endedAt": "2026-01-27T10:00:15.000Z"}
    ]"#;

    #[test]
    fn intervals_round_trip_through_json() {
        let json = ok(build_intervals("2026-01-27T10:00:00.000Z", None, STEPS));
        let layout: director_protocol::IntervalLayout =
            serde_json::from_str(&json).expect("layout json");
        assert_eq!(layout.lane_count, 2);
        assert_eq!(layout.wall_time_ms, 15_000.0);
    }

    #[test]
    fn boundaries_and_seek() {
        let boundaries = ok(collect_step_boundaries(
            "2026-01-27T10:00:00.000Z",
            None,
            STEPS,
        ));
        assert_eq!(boundaries, vec![0.0, 5_000.0, 10_000.0, 15_000.0]);
        assert_eq!(find_next_boundary(&boundaries, 5_000.0, true), Some(10_000.0));
        assert_eq!(find_next_boundary(&boundaries, 5_000.0, false), Some(0.0));
    }

    #[test]
    fn lane_order_normalizes() {
        let json = ok(normalize_lane_order(
            r#"["a","b"]"#,
            r#"["b","x"]"#,
            r#"["x"]"#,
        ));
        assert_eq!(json, r#"{"order":["b","a"],"hidden":[]}"#);
    }

    #[test]
    fn window_uses_default_config() {
        let json = ok(derive_window_range(60_000.0, 30_000.0, 10_000.0, None));
        assert_eq!(json, r#"{"startMs":25000.0,"endMs":35000.0}"#);
    }

    #[test]
    fn ghost_trace_follows_primary_playhead_and_window() {
        assert_eq!(map_playhead(500.0, 1_000.0, 4_000.0), 2_000.0);
        let json = ok(rescale_window(
            r#"{"startMs":2000.0,"endMs":7000.0}"#,
            10_000.0,
            20_000.0,
            None,
        ));
        assert_eq!(json, r#"{"startMs":2000.0,"endMs":16000.0}"#);
    }

    #[test]
    fn layout_cache_is_per_instance() {
        let steps = r#"[
            {"id": "s1", "index": 0, "type": "llm_call", "name": "plan",
             "startedAt": "2026-01-27T10:00:00Z", "status": "completed"},
            {"id": "s2", "index": 1, "type": "tool_call", "name": "search",
             "startedAt": "2026-01-27T10:00:01Z", "status": "completed", "parentStepId": "s1"}
        ]"#;
        let edges = ok(flow_edges(steps, "structure"));
        let mut cache = FlowLayoutCache::new();
        let first = ok(cache.layout("t1", steps, &edges));
        assert_eq!(ok(cache.layout("t1", steps, &edges)), first);
        assert_eq!(cache.size(), 1);
        assert_eq!(FlowLayoutCache::new().size(), 0);
        assert!(cache.remove("t1"));
    }
}
