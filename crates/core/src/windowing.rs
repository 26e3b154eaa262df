//! Windowed playback: which intervals fall inside the visible time range.

use director_protocol::{StepInterval, WindowRange};

use crate::config::WindowConfig;

/// Inclusive intersection test between an interval and a window.
pub fn is_visible(interval: &StepInterval, window: &WindowRange) -> bool {
    interval.end_ms >= window.start_ms && interval.start_ms <= window.end_ms
}

/// Intervals intersecting `window`, in their original order.
pub fn filter_visible<'a>(
    intervals: &'a [StepInterval],
    window: &WindowRange,
) -> Vec<&'a StepInterval> {
    intervals
        .iter()
        .filter(|interval| is_visible(interval, window))
        .collect()
}

/// Center a window of `span_ms` on the playhead, keeping it inside the trace.
///
/// The span is raised to `config.min_span_ms` and capped at the wall time.
/// Near either end of the trace the window slides instead of shrinking.
pub fn derive_window_range(
    wall_time_ms: f64,
    playhead_ms: f64,
    span_ms: f64,
    config: &WindowConfig,
) -> WindowRange {
    let wall_time_ms = if wall_time_ms > 0.0 { wall_time_ms } else { 1.0 };
    let span = span_ms.max(config.min_span_ms).min(wall_time_ms);
    let mut start_ms = (playhead_ms - span / 2.0).max(0.0);
    let end_ms = wall_time_ms.min(start_ms + span);
    if end_ms - start_ms < span {
        start_ms = (end_ms - span).max(0.0);
    }
    WindowRange::new(start_ms, end_ms)
}

/// Extra margin kept around a window so bars slide in before they are needed.
pub fn overscan_ms(window: &WindowRange, config: &WindowConfig) -> f64 {
    config
        .overscan_min_ms
        .max(window.span_ms() * config.overscan_ratio)
}

/// The window widened by its overscan on both sides, never before 0.
pub fn with_overscan(window: &WindowRange, config: &WindowConfig) -> WindowRange {
    let overscan = overscan_ms(window, config);
    WindowRange::new(
        (window.start_ms - overscan).max(0.0),
        window.end_ms + overscan,
    )
}

/// Project an overscanned window from one trace onto another with a
/// different wall time, clamped to `[0, to_wall_time_ms]`.
pub fn rescale_window(
    window: &WindowRange,
    from_wall_time_ms: f64,
    to_wall_time_ms: f64,
    config: &WindowConfig,
) -> WindowRange {
    let from = if from_wall_time_ms > 0.0 {
        from_wall_time_ms
    } else {
        1.0
    };
    let to = if to_wall_time_ms > 0.0 {
        to_wall_time_ms
    } else {
        1.0
    };
    let ratio = to / from;
    let overscan = overscan_ms(window, config);
    WindowRange::new(
        ((window.start_ms - overscan) * ratio).max(0.0),
        ((window.end_ms + overscan) * ratio).min(to),
    )
}

/// Intervals to draw for the current window.
///
/// Without a window everything is visible. With one, the overscanned window
/// is used, and the selected step is appended when it fell outside so the
/// selection never disappears.
pub fn visible_intervals<'a>(
    intervals: &'a [StepInterval],
    window: Option<&WindowRange>,
    selected_step_id: Option<&str>,
    config: &WindowConfig,
) -> Vec<&'a StepInterval> {
    let Some(window) = window else {
        return intervals.iter().collect();
    };
    let range = with_overscan(window, config);
    let mut visible = filter_visible(intervals, &range);
    if let Some(selected) = selected_step_id
        && !visible.iter().any(|interval| interval.step_id == selected)
        && let Some(interval) = intervals.iter().find(|i| i.step_id == selected)
    {
        visible.push(interval);
    }
    visible
}
