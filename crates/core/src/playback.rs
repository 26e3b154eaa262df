//! Playhead classification and step-boundary navigation.

use director_protocol::{PlaybackState, StepInterval, TimedStep};

use crate::error::TimingError;
use crate::timing::build_intervals;

/// Classify an interval against the playhead. Both ends count as active.
pub fn derive_playback_state(interval: &StepInterval, playhead_ms: f64) -> PlaybackState {
    if playhead_ms < interval.start_ms {
        PlaybackState::Future
    } else if playhead_ms > interval.end_ms {
        PlaybackState::Past
    } else {
        PlaybackState::Active
    }
}

/// Map a playhead onto another trace proportionally to wall time, as used
/// when a comparison trace is drawn under the primary one.
pub fn map_playhead(playhead_ms: f64, from_wall_time_ms: f64, to_wall_time_ms: f64) -> f64 {
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
    playhead_ms / from * to
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekDirection {
    Forward,
    Backward,
}

/// Every distinct interval start and end, ascending.
pub fn collect_step_boundaries<S: TimedStep>(
    trace_start: &str,
    trace_end: Option<&str>,
    steps: &[S],
) -> Result<Vec<f64>, TimingError> {
    let layout = build_intervals(trace_start, trace_end, steps)?;
    let mut boundaries: Vec<f64> = layout
        .intervals
        .iter()
        .flat_map(|interval| [interval.start_ms, interval.end_ms])
        .collect();
    boundaries.sort_by(f64::total_cmp);
    boundaries.dedup();
    Ok(boundaries)
}

/// The boundary to jump to from `current_ms`.
///
/// Boundaries within 1 ms of the playhead are skipped so repeated seeks make
/// progress. Past the last (or before the first) boundary the seek sticks to
/// that end. Returns `None` only when there are no boundaries.
pub fn find_next_boundary(
    boundaries: &[f64],
    current_ms: f64,
    direction: SeekDirection,
) -> Option<f64> {
    match direction {
        SeekDirection::Forward => boundaries
            .iter()
            .copied()
            .find(|&b| b > current_ms + 1.0)
            .or_else(|| boundaries.last().copied()),
        SeekDirection::Backward => boundaries
            .iter()
            .rev()
            .copied()
            .find(|&b| b < current_ms - 1.0)
            .or_else(|| boundaries.first().copied()),
    }
}
