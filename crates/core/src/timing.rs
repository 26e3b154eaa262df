//! Trace-relative step intervals and lane packing.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use director_protocol::{IntervalLayout, MIN_WIDTH_PCT, StepInterval, TimedStep};

use crate::error::{TimestampField, TimingError};

/// Parse an ISO-8601 timestamp into Unix milliseconds.
///
/// Accepts RFC 3339 (`2026-01-27T10:00:00.000Z`, `...+02:00`), compact
/// offsets (`+0200`), minute precision (`2026-01-27T10:00Z`) and bare dates.
/// A timestamp without an offset is read as UTC, a bare date as UTC midnight.
pub fn parse_timestamp_ms(value: &str) -> Option<f64> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.timestamp_millis() as f64);
    }
    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(value, format) {
            return Some(dt.timestamp_millis() as f64);
        }
    }

    let naive = value.strip_suffix(['Z', 'z']).unwrap_or(value);
    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(naive, format) {
            return Some(dt.and_utc().timestamp_millis() as f64);
        }
    }
    NaiveDate::parse_from_str(naive, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc().timestamp_millis() as f64)
}

const OFFSET_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%dT%H:%M%:z",
];

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

fn parse_field(
    value: &str,
    field: impl FnOnce() -> TimestampField,
) -> Result<f64, TimingError> {
    parse_timestamp_ms(value).ok_or_else(|| TimingError::InvalidTimestamp {
        field: field(),
        value: value.to_string(),
    })
}

/// Absolute start/end of a step in Unix ms. Running steps end where they start.
fn step_bounds<S: TimedStep>(step: &S) -> Result<(f64, f64), TimingError> {
    let start = parse_field(step.started_at(), || TimestampField::StepStart {
        step_id: step.id().to_string(),
    })?;
    let end = match step.ended_at() {
        Some(ended_at) => parse_field(ended_at, || TimestampField::StepEnd {
            step_id: step.id().to_string(),
        })?,
        None => start,
    };
    Ok((start, end))
}

/// First-fit lane assignment.
///
/// Feed intervals in `(start, end)` order; each goes to the lowest-indexed
/// lane whose last interval ended at or before its start. Intervals sharing
/// a lane never overlap, though touching ends are allowed.
#[derive(Debug, Default)]
pub struct LanePacker {
    lane_ends: Vec<f64>,
}

impl LanePacker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place an interval and return its lane.
    pub fn place(&mut self, start: f64, end: f64) -> usize {
        for (lane, lane_end) in self.lane_ends.iter_mut().enumerate() {
            if *lane_end <= start {
                *lane_end = end;
                return lane;
            }
        }
        self.lane_ends.push(end);
        self.lane_ends.len() - 1
    }

    pub fn lane_count(&self) -> usize {
        self.lane_ends.len()
    }
}

/// Compute trace-relative, laned intervals for `steps`.
///
/// The trace ends at `trace_end` when given (blank counts as absent),
/// otherwise at the latest step end. Wall time is floored at 1 ms so the
/// percentage math never divides by zero. Steps that start before the trace
/// are clamped to 0, and no interval ends before it starts.
///
/// Intervals come back sorted by `(start_ms, end_ms)`, which is also the
/// packing order: among steps starting together, the one ending first gets
/// the lower lane.
pub fn build_intervals<S: TimedStep>(
    trace_start: &str,
    trace_end: Option<&str>,
    steps: &[S],
) -> Result<IntervalLayout, TimingError> {
    let trace_start_ms = parse_field(trace_start, || TimestampField::TraceStart)?;

    let bounds = steps
        .iter()
        .map(step_bounds)
        .collect::<Result<Vec<_>, _>>()?;

    let trace_end_ms = match trace_end.filter(|end| !end.trim().is_empty()) {
        Some(end) => parse_field(end, || TimestampField::TraceEnd)?,
        None => bounds
            .iter()
            .map(|&(_, end)| end)
            .reduce(f64::max)
            .unwrap_or(trace_start_ms),
    };
    let wall_time_ms = (trace_end_ms - trace_start_ms).max(1.0);

    let mut raw: Vec<(&str, f64, f64)> = steps
        .iter()
        .zip(&bounds)
        .map(|(step, &(start, end))| {
            let start_ms = (start - trace_start_ms).max(0.0);
            let end_ms = (end - trace_start_ms).max(start_ms);
            (step.id(), start_ms, end_ms)
        })
        .collect();
    raw.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.2.total_cmp(&b.2)));

    let mut packer = LanePacker::new();
    let intervals: Vec<StepInterval> = raw
        .into_iter()
        .map(|(step_id, start_ms, end_ms)| StepInterval {
            step_id: step_id.to_string(),
            start_ms,
            end_ms,
            lane: packer.place(start_ms, end_ms),
            x_pct: start_ms / wall_time_ms * 100.0,
            w_pct: ((end_ms - start_ms) / wall_time_ms * 100.0).max(MIN_WIDTH_PCT),
        })
        .collect();

    tracing::debug!(
        steps = steps.len(),
        lanes = packer.lane_count(),
        wall_time_ms,
        "built timeline intervals"
    );

    Ok(IntervalLayout {
        wall_time_ms,
        intervals,
        lane_count: packer.lane_count(),
    })
}
