use serde::{Deserialize, Serialize};

/// One step placed on the timeline.
///
/// Offsets are milliseconds from trace start. `x_pct` / `w_pct` position the
/// bar as a percentage of the trace's wall time; `w_pct` never drops below
/// [`MIN_WIDTH_PCT`] so instantaneous steps stay visible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepInterval {
    pub step_id: String,
    pub start_ms: f64,
    pub end_ms: f64,
    pub lane: usize,
    pub x_pct: f64,
    pub w_pct: f64,
}

/// Minimum visual width of an interval, in percent of wall time.
pub const MIN_WIDTH_PCT: f64 = 0.75;

impl StepInterval {
    pub fn duration_ms(&self) -> f64 {
        self.end_ms - self.start_ms
    }
}

/// Laned intervals for a whole trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntervalLayout {
    /// Trace wall time in ms, at least 1.
    pub wall_time_ms: f64,
    /// Intervals sorted by `(start_ms, end_ms)`.
    pub intervals: Vec<StepInterval>,
    pub lane_count: usize,
}

impl IntervalLayout {
    pub fn interval(&self, step_id: &str) -> Option<&StepInterval> {
        self.intervals.iter().find(|i| i.step_id == step_id)
    }

    /// Intervals assigned to `lane`, in start order.
    pub fn lane(&self, lane: usize) -> impl Iterator<Item = &StepInterval> {
        self.intervals.iter().filter(move |i| i.lane == lane)
    }
}

/// Activity histogram: how many intervals touch each equal-width time slice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DensityBuckets {
    pub buckets: Vec<u32>,
    /// Wall time the buckets divide, or 0 for a degenerate trace.
    pub wall_time_ms: f64,
}

impl DensityBuckets {
    /// Tallest bucket, floored at 1 so it can be used as a divisor.
    pub fn peak(&self) -> u32 {
        self.buckets.iter().copied().max().unwrap_or(0).max(1)
    }

    /// Bucket heights as a percentage of the tallest bucket.
    pub fn heights_pct(&self) -> Vec<f64> {
        let peak = f64::from(self.peak());
        self.buckets
            .iter()
            .map(|&count| f64::from(count) / peak * 100.0)
            .collect()
    }

    pub fn total(&self) -> u64 {
        self.buckets.iter().map(|&count| u64::from(count)).sum()
    }
}

/// Where an interval sits relative to the playhead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    Future,
    Active,
    Past,
}

impl PlaybackState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Future => "future",
            Self::Active => "active",
            Self::Past => "past",
        }
    }
}

/// Visible time range, in ms from trace start. Both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowRange {
    pub start_ms: f64,
    pub end_ms: f64,
}

impl WindowRange {
    pub fn new(start_ms: f64, end_ms: f64) -> Self {
        Self { start_ms, end_ms }
    }

    pub fn span_ms(&self) -> f64 {
        self.end_ms - self.start_ms
    }
}
