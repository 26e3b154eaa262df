use director_protocol::{DensityBuckets, TimedStep};

use crate::error::TimingError;
use crate::timing::build_intervals;

/// Bucket step activity into `bucket_count` equal slices of the trace.
///
/// A bucket counts every interval touching it, so a long step raises all the
/// buckets it spans. Degenerate inputs produce all-zero buckets rather than
/// an error; only unparseable timestamps fail.
pub fn build_density<S: TimedStep>(
    trace_start: &str,
    trace_end: Option<&str>,
    steps: &[S],
    bucket_count: usize,
) -> Result<DensityBuckets, TimingError> {
    let layout = build_intervals(trace_start, trace_end, steps)?;
    let mut buckets = vec![0u32; bucket_count];

    let wall_time_ms = layout.wall_time_ms;
    if wall_time_ms <= 0.0 {
        return Ok(DensityBuckets {
            buckets,
            wall_time_ms: 0.0,
        });
    }

    let bucket_size = wall_time_ms / bucket_count as f64;
    if !bucket_size.is_finite() || bucket_size <= 0.0 {
        return Ok(DensityBuckets {
            buckets,
            wall_time_ms,
        });
    }

    let last = bucket_count - 1;
    for interval in &layout.intervals {
        // Float-to-int casts saturate, so far-out intervals land past `last`.
        let start_bucket = (interval.start_ms / bucket_size).floor().max(0.0) as usize;
        let end_bucket = ((interval.end_ms / bucket_size).floor() as usize).min(last);
        for bucket in buckets.iter_mut().take(end_bucket + 1).skip(start_bucket) {
            *bucket += 1;
        }
    }

    tracing::debug!(
        intervals = layout.intervals.len(),
        bucket_count,
        bucket_size,
        "built density buckets"
    );

    Ok(DensityBuckets {
        buckets,
        wall_time_ms,
    })
}
