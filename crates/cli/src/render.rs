//! Plain-text renderings of engine output.

use std::io::{self, Write};

use director_protocol::{
    DensityBuckets, FlowNode, IntervalLayout, PlaybackState, StepInterval, WindowRange,
};

const BAR_WIDTH: usize = 50;
const HISTOGRAM_WIDTH: usize = 40;

/// Columns `[from, to)` of a `width`-wide bar covering `x_pct..x_pct + w_pct`.
fn bar_span(x_pct: f64, w_pct: f64, width: usize) -> (usize, usize) {
    let scale = width as f64 / 100.0;
    let from = ((x_pct * scale).floor() as usize).min(width.saturating_sub(1));
    let to = (((x_pct + w_pct) * scale).ceil() as usize).clamp(from + 1, width);
    (from, to)
}

fn bar(interval: &StepInterval) -> String {
    let (from, to) = bar_span(interval.x_pct, interval.w_pct, BAR_WIDTH);
    let mut line = String::with_capacity(BAR_WIDTH);
    for column in 0..BAR_WIDTH {
        line.push(if (from..to).contains(&column) { '█' } else { '·' });
    }
    line
}

pub fn intervals(out: &mut impl Write, layout: &IntervalLayout) -> io::Result<()> {
    writeln!(
        out,
        "{} steps in {} lanes over {:.0} ms",
        layout.intervals.len(),
        layout.lane_count,
        layout.wall_time_ms
    )?;
    for lane in 0..layout.lane_count {
        writeln!(out, "lane {lane}")?;
        for interval in layout.lane(lane) {
            writeln!(
                out,
                "  {} {:>9.0} {:>9.0}  {}",
                bar(interval),
                interval.start_ms,
                interval.end_ms,
                interval.step_id
            )?;
        }
    }
    Ok(())
}

pub fn density(out: &mut impl Write, density: &DensityBuckets) -> io::Result<()> {
    let count = density.buckets.len();
    if count == 0 {
        return writeln!(out, "no buckets");
    }
    let bucket_ms = density.wall_time_ms / count as f64;
    for (index, (value, height)) in density
        .buckets
        .iter()
        .zip(density.heights_pct())
        .enumerate()
    {
        let filled = (height / 100.0 * HISTOGRAM_WIDTH as f64).round() as usize;
        writeln!(
            out,
            "{:>9.0} ms | {:<width$} {value}",
            index as f64 * bucket_ms,
            "█".repeat(filled),
            width = HISTOGRAM_WIDTH
        )?;
    }
    writeln!(out, "peak {} of {} steps-in-buckets", density.peak(), density.total())
}

/// One line per lane group, hidden groups marked.
pub fn lane_groups(
    out: &mut impl Write,
    order: &[String],
    hidden: &[String],
    counts: &[(String, usize)],
) -> io::Result<()> {
    for group in order {
        let count = counts
            .iter()
            .find(|(key, _)| key == group)
            .map_or(0, |&(_, count)| count);
        let marker = if hidden.contains(group) { "hidden" } else { "" };
        writeln!(out, "{group:<24} {count:>5}  {marker}")?;
    }
    Ok(())
}

pub fn boundaries(out: &mut impl Write, boundaries: &[f64], seek: Option<f64>) -> io::Result<()> {
    for boundary in boundaries {
        let marker = if seek == Some(*boundary) { "  <- seek" } else { "" };
        writeln!(out, "{boundary:>10.0} ms{marker}")?;
    }
    Ok(())
}

pub fn window(
    out: &mut impl Write,
    range: &WindowRange,
    visible: &[(&StepInterval, PlaybackState)],
) -> io::Result<()> {
    writeln!(
        out,
        "window {:.0}..{:.0} ms ({} visible)",
        range.start_ms,
        range.end_ms,
        visible.len()
    )?;
    for (interval, state) in visible {
        writeln!(
            out,
            "  {:<7} {:>9.0} {:>9.0}  {}",
            state.as_str(),
            interval.start_ms,
            interval.end_ms,
            interval.step_id
        )?;
    }
    Ok(())
}

pub fn flow_nodes(out: &mut impl Write, nodes: &[&FlowNode]) -> io::Result<()> {
    for node in nodes {
        writeln!(
            out,
            "{:<24} {:>8.0} {:>8.0}",
            node.id, node.position.x, node.position.y
        )?;
    }
    Ok(())
}
