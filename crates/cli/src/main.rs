//! `director-timeline`: run the timeline engine over a recorded trace.

mod render;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use director_core::flow::{
    DEFAULT_VIEWPORT_PADDING, LayoutCache, filter_nodes_by_viewport, node_rects, sequence_edges,
    structure_edges,
};
use director_core::{
    EngineConfig, SeekDirection, StudioConfigExt, build_density, build_intervals,
    collect_step_boundaries, derive_lane_groups, derive_playback_state, derive_window_range,
    find_next_boundary, lane_group_key_for_step, visible_intervals,
};
use director_protocol::{
    ContainerSize, FlowNode, FlowViewport, LaneStrategy, TimelineStudioConfig, TraceSummary,
};
use serde_json::json;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(name = "director-timeline")]
#[command(about = "Inspect the timeline of a recorded agent trace", long_about = None)]
struct Cli {
    /// Engine settings (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output as JSON (machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Log engine events to stderr (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct TraceArg {
    /// Trace summary JSON file
    trace: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
enum EdgeMode {
    /// Parent to child
    Structure,
    /// Recording order
    Sequence,
}

#[derive(Subcommand)]
enum Commands {
    /// Lay steps out into non-overlapping lanes
    Intervals {
        #[command(flatten)]
        input: TraceArg,
    },

    /// Histogram of step activity across the trace
    Density {
        #[command(flatten)]
        input: TraceArg,

        /// Number of buckets (overrides the config file)
        #[arg(long)]
        bucket_count: Option<usize>,
    },

    /// Lane groups for a grouping strategy
    Lanes {
        #[command(flatten)]
        input: TraceArg,

        /// type, status or parent
        #[arg(long, default_value = "type")]
        strategy: LaneStrategy,

        /// Saved studio config (JSON) to reconcile against the trace
        #[arg(long)]
        studio: Option<PathBuf>,
    },

    /// Step boundaries, optionally seeking from a playhead
    Boundaries {
        #[command(flatten)]
        input: TraceArg,

        /// Playhead to seek from (ms)
        #[arg(long)]
        from: Option<f64>,

        /// Seek backward instead of forward
        #[arg(long, requires = "from")]
        backward: bool,
    },

    /// Steps visible in a window around the playhead
    Window {
        #[command(flatten)]
        input: TraceArg,

        /// Playhead (ms from trace start)
        #[arg(long)]
        playhead: f64,

        /// Window span (ms)
        #[arg(long, default_value_t = 10_000.0)]
        span: f64,

        /// Step kept visible even outside the window
        #[arg(long)]
        selected: Option<String>,
    },

    /// Flow-graph node positions
    Flow {
        #[command(flatten)]
        input: TraceArg,

        #[arg(long, value_enum, default_value = "structure")]
        edges: EdgeMode,

        /// Only nodes inside a viewport of this size (WIDTHxHEIGHT)
        #[arg(long, value_parser = parse_size)]
        viewport: Option<ContainerSize>,
    },
}

fn parse_size(value: &str) -> Result<ContainerSize, String> {
    let (width, height) = value
        .split_once('x')
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {value:?}"))?;
    let parse = |part: &str| {
        part.trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid dimension {part:?}: {e}"))
    };
    Ok(ContainerSize {
        width: parse(width)?,
        height: parse(height)?,
    })
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn load_trace(path: &Path) -> Result<TraceSummary> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing trace {}", path.display()))
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    EngineConfig::from_toml_str(&text)
        .with_context(|| format!("parsing config {}", path.display()))
}

fn load_studio(path: Option<&Path>) -> Result<TimelineStudioConfig> {
    let Some(path) = path else {
        return Ok(TimelineStudioConfig::default());
    };
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("parsing studio config {}", path.display()))
}

fn write_json(out: &mut impl Write, value: &impl serde::Serialize) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(cli.config.as_deref())?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Intervals { input } => {
            let trace = load_trace(&input.trace)?;
            let layout =
                build_intervals(&trace.started_at, trace.ended_at.as_deref(), &trace.steps)?;
            if cli.json {
                write_json(&mut out, &layout)?;
            } else {
                render::intervals(&mut out, &layout)?;
            }
        }
        Commands::Density {
            input,
            bucket_count,
        } => {
            let trace = load_trace(&input.trace)?;
            let density = build_density(
                &trace.started_at,
                trace.ended_at.as_deref(),
                &trace.steps,
                bucket_count.unwrap_or(config.bucket_count),
            )?;
            if cli.json {
                write_json(&mut out, &density)?;
            } else {
                render::density(&mut out, &density)?;
            }
        }
        Commands::Lanes {
            input,
            strategy,
            studio,
        } => {
            let trace = load_trace(&input.trace)?;
            let known = derive_lane_groups(&trace.steps, strategy);
            let saved = load_studio(studio.as_deref())?;
            let lanes = saved.normalized(strategy, &known);
            if saved.reconcile(strategy, &known).is_some() {
                tracing::debug!(strategy = strategy.as_str(), "saved lane config was stale");
            }
            let counts: Vec<(String, usize)> = known
                .iter()
                .map(|group| {
                    let count = trace
                        .steps
                        .iter()
                        .filter(|step| lane_group_key_for_step(step, strategy) == group.as_str())
                        .count();
                    (group.clone(), count)
                })
                .collect();
            if cli.json {
                write_json(
                    &mut out,
                    &json!({
                        "strategy": strategy,
                        "groups": known,
                        "order": lanes.order,
                        "hidden": lanes.hidden,
                    }),
                )?;
            } else {
                render::lane_groups(&mut out, &lanes.order, &lanes.hidden, &counts)?;
            }
        }
        Commands::Boundaries {
            input,
            from,
            backward,
        } => {
            let trace = load_trace(&input.trace)?;
            let boundaries = collect_step_boundaries(
                &trace.started_at,
                trace.ended_at.as_deref(),
                &trace.steps,
            )?;
            let direction = if backward {
                SeekDirection::Backward
            } else {
                SeekDirection::Forward
            };
            let seek = from.and_then(|current| find_next_boundary(&boundaries, current, direction));
            if cli.json {
                write_json(&mut out, &json!({ "boundaries": boundaries, "seek": seek }))?;
            } else {
                render::boundaries(&mut out, &boundaries, seek)?;
            }
        }
        Commands::Window {
            input,
            playhead,
            span,
            selected,
        } => {
            let trace = load_trace(&input.trace)?;
            let layout =
                build_intervals(&trace.started_at, trace.ended_at.as_deref(), &trace.steps)?;
            let range = derive_window_range(layout.wall_time_ms, playhead, span, &config.window);
            let visible: Vec<_> = visible_intervals(
                &layout.intervals,
                Some(&range),
                selected.as_deref(),
                &config.window,
            )
            .into_iter()
            .map(|interval| (interval, derive_playback_state(interval, playhead)))
            .collect();
            if cli.json {
                let steps: Vec<_> = visible
                    .iter()
                    .map(|(interval, state)| json!({ "interval": interval, "state": state }))
                    .collect();
                write_json(&mut out, &json!({ "window": range, "visible": steps }))?;
            } else {
                render::window(&mut out, &range, &visible)?;
            }
        }
        Commands::Flow {
            input,
            edges,
            viewport,
        } => {
            let trace = load_trace(&input.trace)?;
            let edges = match edges {
                EdgeMode::Structure => structure_edges(&trace.steps),
                EdgeMode::Sequence => sequence_edges(&trace.steps),
            };
            let mut cache = LayoutCache::new();
            let nodes = cache.layout_or_compute(&trace.id, &trace.steps, &edges, &config.layout);
            let shown: Vec<&FlowNode> = match viewport {
                Some(container) => {
                    let rects = node_rects(nodes, &config.layout);
                    let inside: Vec<&str> = filter_nodes_by_viewport(
                        &rects,
                        &FlowViewport::default(),
                        &container,
                        DEFAULT_VIEWPORT_PADDING,
                    )
                    .into_iter()
                    .map(|rect| rect.id.as_str())
                    .collect();
                    nodes
                        .iter()
                        .filter(|node| inside.contains(&node.id.as_str()))
                        .collect()
                }
                None => nodes.iter().collect(),
            };
            if cli.json {
                write_json(&mut out, &json!({ "edges": edges, "nodes": shown }))?;
            } else {
                render::flow_nodes(&mut out, &shown)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_viewport_size() {
        let size = parse_size("1280x720").expect("valid size");
        assert_eq!(size.width, 1_280.0);
        assert_eq!(size.height, 720.0);
        assert!(parse_size("1280").is_err());
        assert!(parse_size("wide x 720").is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_subcommand_flags() {
        let cli = Cli::try_parse_from([
            "director-timeline",
            "-vv",
            "lanes",
            "trace.json",
            "--strategy",
            "status",
        ])
        .expect("valid args");
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Lanes { strategy, .. } => assert_eq!(strategy, LaneStrategy::Status),
            _ => panic!("expected lanes"),
        }
    }
}
