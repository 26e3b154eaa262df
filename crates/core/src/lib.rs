//! Timeline transforms for the director trace console.
//!
//! Every function here is pure: it takes steps (anything implementing
//! [`TimedStep`](director_protocol::TimedStep)) and trace bounds, and returns
//! fresh render-ready data. Callers own any caching; the one cache provided,
//! [`flow::LayoutCache`], is an explicit value rather than global state.
//!
//! ```text
//!   steps ─┬─▶ timing::build_intervals ─┬─▶ density::build_density
//!          │                             ├─▶ playback (playhead, boundaries)
//!          │                             └─▶ windowing (visible ranges)
//!          ├─▶ studio (lane groups, saved order/visibility)
//!          └─▶ flow (edges, layout, cache, viewport culling)
//! ```

pub mod config;
pub mod density;
pub mod error;
pub mod flow;
pub mod playback;
pub mod studio;
pub mod timing;
pub mod windowing;

pub use config::{DEFAULT_BUCKET_COUNT, EngineConfig, LayoutConfig, WindowConfig};
pub use density::build_density;
pub use error::{ConfigError, TimestampField, TimingError};
pub use playback::{
    SeekDirection, collect_step_boundaries, derive_playback_state, find_next_boundary,
    map_playhead,
};
pub use studio::{
    StudioConfigExt, derive_lane_groups, lane_group_key_for_step, normalize_lane_order,
    visible_lane_groups,
};
pub use timing::{LanePacker, build_intervals, parse_timestamp_ms};
pub use windowing::{
    derive_window_range, filter_visible, rescale_window, visible_intervals, with_overscan,
};
