use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default number of density buckets.
pub const DEFAULT_BUCKET_COUNT: usize = 60;

/// Tunables for every transform in this crate.
///
/// All fields default, so a TOML file only needs the keys it overrides:
///
/// ```toml
/// bucket_count = 64
///
/// [window]
/// min_span_ms = 2000.0
///
/// [layout]
/// grid_threshold = 1000
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub bucket_count: usize,
    pub window: WindowConfig,
    pub layout: LayoutConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bucket_count: DEFAULT_BUCKET_COUNT,
            window: WindowConfig::default(),
            layout: LayoutConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }
}

/// Windowed playback parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Narrowest window the playhead can be zoomed to.
    pub min_span_ms: f64,
    /// Overscan added on each side of the window, at least this many ms...
    pub overscan_min_ms: f64,
    /// ...or this fraction of the window span, whichever is larger.
    pub overscan_ratio: f64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            min_span_ms: 5_000.0,
            overscan_min_ms: 1_000.0,
            overscan_ratio: 0.15,
        }
    }
}

/// Flow graph layout parameters, in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub node_width: f64,
    pub node_height: f64,
    /// Vertical gap between nodes of the same rank.
    pub node_sep: f64,
    /// Horizontal gap between ranks.
    pub rank_sep: f64,
    /// Above this many steps, nodes are placed on a plain grid.
    pub grid_threshold: usize,
    pub grid_col_width: f64,
    pub grid_row_height: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 220.0,
            node_height: 120.0,
            node_sep: 48.0,
            rank_sep: 80.0,
            grid_threshold: 2_500,
            grid_col_width: 260.0,
            grid_row_height: 160.0,
        }
    }
}
