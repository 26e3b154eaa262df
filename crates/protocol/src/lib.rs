pub mod flow;
pub mod step;
pub mod studio;
pub mod timeline;
pub mod types;

pub use flow::{ContainerSize, FlowEdge, FlowNode, FlowNodeRect, FlowViewport};
pub use step::{
    StepRecord, StepStatus, StepSummary, StepType, TimedStep, TraceMetadata, TraceStatus,
    TraceSummary,
};
pub use studio::{LaneConfig, LaneStrategy, TimelineStudioConfig};
pub use timeline::{
    DensityBuckets, IntervalLayout, MIN_WIDTH_PCT, PlaybackState, StepInterval, WindowRange,
};
pub use types::{Point, Rect};
