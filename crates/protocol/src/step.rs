use serde::{Deserialize, Serialize};

/// What kind of work a step recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepType {
    LlmCall,
    ToolCall,
    Decision,
    Handoff,
    Guardrail,
}

impl StepType {
    /// Wire name, also used as the lane-group key.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LlmCall => "llm_call",
            Self::ToolCall => "tool_call",
            Self::Decision => "decision",
            Self::Handoff => "handoff",
            Self::Guardrail => "guardrail",
        }
    }
}

impl std::fmt::Display for StepType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl StepStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for StepStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anything with an id and ISO-8601 start/end timestamps.
///
/// Timeline transforms only need these three fields, so richer step types
/// implement this instead of converting into a common struct. A `None` end
/// means the step is still running.
pub trait TimedStep {
    fn id(&self) -> &str;
    fn started_at(&self) -> &str;
    fn ended_at(&self) -> Option<&str>;
}

/// The minimal timed record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepRecord {
    pub id: String,
    pub started_at: String,
    #[serde(default)]
    pub ended_at: Option<String>,
}

impl StepRecord {
    pub fn new(
        id: impl Into<String>,
        started_at: impl Into<String>,
        ended_at: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            started_at: started_at.into(),
            ended_at: Some(ended_at.into()),
        }
    }

    /// A step that has not finished yet.
    pub fn running(id: impl Into<String>, started_at: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            started_at: started_at.into(),
            ended_at: None,
        }
    }
}

impl TimedStep for StepRecord {
    fn id(&self) -> &str {
        &self.id
    }

    fn started_at(&self) -> &str {
        &self.started_at
    }

    fn ended_at(&self) -> Option<&str> {
        self.ended_at.as_deref()
    }
}

/// A step as listed in a trace summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepSummary {
    pub id: String,
    /// Position of the step in recording order.
    pub index: u32,
    #[serde(rename = "type")]
    pub step_type: StepType,
    pub name: String,
    pub started_at: String,
    #[serde(default)]
    pub ended_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<f64>,
    pub status: StepStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_step_id: Option<String>,
    #[serde(default)]
    pub child_step_ids: Vec<String>,
}

impl TimedStep for StepSummary {
    fn id(&self) -> &str {
        &self.id
    }

    fn started_at(&self) -> &str {
        &self.started_at
    }

    fn ended_at(&self) -> Option<&str> {
        self.ended_at.as_deref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceStatus {
    Running,
    Completed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceMetadata {
    /// Where the trace was imported from (e.g. "openai_agents", "manual").
    pub source: String,
    pub agent_name: String,
    pub model_id: String,
    /// Wall time reported by the recorder, in milliseconds.
    pub wall_time_ms: f64,
}

/// A recorded agent run with its steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceSummary {
    pub id: String,
    pub name: String,
    pub started_at: String,
    #[serde(default)]
    pub ended_at: Option<String>,
    pub status: TraceStatus,
    pub metadata: TraceMetadata,
    pub steps: Vec<StepSummary>,
}

impl TraceSummary {
    /// Recorded wall time, or 1 ms when the recorder reported nothing usable.
    pub fn reported_wall_time_ms(&self) -> f64 {
        if self.metadata.wall_time_ms > 0.0 {
            self.metadata.wall_time_ms
        } else {
            1.0
        }
    }
}
