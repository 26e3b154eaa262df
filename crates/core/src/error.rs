use thiserror::Error;

/// Which timestamp failed to parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimestampField {
    TraceStart,
    TraceEnd,
    StepStart { step_id: String },
    StepEnd { step_id: String },
}

impl std::fmt::Display for TimestampField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TraceStart => write!(f, "trace start"),
            Self::TraceEnd => write!(f, "trace end"),
            Self::StepStart { step_id } => write!(f, "start of step {step_id}"),
            Self::StepEnd { step_id } => write!(f, "end of step {step_id}"),
        }
    }
}

#[derive(Debug, Error)]
pub enum TimingError {
    #[error("invalid timestamp for {field}: {value:?}")]
    InvalidTimestamp { field: TimestampField, value: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("toml: {0}")]
    Toml(#[from] toml::de::Error),
}
