use serde::{Deserialize, Serialize};

/// How the timeline studio partitions steps into lane groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LaneStrategy {
    Type,
    Status,
    Parent,
}

impl LaneStrategy {
    pub const ALL: [LaneStrategy; 3] = [Self::Type, Self::Status, Self::Parent];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Type => "type",
            Self::Status => "status",
            Self::Parent => "parent",
        }
    }
}

impl std::str::FromStr for LaneStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "type" => Ok(Self::Type),
            "status" => Ok(Self::Status),
            "parent" => Ok(Self::Parent),
            other => Err(format!("unknown lane strategy: {other}")),
        }
    }
}

/// User-chosen lane group order and hidden groups for one strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaneConfig {
    #[serde(default)]
    pub order: Vec<String>,
    #[serde(default)]
    pub hidden: Vec<String>,
}

/// Lane configuration for every strategy, as persisted by the UI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineStudioConfig {
    #[serde(default)]
    pub r#type: LaneConfig,
    #[serde(default)]
    pub status: LaneConfig,
    #[serde(default)]
    pub parent: LaneConfig,
}

impl TimelineStudioConfig {
    pub fn for_strategy(&self, strategy: LaneStrategy) -> &LaneConfig {
        match strategy {
            LaneStrategy::Type => &self.r#type,
            LaneStrategy::Status => &self.status,
            LaneStrategy::Parent => &self.parent,
        }
    }

    pub fn for_strategy_mut(&mut self, strategy: LaneStrategy) -> &mut LaneConfig {
        match strategy {
            LaneStrategy::Type => &mut self.r#type,
            LaneStrategy::Status => &mut self.status,
            LaneStrategy::Parent => &mut self.parent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn studio_config_keys_match_strategy_names() {
        let mut config = TimelineStudioConfig::default();
        config.for_strategy_mut(LaneStrategy::Type).hidden = vec!["tool_call".into()];
        let json = serde_json::to_value(&config).expect("serializes");
        assert_eq!(json["type"]["hidden"][0], "tool_call");
        assert!(json["parent"]["order"].as_array().is_some_and(Vec::is_empty));

        let parsed: TimelineStudioConfig =
            serde_json::from_str(r#"{"status":{"order":["failed"]}}"#).expect("parses");
        assert_eq!(parsed.for_strategy(LaneStrategy::Status).order, vec!["failed"]);
        assert!(parsed.for_strategy(LaneStrategy::Type).order.is_empty());
    }

    #[test]
    fn parses_strategy_names() {
        for strategy in LaneStrategy::ALL {
            assert_eq!(strategy.as_str().parse::<LaneStrategy>(), Ok(strategy));
        }
        assert!("lane".parse::<LaneStrategy>().is_err());
    }
}
