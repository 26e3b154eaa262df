//! Flow-graph view: edges between steps, node layout, layout memoization and
//! viewport culling.

pub mod cache;
pub mod layout;
pub mod viewport;

pub use cache::{LayoutCache, LayoutSignature};
pub use layout::{build_flow_layout, node_rects};
pub use viewport::{DEFAULT_VIEWPORT_PADDING, filter_nodes_by_viewport, flow_viewport_rect};

use director_protocol::{FlowEdge, StepSummary};

/// Parent → child edges for every step with a parent.
pub fn structure_edges(steps: &[StepSummary]) -> Vec<FlowEdge> {
    steps
        .iter()
        .filter_map(|step| {
            step.parent_step_id
                .as_ref()
                .map(|parent| FlowEdge::new(parent.clone(), step.id.clone()))
        })
        .collect()
}

/// Edges linking consecutive steps in recording order.
pub fn sequence_edges(steps: &[StepSummary]) -> Vec<FlowEdge> {
    let mut sorted: Vec<&StepSummary> = steps.iter().collect();
    sorted.sort_by_key(|step| step.index);
    sorted
        .windows(2)
        .map(|pair| FlowEdge::new(pair[0].id.clone(), pair[1].id.clone()))
        .collect()
}

#[cfg(test)]
pub(crate) mod test_support {
    use director_protocol::{StepStatus, StepSummary, StepType};

    pub fn step(id: &str, index: u32, parent: Option<&str>) -> StepSummary {
        StepSummary {
            id: id.into(),
            index,
            step_type: StepType::LlmCall,
            name: id.into(),
            started_at: "2026-01-27T10:00:00Z".into(),
            ended_at: None,
            duration_ms: None,
            status: StepStatus::Completed,
            error: None,
            parent_step_id: parent.map(Into::into),
            child_step_ids: vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::step;
    use super::*;

    #[test]
    fn structure_edges_follow_parents() {
        let steps = vec![step("a", 0, None), step("b", 1, Some("a")), step("c", 2, Some("a"))];
        assert_eq!(
            structure_edges(&steps),
            vec![FlowEdge::new("a", "b"), FlowEdge::new("a", "c")]
        );
    }

    #[test]
    fn sequence_edges_follow_index_not_input_order() {
        let steps = vec![step("c", 2, None), step("a", 0, None), step("b", 1, None)];
        assert_eq!(
            sequence_edges(&steps),
            vec![FlowEdge::new("a", "b"), FlowEdge::new("b", "c")]
        );
        assert!(sequence_edges(&steps[..1]).is_empty());
    }
}
