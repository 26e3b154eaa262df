use std::collections::{HashMap, VecDeque};

use director_protocol::{FlowEdge, FlowNode, FlowNodeRect, Point, Rect, StepSummary};

use crate::config::LayoutConfig;

/// Position every step on the flow canvas, in input order.
///
/// Small graphs get a left-to-right layered layout: a node's rank is the
/// longest edge path reaching it, and nodes of one rank stack top to bottom
/// in input order. Past `config.grid_threshold` steps a square grid is used
/// instead so huge traces stay linear to lay out.
pub fn build_flow_layout(
    steps: &[StepSummary],
    edges: &[FlowEdge],
    config: &LayoutConfig,
) -> Vec<FlowNode> {
    let nodes = if steps.len() > config.grid_threshold {
        grid_layout(steps, config)
    } else {
        layered_layout(steps, edges, config)
    };
    tracing::debug!(
        steps = steps.len(),
        edges = edges.len(),
        grid = steps.len() > config.grid_threshold,
        "built flow layout"
    );
    nodes
}

fn grid_layout(steps: &[StepSummary], config: &LayoutConfig) -> Vec<FlowNode> {
    let columns = ((steps.len() as f64).sqrt().ceil() as usize).max(1);
    steps
        .iter()
        .enumerate()
        .map(|(index, step)| {
            let row = index / columns;
            let col = index % columns;
            FlowNode {
                id: step.id.clone(),
                position: Point::new(
                    col as f64 * config.grid_col_width,
                    row as f64 * config.grid_row_height,
                ),
            }
        })
        .collect()
}

fn layered_layout(
    steps: &[StepSummary],
    edges: &[FlowEdge],
    config: &LayoutConfig,
) -> Vec<FlowNode> {
    let mut index_of: HashMap<&str, usize> = HashMap::with_capacity(steps.len());
    for (index, step) in steps.iter().enumerate() {
        index_of.entry(step.id.as_str()).or_insert(index);
    }

    let mut successors: Vec<Vec<usize>> = vec![Vec::new(); steps.len()];
    let mut indegree = vec![0usize; steps.len()];
    let mut dropped = 0usize;
    for edge in edges {
        match (
            index_of.get(edge.source.as_str()),
            index_of.get(edge.target.as_str()),
        ) {
            (Some(&source), Some(&target)) if source != target => {
                successors[source].push(target);
                indegree[target] += 1;
            }
            _ => dropped += 1,
        }
    }
    if dropped > 0 {
        tracing::debug!(dropped, "ignored flow edges with unknown or identical endpoints");
    }

    // Longest-path ranks via Kahn's algorithm. Nodes on a cycle never reach
    // indegree 0 and keep the rank their processed predecessors gave them.
    let mut rank = vec![0usize; steps.len()];
    let mut queue: VecDeque<usize> = (0..steps.len()).filter(|&i| indegree[i] == 0).collect();
    while let Some(node) = queue.pop_front() {
        for &next in &successors[node] {
            rank[next] = rank[next].max(rank[node] + 1);
            indegree[next] -= 1;
            if indegree[next] == 0 {
                queue.push_back(next);
            }
        }
    }

    let column_step = config.node_width + config.rank_sep;
    let row_step = config.node_height + config.node_sep;
    let mut slots: HashMap<usize, usize> = HashMap::new();
    steps
        .iter()
        .enumerate()
        .map(|(index, step)| {
            let slot = slots.entry(rank[index]).or_insert(0);
            let position = Point::new(rank[index] as f64 * column_step, *slot as f64 * row_step);
            *slot += 1;
            FlowNode {
                id: step.id.clone(),
                position,
            }
        })
        .collect()
}

/// Canvas footprint of each laid-out node.
pub fn node_rects(nodes: &[FlowNode], config: &LayoutConfig) -> Vec<FlowNodeRect> {
    nodes
        .iter()
        .map(|node| FlowNodeRect {
            id: node.id.clone(),
            rect: Rect::new(
                node.position.x,
                node.position.y,
                config.node_width,
                config.node_height,
            ),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::test_support::step;
    use crate::flow::{sequence_edges, structure_edges};

    fn position(nodes: &[FlowNode], id: &str) -> (f64, f64) {
        let node = nodes.iter().find(|n| n.id == id).expect("node present");
        (node.position.x, node.position.y)
    }

    #[test]
    fn ranks_follow_longest_path() {
        let config = LayoutConfig::default();
        let steps = vec![
            step("root", 0, None),
            step("left", 1, Some("root")),
            step("right", 2, Some("root")),
            step("join", 3, Some("left")),
        ];
        let mut edges = structure_edges(&steps);
        edges.push(FlowEdge::new("right", "join"));
        edges.push(FlowEdge::new("root", "join"));

        let nodes = build_flow_layout(&steps, &edges, &config);
        assert_eq!(nodes.len(), 4);
        assert_eq!(position(&nodes, "root"), (0.0, 0.0));
        assert_eq!(position(&nodes, "left"), (300.0, 0.0));
        assert_eq!(position(&nodes, "right"), (300.0, 168.0));
        assert_eq!(position(&nodes, "join"), (600.0, 0.0));
    }

    #[test]
    fn unknown_edges_and_cycles_do_not_break_layout() {
        let config = LayoutConfig::default();
        let steps = vec![step("a", 0, None), step("b", 1, None), step("c", 2, None)];
        let edges = vec![
            FlowEdge::new("a", "b"),
            FlowEdge::new("b", "c"),
            FlowEdge::new("c", "b"),
            FlowEdge::new("ghost", "a"),
            FlowEdge::new("a", "a"),
        ];
        let nodes = build_flow_layout(&steps, &edges, &config);
        let ids: Vec<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(position(&nodes, "a"), (0.0, 0.0));
        assert_eq!(position(&nodes, "b").0, 300.0);
    }

    #[test]
    fn large_traces_use_a_square_grid() {
        let config = LayoutConfig {
            grid_threshold: 3,
            ..LayoutConfig::default()
        };
        let steps: Vec<_> = (0..5).map(|i| step(&format!("s{i}"), i, None)).collect();
        let nodes = build_flow_layout(&steps, &sequence_edges(&steps), &config);
        // ceil(sqrt(5)) = 3 columns
        assert_eq!(position(&nodes, "s0"), (0.0, 0.0));
        assert_eq!(position(&nodes, "s2"), (520.0, 0.0));
        assert_eq!(position(&nodes, "s3"), (0.0, 160.0));
    }

    #[test]
    fn node_rects_use_configured_size() {
        let config = LayoutConfig::default();
        let nodes = vec![FlowNode {
            id: "a".into(),
            position: Point::new(10.0, 20.0),
        }];
        let rects = node_rects(&nodes, &config);
        assert_eq!(rects[0].rect, Rect::new(10.0, 20.0, 220.0, 120.0));
    }
}
