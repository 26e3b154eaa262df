use director_protocol::{ContainerSize, FlowNodeRect, FlowViewport, Rect};

/// Default margin, in canvas units, kept around the visible area.
pub const DEFAULT_VIEWPORT_PADDING: f64 = 200.0;

/// The canvas-space rectangle visible through `viewport`, grown by `padding`
/// on every side. A zoom of 0 is treated as 1.
pub fn flow_viewport_rect(
    viewport: &FlowViewport,
    container: &ContainerSize,
    padding: f64,
) -> Rect {
    let zoom = if viewport.zoom == 0.0 { 1.0 } else { viewport.zoom };
    let min_x = -viewport.x / zoom - padding;
    let min_y = -viewport.y / zoom - padding;
    let max_x = (container.width - viewport.x) / zoom + padding;
    let max_y = (container.height - viewport.y) / zoom + padding;
    Rect::new(min_x, min_y, max_x - min_x, max_y - min_y)
}

/// Nodes at least partly inside the padded viewport.
///
/// Before the container has been measured (a non-positive dimension) every
/// node is returned.
pub fn filter_nodes_by_viewport<'a>(
    nodes: &'a [FlowNodeRect],
    viewport: &FlowViewport,
    container: &ContainerSize,
    padding: f64,
) -> Vec<&'a FlowNodeRect> {
    if container.width <= 0.0 || container.height <= 0.0 {
        return nodes.iter().collect();
    }
    let visible = flow_viewport_rect(viewport, container, padding);
    nodes
        .iter()
        .filter(|node| node.rect.intersects(&visible))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nodes() -> Vec<FlowNodeRect> {
        [("a", 0.0, 0.0), ("b", 800.0, 0.0), ("c", 0.0, 800.0)]
            .into_iter()
            .map(|(id, x, y)| FlowNodeRect {
                id: id.into(),
                rect: Rect::new(x, y, 200.0, 120.0),
            })
            .collect()
    }

    fn ids(nodes: &[&FlowNodeRect]) -> Vec<String> {
        nodes.iter().map(|n| n.id.clone()).collect()
    }

    const CONTAINER: ContainerSize = ContainerSize {
        width: 400.0,
        height: 400.0,
    };

    #[test]
    fn filters_nodes_outside_viewport() {
        let nodes = nodes();
        let visible = filter_nodes_by_viewport(&nodes, &FlowViewport::default(), &CONTAINER, 0.0);
        assert_eq!(ids(&visible), vec!["a"]);
    }

    #[test]
    fn includes_nodes_within_padding() {
        let nodes = nodes();
        let visible =
            filter_nodes_by_viewport(&nodes, &FlowViewport::default(), &CONTAINER, 600.0);
        assert_eq!(ids(&visible), vec!["a", "b", "c"]);
    }

    #[test]
    fn pan_and_zoom_move_the_visible_rect() {
        let viewport = FlowViewport {
            x: -800.0,
            y: 0.0,
            zoom: 2.0,
        };
        let rect = flow_viewport_rect(&viewport, &CONTAINER, 0.0);
        assert_eq!(rect, Rect::new(400.0, 0.0, 200.0, 200.0));

        let nodes = nodes();
        let visible = filter_nodes_by_viewport(&nodes, &viewport, &CONTAINER, 0.0);
        assert!(visible.is_empty());

        let zero_zoom = FlowViewport { zoom: 0.0, ..viewport };
        assert_eq!(flow_viewport_rect(&zero_zoom, &CONTAINER, 0.0).w, 400.0);
    }

    #[test]
    fn unmeasured_container_keeps_everything() {
        let nodes = nodes();
        let container = ContainerSize {
            width: 0.0,
            height: 300.0,
        };
        let visible = filter_nodes_by_viewport(&nodes, &FlowViewport::default(), &container, 0.0);
        assert_eq!(visible.len(), 3);
    }
}
