//! Partitioning of a node's vertical extent among its ordered flow
//! endpoints. Flows tile the node from its top edge downward in declaration
//! order with uniform padding in between; the side scale maps the node's
//! full value onto its drawn height minus that padding, so the intervals of
//! a fully-consumed node tile it exactly.

use super::FlowSlot;
use super::types::NodeLayout;

fn side_scale(node: &NodeLayout, count: usize, flow_pad: f32) -> f32 {
    let denom = node.height - flow_pad * count.saturating_sub(1) as f32;
    if denom > 0.0 && node.value > 0.0 {
        node.value / denom
    } else {
        // Degenerate node (zero value or no usable height): every interval
        // collapses onto the node's top edge.
        f32::INFINITY
    }
}

/// Distance from the node's top edge down to the top of the `ord`-th
/// interval on the given side. Independent of the node's offset.
pub(super) fn inset(
    node: &NodeLayout,
    side: &[usize],
    flows: &[FlowSlot],
    ord: usize,
    flow_pad: f32,
) -> f32 {
    let scale = side_scale(node, side.len(), flow_pad);
    let before: f32 = side[..ord].iter().map(|&fi| flows[fi].value).sum();
    before / scale + ord as f32 * flow_pad
}

/// The `(low, high)` vertical interval the `ord`-th flow of the given side
/// occupies on this node.
pub(super) fn span(
    node: &NodeLayout,
    side: &[usize],
    flows: &[FlowSlot],
    ord: usize,
    flow_pad: f32,
) -> (f32, f32) {
    let scale = side_scale(node, side.len(), flow_pad);
    let high = node.top() - inset(node, side, flows, ord, flow_pad);
    let low = high - flows[side[ord]].value / scale;
    (low, high)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;

    fn node(value: f32, y: f32, height: f32) -> NodeLayout {
        NodeLayout {
            name: "n".to_string(),
            label: "n".to_string(),
            level: 0,
            value,
            x: 0.0,
            y,
            width: 0.05,
            height,
            color: Rgba::new(0.0, 0.0, 0.0, 1.0),
            inflows: Vec::new(),
            outflows: Vec::new(),
        }
    }

    fn slot(value: f32) -> FlowSlot {
        FlowSlot {
            source: 0,
            target: 1,
            source_ord: 0,
            target_ord: 0,
            value,
            curvature: 0.0,
            color: Rgba::new(0.0, 0.0, 0.0, 1.0),
        }
    }

    #[test]
    fn intervals_tile_the_node_exactly() {
        let node = node(100.0, 0.2, 0.5);
        let flows = vec![slot(50.0), slot(30.0), slot(20.0)];
        let side = vec![0, 1, 2];
        let pad = 0.01;

        let spans: Vec<(f32, f32)> = (0..3)
            .map(|ord| span(&node, &side, &flows, ord, pad))
            .collect();

        // First interval starts at the node top, last ends at the node
        // bottom, neighbors are exactly one padding apart.
        assert!((spans[0].1 - node.top()).abs() < 1e-6);
        assert!((spans[2].0 - node.y).abs() < 1e-5);
        assert!((spans[0].0 - spans[1].1 - pad).abs() < 1e-6);
        assert!((spans[1].0 - spans[2].1 - pad).abs() < 1e-6);

        let allocated: f32 = spans.iter().map(|(low, high)| high - low).sum();
        assert!((allocated + 2.0 * pad - node.height).abs() < 1e-5);
    }

    #[test]
    fn single_full_value_flow_covers_the_whole_side() {
        let node = node(40.0, 0.1, 0.4);
        let flows = vec![slot(40.0)];
        let side = vec![0];
        let (low, high) = span(&node, &side, &flows, 0, 0.01);
        assert!((high - node.top()).abs() < 1e-6);
        assert!((low - node.y).abs() < 1e-6);
    }

    #[test]
    fn interval_heights_follow_flow_values() {
        let node = node(90.0, 0.0, 0.9);
        let flows = vec![slot(45.0), slot(45.0)];
        let side = vec![0, 1];
        let (low0, high0) = span(&node, &side, &flows, 0, 0.0);
        let (low1, high1) = span(&node, &side, &flows, 1, 0.0);
        assert!((high0 - low0 - 0.45).abs() < 1e-6);
        assert!((high1 - low1 - 0.45).abs() < 1e-6);
        // No padding: the intervals touch.
        assert!((low0 - high1).abs() < 1e-6);
    }

    #[test]
    fn zero_value_node_collapses_intervals() {
        let node = node(0.0, 0.3, 0.0);
        let flows = vec![slot(5.0)];
        let side = vec![0];
        let (low, high) = span(&node, &side, &flows, 0, 0.01);
        assert_eq!(high, node.top());
        assert_eq!(low, high);
    }
}
