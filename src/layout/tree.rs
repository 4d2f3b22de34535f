//! Slope-minimizing offset adjustment for the tree alignment family.
//!
//! Levels are processed outward from the reference level: to its right each
//! node is steered by its inflows, to its left by its outflows. A node's
//! ideal offset is the value-weighted average of the offsets that would make
//! its anchor flows horizontal; since staging is top-packed, the staged
//! offset is also the highest position it may occupy, and the gap between
//! the two is its downward stress. The shift actually granted is capped by
//! the trailing weighted average stress of everything at or below the node,
//! then made monotone top-to-bottom so staged gaps never invert.

use super::types::NodeLayout;
use super::{FlowSlot, endpoints};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Anchor {
    Inflows,
    Outflows,
}

pub(super) fn align(
    nodes: &mut [NodeLayout],
    levels: &[Vec<usize>],
    flows: &[FlowSlot],
    reference_level: usize,
    clamp: bool,
    flow_pad: f32,
) {
    for level_index in reference_level + 1..levels.len() {
        align_level(nodes, &levels[level_index], flows, Anchor::Inflows, clamp, flow_pad);
    }
    for level_index in (0..reference_level).rev() {
        align_level(nodes, &levels[level_index], flows, Anchor::Outflows, clamp, flow_pad);
    }
}

fn align_level(
    nodes: &mut [NodeLayout],
    level: &[usize],
    flows: &[FlowSlot],
    anchor: Anchor,
    clamp: bool,
    flow_pad: f32,
) {
    let count = level.len();
    if count == 0 {
        return;
    }

    let staged: Vec<f32> = level.iter().map(|&ni| nodes[ni].y).collect();
    let mut stress = vec![0.0f32; count];
    let mut weight = vec![0.0f32; count];

    for (k, &ni) in level.iter().enumerate() {
        let node = &nodes[ni];
        weight[k] = node.value.max(0.0);
        let anchors: &[usize] = match anchor {
            Anchor::Inflows => &node.inflows,
            Anchor::Outflows => &node.outflows,
        };
        if anchors.is_empty() {
            // Nothing to align against; the node holds its staged offset.
            continue;
        }
        let mut weighted = 0.0f32;
        let mut total = 0.0f32;
        for (ord, &fi) in anchors.iter().enumerate() {
            let flow = &flows[fi];
            let own_inset = endpoints::inset(node, anchors, flows, ord, flow_pad);
            let far_top = match anchor {
                Anchor::Inflows => {
                    let far = &nodes[flow.source];
                    endpoints::span(far, &far.outflows, flows, flow.source_ord, flow_pad).1
                }
                Anchor::Outflows => {
                    let far = &nodes[flow.target];
                    endpoints::span(far, &far.inflows, flows, flow.target_ord, flow_pad).1
                }
            };
            let flow_weight = flow.value.max(0.0);
            // Offset at which this flow's own interval top meets the far
            // interval top, i.e. the flow runs horizontally.
            weighted += flow_weight * (far_top + own_inset - node.height);
            total += flow_weight;
        }
        if total <= 0.0 {
            continue;
        }
        let ideal = (weighted / total).clamp(0.0, (1.0 - node.height).max(0.0));
        stress[k] = staged[k] - ideal;
    }

    let mut shift = vec![0.0f32; count];
    let mut weight_sum = 0.0f32;
    let mut stress_sum = 0.0f32;
    for k in (0..count).rev() {
        weight_sum += weight[k];
        stress_sum += stress[k] * weight[k];
        let trailing_average = if weight_sum > 0.0 {
            stress_sum / weight_sum
        } else {
            0.0
        };
        shift[k] = stress[k].min(trailing_average);
    }
    for k in 1..count {
        shift[k] = shift[k].max(shift[k - 1]);
    }
    if clamp {
        let room = staged[count - 1].max(0.0);
        for s in &mut shift {
            *s = s.clamp(0.0, room);
        }
    }

    for (k, &ni) in level.iter().enumerate() {
        nodes[ni].y = staged[k] - shift[k];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;

    // Two-level fixture: one tall source on the left, smaller receivers on
    // the right, all flows already attached in declaration order.
    fn fixture(
        source_value: f32,
        receiver_values: &[f32],
        scale: f32,
    ) -> (Vec<NodeLayout>, Vec<Vec<usize>>, Vec<FlowSlot>) {
        let mut nodes = vec![NodeLayout {
            name: "src".to_string(),
            label: String::new(),
            level: 0,
            value: source_value,
            x: 0.0,
            y: 1.0 - source_value / scale,
            width: 0.05,
            height: source_value / scale,
            color: Rgba::new(0.0, 0.0, 0.0, 1.0),
            inflows: Vec::new(),
            outflows: Vec::new(),
        }];
        let mut flows = Vec::new();
        let mut level1 = Vec::new();
        let mut top = 1.0f32;
        for (i, &value) in receiver_values.iter().enumerate() {
            let height = value / scale;
            let ni = nodes.len();
            nodes.push(NodeLayout {
                name: format!("r{i}"),
                label: String::new(),
                level: 1,
                value,
                x: 1.0,
                y: top - height,
                width: 0.05,
                height,
                color: Rgba::new(0.0, 0.0, 0.0, 1.0),
                inflows: Vec::new(),
                outflows: Vec::new(),
            });
            top -= height;
            level1.push(ni);
            let fi = flows.len();
            flows.push(FlowSlot {
                source: 0,
                target: ni,
                source_ord: fi,
                target_ord: 0,
                value,
                curvature: 0.0,
                color: Rgba::new(0.0, 0.0, 0.0, 1.0),
            });
            nodes[0].outflows.push(fi);
            nodes[ni].inflows.push(fi);
        }
        let levels = vec![vec![0], level1];
        (nodes, levels, flows)
    }

    #[test]
    fn reference_level_is_never_touched() {
        let (mut nodes, levels, flows) = fixture(100.0, &[50.0, 50.0], 100.0);
        let before = nodes[0].y;
        align(&mut nodes, &levels, &flows, 0, false, 0.0);
        assert_eq!(nodes[0].y, before);
    }

    #[test]
    fn order_within_a_level_is_preserved() {
        let (mut nodes, levels, flows) = fixture(80.0, &[20.0, 40.0, 20.0], 100.0);
        // Drop the source to the axis bottom so every receiver wants to move.
        nodes[0].y = 0.0;
        align(&mut nodes, &levels, &flows, 0, false, 0.0);
        assert!(nodes[1].y > 0.5);
        assert!(nodes[1].y >= nodes[2].y + nodes[2].height - 1e-6);
        assert!(nodes[2].y >= nodes[3].y + nodes[3].height - 1e-6);
    }

    #[test]
    fn fully_consumed_source_leaves_receivers_staged() {
        // Receivers already tile the source's output exactly; every flow is
        // horizontal in staging, so stress is zero everywhere.
        let (mut nodes, levels, flows) = fixture(100.0, &[50.0, 50.0], 100.0);
        let staged: Vec<f32> = nodes.iter().map(|n| n.y).collect();
        align(&mut nodes, &levels, &flows, 0, false, 0.0);
        for (node, y) in nodes.iter().zip(staged) {
            assert!((node.y - y).abs() < 1e-6, "{}", node.name);
        }
    }

    #[test]
    fn lone_receiver_drops_to_meet_a_low_flow() {
        // The source sits at the bottom half of the axis; its single
        // receiver is staged at the top and should move down until the flow
        // is horizontal.
        let (mut nodes, levels, flows) = fixture(50.0, &[50.0], 100.0);
        nodes[0].y = 0.0;
        align(&mut nodes, &levels, &flows, 0, false, 0.0);
        // Horizontal flow: receiver top aligns with source top.
        assert!((nodes[1].top() - nodes[0].top()).abs() < 1e-6);
    }

    #[test]
    fn clamp_keeps_the_level_inside_the_axis() {
        let (mut nodes, levels, flows) = fixture(80.0, &[40.0, 40.0], 100.0);
        // Push the source to the very bottom so the receivers want to
        // overshoot.
        nodes[0].y = 0.0;
        align(&mut nodes, &levels, &flows, 0, true, 0.0);
        assert!(nodes[2].y >= -1e-6);
    }

    #[test]
    fn plain_tree_may_overflow_where_clamp_does_not() {
        // A heavy receiver pulled hard toward a low source drags a light,
        // anchorless neighbor with it via the monotone-shift rule; the
        // neighbor starts 0.19 above the axis bottom but inherits a 0.1975
        // shift. Clamping trades the overflow for a flatter stack.
        let make = || {
            let (mut nodes, levels, mut flows) = fixture(60.0, &[80.0], 100.0);
            nodes[0].y = 0.0;
            let ni = nodes.len();
            nodes.push(NodeLayout {
                name: "tiny".to_string(),
                label: String::new(),
                level: 1,
                value: 1.0,
                x: 1.0,
                y: 0.19,
                width: 0.05,
                height: 0.01,
                color: Rgba::new(0.0, 0.0, 0.0, 1.0),
                inflows: Vec::new(),
                outflows: Vec::new(),
            });
            let mut levels = levels;
            levels[1].push(ni);
            flows.truncate(1);
            (nodes, levels, flows)
        };
        let (mut plain, levels, flows) = make();
        align(&mut plain, &levels, &flows, 0, false, 0.0);
        let (mut clamped, levels2, flows2) = make();
        align(&mut clamped, &levels2, &flows2, 0, true, 0.0);
        assert!(plain[2].y < 0.0);
        assert!(clamped[2].y >= -1e-6);
        assert!(plain[2].y < clamped[2].y);
    }
}
