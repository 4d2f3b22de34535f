//! Every policy starts from the same top-packed stack (nodes in caller order
//! downward, each centered in a slot no smaller than the height floor) and
//! then shifts it by a policy-dependent share of the leftover slack. Justify
//! instead stretches padding to consume the slack exactly.

use super::types::NodeLayout;
use crate::config::{Alignment, SankeyConfig};

pub(super) fn pack_level(
    nodes: &mut [NodeLayout],
    level: &[usize],
    level_index: usize,
    alignment: Alignment,
    config: &SankeyConfig,
) {
    let count = level.len();
    if count == 0 {
        return;
    }
    let floor = config.min_node_height;
    let slots: Vec<f32> = level.iter().map(|&ni| nodes[ni].height.max(floor)).collect();
    let slot_total: f32 = slots.iter().sum();

    let pad = if count > 1 {
        let justify = (1.0 - slot_total) / (count - 1) as f32;
        if alignment == Alignment::Justify {
            justify
        } else {
            justify.clamp(
                config.node_pad_min.get(level_index),
                config.node_pad_max.get(level_index),
            )
        }
    } else {
        0.0
    };

    let mut top = 1.0f32;
    for (i, &ni) in level.iter().enumerate() {
        let slot = slots[i];
        // Under-floor nodes keep their true height, centered in their slot.
        nodes[ni].y = top - slot + (slot - nodes[ni].height) / 2.0;
        top -= slot + pad;
    }

    let leftover = 1.0 - slot_total - pad * (count - 1) as f32;
    let shift = match alignment {
        Alignment::Top | Alignment::Tree | Alignment::TreeClamp => 0.0,
        Alignment::Bottom => leftover,
        Alignment::Center => leftover / 2.0,
        // A lone node cannot absorb slack through padding; center it.
        Alignment::Justify if count == 1 => leftover / 2.0,
        Alignment::Justify => 0.0,
    };
    if shift != 0.0 {
        for &ni in level {
            nodes[ni].y -= shift;
        }
    }
}
