//! The layout pipeline: build the node arena, attach every flow, derive the
//! diagram scale, pack each level, optionally tree-align, then emit per-flow
//! endpoint intervals and outline geometry.
//!
//! Nodes and flows live in flat vectors owned by the computation; flows hold
//! node indices and nodes hold ordered flow-index lists, so the mutual
//! references never form an ownership cycle.

mod endpoints;
mod geometry;
mod pack;
mod scale;
mod tree;
pub(crate) mod types;

pub use types::*;

use std::collections::HashMap;

use log::warn;

use crate::color::{self, Rgba};
use crate::config::{Alignment, FlowColorMode, SankeyConfig};
use crate::error::{LayoutError, LayoutWarning};
use crate::graph::{FlowSpec, SankeyGraph};

/// Working form of a flow between attachment and geometry emission.
#[derive(Debug, Clone)]
pub(crate) struct FlowSlot {
    pub source: usize,
    pub target: usize,
    /// Position among the source's outflows.
    pub source_ord: usize,
    /// Position among the target's inflows.
    pub target_ord: usize,
    pub value: f32,
    pub curvature: f32,
    pub color: Rgba,
}

/// Computes the full layout for a diagram description.
///
/// The computation is a pure function of its inputs: running it twice on the
/// same graph and configuration produces identical output. Structural
/// problems abort with an error; questionable values are laid out best-effort
/// and reported through [`SankeyLayout::warnings`].
pub fn compute_layout(
    graph: &SankeyGraph,
    config: &SankeyConfig,
) -> Result<SankeyLayout, LayoutError> {
    check_curvature(config.curvature)?;

    let level_specs = graph.resolved_levels();
    let mut warnings: Vec<LayoutWarning> = Vec::new();

    let mut nodes: Vec<NodeLayout> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut levels: Vec<Vec<usize>> = Vec::with_capacity(level_specs.len());
    for (level_index, specs) in level_specs.iter().enumerate() {
        let mut members = Vec::with_capacity(specs.len());
        for spec in specs {
            if index.contains_key(&spec.name) {
                return Err(LayoutError::DuplicateNode {
                    name: spec.name.clone(),
                });
            }
            if spec.value <= 0.0 {
                push_warning(
                    &mut warnings,
                    LayoutWarning::NonPositiveNodeValue {
                        name: spec.name.clone(),
                        value: spec.value,
                    },
                );
            }
            let ni = nodes.len();
            let color = spec
                .options
                .color
                .unwrap_or_else(|| palette_color(&config.palette, ni));
            nodes.push(NodeLayout {
                name: spec.name.clone(),
                label: spec
                    .options
                    .label
                    .clone()
                    .unwrap_or_else(|| spec.name.clone()),
                level: level_index,
                value: spec.value,
                x: level_index as f32,
                y: 0.0,
                width: config.node_width,
                height: 0.0,
                color,
                inflows: Vec::new(),
                outflows: Vec::new(),
            });
            index.insert(spec.name.clone(), ni);
            members.push(ni);
        }
        levels.push(members);
    }

    // Attach every flow to both endpoints before any geometry runs: endpoint
    // allocation and tree alignment both read complete flow lists.
    let mut flows: Vec<FlowSlot> = Vec::with_capacity(graph.flows.len());
    for spec in &graph.flows {
        let source = *index
            .get(&spec.source)
            .ok_or_else(|| LayoutError::UnknownNode {
                name: spec.source.clone(),
            })?;
        let target = *index
            .get(&spec.target)
            .ok_or_else(|| LayoutError::UnknownNode {
                name: spec.target.clone(),
            })?;
        if nodes[target].level <= nodes[source].level {
            return Err(LayoutError::BackwardFlow {
                source: spec.source.clone(),
                target: spec.target.clone(),
                source_level: nodes[source].level,
                target_level: nodes[target].level,
            });
        }
        let curvature = spec.options.curvature.unwrap_or(config.curvature);
        check_curvature(curvature)?;

        if spec.value <= 0.0 {
            push_warning(
                &mut warnings,
                LayoutWarning::NonPositiveFlowValue {
                    source: spec.source.clone(),
                    target: spec.target.clone(),
                    value: spec.value,
                },
            );
        }
        for endpoint in [source, target] {
            if spec.value > nodes[endpoint].value {
                push_warning(
                    &mut warnings,
                    LayoutWarning::FlowExceedsEndpoint {
                        source: spec.source.clone(),
                        target: spec.target.clone(),
                        value: spec.value,
                        endpoint: nodes[endpoint].name.clone(),
                        endpoint_value: nodes[endpoint].value,
                    },
                );
            }
        }

        let color = flow_color(spec, &nodes[source], &nodes[target], config);
        let fi = flows.len();
        let source_ord = nodes[source].outflows.len();
        let target_ord = nodes[target].inflows.len();
        nodes[source].outflows.push(fi);
        nodes[target].inflows.push(fi);
        flows.push(FlowSlot {
            source,
            target,
            source_ord,
            target_ord,
            value: spec.value,
            curvature,
            color,
        });
    }

    let solved = scale::solve(&nodes, &levels, config)?;
    for node in &mut nodes {
        node.height = (node.value / solved.scale).max(0.0);
    }
    for (level_index, level) in levels.iter().enumerate() {
        pack::pack_level(&mut nodes, level, level_index, config.alignment, config);
    }
    if config.alignment.is_tree() {
        tree::align(
            &mut nodes,
            &levels,
            &flows,
            solved.reference_level,
            config.alignment == Alignment::TreeClamp,
            config.flow_pad,
        );
    }

    let flow_layouts = flows
        .iter()
        .map(|slot| {
            let source = &nodes[slot.source];
            let target = &nodes[slot.target];
            let source_span = endpoints::span(
                source,
                &source.outflows,
                &flows,
                slot.source_ord,
                config.flow_pad,
            );
            let target_span = endpoints::span(
                target,
                &target.inflows,
                &flows,
                slot.target_ord,
                config.flow_pad,
            );
            let outline = geometry::flow_outline(
                source.x + source.width,
                target.x,
                source_span,
                target_span,
                slot.curvature,
            );
            FlowLayout {
                source: slot.source,
                target: slot.target,
                value: slot.value,
                curvature: slot.curvature,
                color: slot.color,
                source_span,
                target_span,
                outline,
            }
        })
        .collect();

    Ok(SankeyLayout {
        nodes,
        levels,
        flows: flow_layouts,
        scale: solved.scale,
        reference_level: solved.reference_level,
        warnings,
    })
}

fn check_curvature(value: f32) -> Result<(), LayoutError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(LayoutError::CurvatureOutOfRange { value })
    }
}

fn palette_color(palette: &[Rgba], ordinal: usize) -> Rgba {
    if palette.is_empty() {
        color::fallback_node_color()
    } else {
        palette[ordinal % palette.len()]
    }
}

fn flow_color(
    spec: &FlowSpec,
    source: &NodeLayout,
    target: &NodeLayout,
    config: &SankeyConfig,
) -> Rgba {
    if let Some(color) = spec.options.color {
        return color;
    }
    let mode = spec.options.color_mode.unwrap_or(config.flow_color_mode);
    let base = match mode {
        FlowColorMode::Source => source.color,
        FlowColorMode::Dest => target.color,
        FlowColorMode::Lesser => {
            if source.value <= target.value {
                source.color
            } else {
                target.color
            }
        }
        FlowColorMode::Greater => {
            if source.value >= target.value {
                source.color
            } else {
                target.color
            }
        }
        FlowColorMode::Flat => config.default_flow_color,
    };
    base.scale_alpha(config.flow_color_alpha)
}

fn push_warning(warnings: &mut Vec<LayoutWarning>, warning: LayoutWarning) {
    warn!("{warning}");
    warnings.push(warning);
}
