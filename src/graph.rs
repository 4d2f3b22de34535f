use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::color::Rgba;
use crate::config::FlowColorMode;

/// Per-node overrides. Unset fields fall back to the global configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeOptions {
    pub color: Option<Rgba>,
    pub label: Option<String>,
}

/// One node of a level: a unique name and the throughput it represents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub name: String,
    pub value: f32,
    #[serde(default)]
    pub options: NodeOptions,
}

impl NodeSpec {
    pub fn new(name: impl Into<String>, value: f32) -> Self {
        Self {
            name: name.into(),
            value,
            options: NodeOptions::default(),
        }
    }

    pub fn with_color(mut self, color: Rgba) -> Self {
        self.options.color = Some(color);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.options.label = Some(label.into());
        self
    }
}

/// Per-flow overrides. Unset fields fall back to the global configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowOptions {
    pub color: Option<Rgba>,
    pub color_mode: Option<FlowColorMode>,
    pub curvature: Option<f32>,
}

/// A directed weighted flow between two named nodes. Declaration order is
/// load-bearing: it fixes the stacking order of flow endpoints on both sides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowSpec {
    pub source: String,
    pub target: String,
    pub value: f32,
    #[serde(default)]
    pub options: FlowOptions,
}

impl FlowSpec {
    pub fn new(source: impl Into<String>, target: impl Into<String>, value: f32) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            value,
            options: FlowOptions::default(),
        }
    }

    pub fn with_color(mut self, color: Rgba) -> Self {
        self.options.color = Some(color);
        self
    }

    pub fn with_color_mode(mut self, mode: FlowColorMode) -> Self {
        self.options.color_mode = Some(mode);
        self
    }

    pub fn with_curvature(mut self, curvature: f32) -> Self {
        self.options.curvature = Some(curvature);
        self
    }
}

/// The diagram description: a flat flow list plus, optionally, explicit
/// levels. When `levels` is absent the level structure is inferred from the
/// flows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SankeyGraph {
    pub levels: Option<Vec<Vec<NodeSpec>>>,
    pub flows: Vec<FlowSpec>,
}

impl SankeyGraph {
    pub fn from_flows(flows: Vec<FlowSpec>) -> Self {
        Self {
            levels: None,
            flows,
        }
    }

    pub fn with_levels(levels: Vec<Vec<NodeSpec>>, flows: Vec<FlowSpec>) -> Self {
        Self {
            levels: Some(levels),
            flows,
        }
    }

    /// The explicit levels if given, otherwise levels inferred from the flows.
    pub fn resolved_levels(&self) -> Vec<Vec<NodeSpec>> {
        match &self.levels {
            Some(levels) => levels.clone(),
            None => infer_levels(&self.flows),
        }
    }
}

/// Derives an ordered level structure from a flat flow list.
///
/// Nodes are registered in first-appearance order. Minimum levels are relaxed
/// until every flow points at least one level forward (bounded by the node
/// count, so cyclic input terminates too), then each node is pulled as far
/// right as its children allow. A node's value is the larger of its inbound
/// and outbound totals, so pure sources and pure sinks size correctly.
///
/// The function is total: cyclic input yields *some* assignment in which at
/// least one flow is backward, and flow attachment rejects it.
pub fn infer_levels(flows: &[FlowSpec]) -> Vec<Vec<NodeSpec>> {
    let mut names: Vec<&str> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for flow in flows {
        for name in [flow.source.as_str(), flow.target.as_str()] {
            index.entry(name).or_insert_with(|| {
                names.push(name);
                names.len() - 1
            });
        }
    }
    let node_count = names.len();
    if node_count == 0 {
        return Vec::new();
    }

    let mut min_level = vec![0usize; node_count];
    for _ in 0..node_count {
        let mut changed = false;
        for flow in flows {
            let source = index[flow.source.as_str()];
            let target = index[flow.target.as_str()];
            if min_level[target] < min_level[source] + 1 {
                min_level[target] = min_level[source] + 1;
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    // Pull each node rightward to one level short of its nearest child.
    // Children first: a child's minimum level is strictly greater than its
    // parent's, so decreasing minimum-level order visits them before parents.
    let mut level = min_level.clone();
    let mut by_depth: Vec<usize> = (0..node_count).collect();
    by_depth.sort_by(|&a, &b| min_level[b].cmp(&min_level[a]));
    for &node in &by_depth {
        let nearest_child = flows
            .iter()
            .filter(|flow| index[flow.source.as_str()] == node)
            .map(|flow| level[index[flow.target.as_str()]])
            .min();
        if let Some(child_level) = nearest_child {
            level[node] = min_level[node].max(child_level.saturating_sub(1));
        }
    }

    let mut inbound = vec![0.0f32; node_count];
    let mut outbound = vec![0.0f32; node_count];
    for flow in flows {
        outbound[index[flow.source.as_str()]] += flow.value;
        inbound[index[flow.target.as_str()]] += flow.value;
    }

    let level_count = level.iter().copied().max().unwrap_or(0) + 1;
    let mut levels: Vec<Vec<NodeSpec>> = vec![Vec::new(); level_count];
    for node in 0..node_count {
        levels[level[node]].push(NodeSpec::new(
            names[node],
            inbound[node].max(outbound[node]),
        ));
    }
    levels
}
