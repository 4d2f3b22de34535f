//! JSON snapshot of a computed layout, for debugging and diffing runs.

use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::layout::{FlowOutline, SankeyLayout};

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub scale: f32,
    pub reference_level: usize,
    pub nodes: Vec<NodeDump>,
    pub flows: Vec<FlowDump>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub name: String,
    pub label: String,
    pub level: usize,
    pub value: f32,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub color: [f32; 4],
}

#[derive(Debug, Serialize)]
pub struct FlowDump {
    pub source: String,
    pub target: String,
    pub value: f32,
    pub kind: String,
    /// The outline as a flat point list; for curves the interior points are
    /// cubic control points in path order.
    pub points: Vec<[f32; 2]>,
    pub color: [f32; 4],
}

impl LayoutDump {
    pub fn from_layout(layout: &SankeyLayout) -> Self {
        let nodes = layout
            .nodes
            .iter()
            .map(|node| NodeDump {
                name: node.name.clone(),
                label: node.label.clone(),
                level: node.level,
                value: node.value,
                x: node.x,
                y: node.y,
                width: node.width,
                height: node.height,
                color: node.color.to_array(),
            })
            .collect();
        let flows = layout
            .flows
            .iter()
            .map(|flow| {
                let (kind, points) = match &flow.outline {
                    FlowOutline::Polygon(corners) => (
                        "polygon".to_string(),
                        corners.iter().map(|&(x, y)| [x, y]).collect(),
                    ),
                    FlowOutline::Curve(curve) => (
                        "curve".to_string(),
                        vec![
                            curve.start,
                            curve.top.c1,
                            curve.top.c2,
                            curve.top.to,
                            curve.side,
                            curve.bottom.c1,
                            curve.bottom.c2,
                            curve.bottom.to,
                        ]
                        .into_iter()
                        .map(|(x, y)| [x, y])
                        .collect(),
                    ),
                };
                FlowDump {
                    source: layout.nodes[flow.source].name.clone(),
                    target: layout.nodes[flow.target].name.clone(),
                    value: flow.value,
                    kind,
                    points,
                    color: flow.color.to_array(),
                }
            })
            .collect();
        Self {
            scale: layout.scale,
            reference_level: layout.reference_level,
            nodes,
            flows,
            warnings: layout
                .warnings
                .iter()
                .map(|warning| warning.to_string())
                .collect(),
        }
    }
}

pub fn write_layout_dump(path: &Path, layout: &SankeyLayout) -> std::io::Result<()> {
    let dump = LayoutDump::from_layout(layout);
    let file = File::create(path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), &dump).map_err(std::io::Error::other)
}
