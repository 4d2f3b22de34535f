use crate::color::Rgba;
use crate::error::LayoutWarning;

/// A 2D point. x is in level units, y in normalized axis units with y
/// increasing upward.
pub type Point = (f32, f32);

/// One cubic segment of a flow outline: two control points and the segment
/// end. The segment start is whatever point the outline reached before it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicTo {
    pub c1: Point,
    pub c2: Point,
    pub to: Point,
}

/// Closed outline of a curved flow: move to `start`, cubic along the top
/// edge, straight line to `side`, cubic back along the bottom edge, close.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowCurve {
    /// Top-left corner (source-side interval top).
    pub start: Point,
    /// Top edge, ending at the destination-side interval top.
    pub top: CubicTo,
    /// Bottom-right corner (destination-side interval bottom).
    pub side: Point,
    /// Bottom edge, ending back at the source-side interval bottom.
    pub bottom: CubicTo,
}

/// The geometry of one flow. The two kinds are the only ones the engine
/// produces, so consumers can match exhaustively.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowOutline {
    /// Flat-sided quadrilateral: top-left, top-right, bottom-right,
    /// bottom-left.
    Polygon([Point; 4]),
    Curve(FlowCurve),
}

/// A laid-out node: an axis-aligned rectangle plus its resolved color and the
/// ordered flow lists (indices into [`SankeyLayout::flows`]).
#[derive(Debug, Clone, PartialEq)]
pub struct NodeLayout {
    pub name: String,
    pub label: String,
    pub level: usize,
    pub value: f32,
    /// Left edge; equals the level index.
    pub x: f32,
    /// Bottom edge in axis units.
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub color: Rgba,
    pub inflows: Vec<usize>,
    pub outflows: Vec<usize>,
}

impl NodeLayout {
    pub fn top(&self) -> f32 {
        self.y + self.height
    }
}

/// A laid-out flow: resolved color, the exact vertical interval it occupies
/// on each endpoint (as `(low, high)`), and its outline geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowLayout {
    /// Index into [`SankeyLayout::nodes`].
    pub source: usize,
    /// Index into [`SankeyLayout::nodes`].
    pub target: usize,
    pub value: f32,
    pub curvature: f32,
    pub color: Rgba,
    pub source_span: (f32, f32),
    pub target_span: (f32, f32),
    pub outline: FlowOutline,
}

/// The complete computed layout, ready for any rendering backend.
#[derive(Debug, Clone, PartialEq)]
pub struct SankeyLayout {
    pub nodes: Vec<NodeLayout>,
    /// Node indices per level, top-to-bottom in caller order.
    pub levels: Vec<Vec<usize>>,
    pub flows: Vec<FlowLayout>,
    /// The diagram-wide value-to-axis scale.
    pub scale: f32,
    /// The level that spans the full axis with no slack.
    pub reference_level: usize,
    pub warnings: Vec<LayoutWarning>,
}

impl SankeyLayout {
    pub fn node(&self, name: &str) -> Option<&NodeLayout> {
        self.nodes.iter().find(|node| node.name == name)
    }

    /// Horizontal extent in level units (right edge of the last level).
    pub fn width(&self) -> f32 {
        self.nodes
            .iter()
            .map(|node| node.x + node.width)
            .fold(0.0, f32::max)
    }
}
