use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::color::{self, Rgba};
use crate::error::LayoutError;

/// Vertical placement policy for the nodes of a level. The tree variants
/// additionally nudge offsets level-by-level to flatten flow slopes;
/// `TreeClamp` keeps every level inside the axis while plain `Tree` trades
/// slight overflow for straighter flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Alignment {
    #[default]
    Top,
    Bottom,
    Center,
    Justify,
    Tree,
    TreeClamp,
}

impl Alignment {
    pub fn is_tree(self) -> bool {
        matches!(self, Self::Tree | Self::TreeClamp)
    }
}

impl FromStr for Alignment {
    type Err = LayoutError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token {
            "top" => Ok(Self::Top),
            "bottom" => Ok(Self::Bottom),
            "center" => Ok(Self::Center),
            "justify" => Ok(Self::Justify),
            "tree" => Ok(Self::Tree),
            "tree-clamp" => Ok(Self::TreeClamp),
            other => Err(LayoutError::UnknownAlignment(other.to_string())),
        }
    }
}

/// Rule deriving a flow's color from its endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FlowColorMode {
    Source,
    #[default]
    Dest,
    /// Color of the lower-value endpoint; ties take the source.
    Lesser,
    /// Color of the higher-value endpoint; ties take the source.
    Greater,
    /// The configured flat default color.
    Flat,
}

impl FromStr for FlowColorMode {
    type Err = LayoutError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token {
            "source" | "src" => Ok(Self::Source),
            "dest" => Ok(Self::Dest),
            "lesser" => Ok(Self::Lesser),
            "greater" => Ok(Self::Greater),
            "default" | "flat" => Ok(Self::Flat),
            other => Err(LayoutError::UnknownFlowColorMode(other.to_string())),
        }
    }
}

/// A configuration value that is either uniform across the diagram or given
/// per level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LevelValue<T> {
    Uniform(T),
    PerLevel(Vec<T>),
}

impl<T: Copy + Default> LevelValue<T> {
    /// Resolves the value for one level. Sequences shorter than the level
    /// count repeat their last entry.
    pub fn get(&self, level: usize) -> T {
        match self {
            Self::Uniform(value) => *value,
            Self::PerLevel(values) => values
                .get(level)
                .or_else(|| values.last())
                .copied()
                .unwrap_or_default(),
        }
    }
}

impl<T> From<T> for LevelValue<T> {
    fn from(value: T) -> Self {
        Self::Uniform(value)
    }
}

/// Global layout configuration. All vertical quantities are in normalized
/// axis units (full diagram height = 1); `node_width` is in level units
/// (adjacent levels are 1.0 apart).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SankeyConfig {
    pub alignment: Alignment,
    pub flow_color_mode: FlowColorMode,
    /// Multiplier applied to the opacity of mode-derived flow colors.
    pub flow_color_alpha: f32,
    pub node_width: f32,
    /// Nodes whose scaled height falls under this floor keep their true drawn
    /// height but reserve a floor-sized slot. Zero disables the floor.
    pub min_node_height: f32,
    pub node_pad_min: LevelValue<f32>,
    pub node_pad_max: LevelValue<f32>,
    /// Padding between adjacent flow endpoints on one node side.
    pub flow_pad: f32,
    /// Default curvature for flows without an override; 0 means flat
    /// quadrilaterals.
    pub curvature: f32,
    pub palette: Vec<Rgba>,
    pub default_flow_color: Rgba,
}

impl Default for SankeyConfig {
    fn default() -> Self {
        Self {
            alignment: Alignment::Top,
            flow_color_mode: FlowColorMode::Dest,
            flow_color_alpha: 0.6,
            node_width: 0.05,
            min_node_height: 0.0,
            node_pad_min: LevelValue::Uniform(0.01),
            node_pad_max: LevelValue::Uniform(0.05),
            flow_pad: 0.01,
            curvature: 0.3,
            palette: color::default_palette().to_vec(),
            default_flow_color: color::default_flow_color(),
        }
    }
}
