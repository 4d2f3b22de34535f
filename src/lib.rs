pub mod color;
pub mod config;
pub mod dump;
pub mod error;
pub mod graph;
pub mod layout;

pub use color::Rgba;
pub use config::{Alignment, FlowColorMode, LevelValue, SankeyConfig};
pub use error::{LayoutError, LayoutWarning};
pub use graph::{FlowSpec, NodeSpec, SankeyGraph, infer_levels};
pub use layout::{FlowLayout, FlowOutline, NodeLayout, SankeyLayout, compute_layout};
