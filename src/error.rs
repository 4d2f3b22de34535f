use std::fmt;

/// Structural problems that make a layout impossible; these abort the whole
/// `compute_layout` call. The computation is deterministic, so a failed call
/// has to be corrected by the caller and resubmitted in full.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutError {
    DuplicateNode { name: String },

    UnknownNode { name: String },

    BackwardFlow {
        source: String,
        target: String,
        source_level: usize,
        target_level: usize,
    },

    LevelOverfull { level: usize, count: usize },

    UnknownAlignment(String),

    UnknownFlowColorMode(String),

    CurvatureOutOfRange { value: f32 },

    InvalidColor(String),
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutError::DuplicateNode { name } => {
                write!(f, "duplicate node name: {name}")
            }
            LayoutError::UnknownNode { name } => {
                write!(f, "flow references unknown node: {name}")
            }
            LayoutError::BackwardFlow {
                source,
                target,
                source_level,
                target_level,
            } => write!(
                f,
                "backward flow {source} -> {target}: destination level {target_level} \
                 is not greater than source level {source_level}"
            ),
            LayoutError::LevelOverfull { level, count } => write!(
                f,
                "level {level}: {count} nodes cannot fit the axis with the configured padding and height floor"
            ),
            LayoutError::UnknownAlignment(value) => {
                write!(f, "unknown alignment policy: {value}")
            }
            LayoutError::UnknownFlowColorMode(value) => {
                write!(f, "unknown flow color mode: {value}")
            }
            LayoutError::CurvatureOutOfRange { value } => {
                write!(f, "curvature {value} is outside [0, 1]")
            }
            LayoutError::InvalidColor(value) => {
                write!(f, "invalid color: {value}")
            }
        }
    }
}

impl std::error::Error for LayoutError {}

/// Suspicious input the engine still lays out with best-effort values. Every
/// warning is logged and collected on the returned layout so callers can
/// surface them.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutWarning {
    NonPositiveNodeValue { name: String, value: f32 },

    NonPositiveFlowValue {
        source: String,
        target: String,
        value: f32,
    },

    FlowExceedsEndpoint {
        source: String,
        target: String,
        value: f32,
        endpoint: String,
        endpoint_value: f32,
    },
}

impl fmt::Display for LayoutWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutWarning::NonPositiveNodeValue { name, value } => {
                write!(f, "node {name} has non-positive value {value}")
            }
            LayoutWarning::NonPositiveFlowValue {
                source,
                target,
                value,
            } => write!(f, "flow {source} -> {target} has non-positive value {value}"),
            LayoutWarning::FlowExceedsEndpoint {
                source,
                target,
                value,
                endpoint,
                endpoint_value,
            } => write!(
                f,
                "flow {source} -> {target} value {value} exceeds {endpoint} value {endpoint_value}"
            ),
        }
    }
}

impl std::error::Error for LayoutWarning {}
