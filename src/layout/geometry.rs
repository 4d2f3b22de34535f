use super::types::{CubicTo, FlowCurve, FlowOutline};

/// Curvature 0 yields a flat quadrilateral; anything above it bends both long
/// edges into cubics whose control points sit `curvature` times the
/// horizontal gap away from their endpoint.
pub(super) fn flow_outline(
    x1: f32,
    x2: f32,
    source_span: (f32, f32),
    target_span: (f32, f32),
    curvature: f32,
) -> FlowOutline {
    let (source_low, source_high) = source_span;
    let (target_low, target_high) = target_span;

    if curvature == 0.0 {
        return FlowOutline::Polygon([
            (x1, source_high),
            (x2, target_high),
            (x2, target_low),
            (x1, source_low),
        ]);
    }

    let reach = curvature * (x2 - x1);
    FlowOutline::Curve(FlowCurve {
        start: (x1, source_high),
        top: CubicTo {
            c1: (x1 + reach, source_high),
            c2: (x2 - reach, target_high),
            to: (x2, target_high),
        },
        side: (x2, target_low),
        bottom: CubicTo {
            c1: (x2 - reach, target_low),
            c2: (x1 + reach, source_low),
            to: (x1, source_low),
        },
    })
}
