use rapier3d::math::{Point, Real};
use rapier3d::pipeline::{DebugRenderBackend, DebugRenderObject};
use rollway_common::DebugLine;

use crate::convert::from_point;

/// Debug-render backend that records line segments instead of drawing them.
#[derive(Default)]
pub(crate) struct LineCollector {
    pub lines: Vec<DebugLine>,
}

impl DebugRenderBackend for LineCollector {
    fn draw_line(
        &mut self,
        _object: DebugRenderObject,
        a: Point<Real>,
        b: Point<Real>,
        color: [f32; 4],
    ) {
        self.lines.push(DebugLine {
            a: from_point(&a),
            b: from_point(&b),
            color,
        });
    }
}
