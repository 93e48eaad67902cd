//! Stroke records: one continuous pointer drag.

use crate::layer::LayerId;
use crate::style::SerializableColor;
use crate::tools::ToolKind;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Number of segments used to approximate a circle outline.
const ELLIPSE_SEGMENTS: usize = 64;

/// A stroke: tool, point list and style, tied to one layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stroke {
    /// Tool that produced the stroke.
    pub tool: ToolKind,
    /// Points in the path.
    pub points: Vec<Point>,
    /// Stroke color.
    pub color: SerializableColor,
    /// Stroke width in canvas units.
    pub size: f64,
    /// Layer the stroke belongs to.
    pub layer_id: LayerId,
}

impl Stroke {
    /// Create a stroke with a single starting point.
    pub fn new(
        tool: ToolKind,
        start: Point,
        color: SerializableColor,
        size: f64,
        layer_id: LayerId,
    ) -> Self {
        Self::from_points(tool, vec![start], color, size, layer_id)
    }

    /// Create from existing points.
    pub fn from_points(
        tool: ToolKind,
        points: Vec<Point>,
        color: SerializableColor,
        size: f64,
        layer_id: LayerId,
    ) -> Self {
        Self {
            tool,
            points,
            color,
            size,
            layer_id,
        }
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn is_eraser(&self) -> bool {
        self.tool == ToolKind::Eraser
    }

    /// Bounding box of the points, not including the stroke width.
    pub fn bounds(&self) -> Rect {
        let Some(first) = self.points.first() else {
            return Rect::ZERO;
        };
        self.points
            .iter()
            .skip(1)
            .fold(Rect::from_points(*first, *first), |r, p| r.union_pt(*p))
    }

    /// Whether `point` lies on the painted stroke, within `tolerance`.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let reach = tolerance + self.size / 2.0;
        match self.points.as_slice() {
            [] => false,
            [only] => only.distance(point) <= reach,
            points => point_to_polyline_dist(point, points) <= reach,
        }
    }
}

/// Outline points for a shape tool dragged from `start` to `end`.
///
/// Returns `None` for tools that are not shape tools.
pub fn shape_outline(tool: ToolKind, start: Point, end: Point) -> Option<Vec<Point>> {
    match tool {
        ToolKind::Line => Some(vec![start, end]),
        ToolKind::Rectangle => {
            let r = Rect::from_points(start, end);
            Some(vec![
                Point::new(r.x0, r.y0),
                Point::new(r.x1, r.y0),
                Point::new(r.x1, r.y1),
                Point::new(r.x0, r.y1),
                Point::new(r.x0, r.y0),
            ])
        }
        ToolKind::Circle => {
            let r = Rect::from_points(start, end);
            let center = r.center();
            let (rx, ry) = (r.width() / 2.0, r.height() / 2.0);
            Some(
                (0..=ELLIPSE_SEGMENTS)
                    .map(|i| {
                        let angle = TAU * i as f64 / ELLIPSE_SEGMENTS as f64;
                        Point::new(center.x + rx * angle.cos(), center.y + ry * angle.sin())
                    })
                    .collect(),
            )
        }
        _ => None,
    }
}

/// Distance from a point to a line segment (a to b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let pv = point - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    point.distance(a + seg * t)
}

/// Minimum distance from a point to a polyline.
pub fn point_to_polyline_dist(point: Point, points: &[Point]) -> f64 {
    points
        .windows(2)
        .map(|w| point_to_segment_dist(point, w[0], w[1]))
        .fold(f64::INFINITY, f64::min)
}
