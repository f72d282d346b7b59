use kurbo::Rect;

use super::{CubicBezier, Line, Point};

/// One drawable piece of a contour between two on-curve points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    Line(Line),
    CubicBezier(CubicBezier),
}

impl Segment {
    pub fn start(&self) -> Point {
        match self {
            Segment::Line(line) => line.p0,
            Segment::CubicBezier(curve) => curve.p0,
        }
    }

    pub fn end(&self) -> Point {
        match self {
            Segment::Line(line) => line.p1,
            Segment::CubicBezier(curve) => curve.p3,
        }
    }

    pub fn solve_point(&self, t: f64) -> Point {
        match self {
            Segment::Line(line) => line.solve_point(t),
            Segment::CubicBezier(curve) => curve.solve_point(t),
        }
    }

    pub fn bounding_box(&self) -> Rect {
        match self {
            Segment::Line(line) => Rect::from_points(line.p0.to_kurbo(), line.p1.to_kurbo()),
            Segment::CubicBezier(curve) => curve.bounding_box(),
        }
    }
}
