//! Cubic Bezier segments.

use kurbo::{CubicBez, ParamCurve, ParamCurveExtrema, Rect};

use super::point::{Point, lerp};

/// A cubic Bezier: two on-curve end points and two off-curve controls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub p0: Point,
    pub p1: Point,
    pub p2: Point,
    pub p3: Point,
}

impl CubicBezier {
    pub const fn new(p0: Point, p1: Point, p2: Point, p3: Point) -> Self {
        Self { p0, p1, p2, p3 }
    }

    pub fn points(&self) -> [Point; 4] {
        [self.p0, self.p1, self.p2, self.p3]
    }

    fn to_kurbo(self) -> CubicBez {
        CubicBez::new(self.p0.to_kurbo(), self.p1.to_kurbo(), self.p2.to_kurbo(), self.p3.to_kurbo())
    }

    /// Point on the curve at parameter `t`.
    pub fn solve_point(&self, t: f64) -> Point {
        if t == 0.0 {
            return self.p0;
        }
        if t == 1.0 {
            return self.p3;
        }
        self.to_kurbo().eval(t).into()
    }

    /// Split the curve at `t` using de Casteljau subdivision.
    ///
    /// At `t = 0` the head collapses onto the start point and at `t = 1`
    /// the tail collapses onto the end point.
    pub fn solve_slice(&self, t: f64) -> (CubicBezier, CubicBezier) {
        let mix = |a: Point, b: Point| Point::new(lerp(a.x, b.x, t), lerp(a.y, b.y, t));

        let p01 = mix(self.p0, self.p1);
        let p12 = mix(self.p1, self.p2);
        let p23 = mix(self.p2, self.p3);
        let p012 = mix(p01, p12);
        let p123 = mix(p12, p23);
        let split = mix(p012, p123);

        (
            CubicBezier::new(self.p0, p01, p012, split),
            CubicBezier::new(split, p123, p23, self.p3),
        )
    }

    /// Tight bounding box of the curve, including extrema.
    pub fn bounding_box(&self) -> Rect {
        self.to_kurbo().bounding_box()
    }
}
