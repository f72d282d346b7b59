//! Straight line segments.

use super::point::{Point, lerp};

/// A straight segment between two on-curve points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub p0: Point,
    pub p1: Point,
}

impl Line {
    pub const fn new(p0: Point, p1: Point) -> Self {
        Self { p0, p1 }
    }

    pub fn length(&self) -> f64 {
        self.p0.distance_to(self.p1)
    }

    /// Angle of the line direction in radians, `None` for a zero-length line.
    pub fn angle(&self) -> Option<f64> {
        self.p0.angle_to(self.p1)
    }

    /// Point at parameter `t` along the line.
    pub fn solve_point(&self, t: f64) -> Point {
        self.p0.lerp(self.p1, t)
    }

    /// Split the line at `t`.
    pub fn solve_slice(&self, t: f64) -> (Line, Line) {
        let mid = self.solve_point(t);
        (Line::new(self.p0, mid), Line::new(mid, self.p1))
    }

    /// Whether `point` lies on the segment (within float tolerance).
    pub fn has_point(&self, point: Point) -> bool {
        const TOLERANCE: f64 = 1e-9;
        let d = self.p1 - self.p0;
        let len_sq = d.x * d.x + d.y * d.y;
        if len_sq == 0.0 {
            return self.p0.distance_to(point) <= TOLERANCE;
        }

        let v = point - self.p0;
        let t = (v.x * d.x + v.y * d.y) / len_sq;
        if !(-TOLERANCE..=1.0 + TOLERANCE).contains(&t) {
            return false;
        }
        self.solve_point(t).distance_to(point) <= TOLERANCE * len_sq.sqrt().max(1.0)
    }

    /// Intersection with `other`.
    ///
    /// With `extend` both lines are treated as infinite. Otherwise the
    /// intersection must lie on both segments. Parallel and degenerate
    /// lines never intersect.
    pub fn intersect_line(&self, other: &Line, extend: bool) -> Option<Point> {
        let d1 = self.p1 - self.p0;
        let d2 = other.p1 - other.p0;
        let denom = d1.x * d2.y - d1.y * d2.x;
        if denom == 0.0 || !denom.is_finite() {
            return None;
        }

        let w = other.p0 - self.p0;
        let t = (w.x * d2.y - w.y * d2.x) / denom;
        let point = Point::new(lerp(self.p0.x, self.p1.x, t), lerp(self.p0.y, self.p1.y, t));

        if extend || (self.has_point(point) && other.has_point(point)) {
            Some(point)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(x0: f64, y0: f64, x1: f64, y1: f64) -> Line {
        Line::new(Point::new(x0, y0), Point::new(x1, y1))
    }

    #[test]
    fn crossing_segments_intersect() {
        let a = line(0.0, 0.0, 100.0, 100.0);
        let b = line(0.0, 100.0, 100.0, 0.0);
        assert_eq!(a.intersect_line(&b, false), Some(Point::new(50.0, 50.0)));
    }

    #[test]
    fn short_segments_need_extend() {
        let a = line(0.0, 0.0, 10.0, 10.0);
        let b = line(0.0, 100.0, 100.0, 0.0);
        assert_eq!(a.intersect_line(&b, false), None);
        assert_eq!(a.intersect_line(&b, true), Some(Point::new(50.0, 50.0)));
    }

    #[test]
    fn parallel_lines_do_not_intersect() {
        let a = line(0.0, 0.0, 100.0, 0.0);
        let b = line(0.0, 10.0, 100.0, 10.0);
        assert_eq!(a.intersect_line(&b, true), None);
    }

    #[test]
    fn zero_length_line_does_not_intersect() {
        let a = line(5.0, 5.0, 5.0, 5.0);
        let b = line(0.0, 0.0, 10.0, 10.0);
        assert_eq!(a.intersect_line(&b, true), None);
        assert_eq!(a.angle(), None);
    }

    #[test]
    fn slice_at_ends() {
        let a = line(0.0, 0.0, 10.0, 0.0);
        let (head, tail) = a.solve_slice(0.0);
        assert_eq!(head.p1, a.p0);
        assert_eq!(tail, a);
    }
}
