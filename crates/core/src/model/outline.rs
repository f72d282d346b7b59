use kurbo::Rect;

use crate::geometry::{Point, Transform, TransformOrigin, bounds_of};

/// Point-wise transformations shared by every level that holds nodes.
///
/// Implementors expose their points once; shift, scale, shear, rotate and
/// alignment are provided on top of that. Origins resolve against the
/// implementor's own bounding box.
pub trait Outline {
    /// Visit every point in traversal order.
    fn visit_points(&self, f: &mut dyn FnMut(Point));

    /// Visit every point mutably, in traversal order.
    fn visit_points_mut(&mut self, f: &mut dyn FnMut(&mut Point));

    /// Control-point bounding box, `None` when there are no points.
    fn bounding_box(&self) -> Option<Rect> {
        let mut points = Vec::new();
        self.visit_points(&mut |p| points.push(p));
        bounds_of(points)
    }

    fn transform(&mut self, transform: Transform) {
        if transform.is_identity() {
            return;
        }
        self.visit_points_mut(&mut |p| *p = transform.apply(*p));
    }

    fn shift(&mut self, dx: f64, dy: f64) {
        let delta = Point::new(dx, dy);
        self.visit_points_mut(&mut |p| *p += delta);
    }

    fn scale(&mut self, sx: f64, sy: f64, origin: TransformOrigin) {
        let pivot = origin.resolve(self.bounding_box());
        self.transform(Transform::identity().scale(sx, sy).about(pivot));
    }

    /// Shear by angles in degrees.
    fn shear(&mut self, ax: f64, ay: f64, origin: TransformOrigin) {
        let pivot = origin.resolve(self.bounding_box());
        self.transform(Transform::identity().shear(ax, ay).about(pivot));
    }

    fn rotate(&mut self, angle: f64, origin: TransformOrigin) {
        let pivot = origin.resolve(self.bounding_box());
        self.transform(Transform::identity().rotate(angle).about(pivot));
    }

    /// Move the outline so the point named by `origin` lands on `target`.
    fn align_to(&mut self, target: Point, origin: TransformOrigin) {
        let Some(bounds) = self.bounding_box() else {
            return;
        };
        let delta = target - origin.resolve(Some(bounds));
        self.shift(delta.x, delta.y);
    }
}
