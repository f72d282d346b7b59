//! Geometry primitives: points, segments and affine transforms.

mod cubic;
mod line;
mod point;
mod segment;
mod transform;

pub use cubic::CubicBezier;
pub use kurbo::Rect;
pub use line::Line;
pub use point::{EQ_PRECISION, Point, lerp};
pub(crate) use point::format_coord;
pub use segment::Segment;
pub use transform::{Transform, TransformOrigin};

/// Smallest rectangle enclosing all `points`, or `None` when empty.
pub fn bounds_of(points: impl IntoIterator<Item = Point>) -> Option<Rect> {
    let mut points = points.into_iter();
    let first = points.next()?.to_kurbo();
    Some(points.fold(Rect::from_points(first, first), |rect, p| rect.union_pt(p.to_kurbo())))
}

/// Union of optional rectangles.
pub fn union_bounds(rects: impl IntoIterator<Item = Option<Rect>>) -> Option<Rect> {
    rects.into_iter().flatten().reduce(|a, b| a.union(b))
}
