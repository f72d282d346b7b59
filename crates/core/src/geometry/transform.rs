//! Affine transforms with a selectable origin.

use std::{fmt, str::FromStr};

use kurbo::{Affine, Rect, Vec2};

use super::Point;

/// Reference point a scale, shear or rotation is applied around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TransformOrigin {
    /// The coordinate origin `(0, 0)` on the baseline.
    #[default]
    Baseline,
    BottomLeft,
    BottomRight,
    TopLeft,
    TopRight,
    Center,
}

impl TransformOrigin {
    pub const ALL: [TransformOrigin; 6] = [
        TransformOrigin::Baseline,
        TransformOrigin::BottomLeft,
        TransformOrigin::BottomRight,
        TransformOrigin::TopLeft,
        TransformOrigin::TopRight,
        TransformOrigin::Center,
    ];

    /// Resolve to a concrete point for the given bounds.
    ///
    /// Empty geometry (no bounds) resolves every origin to `(0, 0)`.
    pub fn resolve(self, bounds: Option<Rect>) -> Point {
        let Some(b) = bounds else {
            return Point::ZERO;
        };
        match self {
            TransformOrigin::Baseline => Point::ZERO,
            TransformOrigin::BottomLeft => Point::new(b.x0, b.y0),
            TransformOrigin::BottomRight => Point::new(b.x1, b.y0),
            TransformOrigin::TopLeft => Point::new(b.x0, b.y1),
            TransformOrigin::TopRight => Point::new(b.x1, b.y1),
            TransformOrigin::Center => b.center().into(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TransformOrigin::Baseline => "baseline",
            TransformOrigin::BottomLeft => "bottom-left",
            TransformOrigin::BottomRight => "bottom-right",
            TransformOrigin::TopLeft => "top-left",
            TransformOrigin::TopRight => "top-right",
            TransformOrigin::Center => "center",
        }
    }
}

impl fmt::Display for TransformOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransformOrigin {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        TransformOrigin::ALL
            .into_iter()
            .find(|origin| origin.as_str() == normalized)
            .ok_or_else(|| format!("unknown transform origin '{s}'"))
    }
}

/// A 2D affine transform.
///
/// Builder methods compose left to right: `Transform::identity().scale(2.0,
/// 2.0).shift(10.0, 0.0)` scales first and then shifts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform(Affine);

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    pub const fn identity() -> Self {
        Self(Affine::IDENTITY)
    }

    /// Build from `[xx, xy, yx, yy, dx, dy]` coefficients.
    pub fn from_coeffs(coeffs: [f64; 6]) -> Self {
        Self(Affine::new(coeffs))
    }

    pub fn coeffs(&self) -> [f64; 6] {
        self.0.as_coeffs()
    }

    pub fn affine(&self) -> Affine {
        self.0
    }

    pub fn is_identity(&self) -> bool {
        self.0 == Affine::IDENTITY
    }

    /// Append `other`, applied after `self`.
    pub fn then(self, other: Transform) -> Self {
        Self(other.0 * self.0)
    }

    pub fn shift(self, dx: f64, dy: f64) -> Self {
        Self(Affine::translate(Vec2::new(dx, dy)) * self.0)
    }

    pub fn scale(self, sx: f64, sy: f64) -> Self {
        Self(Affine::scale_non_uniform(sx, sy) * self.0)
    }

    /// Shear by angles in degrees: `x' = x + y·tan(ax)`, `y' = y + x·tan(ay)`.
    pub fn shear(self, ax: f64, ay: f64) -> Self {
        let skew = Affine::new([1.0, ay.to_radians().tan(), ax.to_radians().tan(), 1.0, 0.0, 0.0]);
        Self(skew * self.0)
    }

    /// Counter-clockwise rotation by `angle` degrees.
    pub fn rotate(self, angle: f64) -> Self {
        Self(Affine::rotate(angle.to_radians()) * self.0)
    }

    /// Bracket the transform so it acts around `origin` instead of `(0, 0)`.
    pub fn about(self, origin: Point) -> Self {
        let to = Vec2::new(origin.x, origin.y);
        Self(Affine::translate(to) * self.0 * Affine::translate(-to))
    }

    pub fn inverse(&self) -> Option<Self> {
        let det = self.0.determinant();
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        Some(Self(self.0.inverse()))
    }

    pub fn apply(&self, point: Point) -> Point {
        (self.0 * point.to_kurbo()).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composes_left_to_right() {
        let t = Transform::identity().scale(2.0, 2.0).shift(10.0, 0.0);
        assert_eq!(t.apply(Point::new(1.0, 1.0)), Point::new(12.0, 2.0));

        let t = Transform::identity().shift(10.0, 0.0).scale(2.0, 2.0);
        assert_eq!(t.apply(Point::new(1.0, 1.0)), Point::new(22.0, 2.0));
    }

    #[test]
    fn scale_about_origin() {
        let t = Transform::identity().scale(2.0, 2.0).about(Point::new(50.0, 50.0));
        assert_eq!(t.apply(Point::new(50.0, 50.0)), Point::new(50.0, 50.0));
        assert_eq!(t.apply(Point::new(60.0, 50.0)), Point::new(70.0, 50.0));
    }

    #[test]
    fn shear_slants_forward() {
        let t = Transform::identity().shear(45.0, 0.0);
        assert_eq!(t.apply(Point::new(0.0, 100.0)), Point::new(100.0, 100.0));
        assert_eq!(t.apply(Point::new(30.0, 0.0)), Point::new(30.0, 0.0));
    }

    #[test]
    fn rotate_quarter_turn() {
        let t = Transform::identity().rotate(90.0);
        assert_eq!(t.apply(Point::new(10.0, 0.0)), Point::new(0.0, 10.0));
    }

    #[test]
    fn inverse_round_trips() {
        let t = Transform::identity().scale(2.0, 3.0).shear(10.0, 0.0).shift(5.0, -7.0);
        let p = Point::new(12.5, -40.0);
        assert_eq!(t.inverse().unwrap().apply(t.apply(p)), p);
        assert!(Transform::identity().scale(0.0, 1.0).inverse().is_none());
    }

    #[test]
    fn origin_resolution() {
        let bounds = Rect::new(10.0, 20.0, 110.0, 220.0);
        assert_eq!(TransformOrigin::Baseline.resolve(Some(bounds)), Point::ZERO);
        assert_eq!(TransformOrigin::TopRight.resolve(Some(bounds)), Point::new(110.0, 220.0));
        assert_eq!(TransformOrigin::Center.resolve(Some(bounds)), Point::new(60.0, 120.0));
        assert_eq!(TransformOrigin::Center.resolve(None), Point::ZERO);
    }

    #[test]
    fn origin_parses() {
        assert_eq!("Bottom_Left".parse::<TransformOrigin>(), Ok(TransformOrigin::BottomLeft));
        assert!("middle".parse::<TransformOrigin>().is_err());
    }
}
