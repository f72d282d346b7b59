use crate::geometry::Point;

/// A named attachment point on a layer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Anchor {
    pub name: String,
    pub point: Point,
    /// Host-evaluated expressions for the coordinates, kept verbatim.
    pub x_expr: Option<String>,
    pub y_expr: Option<String>,
    pub tag: Option<String>,
}

impl Anchor {
    pub fn new(name: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            name: name.into(),
            point: Point::new(x, y),
            ..Self::default()
        }
    }
}

/// A guideline through `point` at `angle` degrees.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Guideline {
    pub name: Option<String>,
    pub point: Point,
    pub angle: f64,
}

impl Guideline {
    pub fn new(x: f64, y: f64, angle: f64) -> Self {
        Self {
            name: None,
            point: Point::new(x, y),
            angle,
        }
    }
}
