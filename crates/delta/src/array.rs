//! Flat coordinate arrays taken from layers and written back into them.

use std::ops::Index;

use typerig_core::{
    Contour, Layer, Point, Rect, Transform,
    geometry::{bounds_of, lerp},
};

use crate::error::{Error, Result};

/// Every node coordinate of a layer, in (shape, contour, node) order.
///
/// Both on- and off-curve nodes are included and shape transforms are not
/// applied, so writing the array back into the same structure is lossless.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PointArray(Vec<Point>);

impl PointArray {
    pub fn new(points: Vec<Point>) -> Self {
        Self(points)
    }

    pub fn from_layer(layer: &Layer) -> Self {
        Self(layer.contours().flat_map(|c| c.iter().map(|n| n.point)).collect())
    }

    pub fn from_contour(contour: &Contour) -> Self {
        Self(contour.iter().map(|n| n.point).collect())
    }

    /// One array per contour, in layer order.
    pub fn per_contour(layer: &Layer) -> Vec<Self> {
        layer.contours().map(Self::from_contour).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn points(&self) -> &[Point] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Point> {
        self.0.iter()
    }

    pub fn into_inner(self) -> Vec<Point> {
        self.0
    }

    pub fn bounds(&self) -> Option<Rect> {
        bounds_of(self.0.iter().copied())
    }

    pub fn transform(&self, transform: Transform) -> Self {
        Self(self.0.iter().map(|&p| transform.apply(p)).collect())
    }

    pub fn shift(&self, dx: f64, dy: f64) -> Self {
        self.transform(Transform::identity().shift(dx, dy))
    }

    /// Per-axis interpolation: x from `tx`, y from `ty`.
    pub fn lerp_xy(&self, other: &Self, tx: f64, ty: f64) -> Result<Self> {
        self.check_len(other.len())?;
        Ok(Self(
            self.0
                .iter()
                .zip(&other.0)
                .map(|(a, b)| Point::new(lerp(a.x, b.x, tx), lerp(a.y, b.y, ty)))
                .collect(),
        ))
    }

    /// Largest per-coordinate difference to `other`.
    pub fn max_deviation(&self, other: &Self) -> Result<f64> {
        self.check_len(other.len())?;
        Ok(self
            .0
            .iter()
            .zip(&other.0)
            .map(|(a, b)| (a.x - b.x).abs().max((a.y - b.y).abs()))
            .fold(0.0, f64::max))
    }

    pub(crate) fn check_len(&self, expected: usize) -> Result<()> {
        if self.len() != expected {
            return Err(Error::ArrayLength {
                expected,
                actual: self.len(),
            });
        }
        Ok(())
    }

    /// Copy of `template` with every node moved to the matching array point.
    ///
    /// Node types, closed flags, names, shape transforms and inclusions all
    /// come from the template.
    pub fn to_layer(&self, template: &Layer) -> Result<Layer> {
        self.check_len(template.node_count())?;
        let mut layer = template.clone();
        let mut points = self.0.iter();
        for shape in layer.shapes_mut() {
            for contour in shape.contours_mut() {
                for (node, point) in contour.nodes_mut().iter_mut().zip(points.by_ref()) {
                    node.point = *point;
                }
            }
        }
        Ok(layer)
    }

    pub fn to_contour(&self, template: &Contour) -> Result<Contour> {
        self.check_len(template.len())?;
        let mut contour = template.clone();
        for (node, point) in contour.nodes_mut().iter_mut().zip(&self.0) {
            node.point = *point;
        }
        Ok(contour)
    }
}

impl Index<usize> for PointArray {
    type Output = Point;

    fn index(&self, index: usize) -> &Point {
        &self.0[index]
    }
}

impl From<Vec<Point>> for PointArray {
    fn from(points: Vec<Point>) -> Self {
        Self(points)
    }
}

impl FromIterator<Point> for PointArray {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a PointArray {
    type Item = &'a Point;
    type IntoIter = std::slice::Iter<'a, Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use typerig_core::{Node, Shape};

    use super::*;

    fn layer() -> Layer {
        Layer::new("Regular")
            .with_shape(Shape::new(vec![
                Contour::polygon(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]),
                Contour::closed(vec![
                    Node::on(20.0, 0.0),
                    Node::off(20.0, 5.0),
                    Node::off(25.0, 10.0),
                    Node::on(30.0, 10.0),
                ]),
            ]))
            .with_shape(Shape::new(vec![Contour::polygon(&[(-5.0, -5.0), (-1.0, -1.0)])]))
    }

    #[test]
    fn flattens_in_traversal_order() {
        let array = PointArray::from_layer(&layer());
        assert_eq!(array.len(), 9);
        assert_eq!(array[3], Point::new(20.0, 0.0));
        assert_eq!(array[8], Point::new(-1.0, -1.0));
        assert_eq!(PointArray::per_contour(&layer()).len(), 3);
    }

    #[test]
    fn writes_back_into_template() {
        let template = layer();
        let moved = PointArray::from_layer(&template).shift(5.0, 0.0);
        let out = moved.to_layer(&template).unwrap();

        assert_eq!(PointArray::from_layer(&out), moved);
        let contour = &out.shapes()[0].contours()[1];
        assert!(!contour.nodes()[1].is_on());
        assert_eq!(contour.nodes()[0].point, Point::new(25.0, 0.0));
    }

    #[test]
    fn length_mismatch_is_rejected() {
        let short = PointArray::new(vec![Point::ZERO]);
        assert!(matches!(
            short.to_layer(&layer()),
            Err(Error::ArrayLength { expected: 9, actual: 1 })
        ));
    }

    #[test]
    fn lerp_xy_is_anisotropic() {
        let a = PointArray::new(vec![Point::new(0.0, 0.0)]);
        let b = PointArray::new(vec![Point::new(100.0, 100.0)]);
        let mid = a.lerp_xy(&b, 0.5, 0.25).unwrap();
        assert_eq!(mid[0], Point::new(50.0, 25.0));
        assert_eq!(a.max_deviation(&b).unwrap(), 100.0);
    }
}
