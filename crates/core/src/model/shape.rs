use super::{Contour, Outline};
use crate::{
    adapter::HostHandle,
    error::{Error, Result},
    geometry::{Point, Transform},
};

/// An ordered group of contours sharing one transform.
///
/// The transform is lazy: node coordinates stay untransformed until
/// [`Shape::apply_transform`] bakes it in. `includes` names nested shapes
/// on the same layer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Shape {
    contours: Vec<Contour>,
    pub transform: Transform,
    pub name: Option<String>,
    pub locked: bool,
    pub includes: Vec<String>,
    pub host: Option<HostHandle>,
}

impl Shape {
    pub fn new(contours: Vec<Contour>) -> Self {
        Self {
            contours,
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn len(&self) -> usize {
        self.contours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contours.is_empty()
    }

    pub fn contours(&self) -> &[Contour] {
        &self.contours
    }

    pub fn contours_mut(&mut self) -> &mut [Contour] {
        &mut self.contours
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Contour> {
        self.contours.iter()
    }

    pub fn contour(&self, index: usize) -> Option<&Contour> {
        self.contours.get(index)
    }

    pub fn insert(&mut self, index: usize, contour: Contour) -> Result<()> {
        if index > self.contours.len() {
            return Err(self.out_of_bounds(index));
        }
        self.contours.insert(index, contour);
        Ok(())
    }

    pub fn push(&mut self, contour: Contour) {
        self.contours.push(contour);
    }

    pub fn remove(&mut self, index: usize) -> Result<Contour> {
        if index >= self.contours.len() {
            return Err(self.out_of_bounds(index));
        }
        Ok(self.contours.remove(index))
    }

    fn out_of_bounds(&self, index: usize) -> Error {
        Error::IndexOutOfBounds {
            container: "shape",
            index,
            len: self.contours.len(),
        }
    }

    /// Attributes only, without contours.
    pub(crate) fn shallow_clone(&self) -> Self {
        Self {
            contours: Vec::new(),
            transform: self.transform,
            name: self.name.clone(),
            locked: self.locked,
            includes: self.includes.clone(),
            host: self.host,
        }
    }

    pub fn node_count(&self) -> usize {
        self.contours.iter().map(Contour::len).sum()
    }

    /// Bake the pending transform into node coordinates.
    pub fn apply_transform(&mut self) {
        let transform = std::mem::take(&mut self.transform);
        for contour in &mut self.contours {
            Outline::transform(contour, transform);
        }
    }
}

impl Outline for Shape {
    /// Visits points with the pending transform applied.
    fn visit_points(&self, f: &mut dyn FnMut(Point)) {
        for contour in &self.contours {
            contour.visit_points(&mut |p| f(self.transform.apply(p)));
        }
    }

    /// Bakes the pending transform first so edits land in final coordinates.
    fn visit_points_mut(&mut self, f: &mut dyn FnMut(&mut Point)) {
        self.apply_transform();
        for contour in &mut self.contours {
            contour.visit_points_mut(f);
        }
    }
}

impl<'a> IntoIterator for &'a Shape {
    type Item = &'a Contour;
    type IntoIter = std::slice::Iter<'a, Contour>;

    fn into_iter(self) -> Self::IntoIter {
        self.contours.iter()
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Rect;

    use super::*;

    #[test]
    fn lazy_transform_shows_in_bounds_only() {
        let mut shape = Shape::new(vec![Contour::polygon(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)])]);
        shape.transform = Transform::identity().shift(100.0, 0.0);

        assert_eq!(shape.contours()[0].nodes()[0].point, Point::new(0.0, 0.0));
        assert_eq!(shape.bounding_box(), Some(Rect::new(100.0, 0.0, 110.0, 10.0)));

        shape.apply_transform();
        assert!(shape.transform.is_identity());
        assert_eq!(shape.contours()[0].nodes()[0].point, Point::new(100.0, 0.0));
    }

    #[test]
    fn shift_bakes_pending_transform() {
        let mut shape = Shape::new(vec![Contour::polygon(&[(0.0, 0.0), (10.0, 10.0)])]);
        shape.transform = Transform::identity().scale(2.0, 2.0);
        shape.shift(5.0, 0.0);
        assert_eq!(shape.contours()[0].nodes()[1].point, Point::new(25.0, 20.0));
    }
}
