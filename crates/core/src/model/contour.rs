use kurbo::Rect;

use super::{Node, NodeType, Outline};
use crate::{
    adapter::HostHandle,
    error::{Error, Result},
    geometry::{CubicBezier, Line, Point, Segment, union_bounds},
};

/// Direction of a closed contour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Winding {
    Clockwise,
    CounterClockwise,
}

impl Winding {
    pub fn flipped(self) -> Self {
        match self {
            Winding::Clockwise => Winding::CounterClockwise,
            Winding::CounterClockwise => Winding::Clockwise,
        }
    }
}

/// An ordered run of nodes, open or closed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Contour {
    nodes: Vec<Node>,
    pub closed: bool,
    pub name: Option<String>,
    pub host: Option<HostHandle>,
}

impl Contour {
    pub fn new(nodes: Vec<Node>, closed: bool) -> Self {
        Self {
            nodes,
            closed,
            name: None,
            host: None,
        }
    }

    pub fn closed(nodes: Vec<Node>) -> Self {
        Self::new(nodes, true)
    }

    /// Closed contour of on-curve nodes.
    pub fn polygon(points: &[(f64, f64)]) -> Self {
        Self::closed(points.iter().map(|&(x, y)| Node::on(x, y)).collect())
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Mutable access to nodes; the node count cannot change through it.
    pub fn nodes_mut(&mut self) -> &mut [Node] {
        &mut self.nodes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.nodes.iter()
    }

    pub fn node(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    pub fn insert(&mut self, index: usize, node: Node) -> Result<()> {
        if index > self.nodes.len() {
            return Err(self.out_of_bounds(index));
        }
        self.nodes.insert(index, node);
        Ok(())
    }

    pub fn push(&mut self, node: Node) {
        self.nodes.push(node);
    }

    pub fn remove(&mut self, index: usize) -> Result<Node> {
        if index >= self.nodes.len() {
            return Err(self.out_of_bounds(index));
        }
        Ok(self.nodes.remove(index))
    }

    fn out_of_bounds(&self, index: usize) -> Error {
        Error::IndexOutOfBounds {
            container: "contour",
            index,
            len: self.nodes.len(),
        }
    }

    /// Attributes only, without nodes.
    pub(crate) fn shallow_clone(&self) -> Self {
        Self {
            nodes: Vec::new(),
            closed: self.closed,
            name: self.name.clone(),
            host: self.host,
        }
    }

    pub fn on_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_on()).count()
    }

    /// Reverse the node order, flipping the winding.
    pub fn reverse(&mut self) {
        self.nodes.reverse();
    }

    /// Rotate the node list so `index` becomes the first node.
    ///
    /// An off-curve target is replaced by the nearest preceding on-curve
    /// node, wrapping around the start.
    pub fn set_start(&mut self, index: usize) -> Result<()> {
        if !self.closed {
            return Err(Error::OpenContour("set_start"));
        }
        if index >= self.nodes.len() {
            return Err(self.out_of_bounds(index));
        }

        let len = self.nodes.len();
        let start = (0..len)
            .map(|back| (index + len - back) % len)
            .find(|&i| self.nodes[i].is_on())
            .ok_or_else(|| Error::MalformedContour("contour has no on-curve nodes".into()))?;

        self.nodes.rotate_left(start);
        Ok(())
    }

    /// Signed area of the polygon through the on-curve nodes.
    ///
    /// Positive values mean clockwise.
    pub fn on_area(&self) -> f64 {
        let on: Vec<Point> = self.nodes.iter().filter(|n| n.is_on()).map(|n| n.point).collect();
        let Some(&first) = on.first() else {
            return 0.0;
        };
        let next = on.iter().skip(1).chain(std::iter::once(&first));
        on.iter()
            .zip(next)
            .map(|(a, b)| (b.x - a.x) * (b.y + a.y))
            .sum::<f64>()
            * 0.5
    }

    /// Winding from the on-curve area, `None` for degenerate contours.
    pub fn winding(&self) -> Option<Winding> {
        let area = self.on_area();
        if area > 0.0 {
            Some(Winding::Clockwise)
        } else if area < 0.0 {
            Some(Winding::CounterClockwise)
        } else {
            None
        }
    }

    /// Split the contour into line and cubic segments.
    ///
    /// A closed contour yields one segment per on-curve node. Off-curve
    /// runs must hold exactly zero or two nodes.
    pub fn segments(&self) -> Result<Vec<Segment>> {
        let len = self.nodes.len();
        let start = self
            .nodes
            .iter()
            .position(Node::is_on)
            .ok_or_else(|| Error::MalformedContour("contour has no on-curve nodes".into()))?;
        if !self.closed && start != 0 {
            return Err(Error::MalformedContour("open contour starts off-curve".into()));
        }

        let steps = if self.closed { len } else { len - 1 };
        let mut segments = Vec::with_capacity(self.on_count());
        let mut anchor = self.nodes[start].point;
        let mut controls: Vec<Point> = Vec::with_capacity(2);

        for step in 1..=steps {
            let node = &self.nodes[(start + step) % len];
            if node.kind() == NodeType::Off {
                controls.push(node.point);
                continue;
            }
            let segment = match controls.as_slice() {
                [] => Segment::Line(Line::new(anchor, node.point)),
                [c1, c2] => Segment::CubicBezier(CubicBezier::new(anchor, *c1, *c2, node.point)),
                other => {
                    return Err(Error::MalformedContour(format!(
                        "{} consecutive off-curve nodes before node {}",
                        other.len(),
                        (start + step) % len
                    )));
                }
            };
            segments.push(segment);
            controls.clear();
            anchor = node.point;
        }

        if !controls.is_empty() {
            return Err(Error::MalformedContour("open contour ends off-curve".into()));
        }
        Ok(segments)
    }

    /// Tight bounds through curve extrema.
    pub fn curve_bounds(&self) -> Result<Option<Rect>> {
        Ok(union_bounds(self.segments()?.iter().map(|s| Some(s.bounding_box()))))
    }
}

impl Outline for Contour {
    fn visit_points(&self, f: &mut dyn FnMut(Point)) {
        self.nodes.iter().for_each(|n| f(n.point));
    }

    fn visit_points_mut(&mut self, f: &mut dyn FnMut(&mut Point)) {
        self.nodes.iter_mut().for_each(|n| f(&mut n.point));
    }
}

impl<'a> IntoIterator for &'a Contour {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::TransformOrigin;

    fn square() -> Contour {
        Contour::polygon(&[(0.0, 0.0), (0.0, 100.0), (100.0, 100.0), (100.0, 0.0)])
    }

    fn rounded() -> Contour {
        Contour::closed(vec![
            Node::on(0.0, 0.0),
            Node::off(0.0, 55.0),
            Node::off(45.0, 100.0),
            Node::on(100.0, 100.0),
            Node::on(100.0, 0.0),
        ])
    }

    #[test]
    fn winding_follows_on_area() {
        let mut contour = square();
        assert_eq!(contour.winding(), Some(Winding::Clockwise));
        contour.reverse();
        assert_eq!(contour.winding(), Some(Winding::CounterClockwise));
    }

    #[test]
    fn reverse_twice_is_identity() {
        let original = rounded();
        let mut contour = original.clone();
        contour.reverse();
        assert_ne!(contour, original);
        contour.reverse();
        assert_eq!(contour, original);
    }

    #[test]
    fn set_start_rotates() {
        let original = square();
        let mut contour = original.clone();
        contour.set_start(1).unwrap();
        assert_eq!(contour.nodes()[0].point, Point::new(0.0, 100.0));
        contour.set_start(3).unwrap();
        assert_eq!(contour, original);
    }

    #[test]
    fn set_start_off_curve_uses_previous_on() {
        let mut contour = rounded();
        contour.set_start(2).unwrap();
        assert_eq!(contour.nodes()[0].point, Point::new(0.0, 0.0));

        let mut contour = rounded();
        contour.set_start(4).unwrap();
        contour.set_start(1).unwrap();
        assert_eq!(contour, rounded());
    }

    #[test]
    fn set_start_rejects_open_and_out_of_range() {
        let mut open = Contour::new(vec![Node::on(0.0, 0.0), Node::on(10.0, 0.0)], false);
        assert!(matches!(open.set_start(1), Err(Error::OpenContour(_))));
        assert!(matches!(square().set_start(9), Err(Error::IndexOutOfBounds { .. })));
    }

    #[test]
    fn segments_of_closed_contour() {
        let segments = rounded().segments().unwrap();
        assert_eq!(segments.len(), 3);
        assert!(matches!(segments[0], Segment::CubicBezier(_)));
        assert_eq!(segments[2].end(), Point::new(0.0, 0.0));
    }

    #[test]
    fn segments_of_open_contour() {
        let open = Contour::new(
            vec![Node::on(0.0, 0.0), Node::on(0.0, 100.0), Node::on(50.0, 100.0)],
            false,
        );
        assert_eq!(open.segments().unwrap().len(), 2);
    }

    #[test]
    fn segments_reject_single_off_curve() {
        let bad = Contour::closed(vec![Node::on(0.0, 0.0), Node::off(0.0, 50.0), Node::on(50.0, 50.0)]);
        assert!(matches!(bad.segments(), Err(Error::MalformedContour(_))));
    }

    #[test]
    fn insert_and_remove_check_bounds() {
        let mut contour = square();
        contour.insert(4, Node::on(50.0, -10.0)).unwrap();
        assert_eq!(contour.len(), 5);
        assert_eq!(contour.remove(4).unwrap().point, Point::new(50.0, -10.0));
        assert!(contour.insert(9, Node::on(0.0, 0.0)).is_err());
        assert!(contour.remove(4).is_err());
    }

    #[test]
    fn scale_about_center_keeps_center() {
        let mut contour = square();
        contour.scale(2.0, 0.5, TransformOrigin::Center);
        let bounds = contour.bounding_box().unwrap();
        assert_eq!(bounds, Rect::new(-50.0, 25.0, 150.0, 75.0));
    }

    #[test]
    fn curve_bounds_are_tight() {
        let bounds = rounded().curve_bounds().unwrap().unwrap();
        let expected = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!((bounds.x0 - expected.x0).abs() < 1e-9);
        assert!((bounds.y0 - expected.y0).abs() < 1e-9);
        assert!((bounds.x1 - expected.x1).abs() < 1e-9);
        assert!((bounds.y1 - expected.y1).abs() < 1e-9);
    }
}
