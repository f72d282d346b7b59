use std::{collections::HashSet, fmt, str::FromStr};

use indexmap::IndexMap;

use super::{Anchor, Contour, Guideline, Outline, Shape};
use crate::{
    adapter::HostHandle,
    error::{Error, Result},
    geometry::Point,
};

/// Stem weights measured on a layer: `x` is the vertical stem, `y` the
/// horizontal stem.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Stems {
    pub x: f64,
    pub y: f64,
}

impl Stems {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn as_point(self) -> Point {
        Point::new(self.x, self.y)
    }
}

impl From<(f64, f64)> for Stems {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// What a layer is used for. Only masters take part in blending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LayerRole {
    #[default]
    Master,
    Mask,
    Service,
}

impl LayerRole {
    pub fn as_str(self) -> &'static str {
        match self {
            LayerRole::Master => "master",
            LayerRole::Mask => "mask",
            LayerRole::Service => "service",
        }
    }
}

impl fmt::Display for LayerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayerRole {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "master" => Ok(LayerRole::Master),
            "mask" => Ok(LayerRole::Mask),
            "service" => Ok(LayerRole::Service),
            other => Err(Error::parse("layer", format!("unknown role '{other}'"))),
        }
    }
}

/// Sidebearing and advance expressions such as `=rsb("A")`.
///
/// These are evaluated by the host; the engine only carries them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MetricExpressions {
    pub lsb: Option<String>,
    pub rsb: Option<String>,
    pub advance: Option<String>,
}

impl MetricExpressions {
    pub fn is_empty(&self) -> bool {
        self.lsb.is_none() && self.rsb.is_none() && self.advance.is_none()
    }
}

/// One drawing of a glyph.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Layer {
    pub name: String,
    pub role: LayerRole,
    shapes: Vec<Shape>,
    pub advance_width: f64,
    pub advance_height: f64,
    anchors: Vec<Anchor>,
    pub guidelines: Vec<Guideline>,
    pub mark: Option<String>,
    pub stems: Option<Stems>,
    pub metric_expressions: MetricExpressions,
    pub host: Option<HostHandle>,
}

impl Layer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_role(mut self, role: LayerRole) -> Self {
        self.role = role;
        self
    }

    pub fn with_shape(mut self, shape: Shape) -> Self {
        self.shapes.push(shape);
        self
    }

    pub fn with_advance(mut self, width: f64, height: f64) -> Self {
        self.advance_width = width;
        self.advance_height = height;
        self
    }

    pub fn with_stems(mut self, x: f64, y: f64) -> Self {
        self.stems = Some(Stems::new(x, y));
        self
    }

    pub fn is_master(&self) -> bool {
        self.role == LayerRole::Master
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn shapes_mut(&mut self) -> &mut [Shape] {
        &mut self.shapes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Shape> {
        self.shapes.iter()
    }

    pub fn shape(&self, index: usize) -> Option<&Shape> {
        self.shapes.get(index)
    }

    pub fn insert(&mut self, index: usize, shape: Shape) -> Result<()> {
        if index > self.shapes.len() {
            return Err(self.out_of_bounds(index));
        }
        self.shapes.insert(index, shape);
        Ok(())
    }

    pub fn push(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    pub fn remove(&mut self, index: usize) -> Result<Shape> {
        if index >= self.shapes.len() {
            return Err(self.out_of_bounds(index));
        }
        Ok(self.shapes.remove(index))
    }

    /// Drop all shapes, keeping every other attribute.
    pub fn clear_shapes(&mut self) {
        self.shapes.clear();
    }

    fn out_of_bounds(&self, index: usize) -> Error {
        Error::IndexOutOfBounds {
            container: "layer",
            index,
            len: self.shapes.len(),
        }
    }

    /// Attributes, anchors and guidelines, without shapes.
    pub(crate) fn shallow_clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            role: self.role,
            shapes: Vec::new(),
            advance_width: self.advance_width,
            advance_height: self.advance_height,
            anchors: self.anchors.clone(),
            guidelines: self.guidelines.clone(),
            mark: self.mark.clone(),
            stems: self.stems,
            metric_expressions: self.metric_expressions.clone(),
            host: self.host,
        }
    }

    /// All contours in shape order.
    pub fn contours(&self) -> impl Iterator<Item = &Contour> {
        self.shapes.iter().flat_map(Shape::iter)
    }

    pub fn node_count(&self) -> usize {
        self.shapes.iter().map(Shape::node_count).sum()
    }

    pub fn anchors(&self) -> &[Anchor] {
        &self.anchors
    }

    /// Mutable anchors. Renaming through this bypasses the uniqueness
    /// check; [`Layer::validate`] catches duplicates.
    pub fn anchors_mut(&mut self) -> &mut [Anchor] {
        &mut self.anchors
    }

    pub fn anchor(&self, name: &str) -> Option<&Anchor> {
        self.anchors.iter().find(|a| a.name == name)
    }

    pub fn add_anchor(&mut self, anchor: Anchor) -> Result<()> {
        if self.anchor(&anchor.name).is_some() {
            return Err(Error::DuplicateAnchor {
                layer: self.name.clone(),
                anchor: anchor.name,
            });
        }
        self.anchors.push(anchor);
        Ok(())
    }

    pub fn remove_anchor(&mut self, name: &str) -> Option<Anchor> {
        let index = self.anchors.iter().position(|a| a.name == name)?;
        Some(self.anchors.remove(index))
    }

    pub fn clear_anchors(&mut self) {
        self.anchors.clear();
    }

    /// Left sidebearing, `None` for an empty layer.
    pub fn lsb(&self) -> Option<f64> {
        self.bounding_box().map(|b| b.x0)
    }

    /// Right sidebearing, `None` for an empty layer.
    pub fn rsb(&self) -> Option<f64> {
        self.bounding_box().map(|b| self.advance_width - b.x1)
    }

    /// Move the outline and anchors horizontally so the left sidebearing
    /// becomes `value`. The advance grows or shrinks by the same amount.
    pub fn set_lsb(&mut self, value: f64) {
        let Some(current) = self.lsb() else {
            return;
        };
        let delta = value - current;
        self.shift(delta, 0.0);
        for anchor in &mut self.anchors {
            anchor.point.x += delta;
        }
        self.advance_width += delta;
    }

    /// Set the advance so the right sidebearing becomes `value`.
    pub fn set_rsb(&mut self, value: f64) {
        if let Some(bounds) = self.bounding_box() {
            self.advance_width = bounds.x1 + value;
        }
    }

    /// Check anchor name uniqueness and that shape inclusions are acyclic.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for anchor in &self.anchors {
            if !seen.insert(anchor.name.as_str()) {
                return Err(Error::DuplicateAnchor {
                    layer: self.name.clone(),
                    anchor: anchor.name.clone(),
                });
            }
        }
        self.check_inclusions()
    }

    /// Inclusions name other shapes on this layer; names that match no
    /// shape are external references and end the walk.
    pub fn check_inclusions(&self) -> Result<()> {
        let graph: IndexMap<&str, &[String]> = self
            .shapes
            .iter()
            .filter_map(|s| Some((s.name.as_deref()?, s.includes.as_slice())))
            .collect();

        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Visiting,
            Done,
        }

        fn visit<'a>(
            name: &'a str,
            graph: &IndexMap<&'a str, &'a [String]>,
            marks: &mut IndexMap<&'a str, Mark>,
        ) -> Result<()> {
            match marks.get(name) {
                Some(Mark::Done) => return Ok(()),
                Some(Mark::Visiting) => return Err(Error::CyclicInclusion(name.to_string())),
                None => {}
            }
            marks.insert(name, Mark::Visiting);
            if let Some(&children) = graph.get(name) {
                for child in children.iter() {
                    visit(child, graph, marks)?;
                }
            }
            marks.insert(name, Mark::Done);
            Ok(())
        }

        let mut marks = IndexMap::new();
        for name in graph.keys() {
            visit(name, &graph, &mut marks)?;
        }

        // Unnamed shapes cannot be included, but they may still point at
        // themselves through a cycle of named ones.
        for shape in self.shapes.iter().filter(|s| s.name.is_none()) {
            for child in &shape.includes {
                visit(child, &graph, &mut marks)?;
            }
        }
        Ok(())
    }

    /// Total number of inclusion references across shapes.
    pub fn inclusion_count(&self) -> usize {
        self.shapes.iter().map(|s| s.includes.len()).sum()
    }
}

impl Outline for Layer {
    fn visit_points(&self, f: &mut dyn FnMut(Point)) {
        for shape in &self.shapes {
            shape.visit_points(f);
        }
    }

    fn visit_points_mut(&mut self, f: &mut dyn FnMut(&mut Point)) {
        for shape in &mut self.shapes {
            shape.visit_points_mut(f);
        }
    }
}

impl<'a> IntoIterator for &'a Layer {
    type Item = &'a Shape;
    type IntoIter = std::slice::Iter<'a, Shape>;

    fn into_iter(self) -> Self::IntoIter {
        self.shapes.iter()
    }
}
