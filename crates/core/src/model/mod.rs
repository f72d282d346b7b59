//! Host-independent glyph data model.
//!
//! Each level owns the level below it: a [`Font`] owns [`Glyph`]s, a glyph
//! owns [`Layer`]s, down to the [`Node`]s of a [`Contour`]. The `host` slot
//! on each level is a non-owning handle into an editor registry, see
//! [`crate::adapter`].

mod anchor;
mod contour;
mod font;
mod glyph;
mod layer;
mod node;
mod outline;
mod shape;

pub use anchor::{Anchor, Guideline};
pub use contour::{Contour, Winding};
pub use font::{Axis, Font, FontMetrics};
pub use glyph::Glyph;
pub use layer::{Layer, LayerRole, MetricExpressions, Stems};
pub use node::{Node, NodeType};
pub use outline::Outline;
pub use shape::Shape;

/// Detached deep copy with every host handle cleared.
pub trait Eject: Clone {
    /// Clear host handles on this level and everything below it.
    fn detach(&mut self);

    fn eject(&self) -> Self {
        let mut copy = self.clone();
        copy.detach();
        copy
    }
}

impl Eject for Contour {
    fn detach(&mut self) {
        self.host = None;
    }
}

impl Eject for Shape {
    fn detach(&mut self) {
        self.host = None;
        self.contours_mut().iter_mut().for_each(Eject::detach);
    }
}

impl Eject for Layer {
    fn detach(&mut self) {
        self.host = None;
        self.shapes_mut().iter_mut().for_each(Eject::detach);
    }
}

impl Eject for Glyph {
    fn detach(&mut self) {
        self.host = None;
        self.layers_mut().iter_mut().for_each(Eject::detach);
    }
}

impl Eject for Font {
    fn detach(&mut self) {
        self.host = None;
        self.glyphs_mut().for_each(Eject::detach);
    }
}
