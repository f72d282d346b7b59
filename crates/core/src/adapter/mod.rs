//! Boundary between the core model and a host editor.
//!
//! A host exposes its objects as a tree of opaque [`HostHandle`]s. Each
//! handle carries one [`Attributes`] record (the level's own data, without
//! children) and an ordered child list. [`HostAdapter`] translates between
//! that tree and the core model: `eject_*` copies host data out, `mount_*`
//! writes a core graph back.

mod memory;
mod mount;

use std::fmt;

pub use memory::MemoryHost;
pub use mount::{HostAdapter, MountReport};

use crate::model::{Contour, Font, Glyph, Layer, Node, Shape};

/// Non-owning reference to a host object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HostHandle(pub u64);

impl fmt::Display for HostHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Failure reported by a host.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    #[error("unknown host handle {0}")]
    UnknownHandle(HostHandle),

    #[error("host handle {handle} is a {actual}, expected a {expected}")]
    WrongKind {
        handle: HostHandle,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("no {kind} named '{name}'")]
    NotFound { kind: &'static str, name: String },

    #[error("{0}")]
    Host(String),
}

/// The data of one host object, without its children.
///
/// Container levels reuse the core types with their child lists empty.
#[derive(Debug, Clone, PartialEq)]
pub enum Attributes {
    Font(Font),
    Glyph(Glyph),
    Layer(Layer),
    Shape(Shape),
    Contour(Contour),
    Node(Node),
}

impl Attributes {
    pub fn kind(&self) -> &'static str {
        match self {
            Attributes::Font(_) => "font",
            Attributes::Glyph(_) => "glyph",
            Attributes::Layer(_) => "layer",
            Attributes::Shape(_) => "shape",
            Attributes::Contour(_) => "contour",
            Attributes::Node(_) => "node",
        }
    }

    pub fn of_font(font: &Font) -> Self {
        Attributes::Font(font.shallow_clone())
    }

    pub fn of_glyph(glyph: &Glyph) -> Self {
        Attributes::Glyph(glyph.shallow_clone())
    }

    pub fn of_layer(layer: &Layer) -> Self {
        Attributes::Layer(layer.shallow_clone())
    }

    pub fn of_shape(shape: &Shape) -> Self {
        Attributes::Shape(shape.shallow_clone())
    }

    pub fn of_contour(contour: &Contour) -> Self {
        Attributes::Contour(contour.shallow_clone())
    }

    fn wrong_kind(&self, handle: HostHandle, expected: &'static str) -> AdapterError {
        AdapterError::WrongKind {
            handle,
            expected,
            actual: self.kind(),
        }
    }

    pub fn into_font(self, handle: HostHandle) -> Result<Font, AdapterError> {
        match self {
            Attributes::Font(font) => Ok(font),
            other => Err(other.wrong_kind(handle, "font")),
        }
    }

    pub fn into_glyph(self, handle: HostHandle) -> Result<Glyph, AdapterError> {
        match self {
            Attributes::Glyph(glyph) => Ok(glyph),
            other => Err(other.wrong_kind(handle, "glyph")),
        }
    }

    pub fn into_layer(self, handle: HostHandle) -> Result<Layer, AdapterError> {
        match self {
            Attributes::Layer(layer) => Ok(layer),
            other => Err(other.wrong_kind(handle, "layer")),
        }
    }

    pub fn into_shape(self, handle: HostHandle) -> Result<Shape, AdapterError> {
        match self {
            Attributes::Shape(shape) => Ok(shape),
            other => Err(other.wrong_kind(handle, "shape")),
        }
    }

    pub fn into_contour(self, handle: HostHandle) -> Result<Contour, AdapterError> {
        match self {
            Attributes::Contour(contour) => Ok(contour),
            other => Err(other.wrong_kind(handle, "contour")),
        }
    }

    pub fn into_node(self, handle: HostHandle) -> Result<Node, AdapterError> {
        match self {
            Attributes::Node(node) => Ok(node),
            other => Err(other.wrong_kind(handle, "node")),
        }
    }
}

/// An editor that exposes its object tree to the core.
///
/// Every method is synchronous. The core calls a host only while ejecting
/// or mounting, never during blending.
pub trait Host {
    /// Handle of the font object at the root of the tree.
    fn root(&self) -> HostHandle;

    fn children(&self, parent: HostHandle) -> Result<Vec<HostHandle>, AdapterError>;

    fn attributes(&self, handle: HostHandle) -> Result<Attributes, AdapterError>;

    fn set_attributes(&mut self, handle: HostHandle, attributes: Attributes) -> Result<(), AdapterError>;

    /// Drop all children of `parent` and create new ones from `children`,
    /// each without grandchildren. Returns the new handles in order.
    fn replace_children(
        &mut self,
        parent: HostHandle,
        children: Vec<Attributes>,
    ) -> Result<Vec<HostHandle>, AdapterError>;

    /// Hook for host undo/history integration.
    fn notify_changed(&mut self, scope: &str, message: &str) {
        let _ = (scope, message);
    }

    fn masters(&self) -> Result<Vec<String>, AdapterError> {
        let root = self.root();
        Ok(self.attributes(root)?.into_font(root)?.masters)
    }

    fn italic_angle(&self) -> Result<f64, AdapterError> {
        let root = self.root();
        Ok(self.attributes(root)?.into_font(root)?.metrics.italic_angle)
    }

    fn glyph_names(&self) -> Result<Vec<String>, AdapterError> {
        self.children(self.root())?
            .into_iter()
            .map(|h| Ok(self.attributes(h)?.into_glyph(h)?.name))
            .collect()
    }

    fn glyph(&self, name: &str) -> Result<HostHandle, AdapterError> {
        for handle in self.children(self.root())? {
            if self.attributes(handle)?.into_glyph(handle)?.name == name {
                return Ok(handle);
            }
        }
        Err(AdapterError::NotFound {
            kind: "glyph",
            name: name.to_string(),
        })
    }

    fn layers(&self, glyph: HostHandle) -> Result<Vec<HostHandle>, AdapterError> {
        self.children(glyph)
    }

    fn layer(&self, glyph: HostHandle, name: &str) -> Result<HostHandle, AdapterError> {
        for handle in self.children(glyph)? {
            if self.attributes(handle)?.into_layer(handle)?.name == name {
                return Ok(handle);
            }
        }
        Err(AdapterError::NotFound {
            kind: "layer",
            name: name.to_string(),
        })
    }
}
